//! # Coordinate Spaces
//!
//! The world is addressed in three spaces:
//!
//! ```text
//! pixel  continuous game position          (f64)
//! tile   integer cell, tile_width x tile_height pixels
//! chunk  integer cell, chunk_size x chunk_size tiles
//! ```
//!
//! Every conversion floors toward negative infinity, so the world extends
//! in all four directions from the origin without a seam at zero.
//!
//! ## Supported range
//!
//! Chunk coordinates are limited to `±chunk_limit()` per axis, chosen so
//! that tile coordinates stay inside `i32` and every chunk edge is an
//! exact `f64`. Conversions clamp into that range instead of overflowing;
//! inside it, `pixel_to_chunk(chunk_to_pixel(c)) == c` holds exactly.

use crate::error::{WorldError, WorldResult};

/// Largest accepted value for any single dimension (tile size in pixels,
/// chunk size in tiles, window size in chunks).
pub const MAX_DIMENSION: u32 = 1 << 10;

/// Continuous position in pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelPos {
    /// Horizontal position (grows to the right).
    pub x: f64,
    /// Vertical position (grows downwards).
    pub y: f64,
}

impl PixelPos {
    /// Creates a new pixel position.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in pixel space.
///
/// Edges are inclusive: a point lying exactly on `right` or `bottom` is inside.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelRect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Right edge.
    pub right: f64,
    /// Bottom edge.
    pub bottom: f64,
}

impl PixelRect {
    /// Creates a rectangle from its four edges.
    #[inline]
    #[must_use]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    /// Creates a square of half-size `radius` around `center`.
    #[inline]
    #[must_use]
    pub fn around(center: PixelPos, radius: f64) -> Self {
        Self {
            left: center.x - radius,
            top: center.y - radius,
            right: center.x + radius,
            bottom: center.y + radius,
        }
    }

    /// Returns true if `pos` lies inside the rectangle (edges included).
    #[inline]
    #[must_use]
    pub fn contains(&self, pos: PixelPos) -> bool {
        pos.x >= self.left && pos.x <= self.right && pos.y >= self.top && pos.y <= self.bottom
    }
}

/// Tile coordinate (one cell of the terrain grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not tiles).
    pub x: i32,
    /// Y coordinate (in chunks, not tiles).
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pure arithmetic between pixel, tile and chunk space.
///
/// The parameters are fixed at world construction; every method is a
/// deterministic function of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoordinateConverter {
    tile_width: u32,
    tile_height: u32,
    chunk_size_in_tiles: u32,
    window_width_in_chunks: u32,
    window_height_in_chunks: u32,
    chunk_limit: i32,
}

impl CoordinateConverter {
    /// Creates a converter.
    ///
    /// # Arguments
    ///
    /// * `tile_width`, `tile_height` - Tile size in pixels
    /// * `chunk_size_in_tiles` - Chunk edge length in tiles (chunks are square)
    /// * `window_width_in_chunks`, `window_height_in_chunks` - Resident window size
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ZeroDimension`] if any dimension is zero and
    /// [`WorldError::DimensionTooLarge`] if one exceeds [`MAX_DIMENSION`].
    pub fn new(
        tile_width: u32,
        tile_height: u32,
        chunk_size_in_tiles: u32,
        window_width_in_chunks: u32,
        window_height_in_chunks: u32,
    ) -> WorldResult<Self> {
        for (what, value) in [
            ("tile_width", tile_width),
            ("tile_height", tile_height),
            ("chunk_size_in_tiles", chunk_size_in_tiles),
            ("window_width_in_chunks", window_width_in_chunks),
            ("window_height_in_chunks", window_height_in_chunks),
        ] {
            if value == 0 {
                return Err(WorldError::ZeroDimension { what });
            }
            if value > MAX_DIMENSION {
                return Err(WorldError::DimensionTooLarge {
                    what,
                    value,
                    max: MAX_DIMENSION,
                });
            }
        }

        // Room for a window past the limit and one exclusive edge, in tiles.
        let window = window_width_in_chunks.max(window_height_in_chunks) as i32;
        let chunk_limit = i32::MAX / chunk_size_in_tiles as i32 - window - 1;

        Ok(Self {
            tile_width,
            tile_height,
            chunk_size_in_tiles,
            window_width_in_chunks,
            window_height_in_chunks,
            chunk_limit,
        })
    }

    /// Largest supported chunk coordinate magnitude on either axis.
    #[inline]
    #[must_use]
    pub const fn chunk_limit(&self) -> i32 {
        self.chunk_limit
    }

    /// Clamps `chunk` into the supported range.
    #[inline]
    #[must_use]
    pub const fn clamp_chunk(&self, chunk: ChunkCoord) -> ChunkCoord {
        ChunkCoord::new(
            clamp_axis(chunk.x, self.chunk_limit),
            clamp_axis(chunk.y, self.chunk_limit),
        )
    }

    /// Clamps `tile` into the tiles of supported chunks.
    #[inline]
    #[must_use]
    pub const fn clamp_tile(&self, tile: TileCoord) -> TileCoord {
        let size = self.chunk_size_in_tiles as i32;
        let low = -self.chunk_limit * size;
        let high = (self.chunk_limit + 1) * size - 1;
        TileCoord::new(clamp_range(tile.x, low, high), clamp_range(tile.y, low, high))
    }

    /// Tile width in pixels.
    #[inline]
    #[must_use]
    pub const fn tile_width(&self) -> u32 {
        self.tile_width
    }

    /// Tile height in pixels.
    #[inline]
    #[must_use]
    pub const fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Chunk edge length in tiles.
    #[inline]
    #[must_use]
    pub const fn chunk_size_in_tiles(&self) -> u32 {
        self.chunk_size_in_tiles
    }

    /// Window width in chunks.
    #[inline]
    #[must_use]
    pub const fn window_width_in_chunks(&self) -> u32 {
        self.window_width_in_chunks
    }

    /// Window height in chunks.
    #[inline]
    #[must_use]
    pub const fn window_height_in_chunks(&self) -> u32 {
        self.window_height_in_chunks
    }

    /// Chunk width in pixels.
    #[inline]
    #[must_use]
    pub const fn chunk_width_in_pixels(&self) -> u32 {
        self.chunk_size_in_tiles * self.tile_width
    }

    /// Chunk height in pixels.
    #[inline]
    #[must_use]
    pub const fn chunk_height_in_pixels(&self) -> u32 {
        self.chunk_size_in_tiles * self.tile_height
    }

    /// Chunk size in pixels as `(width, height)`.
    #[inline]
    #[must_use]
    pub const fn chunk_pixel_extent(&self) -> (u32, u32) {
        (self.chunk_width_in_pixels(), self.chunk_height_in_pixels())
    }

    /// Window size in pixels as `(width, height)`.
    #[inline]
    #[must_use]
    pub const fn world_pixel_extent(&self) -> (u32, u32) {
        (
            self.chunk_width_in_pixels() * self.window_width_in_chunks,
            self.chunk_height_in_pixels() * self.window_height_in_chunks,
        )
    }

    /// Number of tiles in one chunk.
    #[inline]
    #[must_use]
    pub const fn chunk_area_in_tiles(&self) -> usize {
        (self.chunk_size_in_tiles as usize) * (self.chunk_size_in_tiles as usize)
    }

    /// Number of chunks in the window.
    #[inline]
    #[must_use]
    pub const fn window_area_in_chunks(&self) -> usize {
        (self.window_width_in_chunks as usize) * (self.window_height_in_chunks as usize)
    }

    /// Tile containing `pixel`, clamped to the supported range.
    #[inline]
    #[must_use]
    pub fn pixel_to_tile(&self, pixel: PixelPos) -> TileCoord {
        self.clamp_tile(TileCoord::new(
            floor_div(pixel.x, self.tile_width),
            floor_div(pixel.y, self.tile_height),
        ))
    }

    /// Chunk containing `pixel`, clamped to the supported range.
    #[inline]
    #[must_use]
    pub fn pixel_to_chunk(&self, pixel: PixelPos) -> ChunkCoord {
        self.clamp_chunk(ChunkCoord::new(
            floor_div(pixel.x, self.chunk_width_in_pixels()),
            floor_div(pixel.y, self.chunk_height_in_pixels()),
        ))
    }

    /// Chunk containing `tile`, clamped to the supported range.
    #[inline]
    #[must_use]
    pub const fn tile_to_chunk(&self, tile: TileCoord) -> ChunkCoord {
        let size = self.chunk_size_in_tiles as i32;
        self.clamp_chunk(ChunkCoord::new(tile.x.div_euclid(size), tile.y.div_euclid(size)))
    }

    /// Top-left tile of `chunk` (clamped to the supported range first).
    #[inline]
    #[must_use]
    pub const fn chunk_to_tile(&self, chunk: ChunkCoord) -> TileCoord {
        let chunk = self.clamp_chunk(chunk);
        let size = self.chunk_size_in_tiles as i32;
        TileCoord::new(chunk.x * size, chunk.y * size)
    }

    /// Top-left pixel of `chunk` (clamped to the supported range first).
    #[inline]
    #[must_use]
    pub fn chunk_to_pixel(&self, chunk: ChunkCoord) -> PixelPos {
        let chunk = self.clamp_chunk(chunk);
        PixelPos::new(
            scale(chunk.x, self.chunk_width_in_pixels()),
            scale(chunk.y, self.chunk_height_in_pixels()),
        )
    }

    /// Top-left pixel of the chunk edge `edge`, which may lie one chunk
    /// past the supported range (exclusive window edges).
    #[inline]
    #[must_use]
    pub fn chunk_edge_to_pixel(&self, edge: ChunkCoord) -> PixelPos {
        let limit = self.chunk_limit + 1;
        PixelPos::new(
            scale(clamp_axis(edge.x, limit), self.chunk_width_in_pixels()),
            scale(clamp_axis(edge.y, limit), self.chunk_height_in_pixels()),
        )
    }

    /// Top-left pixel of `tile`.
    #[inline]
    #[must_use]
    pub fn tile_to_pixel(&self, tile: TileCoord) -> PixelPos {
        PixelPos::new(
            scale(tile.x, self.tile_width),
            scale(tile.y, self.tile_height),
        )
    }

    /// Center pixel of `tile`.
    #[inline]
    #[must_use]
    pub fn tile_center_pixel(&self, tile: TileCoord) -> PixelPos {
        let top_left = self.tile_to_pixel(tile);
        PixelPos::new(
            top_left.x + f64::from(self.tile_width) / 2.0,
            top_left.y + f64::from(self.tile_height) / 2.0,
        )
    }

    /// Pixel bounds of `chunk`.
    ///
    /// The right and bottom edges belong to the next chunk; use
    /// [`CoordinateConverter::pixel_to_chunk`] for exact membership.
    #[must_use]
    pub fn chunk_pixel_rect(&self, chunk: ChunkCoord) -> PixelRect {
        let top_left = self.chunk_to_pixel(chunk);
        PixelRect::new(
            top_left.x,
            top_left.y,
            top_left.x + f64::from(self.chunk_width_in_pixels()),
            top_left.y + f64::from(self.chunk_height_in_pixels()),
        )
    }

    /// Returns true if `pixel` falls inside `tile`.
    ///
    /// Used to decide which tile owns a tree whose position was derived
    /// from a coarser grid.
    #[inline]
    #[must_use]
    pub fn tile_contains_pixel(&self, tile: TileCoord, pixel: PixelPos) -> bool {
        self.pixel_to_tile(pixel) == tile
    }
}

/// Floor division of a pixel value by a cell size.
///
/// Saturates at the `i32` range; NaN maps to zero.
#[inline]
fn floor_div(value: f64, cell: u32) -> i32 {
    (value / f64::from(cell)).floor() as i32
}

/// Multiplies a cell index by a cell size, producing a pixel value.
///
/// Exact: both factors are bounded well below 2^53.
#[inline]
fn scale(index: i32, cell: u32) -> f64 {
    f64::from(index) * f64::from(cell)
}

#[inline]
const fn clamp_axis(value: i32, limit: i32) -> i32 {
    clamp_range(value, -limit, limit)
}

#[inline]
const fn clamp_range(value: i32, low: i32, high: i32) -> i32 {
    if value < low {
        low
    } else if value > high {
        high
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units() -> CoordinateConverter {
        CoordinateConverter::new(60, 60, 5, 3, 3).unwrap()
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let err = CoordinateConverter::new(60, 0, 5, 3, 3).unwrap_err();
        assert!(matches!(err, WorldError::ZeroDimension { what: "tile_height" }));
        assert!(CoordinateConverter::new(60, 60, 5, 0, 3).is_err());
    }

    #[test]
    fn test_extents() {
        let units = units();
        assert_eq!(units.chunk_pixel_extent(), (300, 300));
        assert_eq!(units.world_pixel_extent(), (900, 900));
        assert_eq!(units.chunk_area_in_tiles(), 25);
        assert_eq!(units.window_area_in_chunks(), 9);
    }

    #[test]
    fn test_negative_coordinates_floor() {
        let units = units();
        assert_eq!(units.pixel_to_tile(PixelPos::new(-1.0, -60.0)), TileCoord::new(-1, -1));
        assert_eq!(units.pixel_to_tile(PixelPos::new(-60.5, 0.0)), TileCoord::new(-2, 0));
        assert_eq!(units.pixel_to_chunk(PixelPos::new(-0.1, 299.9)), ChunkCoord::new(-1, 0));
        assert_eq!(units.tile_to_chunk(TileCoord::new(-1, -5)), ChunkCoord::new(-1, -1));
        assert_eq!(units.tile_to_chunk(TileCoord::new(-6, 4)), ChunkCoord::new(-2, 0));
    }

    #[test]
    fn test_rejects_oversized_dimensions() {
        let err = CoordinateConverter::new(60, 60, MAX_DIMENSION + 1, 3, 3).unwrap_err();
        assert!(matches!(err, WorldError::DimensionTooLarge { what: "chunk_size_in_tiles", .. }));
        assert!(CoordinateConverter::new(MAX_DIMENSION, MAX_DIMENSION, MAX_DIMENSION, MAX_DIMENSION, MAX_DIMENSION).is_ok());
    }

    #[test]
    fn test_chunk_round_trip() {
        let units = units();
        for cy in -40..40 {
            for cx in -40..40 {
                let chunk = ChunkCoord::new(cx * 7, cy * 13);
                assert_eq!(units.pixel_to_chunk(units.chunk_to_pixel(chunk)), chunk);
                assert_eq!(units.tile_to_chunk(units.chunk_to_tile(chunk)), chunk);
            }
        }
    }

    #[test]
    fn test_chunk_round_trip_up_to_limit() {
        let limit = units().chunk_limit();
        let far = [223_703, 1_000_001, 5_000_003, limit / 2, limit - 1, limit];
        for units in [units(), CoordinateConverter::new(MAX_DIMENSION, 1, MAX_DIMENSION, 3, 3).unwrap()] {
            let limit = units.chunk_limit();
            for c in far.iter().copied().filter(|c| *c <= limit).chain([limit, limit - 1]) {
                for chunk in [ChunkCoord::new(c, -c), ChunkCoord::new(-c, c)] {
                    assert_eq!(units.pixel_to_chunk(units.chunk_to_pixel(chunk)), chunk);
                    assert_eq!(units.tile_to_chunk(units.chunk_to_tile(chunk)), chunk);
                    let rect = units.chunk_pixel_rect(chunk);
                    assert_eq!(units.pixel_to_chunk(PixelPos::new(rect.left, rect.top)), chunk);
                }
            }
        }
    }

    #[test]
    fn test_extreme_inputs_clamp() {
        let units = units();
        let limit = units.chunk_limit();
        assert!(limit > 1_000_000);

        assert_eq!(units.pixel_to_chunk(PixelPos::new(1.0e12, -1.0e12)), ChunkCoord::new(limit, -limit));
        assert_eq!(units.pixel_to_chunk(PixelPos::new(f64::MAX, f64::NAN)), ChunkCoord::new(limit, 0));
        assert_eq!(units.chunk_to_tile(ChunkCoord::new(i32::MAX / 2, i32::MIN)), units.chunk_to_tile(ChunkCoord::new(limit, -limit)));
        assert_eq!(units.tile_to_chunk(TileCoord::new(i32::MAX, i32::MIN)), ChunkCoord::new(limit, -limit));

        let pixel = PixelPos::new(-1.0e15, 3.0e14);
        assert_eq!(units.tile_to_chunk(units.pixel_to_tile(pixel)), units.pixel_to_chunk(pixel));
    }

    #[test]
    fn test_tile_round_trip_and_center() {
        let units = units();
        let tile = TileCoord::new(-3, 7);
        assert_eq!(units.pixel_to_tile(units.tile_to_pixel(tile)), tile);
        assert_eq!(units.tile_center_pixel(tile), PixelPos::new(-150.0, 450.0));
    }

    #[test]
    fn test_tile_contains_pixel() {
        let units = units();
        let tile = TileCoord::new(1, 1);
        assert!(units.tile_contains_pixel(tile, PixelPos::new(60.0, 60.0)));
        assert!(units.tile_contains_pixel(tile, PixelPos::new(119.9, 119.9)));
        assert!(!units.tile_contains_pixel(tile, PixelPos::new(120.0, 60.0)));
        assert!(!units.tile_contains_pixel(tile, PixelPos::new(59.9, 60.0)));
    }

    #[test]
    fn test_chunk_pixel_rect() {
        let units = units();
        let rect = units.chunk_pixel_rect(ChunkCoord::new(-1, 2));
        assert_eq!(rect, PixelRect::new(-300.0, 600.0, 0.0, 900.0));
        assert_eq!(units.chunk_edge_to_pixel(ChunkCoord::new(2, -1)), PixelPos::new(600.0, -300.0));
    }

    #[test]
    fn test_rect_contains_edges() {
        let rect = PixelRect::around(PixelPos::new(0.0, 0.0), 10.0);
        assert!(rect.contains(PixelPos::new(10.0, -10.0)));
        assert!(!rect.contains(PixelPos::new(10.1, 0.0)));
    }
}
