//! # Grid Window
//!
//! The resident window of chunks around the focal point.
//!
//! The window is a dense, row-major array indexed by the offset from its
//! top-left chunk. Lookups are arithmetic, never a search. The array and
//! the border are only ever replaced together, at the end of
//! [`GridContainer::recenter`].
//!
//! ## Centering
//!
//! The window origin is `center - size / 2` per axis, with integer
//! division. For even sizes the focal chunk sits right of (below) the
//! middle, so the extra chunk lands toward the top-left. Near the edge of
//! the supported chunk range the origin is clamped so the whole window
//! stays inside it.

use std::mem;

use tracing::{debug, info};
use wildgrove_core::{ChunkCoord, ChunkKey, CoordinateConverter, ObjectType, PixelPos, PixelRect};

use crate::chunk::Chunk;
use crate::object::{ObjectHandle, ObjectPool, WorldObject};

/// Window bounds in chunk and pixel units.
///
/// Right and bottom edges are exclusive in both units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowBorder {
    /// Leftmost chunk column.
    pub chunk_left: i32,
    /// Topmost chunk row.
    pub chunk_top: i32,
    /// One past the rightmost chunk column.
    pub chunk_right: i32,
    /// One past the bottom chunk row.
    pub chunk_bottom: i32,
    /// Left pixel edge.
    pub pixel_left: f64,
    /// Top pixel edge.
    pub pixel_top: f64,
    /// Right pixel edge.
    pub pixel_right: f64,
    /// Bottom pixel edge.
    pub pixel_bottom: f64,
}

impl WindowBorder {
    /// Border of the window whose top-left chunk is `origin`.
    #[must_use]
    pub fn new(units: &CoordinateConverter, origin: ChunkCoord) -> Self {
        let end = ChunkCoord::new(
            origin.x + units.window_width_in_chunks() as i32,
            origin.y + units.window_height_in_chunks() as i32,
        );
        let top_left = units.chunk_to_pixel(origin);
        let bottom_right = units.chunk_edge_to_pixel(end);

        Self {
            chunk_left: origin.x,
            chunk_top: origin.y,
            chunk_right: end.x,
            chunk_bottom: end.y,
            pixel_left: top_left.x,
            pixel_top: top_left.y,
            pixel_right: bottom_right.x,
            pixel_bottom: bottom_right.y,
        }
    }

    /// Top-left chunk.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> ChunkCoord {
        ChunkCoord::new(self.chunk_left, self.chunk_top)
    }

    /// Width in chunks.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        (self.chunk_right - self.chunk_left) as usize
    }

    /// Height in chunks.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        (self.chunk_bottom - self.chunk_top) as usize
    }

    /// Returns true if `coord` lies inside the window.
    #[inline]
    #[must_use]
    pub const fn contains_chunk(&self, coord: ChunkCoord) -> bool {
        coord.x >= self.chunk_left
            && coord.x < self.chunk_right
            && coord.y >= self.chunk_top
            && coord.y < self.chunk_bottom
    }

    /// Returns true if `pixel` lies inside the window.
    #[inline]
    #[must_use]
    pub fn contains_pixel(&self, pixel: PixelPos) -> bool {
        pixel.x >= self.pixel_left
            && pixel.x < self.pixel_right
            && pixel.y >= self.pixel_top
            && pixel.y < self.pixel_bottom
    }

    /// Row-major slot of `coord`, or `None` outside the window.
    #[inline]
    #[must_use]
    pub const fn local_index(&self, coord: ChunkCoord) -> Option<usize> {
        if !self.contains_chunk(coord) {
            return None;
        }
        let local_x = (coord.x - self.chunk_left) as usize;
        let local_y = (coord.y - self.chunk_top) as usize;
        Some(local_x + local_y * self.width())
    }

    /// Chunk coordinates of the window, row-major.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> {
        let (left, right) = (self.chunk_left, self.chunk_right);
        (self.chunk_top..self.chunk_bottom).flat_map(move |y| (left..right).map(move |x| ChunkCoord::new(x, y)))
    }
}

/// What a recenter changed.
#[derive(Clone, Debug, PartialEq)]
pub struct RecenterOutcome {
    /// Border before the recenter.
    pub previous: WindowBorder,
    /// Border after the recenter.
    pub current: WindowBorder,
    /// Chunks generated by this recenter, row-major.
    pub created: Vec<ChunkKey>,
    /// Chunks torn down by this recenter, in former window order.
    pub destroyed: Vec<ChunkKey>,
}

impl RecenterOutcome {
    /// Returns true if the window did not move.
    #[inline]
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.created.is_empty() && self.destroyed.is_empty()
    }
}

/// Hooks run by [`GridContainer::recenter`] on entering and leaving chunks.
pub trait ChunkLifecycle {
    /// Error raised while populating a chunk.
    type Error;

    /// Fills a freshly created chunk. `window` is the border being moved to.
    ///
    /// # Errors
    ///
    /// Any error aborts the recenter and leaves the window untouched.
    fn populate(&mut self, chunk: &mut Chunk, window: &WindowBorder) -> Result<(), Self::Error>;

    /// Empties a chunk that is about to be discarded.
    fn retire(&mut self, chunk: &mut Chunk);
}

/// Owner of the resident chunk window.
#[derive(Debug)]
pub struct GridContainer {
    units: CoordinateConverter,
    border: WindowBorder,
    chunks: Vec<Chunk>,
    next_generation: u32,
}

impl GridContainer {
    /// Creates an empty container.
    ///
    /// The border starts centered on pixel `(0, 0)` but holds no chunks
    /// until the first [`GridContainer::recenter`].
    #[must_use]
    pub fn new(units: CoordinateConverter) -> Self {
        let origin = Self::origin_for(&units, PixelPos::default());
        Self {
            units,
            border: WindowBorder::new(&units, origin),
            chunks: Vec::new(),
            next_generation: 1,
        }
    }

    /// Returns the coordinate converter.
    #[inline]
    #[must_use]
    pub const fn units(&self) -> &CoordinateConverter {
        &self.units
    }

    /// Returns the current border.
    #[inline]
    #[must_use]
    pub const fn border(&self) -> &WindowBorder {
        &self.border
    }

    /// Returns true once the window holds chunks.
    #[inline]
    #[must_use]
    pub fn is_populated(&self) -> bool {
        !self.chunks.is_empty()
    }

    /// Number of resident chunks.
    #[inline]
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Resident chunks, row-major.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    /// Top-left chunk of the window centered on `focal`.
    #[must_use]
    pub fn window_origin_for(&self, focal: PixelPos) -> ChunkCoord {
        Self::origin_for(&self.units, focal)
    }

    fn origin_for(units: &CoordinateConverter, focal: PixelPos) -> ChunkCoord {
        let center = units.pixel_to_chunk(focal);
        let limit = units.chunk_limit();
        let (width, height) = (
            units.window_width_in_chunks() as i32,
            units.window_height_in_chunks() as i32,
        );
        ChunkCoord::new(
            (center.x - width / 2).clamp(-limit, limit - width + 1),
            (center.y - height / 2).clamp(-limit, limit - height + 1),
        )
    }

    /// Moves the window to surround `focal`.
    ///
    /// 1. Computes the new origin. If it equals the current one and the
    ///    window is populated, nothing happens.
    /// 2. Creates and populates every chunk of the new window that is not
    ///    resident now. Resident chunks are reused as they are.
    /// 3. Retires every resident chunk falling outside the new window.
    /// 4. Swaps in the new array and border together.
    ///
    /// # Errors
    ///
    /// If populating a chunk fails, the chunks created so far are retired
    /// and the error is returned. The window is left exactly as it was.
    pub fn recenter<L: ChunkLifecycle>(
        &mut self,
        focal: PixelPos,
        lifecycle: &mut L,
    ) -> Result<RecenterOutcome, L::Error> {
        let previous = self.border;
        let origin = self.window_origin_for(focal);

        if self.is_populated() && origin == previous.origin() {
            return Ok(RecenterOutcome {
                previous,
                current: previous,
                created: Vec::new(),
                destroyed: Vec::new(),
            });
        }

        let next = WindowBorder::new(&self.units, origin);

        let mut entering: Vec<(usize, Chunk)> = Vec::new();
        for (index, coord) in next.coords().enumerate() {
            if self.get_chunk(coord).is_some() {
                continue;
            }

            let key = ChunkKey::new(coord, self.next_generation);
            self.next_generation = self.next_generation.wrapping_add(1);

            let mut chunk = Chunk::new(key, &self.units);
            if let Err(err) = lifecycle.populate(&mut chunk, &next) {
                lifecycle.retire(&mut chunk);
                for (_, mut created) in entering {
                    lifecycle.retire(&mut created);
                }
                return Err(err);
            }
            entering.push((index, chunk));
        }

        let mut slots: Vec<Option<Chunk>> = (0..self.units.window_area_in_chunks()).map(|_| None).collect();
        let mut destroyed = Vec::new();
        for mut chunk in mem::take(&mut self.chunks) {
            match next.local_index(chunk.coord()) {
                Some(index) => slots[index] = Some(chunk),
                None => {
                    lifecycle.retire(&mut chunk);
                    destroyed.push(chunk.key());
                }
            }
        }

        let mut created = Vec::with_capacity(entering.len());
        for (index, chunk) in entering {
            created.push(chunk.key());
            slots[index] = Some(chunk);
        }

        self.chunks = slots.into_iter().flatten().collect();
        self.border = next;
        debug_assert_eq!(self.chunks.len(), self.units.window_area_in_chunks());

        info!(
            left = origin.x,
            top = origin.y,
            created = created.len(),
            destroyed = destroyed.len(),
            "window recentered"
        );

        Ok(RecenterOutcome {
            previous,
            current: next,
            created,
            destroyed,
        })
    }

    /// Returns true if `coord` is inside the window.
    #[inline]
    #[must_use]
    pub const fn is_chunk_in_window(&self, coord: ChunkCoord) -> bool {
        self.border.contains_chunk(coord)
    }

    /// Returns true if `pixel` is inside the window.
    #[inline]
    #[must_use]
    pub fn is_pixel_in_window(&self, pixel: PixelPos) -> bool {
        self.border.contains_pixel(pixel)
    }

    /// Returns true if `pixel` is closer than `margin` pixels to any window
    /// edge, or outside the window altogether.
    #[must_use]
    pub fn distance_to_border(&self, pixel: PixelPos, margin: f64) -> bool {
        let border = &self.border;
        pixel.x - border.pixel_left < margin
            || border.pixel_right - pixel.x < margin
            || pixel.y - border.pixel_top < margin
            || border.pixel_bottom - pixel.y < margin
    }

    /// Resident chunk at `coord`, or `None` outside the window.
    #[must_use]
    pub fn get_chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.border.local_index(coord).and_then(|index| self.chunks.get(index))
    }

    /// Resident chunk at `coord`, mutably.
    pub fn get_chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.border.local_index(coord).and_then(|index| self.chunks.get_mut(index))
    }

    /// Resident chunk containing `pixel`.
    #[must_use]
    pub fn get_chunk_by_pixel(&self, pixel: PixelPos) -> Option<&Chunk> {
        self.get_chunk(self.units.pixel_to_chunk(pixel))
    }

    /// Resident chunk instance named by `key`.
    ///
    /// `None` if the coordinate left the window or the chunk there was
    /// regenerated since the key was taken.
    #[must_use]
    pub fn resolve(&self, key: ChunkKey) -> Option<&Chunk> {
        self.get_chunk(key.coord).filter(|chunk| chunk.key() == key)
    }

    /// Resident chunk instance named by `key`, mutably.
    pub fn resolve_mut(&mut self, key: ChunkKey) -> Option<&mut Chunk> {
        self.get_chunk_mut(key.coord).filter(|chunk| chunk.key() == key)
    }

    /// Visits every live object of `kind` whose position lies in `area`.
    ///
    /// Only chunks overlapping `area` (clipped to the window) are scanned;
    /// each object is then checked against the exact rectangle, edges
    /// included. Returns the number of objects visited.
    pub fn for_each_object_in_area(
        &self,
        kind: ObjectType,
        area: PixelRect,
        pool: &ObjectPool,
        mut visitor: impl FnMut(ObjectHandle, &WorldObject),
    ) -> usize {
        if area.left > area.right || area.top > area.bottom {
            return 0;
        }

        let first = self.units.pixel_to_chunk(PixelPos::new(area.left, area.top));
        let last = self.units.pixel_to_chunk(PixelPos::new(area.right, area.bottom));
        let left = first.x.max(self.border.chunk_left);
        let top = first.y.max(self.border.chunk_top);
        let right = last.x.min(self.border.chunk_right - 1);
        let bottom = last.y.min(self.border.chunk_bottom - 1);

        let mut visited = 0;
        for y in top..=bottom {
            for x in left..=right {
                let Some(chunk) = self.get_chunk(ChunkCoord::new(x, y)) else {
                    continue;
                };
                for &handle in chunk.objects(kind) {
                    if let Some(object) = pool.get(handle) {
                        if area.contains(object.position) {
                            visitor(handle, object);
                            visited += 1;
                        }
                    }
                }
            }
        }

        debug!(kind = kind.name(), visited, "area query");
        visited
    }
}
