//! # Vegetation
//!
//! Trees live on a tree-cell grid that is at least as coarse as the tile
//! grid. Each cell hashes to one candidate position and one tree variant.
//! The tile containing the candidate owns the tree, so a tree is never
//! produced twice, even when its cell straddles a chunk boundary.
//!
//! A tile overlaps at most a 2x2 block of cells, which bounds the work per
//! tile at four candidates.

use wildgrove_core::{CoordinateConverter, ObjectType, PixelPos, TileCoord, VegetationConfig};

use crate::noise::{lattice, WorldSeed};

/// Cumulative variant probabilities, in ascending order.
const VARIANT_BANDS: [(f64, ObjectType); 6] = [
    (0.40, ObjectType::LittleOak),
    (0.65, ObjectType::BigOak),
    (0.82, ObjectType::HeightOak),
    (0.91, ObjectType::DeadLittleOak),
    (0.97, ObjectType::DeadBigOak),
    (1.00, ObjectType::DeadHeightOak),
];

/// Tree-cell coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeCell {
    /// X coordinate (in cells).
    pub x: i32,
    /// Y coordinate (in cells).
    pub y: i32,
}

/// A tree decided by the placer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreePlacement {
    /// Cell the tree was hashed from.
    pub cell: TreeCell,
    /// Pixel position of the tree.
    pub position: PixelPos,
    /// Tree variant.
    pub kind: ObjectType,
}

/// Seeded tree placement on the tree-cell grid.
#[derive(Clone, Debug)]
pub struct TreePlacer {
    units: CoordinateConverter,
    cell_width: u32,
    cell_height: u32,
    min_height: f64,
    max_height: f64,
    offset_x_seed: WorldSeed,
    offset_y_seed: WorldSeed,
    variant_seed: WorldSeed,
}

impl TreePlacer {
    /// Creates a placer.
    ///
    /// # Arguments
    ///
    /// * `units` - Tile geometry
    /// * `config` - Cell size and height band; cells must not be smaller than a tile
    /// * `seed` - Vegetation sub-seed
    #[must_use]
    pub fn new(units: CoordinateConverter, config: &VegetationConfig, seed: WorldSeed) -> Self {
        debug_assert!(config.cell_width >= units.tile_width());
        debug_assert!(config.cell_height >= units.tile_height());

        Self {
            units,
            cell_width: config.cell_width,
            cell_height: config.cell_height,
            min_height: config.min_height,
            max_height: config.max_height,
            offset_x_seed: seed.derive(1),
            offset_y_seed: seed.derive(2),
            variant_seed: seed.derive(3),
        }
    }

    /// Decides the tree owned by `tile`.
    ///
    /// Candidates of the overlapped cells are tried top-to-bottom,
    /// left-to-right. The first one lying inside the tile wins, provided
    /// the tile height is inside the vegetation band.
    #[must_use]
    pub fn place(&self, tile: TileCoord, height: f64) -> Option<TreePlacement> {
        if !(self.min_height..=self.max_height).contains(&height) {
            return None;
        }

        let (first_x, last_x) = overlapped_cells(tile.x, self.units.tile_width(), self.cell_width);
        let (first_y, last_y) = overlapped_cells(tile.y, self.units.tile_height(), self.cell_height);

        for cell_y in first_y..=last_y {
            for cell_x in first_x..=last_x {
                let candidate = self.candidate(TreeCell { x: cell_x, y: cell_y });
                if self.units.tile_contains_pixel(tile, candidate.position) {
                    return Some(candidate);
                }
            }
        }

        None
    }

    /// Candidate tree of `cell`, ignoring terrain.
    #[must_use]
    pub fn candidate(&self, cell: TreeCell) -> TreePlacement {
        let x = cell_axis_position(cell.x, self.cell_width, lattice(cell.x, cell.y, self.offset_x_seed));
        let y = cell_axis_position(cell.y, self.cell_height, lattice(cell.x, cell.y, self.offset_y_seed));

        TreePlacement {
            cell,
            position: PixelPos::new(x, y),
            kind: variant_for(lattice(cell.x, cell.y, self.variant_seed)),
        }
    }

    /// Candidate tree of the cell containing `pixel`.
    #[must_use]
    pub fn candidate_for_pixel(&self, pixel: PixelPos) -> TreePlacement {
        let cell = TreeCell {
            x: (pixel.x / f64::from(self.cell_width)).floor() as i32,
            y: (pixel.y / f64::from(self.cell_height)).floor() as i32,
        };
        self.candidate(cell)
    }
}

/// Maps a cell hash in [0, 1) to a tree variant.
#[must_use]
pub fn variant_for(value: f64) -> ObjectType {
    VARIANT_BANDS
        .iter()
        .find(|(limit, _)| value < *limit)
        .map_or(ObjectType::DeadHeightOak, |(_, kind)| *kind)
}

/// Pixel at `fraction` of the way through `cell` along one axis.
///
/// The result always lies in `[start, start + size)`: far from the origin
/// the sum can round up onto the next cell's edge, so it is pulled back
/// to the largest float below it.
fn cell_axis_position(cell: i32, size: u32, fraction: f64) -> f64 {
    let start = f64::from(cell) * f64::from(size);
    let end = start + f64::from(size);
    let position = start + fraction * f64::from(size);
    if position < end {
        position
    } else {
        next_below(end)
    }
}

/// Largest `f64` strictly below a finite `value`.
fn next_below(value: f64) -> f64 {
    if value > 0.0 {
        f64::from_bits(value.to_bits() - 1)
    } else if value < 0.0 {
        f64::from_bits(value.to_bits() + 1)
    } else {
        -f64::from_bits(1)
    }
}

/// First and last cell overlapped by a tile along one axis.
fn overlapped_cells(tile: i32, tile_size: u32, cell_size: u32) -> (i32, i32) {
    let first_pixel = i64::from(tile) * i64::from(tile_size);
    let last_pixel = first_pixel + i64::from(tile_size) - 1;
    let cell_size = i64::from(cell_size);
    (
        first_pixel.div_euclid(cell_size) as i32,
        last_pixel.div_euclid(cell_size) as i32,
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn placer(cell: u32, min_height: f64, max_height: f64) -> TreePlacer {
        let units = CoordinateConverter::new(60, 60, 5, 11, 11).unwrap();
        let config = VegetationConfig {
            cell_width: cell,
            cell_height: cell,
            min_height,
            max_height,
        };
        TreePlacer::new(units, &config, WorldSeed::new(2024))
    }

    #[test]
    fn test_overlapped_cells() {
        assert_eq!(overlapped_cells(0, 60, 90), (0, 0));
        assert_eq!(overlapped_cells(1, 60, 90), (0, 1));
        assert_eq!(overlapped_cells(2, 60, 90), (1, 1));
        assert_eq!(overlapped_cells(-1, 60, 90), (-1, -1));
        assert_eq!(overlapped_cells(-2, 60, 90), (-2, -1));
        assert_eq!(overlapped_cells(5, 60, 60), (5, 5));
    }

    #[test]
    fn test_height_band_is_inclusive() {
        let placer = placer(60, 0.6, 0.75);
        let tile = TileCoord::new(4, -9);

        // Equal cell and tile sizes: the only candidate always lies in the tile
        assert!(placer.place(tile, 0.6).is_some());
        assert!(placer.place(tile, 0.75).is_some());
        assert!(placer.place(tile, 0.59).is_none());
        assert!(placer.place(tile, 0.76).is_none());
    }

    #[test]
    fn test_tree_lies_in_its_tile() {
        let placer = placer(90, 0.0, 1.0);
        let units = CoordinateConverter::new(60, 60, 5, 11, 11).unwrap();

        for y in -30..30 {
            for x in -30..30 {
                let tile = TileCoord::new(x, y);
                if let Some(tree) = placer.place(tile, 0.5) {
                    assert_eq!(units.pixel_to_tile(tree.position), tile);
                    assert!(tree.kind.is_tree());
                }
            }
        }
    }

    #[test]
    fn test_no_cell_produces_two_trees() {
        let placer = placer(90, 0.0, 1.0);
        let mut owners: HashMap<TreeCell, TileCoord> = HashMap::new();

        for y in -40..40 {
            for x in -40..40 {
                let tile = TileCoord::new(x, y);
                if let Some(tree) = placer.place(tile, 0.5) {
                    if let Some(previous) = owners.insert(tree.cell, tile) {
                        panic!("cell {:?} placed in {previous:?} and {tile:?}", tree.cell);
                    }
                }
            }
        }

        assert!(!owners.is_empty());
    }

    #[test]
    fn test_determinism() {
        let a = placer(90, 0.0, 1.0);
        let b = placer(90, 0.0, 1.0);

        for i in -50..50 {
            let tile = TileCoord::new(i, i * 3 - 7);
            assert_eq!(a.place(tile, 0.7), b.place(tile, 0.7));
        }
    }

    #[test]
    fn test_candidate_for_pixel_matches_cell() {
        let placer = placer(90, 0.0, 1.0);
        let tree = placer.candidate(TreeCell { x: -3, y: 2 });

        assert_eq!(placer.candidate_for_pixel(tree.position).cell, tree.cell);
        assert_eq!(placer.candidate_for_pixel(PixelPos::new(-270.0, 180.0)), tree);
    }

    #[test]
    fn test_cell_position_stays_below_next_edge() {
        let largest_hash = 1.0 - 1.0 / 4_294_967_296.0;
        let start = f64::from(1_i32 << 30) * 90.0;
        let end = start + 90.0;

        // The plain sum rounds onto the next cell's edge this far out
        assert_eq!(start + largest_hash * 90.0, end);

        let position = cell_axis_position(1 << 30, 90, largest_hash);
        assert!(position >= start && position < end);
        assert!(cell_axis_position(-1, 90, largest_hash) < 0.0);
        assert_eq!(cell_axis_position(-1, 90, 0.0), -90.0);
        assert_eq!(next_below(0.0), -f64::from_bits(1));
    }

    #[test]
    fn test_far_cells_keep_their_tree() {
        let placer = placer(90, 0.0, 1.0);
        let units = CoordinateConverter::new(60, 60, 5, 11, 11).unwrap();
        let base = 1_i32 << 28;

        for y in base..base + 20 {
            for x in base..base + 20 {
                let candidate = placer.candidate(TreeCell { x, y });
                let owner = units.pixel_to_tile(candidate.position);
                let (first_x, last_x) = overlapped_cells(owner.x, 60, 90);
                let (first_y, last_y) = overlapped_cells(owner.y, 60, 90);
                assert!((first_x..=last_x).contains(&x) && (first_y..=last_y).contains(&y));
                assert!(placer.place(owner, 0.5).is_some());
            }
        }
    }

    #[test]
    fn test_variant_bands() {
        assert_eq!(variant_for(0.0), ObjectType::LittleOak);
        assert_eq!(variant_for(0.5), ObjectType::BigOak);
        assert_eq!(variant_for(0.8), ObjectType::HeightOak);
        assert_eq!(variant_for(0.9), ObjectType::DeadLittleOak);
        assert_eq!(variant_for(0.95), ObjectType::DeadBigOak);
        assert_eq!(variant_for(0.999), ObjectType::DeadHeightOak);
    }
}
