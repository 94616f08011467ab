//! # Value Noise
//!
//! Deterministic, multi-octave value noise over the tile grid.
//!
//! ## Determinism Guarantee
//!
//! The lattice hash uses only wrapping `u32` multiplication, XOR and
//! shifts. Given the same seed and coordinates it produces **exactly** the
//! same bits on any platform, in any process, every time. A chunk that
//! leaves the window and comes back is regenerated identically.

use wildgrove_core::{CoordinateConverter, PixelPos, TileCoord, WorldConfig};

use crate::biome::{TerrainClassifier, TileKind};
use crate::vegetation::{TreePlacement, TreePlacer};

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u32);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose (e.g., tree variants).
    ///
    /// Independent streams from one seed, so terrain and vegetation do not
    /// correlate.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u32) -> Self {
        let mut hash = self.0 ^ purpose.wrapping_mul(0x9E37_79B9);
        hash = hash.wrapping_mul(0x85EB_CA6B);
        hash ^= hash >> 13;
        hash = hash.wrapping_mul(0xC2B2_AE35);
        hash ^= hash >> 16;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(421_337)
    }
}

/// Hashes an integer lattice point to a value in `[0, 1)`.
///
/// This is the base of every random decision in the world.
#[inline]
#[must_use]
pub fn lattice(x: i32, y: i32, seed: WorldSeed) -> f64 {
    let mut n = (x as u32)
        .wrapping_mul(374_761_393)
        .wrapping_add((y as u32).wrapping_mul(668_265_263))
        .wrapping_add(seed.0.wrapping_mul(144_665_633));
    n = (n ^ (n >> 13)).wrapping_mul(1_274_126_177);
    n ^= n >> 16;
    f64::from(n) / 4_294_967_296.0
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Octave parameters for [`OctaveNoise`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OctaveParams {
    /// Number of octaves summed.
    pub octaves: u32,
    /// Amplitude multiplier per octave.
    pub persistence: f64,
    /// Frequency of the first octave.
    pub frequency: f64,
    /// Frequency multiplier per octave.
    pub frequency_multiplier: f64,
}

/// Multi-octave, bilinearly interpolated value noise.
///
/// # Example
///
/// ```rust,ignore
/// let noise = OctaveNoise::new(WorldSeed::new(42), params);
/// let height = noise.sample(-120.0, 35.0);
/// assert!((0.0..1.0).contains(&height));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct OctaveNoise {
    seed: WorldSeed,
    params: OctaveParams,
}

impl OctaveNoise {
    /// Creates a noise sampler.
    #[must_use]
    pub const fn new(seed: WorldSeed, params: OctaveParams) -> Self {
        Self { seed, params }
    }

    /// Returns the seed.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Samples one octave at `frequency`.
    ///
    /// Bilinear interpolation between the four surrounding lattice values.
    #[must_use]
    pub fn interpolated(&self, x: f64, y: f64, frequency: f64) -> f64 {
        let x = x * frequency;
        let y = y * frequency;
        let left = x.floor();
        let top = y.floor();
        let local_x = x - left;
        let local_y = y - top;
        let (left, top) = (left as i32, top as i32);

        let top_left = lattice(left, top, self.seed);
        let top_right = lattice(left.wrapping_add(1), top, self.seed);
        let bottom_left = lattice(left, top.wrapping_add(1), self.seed);
        let bottom_right = lattice(left.wrapping_add(1), top.wrapping_add(1), self.seed);

        lerp(
            lerp(top_left, top_right, local_x),
            lerp(bottom_left, bottom_right, local_x),
            local_y,
        )
    }

    /// Sums all octaves, normalized by the amplitude sum.
    ///
    /// # Returns
    ///
    /// A value in the range [0, 1).
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.params.frequency;
        let mut max_amplitude = 0.0;

        for _ in 0..self.params.octaves {
            total += self.interpolated(x, y, frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= self.params.persistence;
            frequency *= self.params.frequency_multiplier;
        }

        if max_amplitude > 0.0 {
            total / max_amplitude
        } else {
            0.0
        }
    }
}

/// Seeded terrain field: heights, terrain classes and tree placement.
///
/// Every method is a pure function of the configuration it was built
/// from. Two fields built from the same configuration agree bit for bit.
#[derive(Clone, Debug)]
pub struct NoiseField {
    height: OctaveNoise,
    terrain: TerrainClassifier,
    trees: TreePlacer,
}

impl NoiseField {
    /// Purpose tag for the tree sub-seed.
    const TREE_PURPOSE: u32 = 0x7EE5;

    /// Builds the field from a world configuration.
    #[must_use]
    pub fn new(config: &WorldConfig, units: CoordinateConverter) -> Self {
        let seed = WorldSeed::new(config.noise.seed);
        let params = OctaveParams {
            octaves: config.noise.octaves,
            persistence: config.noise.persistence,
            frequency: config.noise.frequency,
            frequency_multiplier: config.noise.frequency_multiplier,
        };

        Self {
            height: OctaveNoise::new(seed, params),
            terrain: TerrainClassifier::new(&config.terrain),
            trees: TreePlacer::new(units, &config.vegetation, seed.derive(Self::TREE_PURPOSE)),
        }
    }

    /// Returns the world seed.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.height.seed()
    }

    /// Terrain height of a tile, in [0, 1).
    #[inline]
    #[must_use]
    pub fn sample(&self, tile: TileCoord) -> f64 {
        self.height.sample(f64::from(tile.x), f64::from(tile.y))
    }

    /// Terrain class for a height.
    #[inline]
    #[must_use]
    pub fn classify_tile(&self, height: f64) -> TileKind {
        self.terrain.classify(height)
    }

    /// Tree owned by `tile`, if any. See [`TreePlacer::place`].
    #[inline]
    #[must_use]
    pub fn place_tree(&self, tile: TileCoord, height: f64) -> Option<TreePlacement> {
        self.trees.place(tile, height)
    }

    /// Tree candidate of the cell containing `pixel`, ignoring the height band.
    #[inline]
    #[must_use]
    pub fn tree_candidate_at(&self, pixel: PixelPos) -> TreePlacement {
        self.trees.candidate_for_pixel(pixel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> OctaveParams {
        OctaveParams {
            octaves: 16,
            persistence: 0.5,
            frequency: 0.01,
            frequency_multiplier: 2.0,
        }
    }

    #[test]
    fn test_lattice_is_stable() {
        let seed = WorldSeed::new(12345);
        let a = lattice(3, -7, seed);
        let b = lattice(3, -7, seed);
        assert_eq!(a.to_bits(), b.to_bits());
        assert_ne!(lattice(3, -7, seed), lattice(-7, 3, seed));
    }

    #[test]
    fn test_lattice_reference_values() {
        assert_eq!(lattice(3, -7, WorldSeed::new(12345)).to_bits(), 0x3FEC_ED92_1BE0_0000);
    }

    #[test]
    fn test_lattice_range() {
        let seed = WorldSeed::new(99);
        for y in -200..200 {
            for x in -200..200 {
                let v = lattice(x * 31, y * 17, seed);
                assert!((0.0..1.0).contains(&v), "lattice {v} out of range at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_determinism() {
        let noise1 = OctaveNoise::new(WorldSeed::new(12345), params());
        let noise2 = OctaveNoise::new(WorldSeed::new(12345), params());

        for i in -100..100 {
            let x = f64::from(i) * 3.0;
            let y = f64::from(i) * -7.0;
            assert_eq!(
                noise1.sample(x, y).to_bits(),
                noise2.sample(x, y).to_bits(),
                "Noise should be deterministic"
            );
        }
    }

    #[test]
    fn test_different_seeds_different_results() {
        let noise1 = OctaveNoise::new(WorldSeed::new(1), params());
        let noise2 = OctaveNoise::new(WorldSeed::new(2), params());

        let differing = (0..50)
            .filter(|&i| noise1.sample(f64::from(i) * 10.0, 5.0) != noise2.sample(f64::from(i) * 10.0, 5.0))
            .count();
        assert!(differing > 40, "Different seeds should produce different results");
    }

    #[test]
    fn test_range() {
        let noise = OctaveNoise::new(WorldSeed::new(42), params());

        for i in 0..10_000 {
            let x = f64::from(i % 100) * 13.0 - 650.0;
            let y = f64::from(i / 100) * 11.0 - 550.0;
            let value = noise.sample(x, y);
            assert!((0.0..1.0).contains(&value), "Value {value} out of range at ({x}, {y})");
        }
    }

    #[test]
    fn test_continuity() {
        let noise = OctaveNoise::new(WorldSeed::new(42), params());

        // One octave at low frequency is smooth between neighbouring tiles
        let v1 = noise.interpolated(100.0, 100.0, 0.01);
        let v2 = noise.interpolated(101.0, 100.0, 0.01);
        assert!((v1 - v2).abs() < 0.05, "Noise should be continuous");
    }

    #[test]
    fn test_interpolation_hits_lattice_points() {
        let noise = OctaveNoise::new(WorldSeed::new(7), params());
        let v = noise.interpolated(-300.0, 200.0, 0.01);
        assert_eq!(v.to_bits(), lattice(-3, 2, WorldSeed::new(7)).to_bits());
    }

    #[test]
    fn test_seed_derivation() {
        let base = WorldSeed::new(42);
        let derived1 = base.derive(1);
        let derived2 = base.derive(2);

        assert_ne!(derived1, derived2, "Different purposes should give different seeds");
        assert_eq!(derived1, base.derive(1), "Same purpose should give same seed");
        assert_ne!(derived1, base, "Derived seed should differ from base");
    }
}
