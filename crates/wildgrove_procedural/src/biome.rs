//! # Terrain Classification
//!
//! Maps noise heights to terrain classes and summarizes a chunk's terrain
//! mix. The mix decides whether a chunk hosts a creature spawner.

use wildgrove_core::{ChunkCoord, ObjectType, SpawnConfig, TerrainConfig};

use crate::noise::{lattice, WorldSeed};

/// Terrain class of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TileKind {
    /// Below the water threshold.
    Water = 0,
    /// Between the water and sand thresholds.
    Sand = 1,
    /// Everything higher.
    Grass = 2,
}

impl TileKind {
    /// All classes, lowest first.
    pub const ALL: [Self; 3] = [Self::Water, Self::Sand, Self::Grass];

    /// Pooled object type that renders this class.
    #[must_use]
    pub const fn object_type(self) -> ObjectType {
        match self {
            Self::Water => ObjectType::WaterTile,
            Self::Sand => ObjectType::SandTile,
            Self::Grass => ObjectType::GrassTile,
        }
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

/// Threshold classifier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainClassifier {
    water_below: f64,
    sand_below: f64,
}

impl TerrainClassifier {
    /// Creates a classifier from configured thresholds.
    #[must_use]
    pub const fn new(config: &TerrainConfig) -> Self {
        Self {
            water_below: config.water_below,
            sand_below: config.sand_below,
        }
    }

    /// Classifies a height in [0, 1).
    #[inline]
    #[must_use]
    pub fn classify(&self, height: f64) -> TileKind {
        if height < self.water_below {
            TileKind::Water
        } else if height < self.sand_below {
            TileKind::Sand
        } else {
            TileKind::Grass
        }
    }
}

impl Default for TerrainClassifier {
    fn default() -> Self {
        Self::new(&TerrainConfig::default())
    }
}

/// Fraction of a chunk's tiles in each terrain class.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BiomeStats {
    fractions: [f64; 3],
}

impl BiomeStats {
    /// Builds stats from per-class tile counts.
    ///
    /// An empty chunk (`total == 0`) has all fractions at zero.
    #[must_use]
    pub fn from_counts(water: usize, sand: usize, grass: usize, total: usize) -> Self {
        if total == 0 {
            return Self::default();
        }
        let total = total as f64;
        Self {
            fractions: [water as f64 / total, sand as f64 / total, grass as f64 / total],
        }
    }

    /// Fraction of tiles of `kind`, in [0, 1].
    #[inline]
    #[must_use]
    pub const fn fraction(&self, kind: TileKind) -> f64 {
        self.fractions[kind.index()]
    }

    /// Class covering the most tiles. Ties go to the higher class.
    #[must_use]
    pub fn dominant(&self) -> TileKind {
        let mut best = TileKind::Water;
        for kind in TileKind::ALL {
            if self.fraction(kind) >= self.fraction(best) {
                best = kind;
            }
        }
        best
    }
}

/// Decides which chunks host a creature spawner.
///
/// Implemented for plain closures so tests can force the outcome:
///
/// ```rust,ignore
/// let always = |_: ChunkCoord, _: &BiomeStats| true;
/// ```
pub trait SpawnRule {
    /// Returns true if the chunk at `coord` with terrain mix `biome` hosts a spawner.
    fn allows_spawner(&self, coord: ChunkCoord, biome: &BiomeStats) -> bool;
}

impl<F> SpawnRule for F
where
    F: Fn(ChunkCoord, &BiomeStats) -> bool,
{
    fn allows_spawner(&self, coord: ChunkCoord, biome: &BiomeStats) -> bool {
        self(coord, biome)
    }
}

/// Grass-heavy chunks host a spawner with a small, seeded probability.
#[derive(Clone, Copy, Debug)]
pub struct GrassySpawnRule {
    min_grass_fraction: f64,
    probability: f64,
    seed: WorldSeed,
}

impl GrassySpawnRule {
    /// Purpose tag for the spawner sub-seed.
    const SPAWN_PURPOSE: u32 = 0x51_1E;

    /// Creates the rule from spawn settings and the world seed.
    #[must_use]
    pub const fn new(config: &SpawnConfig, world_seed: WorldSeed) -> Self {
        Self {
            min_grass_fraction: config.min_grass_fraction,
            probability: config.probability,
            seed: world_seed.derive(Self::SPAWN_PURPOSE),
        }
    }
}

impl SpawnRule for GrassySpawnRule {
    fn allows_spawner(&self, coord: ChunkCoord, biome: &BiomeStats) -> bool {
        biome.fraction(TileKind::Grass) >= self.min_grass_fraction
            && lattice(coord.x, coord.y, self.seed) <= self.probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_thresholds() {
        let classifier = TerrainClassifier::default();

        assert_eq!(classifier.classify(0.0), TileKind::Water);
        assert_eq!(classifier.classify(0.449), TileKind::Water);
        assert_eq!(classifier.classify(0.45), TileKind::Sand);
        assert_eq!(classifier.classify(0.479), TileKind::Sand);
        assert_eq!(classifier.classify(0.48), TileKind::Grass);
        assert_eq!(classifier.classify(0.99), TileKind::Grass);
    }

    #[test]
    fn test_object_types() {
        assert_eq!(TileKind::Water.object_type(), ObjectType::WaterTile);
        assert_eq!(TileKind::Sand.object_type(), ObjectType::SandTile);
        assert_eq!(TileKind::Grass.object_type(), ObjectType::GrassTile);
    }

    #[test]
    fn test_biome_fractions() {
        let stats = BiomeStats::from_counts(5, 0, 20, 25);

        assert!((stats.fraction(TileKind::Water) - 0.2).abs() < 1e-12);
        assert!(stats.fraction(TileKind::Sand).abs() < f64::EPSILON);
        assert!((stats.fraction(TileKind::Grass) - 0.8).abs() < 1e-12);
        assert_eq!(stats.dominant(), TileKind::Grass);
    }

    #[test]
    fn test_empty_chunk_stats() {
        let stats = BiomeStats::from_counts(0, 0, 0, 0);
        for kind in TileKind::ALL {
            assert!(stats.fraction(kind).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_grassy_rule_requires_grass() {
        let config = SpawnConfig {
            probability: 1.0,
            ..SpawnConfig::default()
        };
        let rule = GrassySpawnRule::new(&config, WorldSeed::new(1));

        let grassy = BiomeStats::from_counts(0, 5, 20, 25);
        let sandy = BiomeStats::from_counts(0, 10, 15, 25);

        assert!(rule.allows_spawner(ChunkCoord::new(0, 0), &grassy));
        assert!(!rule.allows_spawner(ChunkCoord::new(0, 0), &sandy));
    }

    #[test]
    fn test_grassy_rule_is_rare_and_deterministic() {
        let rule = GrassySpawnRule::new(&SpawnConfig::default(), WorldSeed::new(42));
        let all_grass = BiomeStats::from_counts(0, 0, 25, 25);

        let mut hits = 0;
        for y in -50..50 {
            for x in -50..50 {
                let coord = ChunkCoord::new(x, y);
                let first = rule.allows_spawner(coord, &all_grass);
                assert_eq!(first, rule.allows_spawner(coord, &all_grass));
                if first {
                    hits += 1;
                }
            }
        }

        // 2% of 10_000 chunks, give or take
        assert!((100..=300).contains(&hits), "unexpected spawner count {hits}");
    }

    #[test]
    fn test_closure_rule() {
        let never = |_: ChunkCoord, _: &BiomeStats| false;
        assert!(!never.allows_spawner(ChunkCoord::new(3, 3), &BiomeStats::default()));
    }
}
