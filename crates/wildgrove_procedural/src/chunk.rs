//! # Chunk System
//!
//! World data is organized into square chunks of tiles for:
//! - Memory efficiency (only the window around the focal point is resident)
//! - Fast streaming (generate/discard on demand)
//! - Spatial queries (objects are listed per chunk, per type)
//!
//! ## Ownership
//!
//! A chunk does not own object state. It owns *handles* into the
//! [`ObjectPool`], grouped by type in insertion order. Every object a chunk
//! materializes is listed in exactly one chunk, and tearing the chunk down
//! releases all of them.

use tracing::{debug, warn};
use wildgrove_core::{
    ChunkCoord, ChunkKey, CoordinateConverter, ObjectType, PerType, PixelRect, TileCoord, WorldConfig,
    WorldResult,
};

use crate::biome::{BiomeStats, GrassySpawnRule, SpawnRule, TileKind};
use crate::grid::WindowBorder;
use crate::noise::NoiseField;
use crate::object::{ObjectHandle, ObjectPool};
use crate::vegetation::TreePlacement;

/// Everything decided about one tile during generation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileSurvey {
    /// The tile.
    pub tile: TileCoord,
    /// Terrain height in [0, 1).
    pub height: f64,
    /// Terrain class.
    pub kind: TileKind,
    /// Tree owned by the tile, if any.
    pub tree: Option<TreePlacement>,
}

/// Deterministic chunk content generator.
///
/// Holds the noise field and the spawner rule. Surveying a tile is a pure
/// function of the world configuration.
pub struct ChunkGenerator {
    units: CoordinateConverter,
    field: NoiseField,
    spawn_rule: Box<dyn SpawnRule>,
}

impl ChunkGenerator {
    /// Creates a generator with the grass-based spawner rule.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate.
    pub fn new(config: &WorldConfig) -> WorldResult<Self> {
        config.validate()?;
        let units = config.converter()?;
        let field = NoiseField::new(config, units);
        let spawn_rule = GrassySpawnRule::new(&config.spawn, field.seed());

        Ok(Self {
            units,
            field,
            spawn_rule: Box::new(spawn_rule),
        })
    }

    /// Replaces the spawner rule.
    #[must_use]
    pub fn with_spawn_rule(mut self, rule: impl SpawnRule + 'static) -> Self {
        self.spawn_rule = Box::new(rule);
        self
    }

    /// Replaces the spawner rule with an already boxed one.
    #[must_use]
    pub fn with_boxed_spawn_rule(mut self, rule: Box<dyn SpawnRule>) -> Self {
        self.spawn_rule = rule;
        self
    }

    /// Returns the coordinate converter.
    #[inline]
    #[must_use]
    pub const fn units(&self) -> &CoordinateConverter {
        &self.units
    }

    /// Returns the noise field.
    #[inline]
    #[must_use]
    pub const fn field(&self) -> &NoiseField {
        &self.field
    }

    /// Samples, classifies and plants one tile.
    #[must_use]
    pub fn survey_tile(&self, tile: TileCoord) -> TileSurvey {
        let height = self.field.sample(tile);
        TileSurvey {
            tile,
            height,
            kind: self.field.classify_tile(height),
            tree: self.field.place_tree(tile, height),
        }
    }

    /// Returns true if the chunk at `coord` hosts a creature spawner.
    #[must_use]
    pub fn allows_spawner(&self, coord: ChunkCoord, biome: &BiomeStats) -> bool {
        self.spawn_rule.allows_spawner(coord, biome)
    }
}

/// A square block of tiles and the handles of everything materialized in it.
#[derive(Debug)]
pub struct Chunk {
    key: ChunkKey,
    bounds: PixelRect,
    first_tile: TileCoord,
    size_in_tiles: u32,
    objects: PerType<Vec<ObjectHandle>>,
    biome: BiomeStats,
    has_spawner: bool,
    generated: bool,
}

impl Chunk {
    /// Creates an empty, ungenerated chunk.
    #[must_use]
    pub fn new(key: ChunkKey, units: &CoordinateConverter) -> Self {
        Self {
            key,
            bounds: units.chunk_pixel_rect(key.coord),
            first_tile: units.chunk_to_tile(key.coord),
            size_in_tiles: units.chunk_size_in_tiles(),
            objects: PerType::default(),
            biome: BiomeStats::default(),
            has_spawner: false,
            generated: false,
        }
    }

    /// Returns the instance key.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> ChunkKey {
        self.key
    }

    /// Returns the chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.key.coord
    }

    /// Pixel bounds of the chunk.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> PixelRect {
        self.bounds
    }

    /// Terrain mix computed by the last generation.
    #[inline]
    #[must_use]
    pub const fn biome(&self) -> &BiomeStats {
        &self.biome
    }

    /// Whether the chunk hosts a creature spawner.
    #[inline]
    #[must_use]
    pub const fn has_spawner(&self) -> bool {
        self.has_spawner
    }

    /// Whether [`Chunk::generate`] has populated the chunk.
    #[inline]
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        self.generated
    }

    /// Tiles of the chunk, top-to-bottom then left-to-right.
    pub fn tiles(&self) -> impl Iterator<Item = TileCoord> {
        let first = self.first_tile;
        let size = self.size_in_tiles as i32;
        (0..size).flat_map(move |dy| (0..size).map(move |dx| TileCoord::new(first.x + dx, first.y + dy)))
    }

    /// Populates the chunk with tiles and trees.
    ///
    /// Every tile gets one pooled terrain object at its top-left pixel.
    /// Trees are materialized where the generator plants one and its
    /// position lies inside `window`. Afterwards the terrain mix and the
    /// spawner flag are computed.
    ///
    /// # Errors
    ///
    /// Returns [`wildgrove_core::WorldError::UnregisteredObjectType`] if a
    /// needed type has no pool. Objects acquired before the failure stay
    /// registered; tear the chunk down to release them.
    pub fn generate(
        &mut self,
        generator: &ChunkGenerator,
        window: &WindowBorder,
        pool: &mut ObjectPool,
    ) -> WorldResult<()> {
        if self.generated {
            warn!(x = self.key.coord.x, y = self.key.coord.y, "chunk generated twice; ignoring");
            return Ok(());
        }

        let units = *generator.units();
        let mut counts = [0_usize; 3];
        let mut trees = 0_usize;

        for tile in self.tiles() {
            let survey = generator.survey_tile(tile);
            let kind = survey.kind.object_type();
            let handle = pool.acquire(kind, units.tile_to_pixel(tile), Some(self.key))?;
            self.add_object(handle);
            counts[survey.kind as usize] += 1;

            if let Some(tree) = survey.tree.filter(|tree| window.contains_pixel(tree.position)) {
                let handle = pool.acquire(tree.kind, tree.position, Some(self.key))?;
                self.add_object(handle);
                trees += 1;
            }
        }

        let area = units.chunk_area_in_tiles();
        self.biome = BiomeStats::from_counts(counts[0], counts[1], counts[2], area);
        self.has_spawner = generator.allows_spawner(self.key.coord, &self.biome);
        self.generated = true;

        debug!(
            x = self.key.coord.x,
            y = self.key.coord.y,
            trees,
            grass = self.biome.fraction(TileKind::Grass),
            spawner = self.has_spawner,
            "chunk generated"
        );
        Ok(())
    }

    /// Releases every registered object and empties the chunk.
    ///
    /// Objects are handed to `release` type by type, in insertion order
    /// within each type. Biome stats and the spawner flag are cleared. A
    /// second teardown finds nothing to release.
    pub fn teardown(&mut self, mut release: impl FnMut(ObjectHandle)) {
        let mut released = 0_usize;
        for (_, handles) in self.objects.iter_mut() {
            released += handles.len();
            for handle in handles.drain(..) {
                release(handle);
            }
        }
        self.biome = BiomeStats::default();
        self.has_spawner = false;
        self.generated = false;

        debug!(x = self.key.coord.x, y = self.key.coord.y, released, "chunk torn down");
    }

    /// Registers a handle under its type.
    pub fn add_object(&mut self, handle: ObjectHandle) {
        self.objects[handle.kind].push(handle);
    }

    /// Unregisters a handle. Returns false if it was not registered.
    pub fn remove_object(&mut self, handle: ObjectHandle) -> bool {
        let handles = &mut self.objects[handle.kind];
        match handles.iter().position(|&h| h == handle) {
            Some(index) => {
                handles.remove(index);
                true
            }
            None => false,
        }
    }

    /// Registered handles of `kind`, in insertion order.
    #[inline]
    #[must_use]
    pub fn objects(&self, kind: ObjectType) -> &[ObjectHandle] {
        &self.objects[kind]
    }

    /// Number of registered handles of `kind`.
    #[inline]
    #[must_use]
    pub fn count(&self, kind: ObjectType) -> usize {
        self.objects[kind].len()
    }

    /// Number of registered handles of every type.
    #[must_use]
    pub fn total_objects(&self) -> usize {
        self.objects.iter().map(|(_, handles)| handles.len()).sum()
    }

    /// All registered handles, type by type.
    pub fn iter_objects(&self) -> impl Iterator<Item = ObjectHandle> + '_ {
        self.objects.iter().flat_map(|(_, handles)| handles.iter().copied())
    }
}
