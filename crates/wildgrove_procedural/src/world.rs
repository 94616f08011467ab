//! # World
//!
//! Ties the object pools to the chunk window. Chunks entering the window
//! are generated into the pools; chunks leaving it hand every object back.
//!
//! ```rust,ignore
//! let mut world = World::new(WorldConfig::default(), PixelPos::new(0.0, 0.0))?;
//! let player = world.acquire(ObjectType::Player, PixelPos::new(0.0, 0.0), None)?;
//!
//! // Every tick
//! if let Some(outcome) = world.update(focal)? {
//!     minimap.refresh(&outcome.created, &outcome.destroyed);
//! }
//! ```

use rand::Rng;
use tracing::{debug, info, warn};
use wildgrove_core::{
    ChunkKey, CoordinateConverter, ObjectType, PerType, PixelPos, PixelRect, WorldConfig, WorldError,
    WorldResult,
};

use crate::biome::SpawnRule;
use crate::chunk::{Chunk, ChunkGenerator};
use crate::grid::{ChunkLifecycle, GridContainer, RecenterOutcome, WindowBorder};
use crate::object::{ObjectHandle, ObjectPool, WorldObject};

/// Result of [`World::relocate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relocation {
    /// Position updated, same chunk.
    Moved,
    /// Position updated and the object re-registered with another chunk.
    Rechunked,
    /// The new position is outside the window; the object was released.
    Released,
    /// The handle no longer addresses a live object.
    Stale,
}

/// Generates entering chunks into the pools and releases leaving ones.
struct Materializer<'a> {
    generator: &'a ChunkGenerator,
    pool: &'a mut ObjectPool,
}

impl ChunkLifecycle for Materializer<'_> {
    type Error = WorldError;

    fn populate(&mut self, chunk: &mut Chunk, window: &WindowBorder) -> WorldResult<()> {
        chunk.generate(self.generator, window, self.pool)
    }

    fn retire(&mut self, chunk: &mut Chunk) {
        let pool = &mut *self.pool;
        chunk.teardown(|handle| {
            pool.release(handle);
        });
    }
}

/// Builder for [`World`].
pub struct WorldBuilder {
    config: WorldConfig,
    spawn_rule: Option<Box<dyn SpawnRule>>,
    pooled_types: Vec<ObjectType>,
}

impl WorldBuilder {
    /// Starts a builder with every object type pooled and the grass-based
    /// spawner rule.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            spawn_rule: None,
            pooled_types: ObjectType::ALL.to_vec(),
        }
    }

    /// Uses `rule` to decide which chunks host spawners.
    #[must_use]
    pub fn spawn_rule(mut self, rule: impl SpawnRule + 'static) -> Self {
        self.spawn_rule = Some(Box::new(rule));
        self
    }

    /// Restricts the pooled object types.
    #[must_use]
    pub fn pooled_types(mut self, types: &[ObjectType]) -> Self {
        self.pooled_types = types.to_vec();
        self
    }

    /// Builds the world and populates the window around `focal`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid settings, or
    /// [`WorldError::UnregisteredObjectType`] if a tile or tree type is not
    /// pooled.
    pub fn build(self, focal: PixelPos) -> WorldResult<World> {
        let mut generator = ChunkGenerator::new(&self.config)?;
        if let Some(rule) = self.spawn_rule {
            generator = generator.with_boxed_spawn_rule(rule);
        }

        let pool = ObjectPool::new(&self.pooled_types);
        if let Some(&missing) = ObjectType::TILES
            .iter()
            .chain(ObjectType::TREES.iter())
            .find(|&&kind| !pool.is_registered(kind))
        {
            return Err(WorldError::UnregisteredObjectType(missing));
        }

        let units = *generator.units();
        let mut world = World {
            config: self.config,
            generator,
            grid: GridContainer::new(units),
            pool,
        };
        world.recenter(focal)?;

        info!(
            seed = world.config.noise.seed,
            chunks = world.grid.chunk_count(),
            objects = world.pool.total_active(),
            "world ready"
        );
        Ok(world)
    }
}

/// The streaming world: chunk window plus object pools.
pub struct World {
    config: WorldConfig,
    generator: ChunkGenerator,
    grid: GridContainer,
    pool: ObjectPool,
}

impl World {
    /// Builds a world with default options around `focal`.
    ///
    /// # Errors
    ///
    /// See [`WorldBuilder::build`].
    pub fn new(config: WorldConfig, focal: PixelPos) -> WorldResult<Self> {
        WorldBuilder::new(config).build(focal)
    }

    /// Starts a [`WorldBuilder`].
    #[must_use]
    pub fn builder(config: WorldConfig) -> WorldBuilder {
        WorldBuilder::new(config)
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Returns the coordinate converter.
    #[inline]
    #[must_use]
    pub const fn units(&self) -> &CoordinateConverter {
        self.grid.units()
    }

    /// Returns the chunk window.
    #[inline]
    #[must_use]
    pub const fn grid(&self) -> &GridContainer {
        &self.grid
    }

    /// Returns the object pools.
    #[inline]
    #[must_use]
    pub const fn pool(&self) -> &ObjectPool {
        &self.pool
    }

    /// Returns the chunk generator.
    #[inline]
    #[must_use]
    pub const fn generator(&self) -> &ChunkGenerator {
        &self.generator
    }

    /// Returns the current window border.
    #[inline]
    #[must_use]
    pub const fn border(&self) -> &WindowBorder {
        self.grid.border()
    }

    /// Moves the window to surround `focal`.
    ///
    /// # Errors
    ///
    /// Propagates generation errors; the window is unchanged on error.
    pub fn recenter(&mut self, focal: PixelPos) -> WorldResult<RecenterOutcome> {
        let mut lifecycle = Materializer {
            generator: &self.generator,
            pool: &mut self.pool,
        };
        self.grid.recenter(focal, &mut lifecycle)
    }

    /// Returns true if `focal` is within the configured margin of the
    /// window border.
    #[must_use]
    pub fn needs_recenter(&self, focal: PixelPos) -> bool {
        let margin = self.config.grid.recenter_margin_in_chunks * f64::from(self.units().chunk_width_in_pixels());
        self.grid.distance_to_border(focal, margin)
    }

    /// Recenters if `focal` is near the border. Call once per tick.
    ///
    /// # Errors
    ///
    /// See [`World::recenter`].
    pub fn update(&mut self, focal: PixelPos) -> WorldResult<Option<RecenterOutcome>> {
        if self.needs_recenter(focal) {
            self.recenter(focal).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Activates an object and registers it with its chunk.
    ///
    /// The chunk is `hint` if it is still resident, otherwise the chunk
    /// containing `position`. Returns `Ok(None)` without touching the pool
    /// if neither resolves, i.e. `position` is outside the window.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnregisteredObjectType`] if `kind` is not pooled.
    pub fn acquire(
        &mut self,
        kind: ObjectType,
        position: PixelPos,
        hint: Option<ChunkKey>,
    ) -> WorldResult<Option<ObjectHandle>> {
        if !self.pool.is_registered(kind) {
            return Err(WorldError::UnregisteredObjectType(kind));
        }

        if !self.grid.is_pixel_in_window(position) {
            debug!(kind = kind.name(), x = position.x, y = position.y, "acquire outside window");
            return Ok(None);
        }

        let hinted = hint.and_then(|key| self.grid.resolve(key)).map(Chunk::key);
        if hint.is_some() && hinted.is_none() {
            debug!(kind = kind.name(), "stale chunk hint; falling back to lookup");
        }
        let Some(key) = hinted.or_else(|| self.grid.get_chunk_by_pixel(position).map(Chunk::key)) else {
            debug!(kind = kind.name(), "window not populated");
            return Ok(None);
        };

        let handle = self.pool.acquire(kind, position, Some(key))?;
        if let Some(chunk) = self.grid.resolve_mut(key) {
            chunk.add_object(handle);
        }
        Ok(Some(handle))
    }

    /// Deactivates an object and removes it from its chunk.
    ///
    /// Returns false for stale handles.
    pub fn release(&mut self, handle: ObjectHandle) -> bool {
        let Some(previous) = self.pool.release(handle) else {
            return false;
        };

        if let Some(chunk) = previous.chunk.and_then(|key| self.grid.resolve_mut(key)) {
            if !chunk.remove_object(handle) {
                warn!(kind = handle.kind.name(), "released object was not listed in its chunk");
            }
        }
        true
    }

    /// Moves an object, re-registering it if it crossed into another chunk.
    ///
    /// Objects moved outside the window are released.
    pub fn relocate(&mut self, handle: ObjectHandle, position: PixelPos) -> Relocation {
        let Some(current) = self.pool.get(handle).map(|object| object.chunk) else {
            return Relocation::Stale;
        };

        let target = self
            .grid
            .is_pixel_in_window(position)
            .then(|| self.grid.get_chunk_by_pixel(position).map(Chunk::key))
            .flatten();
        let Some(target) = target else {
            self.release(handle);
            return Relocation::Released;
        };

        let mut relocation = Relocation::Moved;
        if current != Some(target) {
            if let Some(chunk) = current.and_then(|key| self.grid.resolve_mut(key)) {
                chunk.remove_object(handle);
            }
            if let Some(chunk) = self.grid.resolve_mut(target) {
                chunk.add_object(handle);
            }
            relocation = Relocation::Rechunked;
        }

        if let Some(object) = self.pool.get_mut(handle) {
            object.position = position;
            object.chunk = Some(target);
        }
        relocation
    }

    /// Returns the live object behind `handle`.
    #[must_use]
    pub fn get(&self, handle: ObjectHandle) -> Option<&WorldObject> {
        self.pool.get(handle)
    }

    /// Spawns one creature in every spawner chunk below its population cap.
    ///
    /// Positions are drawn uniformly inside the chunk from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnregisteredObjectType`] if creatures are not pooled.
    pub fn spawn_creatures<R: Rng>(&mut self, rng: &mut R) -> WorldResult<Vec<ObjectHandle>> {
        let cap = self.config.spawn.max_creatures_per_chunk;
        let spawners: Vec<(ChunkKey, PixelRect)> = self
            .grid
            .chunks()
            .filter(|chunk| chunk.has_spawner() && chunk.count(ObjectType::Slime) < cap)
            .map(|chunk| (chunk.key(), chunk.bounds()))
            .collect();

        let mut spawned = Vec::with_capacity(spawners.len());
        for (key, bounds) in spawners {
            let position = PixelPos::new(
                rng.gen_range(bounds.left..bounds.right),
                rng.gen_range(bounds.top..bounds.bottom),
            );
            if let Some(handle) = self.acquire(ObjectType::Slime, position, Some(key))? {
                spawned.push(handle);
            }
        }

        if !spawned.is_empty() {
            debug!(count = spawned.len(), "creatures spawned");
        }
        Ok(spawned)
    }

    /// Every registered object of `kind` in the window, chunk by chunk.
    #[must_use]
    pub fn objects_of_type(&self, kind: ObjectType) -> Vec<ObjectHandle> {
        self.grid
            .chunks()
            .flat_map(|chunk| chunk.objects(kind).iter().copied())
            .collect()
    }

    /// Every registered object in the window, grouped by type.
    #[must_use]
    pub fn objects_grouped_by_type(&self) -> PerType<Vec<ObjectHandle>> {
        PerType::from_fn(|kind| self.objects_of_type(kind))
    }

    /// Number of registered objects of `kind` in the window.
    #[must_use]
    pub fn object_count(&self, kind: ObjectType) -> usize {
        self.grid.chunks().map(|chunk| chunk.count(kind)).sum()
    }

    /// Visits live objects of `kind` inside `area`. See
    /// [`GridContainer::for_each_object_in_area`].
    pub fn for_each_object_in_area(
        &self,
        kind: ObjectType,
        area: PixelRect,
        visitor: impl FnMut(ObjectHandle, &WorldObject),
    ) -> usize {
        self.grid.for_each_object_in_area(kind, area, &self.pool, visitor)
    }
}
