//! # WILDGROVE Procedural World Streaming
//!
//! Deterministic terrain generation inside a window of chunks that follows
//! the player.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same world
//! 2. **Chunked**: World is generated in fixed-size chunks of tiles
//! 3. **Streamable**: Chunks are generated and discarded as the window moves
//! 4. **Recycled**: Every object lives in a pool slot that is reused, never freed
//!
//! ## Core Components
//!
//! - `NoiseField`: Seeded value noise, terrain classes and tree placement
//! - `Chunk`: Handles of everything materialized in a block of tiles
//! - `GridContainer`: The resident chunk window and its queries
//! - `ObjectPool`: Per-type slot pools
//! - `World`: Pools wired to the window
//!
//! ## Example
//!
//! ```rust,ignore
//! use wildgrove_core::{PixelPos, WorldConfig};
//! use wildgrove_procedural::World;
//!
//! let mut world = World::new(WorldConfig::default(), PixelPos::new(0.0, 0.0))?;
//!
//! // Player walked east
//! let outcome = world.recenter(PixelPos::new(1_500.0, 0.0))?;
//! println!("{} chunks entered", outcome.created.len());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod chunk;
pub mod grid;
pub mod noise;
pub mod object;
pub mod vegetation;
pub mod world;

pub use biome::{BiomeStats, GrassySpawnRule, SpawnRule, TerrainClassifier, TileKind};
pub use chunk::{Chunk, ChunkGenerator, TileSurvey};
pub use grid::{ChunkLifecycle, GridContainer, RecenterOutcome, WindowBorder};
pub use noise::{lattice, NoiseField, OctaveNoise, OctaveParams, WorldSeed};
pub use object::{ObjectHandle, ObjectPool, WorldObject};
pub use vegetation::{TreeCell, TreePlacement, TreePlacer};
pub use world::{Relocation, World, WorldBuilder};
