//! # WILDGROVE Core
//!
//! Shared units for the world-streaming core of a top-down game.
//!
//! ## Architecture Rules
//!
//! 1. **Floor arithmetic everywhere** - negative coordinates convert the same way positive ones do
//! 2. **Slots are never freed** - pooled objects are recycled across chunk churn
//! 3. **Handles carry generations** - a recycled slot can never be reached through an old handle
//!
//! ## Example
//!
//! ```rust,ignore
//! use wildgrove_core::{CoordinateConverter, PixelPos};
//!
//! let units = CoordinateConverter::new(60, 60, 5, 3, 3)?;
//! assert_eq!(units.pixel_to_chunk(PixelPos::new(450.0, 450.0)).x, 1);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod coords;
pub mod error;
pub mod handle;
pub mod memory;
pub mod object;

pub use config::{
    GridConfig, NoiseConfig, SpawnConfig, TerrainConfig, VegetationConfig, WorldConfig,
};
pub use coords::{ChunkCoord, CoordinateConverter, PixelPos, PixelRect, TileCoord, MAX_DIMENSION};
pub use error::{WorldError, WorldResult};
pub use handle::{ChunkKey, PoolHandle};
pub use memory::{Acquired, SlotPool};
pub use object::{ObjectType, PerType};
