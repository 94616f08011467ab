//! # WILDGROVE
//!
//! Game-side crate: drives the streaming world once per tick.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐     ┌──────────────────────────┐
//! │   wildgrove_core     │────>│   wildgrove_procedural   │
//! │                      │     │                          │
//! │  • Coordinates       │     │  • Noise + vegetation    │
//! │  • Config / errors   │     │  • Chunks + grid window  │
//! │  • Slot pools        │     │  • World (pools + grid)  │
//! └──────────────────────┘     └────────────┬─────────────┘
//!                                           │
//!                              ┌────────────v─────────────┐
//!                              │   wildgrove              │
//!                              │  • StreamingLoop         │
//!                              │  • walk (headless bin)   │
//!                              └──────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `streaming_loop`: Per-tick orchestration and timing
//! - `path`: Scripted focal-point paths for headless runs

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod path;
pub mod streaming_loop;

// Re-export the layers
pub use wildgrove_core as core;
pub use wildgrove_procedural as procedural;

// Re-export commonly used types
pub use path::SpiralPath;
pub use streaming_loop::{StreamingConfig, StreamingLoop, TickStats, TickStatsAccumulator};
