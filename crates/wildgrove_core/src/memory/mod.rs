//! # Memory Management
//!
//! Object recycling for the world streamer.
//!
//! ## Design Philosophy
//!
//! Objects are allocated once per slot. During gameplay:
//! - Slots are reused across chunk churn, never freed
//! - Retired objects wait on a per-pool free list
//! - Stale handles are detected by generation, not by address

mod pool;

pub use pool::{Acquired, SlotPool};
