//! # World Error Types
//!
//! Only configuration problems are errors. Out-of-window lookups return
//! `None`, and consistency slips (double release, stale handles) are
//! logged no-ops.

use std::path::PathBuf;

use thiserror::Error;

use crate::object::ObjectType;

/// Errors that can occur while building or configuring a world.
#[derive(Error, Debug)]
pub enum WorldError {
    /// A size parameter was zero.
    #[error("dimension `{what}` must be greater than zero")]
    ZeroDimension {
        /// Name of the offending parameter.
        what: &'static str,
    },

    /// A size parameter exceeded the supported maximum.
    #[error("dimension `{what}` is {value}, at most {max} is supported")]
    DimensionTooLarge {
        /// Name of the offending parameter.
        what: &'static str,
        /// Configured value.
        value: u32,
        /// Largest supported value.
        max: u32,
    },

    /// A configuration value is out of its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An object type was requested that the world has no pool for.
    #[error("no pool registered for object type {0:?}")]
    UnregisteredObjectType(ObjectType),

    /// The configuration text is not valid TOML for [`crate::WorldConfig`].
    #[error("failed to parse world configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("failed to read world configuration {path}: {source}")]
    ConfigIo {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Result type for world construction.
pub type WorldResult<T> = Result<T, WorldError>;
