//! # World Configuration
//!
//! Everything the world needs is supplied once at construction, usually
//! from a TOML file:
//!
//! ```toml
//! [grid]
//! tile_width = 60
//! tile_height = 60
//! chunk_size_in_tiles = 5
//! window_width_in_chunks = 11
//! window_height_in_chunks = 11
//! recenter_margin_in_chunks = 4
//!
//! [noise]
//! seed = 421337
//! octaves = 16
//! ```
//!
//! Missing sections and keys fall back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coords::CoordinateConverter;
use crate::error::{WorldError, WorldResult};

/// Tile, chunk and window sizes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Chunk edge length in tiles.
    pub chunk_size_in_tiles: u32,
    /// Resident window width in chunks.
    pub window_width_in_chunks: u32,
    /// Resident window height in chunks.
    pub window_height_in_chunks: u32,
    /// Distance to the window border, in chunk widths, that triggers a recenter.
    pub recenter_margin_in_chunks: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            tile_width: 60,
            tile_height: 60,
            chunk_size_in_tiles: 5,
            window_width_in_chunks: 11,
            window_height_in_chunks: 11,
            recenter_margin_in_chunks: 4.0,
        }
    }
}

/// Multi-octave value noise parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// World seed.
    pub seed: u32,
    /// Number of octaves summed.
    pub octaves: u32,
    /// Amplitude multiplier per octave.
    pub persistence: f64,
    /// Frequency of the first octave, in lattice cells per tile.
    pub frequency: f64,
    /// Frequency multiplier per octave.
    pub frequency_multiplier: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 421_337,
            octaves: 16,
            persistence: 0.5,
            frequency: 0.01,
            frequency_multiplier: 2.0,
        }
    }
}

/// Height thresholds separating the terrain classes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Heights below this are water.
    pub water_below: f64,
    /// Heights below this (and not water) are sand; the rest is grass.
    pub sand_below: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            water_below: 0.45,
            sand_below: 0.48,
        }
    }
}

/// Tree-cell grid and the height band trees grow in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationConfig {
    /// Tree cell width in pixels. Must be at least one tile wide.
    pub cell_width: u32,
    /// Tree cell height in pixels. Must be at least one tile high.
    pub cell_height: u32,
    /// Lowest height a tree grows at (inclusive).
    pub min_height: f64,
    /// Highest height a tree grows at (inclusive).
    pub max_height: f64,
}

impl Default for VegetationConfig {
    fn default() -> Self {
        Self {
            cell_width: 90,
            cell_height: 90,
            min_height: 0.6,
            max_height: 0.75,
        }
    }
}

/// Creature spawner placement and population limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Minimum fraction of grass tiles for a chunk to host a spawner.
    pub min_grass_fraction: f64,
    /// Chance that an eligible chunk hosts a spawner.
    pub probability: f64,
    /// Creatures a spawner chunk keeps alive at most.
    pub max_creatures_per_chunk: usize,
    /// Ticks between spawn passes in the streaming loop.
    pub interval_ticks: u64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            min_grass_fraction: 0.75,
            probability: 0.02,
            max_creatures_per_chunk: 3,
            interval_ticks: 180,
        }
    }
}

/// Complete world configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Tile, chunk and window sizes.
    pub grid: GridConfig,
    /// Terrain noise.
    pub noise: NoiseConfig,
    /// Terrain class thresholds.
    pub terrain: TerrainConfig,
    /// Tree placement.
    pub vegetation: VegetationConfig,
    /// Creature spawners.
    pub spawn: SpawnConfig,
}

impl WorldConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ConfigParse`] for malformed TOML and any
    /// [`WorldConfig::validate`] error for out-of-range values.
    pub fn from_toml_str(text: &str) -> WorldResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ConfigIo`] if the file cannot be read, otherwise
    /// the same errors as [`WorldConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> WorldResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| WorldError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Builds the coordinate converter for this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ZeroDimension`] if a grid size is zero.
    pub fn converter(&self) -> WorldResult<CoordinateConverter> {
        CoordinateConverter::new(
            self.grid.tile_width,
            self.grid.tile_height,
            self.grid.chunk_size_in_tiles,
            self.grid.window_width_in_chunks,
            self.grid.window_height_in_chunks,
        )
    }

    /// Checks every value against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> WorldResult<()> {
        self.converter()?;

        let grid = &self.grid;
        if !(grid.recenter_margin_in_chunks.is_finite() && grid.recenter_margin_in_chunks >= 0.0) {
            return Err(invalid("grid.recenter_margin_in_chunks must be finite and >= 0"));
        }

        let noise = &self.noise;
        if noise.octaves == 0 {
            return Err(WorldError::ZeroDimension { what: "noise.octaves" });
        }
        for (name, value) in [
            ("noise.persistence", noise.persistence),
            ("noise.frequency", noise.frequency),
            ("noise.frequency_multiplier", noise.frequency_multiplier),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(&format!("{name} must be finite and > 0, got {value}")));
            }
        }

        let terrain = &self.terrain;
        if !(0.0..=1.0).contains(&terrain.water_below)
            || !(0.0..=1.0).contains(&terrain.sand_below)
            || terrain.water_below > terrain.sand_below
        {
            return Err(invalid(
                "terrain thresholds must satisfy 0 <= water_below <= sand_below <= 1",
            ));
        }

        let vegetation = &self.vegetation;
        if vegetation.cell_width < grid.tile_width || vegetation.cell_height < grid.tile_height {
            return Err(invalid(&format!(
                "tree cell {}x{} must not be smaller than a tile ({}x{})",
                vegetation.cell_width, vegetation.cell_height, grid.tile_width, grid.tile_height
            )));
        }
        if !(vegetation.min_height.is_finite() && vegetation.max_height.is_finite())
            || vegetation.min_height > vegetation.max_height
        {
            return Err(invalid("vegetation.min_height must not exceed vegetation.max_height"));
        }

        let spawn = &self.spawn;
        if !(0.0..=1.0).contains(&spawn.min_grass_fraction) || !(0.0..=1.0).contains(&spawn.probability)
        {
            return Err(invalid("spawn fractions must lie in [0, 1]"));
        }
        if spawn.interval_ticks == 0 {
            return Err(WorldError::ZeroDimension { what: "spawn.interval_ticks" });
        }

        Ok(())
    }
}

fn invalid(message: &str) -> WorldError {
    WorldError::InvalidConfig(message.to_owned())
}
