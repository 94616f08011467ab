//! # WILDGROVE Streaming Loop
//!
//! One call per game tick:
//! ```text
//! Tick N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. RECENTER CHECK                                                   │
//! │    └─ Focal point near the window border? Recenter now, in full.    │
//! │                                                                     │
//! │ 2. SPAWN PASS (every `spawn.interval_ticks`)                        │
//! │    └─ One creature per spawner chunk below its cap                  │
//! │                                                                     │
//! │ 3. STATS                                                            │
//! │    └─ Timing, chunk churn, live objects, pool slots                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs on the caller's thread and finishes before `tick`
//! returns; no other system can observe a half-moved window.

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};
use wildgrove_core::{PixelPos, WorldConfig, WorldResult};
use wildgrove_procedural::World;

/// Target tick time for 60 FPS.
pub const TARGET_TICK_TIME: Duration = Duration::from_micros(16_666);

/// Maximum allowed tick time before warning.
pub const MAX_TICK_TIME: Duration = Duration::from_millis(33);

/// Configuration for the streaming loop.
#[derive(Clone, Debug)]
pub struct StreamingConfig {
    /// Seed of the spawner RNG.
    pub rng_seed: u64,
    /// Warn about ticks over [`MAX_TICK_TIME`].
    pub enable_timing_logs: bool,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            rng_seed: 0,
            enable_timing_logs: true,
        }
    }
}

/// What one tick did.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickStats {
    /// Tick number.
    pub tick: u64,
    /// Total tick time in microseconds.
    pub total_us: u64,
    /// Recenter time in microseconds (zero if none happened).
    pub recenter_us: u64,
    /// Whether the window moved.
    pub recentered: bool,
    /// Chunks generated this tick.
    pub chunks_created: usize,
    /// Chunks torn down this tick.
    pub chunks_destroyed: usize,
    /// Creatures spawned this tick.
    pub creatures_spawned: usize,
    /// Live pooled objects after the tick.
    pub objects_live: usize,
    /// Pool slots ever allocated, after the tick.
    pub pool_slots: usize,
}

/// Drives a [`World`] from a stream of focal positions.
pub struct StreamingLoop {
    world: World,
    config: StreamingConfig,
    rng: ChaCha8Rng,
    tick_count: u64,
    stats_accumulator: TickStatsAccumulator,
}

impl StreamingLoop {
    /// Wraps an existing world.
    #[must_use]
    pub fn new(world: World, config: StreamingConfig) -> Self {
        Self {
            world,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
            tick_count: 0,
            stats_accumulator: TickStatsAccumulator::new(),
        }
    }

    /// Builds the world around `focal` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns the world construction error.
    pub fn with_world_config(
        world_config: WorldConfig,
        focal: PixelPos,
        config: StreamingConfig,
    ) -> WorldResult<Self> {
        Ok(Self::new(World::new(world_config, focal)?, config))
    }

    /// Runs one tick for the focal point at `focal`.
    ///
    /// # Errors
    ///
    /// Propagates recenter and spawn errors. The window is unchanged when
    /// a recenter fails.
    pub fn tick(&mut self, focal: PixelPos) -> WorldResult<TickStats> {
        let start = Instant::now();
        let mut stats = TickStats {
            tick: self.tick_count,
            ..TickStats::default()
        };

        let recenter_start = Instant::now();
        if let Some(outcome) = self.world.update(focal)? {
            stats.recenter_us = recenter_start.elapsed().as_micros() as u64;
            stats.recentered = !outcome.is_unchanged();
            stats.chunks_created = outcome.created.len();
            stats.chunks_destroyed = outcome.destroyed.len();
        }

        let interval = self.world.config().spawn.interval_ticks.max(1);
        if self.tick_count > 0 && self.tick_count % interval == 0 {
            stats.creatures_spawned = self.world.spawn_creatures(&mut self.rng)?.len();
        }

        stats.objects_live = self.world.pool().total_active();
        stats.pool_slots = self.world.pool().total_slots();
        stats.total_us = start.elapsed().as_micros() as u64;

        if self.config.enable_timing_logs && stats.total_us > MAX_TICK_TIME.as_micros() as u64 {
            warn!(
                tick = stats.tick,
                total_ms = stats.total_us as f64 / 1000.0,
                budget_ms = TARGET_TICK_TIME.as_micros() as f64 / 1000.0,
                "tick exceeded budget"
            );
        }

        self.stats_accumulator.record(stats);
        self.tick_count += 1;
        Ok(stats)
    }

    /// Returns the number of completed ticks.
    #[inline]
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Returns the world.
    #[inline]
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Returns the world mutably, e.g. to acquire the player.
    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Returns the accumulated statistics.
    #[must_use]
    pub const fn stats(&self) -> &TickStatsAccumulator {
        &self.stats_accumulator
    }
}

/// Accumulator for tick statistics.
#[derive(Clone, Debug)]
pub struct TickStatsAccumulator {
    /// Total ticks recorded.
    pub ticks_recorded: u64,
    /// Sum of total tick times.
    pub total_us_sum: u64,
    /// Sum of recenter times.
    pub recenter_us_sum: u64,
    /// Ticks that moved the window.
    pub recenters: u64,
    /// Chunks generated.
    pub chunks_created: u64,
    /// Chunks torn down.
    pub chunks_destroyed: u64,
    /// Creatures spawned.
    pub creatures_spawned: u64,
    /// Min tick time.
    pub min_tick_us: u64,
    /// Max tick time.
    pub max_tick_us: u64,
    /// Ticks that exceeded budget.
    pub ticks_over_budget: u64,
    /// Pool slots after the last tick.
    pub pool_slots: usize,
}

impl TickStatsAccumulator {
    /// Creates a new accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ticks_recorded: 0,
            total_us_sum: 0,
            recenter_us_sum: 0,
            recenters: 0,
            chunks_created: 0,
            chunks_destroyed: 0,
            creatures_spawned: 0,
            min_tick_us: u64::MAX,
            max_tick_us: 0,
            ticks_over_budget: 0,
            pool_slots: 0,
        }
    }

    /// Records a tick's statistics.
    pub fn record(&mut self, stats: TickStats) {
        self.ticks_recorded += 1;
        self.total_us_sum += stats.total_us;
        self.recenter_us_sum += stats.recenter_us;
        self.recenters += u64::from(stats.recentered);
        self.chunks_created += stats.chunks_created as u64;
        self.chunks_destroyed += stats.chunks_destroyed as u64;
        self.creatures_spawned += stats.creatures_spawned as u64;
        self.min_tick_us = self.min_tick_us.min(stats.total_us);
        self.max_tick_us = self.max_tick_us.max(stats.total_us);
        self.pool_slots = stats.pool_slots;

        if stats.total_us > TARGET_TICK_TIME.as_micros() as u64 {
            self.ticks_over_budget += 1;
        }
    }

    /// Returns average tick time in milliseconds.
    #[must_use]
    pub fn avg_tick_ms(&self) -> f64 {
        if self.ticks_recorded == 0 {
            return 0.0;
        }
        (self.total_us_sum as f64 / self.ticks_recorded as f64) / 1000.0
    }

    /// Returns average recenter time in milliseconds, over ticks that recentered.
    #[must_use]
    pub fn avg_recenter_ms(&self) -> f64 {
        if self.recenters == 0 {
            return 0.0;
        }
        (self.recenter_us_sum as f64 / self.recenters as f64) / 1000.0
    }

    /// Returns the fraction of ticks over budget.
    #[must_use]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.ticks_recorded == 0 {
            return 0.0;
        }
        self.ticks_over_budget as f64 / self.ticks_recorded as f64
    }

    /// Logs a summary of the statistics.
    pub fn log_summary(&self) {
        info!(
            ticks = self.ticks_recorded,
            avg_tick_ms = self.avg_tick_ms(),
            min_tick_ms = self.min_tick_us as f64 / 1000.0,
            max_tick_ms = self.max_tick_us as f64 / 1000.0,
            over_budget_pct = self.over_budget_ratio() * 100.0,
            "timing"
        );
        info!(
            recenters = self.recenters,
            avg_recenter_ms = self.avg_recenter_ms(),
            chunks_created = self.chunks_created,
            chunks_destroyed = self.chunks_destroyed,
            creatures_spawned = self.creatures_spawned,
            pool_slots = self.pool_slots,
            "streaming"
        );
    }
}

impl Default for TickStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
