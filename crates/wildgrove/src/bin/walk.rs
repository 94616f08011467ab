//! # WILDGROVE Walker
//!
//! Headless run of the streaming world: a player walks a square spiral
//! while the window follows it, spawners populate grassland and the tick
//! timings are summarized at the end.
//!
//! ```bash
//! walk --config data/world.toml --ticks 3600 --speed 12
//! RUST_LOG=wildgrove_procedural=debug walk --seed 7
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wildgrove::core::{ObjectType, PixelPos, WorldConfig, WorldResult};
use wildgrove::procedural::Relocation;
use wildgrove::{SpiralPath, StreamingConfig, StreamingLoop};

/// Walk a player through a streamed world.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World configuration (TOML). Built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to run.
    #[arg(short, long, default_value_t = 3600)]
    ticks: u64,

    /// Player speed in pixels per tick.
    #[arg(short, long, default_value_t = 12.0)]
    speed: f64,

    /// Override the world seed from the configuration.
    #[arg(long)]
    seed: Option<u32>,
}

fn run(args: &Args) -> WorldResult<()> {
    let mut world_config = match &args.config {
        Some(path) => WorldConfig::from_file(path)?,
        None => WorldConfig::default(),
    };
    if let Some(seed) = args.seed {
        world_config.noise.seed = seed;
    }

    info!(
        seed = world_config.noise.seed,
        ticks = args.ticks,
        speed = args.speed,
        "starting walk"
    );

    let start = PixelPos::default();
    let streaming = StreamingConfig {
        rng_seed: u64::from(world_config.noise.seed),
        ..StreamingConfig::default()
    };
    let mut streaming_loop = StreamingLoop::with_world_config(world_config, start, streaming)?;
    let mut player = streaming_loop.world_mut().acquire(ObjectType::Player, start, None)?;

    let mut recenters = 0_u64;
    let mut spawned = 0_usize;
    for focal in SpiralPath::new(start, args.speed).take(args.ticks as usize) {
        let stats = streaming_loop.tick(focal)?;
        recenters += u64::from(stats.recentered);
        spawned += stats.creatures_spawned;

        let world = streaming_loop.world_mut();
        let relocation = player.map(|handle| world.relocate(handle, focal));
        if matches!(relocation, None | Some(Relocation::Released | Relocation::Stale)) {
            player = world.acquire(ObjectType::Player, focal, None)?;
        }
    }

    let world = streaming_loop.world();
    info!(
        ticks = streaming_loop.tick_count(),
        recenters,
        spawned,
        objects_live = world.pool().total_active(),
        pool_slots = world.pool().total_slots(),
        trees = ObjectType::TREES.iter().map(|&kind| world.object_count(kind)).sum::<usize>(),
        "walk finished"
    );
    streaming_loop.stats().log_summary();
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "walk failed");
            ExitCode::FAILURE
        }
    }
}
