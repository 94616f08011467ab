//! Shipped configuration files.

use wildgrove::core::WorldConfig;
use wildgrove::{SpiralPath, StreamingConfig, StreamingLoop};

const SHIPPED: &str = include_str!("../../../data/world.toml");

#[test]
fn test_shipped_config_matches_defaults() {
    let config = WorldConfig::from_toml_str(SHIPPED).unwrap();
    assert_eq!(config, WorldConfig::default());
}

#[test]
fn test_shipped_config_streams() {
    let mut config = WorldConfig::from_toml_str(SHIPPED).unwrap();
    config.grid.window_width_in_chunks = 5;
    config.grid.window_height_in_chunks = 5;
    config.grid.recenter_margin_in_chunks = 1.5;

    let start = wildgrove::core::PixelPos::default();
    let mut streaming_loop = StreamingLoop::with_world_config(
        config,
        start,
        StreamingConfig {
            enable_timing_logs: false,
            ..StreamingConfig::default()
        },
    )
    .unwrap();

    for focal in SpiralPath::new(start, 40.0).take(200) {
        streaming_loop.tick(focal).unwrap();
    }

    assert_eq!(streaming_loop.tick_count(), 200);
    assert_eq!(streaming_loop.world().grid().chunk_count(), 25);
}
