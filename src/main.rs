// src/main.rs

// Declare modules
pub mod color;
pub mod config;
pub mod engine;
pub mod geometry;
pub mod orchestrator;
pub mod platform;
pub mod renderer;
pub mod view;

use crate::{
    config::Config,
    engine::Universe,
    geometry::compute_geometry,
    orchestrator::AppOrchestrator,
    platform::console::ConsoleDriver,
    platform::Driver,
    renderer::Renderer,
};

use anyhow::Context;
use log::info;
use std::path::Path;
use std::time::Duration;

/// Main entry point for the `life-canvas` application.
fn main() -> anyhow::Result<()> {
    // Logging goes to stderr; default to warnings so it does not fight the
    // canvas when stderr shares the terminal. RUST_LOG overrides.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_micros()
        .init();

    // Optional config file path as the first argument.
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(Path::new(&path))?,
        None => Config::default(),
    };
    info!("Configuration loaded.");

    let mut driver = ConsoleDriver::new(Duration::from_millis(config.behavior.frame_interval_ms))
        .context("failed to initialize console driver")?;

    let viewport = driver.platform_state().viewport;
    let geometry = compute_geometry(viewport, &config.geometry, 0);
    info!(
        "Initial geometry: {}x{} cells for a {}x{} px viewport",
        geometry.grid.columns, geometry.grid.rows, viewport.width_px, viewport.height_px
    );

    let mut universe =
        Universe::new(geometry.grid).context("failed to allocate initial universe")?;
    let renderer = Renderer::new(config.geometry, config.theme);

    let run_result = {
        let mut orchestrator =
            AppOrchestrator::new(&mut universe, &mut driver, renderer, config, geometry)?;
        orchestrator.run()
    };

    driver
        .cleanup()
        .context("failed to clean up console driver")?;
    info!("life-canvas exited.");
    run_result
}
