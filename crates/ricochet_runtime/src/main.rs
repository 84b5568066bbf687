//! Ricochet Runtime
//!
//! Headless driver: loads or generates a scenario, runs the simulation for a
//! fixed number of frames and optionally writes the final snapshot.
//!
//! Usage: `ricochet [settings.json]`. Log output is controlled with
//! `RUST_LOG` (defaults to `info`).

mod driver;
mod settings;

use anyhow::{Context, Result};
use driver::Driver;
use ricochet_core::Engine;
use ricochet_scenario::Scenario;
use settings::RuntimeSettings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Ricochet v{}", ricochet_core::VERSION);

    let settings = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => RuntimeSettings::load(&path)?,
        None => RuntimeSettings::default(),
    };

    let scenario = match settings.generate {
        Some(generate) => Scenario::generate(generate.walls, generate.bullets, generate.seed),
        None => Scenario::load(&settings.walls_path, &settings.bullets_path)
            .context("failed to load scenario")?,
    };

    let mut engine =
        Engine::with_config(scenario.walls, scenario.bullets, settings.engine.clone())
            .context("failed to start simulation engine")?;
    tracing::info!(
        workers = engine.worker_count(),
        frames = settings.frames,
        "Runtime initialized"
    );

    let summary = Driver::new(&engine, &settings).run()?;
    tracing::info!(
        frames = summary.frames,
        time = summary.final_state.time,
        walls_destroyed = summary.walls_destroyed,
        walls_left = summary.final_state.walls.len(),
        bullets_active = summary.final_state.bullets.len(),
        "Run complete"
    );
    if summary.capped_ticks > 0 {
        tracing::warn!(ticks = summary.capped_ticks, "Some ticks hit the round cap");
    }

    if let Some(path) = &settings.snapshot_path {
        let json = serde_json::to_string_pretty(&summary.final_state)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Snapshot written");
    }

    engine.shutdown();
    Ok(())
}
