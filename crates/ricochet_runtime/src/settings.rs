//! Runtime settings

use anyhow::{Context, Result};
use ricochet_core::math::Vec2;
use ricochet_core::EngineConfig;
use ricochet_scenario::{PointRecord, DEFAULT_BULLET_LIFETIME};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything the headless driver needs. Every field has a default, so a
/// settings file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    pub walls_path: PathBuf,
    pub bullets_path: PathBuf,
    /// Replaces the scenario files with a seeded random layout.
    pub generate: Option<GenerateSettings>,
    pub engine: EngineConfig,
    pub frames: u32,
    pub target_fps: u32,
    /// Largest step handed to `Engine::update`, in seconds.
    pub max_step_secs: f32,
    /// Sleep to hold `target_fps` and step by measured wall-clock time.
    /// Otherwise every frame advances exactly `1 / target_fps`.
    pub realtime: bool,
    /// Log a progress line every this many frames (0 disables).
    pub report_every_frames: u32,
    pub launches: Vec<Launch>,
    /// Where to write the final snapshot as JSON.
    pub snapshot_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateSettings {
    pub walls: usize,
    pub bullets: usize,
    pub seed: u64,
}

/// A bullet fired at a given frame, aimed from `start` through `end`. The
/// distance between the two points is the distance covered per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    pub frame: u32,
    pub start: PointRecord,
    pub end: PointRecord,
    #[serde(default = "default_lifetime")]
    pub lifetime: f32,
}

fn default_lifetime() -> f32 {
    DEFAULT_BULLET_LIFETIME
}

impl Launch {
    pub fn velocity(&self) -> Vec2 {
        Vec2::from(self.end) - Vec2::from(self.start)
    }
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            walls_path: PathBuf::from("walls.json"),
            bullets_path: PathBuf::from("bullets.json"),
            generate: None,
            engine: EngineConfig::default(),
            frames: 600,
            target_fps: 60,
            max_step_secs: 1.0,
            realtime: false,
            report_every_frames: 60,
            launches: Vec::new(),
            snapshot_path: None,
        }
    }
}

impl RuntimeSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings: Self = serde_json::from_str(&json)
            .with_context(|| format!("invalid settings in {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.target_fps > 0, "target_fps must be positive");
        anyhow::ensure!(
            self.max_step_secs.is_finite() && self.max_step_secs > 0.0,
            "max_step_secs must be positive, got {}",
            self.max_step_secs
        );
        for launch in &self.launches {
            anyhow::ensure!(
                launch.lifetime.is_finite() && launch.lifetime >= 0.0,
                "launch at frame {} has invalid lifetime {}",
                launch.frame,
                launch.lifetime
            );
        }
        Ok(())
    }

    /// Simulated seconds per frame when not running in real time.
    pub fn frame_step_secs(&self) -> f32 {
        (1.0 / self.target_fps as f32).min(self.max_step_secs)
    }
}
