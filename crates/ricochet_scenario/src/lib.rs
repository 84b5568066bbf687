//! Ricochet Scenario
//!
//! Builds the initial walls and bullets handed to `ricochet_core::Engine`:
//! JSON files on disk, or seeded random layouts.

mod format;
mod generate;
mod scenario_error;

pub use format::{
    parse_bullets, parse_walls, BulletRecord, PointRecord, WallRecord, DEFAULT_BULLET_LIFETIME,
};
pub use generate::{generate_bullets, generate_walls};
pub use scenario_error::ScenarioError;

use ricochet_core::math::Vec2;
use ricochet_core::{BulletDefinition, WallDefinition};
use std::io;
use std::path::Path;

/// The wall used when a scenario provides none.
pub fn default_wall() -> WallDefinition {
    WallDefinition::new(Vec2::new(10.0, 100.0), Vec2::new(100.0, 100.0))
}

/// Initial simulation contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scenario {
    pub walls: Vec<WallDefinition>,
    pub bullets: Vec<BulletDefinition>,
}

impl Scenario {
    /// Load walls and bullets from JSON files.
    ///
    /// A missing walls file, or one with no walls, yields `default_wall()`.
    /// A missing bullets file yields no bullets.
    pub fn load(walls_path: &Path, bullets_path: &Path) -> Result<Self, ScenarioError> {
        let mut walls = match read_optional(walls_path)? {
            Some(json) => parse_walls(&json)?,
            None => Vec::new(),
        };
        if walls.is_empty() {
            tracing::info!(path = %walls_path.display(), "No walls in scenario, using default wall");
            walls.push(default_wall());
        }

        let bullets = match read_optional(bullets_path)? {
            Some(json) => parse_bullets(&json)?,
            None => Vec::new(),
        };

        tracing::info!(walls = walls.len(), bullets = bullets.len(), "Scenario loaded");
        Ok(Self { walls, bullets })
    }

    pub fn generate(wall_count: usize, bullet_count: usize, seed: u64) -> Self {
        let scenario = Self {
            walls: generate_walls(wall_count, seed),
            // Different stream from the walls.
            bullets: generate_bullets(bullet_count, seed.wrapping_add(1)),
        };
        tracing::info!(
            walls = scenario.walls.len(),
            bullets = scenario.bullets.len(),
            seed,
            "Scenario generated"
        );
        scenario
    }

    pub fn walls_json(&self) -> Result<String, ScenarioError> {
        let records: Vec<WallRecord> = self.walls.iter().map(WallRecord::from).collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    pub fn bullets_json(&self) -> Result<String, ScenarioError> {
        let records: Vec<BulletRecord> = self.bullets.iter().map(BulletRecord::from).collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, ScenarioError> {
    match std::fs::read_to_string(path) {
        Ok(json) => Ok(Some(json)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Scenario file not found");
            Ok(None)
        }
        Err(source) => Err(ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ricochet-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_files_fall_back() {
        let dir = scratch_dir("missing");
        let scenario = Scenario::load(&dir.join("walls.json"), &dir.join("bullets.json")).unwrap();

        assert_eq!(scenario.walls, vec![default_wall()]);
        assert!(scenario.bullets.is_empty());
    }

    #[test]
    fn test_empty_wall_list_falls_back() {
        let dir = scratch_dir("empty");
        let walls = dir.join("walls.json");
        std::fs::write(&walls, "[]").unwrap();

        let scenario = Scenario::load(&walls, &dir.join("bullets.json")).unwrap();
        assert_eq!(scenario.walls, vec![default_wall()]);
    }

    #[test]
    fn test_written_scenario_loads_back() {
        let dir = scratch_dir("written");
        let scenario = Scenario::generate(25, 10, 1234);
        let walls = dir.join("walls.json");
        let bullets = dir.join("bullets.json");
        std::fs::write(&walls, scenario.walls_json().unwrap()).unwrap();
        std::fs::write(&bullets, scenario.bullets_json().unwrap()).unwrap();

        assert_eq!(Scenario::load(&walls, &bullets).unwrap(), scenario);
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let dir = scratch_dir("invalid");
        let bullets = dir.join("bullets.json");
        std::fs::write(&bullets, r#"[{"start": {"x": 0, "y": 0}, "velocity": {"x": 1, "y": 1}, "time": -2}]"#)
            .unwrap();

        let result = Scenario::load(&dir.join("walls.json"), &bullets);
        assert!(matches!(result, Err(ScenarioError::InvalidTime { field: "time", .. })));
    }

    #[test]
    fn test_directory_is_an_io_error() {
        let dir = scratch_dir("directory");
        let result = Scenario::load(&dir, &dir.join("bullets.json"));
        assert!(matches!(result, Err(ScenarioError::Io { .. })));
    }
}
