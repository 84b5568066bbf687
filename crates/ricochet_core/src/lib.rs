//! Ricochet Core
//!
//! Contains the simulation systems:
//! - Wall and bullet entities
//! - Continuous-time collision math
//! - Fork-join worker pool
//! - Round-based tick resolution
//! - Simulation clock and math

pub mod collision;
pub mod entity;
pub mod math;
pub mod pool;
pub mod sim;
pub mod time;

pub use entity::{Bullet, BulletDefinition, Wall, WallDefinition};
pub use sim::{Engine, EngineConfig, EngineError, EngineState, TickReport};

pub use glam;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
