//! Simulation engine
//!
//! Owns the walls and bullets and advances them through ticks. A tick runs
//! rounds of detection, contention resolution and application on the worker
//! pool until no bullet reaches a wall before the tick's target time.

mod config;
mod engine;
mod engine_error;
mod round;
mod snapshot;
mod world;

pub use config::EngineConfig;
pub use engine::{Engine, TickReport};
pub use engine_error::EngineError;
pub use snapshot::{BulletState, EngineState, WallState};
