use crate::math::Vec2;
use serde::{Deserialize, Serialize};

/// Externally visible state at one instant, as handed to a renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    pub time: f32,
    /// Walls that have not been destroyed.
    pub walls: Vec<WallState>,
    /// Bullets inside their active window.
    pub bullets: Vec<BulletState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallState {
    pub start: Vec2,
    pub end: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BulletState {
    pub position: Vec2,
    pub velocity: Vec2,
}
