use super::snapshot::{BulletState, EngineState, WallState};
use crate::collision::evaluate_bullet_location;
use crate::entity::{Bullet, BulletDefinition, Wall, WallDefinition};

/// The entity collections. Append-only: walls are marked destroyed and
/// bullets outlive their active window, but neither is ever removed, so
/// indices stay stable for the lifetime of the world.
#[derive(Debug, Clone, Default)]
pub(crate) struct World {
    pub walls: Vec<Wall>,
    pub bullets: Vec<Bullet>,
}

impl World {
    pub fn new(walls: Vec<WallDefinition>, bullets: Vec<BulletDefinition>) -> Self {
        Self {
            walls: walls.into_iter().map(Wall::from).collect(),
            bullets: bullets.into_iter().map(Bullet::from).collect(),
        }
    }

    pub fn alive_walls(&self) -> usize {
        self.walls.iter().filter(|wall| wall.is_alive()).count()
    }

    pub fn snapshot(&self, time: f32) -> EngineState {
        let walls = self
            .walls
            .iter()
            .filter(|wall| wall.is_alive())
            .map(|wall| WallState {
                start: wall.definition().start(),
                end: wall.definition().end(),
            })
            .collect();

        let bullets = self
            .bullets
            .iter()
            .map(Bullet::definition)
            .filter(|definition| definition.is_active_at(time))
            .map(|definition| BulletState {
                position: evaluate_bullet_location(definition, time),
                velocity: definition.velocity,
            })
            .collect();

        EngineState {
            time,
            walls,
            bullets,
        }
    }
}
