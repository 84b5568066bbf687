//! Seeded random scenarios
//!
//! Same layout as the scripts that produced the stock `walls.json` and
//! `bullets.json`: integer coordinates, walls anywhere in the 1000x1000 arena,
//! bullets launched from a small square near its middle.

use crate::format::DEFAULT_BULLET_LIFETIME;
use ricochet_core::math::{DeterministicRng, Vec2};
use ricochet_core::{BulletDefinition, WallDefinition};

const ARENA_MIN: i32 = 0;
const ARENA_MAX: i32 = 1000;
const LAUNCH_MIN: i32 = 300;
const LAUNCH_MAX: i32 = 400;
const SPEED_LIMIT: i32 = 100;

fn point_in(rng: &mut DeterministicRng, min: i32, max: i32) -> Vec2 {
    let x = rng.next_int_in(min, max);
    let y = rng.next_int_in(min, max);
    Vec2::new(x as f32, y as f32)
}

pub fn generate_walls(count: usize, seed: u64) -> Vec<WallDefinition> {
    let mut rng = DeterministicRng::new(seed);
    (0..count)
        .map(|_| {
            let start = point_in(&mut rng, ARENA_MIN, ARENA_MAX);
            let end = point_in(&mut rng, ARENA_MIN, ARENA_MAX);
            WallDefinition::new(start, end)
        })
        .collect()
}

/// Bullets all spawn at time 0 with the default lifetime.
pub fn generate_bullets(count: usize, seed: u64) -> Vec<BulletDefinition> {
    let mut rng = DeterministicRng::new(seed);
    (0..count)
        .map(|_| {
            let start = point_in(&mut rng, LAUNCH_MIN, LAUNCH_MAX);
            let velocity = point_in(&mut rng, -SPEED_LIMIT, SPEED_LIMIT);
            BulletDefinition::new(start, velocity, 0.0, DEFAULT_BULLET_LIFETIME)
        })
        .collect()
}
