//! Bullet vs. wall collision math.
//!
//! Everything here is pure: no engine state, no allocation. Times returned by
//! the narrow phase are absolute simulation times.

use crate::entity::{Bullet, BulletDefinition, Wall, WallDefinition};
use crate::math::{ApproxEq, Vec2, EPSILON};

/// Position of the bullet at absolute time `time`.
///
/// Queries at or before the spawn time return the spawn position; the motion
/// is never extrapolated backwards.
#[inline]
pub fn evaluate_bullet_location(bullet: &BulletDefinition, time: f32) -> Vec2 {
    let movement_time = (time - bullet.start_time).max(0.0);
    bullet.starting_position + bullet.velocity * movement_time
}

/// Narrow phase: absolute time at which `bullet` hits `wall`, if it does so
/// within its lifetime.
pub fn try_get_time_destroyed(wall: &WallDefinition, bullet: &BulletDefinition) -> Option<f32> {
    if bullet.velocity.approx_eq(Vec2::ZERO) || wall.is_degenerate() {
        return None;
    }

    let change = wall.change();
    let velocity = bullet.velocity;
    let denominator = velocity.y * change.x - velocity.x * change.y;

    let local_time = if denominator.abs() < EPSILON {
        try_get_collinear_bullet_collision_time(wall, bullet)?
    } else {
        let position = bullet.starting_position;
        let numerator = position.x * change.y - position.y * change.x - wall.free_term();
        let time = numerator / denominator;

        // The line is infinite; the wall is not.
        let hit = position + velocity * time;
        let along = (hit - wall.start()).dot(change) / change.length_squared();
        if !(0.0..=1.0).contains(&along) {
            return None;
        }
        time
    };

    if local_time >= 0.0 && local_time < bullet.lifetime {
        Some(local_time + bullet.start_time)
    } else {
        None
    }
}

/// Local collision time for a bullet whose path is parallel to the wall.
///
/// Only a bullet travelling along the wall's own line can hit it. When the
/// bullet approaches the span from outside, the endpoint time with the larger
/// magnitude is used (keeping its sign); a bullet already inside the span hits
/// immediately.
fn try_get_collinear_bullet_collision_time(
    wall: &WallDefinition,
    bullet: &BulletDefinition,
) -> Option<f32> {
    let velocity = bullet.velocity;
    let to_start = wall.start() - bullet.starting_position;
    let to_end = wall.end() - bullet.starting_position;

    let moves_x = velocity.x.abs() >= EPSILON;
    let moves_y = velocity.y.abs() >= EPSILON;

    // An axis the bullet does not move along must already line up.
    if !moves_x && to_start.x.abs() >= EPSILON {
        return None;
    }
    if !moves_y && to_start.y.abs() >= EPSILON {
        return None;
    }

    if moves_x && moves_y {
        let start_time_x = to_start.x / velocity.x;
        let start_time_y = to_start.y / velocity.y;
        if (start_time_x - start_time_y).abs() >= EPSILON {
            // Parallel but offset: the two axes reach the start point at
            // different times.
            return None;
        }
    }

    let (time_to_start, time_to_end) = if velocity.x.abs() >= velocity.y.abs() {
        (to_start.x / velocity.x, to_end.x / velocity.x)
    } else {
        (to_start.y / velocity.y, to_end.y / velocity.y)
    };

    let collision_time = if time_to_start.is_sign_negative() == time_to_end.is_sign_negative() {
        time_to_start.abs().max(time_to_end.abs()).copysign(time_to_start)
    } else {
        0.0
    };

    Some(collision_time)
}

/// Slack added to the broad-phase reach, relative to the magnitude of the
/// coordinates involved. Covers the rounding of the narrow phase.
const REACH_TOLERANCE: f32 = 1e-3;

/// Broad phase: can `bullet` possibly reach `wall` during `[from, to]`?
///
/// Conservative. The bullet's reach over the interval is a disk of radius
/// `|v| * (to - from)` around its position at `from`; the wall can only be hit
/// if the segment's closest point lies inside that disk.
pub fn can_collide(wall: &Wall, bullet: &Bullet, from: f32, to: f32) -> bool {
    if !wall.is_alive() {
        return false;
    }

    let definition = bullet.definition();
    if to < definition.start_time || definition.end_time() <= from {
        return false;
    }

    let segment = wall.definition();
    if segment.is_degenerate() {
        return false;
    }

    let position = evaluate_bullet_location(definition, from);
    let reach = definition.velocity.length() * (to - from);

    let change = segment.change();
    let along = (position - segment.start()).dot(change) / change.length_squared();
    let closest = segment.start() + change * along.clamp(0.0, 1.0);

    let magnitude = position
        .abs()
        .max(segment.start().abs())
        .max(segment.end().abs())
        .max_element();
    let slack = REACH_TOLERANCE * (1.0 + magnitude);

    position.distance(closest) <= reach + slack
}

/// Where `bullet` hits `wall`, if it does.
pub fn try_get_collision_point(wall: &WallDefinition, bullet: &BulletDefinition) -> Option<Vec2> {
    try_get_time_destroyed(wall, bullet).map(|time| evaluate_bullet_location(bullet, time))
}

/// Reflect `velocity` about the wall's unit normal: `v - 2(v.n)n`.
#[inline]
pub fn reflect(velocity: Vec2, wall: &WallDefinition) -> Vec2 {
    let normal = wall.unit_normal();
    velocity - 2.0 * velocity.dot(normal) * normal
}
