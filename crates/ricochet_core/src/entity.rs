//! Walls and bullets.
//!
//! Definitions are plain geometry. `Wall` and `Bullet` add the run-time state
//! the engine mutates while resolving a tick.

use crate::math::{ApproxEq, Vec2};

/// Immutable line segment plus the terms the collision solver derives from it.
///
/// `change` and `free_term` are computed once at construction; the fields are
/// private so they cannot drift from the endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallDefinition {
    start: Vec2,
    end: Vec2,
    change: Vec2,
    free_term: f32,
}

impl WallDefinition {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            change: end - start,
            free_term: start.x * end.y - start.y * end.x,
        }
    }

    #[inline]
    pub fn start(&self) -> Vec2 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Vec2 {
        self.end
    }

    /// `end - start`
    #[inline]
    pub fn change(&self) -> Vec2 {
        self.change
    }

    /// Constant term of the line through `start` and `end`: a point `q` lies on
    /// the line when `q.x * change.y - q.y * change.x - free_term == 0`.
    #[inline]
    pub fn free_term(&self) -> f32 {
        self.free_term
    }

    /// Zero-length walls can never be hit.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.change.approx_eq(Vec2::ZERO)
    }

    /// Unit normal of the wall's line. Only meaningful for non-degenerate walls.
    #[inline]
    pub fn unit_normal(&self) -> Vec2 {
        self.change.perp().normalize()
    }
}

/// A wall plus its destruction state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    definition: WallDefinition,
    time_destroyed: Option<f32>,
}

impl Wall {
    pub fn new(definition: WallDefinition) -> Self {
        Self {
            definition,
            time_destroyed: None,
        }
    }

    #[inline]
    pub fn definition(&self) -> &WallDefinition {
        &self.definition
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.time_destroyed.is_none()
    }

    /// Simulation time at which a bullet broke this wall.
    #[inline]
    pub fn time_destroyed(&self) -> Option<f32> {
        self.time_destroyed
    }

    /// Destruction is permanent.
    ///
    /// # Panics
    /// If the wall was already destroyed. Two bullets resolving against the
    /// same wall means the round's bookkeeping is corrupt.
    pub fn destroy(&mut self, time: f32) {
        assert!(
            self.time_destroyed.is_none(),
            "wall destroyed twice (at {:?} and {})",
            self.time_destroyed,
            time
        );
        self.time_destroyed = Some(time);
    }
}

impl From<WallDefinition> for Wall {
    fn from(definition: WallDefinition) -> Self {
        Self::new(definition)
    }
}

/// Linear motion of a point bullet, valid on `[start_time, start_time + lifetime)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletDefinition {
    pub starting_position: Vec2,
    pub velocity: Vec2,
    pub start_time: f32,
    pub lifetime: f32,
}

impl BulletDefinition {
    pub fn new(starting_position: Vec2, velocity: Vec2, start_time: f32, lifetime: f32) -> Self {
        Self {
            starting_position,
            velocity,
            start_time,
            lifetime,
        }
    }

    /// First instant at which the bullet is no longer active.
    #[inline]
    pub fn end_time(&self) -> f32 {
        self.start_time + self.lifetime
    }

    #[inline]
    pub fn is_active_at(&self, time: f32) -> bool {
        time >= self.start_time && time < self.end_time()
    }
}

/// A bullet and how many walls it has bounced off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    definition: BulletDefinition,
    bounces: u32,
}

impl Bullet {
    pub fn new(definition: BulletDefinition) -> Self {
        Self {
            definition,
            bounces: 0,
        }
    }

    #[inline]
    pub fn definition(&self) -> &BulletDefinition {
        &self.definition
    }

    #[inline]
    pub fn bounces(&self) -> u32 {
        self.bounces
    }

    /// Restart the bullet's motion from an impact.
    ///
    /// The whole definition is replaced: the bullet now starts at `position`
    /// at `time` with `velocity`, and its lifetime shrinks by the time spent
    /// travelling since the previous start.
    pub fn bounce(&mut self, position: Vec2, velocity: Vec2, time: f32) {
        let elapsed = time - self.definition.start_time;
        debug_assert!(elapsed >= 0.0, "bounce before the bullet's start time");
        self.definition = BulletDefinition {
            starting_position: position,
            velocity,
            start_time: time,
            lifetime: self.definition.lifetime - elapsed,
        };
        self.bounces += 1;
    }
}

impl From<BulletDefinition> for Bullet {
    fn from(definition: BulletDefinition) -> Self {
        Self::new(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_derived_terms() {
        let wall = WallDefinition::new(Vec2::new(1.0, 2.0), Vec2::new(4.0, 6.0));
        assert_eq!(wall.change(), Vec2::new(3.0, 4.0));
        assert_eq!(wall.free_term(), 1.0 * 6.0 - 2.0 * 4.0);

        // Both endpoints satisfy the line equation.
        for q in [wall.start(), wall.end()] {
            let side = q.x * wall.change().y - q.y * wall.change().x - wall.free_term();
            assert!(side.abs() < 1e-5);
        }
    }

    #[test]
    fn test_wall_unit_normal() {
        let wall = WallDefinition::new(Vec2::new(0.0, 10.0), Vec2::new(0.0, 20.0));
        let normal = wall.unit_normal();
        assert!((normal.length() - 1.0).abs() < 1e-6);
        assert!(normal.dot(wall.change()).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_wall() {
        let point = Vec2::new(3.0, 3.0);
        assert!(WallDefinition::new(point, point).is_degenerate());
        assert!(!WallDefinition::new(point, point + Vec2::X).is_degenerate());
    }

    #[test]
    fn test_wall_destroy_is_recorded() {
        let mut wall = Wall::new(WallDefinition::new(Vec2::ZERO, Vec2::X));
        assert!(wall.is_alive());
        wall.destroy(0.75);
        assert!(!wall.is_alive());
        assert_eq!(wall.time_destroyed(), Some(0.75));
    }

    #[test]
    #[should_panic(expected = "wall destroyed twice")]
    fn test_wall_cannot_be_destroyed_twice() {
        let mut wall = Wall::new(WallDefinition::new(Vec2::ZERO, Vec2::X));
        wall.destroy(0.5);
        wall.destroy(0.6);
    }

    #[test]
    fn test_bullet_active_window() {
        let def = BulletDefinition::new(Vec2::ZERO, Vec2::X, 1.0, 0.5);
        assert!(!def.is_active_at(0.99));
        assert!(def.is_active_at(1.0));
        assert!(def.is_active_at(1.49));
        assert!(!def.is_active_at(1.5));
    }

    #[test]
    fn test_bullet_bounce_replaces_definition() {
        let mut bullet = Bullet::new(BulletDefinition::new(Vec2::ZERO, Vec2::X, 1.0, 3.0));
        bullet.bounce(Vec2::new(2.0, 0.0), -Vec2::X, 3.0);

        let def = bullet.definition();
        assert_eq!(def.starting_position, Vec2::new(2.0, 0.0));
        assert_eq!(def.velocity, -Vec2::X);
        assert_eq!(def.start_time, 3.0);
        assert_eq!(def.lifetime, 1.0);
        assert_eq!(def.end_time(), 4.0);
        assert_eq!(bullet.bounces(), 1);
    }
}
