//! One detect / resolve / apply round of a tick.
//!
//! Detection runs per wall partition, application per bullet partition. The
//! resolve step in between is sequential and is where cross-partition choices
//! are made, so the outcome never depends on the number of workers.

use super::world::World;
use crate::collision::{can_collide, evaluate_bullet_location, reflect, try_get_time_destroyed};
use crate::entity::{Bullet, Wall};
use crate::pool::WorkerPool;
use ricochet_metrics::{time_scope, PhaseProfiler};
use std::ops::Range;

/// Earliest bullet to reach one wall during a round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    pub bullet: usize,
    pub time: f32,
}

/// A bullet's single accepted impact for a round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Impact {
    pub wall: usize,
    pub time: f32,
}

/// For each wall in `range`, the earliest bullet that hits it in `(from, to]`.
///
/// Equal times keep the lower bullet index.
pub(crate) fn detect_range(
    walls: &[Wall],
    bullets: &[Bullet],
    range: Range<usize>,
    from: f32,
    to: f32,
) -> Vec<Option<Candidate>> {
    walls[range]
        .iter()
        .map(|wall| {
            let mut earliest: Option<Candidate> = None;
            for (index, bullet) in bullets.iter().enumerate() {
                if !can_collide(wall, bullet, from, to) {
                    continue;
                }
                let Some(time) = try_get_time_destroyed(wall.definition(), bullet.definition())
                else {
                    continue;
                };
                if time <= from || time > to {
                    continue;
                }
                if earliest.map_or(true, |best| time < best.time) {
                    earliest = Some(Candidate { bullet: index, time });
                }
            }
            earliest
        })
        .collect()
}

/// Keep at most one wall per bullet: the earliest, lower wall index on ties.
///
/// `candidates` is indexed by wall; the result is indexed by bullet.
pub(crate) fn resolve_contention(
    candidates: &[Option<Candidate>],
    bullet_count: usize,
) -> Vec<Option<Impact>> {
    let mut impacts: Vec<Option<Impact>> = vec![None; bullet_count];
    for (wall, candidate) in candidates.iter().enumerate() {
        let Some(candidate) = candidate else { continue };
        let slot = &mut impacts[candidate.bullet];
        if slot.map_or(true, |current| candidate.time < current.time) {
            *slot = Some(Impact {
                wall,
                time: candidate.time,
            });
        }
    }
    impacts
}

/// Bounce every bullet in `bullets` that has an impact. `offset` is the index
/// of `bullets[0]` in the full collection. Returns the number of bounces.
pub(crate) fn apply_range(
    walls: &[Wall],
    impacts: &[Option<Impact>],
    offset: usize,
    bullets: &mut [Bullet],
) -> usize {
    let mut bounced = 0;
    for (local, bullet) in bullets.iter_mut().enumerate() {
        let Some(impact) = impacts[offset + local] else {
            continue;
        };
        let segment = walls[impact.wall].definition();
        let position = evaluate_bullet_location(bullet.definition(), impact.time);
        let velocity = reflect(bullet.definition().velocity, segment);
        bullet.bounce(position, velocity, impact.time);
        bounced += 1;
    }
    bounced
}

/// Run one round over `world`. Returns how many walls were destroyed.
pub(crate) fn run_round(
    pool: &WorkerPool,
    world: &mut World,
    profiler: &mut PhaseProfiler,
    from: f32,
    to: f32,
) -> usize {
    let World { walls, bullets } = world;

    let candidates: Vec<Option<Candidate>> = {
        let walls = walls.as_slice();
        let bullets = bullets.as_slice();
        time_scope!(profiler, "detect", {
            pool.map_ranges(walls.len(), |range| detect_range(walls, bullets, range, from, to))
                .into_iter()
                .flatten()
                .collect()
        })
    };

    let impacts = time_scope!(profiler, "resolve", {
        resolve_contention(&candidates, bullets.len())
    });

    let mut destroyed = 0;
    for impact in impacts.iter().flatten() {
        // Each wall is the earliest candidate of exactly one bullet, so this
        // can only fire if the partitioning above is broken.
        walls[impact.wall].destroy(impact.time);
        destroyed += 1;
    }
    if destroyed == 0 {
        return 0;
    }

    let walls = walls.as_slice();
    let impacts = impacts.as_slice();
    let bounced = time_scope!(profiler, "apply", {
        pool.map_chunks_mut(bullets.as_mut_slice(), |offset, chunk| {
            apply_range(walls, impacts, offset, chunk)
        })
        .into_iter()
        .sum::<usize>()
    });
    debug_assert_eq!(bounced, destroyed);

    destroyed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{BulletDefinition, WallDefinition};
    use crate::math::Vec2;

    fn wall(start: (f32, f32), end: (f32, f32)) -> Wall {
        Wall::new(WallDefinition::new(Vec2::new(start.0, start.1), Vec2::new(end.0, end.1)))
    }

    fn bullet(position: (f32, f32), velocity: (f32, f32)) -> Bullet {
        Bullet::new(BulletDefinition::new(
            Vec2::new(position.0, position.1),
            Vec2::new(velocity.0, velocity.1),
            0.0,
            100.0,
        ))
    }

    #[test]
    fn test_detect_keeps_earliest_bullet() {
        let walls = vec![wall((0.0, 10.0), (0.0, 20.0))];
        let bullets = vec![bullet((-8.0, 15.0), (10.0, 0.0)), bullet((-2.0, 12.0), (10.0, 0.0))];

        let hits = detect_range(&walls, &bullets, 0..1, 0.0, 1.0);
        assert_eq!(hits.len(), 1);
        let hit = hits[0].unwrap();
        assert_eq!(hit.bullet, 1);
        assert!((hit.time - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_detect_tie_keeps_lower_bullet_index() {
        let walls = vec![wall((0.0, 10.0), (0.0, 20.0))];
        let bullets = vec![bullet((-5.0, 12.0), (10.0, 0.0)), bullet((-5.0, 18.0), (10.0, 0.0))];

        let hit = detect_range(&walls, &bullets, 0..1, 0.0, 1.0)[0].unwrap();
        assert_eq!(hit.bullet, 0);
    }

    #[test]
    fn test_detect_window_excludes_later_hits() {
        let walls = vec![wall((0.0, 10.0), (0.0, 20.0))];
        let bullets = vec![bullet((-5.0, 15.0), (10.0, 0.0))];

        assert!(detect_range(&walls, &bullets, 0..1, 0.0, 0.25)[0].is_none());
        // The upper bound is inclusive.
        assert!(detect_range(&walls, &bullets, 0..1, 0.0, 0.5)[0].is_some());
    }

    #[test]
    fn test_contention_keeps_earliest_wall() {
        let candidates = vec![
            Some(Candidate { bullet: 0, time: 0.7 }),
            Some(Candidate { bullet: 0, time: 0.3 }),
            None,
            Some(Candidate { bullet: 1, time: 0.3 }),
            Some(Candidate { bullet: 1, time: 0.3 }),
        ];

        let impacts = resolve_contention(&candidates, 3);
        assert_eq!(impacts[0], Some(Impact { wall: 1, time: 0.3 }));
        assert_eq!(impacts[1], Some(Impact { wall: 3, time: 0.3 }));
        assert_eq!(impacts[2], None);
    }

    #[test]
    fn test_apply_bounces_only_impacted_bullets() {
        let walls = vec![wall((0.0, 10.0), (0.0, 20.0))];
        let mut bullets = vec![bullet((-5.0, 15.0), (10.0, 0.0)), bullet((-5.0, 40.0), (10.0, 0.0))];
        let impacts = vec![Some(Impact { wall: 0, time: 0.5 }), None];

        assert_eq!(apply_range(&walls, &impacts, 0, &mut bullets), 1);
        let bounced = bullets[0].definition();
        assert_eq!(bounced.starting_position, Vec2::new(0.0, 15.0));
        assert_eq!(bounced.velocity, Vec2::new(-10.0, 0.0));
        assert_eq!(bounced.start_time, 0.5);
        assert_eq!(bounced.lifetime, 99.5);
        assert_eq!(bullets[0].bounces(), 1);
        assert_eq!(bullets[1].bounces(), 0);
    }

    #[test]
    fn test_apply_respects_offset() {
        let walls = vec![wall((0.0, 10.0), (0.0, 20.0))];
        let mut bullets = vec![bullet((-5.0, 15.0), (10.0, 0.0))];
        let impacts = vec![None, Some(Impact { wall: 0, time: 0.5 })];

        assert_eq!(apply_range(&walls, &impacts, 1, &mut bullets), 1);
        assert_eq!(bullets[0].bounces(), 1);
    }

    #[test]
    fn test_run_round_destroys_and_bounces() {
        let pool = WorkerPool::new(2).unwrap();
        let mut world = World::new(
            vec![*wall((0.0, 10.0), (0.0, 20.0)).definition()],
            vec![*bullet((-5.0, 15.0), (10.0, 0.0)).definition()],
        );
        let mut profiler = PhaseProfiler::new();

        assert_eq!(run_round(&pool, &mut world, &mut profiler, 0.0, 1.0), 1);
        assert_eq!(world.walls[0].time_destroyed(), Some(0.5));
        assert_eq!(world.bullets[0].bounces(), 1);

        // The bullet now travels away; nothing is left to hit.
        assert_eq!(run_round(&pool, &mut world, &mut profiler, 0.0, 1.0), 0);
    }
}
