use super::config::EngineConfig;
use super::engine_error::EngineError;
use super::round::run_round;
use super::snapshot::EngineState;
use super::world::World;
use crate::entity::{Bullet, BulletDefinition, Wall, WallDefinition};
use crate::math::Vec2;
use crate::pool::WorkerPool;
use crate::time::SimulationTime;
use ricochet_metrics::{PhaseProfiler, PhaseTiming};
use std::sync::{Mutex, MutexGuard};

/// Outcome of one `Engine::update`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// Clock value once the tick finished.
    pub target_time: f32,
    /// Rounds that destroyed at least one wall.
    pub rounds: u32,
    pub walls_destroyed: usize,
    /// The round cap stopped resolution; hits may have been left unresolved.
    pub capped: bool,
}

#[derive(Debug)]
struct EngineInner {
    world: World,
    clock: SimulationTime,
    profiler: PhaseProfiler,
}

/// Continuous-time wall/bullet simulation.
///
/// Every operation takes the same state lock, so insertions and snapshots
/// are strictly serialized against a running tick. `update` blocks the caller
/// until every round of the tick has resolved.
#[derive(Debug)]
pub struct Engine {
    inner: Mutex<EngineInner>,
    pool: WorkerPool,
    config: EngineConfig,
}

impl Engine {
    /// Create an engine with the default configuration: one worker per
    /// hardware thread and no round cap.
    pub fn new(
        walls: Vec<WallDefinition>,
        bullets: Vec<BulletDefinition>,
    ) -> Result<Self, EngineError> {
        Self::with_config(walls, bullets, EngineConfig::default())
    }

    pub fn with_config(
        walls: Vec<WallDefinition>,
        bullets: Vec<BulletDefinition>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        let pool = WorkerPool::with_capacity(config.resolved_worker_count(), config.queue_capacity)?;
        let world = World::new(walls, bullets);

        tracing::info!(
            walls = world.walls.len(),
            bullets = world.bullets.len(),
            workers = pool.size(),
            "Simulation engine created"
        );

        Ok(Self {
            inner: Mutex::new(EngineInner {
                world,
                clock: SimulationTime::new(),
                profiler: PhaseProfiler::new(),
            }),
            pool,
            config,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, EngineInner>, EngineError> {
        self.inner.lock().map_err(|_| EngineError::Poisoned)
    }

    /// Append a bullet spawned at `time` with `lifetime` seconds to live.
    pub fn add_bullet(
        &self,
        position: Vec2,
        velocity: Vec2,
        time: f32,
        lifetime: f32,
    ) -> Result<(), EngineError> {
        let definition = BulletDefinition::new(position, velocity, time, lifetime);
        let mut inner = self.lock()?;
        inner.world.bullets.push(Bullet::new(definition));
        tracing::trace!(index = inner.world.bullets.len() - 1, ?position, ?velocity, time, "Bullet added");
        Ok(())
    }

    pub fn add_wall(&self, start: Vec2, end: Vec2) -> Result<(), EngineError> {
        let mut inner = self.lock()?;
        inner.world.walls.push(Wall::new(WallDefinition::new(start, end)));
        tracing::trace!(index = inner.world.walls.len() - 1, ?start, ?end, "Wall added");
        Ok(())
    }

    /// Advance the simulation by `delta_time` seconds.
    ///
    /// Collisions inside the step are resolved in rounds until a round finds
    /// nothing to destroy, so a bullet can bounce several times per tick.
    pub fn update(&self, delta_time: f32) -> Result<TickReport, EngineError> {
        if !delta_time.is_finite() || delta_time < 0.0 {
            return Err(EngineError::InvalidDelta(delta_time));
        }

        let mut guard = self.lock()?;
        let EngineInner {
            world,
            clock,
            profiler,
        } = &mut *guard;

        let from = clock.current();
        let target = clock.target_for(delta_time);
        let mut report = TickReport {
            target_time: target,
            ..TickReport::default()
        };

        loop {
            if let Some(max_rounds) = self.config.max_rounds_per_tick {
                if report.rounds >= max_rounds {
                    report.capped = true;
                    tracing::warn!(
                        max_rounds,
                        tick = clock.tick_count(),
                        "Round cap reached; remaining hits deferred"
                    );
                    break;
                }
            }

            let destroyed = run_round(&self.pool, world, profiler, from, target);
            if destroyed == 0 {
                break;
            }
            report.rounds += 1;
            report.walls_destroyed += destroyed;
            tracing::trace!(round = report.rounds, destroyed, "Round resolved");
        }

        clock.advance_to(target);
        tracing::debug!(
            tick = clock.tick_count(),
            time = report.target_time,
            rounds = report.rounds,
            walls_destroyed = report.walls_destroyed,
            walls_alive = world.alive_walls(),
            "Tick complete"
        );
        Ok(report)
    }

    /// Alive walls and active bullets at the current time.
    pub fn generate_state(&self) -> Result<EngineState, EngineError> {
        let inner = self.lock()?;
        Ok(inner.world.snapshot(inner.clock.current()))
    }

    pub fn current_time(&self) -> Result<f32, EngineError> {
        Ok(self.lock()?.clock.current())
    }

    pub fn tick_count(&self) -> Result<u64, EngineError> {
        Ok(self.lock()?.clock.tick_count())
    }

    /// Every wall ever added, destroyed ones included.
    pub fn walls(&self) -> Result<Vec<Wall>, EngineError> {
        Ok(self.lock()?.world.walls.clone())
    }

    /// Every bullet ever added, expired ones included.
    pub fn bullets(&self) -> Result<Vec<Bullet>, EngineError> {
        Ok(self.lock()?.world.bullets.clone())
    }

    pub fn worker_count(&self) -> usize {
        self.pool.size()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Time spent per round phase ("detect", "resolve", "apply"). Empty when
    /// built without the `metrics` feature.
    pub fn phase_timings(&self) -> Result<Vec<(&'static str, PhaseTiming)>, EngineError> {
        Ok(self.lock()?.profiler.timings())
    }

    /// Stop the worker threads. Later ticks still work; round phases then run
    /// on the calling thread.
    pub fn shutdown(&mut self) {
        self.pool.shutdown();
    }
}
