//! Headless frame loop: launches, tick, snapshot, pacing.

use crate::settings::{Launch, RuntimeSettings};
use anyhow::Result;
use ricochet_core::collision::try_get_collision_point;
use ricochet_core::math::Vec2;
use ricochet_core::{BulletDefinition, Engine, EngineState, WallDefinition};
use ricochet_metrics::FrameTimer;
use std::time::{Duration, Instant};

/// Diagonal across the arena. Launches are checked against it and the
/// hit is logged, the way the interactive front end previews a drag.
fn diagonal_wall() -> WallDefinition {
    WallDefinition::new(Vec2::ZERO, Vec2::new(1000.0, 1000.0))
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: u32,
    pub walls_destroyed: usize,
    pub capped_ticks: u32,
    pub final_state: EngineState,
}

pub struct Driver<'a> {
    engine: &'a Engine,
    settings: &'a RuntimeSettings,
    frame_timer: FrameTimer,
}

impl<'a> Driver<'a> {
    pub fn new(engine: &'a Engine, settings: &'a RuntimeSettings) -> Self {
        Self {
            engine,
            settings,
            frame_timer: FrameTimer::new(settings.target_fps.max(1) as usize),
        }
    }

    pub fn run(&mut self) -> Result<RunSummary> {
        let target_frame_time = Duration::from_secs_f32(1.0 / self.settings.target_fps as f32);
        let max_step = self.settings.max_step_secs;
        let mut walls_destroyed = 0;
        let mut capped_ticks = 0;
        let mut last_frame = Instant::now();

        for frame in 0..self.settings.frames {
            let frame_start = Instant::now();
            self.frame_timer.begin();

            for launch in self.settings.launches.iter().filter(|launch| launch.frame == frame) {
                self.launch(launch)?;
            }

            let delta = if self.settings.realtime {
                let elapsed = frame_start.duration_since(last_frame).as_secs_f32();
                elapsed.min(max_step)
            } else {
                self.settings.frame_step_secs()
            };
            last_frame = frame_start;

            let report = self.engine.update(delta)?;
            walls_destroyed += report.walls_destroyed;
            if report.capped {
                capped_ticks += 1;
            }

            self.frame_timer.end();

            let every = self.settings.report_every_frames;
            if every > 0 && (frame + 1) % every == 0 {
                self.report_progress(frame + 1)?;
            }

            if self.settings.realtime {
                if let Some(remaining) = target_frame_time.checked_sub(frame_start.elapsed()) {
                    std::thread::sleep(remaining);
                }
            }
        }

        Ok(RunSummary {
            frames: self.settings.frames,
            walls_destroyed,
            capped_ticks,
            final_state: self.engine.generate_state()?,
        })
    }

    fn launch(&self, launch: &Launch) -> Result<()> {
        let start = Vec2::from(launch.start);
        let velocity = launch.velocity();
        let now = self.engine.current_time()?;

        let preview = BulletDefinition::new(start, velocity, 0.0, 1.0);
        match try_get_collision_point(&diagonal_wall(), &preview) {
            Some(hit) => tracing::debug!(?start, ?velocity, ?hit, "Launch crosses the diagonal wall"),
            None => tracing::debug!(?start, ?velocity, "Launch misses the diagonal wall"),
        }

        self.engine.add_bullet(start, velocity, now, launch.lifetime)?;
        tracing::info!(frame = launch.frame, ?start, ?velocity, time = now, "Bullet launched");
        Ok(())
    }

    fn report_progress(&self, frame: u32) -> Result<()> {
        let state = self.engine.generate_state()?;
        let (min_ms, max_ms) = self.frame_timer.frame_time_range_ms();
        tracing::info!(
            frame,
            time = state.time,
            walls = state.walls.len(),
            bullets = state.bullets.len(),
            fps = self.frame_timer.fps(),
            frame_ms = self.frame_timer.frame_time_ms(),
            min_ms,
            max_ms,
            "Progress"
        );
        for (phase, timing) in self.engine.phase_timings()? {
            tracing::debug!(
                phase,
                calls = timing.calls,
                avg_us = timing.average().as_micros() as u64,
                "Phase timing"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ricochet_core::EngineConfig;
    use ricochet_scenario::PointRecord;

    fn settings(frames: u32) -> RuntimeSettings {
        RuntimeSettings {
            frames,
            target_fps: 10,
            report_every_frames: 0,
            engine: EngineConfig::with_workers(2),
            ..RuntimeSettings::default()
        }
    }

    #[test]
    fn test_fixed_steps_advance_clock() {
        let engine =
            Engine::with_config(Vec::new(), Vec::new(), EngineConfig::with_workers(2)).unwrap();
        let settings = settings(10);

        let summary = Driver::new(&engine, &settings).run().unwrap();
        assert_eq!(summary.frames, 10);
        assert!((summary.final_state.time - 1.0).abs() < 1e-5);
        assert_eq!(engine.tick_count().unwrap(), 10);
    }

    #[test]
    fn test_launch_destroys_wall() {
        let walls = vec![WallDefinition::new(Vec2::new(10.0, -10.0), Vec2::new(10.0, 10.0))];
        let engine = Engine::with_config(walls, Vec::new(), EngineConfig::with_workers(2)).unwrap();
        let mut settings = settings(10);
        settings.launches.push(Launch {
            frame: 2,
            start: PointRecord { x: 0.0, y: 0.0 },
            end: PointRecord { x: 20.0, y: 0.0 },
            lifetime: 5.0,
        });

        let summary = Driver::new(&engine, &settings).run().unwrap();
        assert_eq!(summary.walls_destroyed, 1);
        assert!(summary.final_state.walls.is_empty());
        assert_eq!(summary.final_state.bullets.len(), 1);

        // Launched at t=0.2, reaching x=10 half a second later.
        let destroyed = engine.walls().unwrap()[0].time_destroyed().unwrap();
        assert!((destroyed - 0.7).abs() < 1e-4);
    }

    #[test]
    fn test_diagonal_hit_for_crossing_launch() {
        let preview =
            BulletDefinition::new(Vec2::new(0.0, 500.0), Vec2::new(1000.0, 0.0), 0.0, 1.0);
        let hit = try_get_collision_point(&diagonal_wall(), &preview).unwrap();
        assert!((hit - Vec2::new(500.0, 500.0)).length() < 1e-3);
    }
}
