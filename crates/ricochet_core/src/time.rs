//! Simulation clock
//!
//! Continuous time in seconds. Unlike a fixed-rate game clock the step size is
//! whatever the driver passes to `Engine::update`, so the clock only enforces
//! monotonicity and counts ticks.

/// Simulation time tracker
#[derive(Debug, Clone, Default)]
pub struct SimulationTime {
    tick_count: u64,
    current: f32,
}

impl SimulationTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Seconds since the start of the simulation.
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Where a tick of `delta` seconds will end.
    pub fn target_for(&self, delta: f32) -> f32 {
        self.current + delta
    }

    /// Finish a tick at `target`. The clock never moves backwards.
    pub fn advance_to(&mut self, target: f32) {
        debug_assert!(target >= self.current, "simulation clock moved backwards");
        self.current = self.current.max(target);
        self.tick_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_counts_ticks() {
        let mut time = SimulationTime::new();
        let target = time.target_for(0.25);
        time.advance_to(target);
        time.advance_to(time.target_for(0.25));

        assert_eq!(time.tick_count(), 2);
        assert!((time.current() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_delta_still_ticks() {
        let mut time = SimulationTime::new();
        time.advance_to(time.target_for(0.0));
        assert_eq!(time.tick_count(), 1);
        assert_eq!(time.current(), 0.0);
    }
}
