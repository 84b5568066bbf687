//! Per-phase timing for the tick resolution loop

use crate::PhaseTiming;
use std::time::Instant;

/// Accumulates wall-clock time per named phase ("detect", "apply", ...).
///
/// Phases are kept in first-seen order so reports are stable between runs.
#[derive(Debug, Default)]
pub struct PhaseProfiler {
    phases: Vec<(&'static str, PhaseTiming)>,
}

impl PhaseProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time_phase<F, R>(&mut self, name: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        let index = match self.phases.iter().position(|(phase, _)| *phase == name) {
            Some(index) => index,
            None => {
                self.phases.push((name, PhaseTiming::default()));
                self.phases.len() - 1
            }
        };
        let timing = &mut self.phases[index].1;
        timing.total += elapsed;
        timing.calls += 1;
        result
    }

    pub fn timing(&self, name: &str) -> PhaseTiming {
        self.phases
            .iter()
            .find(|(phase, _)| *phase == name)
            .map(|(_, timing)| *timing)
            .unwrap_or_default()
    }

    pub fn timings(&self) -> Vec<(&'static str, PhaseTiming)> {
        self.phases.clone()
    }

    pub fn reset(&mut self) {
        self.phases.clear();
    }
}
