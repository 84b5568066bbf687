//! Ricochet Metrics - timing helpers for the simulation and its driver
//!
//! Provides zero-cost abstractions for metrics collection that completely
//! vanish in production builds via feature flags.
//!
//! # Feature Flags
//!
//! - `metrics` - Enable metrics collection (default: disabled)
//!
//! # Usage
//!
//! ```ignore
//! use ricochet_metrics::{time_scope, PhaseProfiler};
//!
//! let mut profiler = PhaseProfiler::new();
//! let hits = time_scope!(profiler, "detect", { detect_hits() });
//! for (phase, timing) in profiler.timings() {
//!     println!("{phase}: {:?} over {} calls", timing.total, timing.calls);
//! }
//! ```
//!
//! Without the `metrics` feature every type below is an empty stub and the
//! macros expand to the bare body.

#[cfg(feature = "metrics")]
mod frame_timer;
#[cfg(feature = "metrics")]
mod phase_profiler;
#[cfg(feature = "metrics")]
mod ring_buffer;

#[cfg(feature = "metrics")]
pub use frame_timer::FrameTimer;
#[cfg(feature = "metrics")]
pub use phase_profiler::PhaseProfiler;
#[cfg(feature = "metrics")]
pub use ring_buffer::RingBuffer;

use std::time::Duration;

/// Accumulated time spent in one named phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseTiming {
    pub total: Duration,
    pub calls: u64,
}

impl PhaseTiming {
    pub fn average(&self) -> Duration {
        if self.calls == 0 {
            Duration::ZERO
        } else {
            self.total.div_f64(self.calls as f64)
        }
    }
}

// ============================================================================
// Macros for conditional compilation
// ============================================================================

/// Time a block under a phase name and evaluate to the block's value
/// (zero-cost when metrics disabled).
///
/// The `metrics` cfg is checked in the calling crate, so callers forward the
/// feature (`metrics = ["ricochet_metrics/metrics"]`).
#[macro_export]
macro_rules! time_scope {
    ($profiler:expr, $name:expr, $body:block) => {{
        #[cfg(feature = "metrics")]
        let __value = $profiler.time_phase($name, || $body);
        #[cfg(not(feature = "metrics"))]
        let __value = {
            let _ = &$profiler;
            $body
        };
        __value
    }};
}

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
pub struct FrameTimer;

#[cfg(not(feature = "metrics"))]
impl FrameTimer {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn begin(&mut self) {}
    pub fn end(&mut self) {}
    pub fn fps(&self) -> f64 { 0.0 }
    pub fn frame_time_ms(&self) -> f64 { 0.0 }
    pub fn frame_time_range_ms(&self) -> (f64, f64) { (0.0, 0.0) }
}

#[cfg(not(feature = "metrics"))]
pub struct RingBuffer<T>(std::marker::PhantomData<T>);

#[cfg(not(feature = "metrics"))]
impl<T> RingBuffer<T> {
    pub fn new(_capacity: usize) -> Self { Self(std::marker::PhantomData) }
    pub fn push(&mut self, _value: T) {}
    pub fn len(&self) -> usize { 0 }
    pub fn is_empty(&self) -> bool { true }
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default)]
pub struct PhaseProfiler;

#[cfg(not(feature = "metrics"))]
impl PhaseProfiler {
    pub fn new() -> Self { Self }
    pub fn time_phase<F, R>(&mut self, _name: &'static str, f: F) -> R where F: FnOnce() -> R { f() }
    pub fn timing(&self, _name: &str) -> PhaseTiming { PhaseTiming::default() }
    pub fn timings(&self) -> Vec<(&'static str, PhaseTiming)> { Vec::new() }
    pub fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_scope_returns_body_value() {
        let mut profiler = PhaseProfiler::new();
        let value = time_scope!(profiler, "sum", { (1..=4).sum::<u32>() });
        assert_eq!(value, 10);
    }

    #[test]
    fn test_phase_timing_average() {
        let timing = PhaseTiming {
            total: Duration::from_millis(30),
            calls: 3,
        };
        assert_eq!(timing.average(), Duration::from_millis(10));
        assert_eq!(PhaseTiming::default().average(), Duration::ZERO);
    }

    #[test]
    fn test_phase_timing_average_past_u32_calls() {
        // 2^32 calls would truncate to zero as a u32 divisor
        let calls = u64::from(u32::MAX) + 1;
        let timing = PhaseTiming {
            total: Duration::from_secs(calls),
            calls,
        };
        assert_eq!(timing.average(), Duration::from_secs(1));

        let timing = PhaseTiming {
            total: Duration::from_secs(calls),
            calls: calls * 2,
        };
        assert_eq!(timing.average(), Duration::from_millis(500));
    }

    #[test]
    fn test_stubs_and_real_types_share_an_api() {
        let mut timer = FrameTimer::new(60);
        timer.begin();
        timer.end();
        let _ = timer.fps();

        let mut buffer = RingBuffer::<f64>::new(4);
        buffer.push(1.0);

        let mut profiler = PhaseProfiler::new();
        profiler.time_phase("noop", || ());
        profiler.reset();
    }
}
