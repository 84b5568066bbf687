//! Deterministic math utilities
//!
//! Re-exports glam with the epsilon-aware helpers used by the collision code
//! and a seeded RNG for reproducible scenario generation.

pub use glam::*;

/// Tolerance shared by vector equality, the near-parallel test and the
/// collinear axis agreement test.
pub const EPSILON: f32 = 1e-4;

/// Epsilon comparisons for `Vec2`.
///
/// glam's own `abs_diff_eq` compares per axis; the simulation compares the
/// squared distance instead so the threshold is a true radius.
pub trait ApproxEq {
    /// `|self - other|^2 <= threshold^2`.
    fn approx_eq_within(self, other: Self, threshold: f32) -> bool;

    #[inline]
    fn approx_eq(self, other: Self) -> bool
    where
        Self: Sized,
    {
        self.approx_eq_within(other, EPSILON)
    }
}

impl ApproxEq for Vec2 {
    #[inline]
    fn approx_eq_within(self, other: Vec2, threshold: f32) -> bool {
        (self - other).length_squared() <= threshold * threshold
    }
}

/// Deterministic pseudo-random number generator (LCG).
///
/// Good enough for laying out test scenarios; not for anything statistical.
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        // LCG constants (Numerical Recipes)
        const A: u64 = 1664525;
        const C: u64 = 1013904223;
        const M: u64 = 1u64 << 32;

        self.state = (A.wrapping_mul(self.state).wrapping_add(C)) % M;
        self.state as u32
    }

    /// Uniform integer in `[min, max]` (both inclusive).
    pub fn next_int_in(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max);
        let span = (max as i64 - min as i64 + 1) as u64;
        (min as i64 + (self.next_u32() as u64 % span) as i64) as i32
    }
}
