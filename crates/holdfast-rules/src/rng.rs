//! Random number streams.
//!
//! Replays and tests must reproduce every roll exactly, so the engine only
//! ever draws through the [`GameRng`] trait. [`SeededRng`] is a 32-bit linear
//! congruential generator whose output depends on nothing but its seed.
//! [`EntropyRng`] wraps an OS-seeded [`StdRng`] for live tables that do not
//! need to be replayed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// LCG multiplier (Numerical Recipes).
const LCG_MULTIPLIER: u32 = 1_664_525;

/// LCG increment (Numerical Recipes).
const LCG_INCREMENT: u32 = 1_013_904_223;

/// A source of uniformly distributed integers.
pub trait GameRng {
    /// A uniform integer in `[min, max]`. Returns `min` when `max < min`.
    fn next_int_inclusive(&mut self, min: i64, max: i64) -> i64;
}

/// Deterministic LCG stream: `state = state * 1664525 + 1013904223 mod 2^32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Start a stream from `seed`.
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Resume a stream from a previously saved [`SeededRng::state`].
    pub const fn from_state(state: u32) -> Self {
        Self { state }
    }

    /// The current internal state.
    pub const fn state(self) -> u32 {
        self.state
    }

    /// Advance the generator and return the new state.
    pub const fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT);
        self.state
    }
}

impl GameRng for SeededRng {
    fn next_int_inclusive(&mut self, min: i64, max: i64) -> i64 {
        if max < min {
            return min;
        }
        let span = u128::from(max.abs_diff(min)).saturating_add(1);
        // Scale the 32-bit output into the span; the result is always < span.
        let offset = u128::from(self.next_u32()).saturating_mul(span).checked_shr(32).unwrap_or(0);
        let offset = u64::try_from(offset).unwrap_or(u64::MAX);
        min.saturating_add_unsigned(offset)
    }
}

/// Entropy-backed stream for live play. Never use it where a replay must
/// reproduce the same rolls.
#[derive(Debug, Clone)]
pub struct EntropyRng {
    inner: StdRng,
}

impl EntropyRng {
    /// Seed a new stream from the operating system.
    pub fn new() -> Self {
        Self { inner: StdRng::from_os_rng() }
    }
}

impl Default for EntropyRng {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRng for EntropyRng {
    fn next_int_inclusive(&mut self, min: i64, max: i64) -> i64 {
        if max < min {
            return min;
        }
        self.inner.random_range(min..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SeededRng::new(123);
        let mut b = SeededRng::new(123);
        for _ in 0..100 {
            assert_eq!(a.next_int_inclusive(1, 20), b.next_int_inclusive(1, 20));
        }
    }

    #[test]
    fn lcg_step_matches_recurrence() {
        let mut rng = SeededRng::new(0);
        assert_eq!(rng.next_u32(), 1_013_904_223);
        assert_eq!(rng.next_u32(), 1_013_904_223_u32.wrapping_mul(1_664_525).wrapping_add(1_013_904_223));
    }

    #[test]
    fn values_stay_in_range() {
        let mut rng = SeededRng::new(42);
        for _ in 0..10_000 {
            let v = rng.next_int_inclusive(-3, 7);
            assert!((-3..=7).contains(&v));
        }
    }

    #[test]
    fn degenerate_ranges_return_min() {
        let mut rng = SeededRng::new(7);
        let before = rng.state();
        assert_eq!(rng.next_int_inclusive(5, 4), 5);
        assert_eq!(rng.state(), before);
        assert_eq!(rng.next_int_inclusive(9, 9), 9);
    }

    #[test]
    fn state_round_trips() {
        let mut rng = SeededRng::new(99);
        rng.next_u32();
        let mut resumed = SeededRng::from_state(rng.state());
        assert_eq!(rng.next_int_inclusive(1, 6), resumed.next_int_inclusive(1, 6));
    }

    #[test]
    #[allow(clippy::arithmetic_side_effects)]
    fn every_face_appears() {
        let mut rng = SeededRng::new(2024);
        let mut seen = [false; 6];
        for _ in 0..600 {
            let face = rng.next_int_inclusive(1, 6);
            if let Some(slot) = usize::try_from(face - 1).ok().and_then(|i| seen.get_mut(i)) {
                *slot = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn entropy_rng_respects_bounds() {
        let mut rng = EntropyRng::new();
        for _ in 0..100 {
            let v = rng.next_int_inclusive(1, 20);
            assert!((1..=20).contains(&v));
        }
    }
}
