//! Injectable random source
//!
//! The easy CPU, the search jitter and lightning targeting all draw from a
//! [`RandomSource`] handed in by the caller, never from a global generator.
//! Tests pin behaviour with [`FixedRandom`] or [`SequenceRandom`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `0..n` (`n > 0`)
    fn next_index(&mut self, n: usize) -> usize {
        debug_assert!(n > 0);
        ((self.next_unit() * n as f64) as usize).min(n.saturating_sub(1))
    }

    /// Fisher-Yates shuffle, walking from the last element down
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl RandomSource for Box<dyn RandomSource + Send> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Always returns the same sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next_unit(&mut self) -> f64 {
        self.0.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Cycles through a fixed list of samples
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceRandom {
    values: Vec<f64>,
    next: usize,
}

impl SequenceRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.next % self.values.len()];
        self.next = self.next.wrapping_add(1);
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Adapter for any `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    /// Deterministic generator for reproducible games
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}
