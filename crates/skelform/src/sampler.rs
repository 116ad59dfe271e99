//! Injected uniform sampler (`random(lo, hi)`).
//!
//! The pipeline never owns an RNG. Every random draw goes through a `Sampler`
//! handed in by the caller, so identical samplers give bit-identical results.
//!
//! - `SeededSampler`: `StdRng` seeded from a `ReplayToken (seed, index)`, so the
//!   n-th rendering of a spec can be replayed on its own.
//! - `FnSampler`: adapts a closure (scripted draws in tests).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform draw in `[lo, hi)`.
///
/// Implementations must not panic on empty or inverted ranges; the value
/// `lo + (hi - lo) * u` with `u ∈ [0, 1)` is the reference behavior.
pub trait Sampler {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64;
}

impl<S: Sampler + ?Sized> Sampler for &mut S {
    #[inline]
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        (**self).uniform(lo, hi)
    }
}

/// Replay token to make renderings reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// `StdRng`-backed sampler.
#[derive(Clone, Debug)]
pub struct SeededSampler {
    rng: StdRng,
}

impl SeededSampler {
    pub fn new(tok: ReplayToken) -> Self {
        Self {
            rng: tok.to_std_rng(),
        }
    }

    /// Shorthand for `new(ReplayToken { seed, index: 0 })`.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(ReplayToken::new(seed, 0))
    }
}

impl Sampler for SeededSampler {
    #[inline]
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.rng.gen::<f64>()
    }
}

/// Closure adapter: `FnSampler(|lo, hi| ...)`.
pub struct FnSampler<F>(pub F);

impl<F: FnMut(f64, f64) -> f64> Sampler for FnSampler<F> {
    #[inline]
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        (self.0)(lo, hi)
    }
}

/// Always returns the midpoint of the range.
#[cfg(test)]
#[derive(Clone, Copy, Debug, Default)]
pub struct MidpointSampler;

#[cfg(test)]
impl Sampler for MidpointSampler {
    #[inline]
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * 0.5
    }
}
