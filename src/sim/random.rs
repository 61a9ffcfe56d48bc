//! Injectable random sources for procedural generation

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform samples in `[0, 1)`
pub trait RandomSource {
    fn next(&mut self) -> f32;

    /// Uniform sample in `[lo, hi)` (returns `lo` when the range is empty)
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        lo + (hi - lo) * self.next()
    }

    /// Uniform index in `0..n` (`n` must be non-zero)
    fn index(&mut self, n: u32) -> u32 {
        ((self.next() * n as f32) as u32).min(n - 1)
    }
}

/// PCG-backed source
#[derive(Debug, Clone)]
pub struct PcgRandom {
    rng: Pcg32,
}

impl PcgRandom {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seeded from the thread RNG, so every run differs
    pub fn unseeded() -> Self {
        Self {
            rng: Pcg32::from_rng(&mut rand::rng()),
        }
    }
}

impl RandomSource for PcgRandom {
    fn next(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays a fixed list of samples, cycling when exhausted
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Always returns the same sample
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceRandom {
    fn next(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 0.999_999)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcg_in_unit_range() {
        let mut rng = PcgRandom::seeded(7);
        for _ in 0..1000 {
            let v = rng.next();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = PcgRandom::seeded(42);
        let mut b = PcgRandom::seeded(42);
        for _ in 0..16 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn test_sequence_cycles() {
        let mut rng = SequenceRandom::new(vec![0.1, 0.5]);
        assert_eq!(rng.next(), 0.1);
        assert_eq!(rng.next(), 0.5);
        assert_eq!(rng.next(), 0.1);
    }

    #[test]
    fn test_range_and_index() {
        let mut rng = SequenceRandom::constant(0.5);
        assert_eq!(rng.range(10.0, 20.0), 15.0);
        assert_eq!(rng.range(5.0, 5.0), 5.0);
        assert_eq!(rng.index(20), 10);

        let mut top = SequenceRandom::constant(1.0);
        assert_eq!(top.index(20), 19);
    }
}
