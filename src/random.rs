use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Seeded random source: given a fixed seed, an identical sequence of calls
/// reproduces identical outputs, which makes a whole generation run
/// reproducible. One instance serves exactly one run; every stochastic
/// decision in the generator routes through it.
#[derive(Debug)]
pub struct SeededRandom {
    rng: SmallRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Uniform integer in `[min, max]` inclusive. Returns `min` when the
    /// range is empty or inverted.
    pub fn int_range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    /// Uniform float in `[min, max)`.
    pub fn float_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.float() * (max - min)
    }

    /// Uniform float in `[0, 1)`.
    pub fn float(&mut self) -> f64 {
        self.rng.random_range(0.0..1.0)
    }

    /// Normal deviate with the given mean and standard deviation.
    pub fn normal(&mut self, mean: f64, stddev: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        mean + z * stddev
    }

    /// Fair coin flip.
    pub fn bool(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    /// Bernoulli trial. Probabilities outside `[0, 1]` behave as if clamped.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.float() < probability
    }

    /// Index chosen with probability proportional to its weight.
    /// A zero/negative total falls back to the last index.
    pub fn weighted_choice(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        let threshold = self.float() * total;

        let mut cumulative = 0.0;
        for (i, w) in weights.iter().enumerate() {
            cumulative += w;
            if threshold < cumulative {
                return i;
            }
        }
        weights.len() - 1
    }

    /// Uniformly chosen element.
    ///
    /// # Panics
    /// Panics if `items` is empty.
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.random_range(0..items.len())]
    }

    /// In-place Fisher–Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRandom::new(12345);
        let mut b = SeededRandom::new(12345);
        for _ in 0..50 {
            assert_eq!(a.int_range(0, 1000), b.int_range(0, 1000));
        }
        for _ in 0..50 {
            assert_eq!(a.normal(50.0, 10.0), b.normal(50.0, 10.0));
        }
    }

    #[test]
    fn different_seed_different_sequence() {
        let mut a = SeededRandom::new(1);
        let mut b = SeededRandom::new(2);
        let va: Vec<i32> = (0..20).map(|_| a.int_range(0, 1_000_000)).collect();
        let vb: Vec<i32> = (0..20).map(|_| b.int_range(0, 1_000_000)).collect();
        assert_ne!(va, vb);
    }

    #[test]
    fn int_range_inclusive_bounds() {
        let mut rng = SeededRandom::new(7);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..2000 {
            let v = rng.int_range(1, 3);
            assert!((1..=3).contains(&v));
            seen_min |= v == 1;
            seen_max |= v == 3;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn int_range_degenerate_returns_min() {
        let mut rng = SeededRandom::new(7);
        assert_eq!(rng.int_range(5, 5), 5);
        assert_eq!(rng.int_range(9, 2), 9);
    }

    #[test]
    fn chance_extremes() {
        let mut rng = SeededRandom::new(7);
        for _ in 0..100 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }

    #[test]
    fn weighted_choice_respects_weights() {
        let mut rng = SeededRandom::new(7);
        let weights = [0.0, 10.0, 0.0];
        for _ in 0..100 {
            assert_eq!(rng.weighted_choice(&weights), 1);
        }
    }

    #[test]
    fn weighted_choice_zero_total_falls_back_to_last() {
        let mut rng = SeededRandom::new(7);
        assert_eq!(rng.weighted_choice(&[0.0, 0.0, 0.0]), 2);
    }

    #[test]
    fn normal_centers_on_mean() {
        let mut rng = SeededRandom::new(7);
        let n = 5000;
        let sum: f64 = (0..n).map(|_| rng.normal(30.0, 5.0)).sum();
        let mean = sum / n as f64;
        assert!((mean - 30.0).abs() < 0.5, "sample mean was {mean}");
    }

    #[test]
    fn shuffle_is_permutation() {
        let mut rng = SeededRandom::new(7);
        let mut items: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<u32>>());
    }
}
