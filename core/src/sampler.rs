//! Batch sampler: draw a batch of binomial variates, keep only the largest.

use crate::{
    config::SimulationConfig,
    error::SimResult,
    types::{Outcome, TrialCount},
};
use rand::Rng;
use rand_distr::{Binomial, Distribution};

#[derive(Debug, Clone, Copy)]
pub struct BatchSampler {
    draw_trials: u64,
    dist: Binomial,
}

impl BatchSampler {
    pub fn new(draw_trials: u64, success_probability: f64) -> SimResult<Self> {
        let dist = Binomial::new(draw_trials, success_probability)?;
        Ok(Self { draw_trials, dist })
    }

    pub fn from_config(config: &SimulationConfig) -> SimResult<Self> {
        Self::new(config.draw_trials, config.success_probability)
    }

    /// Upper bound of every sample (the binomial `n`).
    pub fn draw_trials(&self) -> u64 {
        self.draw_trials
    }

    /// Maximum of `batch_size` independent draws.
    /// Panics if `batch_size` is zero.
    pub fn sample_max<R: Rng + ?Sized>(&self, batch_size: TrialCount, rng: &mut R) -> Outcome {
        assert!(batch_size > 0, "batch_size must be > 0");
        self.dist
            .sample_iter(rng)
            .take(batch_size as usize)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::WorkerRng;

    #[test]
    fn batch_max_stays_within_support() {
        let sampler = BatchSampler::new(231, 0.25).expect("valid distribution");
        let mut rng = WorkerRng::new(0, 99);
        for batch_size in [1, 2, 17, 1_000, 25_000] {
            let max = sampler.sample_max(batch_size, &mut rng);
            assert!(max <= 231, "max {max} outside [0, 231]");
        }
    }

    #[test]
    fn degenerate_probabilities_hit_the_bounds() {
        let mut rng = WorkerRng::new(0, 5);
        let never = BatchSampler::new(231, 0.0).expect("p = 0 is valid");
        let always = BatchSampler::new(231, 1.0).expect("p = 1 is valid");
        assert_eq!(never.sample_max(100, &mut rng), 0);
        assert_eq!(always.sample_max(100, &mut rng), 231);
    }

    #[test]
    fn large_batch_max_sits_above_the_mean() {
        // Mean is 57.75; the max of 100k draws lands far in the upper tail.
        let sampler = BatchSampler::new(231, 0.25).expect("valid distribution");
        let mut rng = WorkerRng::new(0, 2024);
        let max = sampler.sample_max(100_000, &mut rng);
        assert!((75..=110).contains(&max), "unexpected batch max {max}");
    }

    #[test]
    fn invalid_probability_is_an_error() {
        assert!(BatchSampler::new(231, -0.1).is_err());
        assert!(BatchSampler::new(231, 1.1).is_err());
    }

    #[test]
    #[should_panic(expected = "batch_size must be > 0")]
    fn zero_batch_violates_contract() {
        let sampler = BatchSampler::new(231, 0.25).expect("valid distribution");
        sampler.sample_max(0, &mut WorkerRng::new(0, 1));
    }
}
