//! Closed-form distribution of the maximum of T binomial draws.
//!
//! For X ~ Binomial(n, p) with cdf F, the maximum M of T independent draws
//! satisfies P(M <= k) = F(k)^T. With T around 1e9, F(k)^T is evaluated
//! as exp(T * ln(1 - S(k))) where S(k) is the upper tail summed directly,
//! so tails far below f64 epsilon still register.

use crate::types::{Outcome, TrialCount};

#[derive(Debug, Clone)]
pub struct MaxOrderStatistic {
    trials: TrialCount,
    /// `cdf[k]` = P(M <= k), for k in 0..=n.
    cdf: Vec<f64>,
}

/// Probability mass of Binomial(n, p), indexed 0..=n.
pub fn binomial_pmf(n: u64, p: f64) -> Vec<f64> {
    assert!((0.0..=1.0).contains(&p), "p must lie in [0, 1]");
    let len = n as usize + 1;
    let mut pmf = vec![0.0; len];
    if p == 0.0 {
        pmf[0] = 1.0;
        return pmf;
    }
    if p == 1.0 {
        pmf[len - 1] = 1.0;
        return pmf;
    }

    // Start from the mode and walk both ways to avoid underflow at k = 0
    // for large n.
    let mode = (((n + 1) as f64) * p).floor().min(n as f64) as usize;
    let odds = p / (1.0 - p);
    pmf[mode] = 1.0;
    for k in (0..mode).rev() {
        pmf[k] = pmf[k + 1] * ((k + 1) as f64) / ((n as usize - k) as f64) / odds;
    }
    for k in mode..len - 1 {
        pmf[k + 1] = pmf[k] * ((n as usize - k) as f64) / ((k + 1) as f64) * odds;
    }
    let total: f64 = pmf.iter().sum();
    pmf.iter_mut().for_each(|m| *m /= total);
    pmf
}

impl MaxOrderStatistic {
    pub fn new(n: u64, p: f64, trials: TrialCount) -> Self {
        let pmf = binomial_pmf(n, p);
        let mut cdf = vec![1.0; pmf.len()];
        let mut upper_tail: f64 = 0.0;
        for k in (0..pmf.len()).rev() {
            // upper_tail is P(X > k) at this point.
            cdf[k] = if upper_tail <= 0.0 {
                1.0
            } else {
                (trials as f64 * (-upper_tail).ln_1p()).exp()
            };
            upper_tail += pmf[k];
        }
        Self { trials, cdf }
    }

    pub fn trials(&self) -> TrialCount {
        self.trials
    }

    /// P(M <= k).
    pub fn cdf(&self, k: Outcome) -> f64 {
        self.cdf.get(k as usize).copied().unwrap_or(1.0)
    }

    /// P(M = k).
    pub fn pmf(&self, k: Outcome) -> f64 {
        let below = if k == 0 { 0.0 } else { self.cdf(k - 1) };
        self.cdf(k) - below
    }

    /// Smallest k with P(M <= k) >= q.
    pub fn quantile(&self, q: f64) -> Outcome {
        self.cdf
            .iter()
            .position(|&c| c >= q)
            .unwrap_or(self.cdf.len() - 1) as Outcome
    }

    pub fn median(&self) -> Outcome {
        self.quantile(0.5)
    }

    /// E[M] = sum over k of P(M > k).
    pub fn mean(&self) -> f64 {
        self.cdf.iter().map(|c| 1.0 - c).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pmf_sums_to_one_and_peaks_at_mean() {
        let pmf = binomial_pmf(231, 0.25);
        let total: f64 = pmf.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        let mean: f64 = pmf.iter().enumerate().map(|(k, m)| k as f64 * m).sum();
        assert!((mean - 57.75).abs() < 1e-9, "mean was {mean}");
    }

    #[test]
    fn small_pmf_matches_hand_computation() {
        let pmf = binomial_pmf(2, 0.5);
        assert!((pmf[0] - 0.25).abs() < 1e-15);
        assert!((pmf[1] - 0.5).abs() < 1e-15);
        assert!((pmf[2] - 0.25).abs() < 1e-15);
    }

    #[test]
    fn single_trial_max_is_the_binomial_itself() {
        let stat = MaxOrderStatistic::new(231, 0.25, 1);
        assert!((stat.mean() - 57.75).abs() < 1e-9);
        assert_eq!(stat.median(), 58);
    }

    #[test]
    fn cdf_is_monotone_and_ends_at_one() {
        let stat = MaxOrderStatistic::new(231, 0.25, 1_000_000_000);
        for k in 1..=231 {
            assert!(stat.cdf(k) >= stat.cdf(k - 1));
        }
        assert_eq!(stat.cdf(231), 1.0);
        assert_eq!(stat.cdf(500), 1.0);
    }

    #[test]
    fn billion_trial_max_sits_deep_in_the_tail() {
        let stat = MaxOrderStatistic::new(231, 0.25, 1_000_000_000);
        let median = stat.median();
        assert!((98..=102).contains(&median), "median was {median}");
        assert!(stat.mean() > 98.0 && stat.mean() < 102.0);
        assert!(stat.cdf(177) == 1.0, "177 ones should be unreachable");
    }

    #[test]
    fn zero_trials_means_zero_max() {
        let stat = MaxOrderStatistic::new(231, 0.25, 0);
        assert_eq!(stat.mean(), 0.0);
        assert_eq!(stat.median(), 0);
    }
}
