//! Statistical check of the whole pipeline.
//!
//! Repeated runs with independent seeds are draws of the maximum of T
//! binomial samples. Their empirical distribution must match the exact
//! max-order-statistic distribution P(M <= k) = F(k)^T.

use graveler_core::{config::SimulationConfig, engine::SimEngine, theory::MaxOrderStatistic};

const RUNS: u64 = 200;
const TRIALS: u64 = 2_000;

fn run_maxima(runs: u64) -> Vec<u64> {
    (0..runs)
        .map(|master_seed| {
            SimEngine::new(SimulationConfig {
                total_trials: TRIALS,
                batch_size: 100,
                workers: Some(2),
                poll_interval_ms: 1,
                master_seed: Some(master_seed),
                ..SimulationConfig::default()
            })
            .expect("engine")
            .run()
            .expect("run")
            .highest_outcome
        })
        .collect()
}

#[test]
fn repeated_maxima_follow_the_extreme_value_law() {
    let maxima = run_maxima(RUNS);
    let theory = MaxOrderStatistic::new(231, 0.25, TRIALS);

    // Mean: theory ~81.16, sd ~2.39, so the standard error over 200 runs
    // is ~0.17.
    let mean = maxima.iter().sum::<u64>() as f64 / RUNS as f64;
    assert!(
        (mean - theory.mean()).abs() < 0.75,
        "empirical mean {mean:.2} vs theoretical {:.2}",
        theory.mean()
    );

    // Kolmogorov-Smirnov distance against the exact cdf.
    let ks = (0..=231u64)
        .map(|k| {
            let empirical = maxima.iter().filter(|&&m| m <= k).count() as f64 / RUNS as f64;
            (empirical - theory.cdf(k)).abs()
        })
        .fold(0.0, f64::max);
    assert!(ks < 0.15, "KS distance {ks:.3} too large");
}

#[test]
fn every_maximum_lies_in_the_support() {
    for m in run_maxima(20) {
        assert!(m <= 231);
        assert!(m > 57, "the max of {TRIALS} draws should beat the mean, got {m}");
    }
}
