//! Run configuration.
//!
//! The defaults are the fixed parameters of the estimate:
//! Binomial(231, 0.25), sampled one billion times in batches of ten million.
//! A JSON file may override any subset of fields; missing fields keep
//! their defaults.

use crate::{
    error::{SimError, SimResult},
    types::{BatchCount, TrialCount, WorkerId},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_DRAW_TRIALS: u64 = 231;
pub const DEFAULT_SUCCESS_PROBABILITY: f64 = 0.25;
pub const DEFAULT_TOTAL_TRIALS: TrialCount = 1_000_000_000;
pub const DEFAULT_BATCH_SIZE: TrialCount = 10_000_000;
/// Minimum sleep between two progress polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

/// What to do with whole batches left over after dividing
/// the batch count evenly across workers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RemainderPolicy {
    /// Leftover batches are never dispatched.
    #[default]
    Drop,
    /// The first `total_batches % workers` workers take one extra batch.
    Distribute,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Trials per binomial draw (the `n` of Binomial(n, p)).
    pub draw_trials: u64,
    pub success_probability: f64,
    pub total_trials: TrialCount,
    pub batch_size: TrialCount,
    /// `None` means one worker per available core.
    pub workers: Option<usize>,
    pub poll_interval_ms: u64,
    pub remainder: RemainderPolicy,
    /// When set, every worker seed is derived from it.
    pub master_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            draw_trials: DEFAULT_DRAW_TRIALS,
            success_probability: DEFAULT_SUCCESS_PROBABILITY,
            total_trials: DEFAULT_TOTAL_TRIALS,
            batch_size: DEFAULT_BATCH_SIZE,
            workers: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            remainder: RemainderPolicy::Drop,
            master_seed: None,
        }
    }
}

impl SimulationConfig {
    /// Load overrides from a JSON file.
    pub fn load(path: &str) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SimulationConfig = serde_json::from_str(&content)?;
        log::debug!("Loaded config from {path}");
        Ok(config)
    }

    /// Small, fast, fully seeded config for use in tests.
    /// 100 trials in batches of 10 across 2 workers.
    pub fn default_test() -> Self {
        Self {
            total_trials: 100,
            batch_size: 10,
            workers: Some(2),
            poll_interval_ms: 5,
            master_seed: Some(42),
            ..Self::default()
        }
    }

    /// Reject configurations that cannot run. Called before any
    /// worker is launched.
    pub fn validate(&self) -> SimResult<()> {
        if self.batch_size == 0 {
            return Err(SimError::InvalidBatchSize);
        }
        if self.workers == Some(0) {
            return Err(SimError::NoWorkers);
        }
        if !(0.0..=1.0).contains(&self.success_probability) {
            return Err(SimError::InvalidProbability(self.success_probability));
        }
        if self.poll_interval_ms == 0 {
            return Err(SimError::InvalidPollInterval);
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Configured worker count, falling back to available parallelism.
    pub fn resolve_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Split the run into per-worker batch counts.
    pub fn plan(&self) -> SimResult<RunPlan> {
        self.validate()?;
        let workers = self.resolve_workers();
        if workers == 0 {
            return Err(SimError::NoWorkers);
        }
        Ok(RunPlan::new(
            self.total_trials,
            self.batch_size,
            workers,
            self.remainder,
        ))
    }
}

/// The resolved partition of one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunPlan {
    pub total_trials: TrialCount,
    pub batch_size: TrialCount,
    pub total_batches: BatchCount,
    /// Indexed by worker id.
    pub batches_per_worker: Vec<BatchCount>,
}

impl RunPlan {
    pub fn new(
        total_trials: TrialCount,
        batch_size: TrialCount,
        workers: usize,
        remainder: RemainderPolicy,
    ) -> Self {
        assert!(batch_size > 0, "batch_size must be > 0");
        assert!(workers > 0, "workers must be > 0");

        let total_batches = total_trials / batch_size;
        let base = total_batches / workers as u64;
        let extra = (total_batches % workers as u64) as usize;

        let batches_per_worker = (0..workers)
            .map(|id| match remainder {
                RemainderPolicy::Distribute if id < extra => base + 1,
                _ => base,
            })
            .collect();

        Self {
            total_trials,
            batch_size,
            total_batches,
            batches_per_worker,
        }
    }

    pub fn workers(&self) -> usize {
        self.batches_per_worker.len()
    }

    pub fn batches_for(&self, worker_id: WorkerId) -> BatchCount {
        self.batches_per_worker[worker_id]
    }

    /// Trials that will actually be sampled.
    pub fn dispatched_trials(&self) -> TrialCount {
        self.batches_per_worker.iter().sum::<u64>() * self.batch_size
    }

    /// Trials left out by integer division.
    pub fn dropped_trials(&self) -> TrialCount {
        self.total_trials - self.dispatched_trials()
    }
}
