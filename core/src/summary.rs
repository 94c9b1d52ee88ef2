//! Run summary: everything a finished run reports, serializable to JSON.

use crate::{
    config::{RunPlan, SimulationConfig},
    theory::MaxOrderStatistic,
    types::{Outcome, RunId, TrialCount},
    worker::WorkerResult,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub elapsed_secs: f64,
    pub config: SimulationConfig,
    pub plan: RunPlan,
    pub workers: Vec<WorkerResult>,
    /// Largest outcome across every worker. The answer.
    pub highest_outcome: Outcome,
    pub expected: ExpectedMax,
}

/// Theoretical reference for `highest_outcome`, for the trials actually
/// dispatched.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ExpectedMax {
    pub trials: TrialCount,
    pub median: Outcome,
    pub mean: f64,
}

impl ExpectedMax {
    pub fn for_run(config: &SimulationConfig, plan: &RunPlan) -> Self {
        let stat = MaxOrderStatistic::new(
            config.draw_trials,
            config.success_probability,
            plan.dispatched_trials(),
        );
        Self {
            trials: stat.trials(),
            median: stat.median(),
            mean: stat.mean(),
        }
    }
}

impl RunSummary {
    /// Trials that were actually sampled.
    pub fn dispatched_trials(&self) -> TrialCount {
        self.workers
            .iter()
            .map(|w| w.batches_completed * self.plan.batch_size)
            .sum()
    }
}
