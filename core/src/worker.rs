//! Worker: runs its share of batches on a private generator.
//!
//! RULES:
//!   - A worker owns its WorkerRng and its running maximum exclusively.
//!   - SharedProgress is the only state it touches outside itself.
//!   - Cancellation is checked between batches, never mid-batch.

use crate::{
    error::{SimError, SimResult},
    progress::SharedProgress,
    rng::WorkerRng,
    sampler::BatchSampler,
    types::{BatchCount, Outcome, TrialCount, WorkerId, WorkerSeed},
};
use serde::{Deserialize, Serialize};

/// One worker's assignment. Built by the engine at dispatch time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkerTask {
    pub worker_id: WorkerId,
    pub seed: WorkerSeed,
    pub batches: BatchCount,
    pub batch_size: TrialCount,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkerResult {
    pub worker_id: WorkerId,
    pub seed: WorkerSeed,
    pub batches_completed: BatchCount,
    /// Largest outcome seen across every assigned batch.
    pub max_value: Outcome,
}

/// Raises the cancellation flag if the worker unwinds.
struct CancelOnPanic<'a>(&'a SharedProgress);

impl Drop for CancelOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.cancel();
        }
    }
}

impl WorkerTask {
    /// Execute every assigned batch.
    ///
    /// Returns `SimError::Cancelled` if another part of the run raised the
    /// cancellation flag before this worker finished.
    pub fn run(self, sampler: &BatchSampler, progress: &SharedProgress) -> SimResult<WorkerResult> {
        let _guard = CancelOnPanic(progress);
        let mut rng = WorkerRng::new(self.worker_id, self.seed);
        let mut max_value: Outcome = 0;

        for _ in 0..self.batches {
            if progress.is_cancelled() {
                log::debug!("worker={} cancelled", self.worker_id);
                return Err(SimError::Cancelled);
            }
            let batch_max = sampler.sample_max(self.batch_size, &mut rng);
            if batch_max > max_value {
                max_value = batch_max;
            }
            progress.add(self.batch_size);
        }

        log::debug!(
            "worker={} seed={} batches={} max={max_value}",
            self.worker_id,
            self.seed,
            self.batches
        );

        Ok(WorkerResult {
            worker_id: self.worker_id,
            seed: self.seed,
            batches_completed: self.batches,
            max_value,
        })
    }
}
