//! The simulation engine: partitions, launches, joins, reduces.
//!
//! EXECUTION ORDER (fixed):
//!   1. Validate config and build the RunPlan.
//!   2. Draw one distinct seed per worker from the SeedBank.
//!   3. Start the progress monitor, then one OS thread per worker.
//!   4. Join every worker.
//!   5. Force SharedProgress to the total (or cancel it on failure),
//!      then join the monitor.
//!   6. Reduce worker maxima into the final answer.
//!
//! RULES:
//!   - Nothing is launched if validation fails.
//!   - Any worker failure fails the whole run. No partial results.
//!   - Step 5 always runs, so the monitor always exits.
//!   - A monitor failure is logged and never affects the result.

use crate::{
    config::{RunPlan, SimulationConfig},
    error::{SimError, SimResult},
    monitor::{NullRender, ProgressMonitor, ProgressRender},
    progress::SharedProgress,
    rng::SeedBank,
    sampler::BatchSampler,
    summary::{ExpectedMax, RunSummary},
    types::{Outcome, RunId, WorkerId},
    worker::{WorkerResult, WorkerTask},
};
use chrono::Utc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

pub struct SimEngine {
    pub run_id: RunId,
    config: SimulationConfig,
    render: Box<dyn ProgressRender>,
}

impl SimEngine {
    /// Validates the config. Progress is discarded until a renderer is set.
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            run_id: RunId::new_v4(),
            config,
            render: Box::new(NullRender),
        })
    }

    /// Engine over `SimulationConfig::default_test()` with the given master seed.
    pub fn build_test(master_seed: u64) -> SimResult<Self> {
        Self::new(SimulationConfig {
            master_seed: Some(master_seed),
            ..SimulationConfig::default_test()
        })
    }

    pub fn with_render(mut self, render: Box<dyn ProgressRender>) -> Self {
        self.render = render;
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn plan(&self) -> SimResult<RunPlan> {
        self.config.plan()
    }

    /// Run to completion on a fresh progress counter.
    pub fn run(self) -> SimResult<RunSummary> {
        self.run_with(SharedProgress::new())
    }

    /// Run to completion, reporting into `progress`. Callers keep a clone
    /// to observe the counter or to cancel the run.
    pub fn run_with(self, progress: SharedProgress) -> SimResult<RunSummary> {
        let started_at = Utc::now();
        let clock = Instant::now();

        let plan = self.config.plan()?;
        let sampler = BatchSampler::from_config(&self.config)?;

        if plan.dropped_trials() > 0 {
            log::warn!(
                "run={} dropping {} of {} trials (uneven batch split)",
                self.run_id,
                plan.dropped_trials(),
                plan.total_trials
            );
        }

        let seeds = SeedBank::from_master(self.config.master_seed).draw(plan.workers());
        let tasks: Vec<WorkerTask> = seeds
            .into_iter()
            .enumerate()
            .map(|(worker_id, seed)| WorkerTask {
                worker_id,
                seed,
                batches: plan.batches_for(worker_id),
                batch_size: plan.batch_size,
            })
            .collect();

        log::info!(
            "run={} workers={} batches={} batch_size={} dispatched={}",
            self.run_id,
            plan.workers(),
            plan.total_batches,
            plan.batch_size,
            plan.dispatched_trials()
        );

        let monitor = match ProgressMonitor::new(
            progress.clone(),
            plan.total_trials,
            self.config.poll_interval(),
            self.render,
        )
        .spawn()
        {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("run={} progress monitor unavailable: {e}", self.run_id);
                None
            }
        };

        let (results, failure) = dispatch(tasks, sampler, &progress);

        if failure.is_some() {
            progress.cancel();
        } else {
            progress.finish(plan.total_trials);
        }
        if let Some(handle) = monitor {
            if handle.join().is_err() {
                log::warn!("run={} progress monitor panicked", self.run_id);
            }
        }

        if let Some(e) = failure {
            log::error!("run={} failed: {e}", self.run_id);
            return Err(e);
        }

        let highest_outcome = reduce_max(&results);
        let elapsed_secs = clock.elapsed().as_secs_f64();
        log::info!(
            "run={} finished in {elapsed_secs:.2}s, highest={highest_outcome}",
            self.run_id
        );

        Ok(RunSummary {
            run_id: self.run_id,
            started_at,
            elapsed_secs,
            expected: ExpectedMax::for_run(&self.config, &plan),
            config: self.config,
            plan,
            workers: results,
            highest_outcome,
        })
    }
}

/// Launch one thread per task and join them all.
/// Returns every successful result plus the run-fatal error, if any.
fn dispatch(
    tasks: Vec<WorkerTask>,
    sampler: BatchSampler,
    progress: &SharedProgress,
) -> (Vec<WorkerResult>, Option<SimError>) {
    let mut handles: Vec<(WorkerId, JoinHandle<SimResult<WorkerResult>>)> =
        Vec::with_capacity(tasks.len());
    let mut failure: Option<SimError> = None;

    for task in tasks {
        let worker_progress = progress.clone();
        let spawned = thread::Builder::new()
            .name(format!("worker-{}", task.worker_id))
            .spawn(move || task.run(&sampler, &worker_progress));
        match spawned {
            Ok(handle) => handles.push((task.worker_id, handle)),
            Err(e) => {
                log::error!("worker={} could not start: {e}", task.worker_id);
                progress.cancel();
                failure = Some(SimError::Io(e));
                break;
            }
        }
    }

    let mut results = Vec::with_capacity(handles.len());
    for (worker_id, handle) in handles {
        let error = match handle.join() {
            Ok(Ok(result)) => {
                results.push(result);
                continue;
            }
            Ok(Err(e)) => e,
            Err(_) => {
                progress.cancel();
                SimError::WorkerPanicked { worker_id }
            }
        };
        // Keep the root cause rather than the cancellations it triggered.
        if matches!(failure, None | Some(SimError::Cancelled)) {
            failure = Some(error);
        }
    }

    (results, failure)
}

/// Largest worker maximum. Zero when there are no results.
pub fn reduce_max(results: &[WorkerResult]) -> Outcome {
    results.iter().map(|r| r.max_value).max().unwrap_or(0)
}
