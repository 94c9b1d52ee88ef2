//! Shared progress counter.
//!
//! The only mutable state shared across threads. Workers add to it,
//! the monitor reads it, and the engine forces it to the total once every
//! worker has returned. It also carries the run's cancellation flag.

use crate::types::TrialCount;
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

#[derive(Debug, Default)]
struct ProgressInner {
    completed: AtomicU64,
    cancelled: AtomicBool,
}

/// Cheap to clone; all clones observe the same counter.
#[derive(Debug, Clone, Default)]
pub struct SharedProgress {
    inner: Arc<ProgressInner>,
}

impl SharedProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `trials` more completed trials.
    pub fn add(&self, trials: TrialCount) {
        self.inner.completed.fetch_add(trials, Ordering::Relaxed);
    }

    pub fn completed(&self) -> TrialCount {
        self.inner.completed.load(Ordering::Acquire)
    }

    /// Force the counter up to `total`. Never moves it backwards.
    pub fn finish(&self, total: TrialCount) {
        self.inner.completed.fetch_max(total, Ordering::Release);
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }
}
