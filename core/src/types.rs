//! Shared primitive types used across the entire simulation.

/// A count of binomial draws. One trial = one sample.
pub type TrialCount = u64;

/// A count of batches.
pub type BatchCount = u64;

/// A single binomial outcome (number of successes in one draw).
pub type Outcome = u64;

/// Per-worker seed. Drawn from [0, 2^31 - 1).
pub type WorkerSeed = u32;

/// Stable index of a worker within one run.
pub type WorkerId = usize;

/// The canonical run identifier.
pub type RunId = uuid::Uuid;
