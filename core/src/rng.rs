//! Random number generation.
//!
//! RULE: Workers never share a generator and never touch a global RNG.
//! Each worker owns one WorkerRng built from an explicit seed handed out
//! by the SeedBank before dispatch.
//!
//! The SeedBank is the only place that may consult OS entropy, and only
//! when the run has no master seed. With a master seed, every worker seed
//! (and therefore the whole run) is reproducible.

use crate::types::{WorkerId, WorkerSeed};
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::collections::HashSet;

/// Exclusive upper bound for worker seeds: seeds lie in [0, 2^31 - 1).
pub const SEED_UPPER_BOUND: WorkerSeed = (1 << 31) - 1;

/// A deterministic RNG owned by a single worker.
pub struct WorkerRng {
    pub worker_id: WorkerId,
    pub seed: WorkerSeed,
    inner: Pcg64Mcg,
}

impl WorkerRng {
    pub fn new(worker_id: WorkerId, seed: WorkerSeed) -> Self {
        Self {
            worker_id,
            seed,
            inner: Pcg64Mcg::seed_from_u64(u64::from(seed)),
        }
    }
}

impl RngCore for WorkerRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

/// Hands out one distinct seed per worker.
pub struct SeedBank {
    inner: Pcg64Mcg,
}

impl SeedBank {
    /// Seeds derived from a master seed. Same master seed, same seeds.
    pub fn new(master_seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(master_seed),
        }
    }

    /// Seeds drawn from OS entropy. Used for ordinary runs.
    pub fn from_entropy() -> Self {
        Self {
            inner: Pcg64Mcg::from_entropy(),
        }
    }

    pub fn from_master(master_seed: Option<u64>) -> Self {
        match master_seed {
            Some(seed) => Self::new(seed),
            None => Self::from_entropy(),
        }
    }

    /// Draw `count` distinct seeds, uniformly from [0, 2^31 - 1).
    /// A collision is redrawn.
    pub fn draw(&mut self, count: usize) -> Vec<WorkerSeed> {
        let mut seen = HashSet::with_capacity(count);
        let mut seeds = Vec::with_capacity(count);
        while seeds.len() < count {
            let seed = self.inner.gen_range(0..SEED_UPPER_BOUND);
            if seen.insert(seed) {
                seeds.push(seed);
            } else {
                log::debug!("seed collision on {seed}, redrawing");
            }
        }
        seeds
    }
}
