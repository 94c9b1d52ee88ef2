use crate::types::WorkerId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid batch size: must be > 0")]
    InvalidBatchSize,

    #[error("Invalid worker count: at least one worker is required")]
    NoWorkers,

    #[error("Invalid success probability {0}: must lie in [0, 1]")]
    InvalidProbability(f64),

    #[error("Invalid poll interval: must be > 0 ms")]
    InvalidPollInterval,

    #[error("Binomial distribution rejected: {0}")]
    Distribution(#[from] rand_distr::BinomialError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Worker {worker_id} panicked")]
    WorkerPanicked { worker_id: WorkerId },

    #[error("Run cancelled before completion")]
    Cancelled,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
