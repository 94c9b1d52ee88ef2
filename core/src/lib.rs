//! Parallel Monte Carlo estimate of the largest Binomial(231, 0.25) outcome
//! seen across a billion draws.

pub mod config;
pub mod engine;
pub mod error;
pub mod monitor;
pub mod progress;
pub mod rng;
pub mod sampler;
pub mod summary;
pub mod theory;
pub mod types;
pub mod worker;
