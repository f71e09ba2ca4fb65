//! Compute jobs paid for with minted tokens.
//!
//! Jobs are admitted by [`JobScheduler`] when the submitting node can cover
//! the cost, wait in FIFO order, and are run by [`ComputeExecutor`], which
//! charges the node again at execution time.

pub mod error;
pub mod executor;
pub mod job;
pub mod scheduler;

pub use error::ComputeError;
pub use executor::{ComputeExecutor, JobResult, JobStatus};
pub use job::{ComputeJob, JobPayload};
pub use scheduler::{JobScheduler, MAX_QUEUED_JOBS};
