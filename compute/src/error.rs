use atlas_types::{NodeId, TokenAmount};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ComputeError {
    #[error("no_jobs_in_queue")]
    EmptyQueue,

    /// Details stay in the fields; `Debug` carries them into logs.
    #[error("insufficient_balance")]
    InsufficientBalance {
        job_id: String,
        node: NodeId,
        requested: TokenAmount,
        available: TokenAmount,
    },

    #[error("invalid job: {0}")]
    InvalidJob(String),

    #[error("job queue is full ({0} jobs)")]
    QueueFull(usize),

    #[error("could not encode job payload: {0}")]
    Encoding(String),
}

impl ComputeError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyQueue => "no_jobs_in_queue",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::InvalidJob(_) => "invalid_job",
            Self::QueueFull(_) => "queue_full",
            Self::Encoding(_) => "encoding_failed",
        }
    }
}
