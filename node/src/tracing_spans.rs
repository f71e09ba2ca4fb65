//! Span constructors for coordinator operations.
//!
//! Consistent span names and fields make log lines from one operation easy
//! to filter and correlate.

use tracing::{info_span, Span};

/// Span covering one energy submission.
pub fn submit_span(node_id: &str) -> Span {
    info_span!("submit_energy", node = %node_id)
}

/// Span covering one minting pass.
pub fn minting_span(threshold: u64) -> Span {
    info_span!("process_minting", threshold)
}

/// Span covering the execution of one compute job.
pub fn job_span(job_id: &str) -> Span {
    info_span!("execute_job", job = %job_id)
}

/// Span covering a save or load of the world.
pub fn persist_span(op: &'static str) -> Span {
    info_span!("persist", op)
}
