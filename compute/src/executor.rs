//! Deterministic job execution.

use atlas_crypto::hash_job_payload;
use atlas_tokens::{TokenError, TokenLedger};
use atlas_types::NodeId;
use serde::{Deserialize, Serialize};

use crate::error::ComputeError;
use crate::job::{ComputeJob, JobPayload};

/// Results are reduced modulo this value.
const RESULT_MODULUS: u32 = 1_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub job_id: String,
    pub node_id: NodeId,
    pub status: JobStatus,
    pub result: u32,
}

/// Charges for and runs jobs.
#[derive(Clone, Copy, Debug, Default)]
pub struct ComputeExecutor;

impl ComputeExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Debit the job's cost, then compute its result.
    ///
    /// The balance is checked again here because it may have changed since
    /// submission. On failure nothing is debited.
    pub fn execute(&self, job: &ComputeJob, ledger: &mut TokenLedger) -> Result<JobResult, ComputeError> {
        let result = payload_result(&job.payload)?;
        ledger
            .debit(&job.node_id, job.token_cost)
            .map_err(|err| match err {
                TokenError::InsufficientBalance {
                    node,
                    requested,
                    available,
                } => ComputeError::InsufficientBalance {
                    job_id: job.job_id.clone(),
                    node,
                    requested,
                    available,
                },
                other => ComputeError::InvalidJob(other.to_string()),
            })?;

        tracing::info!(job_id = %job.job_id, node = %job.node_id, cost = %job.token_cost, result, "job completed");
        Ok(JobResult {
            job_id: job.job_id.clone(),
            node_id: job.node_id.clone(),
            status: JobStatus::Completed,
            result,
        })
    }
}

/// First four digest bytes of the canonical payload, big-endian, reduced
/// modulo [`RESULT_MODULUS`].
pub fn payload_result(payload: &JobPayload) -> Result<u32, ComputeError> {
    let canonical = serde_json::to_vec(payload).map_err(|e| ComputeError::Encoding(e.to_string()))?;
    let digest = hash_job_payload(&canonical);
    let head = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    Ok(head % RESULT_MODULUS)
}
