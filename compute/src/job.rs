use std::collections::BTreeMap;

use atlas_types::{NodeId, TokenAmount};
use serde::{Deserialize, Serialize};

/// Free-form job input. Keys are kept sorted so the payload has one
/// canonical encoding.
pub type JobPayload = BTreeMap<String, serde_json::Value>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComputeJob {
    pub job_id: String,
    pub node_id: NodeId,
    pub token_cost: TokenAmount,
    #[serde(default)]
    pub payload: JobPayload,
}

impl ComputeJob {
    pub fn new(
        job_id: impl Into<String>,
        node_id: impl Into<NodeId>,
        token_cost: TokenAmount,
        payload: JobPayload,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            node_id: node_id.into(),
            token_cost,
            payload,
        }
    }

    /// Identifiers present and cost positive.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if self.job_id.trim().is_empty() {
            return Err("empty job_id");
        }
        if self.node_id.is_empty() {
            return Err("empty node_id");
        }
        if self.token_cost.is_zero() {
            return Err("token_cost must be positive");
        }
        Ok(())
    }
}
