//! FIFO job queue.

use std::collections::VecDeque;

use atlas_tokens::TokenLedger;

use crate::error::ComputeError;
use crate::job::ComputeJob;

/// Jobs waiting beyond this count are refused.
pub const MAX_QUEUED_JOBS: usize = 16_384;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobScheduler {
    queue: VecDeque<ComputeJob>,
}

impl JobScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refill from persisted jobs, keeping their order. No balance checks:
    /// these jobs were accepted before the restart.
    pub fn restore(jobs: impl IntoIterator<Item = ComputeJob>) -> Self {
        Self {
            queue: jobs.into_iter().collect(),
        }
    }

    /// Queue `job` if it is well formed and its node can currently pay.
    pub fn submit(&mut self, job: ComputeJob, ledger: &TokenLedger) -> Result<(), ComputeError> {
        job.validate()
            .map_err(|reason| ComputeError::InvalidJob(reason.to_string()))?;
        if self.queue.len() >= MAX_QUEUED_JOBS {
            return Err(ComputeError::QueueFull(self.queue.len()));
        }
        let available = ledger.balance(&job.node_id);
        if available < job.token_cost {
            return Err(ComputeError::InsufficientBalance {
                job_id: job.job_id,
                node: job.node_id,
                requested: job.token_cost,
                available,
            });
        }
        tracing::debug!(job_id = %job.job_id, node = %job.node_id, cost = %job.token_cost, "job queued");
        self.queue.push_back(job);
        Ok(())
    }

    /// Pop the oldest job.
    pub fn next(&mut self) -> Option<ComputeJob> {
        self.queue.pop_front()
    }

    pub fn peek(&self) -> Option<&ComputeJob> {
        self.queue.front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Jobs in submission order.
    pub fn iter(&self) -> impl Iterator<Item = &ComputeJob> {
        self.queue.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobPayload;
    use atlas_types::{NodeId, TokenAmount};

    fn tokens(t: f64) -> TokenAmount {
        TokenAmount::from_tokens(t).unwrap()
    }

    fn funded() -> TokenLedger {
        let mut ledger = TokenLedger::new();
        ledger.credit(&NodeId::new("node_a"), tokens(100.0)).unwrap();
        ledger
    }

    #[test]
    fn unfunded_node_is_refused() {
        let ledger = funded();
        let mut scheduler = JobScheduler::new();
        let job = ComputeJob::new("job_1", "node_b", tokens(10.0), JobPayload::new());
        let err = scheduler.submit(job, &ledger).unwrap_err();
        assert_eq!(err.code(), "insufficient_balance");
        assert!(scheduler.is_empty());
    }

    #[test]
    fn invalid_job_is_refused() {
        let ledger = funded();
        let mut scheduler = JobScheduler::new();
        let job = ComputeJob::new("", "node_a", tokens(10.0), JobPayload::new());
        assert!(matches!(scheduler.submit(job, &ledger), Err(ComputeError::InvalidJob(_))));
    }

    #[test]
    fn fifo_order() {
        let ledger = funded();
        let mut scheduler = JobScheduler::new();
        for id in ["first", "second", "third"] {
            scheduler
                .submit(ComputeJob::new(id, "node_a", tokens(1.0), JobPayload::new()), &ledger)
                .unwrap();
        }
        assert_eq!(scheduler.len(), 3);
        assert_eq!(scheduler.peek().map(|j| j.job_id.as_str()), Some("first"));
        let order: Vec<_> = std::iter::from_fn(|| scheduler.next()).map(|j| j.job_id).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
        assert!(scheduler.next().is_none());
    }

    #[test]
    fn submission_does_not_reserve_funds() {
        let ledger = funded();
        let mut scheduler = JobScheduler::new();
        for id in ["a", "b"] {
            scheduler
                .submit(ComputeJob::new(id, "node_a", tokens(80.0), JobPayload::new()), &ledger)
                .unwrap();
        }
        assert_eq!(scheduler.len(), 2);
    }
}
