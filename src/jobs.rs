/*!
 * # Background Job Queue
 *
 * Long-running document operations (salary slip batches, valuation
 * reposting) are handed to a queue and picked up by the background worker
 * in `services::background`.
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Job queue errors
#[derive(Error, Debug)]
pub enum JobQueueError {
    #[error("Queue is full")]
    QueueFull,
}

impl From<JobQueueError> for ServiceError {
    fn from(err: JobQueueError) -> Self {
        ServiceError::QueueError(err.to_string())
    }
}

/// Work that can be deferred to the background worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Job {
    CreateSalarySlips { payroll_entry_id: Uuid },
    SubmitSalarySlips {
        payroll_entry_id: Uuid,
        make_payment_entry: bool,
    },
    RepostItemValuation,
}

/// Envelope for queued jobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEnvelope {
    pub id: Uuid,
    pub job: Job,
    pub enqueued_at: chrono::DateTime<chrono::Utc>,
    pub attempts: u32,
    pub max_attempts: u32,
}

impl JobEnvelope {
    pub fn new(job: Job) -> Self {
        Self {
            id: Uuid::new_v4(),
            job,
            enqueued_at: chrono::Utc::now(),
            attempts: 0,
            max_attempts: 3,
        }
    }
}

/// Job queue trait for different implementations
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn enqueue(&self, job: Job) -> Result<Uuid, JobQueueError>;
    async fn dequeue(&self) -> Result<Option<JobEnvelope>, JobQueueError>;
    /// Puts a failed job back unless it exhausted its attempts. Returns whether it was requeued.
    async fn retry(&self, envelope: JobEnvelope) -> Result<bool, JobQueueError>;
    async fn len(&self) -> usize;
}

/// In-memory FIFO job queue
#[derive(Debug, Clone)]
pub struct InMemoryJobQueue {
    queue: Arc<Mutex<VecDeque<JobEnvelope>>>,
    max_size: usize,
}

impl Default for InMemoryJobQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryJobQueue {
    pub fn new() -> Self {
        Self::with_max_size(1000)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            max_size,
        }
    }

    /// Snapshot of queued jobs, oldest first.
    pub async fn pending(&self) -> Vec<Job> {
        self.queue.lock().await.iter().map(|e| e.job.clone()).collect()
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn enqueue(&self, job: Job) -> Result<Uuid, JobQueueError> {
        let mut queue = self.queue.lock().await;
        if queue.len() >= self.max_size {
            return Err(JobQueueError::QueueFull);
        }

        let envelope = JobEnvelope::new(job);
        let id = envelope.id;
        queue.push_back(envelope);
        Ok(id)
    }

    async fn dequeue(&self) -> Result<Option<JobEnvelope>, JobQueueError> {
        Ok(self.queue.lock().await.pop_front())
    }

    async fn retry(&self, mut envelope: JobEnvelope) -> Result<bool, JobQueueError> {
        envelope.attempts += 1;
        if envelope.attempts >= envelope.max_attempts {
            return Ok(false);
        }

        let mut queue = self.queue.lock().await;
        if queue.len() >= self.max_size {
            return Err(JobQueueError::QueueFull);
        }
        queue.push_back(envelope);
        Ok(true)
    }

    async fn len(&self) -> usize {
        self.queue.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn jobs_come_out_in_fifo_order() {
        let queue = InMemoryJobQueue::new();
        let first = Uuid::new_v4();
        queue
            .enqueue(Job::CreateSalarySlips {
                payroll_entry_id: first,
            })
            .await
            .unwrap();
        queue.enqueue(Job::RepostItemValuation).await.unwrap();

        assert_eq!(queue.len().await, 2);
        let job = queue.dequeue().await.unwrap().unwrap();
        assert_eq!(
            job.job,
            Job::CreateSalarySlips {
                payroll_entry_id: first
            }
        );
        assert_eq!(
            queue.dequeue().await.unwrap().unwrap().job,
            Job::RepostItemValuation
        );
        assert!(queue.dequeue().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn full_queue_rejects_jobs() {
        let queue = InMemoryJobQueue::with_max_size(1);
        queue.enqueue(Job::RepostItemValuation).await.unwrap();
        assert!(matches!(
            queue.enqueue(Job::RepostItemValuation).await,
            Err(JobQueueError::QueueFull)
        ));
    }

    #[tokio::test]
    async fn retry_stops_after_max_attempts() {
        let queue = InMemoryJobQueue::new();
        let mut envelope = JobEnvelope::new(Job::RepostItemValuation);
        envelope.attempts = 2;
        assert!(!queue.retry(envelope).await.unwrap());

        let envelope = JobEnvelope::new(Job::RepostItemValuation);
        assert!(queue.retry(envelope).await.unwrap());
        assert_eq!(queue.len().await, 1);
    }

    #[test]
    fn envelope_serializes_with_job_kind() {
        let envelope = JobEnvelope::new(Job::SubmitSalarySlips {
            payroll_entry_id: Uuid::nil(),
            make_payment_entry: true,
        });
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["job"]["kind"], "submit_salary_slips");
        assert_eq!(json["job"]["make_payment_entry"], true);
    }
}
