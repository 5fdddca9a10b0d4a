use chrono::Local;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::{
    errors::ServiceError,
    jobs::{Job, JobQueue},
    services::{payroll_entry::PayrollEntryService, repost_item_valuation::RepostItemValuationService},
    stock::RepostingWindow,
};

const IDLE_POLL: Duration = Duration::from_millis(500);

/// Drains the job queue, running each job against the owning service.
#[derive(Clone)]
pub struct BackgroundWorker {
    queue: Arc<dyn JobQueue>,
    payroll: PayrollEntryService,
    reposting: RepostItemValuationService,
    window: RepostingWindow,
}

impl BackgroundWorker {
    pub fn new(
        queue: Arc<dyn JobQueue>,
        payroll: PayrollEntryService,
        reposting: RepostItemValuationService,
        window: RepostingWindow,
    ) -> Self {
        Self {
            queue,
            payroll,
            reposting,
            window,
        }
    }

    /// Runs the next queued job, if any. Returns whether one was taken.
    ///
    /// A failing job is put back until it runs out of attempts.
    pub async fn run_once(&self) -> Result<bool, ServiceError> {
        let Some(envelope) = self.queue.dequeue().await? else {
            return Ok(false);
        };

        match self.process(&envelope.job).await {
            Ok(()) => {
                info!(job_id = %envelope.id, job = ?envelope.job, "Job finished");
            }
            Err(e) => {
                error!(job_id = %envelope.id, attempts = envelope.attempts + 1, "Job failed: {}", e);
                let job_id = envelope.id;
                if !self.queue.retry(envelope).await? {
                    warn!(%job_id, "Job dropped after exhausting its attempts");
                }
            }
        }

        Ok(true)
    }

    async fn process(&self, job: &Job) -> Result<(), ServiceError> {
        match job {
            Job::CreateSalarySlips { .. } | Job::SubmitSalarySlips { .. } => {
                self.payroll.process_job(job).await
            }
            Job::RepostItemValuation => {
                let summary = self
                    .reposting
                    .repost_entries(Local::now().naive_local(), &self.window)
                    .await?;
                info!(
                    ran = summary.ran,
                    completed = summary.completed,
                    failed = summary.failed,
                    "Reposting pass finished"
                );
                Ok(())
            }
        }
    }

    /// Spawns the polling loop.
    pub fn start(self) {
        tokio::spawn(async move {
            loop {
                match self.run_once().await {
                    Ok(true) => continue,
                    Ok(false) => {}
                    Err(e) => error!("background worker error: {}", e),
                }
                sleep(IDLE_POLL).await;
            }
        });
    }
}

/// Queues a reposting pass every `interval`.
pub fn start_repost_scheduler(queue: Arc<dyn JobQueue>, interval: Duration) {
    tokio::spawn(async move {
        loop {
            sleep(interval).await;
            if let Err(e) = queue.enqueue(Job::RepostItemValuation).await {
                warn!("Could not queue reposting pass: {}", e);
            }
        }
    });
}
