//! Asynchronous job polling
//!
//! Some remote write operations return a job handle instead of a direct
//! result; the job is resolved by polling its status endpoint. Polling policy
//! is fixed: one poll per second, forty attempts, no backoff. A job that
//! never leaves `Pending` within that budget is an ambiguous outcome and
//! surfaces as `PollTimeout`, distinct from both success and a failed job.

use crate::errors::{Result, SealSignError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Fixed interval between polls
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Fixed attempt budget
pub const POLL_ATTEMPTS: u32 = 40;

/// Lifecycle state of a remote job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Complete,
    Error,
}

/// A remote job handle as returned by the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

/// Source of job status, typically the remote API's job resource
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn get_job(&self, job_id: &str) -> Result<Job>;
}

/// Polls a job until it reaches a terminal state or the budget runs out
pub struct JobPoller<S> {
    source: S,
    interval: Duration,
    max_attempts: u32,
}

impl<S: JobSource> JobPoller<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            interval: POLL_INTERVAL,
            max_attempts: POLL_ATTEMPTS,
        }
    }

    /// Poll until the job completes, fails or exhausts the attempt budget
    pub async fn await_job(&self, job_id: &str) -> Result<Option<Value>> {
        for attempt in 1..=self.max_attempts {
            let job = self.source.get_job(job_id).await?;

            match job.status {
                JobStatus::Complete => {
                    debug!(job_id, attempt, "Job complete");
                    return Ok(job.result);
                }
                JobStatus::Error => {
                    warn!(job_id, attempt, "Job failed");
                    return Err(SealSignError::Execution {
                        id: job_id.to_string(),
                        message: "job reported error status".to_string(),
                    });
                }
                JobStatus::Pending => {
                    if attempt < self.max_attempts {
                        sleep(self.interval).await;
                    }
                }
            }
        }

        warn!(job_id, attempts = self.max_attempts, "Job poll budget exhausted");
        Err(SealSignError::PollTimeout {
            job_id: job_id.to_string(),
            attempts: self.max_attempts,
        })
    }
}
