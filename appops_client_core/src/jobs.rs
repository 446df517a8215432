//! Job submission and polling
//!
//! Jobs run asynchronously on the control plane. A submission returns a job
//! envelope whose first entry carries the job ID; completion is observed by
//! polling `GET /jobs/{id}` under a [`PollPolicy`].

use crate::api::ControlPlaneApi;
use crate::error::{JobError, Result};
use crate::model::{Job, JobOperation};
use crate::progress::{ProgressProvider, ProgressUpdate};
use log::{debug, info, warn};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// How often and how many times a job is polled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// 500 ms x 60, used while an instance is being provisioned
    pub fn manage() -> Self {
        Self::new(Duration::from_millis(500), 60)
    }

    /// 1 s x 1800, used for checkin, checkout and deploy
    pub fn long_running() -> Self {
        Self::new(Duration::from_millis(1000), 1800)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::long_running()
    }
}

#[derive(Clone)]
pub struct JobSubmitter {
    api: ControlPlaneApi,
    progress: Arc<dyn ProgressProvider>,
}

impl JobSubmitter {
    pub fn new(api: ControlPlaneApi) -> Self {
        Self {
            api,
            progress: <dyn ProgressProvider>::null(),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressProvider>) -> Self {
        self.progress = progress;
        self
    }

    /// Submit a job and return its ID
    pub async fn submit_job<B: Serialize + ?Sized>(
        &self,
        operation: JobOperation,
        instance_id: Option<&str>,
        body: &B,
        vcs_token: Option<&str>,
    ) -> Result<String> {
        let path = operation.path(instance_id)?;
        let body = serde_json::to_value(body)?;

        let jobs = self.api.submit(&path, body, vcs_token).await?;
        let job_id = jobs
            .jobs
            .into_iter()
            .next()
            .map(|job| job.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| JobError::submission(operation.as_str(), "response contained no job"))?;

        info!("Submitted {operation} job {job_id}");
        self.progress.report(ProgressUpdate::JobSubmitted {
            operation: operation.to_string(),
            job_id: job_id.clone(),
        });
        Ok(job_id)
    }

    /// Poll a job until it completes or the attempt budget runs out
    ///
    /// Exactly `max_attempts` polls are made before timing out, with no sleep
    /// after the last one. Failed or undecodable polls count as pending.
    pub async fn await_completion(&self, job_id: &str, policy: PollPolicy) -> Result<Job> {
        debug!(
            "Waiting for job {job_id} ({} polls every {:?})",
            policy.max_attempts, policy.interval
        );

        for attempt in 1..=policy.max_attempts {
            let status = match self.poll_once(job_id).await {
                Ok(Some(job)) if job.is_completed() => {
                    info!("Job {job_id} completed after {attempt} polls");
                    self.progress.report(ProgressUpdate::JobCompleted {
                        job_id: job_id.to_string(),
                    });
                    return Ok(job);
                }
                Ok(Some(job)) => job.status.map(|s| s.to_string()),
                Ok(None) => None,
                Err(e) => {
                    debug!("Poll {attempt} for job {job_id} failed: {e}");
                    None
                }
            };

            self.progress.report(ProgressUpdate::JobPolled {
                job_id: job_id.to_string(),
                attempt,
                max_attempts: policy.max_attempts,
                status,
            });

            if attempt < policy.max_attempts {
                tokio::time::sleep(policy.interval).await;
            }
        }

        warn!(
            "Job {job_id} still pending after {} polls",
            policy.max_attempts
        );
        Err(JobError::timeout(job_id, policy.max_attempts).into())
    }

    /// Like [`await_completion`](Self::await_completion), but gives up as soon
    /// as `cancel` resolves
    pub async fn await_completion_until<F>(
        &self,
        job_id: &str,
        policy: PollPolicy,
        cancel: F,
    ) -> Result<Job>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.await_completion(job_id, policy) => result,
            _ = cancel => {
                info!("Stopped waiting for job {job_id}");
                Err(JobError::cancelled(job_id).into())
            }
        }
    }

    async fn poll_once(&self, job_id: &str) -> Result<Option<Job>> {
        let jobs = self.api.get_jobs(job_id).await?;
        Ok(jobs.jobs.into_iter().next())
    }
}
