//! Asynchronous job error types

use thiserror::Error;

/// Errors raised while submitting or awaiting control-plane jobs
#[derive(Error, Debug)]
pub enum JobError {
    /// The submission response carried no job ID
    #[error("No job ID returned after submitting the {operation} request: {reason}")]
    Submission { operation: String, reason: String },

    /// The poll budget was exhausted before the job completed
    #[error("Job {job_id} did not complete within {attempts} polls")]
    Timeout { job_id: String, attempts: u32 },

    /// The caller stopped waiting before the job completed
    #[error("Stopped waiting for job {job_id} before it completed")]
    Cancelled { job_id: String },

    /// The job completed but its result payload could not be used
    #[error("Job {job_id} returned an unusable result: {message}")]
    InvalidResult { job_id: String, message: String },
}

impl JobError {
    /// Create a submission error
    pub fn submission(operation: &str, reason: &str) -> Self {
        Self::Submission {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a timeout error
    pub fn timeout(job_id: &str, attempts: u32) -> Self {
        Self::Timeout {
            job_id: job_id.to_string(),
            attempts,
        }
    }

    /// Create a cancellation error
    pub fn cancelled(job_id: &str) -> Self {
        Self::Cancelled {
            job_id: job_id.to_string(),
        }
    }

    /// Create an invalid result error
    pub fn invalid_result(job_id: &str, message: &str) -> Self {
        Self::InvalidResult {
            job_id: job_id.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_error() {
        let error = JobError::submission("manage", "empty jobs array");
        assert!(error.to_string().contains("manage"));
        assert!(error.to_string().contains("empty jobs array"));
    }

    #[test]
    fn test_cancelled_error() {
        let error = JobError::cancelled("job-7");
        assert!(error.to_string().contains("job-7"));
    }

    #[test]
    fn test_invalid_result_error() {
        let error = JobError::invalid_result("job-9", "missing resultData");
        assert!(error.to_string().contains("job-9"));
        assert!(error.to_string().contains("missing resultData"));
    }
}
