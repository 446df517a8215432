//! Progress reporting abstractions for AppOps operations
//!
//! This module provides a trait-based abstraction for progress reporting,
//! allowing the core library to report progress without depending on
//! specific terminal or UI concerns.

use std::sync::Arc;

/// Core trait for progress reporting
///
/// The orchestration core reports what it is doing (resolving, submitting,
/// polling) through this trait; the surrounding tool decides how to show it.
pub trait ProgressProvider: Send + Sync {
    /// Report a progress update
    fn report(&self, update: ProgressUpdate);

    /// Signal that the operation is complete
    fn complete(&self);
}

/// Unified progress update type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressUpdate {
    /// Generic status message
    Status { message: String },

    /// A job was accepted by the control plane
    JobSubmitted { operation: String, job_id: String },

    /// A poll returned a non-terminal state
    JobPolled {
        job_id: String,
        attempt: u32,
        max_attempts: u32,
        status: Option<String>,
    },

    /// A job reached the completed state
    JobCompleted { job_id: String },
}

impl ProgressUpdate {
    pub fn status(message: impl Into<String>) -> Self {
        Self::Status {
            message: message.into(),
        }
    }
}

/// Null implementation for when no progress is needed
pub struct NullProvider;

impl ProgressProvider for NullProvider {
    fn report(&self, _update: ProgressUpdate) {}

    fn complete(&self) {}
}

/// Helper functions for creating providers
impl dyn ProgressProvider {
    /// Create a null provider (useful for tests and when progress isn't needed)
    pub fn null() -> Arc<dyn ProgressProvider> {
        Arc::new(NullProvider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder(Mutex<Vec<ProgressUpdate>>);

    impl ProgressProvider for Recorder {
        fn report(&self, update: ProgressUpdate) {
            self.0.lock().unwrap().push(update);
        }

        fn complete(&self) {}
    }

    #[test]
    fn test_null_provider_accepts_updates() {
        let provider = <dyn ProgressProvider>::null();
        provider.report(ProgressUpdate::status("Resolving instance"));
        provider.complete();
    }

    #[test]
    fn test_provider_receives_updates_in_order() {
        let recorder = Recorder(Mutex::new(Vec::new()));
        recorder.report(ProgressUpdate::status("one"));
        recorder.report(ProgressUpdate::JobCompleted {
            job_id: "job-1".to_string(),
        });

        let updates = recorder.0.lock().unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0], ProgressUpdate::status("one"));
    }
}
