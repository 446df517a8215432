//! AppOps Client Core Library
//!
//! This is the core library for the AppOps tooling, providing connection and
//! instance resolution, entity lookup, asynchronous job submission and
//! polling, and deployment orchestration against a control-plane org.

pub mod api;
pub mod connection;
pub mod deploy;
pub mod error;
pub mod hub;
pub mod identifier;
pub mod instance;
pub mod jobs;
pub mod lookup;
pub mod model;
pub mod progress;
pub mod session;
pub mod versioning;

// Mock implementations and testing utilities live in the appops-test-utils crate

// Re-export main types
pub use api::ControlPlaneApi;
pub use connection::ConnectionResolver;
pub use deploy::{DataSelection, DeployParams, DeploymentOrchestrator};
pub use error::{Error, Result};
pub use hub::{ApiRequest, HubClient, Method, Record, RecordQuery, RestHubClient};
pub use identifier::RecordIdentifier;
pub use instance::{InstanceLocator, InstanceResolver, ManageOptions, ScanInstanceLocator};
pub use jobs::{JobSubmitter, PollPolicy};
pub use lookup::EntityLookup;
pub use model::{
    Connection, EntityKind, Job, JobOperation, JobStatus, ManagedInstance, VersioningOptions,
};
pub use progress::{NullProvider, ProgressProvider, ProgressUpdate};
pub use session::OrgSession;
pub use versioning::{CheckinParams, CheckoutParams, InstanceTarget, VersioningService};

use std::time::Duration;

/// Core client configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Path of the control-plane REST API relative to the hub instance URL
    pub api_base_path: String,
    /// Version of the generic record API used for queries and writes
    pub data_api_version: String,
    pub request_timeout_seconds: u64,
    pub manage_poll_interval_ms: u64,
    pub manage_poll_max_attempts: u32,
    pub job_poll_interval_ms: u64,
    pub job_poll_max_attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_path: "/services/apexrest/PDRI/v1".to_string(),
            data_api_version: "58.0".to_string(),
            request_timeout_seconds: 120,
            manage_poll_interval_ms: 500,
            manage_poll_max_attempts: 60,
            job_poll_interval_ms: 1000,
            job_poll_max_attempts: 1800,
        }
    }
}

impl ClientConfig {
    /// Create a test configuration
    pub fn test() -> Self {
        Self {
            request_timeout_seconds: 5,
            manage_poll_interval_ms: 1, // keep poll loops fast in tests
            manage_poll_max_attempts: 5,
            job_poll_interval_ms: 1,
            job_poll_max_attempts: 10,
            ..Self::default()
        }
    }

    /// Poll policy applied while waiting for a manage job
    pub fn manage_poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_millis(self.manage_poll_interval_ms),
            self.manage_poll_max_attempts,
        )
    }

    /// Poll policy applied to checkin, checkout and deploy jobs
    pub fn job_poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_millis(self.job_poll_interval_ms),
            self.job_poll_max_attempts,
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_poll_policies() {
        let config = ClientConfig::default();

        assert_eq!(config.manage_poll_policy(), PollPolicy::manage());
        assert_eq!(config.job_poll_policy(), PollPolicy::long_running());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"manage_poll_max_attempts": 10}"#).unwrap();

        assert_eq!(config.manage_poll_max_attempts, 10);
        assert_eq!(config.manage_poll_interval_ms, 500);
        assert_eq!(config.api_base_path, "/services/apexrest/PDRI/v1");
    }
}
