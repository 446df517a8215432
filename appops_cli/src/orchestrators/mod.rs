//! Command orchestrators for business logic
//!
//! Orchestrators map parsed command arguments onto the core library services
//! and return plain values for the output layer to format.

pub mod context;
pub mod deploy_orchestrator;
pub mod instance_orchestrator;
pub mod versioning_orchestrator;

pub use context::OrchestratorContext;
pub use deploy_orchestrator::{DeployArgs, DeployOrchestrator};
pub use instance_orchestrator::{InstanceOrchestrator, ManageArgs};
pub use versioning_orchestrator::{CheckinArgs, CheckoutArgs, VersioningOrchestrator};

use appops_client_core::{Job, JobSubmitter, PollPolicy, Result};
use log::warn;

/// Resolves on Ctrl-C; never resolves where signals are unavailable
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

/// Wait for a launched job, stopping early on Ctrl-C
async fn wait_for_job(jobs: &JobSubmitter, job_id: &str, policy: PollPolicy) -> Result<Job> {
    jobs.await_completion_until(job_id, policy, interrupted())
        .await
}
