//! Common test utilities for integration tests
//!
//! Wires the orchestration services to a shared in-memory control plane
//! with poll intervals short enough for tests.

#![allow(dead_code)]

use appops_client_core::{
    ControlPlaneApi, DeploymentOrchestrator, EntityLookup, HubClient, InstanceResolver,
    JobSubmitter, PollPolicy, VersioningService,
};
use appops_test_utils::MockHubClient;
use std::sync::Arc;
use std::time::Duration;

pub const HUB_ORG: &str = "00DHUB000000001";

/// Poll policy with a 1 ms interval
pub fn fast_policy(max_attempts: u32) -> PollPolicy {
    PollPolicy::new(Duration::from_millis(1), max_attempts)
}

pub struct Fixture {
    pub hub: Arc<MockHubClient>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            hub: Arc::new(MockHubClient::new(HUB_ORG)),
        }
    }

    pub fn dyn_hub(&self) -> Arc<dyn HubClient> {
        self.hub.clone()
    }

    pub fn api(&self) -> ControlPlaneApi {
        ControlPlaneApi::new(self.dyn_hub())
    }

    pub fn jobs(&self) -> JobSubmitter {
        JobSubmitter::new(self.api())
    }

    pub fn lookup(&self) -> EntityLookup {
        EntityLookup::new(self.dyn_hub())
    }

    pub fn instances(&self) -> Arc<InstanceResolver> {
        Arc::new(InstanceResolver::new(self.api()).with_manage_policy(fast_policy(10)))
    }

    pub fn deployer(&self) -> DeploymentOrchestrator {
        DeploymentOrchestrator::new(self.dyn_hub(), self.instances(), self.lookup(), self.jobs())
    }

    pub fn versioning(&self) -> VersioningService {
        VersioningService::new(self.instances(), self.lookup(), self.jobs())
    }
}
