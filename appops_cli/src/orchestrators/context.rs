//! Shared wiring for command orchestrators

use crate::config::AppConfig;
use crate::error::{CliError, ErrorContext};
use crate::session::ProfileSession;
use anyhow::{Context, Result};
use appops_client_core::{
    ControlPlaneApi, DeploymentOrchestrator, EntityLookup, HubClient, InstanceResolver,
    JobSubmitter, OrgSession, ProgressProvider, RestHubClient, VersioningService,
};
use log::debug;
use std::sync::Arc;

/// Core services built once per command from the loaded configuration
pub struct OrchestratorContext {
    config: AppConfig,
    hub: Arc<dyn HubClient>,
    instances: Arc<InstanceResolver>,
    progress: Arc<dyn ProgressProvider>,
}

impl OrchestratorContext {
    /// Connect to the configured control org
    pub fn connect(config: AppConfig, progress: Arc<dyn ProgressProvider>) -> Result<Self> {
        let hub_profile = config.hub()?;
        debug!(
            "Connecting to control org {} at {}",
            hub_profile.org_id, hub_profile.instance_url
        );

        let client = RestHubClient::new(ProfileSession::shared(hub_profile), config.client.clone())
            .context("Failed to create control-plane client")?;

        Ok(Self::with_hub(config, Arc::new(client), progress))
    }

    /// Build the context over an existing hub client
    pub fn with_hub(
        config: AppConfig,
        hub: Arc<dyn HubClient>,
        progress: Arc<dyn ProgressProvider>,
    ) -> Self {
        let instances = InstanceResolver::new(ControlPlaneApi::new(Arc::clone(&hub)))
            .with_manage_policy(config.client.manage_poll_policy())
            .with_progress(Arc::clone(&progress));

        Self {
            config,
            hub,
            instances: Arc::new(instances),
            progress,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn instances(&self) -> &Arc<InstanceResolver> {
        &self.instances
    }

    pub fn jobs(&self) -> JobSubmitter {
        JobSubmitter::new(ControlPlaneApi::new(Arc::clone(&self.hub)))
            .with_progress(Arc::clone(&self.progress))
    }

    fn lookup(&self) -> EntityLookup {
        EntityLookup::new(Arc::clone(&self.hub))
    }

    pub fn versioning(&self) -> VersioningService {
        VersioningService::new(Arc::clone(&self.instances), self.lookup(), self.jobs())
    }

    pub fn deployer(&self) -> DeploymentOrchestrator {
        DeploymentOrchestrator::new(
            Arc::clone(&self.hub),
            Arc::clone(&self.instances),
            self.lookup(),
            self.jobs(),
        )
        .with_progress(Arc::clone(&self.progress))
    }

    /// Session for `--target-org`, or the default org when none was given
    pub fn target_session(&self, alias: Option<&str>) -> Result<Option<Arc<dyn OrgSession>>> {
        Ok(self
            .config
            .org(alias)?
            .map(|(_, profile)| ProfileSession::shared(profile)))
    }

    pub fn require_target_session(&self, alias: Option<&str>) -> Result<Arc<dyn OrgSession>> {
        self.target_session(alias)?.ok_or_else(|| {
            CliError::misuse("No target org given")
                .with_suggestion("Pass --target-org <alias> or set default_org")
                .into()
        })
    }
}
