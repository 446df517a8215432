//! Managed instance resolution and provisioning

use crate::api::ControlPlaneApi;
use crate::connection::ConnectionResolver;
use crate::error::{ResolutionError, Result};
use crate::jobs::{JobSubmitter, PollPolicy};
use crate::model::{
    JobOperation, ManageRequest, ManagedInstance, PlatformInstanceRef, VersioningOptions,
};
use crate::progress::{ProgressProvider, ProgressUpdate};
use crate::session::OrgSession;
use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

/// Finds the managed instance backing an organization ID
#[async_trait]
pub trait InstanceLocator: Send + Sync {
    async fn find_by_org_id(&self, org_id: &str) -> Result<Option<ManagedInstance>>;
}

/// Lists every managed instance and takes the first whose org matches
pub struct ScanInstanceLocator {
    api: ControlPlaneApi,
}

impl ScanInstanceLocator {
    pub fn new(api: ControlPlaneApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl InstanceLocator for ScanInstanceLocator {
    async fn find_by_org_id(&self, org_id: &str) -> Result<Option<ManagedInstance>> {
        let list = self.api.list_instances().await?;
        debug!(
            "Scanning {} managed instances for org {org_id}",
            list.instances.len()
        );

        Ok(list
            .instances
            .into_iter()
            .find(|instance| instance.platform_instance_id.as_deref() == Some(org_id)))
    }
}

/// Extra settings sent with a manage job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManageOptions {
    pub versioning: Option<VersioningOptions>,
    /// Version control token forwarded as a request header
    pub vcs_token: Option<String>,
}

pub struct InstanceResolver {
    api: ControlPlaneApi,
    connections: ConnectionResolver,
    jobs: JobSubmitter,
    locator: Arc<dyn InstanceLocator>,
    manage_policy: PollPolicy,
    progress: Arc<dyn ProgressProvider>,
}

impl InstanceResolver {
    pub fn new(api: ControlPlaneApi) -> Self {
        let hub = Arc::clone(api.hub());
        Self {
            connections: ConnectionResolver::new(hub),
            jobs: JobSubmitter::new(api.clone()),
            locator: Arc::new(ScanInstanceLocator::new(api.clone())),
            manage_policy: PollPolicy::manage(),
            progress: <dyn ProgressProvider>::null(),
            api,
        }
    }

    /// Replace the linear scan with another lookup strategy
    pub fn with_locator(mut self, locator: Arc<dyn InstanceLocator>) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_manage_policy(mut self, policy: PollPolicy) -> Self {
        self.manage_policy = policy;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressProvider>) -> Self {
        self.jobs = self.jobs.with_progress(Arc::clone(&progress));
        self.progress = progress;
        self
    }

    pub fn connections(&self) -> &ConnectionResolver {
        &self.connections
    }

    pub async fn list_instances(&self) -> Result<Vec<ManagedInstance>> {
        Ok(self.api.list_instances().await?.instances)
    }

    pub async fn resolve_instance_for_org(&self, org_id: &str) -> Result<Option<ManagedInstance>> {
        self.locator.find_by_org_id(org_id).await
    }

    /// Like [`resolve_instance_for_org`](Self::resolve_instance_for_org), but
    /// an unmanaged org is an error
    pub async fn require_instance_for_org(&self, org_id: &str) -> Result<ManagedInstance> {
        self.resolve_instance_for_org(org_id)
            .await?
            .ok_or_else(|| ResolutionError::instance_not_found(org_id).into())
    }

    /// Return the org's managed instance, provisioning it when absent
    ///
    /// An existing instance has its connection token refreshed. Otherwise a
    /// connection is resolved or created and a manage job is run to completion.
    pub async fn find_or_provision(
        &self,
        session: &dyn OrgSession,
        label: Option<&str>,
        options: &ManageOptions,
    ) -> Result<ManagedInstance> {
        let org_id = session.org_id();
        self.progress.report(ProgressUpdate::status(format!(
            "Looking up managed instance for org {org_id}"
        )));

        if let Some(instance) = self.resolve_instance_for_org(org_id).await? {
            info!("Org {org_id} is already managed as {}", instance.id);
            match &instance.connection_id {
                Some(connection_id) => {
                    self.connections
                        .refresh_token(connection_id, session)
                        .await?
                }
                None => {
                    self.connections.resolve_or_create(session, label).await?;
                }
            }
            return Ok(instance);
        }

        let connection_id = self.connections.resolve_or_create(session, label).await?;
        self.provision(org_id, &connection_id, options).await
    }

    async fn provision(
        &self,
        org_id: &str,
        connection_id: &str,
        options: &ManageOptions,
    ) -> Result<ManagedInstance> {
        self.progress.report(ProgressUpdate::status(format!(
            "Managing instance for org {org_id}"
        )));

        let request = ManageRequest {
            platform_instance: PlatformInstanceRef {
                platform_instance_id: org_id.to_string(),
                connection_id: connection_id.to_string(),
            },
            options: options.versioning.clone(),
        };

        let job_id = self
            .jobs
            .submit_job(
                JobOperation::Manage,
                None,
                &request,
                options.vcs_token.as_deref(),
            )
            .await?;
        let job = self.jobs.await_completion(&job_id, self.manage_policy).await?;

        let instance: ManagedInstance = job.result()?;
        info!("Org {org_id} is now managed as {}", instance.id);
        Ok(instance)
    }

    /// Remove an instance from management
    ///
    /// The control plane tears the instance down asynchronously; no job is
    /// awaited.
    pub async fn unmanage(&self, instance_id: &str) -> Result<()> {
        self.api.delete_instance(instance_id).await?;
        info!("Requested unmanage of instance {instance_id}");
        Ok(())
    }
}
