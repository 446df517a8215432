//! Checkin and checkout of managed instance data against version control

use crate::error::{Result, ValidationError};
use crate::instance::InstanceResolver;
use crate::jobs::JobSubmitter;
use crate::lookup::EntityLookup;
use crate::model::{CheckinOptions, CheckinRequest, CheckoutRequest, EntityKind, JobOperation};
use crate::session::{self, OrgSession};
use log::{debug, info};
use std::sync::Arc;

/// Which managed instance a versioning job runs against
#[derive(Clone)]
pub enum InstanceTarget {
    /// Explicit managed instance ID, used without checking it exists
    Id(String),
    /// The managed instance backing this org session
    Org(Arc<dyn OrgSession>),
}

#[derive(Clone, Default)]
pub struct CheckinParams {
    pub target: Option<InstanceTarget>,
    pub dataset: Option<String>,
    pub plan: Option<String>,
    pub branch: Option<String>,
    pub commit_message: Option<String>,
    pub vcs_token: Option<String>,
}

#[derive(Clone, Default)]
pub struct CheckoutParams {
    pub target: Option<InstanceTarget>,
    pub deactivate_all: bool,
}

pub struct VersioningService {
    instances: Arc<InstanceResolver>,
    lookup: EntityLookup,
    jobs: JobSubmitter,
}

impl VersioningService {
    pub fn new(instances: Arc<InstanceResolver>, lookup: EntityLookup, jobs: JobSubmitter) -> Self {
        Self {
            instances,
            lookup,
            jobs,
        }
    }

    pub fn jobs(&self) -> &JobSubmitter {
        &self.jobs
    }

    /// Submit a checkin job and return its ID
    pub async fn checkin(&self, params: &CheckinParams) -> Result<String> {
        if params.dataset.is_some() && params.plan.is_some() {
            return Err(ValidationError::precondition(
                "Specify either a data set or a deployment plan, not both",
            )
            .into());
        }
        let target = require_target(params.target.as_ref())?;

        let instance_id = self.resolve_target(target).await?;

        let dataset_id = match &params.dataset {
            Some(dataset) => Some(
                self.lookup
                    .resolve_entity_id(dataset, EntityKind::DataSet)
                    .await?,
            ),
            None => None,
        };
        let deployment_plan_id = match &params.plan {
            Some(plan) => Some(
                self.lookup
                    .resolve_entity_id(plan, EntityKind::DeploymentPlan)
                    .await?,
            ),
            None => None,
        };

        let request = CheckinRequest {
            dataset_id,
            deployment_plan_id,
            branch_name: params.branch.clone(),
            options: CheckinOptions {
                commit_message: params.commit_message.clone(),
            },
        };

        info!("Checking in managed instance {instance_id}");
        self.jobs
            .submit_job(
                JobOperation::Checkin,
                Some(&instance_id),
                &request,
                params.vcs_token.as_deref(),
            )
            .await
    }

    /// Submit a checkout job and return its ID
    pub async fn checkout(&self, params: &CheckoutParams) -> Result<String> {
        let target = require_target(params.target.as_ref())?;
        let instance_id = self.resolve_target(target).await?;

        let request = CheckoutRequest {
            deactivate_all: params.deactivate_all,
        };

        info!("Checking out managed instance {instance_id}");
        self.jobs
            .submit_job(JobOperation::Checkout, Some(&instance_id), &request, None)
            .await
    }

    /// Resolve a target to a managed instance ID
    ///
    /// For an org target the session is refreshed, the instance must already
    /// exist, and its connection receives the fresh token.
    pub async fn resolve_target(&self, target: &InstanceTarget) -> Result<String> {
        match target {
            InstanceTarget::Id(id) => {
                debug!("Using managed instance {id}");
                Ok(id.clone())
            }
            InstanceTarget::Org(org) => {
                session::refresh_best_effort(org.as_ref()).await;

                let instance = self
                    .instances
                    .require_instance_for_org(org.org_id())
                    .await?;
                let connections = self.instances.connections();
                match &instance.connection_id {
                    Some(connection_id) => {
                        connections.refresh_token(connection_id, org.as_ref()).await?
                    }
                    None => {
                        connections.resolve_or_create(org.as_ref(), None).await?;
                    }
                }

                Ok(instance.id)
            }
        }
    }
}

fn require_target(target: Option<&InstanceTarget>) -> Result<&InstanceTarget> {
    target.ok_or_else(|| {
        ValidationError::precondition("Specify a managed instance ID or a target org").into()
    })
}
