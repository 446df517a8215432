//! Deployment orchestration
//!
//! A deployment copies a data set or a deployment plan from a source managed
//! instance to a destination managed instance. Either side may be named by
//! instance ID or by an org session; an org session that is not yet managed is
//! provisioned on the fly.

use crate::error::{ResolutionError, Result, ValidationError};
use crate::hub::HubClient;
use crate::instance::{InstanceResolver, ManageOptions};
use crate::jobs::JobSubmitter;
use crate::lookup::EntityLookup;
use crate::model::{
    DataDeployment, DeploymentRequest, DeploymentSource, EntityKind, EventControlOptions,
    JobOperation, QueryFilter,
};
use crate::progress::{ProgressProvider, ProgressUpdate};
use crate::session::{self, OrgSession};
use log::{debug, info};
use serde_json::Map;
use std::sync::Arc;

/// The data being deployed: exactly one data set or one deployment plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSelection {
    DataSet(String),
    DeploymentPlan(String),
}

impl DataSelection {
    pub fn from_identifiers(dataset: Option<&str>, plan: Option<&str>) -> Result<Self> {
        match (dataset, plan) {
            (Some(dataset), None) => Ok(Self::DataSet(dataset.to_string())),
            (None, Some(plan)) => Ok(Self::DeploymentPlan(plan.to_string())),
            (Some(_), Some(_)) => Err(ValidationError::precondition(
                "Specify either a data set or a deployment plan, not both",
            )
            .into()),
            (None, None) => Err(ValidationError::precondition(
                "Specify a data set or a deployment plan to deploy",
            )
            .into()),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::DataSet(_) => EntityKind::DataSet,
            Self::DeploymentPlan(_) => EntityKind::DeploymentPlan,
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            Self::DataSet(identifier) | Self::DeploymentPlan(identifier) => identifier,
        }
    }
}

#[derive(Clone, Default)]
pub struct DeployParams {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub simulation: bool,
    pub deactivate_all_events: bool,
    pub query_filter: Option<String>,
    pub source_instance_id: Option<String>,
    pub source_session: Option<Arc<dyn OrgSession>>,
    pub destination_instance_id: Option<String>,
    pub destination_session: Option<Arc<dyn OrgSession>>,
    pub dataset: Option<String>,
    pub plan: Option<String>,
    /// Name given to connections created while provisioning
    pub label: Option<String>,
    /// Session refreshed before the deployment is launched
    pub acting_session: Option<Arc<dyn OrgSession>>,
}

pub struct DeploymentOrchestrator {
    hub: Arc<dyn HubClient>,
    instances: Arc<InstanceResolver>,
    lookup: EntityLookup,
    jobs: JobSubmitter,
    progress: Arc<dyn ProgressProvider>,
}

impl DeploymentOrchestrator {
    pub fn new(
        hub: Arc<dyn HubClient>,
        instances: Arc<InstanceResolver>,
        lookup: EntityLookup,
        jobs: JobSubmitter,
    ) -> Self {
        Self {
            hub,
            instances,
            lookup,
            jobs,
            progress: <dyn ProgressProvider>::null(),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressProvider>) -> Self {
        self.progress = progress;
        self
    }

    /// Launch a deployment and return its job ID without waiting for it
    pub async fn deploy(&self, params: &DeployParams) -> Result<String> {
        let selection =
            DataSelection::from_identifiers(params.dataset.as_deref(), params.plan.as_deref())?;
        validate_sides(params)?;

        self.progress
            .report(ProgressUpdate::status("Resolving source instance"));
        let source_id = self.resolve_source(params).await?;
        self.progress
            .report(ProgressUpdate::status("Resolving destination instance"));
        let destination_id = self.resolve_destination(params).await?;
        debug!("Deploying from {source_id} to {destination_id}");

        if let Some(acting) = &params.acting_session {
            session::refresh_best_effort(acting.as_ref()).await;
        }

        let entity_id = self
            .lookup
            .resolve_entity_id(selection.identifier(), selection.kind())
            .await?;

        let (data_set_id, deployment_plan_id) = match selection {
            DataSelection::DataSet(_) => (Some(entity_id), None),
            DataSelection::DeploymentPlan(_) => (None, Some(entity_id)),
        };
        let request = DeploymentRequest {
            deployment_name: params.name.clone(),
            deployment_notes: params.notes.clone(),
            data: vec![DataDeployment {
                data_set_id,
                deployment_plan_id,
                simulation: params.simulation,
                event_control_options: EventControlOptions {
                    deactivate_all: params.deactivate_all_events,
                },
                query_filter: QueryFilter {
                    filter: params.query_filter.clone(),
                },
            }],
            metadata: Map::new(),
            source: DeploymentSource {
                managed_instance_id: source_id,
            },
        };

        let job_id = self
            .jobs
            .submit_job(JobOperation::Deploy, Some(&destination_id), &request, None)
            .await?;
        info!("Deployment launched with job ID {job_id}");
        Ok(job_id)
    }

    async fn resolve_source(&self, params: &DeployParams) -> Result<String> {
        if let Some(id) = &params.source_instance_id {
            return Ok(id.clone());
        }
        if let Some(org) = &params.source_session {
            return self.provision_side(org.as_ref(), params).await;
        }

        let control_org = self.hub.org_id();
        debug!("No source given, using the control org {control_org}");
        self.instances
            .resolve_instance_for_org(control_org)
            .await?
            .map(|instance| instance.id)
            .ok_or_else(|| ResolutionError::no_control_instance(control_org).into())
    }

    async fn resolve_destination(&self, params: &DeployParams) -> Result<String> {
        match (&params.destination_instance_id, &params.destination_session) {
            (Some(id), _) => Ok(id.clone()),
            (None, Some(org)) => self.provision_side(org.as_ref(), params).await,
            (None, None) => Err(ValidationError::precondition("Specify a destination").into()),
        }
    }

    async fn provision_side(&self, org: &dyn OrgSession, params: &DeployParams) -> Result<String> {
        let instance = self
            .instances
            .find_or_provision(org, params.label.as_deref(), &ManageOptions::default())
            .await?;
        Ok(instance.id)
    }
}

fn validate_sides(params: &DeployParams) -> Result<()> {
    if params.source_instance_id.is_some() && params.source_session.is_some() {
        return Err(ValidationError::precondition(
            "Specify the source as an instance ID or an org, not both",
        )
        .into());
    }
    if params.destination_instance_id.is_some() && params.destination_session.is_some() {
        return Err(ValidationError::precondition(
            "Specify the destination as an instance ID or an org, not both",
        )
        .into());
    }
    if params.destination_instance_id.is_none() && params.destination_session.is_none() {
        return Err(ValidationError::precondition("Specify a destination").into());
    }
    Ok(())
}
