//! Deploy command

use super::OrchestratorContext;
use crate::output::JobOutcome;
use anyhow::Result;
use appops_client_core::{DataSelection, DeployParams, JobOperation};
use log::debug;

/// Arguments of `appops deploy`
#[derive(Debug, Clone, Default)]
pub struct DeployArgs {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub dataset: Option<String>,
    pub plan: Option<String>,
    pub label: Option<String>,
    pub deactivate: bool,
    pub simulation: bool,
    pub filter: Option<String>,
    pub target_org: Option<String>,
}

impl DeployArgs {
    /// Reject a missing or doubled data selection before anything is loaded
    pub fn validate(&self) -> appops_client_core::Result<()> {
        DataSelection::from_identifiers(self.dataset.as_deref(), self.plan.as_deref())?;
        Ok(())
    }
}

pub struct DeployOrchestrator<'a> {
    ctx: &'a OrchestratorContext,
}

impl<'a> DeployOrchestrator<'a> {
    pub fn new(ctx: &'a OrchestratorContext) -> Self {
        Self { ctx }
    }

    /// Map command flags onto deployment sides
    ///
    /// Source: the given source instance, else the target org when a
    /// destination instance was given, else the control instance.
    /// Destination: the given destination instance, else the target org.
    pub fn params(&self, args: &DeployArgs) -> Result<DeployParams> {
        let target = self.ctx.target_session(args.target_org.as_deref())?;

        let source_session = match (&args.source, &args.destination) {
            (None, Some(_)) => target.clone(),
            _ => None,
        };
        let destination_session = match &args.destination {
            Some(_) => None,
            None => Some(
                self.ctx
                    .require_target_session(args.target_org.as_deref())?,
            ),
        };

        Ok(DeployParams {
            name: args.name.clone(),
            notes: args.notes.clone(),
            simulation: args.simulation,
            deactivate_all_events: args.deactivate,
            query_filter: args.filter.clone(),
            source_instance_id: args.source.clone(),
            source_session,
            destination_instance_id: args.destination.clone(),
            destination_session,
            dataset: args.dataset.clone(),
            plan: args.plan.clone(),
            label: args.label.clone(),
            acting_session: target,
        })
    }

    /// Launch the deployment; deployments are never awaited
    pub async fn deploy(&self, args: &DeployArgs) -> Result<JobOutcome> {
        args.validate()?;
        let params = self.params(args)?;
        debug!(
            "Deploy sides: source={:?} destination={:?}",
            args.source, args.destination
        );

        let job_id = self.ctx.deployer().deploy(&params).await?;
        Ok(JobOutcome {
            operation: JobOperation::Deploy.as_str().to_string(),
            job_id,
            job: None,
        })
    }
}
