//! Checkin and checkout commands

use super::{OrchestratorContext, wait_for_job};
use crate::output::JobOutcome;
use anyhow::Result;
use appops_client_core::{
    CheckinParams, CheckoutParams, InstanceTarget, JobOperation, VersioningService,
};
use log::debug;

/// Arguments of `appops checkin`
#[derive(Debug, Clone, Default)]
pub struct CheckinArgs {
    pub instance_id: Option<String>,
    pub target_org: Option<String>,
    pub dataset: Option<String>,
    pub plan: Option<String>,
    pub branch: Option<String>,
    pub message: Option<String>,
    pub vcs_token: Option<String>,
    pub wait: bool,
}

/// Arguments of `appops checkout`
#[derive(Debug, Clone, Default)]
pub struct CheckoutArgs {
    pub instance_id: Option<String>,
    pub target_org: Option<String>,
    pub deactivate_all: bool,
    pub wait: bool,
}

pub struct VersioningOrchestrator<'a> {
    ctx: &'a OrchestratorContext,
    service: VersioningService,
}

impl<'a> VersioningOrchestrator<'a> {
    pub fn new(ctx: &'a OrchestratorContext) -> Self {
        Self {
            ctx,
            service: ctx.versioning(),
        }
    }

    /// An explicit instance ID wins over the target org
    fn target(&self, instance_id: Option<&str>, target_org: Option<&str>) -> Result<InstanceTarget> {
        match instance_id {
            Some(id) => Ok(InstanceTarget::Id(id.to_string())),
            None => Ok(InstanceTarget::Org(
                self.ctx.require_target_session(target_org)?,
            )),
        }
    }

    pub async fn checkin(&self, args: &CheckinArgs) -> Result<JobOutcome> {
        let params = CheckinParams {
            target: Some(self.target(args.instance_id.as_deref(), args.target_org.as_deref())?),
            dataset: args.dataset.clone(),
            plan: args.plan.clone(),
            branch: args.branch.clone(),
            commit_message: args.message.clone(),
            vcs_token: args.vcs_token.clone(),
        };

        let job_id = self.service.checkin(&params).await?;
        self.finish(JobOperation::Checkin, job_id, args.wait).await
    }

    pub async fn checkout(&self, args: &CheckoutArgs) -> Result<JobOutcome> {
        let params = CheckoutParams {
            target: Some(self.target(args.instance_id.as_deref(), args.target_org.as_deref())?),
            deactivate_all: args.deactivate_all,
        };

        let job_id = self.service.checkout(&params).await?;
        self.finish(JobOperation::Checkout, job_id, args.wait).await
    }

    async fn finish(&self, operation: JobOperation, job_id: String, wait: bool) -> Result<JobOutcome> {
        let job = if wait {
            debug!("Waiting for {} job {job_id}", operation.as_str());
            let policy = self.ctx.config().client.job_poll_policy();
            Some(wait_for_job(self.service.jobs(), &job_id, policy).await?)
        } else {
            None
        };

        Ok(JobOutcome {
            operation: operation.as_str().to_string(),
            job_id,
            job,
        })
    }
}
