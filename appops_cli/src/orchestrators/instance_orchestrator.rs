//! Instance commands: list, manage and unmanage

use super::OrchestratorContext;
use anyhow::Result;
use appops_client_core::session::refresh_best_effort;
use appops_client_core::{ManageOptions, ManagedInstance, VersioningOptions};
use log::{debug, info};

/// Arguments of `appops manage`
#[derive(Debug, Clone, Default)]
pub struct ManageArgs {
    pub target_org: Option<String>,
    /// Enable checkin and checkout on the new instance
    pub versioning: bool,
    pub commit_message: Option<String>,
    pub vcs_token: Option<String>,
    pub label: Option<String>,
}

impl ManageArgs {
    fn options(&self) -> ManageOptions {
        ManageOptions {
            versioning: self
                .versioning
                .then(|| VersioningOptions::enabled(self.commit_message.clone())),
            vcs_token: self.vcs_token.clone(),
        }
    }
}

pub struct InstanceOrchestrator<'a> {
    ctx: &'a OrchestratorContext,
}

impl<'a> InstanceOrchestrator<'a> {
    pub fn new(ctx: &'a OrchestratorContext) -> Self {
        Self { ctx }
    }

    pub async fn list(&self) -> Result<Vec<ManagedInstance>> {
        Ok(self.ctx.instances().list_instances().await?)
    }

    /// Bring the target org under management, reusing an existing instance
    pub async fn manage(&self, args: &ManageArgs) -> Result<ManagedInstance> {
        let session = self
            .ctx
            .require_target_session(args.target_org.as_deref())?;
        refresh_best_effort(session.as_ref()).await;

        let instance = self
            .ctx
            .instances()
            .find_or_provision(session.as_ref(), args.label.as_deref(), &args.options())
            .await?;

        info!(
            "Org {} is managed as instance {}",
            session.org_id(),
            instance.id
        );
        Ok(instance)
    }

    /// Request removal of an instance by ID, or of the target org's instance
    pub async fn unmanage(
        &self,
        instance_id: Option<&str>,
        target_org: Option<&str>,
    ) -> Result<String> {
        let instance_id = match instance_id {
            Some(id) => id.to_string(),
            None => {
                let session = self.ctx.require_target_session(target_org)?;
                self.ctx
                    .instances()
                    .require_instance_for_org(session.org_id())
                    .await?
                    .id
            }
        };

        debug!("Unmanaging instance {instance_id}");
        self.ctx.instances().unmanage(&instance_id).await?;
        Ok(instance_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, OrgProfile};
    use crate::error::{CliError, ExitCode};
    use appops_client_core::{ClientConfig, ProgressProvider};
    use appops_test_utils::{MockHubClient, builders};
    use serde_json::json;
    use std::sync::Arc;

    fn profile(org_id: &str) -> OrgProfile {
        OrgProfile {
            instance_url: format!("https://{}.example.com", org_id.to_lowercase()),
            access_token: format!("token-{org_id}"),
            org_id: org_id.to_string(),
            username: "ops@example.com".to_string(),
            user_id: None,
            org_type: "Sandbox".to_string(),
            refresh_token: None,
            client_id: None,
            login_url: "https://login.salesforce.com".to_string(),
        }
    }

    fn context(hub: &Arc<MockHubClient>) -> OrchestratorContext {
        let mut config = AppConfig {
            client: ClientConfig::test(),
            ..Default::default()
        };
        config.orgs.insert("uat".to_string(), profile("00D1"));
        OrchestratorContext::with_hub(config, hub.clone(), <dyn ProgressProvider>::null())
    }

    #[tokio::test]
    async fn test_manage_existing_instance_refreshes_connection() {
        // Arrange
        let hub = Arc::new(MockHubClient::new("00DHUB"));
        let connection_id = hub.add_record(
            "PDRI__Connection__c",
            builders::connection_record("00D1", "UAT"),
        );
        hub.add_instance(builders::instance_with_connection("00D1", "inst-1", &connection_id));
        let ctx = context(&hub);
        let args = ManageArgs {
            target_org: Some("uat".to_string()),
            ..Default::default()
        };

        // Act
        let instance = InstanceOrchestrator::new(&ctx).manage(&args).await.unwrap();

        // Assert
        assert_eq!(instance.id, "inst-1");
        let (_, _, fields) = &hub.updates()[0];
        assert_eq!(fields["PDRI__Access_Token__c"], "token-00D1");
        assert!(hub.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_manage_with_versioning_sends_options() {
        let hub = Arc::new(MockHubClient::new("00DHUB"));
        hub.script_submission("job-m");
        hub.script_job_polls(
            "job-m",
            vec![builders::completed_poll(
                "job-m",
                &json!({"id": "inst-9", "platformInstanceId": "00D1"}),
            )],
        );
        let ctx = context(&hub);
        let args = ManageArgs {
            target_org: Some("uat".to_string()),
            versioning: true,
            commit_message: Some("Baseline".to_string()),
            vcs_token: Some("ghp_x".to_string()),
            label: Some("UAT".to_string()),
        };

        let instance = InstanceOrchestrator::new(&ctx).manage(&args).await.unwrap();

        assert_eq!(instance.id, "inst-9");
        let request = &hub.submissions()[0];
        assert_eq!(request.header("vcs-access-token"), Some("ghp_x"));
        assert_eq!(request.body.as_ref().unwrap()["options"]["checkin"], true);
    }

    #[tokio::test]
    async fn test_unmanage_by_org_resolves_instance() {
        let hub = Arc::new(MockHubClient::new("00DHUB"));
        hub.add_instance(builders::instance_json("00D1", "inst-1"));
        let ctx = context(&hub);

        let removed = InstanceOrchestrator::new(&ctx)
            .unmanage(None, Some("uat"))
            .await
            .unwrap();

        assert_eq!(removed, "inst-1");
        assert!(hub.instances().is_empty());
    }

    #[tokio::test]
    async fn test_unmanage_unmanaged_org_is_not_found() {
        let hub = Arc::new(MockHubClient::new("00DHUB"));
        let ctx = context(&hub);

        let error = InstanceOrchestrator::new(&ctx)
            .unmanage(None, Some("uat"))
            .await
            .unwrap_err();

        assert_eq!(CliError::from(error).exit_code(), ExitCode::NotFound);
    }

    #[tokio::test]
    async fn test_manage_without_target_is_misuse() {
        let hub = Arc::new(MockHubClient::new("00DHUB"));
        let ctx = context(&hub);

        let error = InstanceOrchestrator::new(&ctx)
            .manage(&ManageArgs::default())
            .await
            .unwrap_err();

        assert_eq!(CliError::from(error).exit_code(), ExitCode::Misuse);
    }
}
