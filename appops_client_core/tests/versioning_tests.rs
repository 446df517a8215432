//! Checkin and checkout job submission

mod common;

use appops_client_core::error::ResolutionError;
use appops_client_core::model::connection::OBJECT;
use appops_client_core::{CheckinParams, CheckoutParams, Error, InstanceTarget, OrgSession};
use appops_test_utils::{MockOrgSession, builders};
use common::Fixture;
use serde_json::json;
use std::sync::Arc;

fn by_id(id: &str) -> Option<InstanceTarget> {
    Some(InstanceTarget::Id(id.to_string()))
}

#[tokio::test]
async fn test_checkin_by_instance_id_skips_lookup() {
    // Arrange
    let fixture = Fixture::new();
    fixture.hub.script_submission("job-ci");
    let params = CheckinParams {
        target: by_id("inst-1"),
        branch: Some("feature/accounts".to_string()),
        commit_message: Some("Sync accounts".to_string()),
        vcs_token: Some("ghp_token".to_string()),
        ..Default::default()
    };

    // Act
    let job_id = fixture.versioning().checkin(&params).await.unwrap();

    // Assert
    assert_eq!(job_id, "job-ci");
    let requests = fixture.hub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/instances/inst-1/checkin");
    assert_eq!(requests[0].header("vcs-access-token"), Some("ghp_token"));
    assert_eq!(
        requests[0].body,
        Some(json!({
            "branchName": "feature/accounts",
            "options": {"commitMessage": "Sync accounts"}
        }))
    );
}

#[tokio::test]
async fn test_checkin_resolves_dataset() {
    let fixture = Fixture::new();
    let dataset_id = fixture
        .hub
        .add_record("PDRI__DataSet__c", builders::named_record("Accounts"));
    let params = CheckinParams {
        target: by_id("inst-1"),
        dataset: Some("Accounts".to_string()),
        ..Default::default()
    };

    fixture.versioning().checkin(&params).await.unwrap();

    let body = fixture.hub.submissions()[0].body.clone().unwrap();
    assert_eq!(body["datasetId"], dataset_id.as_str());
}

#[tokio::test]
async fn test_checkin_with_dataset_and_plan_is_rejected() {
    let fixture = Fixture::new();
    let params = CheckinParams {
        target: by_id("inst-1"),
        dataset: Some("Accounts".to_string()),
        plan: Some("Release".to_string()),
        ..Default::default()
    };

    let result = fixture.versioning().checkin(&params).await;

    assert!(result.unwrap_err().is_precondition());
    assert!(fixture.hub.requests().is_empty());
}

#[tokio::test]
async fn test_checkin_by_org_refreshes_connection() {
    // Arrange
    let fixture = Fixture::new();
    let connection_id = fixture
        .hub
        .add_record(OBJECT, builders::connection_record("00D1", "Tenant"));
    fixture
        .hub
        .add_instance(builders::instance_with_connection("00D1", "inst-1", &connection_id));
    let session = Arc::new(MockOrgSession::new("00D1"));
    let params = CheckinParams {
        target: Some(InstanceTarget::Org(session.clone())),
        ..Default::default()
    };

    // Act
    fixture.versioning().checkin(&params).await.unwrap();

    // Assert
    assert_eq!(session.refresh_count(), 1);
    let (_, id, fields) = &fixture.hub.updates()[0];
    assert_eq!(id, &connection_id);
    assert_eq!(fields["PDRI__Access_Token__c"], "token-1");
    assert_eq!(
        fixture.hub.submissions()[0].path,
        "/instances/inst-1/checkin"
    );
}

#[tokio::test]
async fn test_checkin_for_unmanaged_org_fails() {
    let fixture = Fixture::new();
    let session: Arc<dyn OrgSession> = Arc::new(MockOrgSession::new("00D2"));
    let params = CheckinParams {
        target: Some(InstanceTarget::Org(session)),
        ..Default::default()
    };

    let result = fixture.versioning().checkin(&params).await;

    assert!(matches!(
        result,
        Err(Error::Resolution(ResolutionError::InstanceNotFound { .. }))
    ));
    assert!(fixture.hub.submissions().is_empty());
}

#[tokio::test]
async fn test_checkout_sends_deactivate_flag() {
    let fixture = Fixture::new();
    let params = CheckoutParams {
        target: by_id("inst-1"),
        deactivate_all: true,
    };

    fixture.versioning().checkout(&params).await.unwrap();

    let request = &fixture.hub.submissions()[0];
    assert_eq!(request.path, "/instances/inst-1/checkout");
    assert_eq!(request.body, Some(json!({"deactivateAll": true})));
}

#[tokio::test]
async fn test_checkout_without_target_is_rejected() {
    let fixture = Fixture::new();

    let result = fixture
        .versioning()
        .checkout(&CheckoutParams::default())
        .await;

    assert!(result.unwrap_err().is_precondition());
}
