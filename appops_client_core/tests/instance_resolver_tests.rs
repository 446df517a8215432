//! Managed instance lookup, provisioning and unmanage

mod common;

use appops_client_core::error::{JobError, ResolutionError};
use appops_client_core::model::connection::OBJECT;
use appops_client_core::{
    Error, InstanceLocator, InstanceResolver, ManageOptions, ManagedInstance, Result,
    VersioningOptions,
};
use appops_test_utils::{MockOrgSession, MockResponse, builders};
use async_trait::async_trait;
use common::{Fixture, fast_policy};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_resolves_instance_by_org_id() {
    // Arrange
    let fixture = Fixture::new();
    fixture.hub.add_instance(json!({"platformInstanceId": "00D1", "id": "inst-1"}));
    let resolver = fixture.instances();

    // Act
    let found = resolver.resolve_instance_for_org("00D1").await.unwrap();
    let missing = resolver.resolve_instance_for_org("00D2").await.unwrap();

    // Assert
    assert_eq!(found.map(|i| i.id), Some("inst-1".to_string()));
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_first_matching_instance_is_taken() {
    let fixture = Fixture::new();
    fixture.hub.add_instance(builders::instance_json("00D1", "inst-a"));
    fixture.hub.add_instance(builders::instance_json("00D1", "inst-b"));

    let found = fixture
        .instances()
        .resolve_instance_for_org("00D1")
        .await
        .unwrap();

    assert_eq!(found.unwrap().id, "inst-a");
}

#[tokio::test]
async fn test_entries_without_org_id_are_skipped() {
    let fixture = Fixture::new();
    fixture.hub.add_instance(json!({"platformInstanceId": null, "id": "inst-null"}));
    fixture.hub.add_instance(json!({"id": "inst-absent"}));
    fixture.hub.add_instance(builders::instance_json("00D1", "inst-1"));

    let found = fixture
        .instances()
        .resolve_instance_for_org("00D1")
        .await
        .unwrap();

    assert_eq!(found.unwrap().id, "inst-1");
}

#[tokio::test]
async fn test_require_instance_for_unmanaged_org_fails() {
    let fixture = Fixture::new();

    let result = fixture.instances().require_instance_for_org("00D9").await;

    assert!(matches!(
        result,
        Err(Error::Resolution(ResolutionError::InstanceNotFound { .. }))
    ));
}

#[tokio::test]
async fn test_provisions_unmanaged_org_through_manage_job() {
    // Arrange
    let fixture = Fixture::new();
    fixture.hub.script_submission("job-9");
    let result = json!({"id": "inst-new", "platformInstanceId": "00D3", "controlInstance": false});
    fixture.hub.script_job_polls(
        "job-9",
        vec![
            builders::pending_poll("job-9"),
            builders::pending_poll("job-9"),
            builders::pending_poll("job-9"),
            builders::completed_poll("job-9", &result),
        ],
    );
    let session = MockOrgSession::new("00D3");

    // Act
    let instance = fixture
        .instances()
        .find_or_provision(&session, None, &ManageOptions::default())
        .await
        .unwrap();

    // Assert
    assert_eq!(instance.id, "inst-new");
    assert_eq!(instance.platform_instance_id.as_deref(), Some("00D3"));
    assert_eq!(fixture.hub.poll_count("job-9"), 4);
    assert_eq!(fixture.hub.insert_count(), 1);

    let connection_id = fixture.hub.records(OBJECT)[0]["Id"].clone();
    let request = &fixture.hub.submissions()[0];
    assert_eq!(request.path, "/instances");
    assert_eq!(
        request.body,
        Some(json!({"platformInstance": {
            "platformInstanceId": "00D3",
            "connectionId": connection_id
        }}))
    );
}

#[tokio::test]
async fn test_existing_instance_only_refreshes_its_connection() {
    // Arrange
    let fixture = Fixture::new();
    let connection_id = fixture
        .hub
        .add_record(OBJECT, builders::connection_record("00D1", "Tenant"));
    fixture
        .hub
        .add_instance(builders::instance_with_connection("00D1", "inst-1", &connection_id));
    let session = MockOrgSession::new("00D1").with_token("latest");

    // Act
    let instance = fixture
        .instances()
        .find_or_provision(&session, None, &ManageOptions::default())
        .await
        .unwrap();

    // Assert
    assert_eq!(instance.id, "inst-1");
    assert!(fixture.hub.submissions().is_empty());
    assert_eq!(fixture.hub.insert_count(), 0);
    let (_, id, fields) = &fixture.hub.updates()[0];
    assert_eq!(id, &connection_id);
    assert_eq!(fields["PDRI__Access_Token__c"], "latest");
}

#[tokio::test]
async fn test_existing_instance_without_connection_gets_one() {
    let fixture = Fixture::new();
    fixture.hub.add_instance(builders::instance_json("00D1", "inst-1"));
    let session = MockOrgSession::new("00D1");

    let instance = fixture
        .instances()
        .find_or_provision(&session, Some("Tenant One"), &ManageOptions::default())
        .await
        .unwrap();

    assert_eq!(instance.id, "inst-1");
    assert_eq!(fixture.hub.insert_count(), 1);
    assert!(fixture.hub.submissions().is_empty());
}

#[tokio::test]
async fn test_manage_options_are_sent_with_the_job() {
    // Arrange
    let fixture = Fixture::new();
    fixture.hub.script_submission("job-v");
    fixture.hub.script_job_polls(
        "job-v",
        vec![builders::completed_poll(
            "job-v",
            &json!({"id": "inst-v", "platformInstanceId": "00D4"}),
        )],
    );
    let session = MockOrgSession::new("00D4");
    let options = ManageOptions {
        versioning: Some(VersioningOptions::enabled(Some("Initial import".to_string()))),
        vcs_token: Some("ghp_token".to_string()),
    };

    // Act
    fixture
        .instances()
        .find_or_provision(&session, None, &options)
        .await
        .unwrap();

    // Assert
    let request = &fixture.hub.submissions()[0];
    assert_eq!(request.header("vcs-access-token"), Some("ghp_token"));
    let body = request.body.as_ref().unwrap();
    assert_eq!(
        body["options"],
        json!({"checkin": true, "checkout": true, "commitMessage": "Initial import"})
    );
}

#[tokio::test]
async fn test_unusable_manage_result_fails() {
    let fixture = Fixture::new();
    fixture.hub.script_submission("job-x");
    fixture.hub.script_job_polls(
        "job-x",
        vec![MockResponse::Json(builders::jobs_response(vec![json!({
            "id": "job-x",
            "status": "COMPLETED",
            "resultData": "not json"
        })]))],
    );
    let session = MockOrgSession::new("00D5");

    let result = fixture
        .instances()
        .find_or_provision(&session, None, &ManageOptions::default())
        .await;

    assert!(matches!(
        result,
        Err(Error::Job(JobError::InvalidResult { .. }))
    ));
}

#[tokio::test]
async fn test_manage_job_times_out_under_policy() {
    let fixture = Fixture::new();
    fixture.hub.script_submission("job-slow");
    let resolver = InstanceResolver::new(fixture.api()).with_manage_policy(fast_policy(3));
    let session = MockOrgSession::new("00D6");

    let result = resolver
        .find_or_provision(&session, None, &ManageOptions::default())
        .await;

    assert!(matches!(
        result,
        Err(Error::Job(JobError::Timeout { attempts: 3, .. }))
    ));
    assert_eq!(fixture.hub.poll_count("job-slow"), 3);
}

#[tokio::test]
async fn test_unmanage_is_fire_and_forget() {
    // Arrange
    let fixture = Fixture::new();
    fixture.hub.add_instance(builders::instance_json("00D1", "inst-1"));

    // Act
    fixture.instances().unmanage("inst-1").await.unwrap();

    // Assert
    assert!(fixture.hub.instances().is_empty());
    let requests = fixture.hub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/instances/inst-1");
}

struct FixedLocator;

#[async_trait]
impl InstanceLocator for FixedLocator {
    async fn find_by_org_id(&self, org_id: &str) -> Result<Option<ManagedInstance>> {
        Ok(Some(ManagedInstance {
            id: format!("located-{org_id}"),
            platform_instance_id: Some(org_id.to_string()),
            instance_type: None,
            instance_url: None,
            control_instance: false,
            connection_id: None,
        }))
    }
}

#[tokio::test]
async fn test_custom_locator_replaces_scan() {
    let fixture = Fixture::new();
    let resolver = InstanceResolver::new(fixture.api()).with_locator(Arc::new(FixedLocator));

    let found = resolver.resolve_instance_for_org("00D7").await.unwrap();

    assert_eq!(found.unwrap().id, "located-00D7");
    assert!(fixture.hub.requests().is_empty());
}
