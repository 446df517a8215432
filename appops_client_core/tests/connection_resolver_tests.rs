//! Connection resolution against the in-memory control plane

mod common;

use appops_client_core::error::{RemoteError, ResolutionError};
use appops_client_core::model::connection::OBJECT;
use appops_client_core::{ConnectionResolver, Error};
use appops_test_utils::{MockOrgSession, builders};
use common::Fixture;

fn resolver(fixture: &Fixture) -> ConnectionResolver {
    ConnectionResolver::new(fixture.dyn_hub())
}

#[tokio::test]
async fn test_existing_connection_is_updated_in_place() {
    // Arrange
    let fixture = Fixture::new();
    let existing = fixture
        .hub
        .add_record(OBJECT, builders::connection_record("00D1", "Tenant One"));
    let session = MockOrgSession::new("00D1").with_token("fresh-token");

    // Act
    let id = resolver(&fixture)
        .resolve_or_create(&session, None)
        .await
        .unwrap();

    // Assert
    assert_eq!(id, existing);
    assert_eq!(fixture.hub.update_count(), 1);
    assert_eq!(fixture.hub.insert_count(), 0);

    let (object, updated_id, fields) = &fixture.hub.updates()[0];
    assert_eq!(object, OBJECT);
    assert_eq!(updated_id, &existing);
    assert_eq!(fields["PDRI__Access_Token__c"], "fresh-token");
}

#[tokio::test]
async fn test_missing_connection_is_inserted() {
    // Arrange
    let fixture = Fixture::new();
    let session = MockOrgSession::new("00D000000000007").with_username("ops@tenant.com");

    // Act
    let id = resolver(&fixture)
        .resolve_or_create(&session, None)
        .await
        .unwrap();

    // Assert
    assert_eq!(fixture.hub.insert_count(), 1);
    assert_eq!(fixture.hub.update_count(), 0);

    let stored = fixture.hub.records(OBJECT);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["Id"], id.as_str());

    let (_, fields) = &fixture.hub.inserts()[0];
    assert_eq!(fields["Name"], "ops@tenant.com 00D000000000007");
    assert_eq!(fields["PDRI__Org_Type__c"], "Sandbox");
    assert_eq!(fields["PDRI__Active__c"], true);
    assert_eq!(
        fields["PDRI__Instance_URL__c"],
        "https://00d000000000007.example.com"
    );
    assert_eq!(fields["PDRI__Access_Token__c"], "token-0");
}

#[tokio::test]
async fn test_label_names_new_connection() {
    let fixture = Fixture::new();
    let session = MockOrgSession::new("00D1");

    resolver(&fixture)
        .resolve_or_create(&session, Some("UAT Sandbox"))
        .await
        .unwrap();

    let (_, fields) = &fixture.hub.inserts()[0];
    assert_eq!(fields["Name"], "UAT Sandbox");
}

#[tokio::test]
async fn test_most_recently_modified_connection_wins() {
    // Arrange
    let fixture = Fixture::new();
    let _older = fixture
        .hub
        .add_record(OBJECT, builders::connection_record("00D1", "Old"));
    let newer = fixture
        .hub
        .add_record(OBJECT, builders::connection_record("00D1", "New"));
    let session = MockOrgSession::new("00D1");

    // Act
    let id = resolver(&fixture)
        .resolve_or_create(&session, None)
        .await
        .unwrap();

    // Assert
    assert_eq!(id, newer);
    assert_eq!(fixture.hub.update_count(), 1);
}

#[tokio::test]
async fn test_inactive_connection_is_ignored() {
    let fixture = Fixture::new();
    let mut record = builders::connection_record("00D1", "Retired");
    record["PDRI__Active__c"] = serde_json::Value::Bool(false);
    fixture.hub.add_record(OBJECT, record);
    let session = MockOrgSession::new("00D1");

    resolver(&fixture)
        .resolve_or_create(&session, None)
        .await
        .unwrap();

    assert_eq!(fixture.hub.insert_count(), 1);
    assert_eq!(fixture.hub.update_count(), 0);
}

#[tokio::test]
async fn test_rejected_write_surfaces_as_remote_write_error() {
    let fixture = Fixture::new();
    fixture.hub.reject_writes();
    let session = MockOrgSession::new("00D1");

    let result = resolver(&fixture).resolve_or_create(&session, None).await;

    assert!(matches!(
        result,
        Err(Error::Remote(RemoteError::WriteRejected { .. }))
    ));
}

#[tokio::test]
async fn test_resolve_by_name_and_by_id() {
    // Arrange
    let fixture = Fixture::new();
    let id = fixture
        .hub
        .add_record(OBJECT, builders::connection_record("00D1", "UAT Sandbox Connection"));
    let resolver = resolver(&fixture);

    // Act
    let by_name = resolver
        .resolve_by_identifier("UAT Sandbox Connection")
        .await
        .unwrap();
    let by_id = resolver.resolve_by_identifier(&id).await.unwrap();

    // Assert
    assert_eq!(by_name.id, id);
    assert_eq!(by_id.name.as_deref(), Some("UAT Sandbox Connection"));

    let queries = fixture.hub.queries();
    assert!(queries[0].condition("Name").is_some());
    assert!(queries[1].condition("Id").is_some());
}

#[tokio::test]
async fn test_unknown_connection_is_not_found() {
    let fixture = Fixture::new();

    let result = resolver(&fixture).resolve_by_identifier("Nope").await;

    match result {
        Err(Error::Resolution(ResolutionError::NotFound { identifier, .. })) => {
            assert_eq!(identifier, "Nope")
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}
