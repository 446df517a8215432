//! JSON builders for control-plane payloads

use crate::mocks::MockResponse;
use serde_json::{Value, json};

/// A `GET /instances` entry without a connection
pub fn instance_json(org_id: &str, instance_id: &str) -> Value {
    json!({
        "platformInstanceId": org_id,
        "id": instance_id,
        "controlInstance": false,
    })
}

/// A `GET /instances` entry backed by a connection record
pub fn instance_with_connection(org_id: &str, instance_id: &str, connection_id: &str) -> Value {
    json!({
        "platformInstanceId": org_id,
        "id": instance_id,
        "controlInstance": false,
        "connectionId": connection_id,
        "instanceType": "Sandbox",
        "instanceUrl": format!("https://{}.example.com", org_id.to_lowercase()),
    })
}

/// The control org's own instance
pub fn control_instance(org_id: &str, instance_id: &str) -> Value {
    json!({
        "platformInstanceId": org_id,
        "id": instance_id,
        "controlInstance": true,
    })
}

/// An active connection record for an org
pub fn connection_record(org_id: &str, name: &str) -> Value {
    json!({
        "Name": name,
        "PDRI__Active__c": true,
        "PDRI__OrganizationId__c": org_id,
        "PDRI__Org_Type__c": "Sandbox",
        "PDRI__Access_Token__c": "stale-token",
    })
}

/// An active data set or plan record with a display name
pub fn named_record(name: &str) -> Value {
    json!({ "Name": name, "PDRI__Active__c": true })
}

pub fn job_pending(job_id: &str) -> Value {
    json!({ "id": job_id, "status": "IN_PROGRESS" })
}

/// A completed job whose `resultData` is `result` encoded as a string
pub fn job_completed(job_id: &str, result: &Value) -> Value {
    json!({
        "id": job_id,
        "status": "COMPLETED",
        "resultData": result.to_string(),
        "started": "2024-01-01T00:00:00.000Z",
        "finished": "2024-01-01T00:00:04.000Z",
    })
}

pub fn jobs_response(jobs: Vec<Value>) -> Value {
    json!({ "jobs": jobs })
}

/// Poll response reporting the job as still running
pub fn pending_poll(job_id: &str) -> MockResponse {
    MockResponse::Json(jobs_response(vec![job_pending(job_id)]))
}

/// String-encoded poll response reporting the job as completed
pub fn completed_poll(job_id: &str, result: &Value) -> MockResponse {
    MockResponse::Text(jobs_response(vec![job_completed(job_id, result)]).to_string())
}
