//! Typed endpoints of the control-plane REST API
//!
//! Responses may arrive as JSON objects or as JSON strings holding encoded
//! JSON; both are decoded here so callers only see typed values.

use crate::error::{RemoteError, Result};
use crate::hub::{ApiRequest, HubClient};
use crate::model::{Jobs, ManagedInstances};
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub const VCS_TOKEN_HEADER: &str = "vcs-access-token";

#[derive(Clone)]
pub struct ControlPlaneApi {
    hub: Arc<dyn HubClient>,
}

impl ControlPlaneApi {
    pub fn new(hub: Arc<dyn HubClient>) -> Self {
        Self { hub }
    }

    pub fn hub(&self) -> &Arc<dyn HubClient> {
        &self.hub
    }

    /// `GET /instances`
    pub async fn list_instances(&self) -> Result<ManagedInstances> {
        let body = self.hub.request(ApiRequest::get("/instances")).await?;
        match body {
            Some(body) => decode_body(body, "GET /instances"),
            None => Ok(ManagedInstances::default()),
        }
    }

    /// POST a job-producing request and decode the job envelope
    pub async fn submit(
        &self,
        path: &str,
        body: Value,
        vcs_token: Option<&str>,
    ) -> Result<Jobs> {
        let mut request = ApiRequest::post(path, body);
        if let Some(token) = vcs_token {
            request = request.with_header(VCS_TOKEN_HEADER, token);
        }

        debug!("Submitting job request to {path}");
        match self.hub.request(request).await? {
            Some(body) => decode_body(body, path),
            None => Ok(Jobs::default()),
        }
    }

    /// `GET /jobs/{job_id}`
    pub async fn get_jobs(&self, job_id: &str) -> Result<Jobs> {
        let path = format!("/jobs/{job_id}");
        match self.hub.request(ApiRequest::get(path.as_str())).await? {
            Some(body) => decode_body(body, &path),
            None => Err(RemoteError::decode(&path, "empty response").into()),
        }
    }

    /// `DELETE /instances/{instance_id}`
    pub async fn delete_instance(&self, instance_id: &str) -> Result<()> {
        self.hub
            .request(ApiRequest::delete(format!("/instances/{instance_id}")))
            .await?;
        Ok(())
    }
}

/// Decode a response body that may be a string holding encoded JSON
pub fn decode_body<T: DeserializeOwned>(body: Value, context: &str) -> Result<T> {
    let decoded = match body {
        Value::String(encoded) => serde_json::from_str(&encoded),
        other => serde_json::from_value(other),
    };
    decoded.map_err(|e| RemoteError::decode(context, &e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_object_body() {
        let jobs: Jobs = decode_body(json!({"jobs": [{"id": "job-1"}]}), "test").unwrap();
        assert_eq!(jobs.jobs[0].id, "job-1");
    }

    #[test]
    fn test_decode_string_body() {
        let jobs: Jobs =
            decode_body(Value::String(r#"{"jobs":[{"id":"job-2"}]}"#.to_string()), "test").unwrap();
        assert_eq!(jobs.jobs[0].id, "job-2");
    }

    #[test]
    fn test_decode_failure_names_context() {
        let result: Result<Jobs> = decode_body(Value::String("<html>".to_string()), "/jobs/x");
        let message = result.unwrap_err().to_string();
        assert!(message.contains("/jobs/x"));
    }
}
