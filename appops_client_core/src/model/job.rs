//! Asynchronous job records

use crate::error::{JobError, Result, ValidationError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

const COMPLETED: &str = "COMPLETED";

/// Remote job status
///
/// Only `COMPLETED` is terminal; every other value is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Completed,
    Pending(String),
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        if value == COMPLETED {
            Self::Completed
        } else {
            Self::Pending(value)
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Completed => COMPLETED.to_string(),
            JobStatus::Pending(value) => value,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str(COMPLETED),
            Self::Pending(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Empty when the response carried no ID
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default)]
    pub status: Option<JobStatus>,
    /// Usually a string holding encoded JSON
    #[serde(default)]
    pub result_data: Option<Value>,
    #[serde(default)]
    pub started: Option<String>,
    #[serde(default)]
    pub finished: Option<String>,
    #[serde(default)]
    pub operation_type: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub managed_instance_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub current_step: Option<String>,
    #[serde(default)]
    pub is_blocking: Option<bool>,
}

impl Job {
    pub fn is_completed(&self) -> bool {
        matches!(self.status, Some(JobStatus::Completed))
    }

    /// Decode `resultData` into a typed value
    pub fn result<T: DeserializeOwned>(&self) -> Result<T> {
        let data = match &self.result_data {
            None | Some(Value::Null) => {
                return Err(JobError::invalid_result(&self.id, "missing resultData").into());
            }
            Some(data) => data,
        };

        let decoded = match data {
            Value::String(encoded) => serde_json::from_str(encoded),
            other => serde_json::from_value(other.clone()),
        };

        decoded.map_err(|e| JobError::invalid_result(&self.id, &e.to_string()).into())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Envelope returned by job submission and `GET /jobs/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Jobs {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

/// The fixed set of job-producing operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOperation {
    Manage,
    Checkin,
    Checkout,
    Deploy,
}

impl JobOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manage => "manage",
            Self::Checkin => "checkin",
            Self::Checkout => "checkout",
            Self::Deploy => "deploy",
        }
    }

    /// Submission path relative to the API base path
    ///
    /// Manage posts to the collection; the rest post under the target
    /// instance and need its ID.
    pub fn path(&self, instance_id: Option<&str>) -> Result<String> {
        match (self, instance_id) {
            (Self::Manage, _) => Ok("/instances".to_string()),
            (op, Some(id)) if !id.is_empty() => Ok(format!("/instances/{id}/{}", op.as_str())),
            (op, _) => Err(ValidationError::precondition(&format!(
                "A managed instance ID is required to {op}"
            ))
            .into()),
        }
    }
}

impl fmt::Display for JobOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
