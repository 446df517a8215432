//! Transport to the control-plane org
//!
//! Everything the core knows about the remote side goes through [`HubClient`]:
//! record queries and writes on the generic object store, and calls to the
//! control-plane REST API.

pub mod query;
pub mod rest;

pub use query::{Condition, FieldValue, RecordQuery};
pub use rest::RestHubClient;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// A row returned by a record query
pub type Record = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A call to the control-plane API, relative to its base path
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
            headers: Vec::new(),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Client bound to the control-plane org
#[async_trait]
pub trait HubClient: Send + Sync {
    /// Organization ID of the control-plane org itself
    fn org_id(&self) -> &str;

    /// Run a record query
    async fn query(&self, query: &RecordQuery) -> Result<Vec<Record>>;

    /// Create a record and return its ID
    async fn insert(&self, object: &str, fields: Value) -> Result<String>;

    /// Update fields on an existing record
    async fn update(&self, object: &str, id: &str, fields: Value) -> Result<()>;

    /// Call the control-plane API; `None` when the response has no body
    async fn request(&self, request: ApiRequest) -> Result<Option<Value>>;
}
