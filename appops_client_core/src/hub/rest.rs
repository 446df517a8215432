//! HTTP implementation of [`HubClient`] over `reqwest`

use super::{ApiRequest, HubClient, Method, Record, RecordQuery};
use crate::ClientConfig;
use crate::error::{RemoteError, Result};
use crate::session::OrgSession;
use async_trait::async_trait;
use log::{debug, trace};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    records: Vec<Record>,
}

#[derive(Debug, Deserialize)]
struct SaveResult {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<Value>,
}

/// Control-plane client authenticated as the hub org session
pub struct RestHubClient {
    http: Client,
    session: Arc<dyn OrgSession>,
    config: ClientConfig,
}

impl RestHubClient {
    pub fn new(session: Arc<dyn OrgSession>, config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("appops/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            session,
            config,
        })
    }

    fn instance_url(&self) -> &str {
        self.session.instance_url().trim_end_matches('/')
    }

    fn data_url(&self, suffix: &str) -> String {
        format!(
            "{}/services/data/v{}{}",
            self.instance_url(),
            self.config.data_api_version,
            suffix
        )
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.instance_url(), self.config.api_base_path, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(self.session.access_token())
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = self.authorized(builder).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::rejected(status.as_u16(), &body).into())
    }
}

#[async_trait]
impl HubClient for RestHubClient {
    fn org_id(&self) -> &str {
        self.session.org_id()
    }

    async fn query(&self, query: &RecordQuery) -> Result<Vec<Record>> {
        let soql = query.to_soql();
        debug!("Query: {soql}");

        let builder = self
            .http
            .get(self.data_url("/query"))
            .query(&[("q", soql.as_str())]);
        let response: QueryResponse = self.send(builder).await?.json().await?;

        trace!("Query returned {} records", response.records.len());
        Ok(response.records)
    }

    async fn insert(&self, object: &str, fields: Value) -> Result<String> {
        let builder = self
            .http
            .post(self.data_url(&format!("/sobjects/{object}")))
            .json(&fields);

        let result: SaveResult = match self.send(builder).await {
            Ok(response) => response.json().await?,
            Err(e) => return Err(RemoteError::write_rejected(object, e.to_string()).into()),
        };

        match result.id {
            Some(id) if result.success => {
                debug!("Created {object} record {id}");
                Ok(id)
            }
            _ => Err(RemoteError::write_rejected(object, format!("{:?}", result.errors)).into()),
        }
    }

    async fn update(&self, object: &str, id: &str, fields: Value) -> Result<()> {
        let builder = self
            .http
            .patch(self.data_url(&format!("/sobjects/{object}/{id}")))
            .json(&fields);

        self.send(builder)
            .await
            .map_err(|e| RemoteError::write_rejected(object, e.to_string()))?;

        debug!("Updated {object} record {id}");
        Ok(())
    }

    async fn request(&self, request: ApiRequest) -> Result<Option<Value>> {
        let url = self.api_url(&request.path);
        debug!("{} {}", request.method, url);

        let mut builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Delete => self.http.delete(&url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let text = self.send(builder).await?.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&text)?))
    }
}

