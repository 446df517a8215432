//! In-memory control plane for testing

use appops_client_core::error::RemoteError;
use appops_client_core::hub::{ApiRequest, FieldValue, HubClient, Method, Record, RecordQuery};
use appops_client_core::{Error, Result};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// A scripted response to a control-plane API call
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Body returned as a JSON value
    Json(Value),
    /// Body returned as a raw string (string-encoded JSON or garbage)
    Text(String),
    /// Request rejected with the given HTTP status
    Failure(u16),
    /// Success with no body
    Empty,
}

impl MockResponse {
    fn into_result(self) -> Result<Option<Value>> {
        match self {
            Self::Json(value) => Ok(Some(value)),
            Self::Text(text) => Ok(Some(Value::String(text))),
            Self::Failure(status) => Err(RemoteError::rejected(status, "mock failure").into()),
            Self::Empty => Ok(None),
        }
    }
}

/// Mock implementation of [`HubClient`]
///
/// Records live in an in-memory store keyed by object name and are queried
/// structurally: equality conditions, descending sort, limit. Every record
/// gets an 18 character ID and a `LastModifiedDate` from a monotonic clock,
/// so later writes sort first.
///
/// # Examples
///
/// ```rust,no_run
/// use appops_test_utils::{MockHubClient, builders};
/// use std::sync::Arc;
///
/// let hub = Arc::new(MockHubClient::new("00DHUB000000001"));
/// hub.add_instance(builders::instance_json("00D1", "inst-1"));
/// hub.script_submission("job-9");
/// hub.script_job_polls("job-9", vec![builders::pending_poll("job-9")]);
/// ```
pub struct MockHubClient {
    org_id: String,
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    records: HashMap<String, Vec<Record>>,
    instances: Vec<Value>,
    submissions: VecDeque<MockResponse>,
    job_polls: HashMap<String, VecDeque<MockResponse>>,
    poll_counts: HashMap<String, u32>,
    reject_writes: bool,
    next_id: u32,
    next_job: u32,
    clock: u32,
    inserts: Vec<(String, Value)>,
    updates: Vec<(String, String, Value)>,
    requests: Vec<ApiRequest>,
    queries: Vec<RecordQuery>,
}

impl MockState {
    fn tick(&mut self) -> String {
        self.clock += 1;
        format!(
            "2024-01-01T00:{:02}:{:02}.000Z",
            (self.clock / 60) % 60,
            self.clock % 60
        )
    }

    fn generate_id(&mut self) -> String {
        self.next_id += 1;
        format!("a00{:015}", self.next_id)
    }

    fn store(&mut self, object: &str, fields: Value) -> String {
        let mut record = match fields {
            Value::Object(map) => map,
            _ => Record::new(),
        };
        let id = match record.get("Id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => self.generate_id(),
        };
        record.insert("Id".to_string(), Value::String(id.clone()));
        let modified = self.tick();
        record.insert("LastModifiedDate".to_string(), Value::String(modified));

        self.records
            .entry(object.to_string())
            .or_default()
            .push(record);
        id
    }

    fn submission(&mut self) -> MockResponse {
        if let Some(response) = self.submissions.pop_front() {
            return response;
        }
        self.next_job += 1;
        let job_id = format!("job-{}", self.next_job);
        MockResponse::Text(json!({"jobs": [{"id": job_id, "status": "SUBMITTED"}]}).to_string())
    }

    fn poll(&mut self, job_id: &str) -> MockResponse {
        *self.poll_counts.entry(job_id.to_string()).or_default() += 1;

        match self.job_polls.get_mut(job_id) {
            Some(script) if script.len() > 1 => script.pop_front().unwrap_or(MockResponse::Empty),
            Some(script) => script.front().cloned().unwrap_or(MockResponse::Empty),
            None => MockResponse::Json(json!({"jobs": [{"id": job_id, "status": "IN_PROGRESS"}]})),
        }
    }
}

impl MockHubClient {
    /// Create a mock bound to the given control org ID
    pub fn new(org_id: &str) -> Self {
        Self {
            org_id: org_id.to_string(),
            state: Mutex::new(MockState::default()),
        }
    }

    /// Seed a record and return its ID
    pub fn add_record(&self, object: &str, fields: Value) -> String {
        self.state.lock().unwrap().store(object, fields)
    }

    /// All records stored for an object, in insertion order
    pub fn records(&self, object: &str) -> Vec<Record> {
        self.state
            .lock()
            .unwrap()
            .records
            .get(object)
            .cloned()
            .unwrap_or_default()
    }

    /// Seed an entry in the `GET /instances` list
    pub fn add_instance(&self, instance: Value) {
        self.state.lock().unwrap().instances.push(instance);
    }

    pub fn instances(&self) -> Vec<Value> {
        self.state.lock().unwrap().instances.clone()
    }

    /// Make every insert and update fail
    pub fn reject_writes(&self) {
        self.state.lock().unwrap().reject_writes = true;
    }

    /// Return a string-encoded envelope with this job ID for the next submission
    pub fn script_submission(&self, job_id: &str) {
        let body = json!({"jobs": [{"id": job_id, "status": "SUBMITTED"}]}).to_string();
        self.script_submission_response(MockResponse::Text(body));
    }

    /// Use an arbitrary response for the next submission
    pub fn script_submission_response(&self, response: MockResponse) {
        self.state
            .lock()
            .unwrap()
            .submissions
            .push_back(response);
    }

    /// Script the responses to successive polls of a job
    ///
    /// Once exhausted the last response repeats. Unscripted jobs stay pending.
    pub fn script_job_polls(&self, job_id: &str, responses: Vec<MockResponse>) {
        self.state
            .lock()
            .unwrap()
            .job_polls
            .insert(job_id.to_string(), responses.into());
    }

    pub fn insert_count(&self) -> usize {
        self.state.lock().unwrap().inserts.len()
    }

    pub fn update_count(&self) -> usize {
        self.state.lock().unwrap().updates.len()
    }

    pub fn inserts(&self) -> Vec<(String, Value)> {
        self.state.lock().unwrap().inserts.clone()
    }

    pub fn updates(&self) -> Vec<(String, String, Value)> {
        self.state.lock().unwrap().updates.clone()
    }

    /// Number of times `GET /jobs/{job_id}` was called
    pub fn poll_count(&self, job_id: &str) -> u32 {
        self.state
            .lock()
            .unwrap()
            .poll_counts
            .get(job_id)
            .copied()
            .unwrap_or(0)
    }

    /// Every API request received, in order
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// API requests that submitted work (any POST)
    pub fn submissions(&self) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == Method::Post)
            .collect()
    }

    /// Every record query received, in order
    pub fn queries(&self) -> Vec<RecordQuery> {
        self.state.lock().unwrap().queries.clone()
    }
}

fn matches(record: &Record, field: &str, expected: &FieldValue) -> bool {
    match (record.get(field), expected) {
        (Some(Value::String(actual)), FieldValue::Text(expected)) => actual == expected,
        (Some(Value::Bool(actual)), FieldValue::Bool(expected)) => actual == expected,
        _ => false,
    }
}

fn sort_key(record: &Record, field: &str) -> String {
    record
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl HubClient for MockHubClient {
    fn org_id(&self) -> &str {
        &self.org_id
    }

    async fn query(&self, query: &RecordQuery) -> Result<Vec<Record>> {
        let mut state = self.state.lock().unwrap();
        state.queries.push(query.clone());

        let mut rows: Vec<Record> = state
            .records
            .get(&query.object)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| {
                        query
                            .conditions
                            .iter()
                            .all(|c| matches(r, &c.field, &c.value))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(field) = &query.order_by_desc {
            rows.sort_by_key(|r| sort_key(r, field));
            rows.reverse();
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        Ok(rows)
    }

    async fn insert(&self, object: &str, fields: Value) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        if state.reject_writes {
            return Err(RemoteError::write_rejected(object, "mock rejected insert").into());
        }

        state.inserts.push((object.to_string(), fields.clone()));
        Ok(state.store(object, fields))
    }

    async fn update(&self, object: &str, id: &str, fields: Value) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.reject_writes {
            return Err(RemoteError::write_rejected(object, "mock rejected update").into());
        }

        state
            .updates
            .push((object.to_string(), id.to_string(), fields.clone()));
        let modified = state.tick();

        let record = state
            .records
            .get_mut(object)
            .and_then(|records| {
                records
                    .iter_mut()
                    .find(|r| r.get("Id").and_then(Value::as_str) == Some(id))
            })
            .ok_or_else(|| -> Error {
                RemoteError::write_rejected(object, format!("no record {id}")).into()
            })?;

        if let Value::Object(fields) = fields {
            record.extend(fields);
        }
        record.insert("LastModifiedDate".to_string(), Value::String(modified));
        Ok(())
    }

    async fn request(&self, request: ApiRequest) -> Result<Option<Value>> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        let segments: Vec<&str> = request
            .path
            .trim_matches('/')
            .split('/')
            .collect();

        let response = match (request.method, segments.as_slice()) {
            (Method::Get, ["instances"]) => {
                MockResponse::Json(json!({ "instances": state.instances }))
            }
            (Method::Post, ["instances"]) | (Method::Post, ["instances", _, _]) => {
                state.submission()
            }
            (Method::Delete, ["instances", id]) => {
                state
                    .instances
                    .retain(|i| i.get("id").and_then(Value::as_str) != Some(*id));
                MockResponse::Empty
            }
            (Method::Get, ["jobs", job_id]) => state.poll(job_id),
            _ => MockResponse::Failure(404),
        };

        response.into_result()
    }
}
