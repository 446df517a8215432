//! Mock org session for testing

use appops_client_core::error::ValidationError;
use appops_client_core::{OrgSession, Result};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Mock implementation of [`OrgSession`]
///
/// Each successful refresh swaps the access token for `token-<n>`.
pub struct MockOrgSession {
    org_id: String,
    username: String,
    user_id: Option<String>,
    instance_url: String,
    token: Mutex<String>,
    refreshes: AtomicU32,
    fail_refresh: AtomicBool,
}

impl MockOrgSession {
    pub fn new(org_id: &str) -> Self {
        Self {
            org_id: org_id.to_string(),
            username: format!("user@{}.example.com", org_id.to_lowercase()),
            user_id: Some("005000000000001AAA".to_string()),
            instance_url: format!("https://{}.example.com/", org_id.to_lowercase()),
            token: Mutex::new("token-0".to_string()),
            refreshes: AtomicU32::new(0),
            fail_refresh: AtomicBool::new(false),
        }
    }

    pub fn with_username(mut self, username: &str) -> Self {
        self.username = username.to_string();
        self
    }

    pub fn with_token(self, token: &str) -> Self {
        *self.token.lock().unwrap() = token.to_string();
        self
    }

    /// Make every refresh fail
    pub fn failing_refresh(self) -> Self {
        self.fail_refresh.store(true, Ordering::SeqCst);
        self
    }

    /// Number of refresh attempts, successful or not
    pub fn refresh_count(&self) -> u32 {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrgSession for MockOrgSession {
    fn org_id(&self) -> &str {
        &self.org_id
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    fn instance_url(&self) -> &str {
        &self.instance_url
    }

    fn access_token(&self) -> String {
        self.token.lock().unwrap().clone()
    }

    async fn refresh(&self) -> Result<()> {
        let attempt = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_refresh.load(Ordering::SeqCst) {
            return Err(ValidationError::invalid_configuration("mock refresh failure").into());
        }

        *self.token.lock().unwrap() = format!("token-{attempt}");
        Ok(())
    }
}
