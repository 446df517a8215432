//! Org sessions backed by stored config profiles

use crate::config::OrgProfile;
use appops_client_core::error::{RemoteError, ValidationError};
use appops_client_core::{OrgSession, Result};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use std::sync::{Arc, Mutex};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// An [`OrgSession`] built from an [`OrgProfile`]
///
/// The access token can be renewed with the OAuth refresh-token grant when the
/// profile carries both `refresh_token` and `client_id`.
pub struct ProfileSession {
    profile: OrgProfile,
    token: Mutex<String>,
    http: reqwest::Client,
}

impl ProfileSession {
    pub fn new(profile: OrgProfile) -> Self {
        let token = Mutex::new(profile.access_token.clone());
        Self {
            profile,
            token,
            http: reqwest::Client::new(),
        }
    }

    pub fn shared(profile: &OrgProfile) -> Arc<dyn OrgSession> {
        Arc::new(Self::new(profile.clone()))
    }

    fn token_url(&self) -> String {
        format!(
            "{}/services/oauth2/token",
            self.profile.login_url.trim_end_matches('/')
        )
    }

    fn set_token(&self, token: String) {
        match self.token.lock() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }
}

#[async_trait]
impl OrgSession for ProfileSession {
    fn org_id(&self) -> &str {
        &self.profile.org_id
    }

    fn username(&self) -> &str {
        &self.profile.username
    }

    fn user_id(&self) -> Option<&str> {
        self.profile.user_id.as_deref()
    }

    fn instance_url(&self) -> &str {
        &self.profile.instance_url
    }

    fn access_token(&self) -> String {
        match self.token.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    async fn refresh(&self) -> Result<()> {
        let (Some(refresh_token), Some(client_id)) =
            (&self.profile.refresh_token, &self.profile.client_id)
        else {
            return Err(ValidationError::invalid_configuration(&format!(
                "org {} has no refresh_token/client_id configured",
                self.profile.org_id
            ))
            .into());
        };

        debug!("Refreshing access token for org {}", self.profile.org_id);
        let response = self
            .http
            .post(self.token_url())
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
                ("client_id", client_id.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::rejected(status.as_u16(), &body).into());
        }

        let token: TokenResponse = response.json().await?;
        self.set_token(token.access_token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appops_client_core::Error;

    fn profile() -> OrgProfile {
        OrgProfile {
            instance_url: "https://tenant.example.com/".to_string(),
            access_token: "stored".to_string(),
            org_id: "00D1".to_string(),
            username: "ops@example.com".to_string(),
            user_id: Some("005A".to_string()),
            org_type: "Sandbox".to_string(),
            refresh_token: None,
            client_id: None,
            login_url: "https://test.salesforce.com/".to_string(),
        }
    }

    #[test]
    fn test_identity_comes_from_profile() {
        let session = ProfileSession::new(profile());

        assert_eq!(session.org_id(), "00D1");
        assert_eq!(session.username(), "ops@example.com");
        assert_eq!(session.user_id(), Some("005A"));
        assert_eq!(session.access_token(), "stored");
        assert_eq!(
            session.token_url(),
            "https://test.salesforce.com/services/oauth2/token"
        );
    }

    #[tokio::test]
    async fn test_refresh_without_credentials_fails() {
        let session = ProfileSession::new(profile());

        let result = session.refresh().await;

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(session.access_token(), "stored");
    }

    #[test]
    fn test_set_token_replaces_access_token() {
        let session = ProfileSession::new(profile());
        session.set_token("fresh".to_string());
        assert_eq!(session.access_token(), "fresh");
    }
}
