//! Authenticated org sessions
//!
//! Token acquisition lives outside the core. The core only reads the identity
//! of a session, copies its access token into connection records, and asks it
//! to refresh before long operations.

use crate::error::Result;
use async_trait::async_trait;
use log::{debug, warn};

/// An authenticated session to a tenant org
#[async_trait]
pub trait OrgSession: Send + Sync {
    /// Organization ID of the org
    fn org_id(&self) -> &str;

    fn username(&self) -> &str;

    fn user_id(&self) -> Option<&str>;

    fn instance_url(&self) -> &str;

    /// Current access token
    ///
    /// Returned by value so implementations can swap it during `refresh`.
    fn access_token(&self) -> String;

    /// Obtain a fresh access token
    async fn refresh(&self) -> Result<()>;
}

/// Refresh a session, logging and ignoring any failure
pub async fn refresh_best_effort(session: &dyn OrgSession) {
    match session.refresh().await {
        Ok(()) => debug!("Refreshed session for org {}", session.org_id()),
        Err(e) => warn!(
            "Could not refresh session for org {}: {}",
            session.org_id(),
            e
        ),
    }
}
