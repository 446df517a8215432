//! Connection resolution
//!
//! A connection record holds the access token the control plane uses to reach
//! a tenant org. At most one active connection per organization ID is treated
//! as canonical: the most recently modified one.

use crate::error::{RemoteError, ResolutionError, Result};
use crate::hub::{HubClient, RecordQuery};
use crate::identifier::RecordIdentifier;
use crate::model::connection::{self, Connection, NewConnection};
use crate::session::OrgSession;
use log::{debug, info};
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct ConnectionResolver {
    hub: Arc<dyn HubClient>,
}

impl ConnectionResolver {
    pub fn new(hub: Arc<dyn HubClient>) -> Self {
        Self { hub }
    }

    /// Return the ID of the org's connection, creating it when absent
    ///
    /// Issues exactly one write: an in-place token update when a connection
    /// exists, otherwise an insert.
    pub async fn resolve_or_create(
        &self,
        session: &dyn OrgSession,
        label: Option<&str>,
    ) -> Result<String> {
        match self.find_active_for_org(session.org_id()).await? {
            Some(existing) => {
                debug!(
                    "Found connection {} for org {}",
                    existing.id,
                    session.org_id()
                );
                self.refresh_token(&existing.id, session).await?;
                Ok(existing.id)
            }
            None => self.create(session, label).await,
        }
    }

    /// Most recently modified active connection for an organization ID
    pub async fn find_active_for_org(&self, org_id: &str) -> Result<Option<Connection>> {
        let query = RecordQuery::select(connection::OBJECT, connection::SELECT_FIELDS)
            .where_eq(connection::FIELD_ACTIVE, true)
            .where_eq(connection::FIELD_ORGANIZATION_ID, org_id)
            .order_by_desc(connection::FIELD_LAST_MODIFIED)
            .limit(1);

        first_row(self.hub.query(&query).await?)
    }

    /// Resolve an active connection by record ID or by name
    pub async fn resolve_by_identifier(&self, identifier: &str) -> Result<Connection> {
        let identifier = RecordIdentifier::classify(identifier);
        let query = RecordQuery::select(connection::OBJECT, connection::SELECT_FIELDS)
            .where_eq(connection::FIELD_ACTIVE, true)
            .where_eq(identifier.field(), identifier.value())
            .order_by_desc(connection::FIELD_LAST_MODIFIED)
            .limit(1);

        first_row(self.hub.query(&query).await?)?
            .ok_or_else(|| ResolutionError::not_found("connection", identifier.value()).into())
    }

    /// Copy the session's current access token onto a connection record
    pub async fn refresh_token(&self, connection_id: &str, session: &dyn OrgSession) -> Result<()> {
        debug!("Updating access token on connection {connection_id}");
        let mut fields = Map::new();
        fields.insert(
            connection::FIELD_ACCESS_TOKEN.to_string(),
            Value::String(session.access_token()),
        );

        self.hub
            .update(connection::OBJECT, connection_id, Value::Object(fields))
            .await
    }

    /// Insert a new active connection populated from the session
    pub async fn create(&self, session: &dyn OrgSession, label: Option<&str>) -> Result<String> {
        let record = NewConnection::new(
            label,
            session.org_id(),
            session.username(),
            session.user_id(),
            session.instance_url(),
            session.access_token(),
        );
        let fields = serde_json::to_value(&record)
            .map_err(|e| RemoteError::write_rejected(connection::OBJECT, e.to_string()))?;

        let id = self.hub.insert(connection::OBJECT, fields).await?;
        info!("Created connection {} for org {}", id, session.org_id());
        Ok(id)
    }
}

fn first_row(rows: Vec<crate::hub::Record>) -> Result<Option<Connection>> {
    match rows.into_iter().next() {
        Some(row) => Ok(Some(serde_json::from_value(Value::Object(row))?)),
        None => Ok(None),
    }
}
