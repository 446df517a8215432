//! Resolution of data sets, deployment plans and connections by ID or name

use crate::error::{ResolutionError, Result};
use crate::hub::{HubClient, RecordQuery};
use crate::identifier::RecordIdentifier;
use crate::model::EntityKind;
use crate::model::connection::{FIELD_ACTIVE, FIELD_ID, FIELD_LAST_MODIFIED, FIELD_NAME};
use log::debug;
use std::sync::Arc;

#[derive(Clone)]
pub struct EntityLookup {
    hub: Arc<dyn HubClient>,
}

impl EntityLookup {
    pub fn new(hub: Arc<dyn HubClient>) -> Self {
        Self { hub }
    }

    /// Build the lookup query for an identifier of the given kind
    pub fn query_for(identifier: &RecordIdentifier, kind: EntityKind) -> RecordQuery {
        let mut query = RecordQuery::select(kind.object_name(), &[FIELD_ID, FIELD_NAME]);
        if kind.active_only() {
            query = query.where_eq(FIELD_ACTIVE, true);
        }

        query
            .where_eq(identifier.field(), identifier.value())
            .order_by_desc(FIELD_LAST_MODIFIED)
            .limit(1)
    }

    /// Resolve an identifier to a record ID
    ///
    /// When several records share a name the most recently modified wins.
    pub async fn resolve_entity_id(&self, identifier: &str, kind: EntityKind) -> Result<String> {
        let classified = RecordIdentifier::classify(identifier);
        let query = Self::query_for(&classified, kind);

        let rows = self.hub.query(&query).await?;
        let id = rows
            .into_iter()
            .next()
            .and_then(|row| row.get(FIELD_ID).and_then(|v| v.as_str()).map(str::to_string))
            .ok_or_else(|| ResolutionError::entity_not_found(identifier, kind))?;

        debug!("Resolved {kind} '{identifier}' to {id}");
        Ok(id)
    }
}
