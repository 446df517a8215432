//! Identifier resolution error types

use crate::model::EntityKind;
use thiserror::Error;

/// An identifier did not resolve to a record
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// No record of the given object matched the identifier
    #[error("No {object} record found matching '{identifier}'")]
    NotFound { object: String, identifier: String },

    /// No data set, deployment plan or connection matched the identifier
    #[error("No {kind} found matching '{identifier}'")]
    EntityNotFound { identifier: String, kind: EntityKind },

    /// The org is not under management
    #[error("No managed instance found for org {org_id}")]
    InstanceNotFound { org_id: String },

    /// The control-plane org has no managed instance of its own
    #[error("No managed instance found for the control org {org_id}")]
    NoControlInstance { org_id: String },
}

impl ResolutionError {
    /// Create a generic not-found error
    pub fn not_found(object: &str, identifier: &str) -> Self {
        Self::NotFound {
            object: object.to_string(),
            identifier: identifier.to_string(),
        }
    }

    /// Create an entity-not-found error for a specific entity kind
    pub fn entity_not_found(identifier: &str, kind: EntityKind) -> Self {
        Self::EntityNotFound {
            identifier: identifier.to_string(),
            kind,
        }
    }

    /// Create an instance-not-found error
    pub fn instance_not_found(org_id: &str) -> Self {
        Self::InstanceNotFound {
            org_id: org_id.to_string(),
        }
    }

    /// Create a missing-control-instance error
    pub fn no_control_instance(org_id: &str) -> Self {
        Self::NoControlInstance {
            org_id: org_id.to_string(),
        }
    }
}
