use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of record that can be named loosely by ID or by Name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    DataSet,
    DeploymentPlan,
    Connection,
}

impl EntityKind {
    /// Backing object name in the record store
    pub fn object_name(&self) -> &'static str {
        match self {
            Self::DataSet => "PDRI__DataSet__c",
            Self::DeploymentPlan => "PDRI__Deployment_Plan__c",
            Self::Connection => super::connection::OBJECT,
        }
    }

    /// Whether lookups filter on the active flag
    pub fn active_only(&self) -> bool {
        match self {
            Self::DataSet | Self::Connection => true,
            Self::DeploymentPlan => false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::DataSet => "data set",
            Self::DeploymentPlan => "deployment plan",
            Self::Connection => "connection",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
