use serde::{Deserialize, Serialize};

/// A tenant org under central management
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedInstance {
    pub id: String,
    /// Organization ID of the backing tenant org
    #[serde(default)]
    pub platform_instance_id: Option<String>,
    #[serde(default)]
    pub instance_type: Option<String>,
    #[serde(default)]
    pub instance_url: Option<String>,
    #[serde(default)]
    pub control_instance: bool,
    #[serde(default)]
    pub connection_id: Option<String>,
}

/// Envelope returned by `GET /instances`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagedInstances {
    #[serde(default)]
    pub instances: Vec<ManagedInstance>,
}
