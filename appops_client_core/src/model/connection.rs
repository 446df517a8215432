//! Connection credential records stored on the control plane

use serde::{Deserialize, Serialize};
use std::fmt;

pub const OBJECT: &str = "PDRI__Connection__c";

pub const FIELD_ID: &str = "Id";
pub const FIELD_NAME: &str = "Name";
pub const FIELD_ACTIVE: &str = "PDRI__Active__c";
pub const FIELD_ORGANIZATION_ID: &str = "PDRI__OrganizationId__c";
pub const FIELD_ACCESS_TOKEN: &str = "PDRI__Access_Token__c";
pub const FIELD_ORG_TYPE: &str = "PDRI__Org_Type__c";
pub const FIELD_INSTANCE_URL: &str = "PDRI__Instance_URL__c";
pub const FIELD_USER_ID: &str = "PDRI__User_Id__c";
pub const FIELD_USERNAME: &str = "PDRI__Username__c";
pub const FIELD_LAST_MODIFIED: &str = "LastModifiedDate";

/// Fields selected whenever a full connection is read back
pub const SELECT_FIELDS: &[&str] = &[
    FIELD_ID,
    FIELD_NAME,
    FIELD_ACTIVE,
    FIELD_ORGANIZATION_ID,
    FIELD_ORG_TYPE,
    FIELD_INSTANCE_URL,
    FIELD_USER_ID,
    FIELD_USERNAME,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrgType {
    #[default]
    Sandbox,
    Production,
}

impl fmt::Display for OrgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sandbox => f.write_str("Sandbox"),
            Self::Production => f.write_str("Production"),
        }
    }
}

/// A connection record as returned by a query
///
/// The access token is never selected back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "PDRI__Active__c", default)]
    pub active: Option<bool>,
    #[serde(rename = "PDRI__OrganizationId__c", default)]
    pub organization_id: Option<String>,
    #[serde(rename = "PDRI__Org_Type__c", default)]
    pub org_type: Option<String>,
    #[serde(rename = "PDRI__Instance_URL__c", default)]
    pub instance_url: Option<String>,
    #[serde(rename = "PDRI__User_Id__c", default)]
    pub user_id: Option<String>,
    #[serde(rename = "PDRI__Username__c", default)]
    pub username: Option<String>,
}

/// Field set written when a connection is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewConnection {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "PDRI__Active__c")]
    pub active: bool,
    #[serde(rename = "PDRI__OrganizationId__c")]
    pub organization_id: String,
    #[serde(rename = "PDRI__Access_Token__c")]
    pub access_token: String,
    #[serde(rename = "PDRI__Org_Type__c")]
    pub org_type: OrgType,
    #[serde(rename = "PDRI__Instance_URL__c")]
    pub instance_url: String,
    #[serde(rename = "PDRI__User_Id__c", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "PDRI__Username__c")]
    pub username: String,
}

impl NewConnection {
    /// Build the record for an org session
    ///
    /// Without a label the name is `"<username> <orgId>"`; a trailing `/` is
    /// stripped from the instance URL.
    pub fn new(
        label: Option<&str>,
        organization_id: &str,
        username: &str,
        user_id: Option<&str>,
        instance_url: &str,
        access_token: String,
    ) -> Self {
        let name = match label {
            Some(label) => label.to_string(),
            None => format!("{username} {organization_id}"),
        };

        Self {
            name,
            active: true,
            organization_id: organization_id.to_string(),
            access_token,
            org_type: OrgType::Sandbox,
            instance_url: instance_url.trim_end_matches('/').to_string(),
            user_id: user_id.map(str::to_string),
            username: username.to_string(),
        }
    }
}
