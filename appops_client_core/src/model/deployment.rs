//! Request bodies for job-producing endpoints

use serde::Serialize;
use serde_json::{Map, Value};

/// `POST /instances`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageRequest {
    pub platform_instance: PlatformInstanceRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<VersioningOptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformInstanceRef {
    pub platform_instance_id: String,
    pub connection_id: String,
}

/// Version control settings applied when an instance is first managed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersioningOptions {
    pub checkin: bool,
    pub checkout: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
}

impl VersioningOptions {
    /// Enable both directions, as the manage command does with versioning on
    pub fn enabled(commit_message: Option<String>) -> Self {
        Self {
            checkin: true,
            checkout: true,
            commit_message,
        }
    }
}

/// `POST /instances/{id}/checkin`
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_plan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    pub options: CheckinOptions,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
}

/// `POST /instances/{id}/checkout`
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub deactivate_all: bool,
}

/// `POST /instances/{destination}/deploy`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_notes: Option<String>,
    pub data: Vec<DataDeployment>,
    /// Always sent, always empty
    pub metadata: Map<String, Value>,
    pub source: DeploymentSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataDeployment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_set_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_plan_id: Option<String>,
    pub simulation: bool,
    pub event_control_options: EventControlOptions,
    pub query_filter: QueryFilter,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventControlOptions {
    pub deactivate_all: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct QueryFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSource {
    pub managed_instance_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_manage_request_without_versioning() {
        let request = ManageRequest {
            platform_instance: PlatformInstanceRef {
                platform_instance_id: "00D1".to_string(),
                connection_id: "a01".to_string(),
            },
            options: None,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"platformInstance": {"platformInstanceId": "00D1", "connectionId": "a01"}})
        );
    }

    #[test]
    fn test_manage_request_with_versioning() {
        let request = ManageRequest {
            platform_instance: PlatformInstanceRef {
                platform_instance_id: "00D1".to_string(),
                connection_id: "a01".to_string(),
            },
            options: Some(VersioningOptions::enabled(Some("initial".to_string()))),
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value["options"],
            json!({"checkin": true, "checkout": true, "commitMessage": "initial"})
        );
    }

    #[test]
    fn test_deployment_request_shape() {
        let request = DeploymentRequest {
            deployment_name: Some("Release 12".to_string()),
            deployment_notes: None,
            data: vec![DataDeployment {
                data_set_id: Some("a02000000000001".to_string()),
                deployment_plan_id: None,
                simulation: true,
                event_control_options: EventControlOptions {
                    deactivate_all: false,
                },
                query_filter: QueryFilter {
                    filter: Some("Industry = 'Energy'".to_string()),
                },
            }],
            metadata: Map::new(),
            source: DeploymentSource {
                managed_instance_id: "inst-src".to_string(),
            },
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "deploymentName": "Release 12",
                "data": [{
                    "dataSetId": "a02000000000001",
                    "simulation": true,
                    "eventControlOptions": {"deactivateAll": false},
                    "queryFilter": {"filter": "Industry = 'Energy'"}
                }],
                "metadata": {},
                "source": {"managedInstanceId": "inst-src"}
            })
        );
    }

    #[test]
    fn test_checkin_request_omits_unset_fields() {
        let request = CheckinRequest {
            branch_name: Some("main".to_string()),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"branchName": "main", "options": {}})
        );
    }
}
