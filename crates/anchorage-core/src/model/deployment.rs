use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::model::endpoint::IndexEndpoint;
use crate::model::names::{IndexEndpointName, IndexName};

/// Longest deployed index id the platform accepts.
pub const MAX_DEPLOYMENT_ID_LEN: usize = 128;

/// Machine class used for serving when nothing else is configured.
pub const DEFAULT_MACHINE_TYPE: &str = "e2-standard-16";

/// A deployment as listed on its index: which endpoint, under which id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedIndexRef {
    pub index_endpoint: IndexEndpointName,
    pub deployed_index_id: String,
}

/// Identifier of a deployed index within an endpoint.
///
/// Must start with a letter and contain only letters, digits and
/// underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeploymentId(String);

impl DeploymentId {
    pub fn parse(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let invalid = |reason| Error::InvalidDeploymentId {
            id: id.clone(),
            reason,
        };

        let Some(first) = id.chars().next() else {
            return Err(invalid("must not be empty"));
        };
        if !first.is_ascii_alphabetic() {
            return Err(invalid("must start with a letter"));
        }
        if id.len() > MAX_DEPLOYMENT_ID_LEN {
            return Err(invalid("must be at most 128 characters"));
        }
        if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid("may only contain letters, digits and underscores"));
        }

        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DeploymentId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<DeploymentId> for String {
    fn from(value: DeploymentId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineSpec {
    pub machine_type: String,
}

/// Serving compute reserved for one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DedicatedResources {
    pub machine_spec: MachineSpec,
    pub min_replica_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_replica_count: Option<u32>,
}

impl DedicatedResources {
    /// A single replica of `machine_type`, never scaled.
    #[must_use]
    pub fn single_replica(machine_type: impl Into<String>) -> Self {
        Self {
            machine_spec: MachineSpec {
                machine_type: machine_type.into(),
            },
            min_replica_count: 1,
            max_replica_count: Some(1),
        }
    }
}

/// A deployed index as reported by its endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedIndex {
    pub id: String,
    pub index: IndexName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedicated_resources: Option<DedicatedResources>,
    #[serde(default, skip_serializing)]
    pub create_time: Option<DateTime<Utc>>,
}

/// Body of a deploy-index request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployIndexRequest {
    pub deployed_index: DeployedIndex,
}

impl DeployIndexRequest {
    /// Deploy `index` as `id`, reusing the id as display name.
    #[must_use]
    pub fn new(index: &IndexName, id: &DeploymentId, resources: DedicatedResources) -> Self {
        Self {
            deployed_index: DeployedIndex {
                id: id.as_str().to_string(),
                index: index.clone(),
                display_name: Some(id.as_str().to_string()),
                dedicated_resources: Some(resources),
                create_time: None,
            },
        }
    }
}

/// Handle to a deployment: the serving endpoint plus the deployed index id.
#[derive(Debug, Clone, PartialEq)]
pub struct Deployment {
    pub endpoint: IndexEndpoint,
    pub deployed_index_id: String,
}

impl Deployment {
    /// The matching entry on the endpoint, if the endpoint lists it.
    #[must_use]
    pub fn deployed_index(&self) -> Option<&DeployedIndex> {
        self.endpoint
            .deployed_indexes
            .iter()
            .find(|d| d.id == self.deployed_index_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deployment_id_accepts_identifiers() {
        assert!(DeploymentId::parse("docs").is_ok());
        assert!(DeploymentId::parse("docs_v2").is_ok());
        assert!(DeploymentId::parse("D1").is_ok());
    }

    #[test]
    fn test_deployment_id_rejects_bad_input() {
        assert!(DeploymentId::parse("").is_err());
        assert!(DeploymentId::parse("1docs").is_err());
        assert!(DeploymentId::parse("my-index").is_err());
        assert!(DeploymentId::parse("a".repeat(129)).is_err());
        assert!(DeploymentId::parse("a".repeat(128)).is_ok());
    }

    #[test]
    fn test_deployment_id_error_message() {
        let err = DeploymentId::parse("my-index").unwrap_err();
        assert!(err.to_string().contains("my-index"));
        assert!(err.to_string().contains("underscores"));
    }

    #[test]
    fn test_deploy_request_wire_shape() {
        let index = IndexName::parse("projects/p/locations/l/indexes/5").unwrap();
        let id = DeploymentId::parse("dep1").unwrap();
        let request =
            DeployIndexRequest::new(&index, &id, DedicatedResources::single_replica("e2-standard-16"));

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "deployedIndex": {
                    "id": "dep1",
                    "index": "projects/p/locations/l/indexes/5",
                    "displayName": "dep1",
                    "dedicatedResources": {
                        "machineSpec": { "machineType": "e2-standard-16" },
                        "minReplicaCount": 1,
                        "maxReplicaCount": 1
                    }
                }
            })
        );
    }

    #[test]
    fn test_deployed_index_ref_deserialize() {
        let json = r#"{
            "indexEndpoint": "projects/p/locations/l/indexEndpoints/3",
            "deployedIndexId": "dep1"
        }"#;
        let reference: DeployedIndexRef = serde_json::from_str(json).unwrap();
        assert_eq!(reference.index_endpoint.id(), "3");
        assert_eq!(reference.deployed_index_id, "dep1");
    }
}
