use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::deployment::DeployedIndex;
use crate::model::names::IndexEndpointName;

/// A serving endpoint as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEndpoint {
    pub name: IndexEndpointName,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deployed_indexes: Vec<DeployedIndex>,
    #[serde(default)]
    pub public_endpoint_enabled: bool,
    /// Host name queries are sent to once something is deployed.
    #[serde(default)]
    pub public_endpoint_domain_name: Option<String>,
    #[serde(default)]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub etag: Option<String>,
}

/// Body of a create-endpoint request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIndexEndpoint {
    pub display_name: String,
    pub public_endpoint_enabled: bool,
}

impl NewIndexEndpoint {
    /// A publicly reachable endpoint named `display_name`.
    #[must_use]
    pub fn public(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            public_endpoint_enabled: true,
        }
    }
}
