use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::deployment::DeployedIndexRef;
use crate::model::names::IndexName;

/// Metadata schema the control plane expects for nearest-neighbor indexes.
pub const NEAREST_NEIGHBOR_SCHEMA_URI: &str =
    "gs://google-cloud-aiplatform/schema/matchingengine/metadata/nearest_neighbor_search_1.0.0.yaml";

/// Shard size class of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShardSize {
    #[serde(rename = "SHARD_SIZE_SMALL")]
    Small,
    #[serde(rename = "SHARD_SIZE_MEDIUM")]
    Medium,
    #[serde(rename = "SHARD_SIZE_LARGE")]
    Large,
}

/// How an index accepts new vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexUpdateMethod {
    /// Periodic full rebuild from the contents location.
    BatchUpdate,
    /// Incremental upserts without a rebuild.
    StreamUpdate,
    #[serde(rename = "INDEX_UPDATE_METHOD_UNSPECIFIED", other)]
    Unspecified,
}

/// Tree-AH build settings. The platform defaults are used for every knob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeAhConfig {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BruteForceConfig {}

/// Build algorithm of an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlgorithmConfig {
    /// Tree-based approximate nearest neighbor.
    TreeAhConfig(TreeAhConfig),
    BruteForceConfig(BruteForceConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexConfig {
    pub dimensions: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximate_neighbors_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard_size: Option<ShardSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_measure_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm_config: Option<AlgorithmConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexMetadata {
    pub config: IndexConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents_delta_uri: Option<String>,
}

/// A vector index as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorIndex {
    pub name: IndexName,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Option<IndexMetadata>,
    /// Deployments of this index, one per (endpoint, deployed index id).
    #[serde(default)]
    pub deployed_indexes: Vec<DeployedIndexRef>,
    #[serde(default)]
    pub index_update_method: Option<IndexUpdateMethod>,
    #[serde(default)]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub etag: Option<String>,
}

impl VectorIndex {
    /// Vector dimensionality, when the platform reports it.
    #[must_use]
    pub fn dimensions(&self) -> Option<u32> {
        self.metadata.as_ref().map(|m| m.config.dimensions)
    }
}

/// Fixed build parameters applied to every index this tool creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexBuildParams {
    pub algorithm: AlgorithmConfig,
    pub shard_size: ShardSize,
    pub update_method: IndexUpdateMethod,
    pub approximate_neighbors_count: u32,
}

impl Default for IndexBuildParams {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmConfig::TreeAhConfig(TreeAhConfig::default()),
            shard_size: ShardSize::Small,
            update_method: IndexUpdateMethod::StreamUpdate,
            approximate_neighbors_count: 3,
        }
    }
}

/// Body of a create-index request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIndex {
    pub display_name: String,
    pub metadata_schema_uri: String,
    pub metadata: IndexMetadata,
    pub index_update_method: IndexUpdateMethod,
}

impl NewIndex {
    #[must_use]
    pub fn new(display_name: impl Into<String>, dimensions: u32, params: &IndexBuildParams) -> Self {
        Self {
            display_name: display_name.into(),
            metadata_schema_uri: NEAREST_NEIGHBOR_SCHEMA_URI.to_string(),
            metadata: IndexMetadata {
                config: IndexConfig {
                    dimensions,
                    approximate_neighbors_count: Some(params.approximate_neighbors_count),
                    shard_size: Some(params.shard_size),
                    distance_measure_type: None,
                    algorithm_config: Some(params.algorithm.clone()),
                },
                contents_delta_uri: None,
            },
            index_update_method: params.update_method,
        }
    }
}
