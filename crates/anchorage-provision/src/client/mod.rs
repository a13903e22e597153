//! Control-plane access.
//!
//! [`ControlPlane`] is the seam between the provisioning logic and the
//! managed service: [`VertexClient`] talks to the real REST API, and tests
//! substitute an in-memory implementation.

pub mod vertex;

use async_trait::async_trait;

use anchorage_core::model::{
    DeployIndexRequest, IndexEndpoint, IndexEndpointName, IndexName, NewIndex, NewIndexEndpoint,
    Operation, OperationName, VectorIndex,
};
use anchorage_core::DisplayNameFilter;

use crate::error::ProvisionResult;

pub use vertex::VertexClient;

/// Operations anchorage needs from the vector-search control plane.
///
/// List calls return every page, in listing order. Create and deploy calls
/// return the long-running operation without waiting for it.
#[async_trait]
pub trait ControlPlane: Send + Sync + std::fmt::Debug {
    async fn list_indexes(&self, filter: &DisplayNameFilter) -> ProvisionResult<Vec<VectorIndex>>;

    async fn get_index(&self, name: &IndexName) -> ProvisionResult<VectorIndex>;

    async fn create_index(&self, index: &NewIndex) -> ProvisionResult<Operation>;

    async fn list_index_endpoints(
        &self,
        filter: &DisplayNameFilter,
    ) -> ProvisionResult<Vec<IndexEndpoint>>;

    async fn get_index_endpoint(&self, name: &IndexEndpointName) -> ProvisionResult<IndexEndpoint>;

    async fn create_index_endpoint(&self, endpoint: &NewIndexEndpoint)
        -> ProvisionResult<Operation>;

    async fn deploy_index(
        &self,
        endpoint: &IndexEndpointName,
        request: &DeployIndexRequest,
    ) -> ProvisionResult<Operation>;

    async fn get_operation(&self, name: &OperationName) -> ProvisionResult<Operation>;
}
