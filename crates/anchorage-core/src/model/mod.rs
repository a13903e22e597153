pub mod deployment;
pub mod endpoint;
pub mod index;
pub mod names;
pub mod operation;

pub use deployment::{
    DedicatedResources, DeployIndexRequest, DeployedIndex, DeployedIndexRef, Deployment,
    DeploymentId, MachineSpec, DEFAULT_MACHINE_TYPE,
};
pub use endpoint::{IndexEndpoint, NewIndexEndpoint};
pub use index::{
    AlgorithmConfig, IndexBuildParams, IndexConfig, IndexMetadata, IndexUpdateMethod, NewIndex,
    ShardSize, TreeAhConfig, VectorIndex,
};
pub use names::{IndexEndpointName, IndexName, OperationName};
pub use operation::{Operation, Status};
