//! Idempotent provisioning for a managed vector-search service.
//!
//! Each step looks a resource up by display name, reuses it when present
//! and creates it otherwise:
//!
//! 1. [`IndexProvisioner`] ensures a vector index,
//! 2. [`EndpointProvisioner`] ensures a public serving endpoint,
//! 3. [`DeploymentCoordinator`] ensures the index is deployed to it.
//!
//! [`Provisioner`] threads the handles through all three. Remote work is
//! delegated to a [`ControlPlane`], normally a [`VertexClient`].

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod client;
pub mod config;
pub mod deploy;
pub mod endpoint;
pub mod error;
pub mod index;
pub mod lookup;
pub mod operation;
pub mod outcome;
pub mod resilience;
pub mod settings;
pub mod workflow;

pub use client::{ControlPlane, VertexClient};
pub use config::{Config, ReusePolicy};
pub use deploy::DeploymentCoordinator;
pub use endpoint::EndpointProvisioner;
pub use error::{ProvisionError, ProvisionResult};
pub use index::IndexProvisioner;
pub use operation::OperationWaiter;
pub use outcome::{Ensured, Outcome};
pub use settings::ProvisionSettings;
pub use workflow::{Inspection, ProvisionPlan, Provisioned, Provisioner};
