//! End-to-end provisioning: index, then endpoint, then deployment.

use std::fmt;

use anchorage_core::model::{DeployedIndexRef, Deployment, DeploymentId, IndexEndpoint, VectorIndex};
use anchorage_core::DisplayNameFilter;

use crate::client::ControlPlane;
use crate::deploy::DeploymentCoordinator;
use crate::endpoint::EndpointProvisioner;
use crate::error::{ProvisionError, ProvisionResult};
use crate::index::IndexProvisioner;
use crate::lookup;
use crate::outcome::Ensured;
use crate::settings::ProvisionSettings;

/// What to provision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionPlan {
    pub index_name: String,
    pub dimensions: u32,
    pub endpoint_name: String,
    /// Defaults to the index name.
    pub deployment_id: Option<String>,
}

impl ProvisionPlan {
    #[must_use]
    pub fn new(index_name: impl Into<String>, dimensions: u32, endpoint_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            dimensions,
            endpoint_name: endpoint_name.into(),
            deployment_id: None,
        }
    }

    #[must_use]
    pub fn with_deployment_id(mut self, id: impl Into<String>) -> Self {
        self.deployment_id = Some(id.into());
        self
    }

    pub fn deployment_id(&self) -> &str {
        self.deployment_id.as_deref().unwrap_or(&self.index_name)
    }
}

/// Handles produced by a full provisioning run.
#[derive(Debug, Clone)]
pub struct Provisioned {
    pub index: Ensured<VectorIndex>,
    pub endpoint: Ensured<IndexEndpoint>,
    pub deployment: Ensured<Deployment>,
}

/// Read-only view of what already exists for a plan.
#[derive(Debug, Clone, Default)]
pub struct Inspection {
    pub index: Option<VectorIndex>,
    pub endpoint: Option<IndexEndpoint>,
}

impl Inspection {
    /// Deployments of the inspected index.
    pub fn deployments(&self) -> &[DeployedIndexRef] {
        self.index
            .as_ref()
            .map(|i| i.deployed_indexes.as_slice())
            .unwrap_or_default()
    }

    /// Index and endpoint exist and the index is deployed at that endpoint.
    pub fn is_complete(&self) -> bool {
        self.endpoint.as_ref().is_some_and(|endpoint| {
            self.deployments()
                .iter()
                .any(|d| d.index_endpoint == endpoint.name)
        })
    }
}

impl fmt::Display for Inspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.index {
            Some(index) => writeln!(
                f,
                "  Index:    {} ({}, {} dimensions)",
                index.display_name,
                index.name,
                index
                    .dimensions()
                    .map_or_else(|| "unknown".to_string(), |d| d.to_string())
            )?,
            None => writeln!(f, "  Index:    <missing>")?,
        }
        match &self.endpoint {
            Some(endpoint) => writeln!(
                f,
                "  Endpoint: {} ({}{})",
                endpoint.display_name,
                endpoint.name,
                if endpoint.public_endpoint_enabled { ", public" } else { "" }
            )?,
            None => writeln!(f, "  Endpoint: <missing>")?,
        }
        if self.deployments().is_empty() {
            write!(f, "  Deployed: no")
        } else {
            for deployed in self.deployments() {
                writeln!(
                    f,
                    "  Deployed: {} at {}",
                    deployed.deployed_index_id, deployed.index_endpoint
                )?;
            }
            Ok(())
        }
    }
}

/// Runs the provisioning steps against one control plane.
#[derive(Debug)]
pub struct Provisioner<'a, P: ControlPlane + ?Sized> {
    plane: &'a P,
    settings: ProvisionSettings,
}

impl<'a, P: ControlPlane + ?Sized> Provisioner<'a, P> {
    pub fn new(plane: &'a P, settings: ProvisionSettings) -> Self {
        Self { plane, settings }
    }

    pub fn settings(&self) -> &ProvisionSettings {
        &self.settings
    }

    pub fn indexes(&self) -> IndexProvisioner<'_, P> {
        IndexProvisioner::new(self.plane, &self.settings)
    }

    pub fn endpoints(&self) -> EndpointProvisioner<'_, P> {
        EndpointProvisioner::new(self.plane, &self.settings)
    }

    pub fn deployments(&self) -> DeploymentCoordinator<'_, P> {
        DeploymentCoordinator::new(self.plane, &self.settings)
    }

    /// Ensure index, endpoint and deployment, in that order.
    ///
    /// Each step is idempotent on its own; a failure leaves earlier
    /// resources in place for the next run to pick up. The deployment id
    /// is checked before anything is created.
    pub async fn provision(&self, plan: &ProvisionPlan) -> ProvisionResult<Provisioned> {
        DeploymentId::parse(plan.deployment_id())?;

        let index = self
            .indexes()
            .ensure_index(&plan.index_name, plan.dimensions)
            .await?;
        let endpoint = self.endpoints().ensure_endpoint(&plan.endpoint_name).await?;
        let deployment = self
            .deployments()
            .ensure_deployment(&index.resource, &endpoint.resource, plan.deployment_id())
            .await?;

        Ok(Provisioned {
            index,
            endpoint,
            deployment,
        })
    }

    /// Deploy an existing index onto an existing endpoint, both looked up
    /// by display name.
    pub async fn deploy_existing(
        &self,
        index_name: &str,
        endpoint_name: &str,
        deployment_id: &str,
    ) -> ProvisionResult<Ensured<Deployment>> {
        DeploymentId::parse(deployment_id)?;

        let index = lookup::find_index(self.plane, &DisplayNameFilter::new(index_name)?)
            .await?
            .ok_or_else(|| ProvisionError::NotFound {
                kind: "index",
                display_name: index_name.to_string(),
            })?;
        let endpoint =
            lookup::find_index_endpoint(self.plane, &DisplayNameFilter::new(endpoint_name)?)
                .await?
                .ok_or_else(|| ProvisionError::NotFound {
                    kind: "index endpoint",
                    display_name: endpoint_name.to_string(),
                })?;

        self.deployments()
            .ensure_deployment(&index, &endpoint, deployment_id)
            .await
    }

    /// Report what exists under these display names without creating
    /// anything.
    pub async fn inspect(
        &self,
        index_name: &str,
        endpoint_name: &str,
    ) -> ProvisionResult<Inspection> {
        let index = lookup::find_index(self.plane, &DisplayNameFilter::new(index_name)?).await?;
        let endpoint =
            lookup::find_index_endpoint(self.plane, &DisplayNameFilter::new(endpoint_name)?)
                .await?;
        Ok(Inspection { index, endpoint })
    }
}
