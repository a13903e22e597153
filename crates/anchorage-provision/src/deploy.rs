//! Deploying an index onto an endpoint.

use anchorage_core::model::{
    DedicatedResources, DeployIndexRequest, DeployedIndexRef, Deployment, DeploymentId,
    IndexEndpoint, VectorIndex,
};

use crate::client::ControlPlane;
use crate::config::ReusePolicy;
use crate::error::{ProvisionError, ProvisionResult};
use crate::outcome::Ensured;
use crate::settings::ProvisionSettings;

/// Ensures an index is deployed to an endpoint.
///
/// An index counts as deployed as soon as it has any deployment; the
/// existing one is resolved and returned rather than adding a second.
#[derive(Debug)]
pub struct DeploymentCoordinator<'a, P: ControlPlane + ?Sized> {
    plane: &'a P,
    settings: &'a ProvisionSettings,
}

impl<'a, P: ControlPlane + ?Sized> DeploymentCoordinator<'a, P> {
    pub fn new(plane: &'a P, settings: &'a ProvisionSettings) -> Self {
        Self { plane, settings }
    }

    /// Deploy `index` onto `endpoint` as `deployment_id` unless the index
    /// is already deployed somewhere.
    ///
    /// The deployment runs one replica of the configured machine type and
    /// uses `deployment_id` as its display name. The call returns once the
    /// deployment is serving.
    pub async fn ensure_deployment(
        &self,
        index: &VectorIndex,
        endpoint: &IndexEndpoint,
        deployment_id: &str,
    ) -> ProvisionResult<Ensured<Deployment>> {
        let deployment_id = DeploymentId::parse(deployment_id)?;

        // The caller's handle may predate earlier deployments.
        let current = self.plane.get_index(&index.name).await?;

        if let Some(existing) = current.deployed_indexes.first() {
            self.check_existing(&current, existing, endpoint, &deployment_id)?;
            let resolved = self.plane.get_index_endpoint(&existing.index_endpoint).await?;
            log::info!(
                "Vector Search index {} is already deployed at endpoint {}",
                current.display_name,
                resolved.display_name
            );
            return Ok(Ensured::reused(Deployment {
                endpoint: resolved,
                deployed_index_id: existing.deployed_index_id.clone(),
            }));
        }

        log::info!(
            "Deploying Vector Search index {} at endpoint {} ...",
            current.display_name,
            endpoint.display_name
        );
        let request = DeployIndexRequest::new(
            &current.name,
            &deployment_id,
            DedicatedResources::single_replica(self.settings.machine_type.clone()),
        );
        let operation = self.plane.deploy_index(&endpoint.name, &request).await?;
        self.settings.waiter.wait(self.plane, operation).await?;

        let serving = self.plane.get_index_endpoint(&endpoint.name).await?;
        log::info!(
            "Vector Search index {} is deployed at endpoint {}",
            current.display_name,
            serving.display_name
        );
        Ok(Ensured::created(Deployment {
            endpoint: serving,
            deployed_index_id: deployment_id.to_string(),
        }))
    }

    fn check_existing(
        &self,
        index: &VectorIndex,
        existing: &DeployedIndexRef,
        endpoint: &IndexEndpoint,
        requested: &DeploymentId,
    ) -> ProvisionResult<()> {
        let mut differences = Vec::new();
        if existing.deployed_index_id != requested.as_str() {
            differences.push(format!(
                "is deployed as {:?}, requested {:?}",
                existing.deployed_index_id,
                requested.as_str()
            ));
        }
        if existing.index_endpoint != endpoint.name {
            differences.push(format!(
                "is deployed at {}, requested {}",
                existing.index_endpoint, endpoint.name
            ));
        }
        if differences.is_empty() {
            return Ok(());
        }

        let detail = differences.join(" and ");
        match self.settings.reuse_policy {
            ReusePolicy::Lenient => {
                log::warn!(
                    "Vector Search index {} {}; keeping the existing deployment",
                    index.display_name,
                    detail
                );
                Ok(())
            }
            ReusePolicy::Strict => Err(ProvisionError::Mismatch {
                kind: "deployment of index",
                display_name: index.display_name.clone(),
                detail,
            }),
        }
    }
}
