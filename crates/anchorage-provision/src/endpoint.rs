//! Endpoint provisioning.

use anchorage_core::model::{IndexEndpoint, NewIndexEndpoint};
use anchorage_core::DisplayNameFilter;

use crate::client::ControlPlane;
use crate::config::ReusePolicy;
use crate::error::{ProvisionError, ProvisionResult};
use crate::lookup;
use crate::outcome::Ensured;
use crate::settings::ProvisionSettings;

/// Ensures a public index endpoint exists under a display name.
#[derive(Debug)]
pub struct EndpointProvisioner<'a, P: ControlPlane + ?Sized> {
    plane: &'a P,
    settings: &'a ProvisionSettings,
}

impl<'a, P: ControlPlane + ?Sized> EndpointProvisioner<'a, P> {
    pub fn new(plane: &'a P, settings: &'a ProvisionSettings) -> Self {
        Self { plane, settings }
    }

    /// Return the endpoint named `name`, creating a publicly reachable one
    /// if none exists.
    pub async fn ensure_endpoint(&self, name: &str) -> ProvisionResult<Ensured<IndexEndpoint>> {
        let filter = DisplayNameFilter::new(name)?;

        if let Some(existing) = lookup::find_index_endpoint(self.plane, &filter).await? {
            self.check_public(&existing)?;
            log::info!(
                "Vector Search index endpoint {} exists with resource name {}",
                existing.display_name,
                existing.name
            );
            return Ok(Ensured::reused(existing));
        }

        log::info!("Creating Vector Search index endpoint {} ...", name);
        let operation = self
            .plane
            .create_index_endpoint(&NewIndexEndpoint::public(name))
            .await?;
        let operation = self.settings.waiter.wait(self.plane, operation).await?;

        let endpoint = match operation.response_as::<IndexEndpoint>()? {
            Some(endpoint) => endpoint,
            None => lookup::find_index_endpoint(self.plane, &filter)
                .await?
                .ok_or_else(|| ProvisionError::MissingResource {
                    name: operation.name.to_string(),
                    kind: "index endpoint",
                })?,
        };

        log::info!(
            "Vector Search index endpoint {} created with resource name {}",
            endpoint.display_name,
            endpoint.name
        );
        Ok(Ensured::created(endpoint))
    }

    fn check_public(&self, existing: &IndexEndpoint) -> ProvisionResult<()> {
        if existing.public_endpoint_enabled {
            return Ok(());
        }

        match self.settings.reuse_policy {
            ReusePolicy::Lenient => {
                log::warn!(
                    "Vector Search index endpoint {} is not public; reusing it",
                    existing.display_name
                );
                Ok(())
            }
            ReusePolicy::Strict => Err(ProvisionError::Mismatch {
                kind: "index endpoint",
                display_name: existing.display_name.clone(),
                detail: "is not publicly reachable".to_string(),
            }),
        }
    }
}
