//! Index provisioning.

use anchorage_core::model::{NewIndex, VectorIndex};
use anchorage_core::DisplayNameFilter;

use crate::client::ControlPlane;
use crate::config::ReusePolicy;
use crate::error::{ProvisionError, ProvisionResult};
use crate::lookup;
use crate::outcome::Ensured;
use crate::settings::ProvisionSettings;

/// Ensures a vector index exists under a display name.
///
/// New indexes are built with the fixed parameters in
/// [`ProvisionSettings::build_params`] (tree-AH, small shards, streaming
/// updates, 3 approximate neighbors).
#[derive(Debug)]
pub struct IndexProvisioner<'a, P: ControlPlane + ?Sized> {
    plane: &'a P,
    settings: &'a ProvisionSettings,
}

impl<'a, P: ControlPlane + ?Sized> IndexProvisioner<'a, P> {
    pub fn new(plane: &'a P, settings: &'a ProvisionSettings) -> Self {
        Self { plane, settings }
    }

    /// Return the index named `name`, creating it with `dimensions` if
    /// no index has that display name.
    ///
    /// Creation waits for the build operation, which can take around
    /// half an hour.
    pub async fn ensure_index(
        &self,
        name: &str,
        dimensions: u32,
    ) -> ProvisionResult<Ensured<VectorIndex>> {
        if dimensions == 0 {
            return Err(ProvisionError::InvalidRequest(
                "index dimensions must be greater than zero".to_string(),
            ));
        }
        let filter = DisplayNameFilter::new(name)?;

        if let Some(existing) = lookup::find_index(self.plane, &filter).await? {
            self.check_dimensions(&existing, dimensions)?;
            log::info!(
                "Vector Search index {} exists with resource name {}",
                existing.display_name,
                existing.name
            );
            return Ok(Ensured::reused(existing));
        }

        log::info!("Creating Vector Search index {} ...", name);
        let request = NewIndex::new(name, dimensions, &self.settings.build_params);
        let operation = self.plane.create_index(&request).await?;
        let operation = self.settings.waiter.wait(self.plane, operation).await?;

        let index = match operation.response_as::<VectorIndex>()? {
            Some(index) => index,
            None => lookup::find_index(self.plane, &filter).await?.ok_or_else(|| {
                ProvisionError::MissingResource {
                    name: operation.name.to_string(),
                    kind: "index",
                }
            })?,
        };

        log::info!(
            "Vector Search index {} created with resource name {}",
            index.display_name,
            index.name
        );
        Ok(Ensured::created(index))
    }

    fn check_dimensions(&self, existing: &VectorIndex, requested: u32) -> ProvisionResult<()> {
        let Some(actual) = existing.dimensions() else {
            return Ok(());
        };
        if actual == requested {
            return Ok(());
        }

        match self.settings.reuse_policy {
            ReusePolicy::Lenient => {
                log::warn!(
                    "Vector Search index {} has {} dimensions, not the requested {}; reusing it",
                    existing.display_name,
                    actual,
                    requested
                );
                Ok(())
            }
            ReusePolicy::Strict => Err(ProvisionError::Mismatch {
                kind: "index",
                display_name: existing.display_name.clone(),
                detail: format!("has {actual} dimensions, requested {requested}"),
            }),
        }
    }
}
