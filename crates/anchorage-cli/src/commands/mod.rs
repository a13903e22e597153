pub mod config;
pub mod provision;
pub mod status;

use anyhow::{anyhow, Result};

use anchorage_provision::{Config, ProvisionSettings, Provisioner, VertexClient};

pub use provision::{run_deploy, run_endpoint, run_index, run_up};
pub use status::show_status;

/// Loaded configuration plus a client for the configured project.
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    pub client: VertexClient,
}

impl Context {
    /// Load config, apply CLI overrides and set up logging.
    pub fn load(project: Option<String>, location: Option<String>) -> Result<Self> {
        let config = Config::load()?.with_overrides(project, location);

        twyg::setup(config.logging.clone())
            .map_err(|e| anyhow!("Failed to set up logging: {e}"))?;

        let client = VertexClient::from_config(&config)?;
        log::debug!(
            "Using project {} in {}",
            client.project(),
            client.location()
        );

        Ok(Self { config, client })
    }

    pub fn provisioner(&self) -> Provisioner<'_, VertexClient> {
        Provisioner::new(&self.client, ProvisionSettings::from_config(&self.config))
    }
}
