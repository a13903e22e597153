use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anchorage_core::model::DEFAULT_MACHINE_TYPE;

/// What to do when an existing resource differs from the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReusePolicy {
    /// Reuse the existing resource and log a warning.
    #[default]
    Lenient,
    /// Fail with a mismatch error.
    Strict,
}

/// Configuration for anchorage.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (ANCHORAGE_* prefix)
/// 3. Config file (~/.config/anchorage/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Cloud project that owns the resources.
    ///
    /// Can be set via:
    /// - CLI: --project my-project
    /// - ENV: ANCHORAGE_PROJECT
    /// - Config: project = "my-project"
    #[serde(default)]
    pub project: Option<String>,

    /// Region the control plane is addressed in.
    ///
    /// Default: us-central1
    #[serde(default = "default_location")]
    pub location: String,

    /// Override for the control-plane base URL.
    ///
    /// Default: https://{location}-aiplatform.googleapis.com
    #[serde(default)]
    pub api_endpoint: Option<String>,

    /// OAuth bearer token sent with every request.
    ///
    /// Can be set via:
    /// - ENV: ANCHORAGE_ACCESS_TOKEN (e.g. from `gcloud auth print-access-token`)
    /// - Config: access_token = "..."
    #[serde(default)]
    pub access_token: Option<String>,

    /// Machine class for deployed indexes.
    #[serde(default = "default_machine_type")]
    pub machine_type: String,

    /// Seconds between polls of a long-running operation.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Seconds to wait for a long-running operation before giving up.
    #[serde(default = "default_operation_timeout_secs")]
    pub operation_timeout_secs: u64,

    /// Upper bound on control-plane requests per second.
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// How to treat existing resources that differ from the request.
    #[serde(default)]
    pub reuse_policy: ReusePolicy,

    /// Logger setup.
    #[serde(default)]
    pub logging: twyg::Opts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: None,
            location: default_location(),
            api_endpoint: None,
            access_token: None,
            machine_type: default_machine_type(),
            poll_interval_secs: default_poll_interval_secs(),
            operation_timeout_secs: default_operation_timeout_secs(),
            requests_per_second: default_requests_per_second(),
            reuse_policy: ReusePolicy::default(),
            logging: twyg::Opts::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default config file and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from `config_path` (if it exists) and environment
    /// variables with the ANCHORAGE_ prefix.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("anchorage");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI flag overrides.
    #[must_use]
    pub fn with_overrides(mut self, project: Option<String>, location: Option<String>) -> Self {
        if project.is_some() {
            self.project = project;
        }
        if let Some(location) = location {
            self.location = location;
        }
        self
    }

    /// Base URL of the control-plane REST API.
    pub fn api_base_url(&self) -> String {
        self.api_endpoint
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("https://{}-aiplatform.googleapis.com", self.location))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.location.trim().is_empty() {
            anyhow::bail!("location must not be empty");
        }
        if self.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be greater than zero");
        }
        if self.operation_timeout_secs < self.poll_interval_secs {
            anyhow::bail!(
                "operation_timeout_secs ({}) must be at least poll_interval_secs ({})",
                self.operation_timeout_secs,
                self.poll_interval_secs
            );
        }
        if self.requests_per_second == 0 {
            anyhow::bail!("requests_per_second must be greater than zero");
        }
        Ok(())
    }
}

fn default_location() -> String {
    "us-central1".to_string()
}

fn default_machine_type() -> String {
    DEFAULT_MACHINE_TYPE.to_string()
}

fn default_poll_interval_secs() -> u64 {
    30
}

// Index builds alone can take around half an hour.
fn default_operation_timeout_secs() -> u64 {
    3600
}

fn default_requests_per_second() -> u32 {
    5
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/anchorage/config.toml
/// - macOS: ~/Library/Application Support/anchorage/config.toml
/// - Windows: %APPDATA%\anchorage\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("anchorage")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Anchorage Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (ANCHORAGE_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Cloud project that owns the vector-search resources
#
# Can also be set via:
# - CLI: anchorage --project my-project up ...
# - Environment: ANCHORAGE_PROJECT=my-project
project = "your-project-id"

# Region of the control plane
location = "us-central1"

# Bearer token for the control-plane API. Prefer the environment:
#   export ANCHORAGE_ACCESS_TOKEN="$(gcloud auth print-access-token)"
#access_token = "..."

# Override the API base URL (useful for private endpoints and testing)
#api_endpoint = "https://us-central1-aiplatform.googleapis.com"

# Machine class for deployed indexes (one replica, never scaled)
machine_type = "e2-standard-16"

# Long-running operations: poll every N seconds, give up after M seconds
poll_interval_secs = 30
operation_timeout_secs = 3600

# Client-side cap on control-plane requests per second
requests_per_second = 5

# Existing resources that differ from the request (dimensions, deployment id):
# "lenient" reuses them with a warning, "strict" fails
reuse_policy = "lenient"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    ensure_config_file_at(&config_file_path())
}

pub fn ensure_config_file_at(config_path: &Path) -> Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.project.is_none());
        assert_eq!(config.location, "us-central1");
        assert_eq!(config.machine_type, "e2-standard-16");
        assert_eq!(config.reuse_policy, ReusePolicy::Lenient);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_base_url() {
        let mut config = Config::default();
        assert_eq!(
            config.api_base_url(),
            "https://us-central1-aiplatform.googleapis.com"
        );

        config.location = "europe-west4".to_string();
        assert_eq!(
            config.api_base_url(),
            "https://europe-west4-aiplatform.googleapis.com"
        );

        config.api_endpoint = Some("http://127.0.0.1:8080/".to_string());
        assert_eq!(config.api_base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_overrides() {
        let config = Config::default()
            .with_overrides(Some("proj".to_string()), Some("asia-east1".to_string()));
        assert_eq!(config.project.as_deref(), Some("proj"));
        assert_eq!(config.location, "asia-east1");

        let unchanged = config.clone().with_overrides(None, None);
        assert_eq!(unchanged.project.as_deref(), Some("proj"));
    }

    #[test]
    fn test_load_from_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load_from(&temp_dir.path().join("absent.toml"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "project = \"demo\"\nlocation = \"europe-west1\"\nreuse_policy = \"strict\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.project.as_deref(), Some("demo"));
        assert_eq!(config.location, "europe-west1");
        assert_eq!(config.reuse_policy, ReusePolicy::Strict);
        assert_eq!(config.poll_interval_secs, 30);
    }

    #[test]
    fn test_invalid_timeouts_rejected() {
        let config = Config {
            poll_interval_secs: 60,
            operation_timeout_secs: 10,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            requests_per_second: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_example_config_is_valid_toml() {
        let parsed: toml::Value = toml::from_str(example_config()).unwrap();
        assert_eq!(parsed["reuse_policy"].as_str(), Some("lenient"));
        assert_eq!(parsed["machine_type"].as_str(), Some("e2-standard-16"));
    }

    #[test]
    fn test_ensure_config_file_at() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        assert!(ensure_config_file_at(&path).unwrap());
        assert!(!ensure_config_file_at(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), example_config());
    }
}
