use anyhow::{Context, Result};
use std::path::Path;

use anchorage_provision::{config, Config};

/// Keys accepted by `config get` and `config set`.
const KEYS: &[&str] = &[
    "project",
    "location",
    "api_endpoint",
    "access_token",
    "machine_type",
    "poll_interval_secs",
    "operation_timeout_secs",
    "requests_per_second",
    "reuse_policy",
];

const INTEGER_KEYS: &[&str] = &[
    "poll_interval_secs",
    "operation_timeout_secs",
    "requests_per_second",
];

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Unknown config key: {}\n\nValid keys: {}",
        key,
        KEYS.join(", ")
    )
}

fn redact(token: Option<&str>) -> String {
    match token {
        Some(t) if t.len() > 8 => {
            let prefix: String = t.chars().take(4).collect();
            format!("{}… ({} chars)", prefix, t.len())
        }
        Some(_) => "<set>".to_string(),
        None => "<not set>".to_string(),
    }
}

fn value_of(config: &Config, key: &str) -> Result<String> {
    let value = match key {
        "project" => config.project.clone().unwrap_or_else(|| "<not set>".to_string()),
        "location" => config.location.clone(),
        "api_endpoint" => config.api_base_url(),
        "access_token" => redact(config.access_token.as_deref()),
        "machine_type" => config.machine_type.clone(),
        "poll_interval_secs" => config.poll_interval_secs.to_string(),
        "operation_timeout_secs" => config.operation_timeout_secs.to_string(),
        "requests_per_second" => config.requests_per_second.to_string(),
        "reuse_policy" => format!("{:?}", config.reuse_policy).to_lowercase(),
        _ => return Err(unknown_key(key)),
    };
    Ok(value)
}

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;
    let path = config::config_file_path();

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", path.display());
    println!(
        "File exists: {}\n",
        if path.exists() { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    for key in KEYS {
        println!("  {}: {}", key, value_of(&config, key)?);
    }

    let logging = toml::to_string(&config.logging).context("Failed to render logging options")?;
    println!("\n[logging]");
    print!("{}", logging);

    println!("\nPriority: CLI args > ENV vars (ANCHORAGE_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value, or print the config file when no key is given.
pub fn get_config(key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        let config = Config::load()?;
        println!("{}", value_of(&config, &key)?);
        return Ok(());
    }

    let config_path = config::config_file_path();
    if config_path.exists() {
        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        print!("{}", contents);
    } else {
        println!("Config file does not exist: {}", config_path.display());
        println!("\nRun 'anchorage config init' to create it.");
    }

    Ok(())
}

/// Set a config value in the config file, keeping comments and layout.
pub fn set_config(key: String, value: String) -> Result<()> {
    let config_path = config::config_file_path();
    config::ensure_config_file()?;

    set_in_file(&config_path, &key, &value)?;

    println!("✓ Updated {} = {}", key, value);
    println!("  in {}", config_path.display());

    Ok(())
}

fn set_in_file(path: &Path, key: &str, value: &str) -> Result<()> {
    if !KEYS.contains(&key) {
        return Err(unknown_key(key));
    }

    let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
    let mut document = contents
        .parse::<toml_edit::DocumentMut>()
        .context("Config file is not valid TOML")?;

    if INTEGER_KEYS.contains(&key) {
        let number: i64 = value
            .parse()
            .with_context(|| format!("{key} must be a whole number, got {value:?}"))?;
        document[key] = toml_edit::value(number);
    } else {
        if key == "reuse_policy" && !matches!(value, "lenient" | "strict") {
            anyhow::bail!("reuse_policy must be \"lenient\" or \"strict\", got {value:?}");
        }
        document[key] = toml_edit::value(value);
    }

    std::fs::write(path, document.to_string()).context("Failed to write config file")?;
    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure anchorage.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
