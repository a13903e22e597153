use anyhow::Result;
use clap::Parser;

mod commands;

use commands::Context;

#[derive(Debug, Parser)]
#[command(name = "anchorage", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Cloud project (overrides ANCHORAGE_PROJECT and the config file)
    #[arg(long, global = true)]
    project: Option<String>,

    /// Region (overrides ANCHORAGE_LOCATION and the config file)
    #[arg(long, global = true)]
    location: Option<String>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Ensure a vector index exists
    ///
    /// Looks the index up by display name and reuses it when found. Otherwise
    /// creates a tree-AH index with streaming updates and waits for the
    /// long-running operation to finish.
    Index {
        /// Display name of the index
        #[arg(long)]
        name: String,

        /// Embedding dimensionality
        #[arg(long)]
        dimensions: u32,
    },
    /// Ensure a public index endpoint exists
    Endpoint {
        /// Display name of the endpoint
        #[arg(long)]
        name: String,
    },
    /// Deploy an existing index to an existing endpoint
    ///
    /// Both resources are looked up by display name. An index that is
    /// already deployed is left alone.
    Deploy {
        /// Display name of the index
        #[arg(long)]
        index: String,

        /// Display name of the endpoint
        #[arg(long)]
        endpoint: String,

        /// Deployed index id (default: the index display name)
        #[arg(long)]
        deployment_id: Option<String>,
    },
    /// Ensure index, endpoint and deployment in one run
    ///
    /// Safe to re-run: every step reuses what a previous run created, so an
    /// interrupted run picks up where it stopped.
    Up {
        /// Display name of the index
        #[arg(long)]
        index: String,

        /// Embedding dimensionality
        #[arg(long)]
        dimensions: u32,

        /// Display name of the endpoint
        #[arg(long)]
        endpoint: String,

        /// Deployed index id (default: the index display name)
        #[arg(long)]
        deployment_id: Option<String>,
    },
    /// Show what exists for an index and endpoint, without changing anything
    Status {
        /// Display name of the index
        #[arg(long)]
        index: String,

        /// Display name of the endpoint
        #[arg(long)]
        endpoint: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show current effective configuration
    Show,
    /// Print one config value, or the whole config file
    Get {
        /// Config key (e.g. project, reuse_policy)
        key: Option<String>,
    },
    /// Set a config value in the config file
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// Show config file path
    Path,
    /// Show example configuration
    Example,
    /// Create config file with defaults
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Config { action } => return run_config(action),
        command => command,
    };

    let ctx = Context::load(cli.project, cli.location)?;

    match command {
        Commands::Index { name, dimensions } => {
            commands::run_index(&ctx, &name, dimensions).await?;
        }
        Commands::Endpoint { name } => {
            commands::run_endpoint(&ctx, &name).await?;
        }
        Commands::Deploy {
            index,
            endpoint,
            deployment_id,
        } => {
            commands::run_deploy(&ctx, &index, &endpoint, deployment_id.as_deref()).await?;
        }
        Commands::Up {
            index,
            dimensions,
            endpoint,
            deployment_id,
        } => {
            let mut plan = anchorage_provision::ProvisionPlan::new(index, dimensions, endpoint);
            if let Some(id) = deployment_id {
                plan = plan.with_deployment_id(id);
            }
            commands::run_up(&ctx, &plan).await?;
        }
        Commands::Status { index, endpoint } => {
            commands::show_status(&ctx, &index, &endpoint).await?;
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn run_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => commands::config::show_config(),
        ConfigAction::Get { key } => commands::config::get_config(key),
        ConfigAction::Set { key, value } => commands::config::set_config(key, value),
        ConfigAction::Path => commands::config::show_path(),
        ConfigAction::Example => commands::config::show_example(),
        ConfigAction::Init => commands::config::init_config(),
    }
}
