use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use docmigrate_core::{MigrateConfig, MigrationStep};
use docmigrate_storage::StoreBackend;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "docmigrate")]
#[command(about = "Provision MongoDB collections and unique indexes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the base provisioning step
    Apply {
        /// Run against a fresh in-memory store instead of MONGODB_URI
        #[arg(long)]
        memory: bool,
    },
    /// Check that collections and unique indexes are in place
    Verify {
        #[arg(long)]
        memory: bool,
    },
    /// Print the step's operations as JSON without connecting
    Plan,
}

fn load_step(config: &MigrateConfig) -> Result<MigrationStep> {
    Ok(MigrationStep::base_provisioning(&config.contexts)?)
}

async fn open_backend(config: &MigrateConfig, memory: bool) -> Result<Arc<StoreBackend>> {
    if memory {
        tracing::info!("Using in-memory store");
        return Ok(Arc::new(StoreBackend::new_memory()));
    }
    let uri = config.require_mongodb_uri()?;
    let timeout = Duration::from_secs(config.server_selection_timeout_secs);
    Ok(Arc::new(StoreBackend::new_mongo(uri, timeout).await?))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = MigrateConfig::from_env()?;
    let step = load_step(&config)?;

    match cli.command {
        Commands::Apply { memory } => {
            commands::apply::run(open_backend(&config, memory).await?, &step).await?;
        },
        Commands::Verify { memory } => {
            commands::verify::run(open_backend(&config, memory).await?, &step).await?;
        },
        Commands::Plan => commands::plan::run(&step)?,
    }

    Ok(())
}
