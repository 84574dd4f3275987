pub mod commands;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::AppConfig;
use crate::database::{DatabaseManager, MemoryStore, ModuleStore, Repository};

#[derive(Parser)]
#[command(name = "module-admin-api")]
#[command(about = "Module tree administration service")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Keep modules in memory instead of PostgreSQL")]
    pub memory: bool,

    #[arg(long, global = true, help = "Listen port, overriding MODULE_API_PORT")]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Serve the module API (default)")]
    Serve,

    #[command(about = "Create the module table and its indexes")]
    Migrate,

    #[command(about = "Physically remove modules, including soft-deleted ones")]
    Purge {
        #[arg(required = true, help = "Module ids to remove")]
        ids: Vec<String>,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env();
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    info!("Starting module admin API in {:?} mode", config.environment);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve::handle(config, cli.memory).await,
        Commands::Migrate => commands::migrate::handle(config).await,
        Commands::Purge { ids } => commands::purge::handle(config, cli.memory, ids).await,
    }
}

/// Build the store named by the flags: in-memory, or PostgreSQL from `DATABASE_URL`.
pub async fn open_store(config: &AppConfig, memory: bool) -> anyhow::Result<Arc<dyn ModuleStore>> {
    if memory {
        info!("Using in-memory module store");
        return Ok(Arc::new(MemoryStore::new(config.filter.clone())));
    }
    let manager = DatabaseManager::connect(&config.database).await?;
    let repository = Repository::new(&config.database.table_name, &manager, config.filter.clone())?;
    Ok(Arc::new(repository))
}
