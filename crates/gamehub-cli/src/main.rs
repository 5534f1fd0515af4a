mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use gamehub_config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Commands::Serve { host, port, db } => {
            let mut config = Config::load(cli.config.as_deref())?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(db) = db {
                config.storage.database_path = Some(db);
            }
            commands::serve::handle(config).await
        }
        cli::Commands::Init { force } => commands::init::handle(cli.config.as_deref(), force),
    }
}
