use anyhow::Result;
use gamehub_config::Config;
use gamehub_server::GameHubServer;
use gamehub_storage::Storage;

pub async fn handle(config: Config) -> Result<()> {
    // Opens the pool and bootstraps the schema
    let storage = Storage::new(config.storage.database_path.clone()).await?;

    if config.downloads.root.is_none() {
        tracing::warn!(
            "no downloads.root configured; download paths are served from anywhere on this machine"
        );
    }

    GameHubServer::serve(storage, &config).await
}
