use anyhow::Result;
use gamehub_config::Config;
use std::path::Path;

pub fn handle(path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::config_path(),
    };

    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    Config::default().save(&path)?;

    println!("✓ Wrote {}", path.display());
    println!("  Run 'gamehub serve' to start the catalog");

    Ok(())
}
