//! CLI command implementations for `factline`.
//!
//! - [`serve`] -- Start one pipeline stage.
//! - [`config_cmd`] -- Print the resolved configuration.

pub mod config_cmd;
pub mod serve;

use std::path::Path;

use factline_types::Config;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "FACTLINE_CONFIG";

/// Load configuration from the given path override, else from
/// `FACTLINE_CONFIG`, else the built-in defaults. The result is validated.
pub async fn load_config(config_override: Option<&str>) -> anyhow::Result<Config> {
    let path = match config_override {
        Some(path) => Some(path.to_string()),
        None => std::env::var(CONFIG_ENV).ok().filter(|p| !p.is_empty()),
    };

    let config = match path {
        Some(path_str) => read_config(Path::new(&path_str)).await?,
        None => {
            tracing::debug!("no config file given, using defaults");
            Config::default()
        }
    };

    config.validate()?;
    Ok(config)
}

async fn read_config(path: &Path) -> anyhow::Result<Config> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        anyhow::bail!("config file not found: {}", path.display());
    }
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read config: {e}"))?;
    let config: Config = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}
