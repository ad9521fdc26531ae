//! Config file discovery and loading.

use crate::schema::PairlineConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the Pairline config directory.
/// Priority: `PAIRLINE_CONFIG_DIR` env > `~/.pairline/` > `./.pairline`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PAIRLINE_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".pairline");
    }
    PathBuf::from(".pairline")
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist (first run).
pub async fn load_config(path: &Path) -> Result<PairlineConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(PairlineConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Parse YAML text into a config. An empty document yields the defaults.
pub fn parse_config(raw: &str) -> Result<PairlineConfig> {
    if raw.trim().is_empty() {
        return Ok(PairlineConfig::default());
    }
    Ok(serde_yaml::from_str(raw)?)
}
