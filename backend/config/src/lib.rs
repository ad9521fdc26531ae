//! `pairline-config` — Pairline gateway configuration management.
//!
//! Provides:
//! - Typed config schema (server, matchmaking, logging)
//! - YAML loading with first-run defaults
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Schema validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use defaults::apply_all_defaults;
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config, parse_config};
pub use schema::PairlineConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;

/// Load, apply env substitution, apply defaults to, and validate a config file.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path) -> Result<PairlineConfig> {
    let raw_config = load_config(path).await?;
    prepare(raw_config)
}

/// Run the post-load pipeline on an already parsed config.
pub fn prepare(raw_config: PairlineConfig) -> Result<PairlineConfig> {
    let value: Value = serde_json::to_value(&raw_config)
        .context("Failed to serialize config for processing")?;

    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;

    let config: PairlineConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        bail!("configuration has {} error(s)", report.errors.len());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_fills_defaults() {
        let cfg = prepare(PairlineConfig::default()).unwrap();
        assert_eq!(cfg.server.as_ref().unwrap().port, Some(defaults::DEFAULT_PORT));
        assert_eq!(cfg.log_level(), "info");
    }

    #[test]
    fn prepare_rejects_unbounded_cooldown() {
        let cfg = parse_config("matchmaking:\n  reportCooldownSecs: 18446744073709551615\n").unwrap();
        assert!(prepare(cfg).is_err());
    }

    #[test]
    fn prepare_rejects_invalid_config() {
        let cfg = parse_config("matchmaking:\n  maxChatLen: 0\n").unwrap();
        assert!(prepare(cfg).is_err());
    }
}
