//! `platewire-config` — runtime configuration.
//!
//! Typed YAML schema with `${ENV_VAR}` substitution. A missing config
//! file is not an error; the defaults run a self-contained local server.

pub mod env;
pub mod schema;

pub use env::{resolve_env_vars, MissingEnvVarError};
pub use schema::{
    DatabaseConfig, GatewayConfig, LoggingConfig, MenuEntry, PlateWireConfig, SessionsConfig,
    StoreConfig,
};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Load a config file, substitute env vars, and produce the typed config.
pub fn load_config(path: &Path) -> Result<PlateWireConfig> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "No config file found, using defaults");
        return Ok(PlateWireConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let value: serde_json::Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse YAML in {}", path.display()))?;
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;
    let config =
        serde_json::from_value(value).context("Config does not match the expected schema")?;
    Ok(config)
}

/// Default on-disk location for the order database.
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("platewire")
        .join("orders.db")
}
