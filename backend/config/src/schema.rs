//! PlateWire runtime configuration schema.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateWireConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    #[serde(default)]
    pub store: StoreConfig,
    /// Priced menu seeded into the store at startup. Items ordered but
    /// missing from the menu price at zero.
    #[serde(default)]
    pub menu: Vec<MenuEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    /// Path to the SQLite order database. Defaults to the platform data
    /// directory when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: default_log_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionsConfig {
    /// How long an untouched in-progress cart survives before eviction.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// How often the eviction sweep runs.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Upper bound on the completion handoff; a slower store surfaces as
    /// the backend-error reply.
    #[serde(default = "default_handoff_timeout_secs")]
    pub handoff_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            handoff_timeout_secs: default_handoff_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    pub name: String,
    pub price: f64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_idle_timeout_secs() -> u64 {
    1800
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_handoff_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_run_a_local_server() {
        let config = PlateWireConfig::default();
        assert_eq!(config.gateway.port, 8000);
        assert_eq!(config.sessions.idle_timeout_secs, 1800);
        assert!(config.database.path.is_none());
        assert!(config.menu.is_empty());
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let yaml = "
gateway:
  port: 9090
sessions:
  idleTimeoutSecs: 120
menu:
  - name: burger
    price: 5.0
";
        let config: PlateWireConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.gateway.port, 9090);
        assert_eq!(config.gateway.host, "0.0.0.0");
        assert_eq!(config.sessions.idle_timeout_secs, 120);
        assert_eq!(config.sessions.sweep_interval_secs, 60);
        assert_eq!(config.menu.len(), 1);
        assert_eq!(config.store.handoff_timeout_secs, 10);
    }
}
