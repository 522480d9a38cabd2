use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application configuration.
/// Loaded from environment variables and/or an optional `fwredirect.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Firmware tree settings
    #[serde(default)]
    pub firmware: FirmwareConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: 0.0.0.0)
    #[serde(default = "default_host")]
    pub host: String,
    /// HTTP port (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Log level used when RUST_LOG is unset (default: info)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirmwareConfig {
    /// Directory holding the `{variant}/current/` trees (default: .)
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Include the diagnostic reason (e.g. the rewritten path) in 404 pages.
    /// Turn off when serving untrusted clients.
    #[serde(default = "default_expose_reasons")]
    pub expose_reasons: bool,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            expose_reasons: default_expose_reasons(),
        }
    }
}

impl AppConfig {
    /// Load config from `FW__`-prefixed environment variables and an optional
    /// `fwredirect.toml` in the working directory. Environment wins.
    pub fn load() -> Result<Self, config::ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name("fwredirect").required(false))
            .add_source(
                config::Environment::default()
                    .prefix("FW")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        cfg.try_deserialize()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_expose_reasons() -> bool {
    true
}
