//! Dispatcher configuration loading.
//!
//! TOML is the sole config source; no environment variable overrides, no
//! auth section (auth is an explicit non-goal of the core fabric).
//! Default config path: `/etc/dispatcher/dispatcher.toml`.
//!
//! # Required fields
//! none — every field has a built-in default, so a missing or empty file
//! still produces a usable config. Values present in the file override the
//! defaults one field at a time.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Config type
// ---------------------------------------------------------------------------

/// Top-level dispatcher configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatcherConfig {
    pub host: String,
    pub http_port: u16,
    pub tcp_port: u16,
    pub request_timeout: Duration,
    pub max_frame_bytes: u32,
}

impl DispatcherConfig {
    pub fn http_bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    pub fn tcp_bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.tcp_port)
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            http_port: 8080,
            tcp_port: 8081,
            request_timeout: Duration::from_secs(10),
            max_frame_bytes: dispatch_protocol::DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

// ---------------------------------------------------------------------------
// Raw TOML deserialization type (all fields optional; defaults fill gaps)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    host: Option<String>,
    http_port: Option<u16>,
    tcp_port: Option<u16>,
    request_timeout_secs: Option<u64>,
    max_frame_bytes: Option<u32>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load dispatcher config from a custom path.
pub fn load_config_from_path(path: &Path) -> Result<DispatcherConfig, ConfigError> {
    let toml_str = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("reading config file '{}': {}", path.display(), e)))?;
    load_config_from_str(&toml_str)
}

/// Load dispatcher config from the default path `/etc/dispatcher/dispatcher.toml`,
/// falling back to built-in defaults if the file does not exist.
pub fn load_config() -> Result<DispatcherConfig, ConfigError> {
    let path = Path::new("/etc/dispatcher/dispatcher.toml");
    if !path.exists() {
        return Ok(DispatcherConfig::default());
    }
    load_config_from_path(path)
}

/// Load dispatcher config from a TOML string.
pub fn load_config_from_str(toml_str: &str) -> Result<DispatcherConfig, ConfigError> {
    let raw: RawConfig = toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
    let defaults = DispatcherConfig::default();

    if raw.http_port.is_some_and(|p| p == 0) {
        return Err(ConfigError::InvalidValue("http_port must not be 0".to_owned()));
    }
    if raw.tcp_port.is_some_and(|p| p == 0) {
        return Err(ConfigError::InvalidValue("tcp_port must not be 0".to_owned()));
    }
    if raw.http_port.is_some() && raw.tcp_port.is_some() && raw.http_port == raw.tcp_port {
        return Err(ConfigError::InvalidValue(
            "http_port and tcp_port must differ".to_owned(),
        ));
    }
    if raw.max_frame_bytes.is_some_and(|n| n == 0) {
        return Err(ConfigError::InvalidValue("max_frame_bytes must not be 0".to_owned()));
    }

    Ok(DispatcherConfig {
        host: raw.host.unwrap_or(defaults.host),
        http_port: raw.http_port.unwrap_or(defaults.http_port),
        tcp_port: raw.tcp_port.unwrap_or(defaults.tcp_port),
        request_timeout: raw
            .request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout),
        max_frame_bytes: raw.max_frame_bytes.unwrap_or(defaults.max_frame_bytes),
    })
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}
