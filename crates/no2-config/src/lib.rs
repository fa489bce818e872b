//! Environment configuration for the NO₂ prediction server.

use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Error
// ─────────────────────────────────────────────────────────────────────────────

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid port {value:?} in {var}")]
    InvalidPort { var: &'static str, value: String },
}

// ─────────────────────────────────────────────────────────────────────────────
// Variables
// ─────────────────────────────────────────────────────────────────────────────

pub const MODEL_PATH_VAR: &str = "NO2_MODEL_PATH";
pub const HOST_VAR: &str = "NO2_HOST";
pub const PORT_VAR: &str = "NO2_PORT";

pub const DEFAULT_MODEL_PATH: &str = "random_forest_no2_model.json";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

// ─────────────────────────────────────────────────────────────────────────────
// Server Config
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub model_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Reads the process environment. Callers load `.env` beforehand.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let model_path = non_empty(MODEL_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or(defaults.model_path);
        let host = non_empty(HOST_VAR).unwrap_or(defaults.host);
        let port = match non_empty(PORT_VAR) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort {
                var: PORT_VAR,
                value: raw,
            })?,
            None => defaults.port,
        };

        Ok(Self { model_path, host, port })
    }

    /// `host:port` as accepted by `TcpListener::bind`; hostnames resolve there.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
