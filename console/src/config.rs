//! Console configuration.
//!
//! The only setting is the base URL of the shipments API. It comes from
//! `LOADBOARD_API_URL` (a `.env` file is honored), falling back to
//! [`DEFAULT_API_BASE`].

use std::env;

use crate::error::ConfigError;

/// Default shipments API base URL.
pub const DEFAULT_API_BASE: &str = "http://localhost:4000";

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "LOADBOARD_API_URL";

/// Shipments collection path, relative to the API base.
pub const SHIPMENTS_PATH: &str = "/api/shipments";

/// Runtime configuration for the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    api_base: String,
}

impl ConsoleConfig {
    /// Create a configuration with an explicit API base.
    ///
    /// A trailing `/` is trimmed so paths can be appended directly.
    pub fn new(api_base: impl Into<String>) -> Result<Self, ConfigError> {
        let api_base = api_base.into();
        let trimmed = api_base.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyApiBase);
        }
        Ok(Self { api_base: trimmed.to_string() })
    }

    /// Load from the environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        match env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url),
            _ => Ok(Self::default()),
        }
    }

    /// An explicit base (e.g. a CLI flag) if given, otherwise the environment.
    pub fn resolve(api_base: Option<&str>) -> Result<Self, ConfigError> {
        match api_base {
            Some(url) => Self::new(url),
            None => Self::from_env(),
        }
    }

    /// The API base URL, without trailing slash.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Full URL of the shipments collection.
    pub fn shipments_url(&self) -> String {
        format!("{}{}", self.api_base, SHIPMENTS_PATH)
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { api_base: DEFAULT_API_BASE.to_string() }
    }
}
