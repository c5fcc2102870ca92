//! TOML-based configuration for nlsql.
//!
//! Example configuration:
//! ```toml
//! [endpoints]
//! translation_url = "https://tc7j4z5zyb.execute-api.us-east-1.amazonaws.com"
//! scoring_url = "https://tc7j4z5zyb.execute-api.us-east-1.amazonaws.com"
//! timeout_secs = 30
//!
//! [server]
//! port = 3000
//! ```
//!
//! Every field has a default, so running without a config file targets the
//! stock hosted endpoints.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Hosted endpoint configuration.
    pub endpoints: EndpointSettings,

    /// Workbench server configuration.
    pub server: ServerSettings,
}

/// Hosted endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointSettings {
    /// Base URL of the translation host (`/{base,finetuned}` routes).
    pub translation_url: String,

    /// Base URL of the scoring host (`/bleu` route).
    pub scoring_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// The stock hosted endpoint both remote services are deployed behind.
const DEFAULT_ENDPOINT_HOST: &str = "https://tc7j4z5zyb.execute-api.us-east-1.amazonaws.com";

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            translation_url: DEFAULT_ENDPOINT_HOST.to_string(),
            scoring_url: DEFAULT_ENDPOINT_HOST.to_string(),
            timeout_secs: 30,
        }
    }
}

impl EndpointSettings {
    /// Per-request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Workbench server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Port the workbench API listens on.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `NLSQL_CONFIG`
    /// 2. `./nlsql.toml`
    /// 3. `~/.config/nlsql/config.toml`
    ///
    /// Falls back to defaults when no file is found.
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("NLSQL_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("nlsql.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("nlsql").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.endpoints.translation_url, DEFAULT_ENDPOINT_HOST);
        assert_eq!(settings.endpoints.scoring_url, DEFAULT_ENDPOINT_HOST);
        assert_eq!(settings.endpoints.timeout_secs, 30);
        assert_eq!(settings.server.port, 3000);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[endpoints]
translation_url = "http://localhost:9000"
timeout_secs = 5

[server]
port = 8123
"#;

        let settings: Settings = toml::from_str(toml).unwrap();

        assert_eq!(settings.endpoints.translation_url, "http://localhost:9000");
        // Unset fields keep their defaults.
        assert_eq!(settings.endpoints.scoring_url, DEFAULT_ENDPOINT_HOST);
        assert_eq!(settings.endpoints.timeout(), Duration::from_secs(5));
        assert_eq!(settings.server.port, 8123);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = Settings::from_file("/nonexistent/nlsql.toml");
        assert!(matches!(result, Err(SettingsError::FileNotFound(_))));
    }
}
