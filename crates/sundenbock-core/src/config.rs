//! Client configuration.
//!
//! Loaded from `~/.config/sundenbock/config.toml`. Every field has a default,
//! so a missing file or a partial file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SundenbockError};

/// Root configuration of the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the backend REST API.
    pub api_base_url: String,
    pub auth: AuthSettings,
    pub paging: PagingSettings,
    pub logging: LoggingSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api/v1".to_string(),
            auth: AuthSettings::default(),
            paging: PagingSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Session and token settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Storage key the token record lives under.
    pub token_key: String,
    /// Seconds before the real expiry at which a token is treated as expired.
    pub expiry_grace_seconds: i64,
    /// Role names that grant administrator capabilities.
    pub admin_roles: Vec<String>,
    /// Role names that identify developers.
    pub developer_roles: Vec<String>,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token_key: "jwt_token".to_string(),
            expiry_grace_seconds: 0,
            admin_roles: vec!["ADMIN".to_string(), "ROLE_ADMIN".to_string()],
            developer_roles: vec!["DEVELOPER".to_string(), "ROLE_DEVELOPER".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingSettings {
    pub default_page_size: u32,
}

impl Default for PagingSettings {
    fn default() -> Self {
        Self {
            default_page_size: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Loads from [`ClientConfig::default_path`].
    pub fn load_default() -> Result<Self> {
        Self::load(&Self::default_path()?)
    }

    /// Returns `<config_dir>/sundenbock/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("sundenbock").join("config.toml"))
            .ok_or_else(|| SundenbockError::config("Cannot determine config directory"))
    }

    fn validate(&self) -> Result<()> {
        if self.auth.token_key.trim().is_empty() {
            return Err(SundenbockError::config("auth.token_key must not be empty"));
        }
        if self.auth.expiry_grace_seconds < 0 {
            return Err(SundenbockError::config(
                "auth.expiry_grace_seconds must not be negative",
            ));
        }
        if self.paging.default_page_size == 0 {
            return Err(SundenbockError::config(
                "paging.default_page_size must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ClientConfig::from_toml_str(
            r#"
            api_base_url = "https://tickets.example.org/api/v1"

            [auth]
            expiry_grace_seconds = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://tickets.example.org/api/v1");
        assert_eq!(config.auth.expiry_grace_seconds, 30);
        assert_eq!(config.auth.token_key, "jwt_token");
        assert_eq!(config.paging.default_page_size, 20);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ClientConfig::load(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[paging]\ndefault_page_size = 50\n").unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.paging.default_page_size, 50);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(ClientConfig::from_toml_str("[auth]\ntoken_key = \"\"\n").is_err());
        assert!(ClientConfig::from_toml_str("[paging]\ndefault_page_size = 0\n").is_err());
        assert!(ClientConfig::from_toml_str("api_base_url = 3").is_err());
    }
}
