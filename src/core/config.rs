use crate::core::validation::ValidationRules;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_NBP_BASE_URL: &str = "https://api.nbp.pl";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    #[serde(default = "default_cors_allow_origins")]
    pub cors_allow_origins: Vec<String>,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

fn default_cors_allow_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen_addr: default_listen_addr(),
            cors_allow_origins: default_cors_allow_origins(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_NBP_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Accepted currency codes. When absent the provider's table is fetched at startup.
    #[serde(default)]
    pub currencies: Option<Vec<String>>,
    #[serde(default)]
    pub validation: ValidationRules,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("pl", "nbp-rates", "nbp-rates")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
server:
  listen_addr: "0.0.0.0:8080"
  cors_allow_origins:
    - "http://localhost:3000"
provider:
  base_url: "http://example.com/nbp"
  timeout_secs: 3
currencies:
  - usd
  - EUR
validation:
  reject_holidays: false
  data_floor_year: null
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.server.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(
            config.server.cors_allow_origins,
            vec!["http://localhost:3000".to_string()]
        );
        assert_eq!(config.provider.base_url, "http://example.com/nbp");
        assert_eq!(config.provider.timeout(), Duration::from_secs(3));
        assert_eq!(
            config.currencies,
            Some(vec!["usd".to_string(), "EUR".to_string()])
        );
        assert!(!config.validation.reject_holidays);
        assert_eq!(config.validation.data_floor_year, None);
    }

    #[test]
    fn test_empty_sections_use_defaults() {
        let config: AppConfig = serde_yaml::from_str("provider: {}\n").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.provider.base_url, DEFAULT_NBP_BASE_URL);
        assert_eq!(config.server.listen_addr.port(), 5000);
        assert_eq!(config.server.cors_allow_origins, vec!["*".to_string()]);
        assert!(config.currencies.is_none());
        assert!(config.validation.reject_holidays);
        assert_eq!(config.validation.data_floor_year, Some(2002));
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load_from_path(dir.path().join("nope.yaml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
