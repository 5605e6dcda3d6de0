use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use crate::{connectivity::RouteProbe, fetcher::openweather::DEFAULT_BASE_URL};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "FORECAST_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// base_url = "https://api.openweathermap.org/data/2.5"
/// probe_addrs = ["1.1.1.1:53", "8.8.8.8:53"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeather `appid`.
    pub api_key: Option<String>,

    /// Override for the provider endpoint, mostly useful for testing.
    pub base_url: Option<String>,

    /// Route targets for the connectivity check; defaults to public resolvers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub probe_addrs: Vec<SocketAddr>,
}

impl Config {
    /// Return the API key, or a hint on how to configure one.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty()).ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `forecast configure` or set {API_KEY_ENV}."
            )
        })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Connectivity gate built from `probe_addrs`.
    pub fn route_probe(&self) -> RouteProbe {
        if self.probe_addrs.is_empty() {
            RouteProbe::default()
        } else {
            RouteProbe::new(self.probe_addrs.clone())
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    /// `FORECAST_API_KEY` takes precedence over the stored key.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                cfg.api_key = Some(key);
            }
        }

        Ok(cfg)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "forecast", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_key().unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key(String::new());

        assert!(cfg.api_key().is_err());
    }

    #[test]
    fn set_api_key_is_returned() {
        let mut cfg = Config::default();
        cfg.set_api_key("OPEN_KEY".into());

        assert_eq!(cfg.api_key().expect("key must exist"), "OPEN_KEY");
    }

    #[test]
    fn base_url_defaults_to_openweather() {
        let cfg = Config::default();
        assert_eq!(cfg.base_url(), "https://api.openweathermap.org/data/2.5");
    }

    #[test]
    fn parses_full_toml() {
        let cfg = Config::from_toml(
            r#"
            api_key = "abc"
            base_url = "http://localhost:8080/data/2.5"
            probe_addrs = ["192.0.2.1:53"]
            "#,
        )
        .expect("config should parse");

        assert_eq!(cfg.api_key().expect("key must exist"), "abc");
        assert_eq!(cfg.base_url(), "http://localhost:8080/data/2.5");
        assert_eq!(cfg.probe_addrs, vec!["192.0.2.1:53".parse::<SocketAddr>().unwrap()]);
    }

    #[test]
    fn empty_toml_is_default() {
        let cfg = Config::from_toml("").expect("empty config should parse");
        assert!(cfg.api_key.is_none());
        assert!(cfg.probe_addrs.is_empty());
    }

    #[test]
    fn roundtrips_through_toml() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());

        let text = toml::to_string_pretty(&cfg).expect("config should serialize");
        let parsed = Config::from_toml(&text).expect("config should parse");

        assert_eq!(parsed.api_key.as_deref(), Some("KEY"));
        assert!(parsed.base_url.is_none());
    }

    #[test]
    fn invalid_probe_addr_is_rejected() {
        assert!(Config::from_toml(r#"probe_addrs = ["not-an-addr"]"#).is_err());
    }
}
