//! Configuration management.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cloudflare API token, used when no flag, env var or credentials file provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Credentials file to read instead of /etc/letsencrypt/cloudflare.ini.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_path: Option<String>,

    /// Default output format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,

    /// Default propagation wait for `dnspin tlsa`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_secs: Option<u64>,
}

impl Config {
    /// Get the config file path.
    pub fn path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("io", "dnspin", "dnspin")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Set a key from its string form, as `dnspin config set` does.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_token" | "token" => self.api_token = Some(value.to_string()),
            "credentials_path" | "credentials" => self.credentials_path = Some(value.to_string()),
            "output_format" | "output" => self.output_format = Some(value.parse()?),
            "sleep_secs" | "sleep" => {
                self.sleep_secs = Some(
                    value
                        .parse()
                        .with_context(|| format!("sleep_secs must be a whole number of seconds, got {value:?}"))?,
                );
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}\n\n\
                 Available keys:\n  \
                 api_token        - Cloudflare API token\n  \
                 credentials_path - Credentials file (default /etc/letsencrypt/cloudflare.ini)\n  \
                 output_format    - Default output format (pretty/json/yaml)\n  \
                 sleep_secs       - Propagation wait after TLSA changes"
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("api_token", "abc123").unwrap();
        config.set("output", "json").unwrap();
        config.set("sleep_secs", "30").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_token.as_deref(), Some("abc123"));
        assert_eq!(loaded.output_format, Some(OutputFormat::Json));
        assert_eq!(loaded.sleep_secs, Some(30));
        assert!(loaded.credentials_path.is_none());
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("sleep_secs", "soon").is_err());
        assert!(config.set("output_format", "csv").is_err());
        assert!(config.set("colour", "blue").is_err());
    }
}
