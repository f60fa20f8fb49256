//! Command implementations.

pub mod config;
pub mod mta_sts;
pub mod tlsa;

use anyhow::Context as _;
use dnspin::{CloudflareClient, DnsPinError};
use std::path::PathBuf;
use tracing::debug;

use crate::config::Config;
use crate::credentials::{self, DEFAULT_CREDENTIALS_PATH};
use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Token from `--api-token` or `CLOUDFLARE_API_TOKEN`
    pub api_token: Option<String>,

    /// Credentials file chosen by flag or config
    pub credentials_path: Option<PathBuf>,

    /// Cloudflare API base URL override
    pub api_url: Option<String>,

    /// Output format
    pub output_format: OutputFormat,

    /// Whether to explain commands before running them
    pub explain: bool,

    /// Loaded CLI configuration
    pub config: Config,
}

impl Context {
    /// Resolve the API token: flag/env, then credentials file, then config.
    ///
    /// A credentials file named explicitly must be readable; the default
    /// one is skipped when it does not exist.
    pub fn require_api_token(&self) -> anyhow::Result<String> {
        if let Some(token) = &self.api_token {
            debug!("using API token from command line or environment");
            return Ok(token.clone());
        }

        let (path, explicit) = match &self.credentials_path {
            Some(path) => (path.clone(), true),
            None => (PathBuf::from(DEFAULT_CREDENTIALS_PATH), false),
        };
        if explicit || path.exists() {
            let token = credentials::read_api_token(&path)
                .with_context(|| format!("reading credentials from {}", path.display()))?;
            if let Some(token) = token {
                return Ok(token);
            }
        }

        if let Some(token) = self.config.api_token.as_ref().filter(|t| !t.trim().is_empty()) {
            debug!("using API token from config file");
            return Ok(token.clone());
        }

        Err(DnsPinError::MissingCredential.into())
    }

    /// Create a Cloudflare client with the resolved token.
    pub fn provider(&self) -> anyhow::Result<CloudflareClient> {
        let token = self.require_api_token()?;
        let mut builder = CloudflareClient::builder(token)
            .user_agent(concat!("dnspin/", env!("CARGO_PKG_VERSION")));
        if let Some(url) = &self.api_url {
            builder = builder.base_url(url.clone());
        }
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn context(api_token: Option<&str>, credentials_path: Option<PathBuf>, config_token: Option<&str>) -> Context {
        Context {
            api_token: api_token.map(str::to_string),
            credentials_path,
            api_url: None,
            output_format: OutputFormat::Pretty,
            explain: false,
            config: Config {
                api_token: config_token.map(str::to_string),
                ..Config::default()
            },
        }
    }

    fn credentials_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_flag_wins() {
        let file = credentials_file("dns_cloudflare_api_token = from-file\n");
        let ctx = context(Some("from-flag"), Some(file.path().to_path_buf()), Some("from-config"));
        assert_eq!(ctx.require_api_token().unwrap(), "from-flag");
    }

    #[test]
    fn test_credentials_file_before_config() {
        let file = credentials_file("[cloudflare]\ndns_cloudflare_api_token = from-file\n");
        let ctx = context(None, Some(file.path().to_path_buf()), Some("from-config"));
        assert_eq!(ctx.require_api_token().unwrap(), "from-file");
    }

    #[test]
    fn test_config_fallback() {
        let file = credentials_file("dns_cloudflare_email = someone@example.com\n");
        let ctx = context(None, Some(file.path().to_path_buf()), Some("from-config"));
        assert_eq!(ctx.require_api_token().unwrap(), "from-config");
    }

    #[test]
    fn test_missing_everywhere() {
        let file = credentials_file("");
        let ctx = context(None, Some(file.path().to_path_buf()), None);
        let err = ctx.require_api_token().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DnsPinError>(),
            Some(DnsPinError::MissingCredential)
        ));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(None, Some(dir.path().join("nope.ini")), Some("from-config"));
        assert!(ctx.require_api_token().is_err());
    }
}
