//! Cloudflare API token lookup in certbot-style credentials files.
//!
//! Two layouts are accepted:
//!
//! ```ini
//! [cloudflare]
//! dns_cloudflare_api_token = 0123abcd
//! ```
//!
//! or the flat form certbot-dns-cloudflare itself reads:
//!
//! ```ini
//! dns_cloudflare_api_token = 0123abcd
//! ```

use dnspin::{DnsPinError, Result};
use std::path::Path;
use tracing::debug;

/// Where certbot's Cloudflare plugin keeps its credentials
pub const DEFAULT_CREDENTIALS_PATH: &str = "/etc/letsencrypt/cloudflare.ini";

const TOKEN_KEY: &str = "dns_cloudflare_api_token";
const SECTION: &str = "cloudflare";

/// Extract the API token from credentials file contents.
///
/// Keys outside any section and inside `[cloudflare]` count; other
/// sections are ignored. Blank values count as missing.
pub fn parse_api_token(contents: &str) -> Option<String> {
    let mut section: Option<String> = None;

    for line in contents.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = Some(name.trim().to_ascii_lowercase());
            continue;
        }

        if section.as_deref().is_some_and(|s| s != SECTION) {
            continue;
        }

        let Some((key, value)) = line.split_once(['=', ':']) else {
            continue;
        };
        if key.trim().eq_ignore_ascii_case(TOKEN_KEY) {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    None
}

/// Read the API token from a credentials file.
pub fn read_api_token(path: &Path) -> Result<Option<String>> {
    let contents = std::fs::read_to_string(path).map_err(|e| DnsPinError::io(path.display().to_string(), e))?;
    let token = parse_api_token(&contents);
    debug!(path = %path.display(), found = token.is_some(), "read credentials file");
    Ok(token)
}
