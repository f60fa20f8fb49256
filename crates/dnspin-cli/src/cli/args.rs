//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Keep DANE and mail transport security records current
///
/// Derives TLSA, MTA-STS and TLSRPT records from your certificates and
/// settings and brings your Cloudflare zones in line with them.
/// Use --explain on any command to see what it will do.
#[derive(Parser, Debug)]
#[command(name = "dnspin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Cloudflare API token (or set CLOUDFLARE_API_TOKEN)
    #[arg(short = 't', long, env = "CLOUDFLARE_API_TOKEN", global = true, hide_env_values = true)]
    pub api_token: Option<String>,

    /// Credentials file holding dns_cloudflare_api_token
    #[arg(long, value_name = "PATH", global = true)]
    pub credentials: Option<String>,

    /// Cloudflare API base URL
    #[arg(long, env = "DNSPIN_API_URL", global = true, hide = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Explain what this command does before doing it
    #[arg(long, global = true)]
    pub explain: bool,

    /// Log provider calls to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish TLSA records for a host's current certificate
    Tlsa(TlsaArgs),

    /// Re-issue MTA-STS policy ids and manage TLSRPT records
    #[command(name = "mta-sts")]
    MtaSts(MtaStsArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// TLSA command
// ============================================================================

#[derive(Args, Debug)]
pub struct TlsaArgs {
    /// Host the certificate was issued for (e.g. mail.example.com)
    #[arg(long)]
    pub hostname: String,

    /// Port the host serves TLS on (repeat for several ports)
    #[arg(short, long = "port", value_name = "PORT", required = true)]
    pub ports: Vec<u16>,

    /// Publish records for UDP instead of TCP
    #[arg(long)]
    pub udp: bool,

    /// Seconds to wait for propagation after changes (default: 10)
    #[arg(short, long, value_name = "SECS")]
    pub sleep: Option<u64>,

    /// Zone holding the records (default: last two labels of the hostname)
    #[arg(long)]
    pub zone: Option<String>,

    /// Certificate to publish (default: /etc/letsencrypt/live/<hostname>/cert.pem)
    #[arg(long, value_name = "PATH")]
    pub cert: Option<String>,

    /// Show what would change without touching DNS
    #[arg(long)]
    pub dry_run: bool,
}

// ============================================================================
// MTA-STS command
// ============================================================================

#[derive(Args, Debug)]
pub struct MtaStsArgs {
    /// Mail domains (zones) to update
    #[arg(required = true, value_name = "ZONE")]
    pub zones: Vec<String>,

    /// Mailbox that receives TLS reports
    #[arg(long)]
    pub email: Option<String>,

    /// HTTPS endpoint that receives TLS reports (without the https: prefix)
    #[arg(long)]
    pub url: Option<String>,

    /// Show what would change without touching DNS
    #[arg(long)]
    pub dry_run: bool,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Key to set (api_token, credentials_path, output_format, sleep_secs)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show config file path
    Path,
}

/// Expand `~` and environment variables in a user-supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    shellexpand::full(raw).map_or_else(|_| PathBuf::from(raw), |p| PathBuf::from(p.as_ref()))
}
