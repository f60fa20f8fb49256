//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

const VERBOSE_FILTER: &str = "warn,dnspin=debug,dnspin_cloudflare=debug,dnspin_cli=debug";

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.no_color);
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration
    let config = Config::load()?;

    // Flag or env beats config
    let output_format = cli.output.or(config.output_format).unwrap_or_default();
    let credentials_path = cli
        .credentials
        .as_deref()
        .or(config.credentials_path.as_deref())
        .map(args::expand_path);

    let ctx = commands::Context {
        api_token: cli.api_token.filter(|t| !t.trim().is_empty()),
        credentials_path,
        api_url: cli.api_url,
        output_format,
        explain: cli.explain,
        config,
    };

    match cli.command {
        Commands::Tlsa(args) => commands::tlsa::execute(ctx, args).await,
        Commands::MtaSts(args) => commands::mta_sts::execute(ctx, args).await,
        Commands::Config(args) => commands::config::execute(ctx, args),
    }
}

/// Log to stderr so reports on stdout stay machine-readable.
///
/// `RUST_LOG` wins unless `--verbose` is given.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed when embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(!no_color)
        .try_init();
}
