//! `dnspin tlsa` - publish TLSA records for a host's current certificate.

use anyhow::{Context as _, Result};
use dnspin::facts::{self, Protocol};
use dnspin::Reconciler;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::info;

use super::Context;
use crate::cli::args::{expand_path, TlsaArgs};
use crate::education::Explain;
use crate::output::{self, OutputFormat};

/// Propagation wait when neither flag nor config sets one
pub const DEFAULT_SLEEP_SECS: u64 = 10;

pub async fn execute(ctx: Context, args: TlsaArgs) -> Result<()> {
    let hostname = args.hostname.trim_end_matches('.').to_string();
    let zone = args
        .zone
        .clone()
        .unwrap_or_else(|| facts::zone_for_hostname(&hostname));

    if ctx.explain {
        Explain::tlsa(&hostname, &args.ports, &zone).print();
    }

    let provider = ctx.provider()?;

    let cert_path = args
        .cert
        .as_deref()
        .map_or_else(|| facts::default_certificate_path(&hostname), expand_path);
    let digest = facts::read_certificate_digest(&cert_path)
        .await
        .with_context(|| format!("reading certificate for {hostname}"))?;
    info!(%hostname, digest = %digest, "certificate public key digest");

    let protocol = if args.udp { Protocol::Udp } else { Protocol::Tcp };
    let desired = facts::tlsa_records(&hostname, &args.ports, protocol, &digest);

    let report = Reconciler::new()
        .dry_run(args.dry_run)
        .reconcile(&provider, &zone, &desired)
        .await
        .with_context(|| format!("updating TLSA records in zone {zone}"))?;

    output::print_report(&report, ctx.output_format)?;

    let sleep_secs = args
        .sleep
        .or(ctx.config.sleep_secs)
        .unwrap_or(DEFAULT_SLEEP_SECS);
    if !args.dry_run && report.applied_count() > 0 && sleep_secs > 0 {
        wait_for_propagation(sleep_secs, ctx.output_format).await;
    }

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} TLSA operations failed in zone {zone}",
            report.failures().count(),
            report.entries.len()
        );
    }

    Ok(())
}

async fn wait_for_propagation(secs: u64, format: OutputFormat) {
    let pb = if format == OutputFormat::Pretty {
        ProgressBar::new(secs)
    } else {
        ProgressBar::hidden()
    };
    if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} waiting for DNS propagation {pos}/{len}s") {
        pb.set_style(style);
    }

    for _ in 0..secs {
        tokio::time::sleep(Duration::from_secs(1)).await;
        pb.inc(1);
    }
    pb.finish_and_clear();
}
