//! `dnspin mta-sts` - re-issue MTA-STS policy ids and manage TLSRPT records.

use anyhow::{Context as _, Result};
use chrono::Local;
use dnspin::{facts, DnsProvider, Reconciler, Report};
use tracing::warn;

use super::Context;
use crate::cli::args::MtaStsArgs;
use crate::education::Explain;
use crate::output::{self, ZoneResult};

pub async fn execute(ctx: Context, args: MtaStsArgs) -> Result<()> {
    let reporting = facts::tlsrpt_content(args.email.as_deref(), args.url.as_deref()).is_some();

    if ctx.explain {
        Explain::mta_sts(&args.zones, reporting).print();
    }

    let provider = ctx.provider()?;
    let reconciler = Reconciler::new().dry_run(args.dry_run);

    let mut results = Vec::with_capacity(args.zones.len());
    let mut failed = Vec::new();
    for zone in &args.zones {
        let zone = zone.trim_end_matches('.');
        let result = update_zone(&reconciler, &provider, zone, &args).await;
        match &result {
            Ok(report) if report.is_success() => {}
            Ok(_) => failed.push(zone.to_string()),
            Err(e) => {
                warn!(zone, error = %format!("{e:#}"), "zone skipped");
                failed.push(zone.to_string());
            }
        }
        results.push(ZoneResult {
            zone: zone.to_string(),
            result,
        });
    }

    output::print_zone_results(&results, ctx.output_format)?;

    if !failed.is_empty() {
        anyhow::bail!("records could not be fully updated for: {}", failed.join(", "));
    }

    Ok(())
}

async fn update_zone<P>(
    reconciler: &Reconciler,
    provider: &P,
    zone: &str,
    args: &MtaStsArgs,
) -> Result<Report>
where
    P: DnsProvider + ?Sized,
{
    let desired = facts::mail_policy_records(zone, &Local::now(), args.email.as_deref(), args.url.as_deref());
    reconciler
        .reconcile(provider, zone, &desired)
        .await
        .with_context(|| format!("updating mail policy records in zone {zone}"))
}
