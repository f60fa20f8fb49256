//! Apply a plan through a [`DnsProvider`].

use dnspin_core::{
    DesiredState, DnsPinError, DnsProvider, ExistingRecord, Operation, Outcome, Plan, RecordType,
    Report, Result, ZoneRef,
};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

use crate::planner;

/// Drives plans against a provider, one operation at a time.
///
/// A failing operation never stops the ones after it; every operation
/// gets a [`Report`] entry. Nothing is re-read after applying.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    dry_run: bool,
}

impl Reconciler {
    /// Reconciler that applies changes
    #[must_use]
    pub const fn new() -> Self {
        Self { dry_run: false }
    }

    /// Report every change as skipped instead of calling the provider
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Resolve the zone, fetch current records, plan and apply.
    ///
    /// Zone lookup and listing failures abort with an error; failures of
    /// individual operations end up in the report.
    #[instrument(skip(self, provider, desired), fields(provider = provider.name()))]
    pub async fn reconcile<P>(&self, provider: &P, zone_name: &str, desired: &[DesiredState]) -> Result<Report>
    where
        P: DnsProvider + ?Sized,
    {
        let zone = provider.find_zone(zone_name).await?;
        let current = current_records(provider, &zone, desired).await?;
        let plan = planner::plan(desired, &current);
        Ok(self.apply(&zone, &plan, provider).await)
    }

    /// Execute `plan` in order against `zone`.
    pub async fn apply<P>(&self, zone: &ZoneRef, plan: &Plan, provider: &P) -> Report
    where
        P: DnsProvider + ?Sized,
    {
        let mut report = Report::for_zone(&zone.name);

        for operation in plan {
            let outcome = if self.dry_run && operation.is_mutation() {
                info!(zone = %zone.name, "dry run: would {operation}");
                Outcome::Skipped
            } else {
                apply_one(zone, operation, provider).await
            };
            report.push(operation.clone(), outcome);
        }

        report
    }
}

/// Execute `plan` against `zone` with a default [`Reconciler`].
pub async fn apply<P>(zone: &ZoneRef, plan: &Plan, provider: &P) -> Report
where
    P: DnsProvider + ?Sized,
{
    Reconciler::new().apply(zone, plan, provider).await
}

/// Fetch the records that `desired` could touch.
///
/// Types with a single desired name are listed by name; types with
/// several names are listed whole.
pub async fn current_records<P>(provider: &P, zone: &ZoneRef, desired: &[DesiredState]) -> Result<Vec<ExistingRecord>>
where
    P: DnsProvider + ?Sized,
{
    let mut names_by_type: BTreeMap<&'static str, (RecordType, Vec<String>)> = BTreeMap::new();
    for entry in desired {
        let (_, names) = names_by_type
            .entry(entry.record_type().as_str())
            .or_insert_with(|| (entry.record_type(), Vec::new()));
        let key = dnspin_core::name_key(entry.name());
        if !names.contains(&key) {
            names.push(key);
        }
    }

    let mut current = Vec::new();
    for (record_type, names) in names_by_type.into_values() {
        let filter = match names.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        };
        let records = provider.list_records(&zone.id, record_type, filter).await?;
        debug!(zone = %zone.name, %record_type, count = records.len(), "fetched current records");
        current.extend(records);
    }

    Ok(current)
}

async fn apply_one<P>(zone: &ZoneRef, operation: &Operation, provider: &P) -> Outcome
where
    P: DnsProvider + ?Sized,
{
    match operation {
        Operation::NoOp { name } => {
            info!(zone = %zone.name, name = %name, "record is up to date");
            Outcome::Skipped
        }

        Operation::Create(record) => match provider.create_record(&zone.id, record).await {
            Ok(created) => {
                info!(zone = %zone.name, name = %record.name, id = %created.id, "created {} record", record.record_type);
                Outcome::Applied
            }
            Err(e) => {
                warn!(zone = %zone.name, name = %record.name, error = %e, "create failed");
                Outcome::Failed(e.to_string())
            }
        },

        Operation::Delete { id, name } => match delete_idempotent(zone, id, provider).await {
            Ok(()) => {
                info!(zone = %zone.name, name = %name, id = %id, "deleted record");
                Outcome::Applied
            }
            Err(e) => {
                warn!(zone = %zone.name, name = %name, id = %id, error = %e, "delete failed");
                Outcome::Failed(e.to_string())
            }
        },

        Operation::Update { id, record } => {
            if let Err(e) = delete_idempotent(zone, id, provider).await {
                warn!(zone = %zone.name, name = %record.name, id = %id, error = %e, "delete of outdated record failed, not creating replacement");
                return Outcome::Failed(format!("could not delete outdated record {id}: {e}"));
            }

            match provider.create_record(&zone.id, record).await {
                Ok(created) => {
                    info!(zone = %zone.name, name = %record.name, old_id = %id, id = %created.id, "updated {} record", record.record_type);
                    Outcome::Applied
                }
                Err(e) => {
                    let partial = DnsPinError::PartialUpdateFailure {
                        name: record.name.clone(),
                        record_id: id.clone(),
                        source: Box::new(e),
                    };
                    warn!(zone = %zone.name, error = %partial, "update left name without a record");
                    Outcome::Failed(partial.to_string())
                }
            }
        }
    }
}

/// Delete a record, treating "already gone" as success.
async fn delete_idempotent<P>(zone: &ZoneRef, record_id: &str, provider: &P) -> Result<()>
where
    P: DnsProvider + ?Sized,
{
    match provider.delete_record(&zone.id, record_id).await {
        Err(e) if e.is_not_found() => {
            warn!(zone = %zone.name, id = %record_id, "record already deleted");
            Ok(())
        }
        other => other,
    }
}
