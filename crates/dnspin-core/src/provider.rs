//! The DNS provider capability the engine drives.

use async_trait::async_trait;

use crate::{DesiredRecord, ExistingRecord, RecordType, Result, ZoneRef};

/// Zone lookup plus record list/create/delete against a hosted DNS zone.
///
/// Implementations are expected to be synchronous and strongly consistent
/// from the caller's point of view: once a call returns, a following
/// `list_records` reflects it. Timeouts and retries are the
/// implementation's concern.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Short identifier, e.g. `"cloudflare"`
    fn name(&self) -> &'static str;

    /// Resolve a zone by apex name.
    ///
    /// Fails with [`DnsPinError::ZoneNotFound`](crate::DnsPinError::ZoneNotFound)
    /// if the account has no such zone.
    async fn find_zone(&self, zone_name: &str) -> Result<ZoneRef>;

    /// List records of one type, optionally restricted to one name
    async fn list_records(
        &self,
        zone_id: &str,
        record_type: RecordType,
        name_filter: Option<&str>,
    ) -> Result<Vec<ExistingRecord>>;

    /// Create a record, returning it with its provider id
    async fn create_record(&self, zone_id: &str, record: &DesiredRecord) -> Result<ExistingRecord>;

    /// Delete a record by id.
    ///
    /// A record that no longer exists is reported as an error for which
    /// [`DnsPinError::is_not_found`](crate::DnsPinError::is_not_found) holds.
    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()>;
}
