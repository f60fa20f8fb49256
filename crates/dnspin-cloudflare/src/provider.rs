//! [`DnsProvider`] implementation backed by the Cloudflare API.

use async_trait::async_trait;
use dnspin_core::{
    DesiredRecord, DnsPinError, DnsProvider, ExistingRecord, RecordType, Result, ZoneRef,
};
use tracing::{debug, instrument};

use crate::api::RecordRequest;
use crate::CloudflareClient;

#[async_trait]
impl DnsProvider for CloudflareClient {
    fn name(&self) -> &'static str {
        "cloudflare"
    }

    #[instrument(skip(self), fields(provider = "cloudflare"))]
    async fn find_zone(&self, zone_name: &str) -> Result<ZoneRef> {
        let zone = self.zones().find(zone_name).await?;
        debug!(zone_id = %zone.id, status = ?zone.status, "zone resolved");
        Ok(zone.into())
    }

    #[instrument(skip(self), fields(provider = "cloudflare"))]
    async fn list_records(
        &self,
        zone_id: &str,
        record_type: RecordType,
        name_filter: Option<&str>,
    ) -> Result<Vec<ExistingRecord>> {
        let records = self.dns_records(zone_id).list(record_type, name_filter).await?;
        Ok(records
            .into_iter()
            .filter_map(|r| r.into_existing())
            .filter(|r| r.record_type == record_type)
            .collect())
    }

    #[instrument(skip(self, record), fields(provider = "cloudflare", name = %record.name))]
    async fn create_record(&self, zone_id: &str, record: &DesiredRecord) -> Result<ExistingRecord> {
        let request = RecordRequest::try_from(record)?;
        let created = self.dns_records(zone_id).create(&request).await?;
        created.into_existing().ok_or_else(|| DnsPinError::Provider {
            status: 200,
            message: format!("created record {} came back with an unexpected type", record.name),
        })
    }

    #[instrument(skip(self), fields(provider = "cloudflare"))]
    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        self.dns_records(zone_id).delete(record_id).await
    }
}
