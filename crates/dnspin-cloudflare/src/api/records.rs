//! DNS record endpoints.

use crate::CloudflareClient;
use dnspin_core::{DesiredRecord, ExistingRecord, RecordType, Result, TlsaContent};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Page size for record listing
const PER_PAGE: u32 = 100;

/// Record as returned by the DNS records endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudflareRecord {
    /// Record identifier
    pub id: String,

    /// Fully-qualified name
    pub name: String,

    /// Record type as a string (`TLSA`, `TXT`, `A`, ...)
    #[serde(rename = "type")]
    pub record_type: String,

    /// Presentation-format content
    #[serde(default)]
    pub content: String,

    /// TTL (1 = automatic)
    #[serde(default)]
    pub ttl: u32,
}

impl CloudflareRecord {
    /// Convert into the engine's record type.
    ///
    /// Returns `None` for record types dnspin does not manage. TXT content
    /// is unquoted, since Cloudflare may echo it back wrapped in quotes.
    #[must_use]
    pub fn into_existing(self) -> Option<ExistingRecord> {
        let record_type: RecordType = self.record_type.parse().ok()?;
        let content = match record_type {
            RecordType::Txt => unquote(&self.content).to_string(),
            RecordType::Tlsa => self.content,
        };
        Some(ExistingRecord {
            id: self.id,
            name: self.name,
            record_type,
            content,
        })
    }
}

fn unquote(content: &str) -> &str {
    content
        .strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .filter(|inner| !inner.contains('"'))
        .unwrap_or(content)
}

/// Structured TLSA body Cloudflare requires on create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsaData {
    /// Certificate usage
    pub usage: u8,
    /// Selector
    pub selector: u8,
    /// Matching type
    pub matching_type: u8,
    /// Association data, hex
    pub certificate: String,
}

impl From<TlsaContent> for TlsaData {
    fn from(tlsa: TlsaContent) -> Self {
        Self {
            usage: tlsa.usage,
            selector: tlsa.selector,
            matching_type: tlsa.matching_type,
            certificate: tlsa.certificate,
        }
    }
}

/// Body of `POST /zones/{id}/dns_records`
#[derive(Debug, Clone, Serialize)]
pub struct RecordRequest {
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Fully-qualified name
    pub name: String,
    /// Presentation-format content
    pub content: String,
    /// TTL (1 = automatic)
    pub ttl: u32,
    /// Structured TLSA fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<TlsaData>,
}

impl TryFrom<&DesiredRecord> for RecordRequest {
    type Error = dnspin_core::DnsPinError;

    fn try_from(record: &DesiredRecord) -> Result<Self> {
        let data = match record.record_type {
            RecordType::Tlsa => Some(record.content.parse::<TlsaContent>()?.into()),
            RecordType::Txt => None,
        };
        Ok(Self {
            record_type: record.record_type,
            name: record.name.clone(),
            content: record.content.clone(),
            ttl: record.ttl,
            data,
        })
    }
}

#[derive(Debug, Deserialize)]
struct DeletedRecord {
    id: String,
}

/// DNS record endpoints of a single zone
pub struct DnsRecordsApi<'a> {
    client: &'a CloudflareClient,
    zone_id: &'a str,
}

impl<'a> DnsRecordsApi<'a> {
    pub(crate) const fn new(client: &'a CloudflareClient, zone_id: &'a str) -> Self {
        Self { client, zone_id }
    }

    fn collection_path(&self) -> String {
        format!("/zones/{}/dns_records", self.zone_id)
    }

    /// List all records of a type, following pagination
    pub async fn list(
        &self,
        record_type: RecordType,
        name: Option<&str>,
    ) -> Result<Vec<CloudflareRecord>> {
        let path = self.collection_path();
        let mut records = Vec::new();
        let mut page = 1u32;

        loop {
            let mut params = vec![
                ("type", record_type.as_str().to_string()),
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
            ];
            if let Some(name) = name {
                params.push(("name", name.trim_end_matches('.').to_string()));
            }

            let envelope = self
                .client
                .get::<Vec<CloudflareRecord>>(&path, &params)
                .await?;
            records.extend(envelope.result.unwrap_or_default());

            match envelope.result_info {
                Some(info) if page < info.total_pages => {
                    debug!(page, total_pages = info.total_pages, "fetching next record page");
                    page += 1;
                }
                _ => break,
            }
        }

        Ok(records)
    }

    /// Create a record
    pub async fn create(&self, request: &RecordRequest) -> Result<CloudflareRecord> {
        let envelope = self
            .client
            .post::<CloudflareRecord, _>(&self.collection_path(), request)
            .await?;
        envelope.result.ok_or_else(|| dnspin_core::DnsPinError::Provider {
            status: 200,
            message: "create succeeded without returning a record".to_string(),
        })
    }

    /// Delete a record by id
    pub async fn delete(&self, record_id: &str) -> Result<()> {
        let path = format!("{}/{record_id}", self.collection_path());
        let envelope = self.client.delete::<DeletedRecord>(&path).await?;
        if let Some(deleted) = envelope.result {
            debug!(id = %deleted.id, "record deleted");
        }
        Ok(())
    }
}
