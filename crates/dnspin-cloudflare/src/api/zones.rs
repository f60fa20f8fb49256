//! Zone endpoints.

use crate::CloudflareClient;
use dnspin_core::{DnsPinError, Result, ZoneRef};
use serde::{Deserialize, Serialize};

/// Zone as returned by `GET /zones`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudflareZone {
    /// Zone identifier
    pub id: String,

    /// Apex name
    pub name: String,

    /// Activation status (`active`, `pending`, ...)
    #[serde(default)]
    pub status: Option<String>,
}

impl From<CloudflareZone> for ZoneRef {
    fn from(zone: CloudflareZone) -> Self {
        Self::new(zone.id, zone.name)
    }
}

/// Zone endpoints
pub struct ZonesApi<'a> {
    client: &'a CloudflareClient,
}

impl<'a> ZonesApi<'a> {
    pub(crate) const fn new(client: &'a CloudflareClient) -> Self {
        Self { client }
    }

    /// List zones whose name matches exactly
    pub async fn list_by_name(&self, name: &str) -> Result<Vec<CloudflareZone>> {
        let envelope = self
            .client
            .get::<Vec<CloudflareZone>>("/zones", &[("name", name.to_string())])
            .await?;
        Ok(envelope.result.unwrap_or_default())
    }

    /// Look up a single zone by name
    pub async fn find(&self, name: &str) -> Result<CloudflareZone> {
        let wanted = name.trim_end_matches('.');
        self.list_by_name(wanted)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DnsPinError::ZoneNotFound {
                zone: wanted.to_string(),
            })
    }
}
