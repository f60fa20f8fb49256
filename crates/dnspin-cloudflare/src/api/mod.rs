//! API endpoint modules.

mod records;
mod zones;

pub use records::{CloudflareRecord, DnsRecordsApi, RecordRequest, TlsaData};
pub use zones::{CloudflareZone, ZonesApi};
