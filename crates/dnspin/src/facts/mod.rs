//! Fact extractors: turn observed inputs into desired record content.
//!
//! - **Certificate**: public key digest of a PEM certificate
//! - **Mail**: MTA-STS policy id and TLSRPT destinations
//! - **Names**: owner names for TLSA, MTA-STS and TLSRPT records

mod certificate;
mod mail;
mod names;

pub use certificate::*;
pub use mail::*;
pub use names::*;

use chrono::{DateTime, TimeZone};
use dnspin_core::{CertificateDigest, DesiredRecord, DesiredState, RecordType, TlsaContent};

/// `3 1 1 <digest>`: DANE-EE, SubjectPublicKeyInfo, SHA-256.
#[must_use]
pub fn tlsa_content(digest: &CertificateDigest) -> TlsaContent {
    TlsaContent::dane_ee(digest)
}

/// Desired TLSA records for a host served on several ports.
///
/// Duplicate ports collapse to one record.
#[must_use]
pub fn tlsa_records(
    hostname: &str,
    ports: &[u16],
    protocol: Protocol,
    digest: &CertificateDigest,
) -> Vec<DesiredState> {
    let content = tlsa_content(digest).to_string();
    let mut seen = Vec::with_capacity(ports.len());

    ports
        .iter()
        .filter(|port| {
            if seen.contains(*port) {
                false
            } else {
                seen.push(**port);
                true
            }
        })
        .map(|&port| {
            DesiredRecord::new(tlsa_name(port, protocol, hostname), RecordType::Tlsa, content.clone())
                .into()
        })
        .collect()
}

/// Desired MTA-STS and TLSRPT records for one mail domain.
///
/// The TLSRPT entry is delete-only when neither destination is given.
pub fn mail_policy_records<Tz>(
    zone: &str,
    policy_time: &DateTime<Tz>,
    email: Option<&str>,
    url: Option<&str>,
) -> Vec<DesiredState>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    vec![
        DesiredRecord::new(mta_sts_name(zone), RecordType::Txt, mta_sts_content(policy_time)).into(),
        DesiredState::from_content(tlsrpt_name(zone), RecordType::Txt, tlsrpt_content(email, url)),
    ]
}
