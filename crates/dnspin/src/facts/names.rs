//! Owner names of the records dnspin manages.

use serde::{Deserialize, Serialize};

/// Transport protocol label of a TLSA owner name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// TCP protocol
    #[default]
    Tcp,
    /// UDP protocol
    Udp,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tcp => write!(f, "tcp"),
            Self::Udp => write!(f, "udp"),
        }
    }
}

/// `_<port>._<protocol>.<hostname>`
#[must_use]
pub fn tlsa_name(port: u16, protocol: Protocol, hostname: &str) -> String {
    format!("_{port}._{protocol}.{}", hostname.trim_end_matches('.'))
}

/// `_mta-sts.<zone>`
#[must_use]
pub fn mta_sts_name(zone: &str) -> String {
    format!("_mta-sts.{}", zone.trim_end_matches('.'))
}

/// `_smtp._tls.<zone>`
#[must_use]
pub fn tlsrpt_name(zone: &str) -> String {
    format!("_smtp._tls.{}", zone.trim_end_matches('.'))
}

/// Zone a hostname lives in, taken as its last two labels.
///
/// This does not consult the public suffix list: `mail.example.co.uk`
/// maps to `co.uk`, so such hosts need an explicit zone.
#[must_use]
pub fn zone_for_hostname(hostname: &str) -> String {
    let labels: Vec<&str> = hostname
        .trim_end_matches('.')
        .split('.')
        .filter(|l| !l.is_empty())
        .collect();
    let start = labels.len().saturating_sub(2);
    labels[start..].join(".")
}
