use serde::{Deserialize, Serialize};

/// TTL value meaning "let the provider choose" (Cloudflare's automatic TTL)
pub const AUTO_TTL: u32 = 1;

/// DNS record types managed by dnspin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// DANE certificate association
    Tlsa,
    /// Text record (MTA-STS, TLSRPT)
    Txt,
}

impl RecordType {
    /// Wire name of the record type as providers expect it
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tlsa => "TLSA",
            Self::Txt => "TXT",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordType {
    type Err = crate::DnsPinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TLSA" => Ok(Self::Tlsa),
            "TXT" => Ok(Self::Txt),
            other => Err(crate::DnsPinError::Config(format!(
                "unsupported record type: {other}"
            ))),
        }
    }
}

/// Normalize a DNS name for comparison: lowercase, no trailing dot.
#[must_use]
pub fn name_key(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

/// A record as it should exist in the zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredRecord {
    /// Fully-qualified record name
    pub name: String,

    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Record content in presentation format
    pub content: String,

    /// TTL in seconds, or [`AUTO_TTL`]
    pub ttl: u32,
}

impl DesiredRecord {
    /// Create a desired record with automatic TTL
    #[must_use]
    pub fn new(name: impl Into<String>, record_type: RecordType, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_type,
            content: content.into(),
            ttl: AUTO_TTL,
        }
    }

    /// Override the TTL
    #[must_use]
    pub const fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }
}

/// A record currently stored by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingRecord {
    /// Provider-assigned identifier
    pub id: String,

    /// Fully-qualified record name
    pub name: String,

    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Record content in presentation format
    pub content: String,
}

impl ExistingRecord {
    /// Returns true if this record sits at `name` (case-insensitive)
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        name_key(&self.name) == name_key(name)
    }
}

/// What should exist at one managed name.
///
/// `Absent` is the delete-only signal: any record of that type at that
/// name is removed and nothing is created in its place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DesiredState {
    /// Exactly this record should exist
    Present(DesiredRecord),
    /// No record of this type should exist at this name
    Absent {
        /// Fully-qualified record name
        name: String,
        /// Record type
        #[serde(rename = "type")]
        record_type: RecordType,
    },
}

impl DesiredState {
    /// Build a delete-only entry
    #[must_use]
    pub fn absent(name: impl Into<String>, record_type: RecordType) -> Self {
        Self::Absent {
            name: name.into(),
            record_type,
        }
    }

    /// Build from an optional content value: `None` means delete-only.
    #[must_use]
    pub fn from_content(name: impl Into<String>, record_type: RecordType, content: Option<String>) -> Self {
        match content {
            Some(content) => Self::Present(DesiredRecord::new(name, record_type, content)),
            None => Self::absent(name, record_type),
        }
    }

    /// Record name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Present(record) => &record.name,
            Self::Absent { name, .. } => name,
        }
    }

    /// Record type
    #[must_use]
    pub const fn record_type(&self) -> RecordType {
        match self {
            Self::Present(record) => record.record_type,
            Self::Absent { record_type, .. } => *record_type,
        }
    }
}

impl From<DesiredRecord> for DesiredState {
    fn from(record: DesiredRecord) -> Self {
        Self::Present(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_key_ignores_case_and_trailing_dot() {
        assert_eq!(name_key("_443._TCP.Example.COM."), "_443._tcp.example.com");
        assert_eq!(name_key("example.com"), "example.com");
    }

    #[test]
    fn test_existing_record_is_named() {
        let record = ExistingRecord {
            id: "1".into(),
            name: "_mta-sts.Example.com".into(),
            record_type: RecordType::Txt,
            content: "v=STSv1; id=1".into(),
        };
        assert!(record.is_named("_mta-sts.example.com."));
        assert!(!record.is_named("_smtp._tls.example.com"));
    }

    #[test]
    fn test_desired_state_from_content() {
        let present = DesiredState::from_content("a.example.com", RecordType::Txt, Some("x".into()));
        assert!(matches!(present, DesiredState::Present(ref r) if r.content == "x"));

        let absent = DesiredState::from_content("a.example.com", RecordType::Txt, None);
        assert_eq!(absent.name(), "a.example.com");
        assert_eq!(absent.record_type(), RecordType::Txt);
        assert!(matches!(absent, DesiredState::Absent { .. }));
    }

    #[test]
    fn test_record_type_serde() {
        assert_eq!(serde_json::to_string(&RecordType::Tlsa).unwrap(), "\"TLSA\"");
        let parsed: RecordType = serde_json::from_str("\"TXT\"").unwrap();
        assert_eq!(parsed, RecordType::Txt);
        assert_eq!("tlsa".parse::<RecordType>().unwrap(), RecordType::Tlsa);
        assert!("MX".parse::<RecordType>().is_err());
    }
}
