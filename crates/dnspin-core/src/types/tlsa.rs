//! TLSA record content (RFC 6698).

use serde::{Deserialize, Serialize};

/// Certificate usage 3: DANE-EE, the key must match the end-entity certificate.
pub const USAGE_DANE_EE: u8 = 3;

/// Selector 1: match the SubjectPublicKeyInfo rather than the full certificate.
pub const SELECTOR_SPKI: u8 = 1;

/// Matching type 1: SHA-256 of the selected data.
pub const MATCHING_SHA256: u8 = 1;

/// SHA-256 digest of a certificate's DER-encoded public key, lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateDigest(String);

impl CertificateDigest {
    /// Length of a hex-encoded SHA-256 digest
    pub const HEX_LEN: usize = 64;

    /// Accept an already hex-encoded digest.
    ///
    /// Upper-case input is lowercased; anything that is not 64 hex digits
    /// is rejected.
    pub fn from_hex(hex: &str) -> crate::Result<Self> {
        if hex.len() != Self::HEX_LEN || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(crate::DnsPinError::CertificateParse(format!(
                "expected {} hex digits, got {hex:?}",
                Self::HEX_LEN
            )));
        }
        Ok(Self(hex.to_ascii_lowercase()))
    }

    /// Hex string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CertificateDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parsed TLSA record data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsaContent {
    /// Certificate usage field
    pub usage: u8,
    /// Selector field
    pub selector: u8,
    /// Matching type field
    pub matching_type: u8,
    /// Certificate association data, hex
    pub certificate: String,
}

impl TlsaContent {
    /// DANE-EE / SPKI / SHA-256 association for a public key digest
    #[must_use]
    pub fn dane_ee(digest: &CertificateDigest) -> Self {
        Self {
            usage: USAGE_DANE_EE,
            selector: SELECTOR_SPKI,
            matching_type: MATCHING_SHA256,
            certificate: digest.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for TlsaContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.usage, self.selector, self.matching_type, self.certificate
        )
    }
}

impl std::str::FromStr for TlsaContent {
    type Err = crate::DnsPinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || crate::DnsPinError::Config(format!("invalid TLSA content: {s:?}"));

        let fields: Vec<&str> = s.split_whitespace().collect();
        let [usage, selector, matching_type, certificate] = fields.as_slice() else {
            return Err(invalid());
        };

        Ok(Self {
            usage: usage.parse().map_err(|_| invalid())?,
            selector: selector.parse().map_err(|_| invalid())?,
            matching_type: matching_type.parse().map_err(|_| invalid())?,
            certificate: (*certificate).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "087e1141d0c3647df52e8e591eb98da75a8321d4ec3782f0c81247b131353c46";

    #[test]
    fn test_dane_ee_formatting() {
        let digest = CertificateDigest::from_hex(DIGEST).unwrap();
        let content = TlsaContent::dane_ee(&digest);
        assert_eq!(content.to_string(), format!("3 1 1 {DIGEST}"));
    }

    #[test]
    fn test_parse_round_trip() {
        let parsed: TlsaContent = format!("3 1 1 {DIGEST}").parse().unwrap();
        assert_eq!(parsed.usage, 3);
        assert_eq!(parsed.selector, 1);
        assert_eq!(parsed.matching_type, 1);
        assert_eq!(parsed.certificate, DIGEST);
    }

    #[test]
    fn test_parse_rejects_wrong_arity() {
        assert!("3 1 1".parse::<TlsaContent>().is_err());
        assert!("3 1 1 aa bb".parse::<TlsaContent>().is_err());
        assert!("x 1 1 aa".parse::<TlsaContent>().is_err());
    }

    #[test]
    fn test_digest_validation() {
        let upper = CertificateDigest::from_hex(&DIGEST.to_uppercase()).unwrap();
        assert_eq!(upper.as_str(), DIGEST);
        assert!(CertificateDigest::from_hex("abc").is_err());
        assert!(CertificateDigest::from_hex(&"g".repeat(64)).is_err());
    }
}
