//! Public key digests for TLSA `3 1 1` records.

use dnspin_core::{CertificateDigest, DnsPinError, Result};
use ring::digest::{digest, SHA256};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory certbot keeps live certificates in
const LETSENCRYPT_LIVE_DIR: &str = "/etc/letsencrypt/live";

/// Where certbot puts the leaf certificate for `hostname`.
#[must_use]
pub fn default_certificate_path(hostname: &str) -> PathBuf {
    Path::new(LETSENCRYPT_LIVE_DIR)
        .join(hostname.trim_end_matches('.'))
        .join("cert.pem")
}

/// SHA-256 of the DER-encoded SubjectPublicKeyInfo of the first
/// certificate in `pem_bytes`.
///
/// Only the public key is hashed, so a renewal that keeps the key keeps
/// the digest.
///
/// # Errors
///
/// Returns `DnsPinError::CertificateParse` if the input holds no PEM
/// certificate or the DER does not decode. Keys x509-parser has no
/// structured form for (Ed25519, Ed448) are hashed like any other.
pub fn certificate_digest(pem_bytes: &[u8]) -> Result<CertificateDigest> {
    let blocks =
        pem::parse_many(pem_bytes).map_err(|e| DnsPinError::CertificateParse(e.to_string()))?;

    let block = blocks
        .iter()
        .find(|p| p.tag() == "CERTIFICATE")
        .ok_or_else(|| DnsPinError::CertificateParse("no CERTIFICATE block found".to_string()))?;

    let (_, cert) = x509_parser::parse_x509_certificate(block.contents())
        .map_err(|e| DnsPinError::CertificateParse(e.to_string()))?;

    let spki = cert.public_key();
    if let Err(e) = spki.parsed() {
        return Err(DnsPinError::CertificateParse(e.to_string()));
    }

    debug!(
        subject = %cert.subject(),
        algorithm = %spki.algorithm.algorithm,
        spki_len = spki.raw.len(),
        "hashing certificate public key"
    );
    spki_digest(spki.raw)
}

/// SHA-256 of raw SubjectPublicKeyInfo DER.
pub fn spki_digest(spki_der: &[u8]) -> Result<CertificateDigest> {
    let hash = digest(&SHA256, spki_der);
    CertificateDigest::from_hex(&hex::encode(hash.as_ref()))
}

/// Read a PEM file and digest its certificate's public key.
pub async fn read_certificate_digest(path: &Path) -> Result<CertificateDigest> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| DnsPinError::io(path.display().to_string(), e))?;
    certificate_digest(&bytes)
}
