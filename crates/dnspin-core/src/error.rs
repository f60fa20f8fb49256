use std::time::Duration;
use thiserror::Error;

/// Result type alias for dnspin operations
pub type Result<T> = std::result::Result<T, DnsPinError>;

/// Errors that can occur while deriving, planning or applying DNS records
#[derive(Error, Debug)]
pub enum DnsPinError {
    /// No API token could be found in any credential source
    #[error("no API token found: pass --api-token, set CLOUDFLARE_API_TOKEN or add it to the credentials file")]
    MissingCredential,

    /// The provider has no zone with the requested name
    #[error("zone {zone} not found")]
    ZoneNotFound {
        /// Zone name that was looked up
        zone: String,
    },

    /// Certificate could not be decoded or has no usable public key
    #[error("certificate parse error: {0}")]
    CertificateParse(String),

    /// The provider rejected a request
    #[error("provider error ({status}): {message}")]
    Provider {
        /// HTTP status code
        status: u16,
        /// Error message reported by the provider
        message: String,
    },

    /// An update deleted the old record but could not create the new one.
    /// The name is left without a record until the next run.
    #[error("record {name} was deleted (id {record_id}) but its replacement could not be created: {source}")]
    PartialUpdateFailure {
        /// Record name left without a record
        name: String,
        /// Id of the record that was deleted
        record_id: String,
        /// Error from the failed create
        #[source]
        source: Box<DnsPinError>,
    },

    /// Resource not found
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// Authentication failed - invalid or missing API token
    #[error("authentication failed: invalid API token")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("rate limit exceeded, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying
        retry_after: Option<u64>,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Request timed out
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File could not be read
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path involved
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl DnsPinError {
    /// Wrap an I/O error with the path that produced it
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if the error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Timeout(_) | Self::Connection(_)
        )
    }

    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::MissingCredential)
    }

    /// Returns true if the provider reported the target as already gone
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Provider { status: 404, .. }
        )
    }

    /// Returns the HTTP status code if this is an API error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::RateLimited { .. } => Some(429),
            Self::NotFound { .. } => Some(404),
            Self::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let gone = DnsPinError::NotFound {
            resource: "record abc".into(),
        };
        assert!(gone.is_not_found());

        let status_404 = DnsPinError::Provider {
            status: 404,
            message: "Record does not exist".into(),
        };
        assert!(status_404.is_not_found());

        let rejected = DnsPinError::Provider {
            status: 400,
            message: "bad content".into(),
        };
        assert!(!rejected.is_not_found());
        assert_eq!(rejected.status_code(), Some(400));
    }

    #[test]
    fn test_retryable() {
        assert!(DnsPinError::RateLimited { retry_after: None }.is_retryable());
        assert!(DnsPinError::Timeout(Duration::from_secs(30)).is_retryable());
        assert!(!DnsPinError::Unauthorized.is_retryable());
        assert!(!DnsPinError::MissingCredential.is_retryable());
    }

    #[test]
    fn test_timeout_message_keeps_sub_second_precision() {
        let err = DnsPinError::Timeout(Duration::from_millis(100));
        assert_eq!(err.to_string(), "request timed out after 100ms");
    }

    #[test]
    fn test_partial_update_message_names_record_and_cause() {
        let err = DnsPinError::PartialUpdateFailure {
            name: "_443._tcp.example.com".into(),
            record_id: "r1".into(),
            source: Box::new(DnsPinError::Provider {
                status: 400,
                message: "invalid TLSA".into(),
            }),
        };
        let msg = err.to_string();
        assert!(msg.contains("_443._tcp.example.com"));
        assert!(msg.contains("r1"));
        assert!(msg.contains("invalid TLSA"));
    }
}
