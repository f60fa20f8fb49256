//! MTA-STS (RFC 8461) and TLSRPT (RFC 8460) TXT record content.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Policy id format: second resolution wall-clock time.
const POLICY_ID_FORMAT: &str = "%Y%m%d%H%M%S";

/// `v=STSv1; id=<YYYYMMDDHHMMSS>` for the given policy timestamp.
///
/// Mail senders refetch the policy when the id changes. Two runs within
/// the same second yield the same id, and a clock that steps backwards
/// yields a smaller one.
pub fn mta_sts_content<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("v=STSv1; id={}", timestamp.format(POLICY_ID_FORMAT))
}

/// `v=TLSRPTv1; rua=...` for the given report destinations.
///
/// Returns `None` when neither destination is given, which callers
/// treat as "remove the TLSRPT record". Destinations share one `rua=`
/// value, comma-separated, `mailto:` first.
pub fn tlsrpt_content(email: Option<&str>, url: Option<&str>) -> Option<String> {
    let email = email.map(str::trim).filter(|e| !e.is_empty());
    let url = url.map(str::trim).filter(|u| !u.is_empty());

    let mut destinations = Vec::with_capacity(2);
    if let Some(email) = email {
        let address = email.strip_prefix("mailto:").unwrap_or(email);
        destinations.push(format!("mailto:{address}"));
    }
    if let Some(url) = url {
        let rest = url.strip_prefix("https:").unwrap_or(url);
        destinations.push(format!("https:{rest}"));
    }

    if destinations.is_empty() {
        None
    } else {
        Some(format!("v=TLSRPTv1; rua={}", destinations.join(",")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_mta_sts_content() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(mta_sts_content(&ts), "v=STSv1; id=20240309070501");
    }

    #[test]
    fn test_mta_sts_uses_the_timestamp_own_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let ts = offset.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(mta_sts_content(&ts), "v=STSv1; id=20241231235959");
    }

    #[test]
    fn test_mta_sts_id_orders_with_time() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 0).unwrap();
        assert!(mta_sts_content(&earlier) < mta_sts_content(&later));
    }

    #[test]
    fn test_tlsrpt_email_only() {
        assert_eq!(
            tlsrpt_content(Some("a@b.com"), None).as_deref(),
            Some("v=TLSRPTv1; rua=mailto:a@b.com")
        );
    }

    #[test]
    fn test_tlsrpt_url_only() {
        assert_eq!(
            tlsrpt_content(None, Some("//reports.example.com/v1/tlsrpt")).as_deref(),
            Some("v=TLSRPTv1; rua=https://reports.example.com/v1/tlsrpt")
        );
    }

    #[test]
    fn test_tlsrpt_both_share_one_rua() {
        let content = tlsrpt_content(Some("tls@example.com"), Some("//r.example.com/x")).unwrap();
        assert_eq!(
            content,
            "v=TLSRPTv1; rua=mailto:tls@example.com,https://r.example.com/x"
        );
        assert_eq!(content.matches("rua=").count(), 1);
    }

    #[test]
    fn test_tlsrpt_does_not_double_prefix() {
        assert_eq!(
            tlsrpt_content(Some("mailto:a@b.com"), Some("https://r.example.com")).as_deref(),
            Some("v=TLSRPTv1; rua=mailto:a@b.com,https://r.example.com")
        );
    }

    #[test]
    fn test_tlsrpt_none_means_delete() {
        assert_eq!(tlsrpt_content(None, None), None);
        assert_eq!(tlsrpt_content(Some(""), Some("  ")), None);
    }
}
