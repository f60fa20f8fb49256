//! Core types and traits for dnspin.
//!
//! This crate provides the foundational types shared by the reconciliation
//! engine, the provider clients and the CLI:
//!
//! - **Types**: desired and existing DNS records, zones, plans and reports
//! - **Provider**: the [`DnsProvider`] capability trait
//! - **Errors**: a single error type, [`DnsPinError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use dnspin_core::{DesiredRecord, RecordType};
//!
//! let record = DesiredRecord::new("_443._tcp.example.com", RecordType::Tlsa, "3 1 1 ab12...");
//! assert_eq!(record.ttl, dnspin_core::AUTO_TTL);
//! ```

#![doc(html_root_url = "https://docs.rs/dnspin-core/0.3.0")]

mod error;
mod provider;
pub mod types;

pub use error::{DnsPinError, Result};
pub use provider::DnsProvider;
pub use types::*;
