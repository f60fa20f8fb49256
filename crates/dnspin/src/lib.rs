//! Keep DANE and mail transport security records in step with reality.
//!
//! dnspin derives the DNS records a host needs from observed facts (a TLS
//! certificate, a policy timestamp, reporting destinations), compares them
//! with what a DNS provider holds and applies the difference.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dnspin::{facts, CloudflareClient, Reconciler};
//!
//! #[tokio::main]
//! async fn main() -> dnspin::Result<()> {
//!     let client = CloudflareClient::new("your-api-token")?;
//!
//!     let path = facts::default_certificate_path("mail.example.com");
//!     let digest = facts::read_certificate_digest(&path).await?;
//!     let desired = facts::tlsa_records("mail.example.com", &[25, 465], facts::Protocol::Tcp, &digest);
//!
//!     let report = Reconciler::new()
//!         .reconcile(&client, "example.com", &desired)
//!         .await?;
//!
//!     for failure in report.failures() {
//!         eprintln!("{}: {}", failure.operation, failure.outcome);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Cloudflare provider with rustls
//! - `cloudflare` - Cloudflare v4 API provider
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/dnspin/0.3.0")]

pub mod facts;
pub mod memory;
pub mod planner;
pub mod reconciler;

// Re-export core types
pub use dnspin_core::*;

pub use memory::MemoryProvider;
pub use planner::plan;
pub use reconciler::Reconciler;

// Re-export providers
#[cfg(feature = "cloudflare")]
pub use dnspin_cloudflare::{CloudflareClient, CloudflareClientBuilder, RateLimitConfig, RetryConfig};

// Re-export runtime for convenience
pub use chrono;
pub use serde;
pub use serde_json;
pub use tokio;
