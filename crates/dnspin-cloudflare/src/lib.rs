//! Cloudflare DNS provider for dnspin.
//!
//! This crate provides [`CloudflareClient`], a thin client for the
//! Cloudflare v4 zones and DNS records endpoints that implements
//! [`dnspin_core::DnsProvider`].

#![doc(html_root_url = "https://docs.rs/dnspin-cloudflare/0.3.0")]

mod client;
mod config;
mod provider;
pub mod api;

pub use client::{CloudflareClient, CloudflareClientBuilder};
pub use config::*;
pub use dnspin_core::{DnsPinError, Result};
