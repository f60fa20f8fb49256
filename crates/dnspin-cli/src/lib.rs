//! # dnspin-cli
//!
//! Command-line front end for the dnspin reconciliation engine.
//!
//! ## Commands
//!
//! - **tlsa**: publish `3 1 1` TLSA records for a host's current certificate
//! - **mta-sts**: re-issue the MTA-STS policy id and manage TLSRPT per zone
//! - **config**: show and edit the CLI configuration file
//!
//! Every command accepts `--explain` to describe what it is about to do,
//! and `--output json|yaml` for machine-readable reports.

pub mod cli;
pub mod config;
pub mod credentials;
pub mod education;
pub mod output;

pub use cli::run;
