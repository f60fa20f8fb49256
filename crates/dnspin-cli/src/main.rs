//! dnspin - keep DANE and mail transport security records current
//!
//! Run from a certificate renewal hook or by hand.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dnspin_cli::run().await
}
