//! `--explain` output: what a command is about to do and why the records matter.

use colored::Colorize;

/// Command explanation builder.
#[derive(Debug, Clone, Default)]
pub struct Explain {
    description: String,
    api_calls: Vec<String>,
    what_happens: Vec<String>,
    learn_more: Option<String>,
}

impl Explain {
    fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    fn api(mut self, endpoint: impl Into<String>) -> Self {
        self.api_calls.push(endpoint.into());
        self
    }

    fn step(mut self, step: impl Into<String>) -> Self {
        self.what_happens.push(step.into());
        self
    }

    fn rfc(mut self, number: u16) -> Self {
        self.learn_more = Some(format!("https://www.rfc-editor.org/rfc/rfc{number}"));
        self
    }

    /// Print the explanation to stdout.
    pub fn print(&self) {
        println!();
        println!("{}", "=== What This Does ===".bold().cyan());
        println!("{}", self.description);
        println!();

        if !self.what_happens.is_empty() {
            println!("{}", "How it works:".bold());
            for (i, step) in self.what_happens.iter().enumerate() {
                println!("  {}. {}", i + 1, step);
            }
            println!();
        }

        if !self.api_calls.is_empty() {
            println!("{}", "API Calls:".bold());
            for call in &self.api_calls {
                println!("  {}", call.dimmed());
            }
        }

        if let Some(url) = &self.learn_more {
            println!();
            println!("{} {}", "Learn more:".bold(), url.cyan().underline());
        }

        println!();
        println!("{}", "=== Results ===".bold().cyan());
        println!();
    }

    // ========================================================================
    // Factory methods for each command
    // ========================================================================

    pub fn tlsa(hostname: &str, ports: &[u16], zone: &str) -> Self {
        let ports = ports.iter().map(u16::to_string).collect::<Vec<_>>().join(", ");

        Self::new(format!(
            "Publishes DANE-EE TLSA records for {hostname} on port(s) {ports} in zone {zone}."
        ))
        .api("GET /zones?name=<zone>")
        .api("GET /zones/<id>/dns_records?type=TLSA")
        .api("DELETE /zones/<id>/dns_records/<record>")
        .api("POST /zones/<id>/dns_records")
        .step("Reads the certificate and hashes its public key (SHA-256 of the SubjectPublicKeyInfo)")
        .step("Builds a `3 1 1 <hash>` record for each _<port>._<proto> name")
        .step("Leaves matching records alone, replaces stale ones, removes duplicates")
        .step("Waits so resolvers see the new records before the certificate is swapped in")
        .rfc(7671)
    }

    pub fn mta_sts(zones: &[String], reporting: bool) -> Self {
        let explain = Self::new(format!(
            "Re-issues the MTA-STS policy id and updates TLS reporting for: {}",
            zones.join(", ")
        ))
        .api("GET /zones?name=<zone>")
        .api("GET /zones/<id>/dns_records?type=TXT&name=<name>")
        .api("DELETE /zones/<id>/dns_records/<record>")
        .api("POST /zones/<id>/dns_records")
        .step("Sets _mta-sts.<zone> to `v=STSv1; id=<timestamp>` so senders refetch the policy");

        let explain = if reporting {
            explain.step("Points _smtp._tls.<zone> at the given report destinations")
        } else {
            explain.step("Removes _smtp._tls.<zone> since no report destination was given")
        };

        explain
            .step("A zone that fails is reported and the remaining zones still run")
            .rfc(8461)
    }
}
