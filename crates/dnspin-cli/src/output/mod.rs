//! Output formatting for different formats.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use dnspin::{Operation, Outcome, Report};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tabled::{settings::Style, Table, Tabled};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed tables with colors
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "table" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => anyhow::bail!(
                "Unknown output format: {s}\n\
                 Valid formats: pretty, json, yaml"
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Content")]
    content: String,
    #[tabled(rename = "Result")]
    outcome: String,
}

impl ReportRow {
    fn new(operation: &Operation, outcome: &Outcome) -> Self {
        let content = match operation {
            Operation::Create(record) | Operation::Update { record, .. } => record.content.clone(),
            Operation::Delete { id, .. } => format!("(record {id})"),
            Operation::NoOp { .. } => String::new(),
        };

        let action = match operation {
            Operation::Create(_) => operation.action().green().to_string(),
            Operation::Update { .. } => operation.action().yellow().to_string(),
            Operation::Delete { .. } => operation.action().red().to_string(),
            Operation::NoOp { .. } => operation.action().dimmed().to_string(),
        };

        let outcome = match outcome {
            Outcome::Applied => "applied".green().to_string(),
            Outcome::Skipped => "skipped".dimmed().to_string(),
            Outcome::Failed(reason) => format!("{} {reason}", "failed:".red().bold()),
        };

        Self {
            action,
            name: operation.name().to_string(),
            content,
            outcome,
        }
    }
}

/// Print one reconciliation report.
pub fn print_report(report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(report)?),
        OutputFormat::Pretty => print_report_pretty(report),
    }
    Ok(())
}

fn print_report_pretty(report: &Report) {
    let zone = report.zone.as_deref().unwrap_or("(unknown zone)");
    println!("{} {}", "Zone:".bold(), zone.cyan().bold());

    if report.entries.is_empty() {
        println!("  {}", "Nothing to do.".dimmed());
        return;
    }

    let rows: Vec<ReportRow> = report
        .entries
        .iter()
        .map(|e| ReportRow::new(&e.operation, &e.outcome))
        .collect();
    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");

    let failed = report.failures().count();
    if failed == 0 {
        println!("{} {} applied", "Done:".green().bold(), report.applied_count());
    } else {
        println!(
            "{} {} applied, {} failed",
            "Incomplete:".red().bold(),
            report.applied_count(),
            failed
        );
    }
}

/// Result of reconciling one zone of a multi-zone run.
pub struct ZoneResult {
    /// Zone name as given on the command line
    pub zone: String,
    /// Report, or the error that stopped the zone before anything was applied
    pub result: anyhow::Result<Report>,
}

impl ZoneResult {
    fn to_value(&self) -> Result<serde_json::Value> {
        Ok(match &self.result {
            Ok(report) => serde_json::to_value(report)?,
            Err(e) => serde_json::json!({ "zone": self.zone, "error": format!("{e:#}") }),
        })
    }
}

/// Print the results of a multi-zone run.
///
/// JSON and YAML produce a single document holding one entry per zone.
pub fn print_zone_results(results: &[ZoneResult], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let values = results
                .iter()
                .map(ZoneResult::to_value)
                .collect::<Result<Vec<_>>>()?;
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else {
                print!("{}", serde_yaml::to_string(&values)?);
            }
        }
        OutputFormat::Pretty => {
            for zone in results {
                match &zone.result {
                    Ok(report) => print_report_pretty(report),
                    Err(e) => eprintln!("{} {}: {e:#}", "Error:".red().bold(), zone.zone.cyan()),
                }
            }
        }
    }
    Ok(())
}
