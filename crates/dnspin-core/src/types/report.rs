use serde::{Deserialize, Serialize};

use super::Operation;

/// Result of applying one operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum Outcome {
    /// Provider calls succeeded (or the target was already gone)
    Applied,
    /// Nothing was sent to the provider (unchanged record or dry run)
    Skipped,
    /// The operation failed; other operations still ran
    Failed(String),
}

impl Outcome {
    /// Returns true for [`Outcome::Failed`]
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Applied => f.write_str("applied"),
            Self::Skipped => f.write_str("skipped"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// One line of a [`Report`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// The operation that was attempted
    pub operation: Operation,
    /// What happened
    pub outcome: Outcome,
}

/// Outcome of every operation in a plan, in plan order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Zone the plan was applied to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,

    /// Per-operation outcomes
    pub entries: Vec<ReportEntry>,
}

impl Report {
    /// Create an empty report for a zone
    #[must_use]
    pub fn for_zone(zone: impl Into<String>) -> Self {
        Self {
            zone: Some(zone.into()),
            entries: Vec::new(),
        }
    }

    /// Append an entry
    pub fn push(&mut self, operation: Operation, outcome: Outcome) {
        self.entries.push(ReportEntry { operation, outcome });
    }

    /// Returns true if no entry failed
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.entries.iter().any(|e| e.outcome.is_failed())
    }

    /// Entries that failed
    pub fn failures(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| e.outcome.is_failed())
    }

    /// Number of entries that reached the provider successfully
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome == Outcome::Applied)
            .count()
    }
}
