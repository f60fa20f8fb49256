use serde::{Deserialize, Serialize};

use super::DesiredRecord;

/// A single change to bring one name in line with desired state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Operation {
    /// Create a record where none exists
    Create(DesiredRecord),

    /// Replace an existing record whose content differs.
    ///
    /// Applied as a delete of `id` followed by a create of `record`.
    Update {
        /// Id of the record being replaced
        id: String,
        /// Replacement record
        record: DesiredRecord,
    },

    /// Remove a record
    Delete {
        /// Id of the record to remove
        id: String,
        /// Name of the record, for reporting
        name: String,
    },

    /// Record already matches; nothing to do
    NoOp {
        /// Record name
        name: String,
    },
}

impl Operation {
    /// Name of the record this operation concerns
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Create(record) | Self::Update { record, .. } => &record.name,
            Self::Delete { name, .. } | Self::NoOp { name } => name,
        }
    }

    /// Short verb for logs and reports
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::NoOp { .. } => "unchanged",
        }
    }

    /// Returns true if applying this operation calls the provider
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        !matches!(self, Self::NoOp { .. })
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create(record) => write!(f, "create {} {}", record.record_type, record.name),
            Self::Update { id, record } => {
                write!(f, "update {} {} (replaces {id})", record.record_type, record.name)
            }
            Self::Delete { id, name } => write!(f, "delete {name} ({id})"),
            Self::NoOp { name } => write!(f, "{name} is up to date"),
        }
    }
}

/// Ordered list of operations produced by the planner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan(pub Vec<Operation>);

impl Plan {
    /// Returns true if nothing needs to change
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.0.iter().all(|op| !op.is_mutation())
    }

    /// Number of operations that mutate the zone
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.0.iter().filter(|op| op.is_mutation()).count()
    }

    /// Number of operations
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the plan has no operations at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over operations in order
    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.0.iter()
    }
}

impl IntoIterator for Plan {
    type Item = Operation;
    type IntoIter = std::vec::IntoIter<Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Operation> for Plan {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
