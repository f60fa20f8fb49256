use serde::{Deserialize, Serialize};

/// A provider zone resolved for one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRef {
    /// Provider-assigned zone identifier
    pub id: String,

    /// Zone apex name (e.g. `example.com`)
    pub name: String,
}

impl ZoneRef {
    /// Create a zone reference
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ZoneRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
