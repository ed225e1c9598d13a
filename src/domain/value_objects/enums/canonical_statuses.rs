use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Canonical transaction status exposed to the rest of the system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalStatus {
    Pending,
    Completed,
    Failed,
}

impl CanonicalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalStatus::Pending => "pending",
            CanonicalStatus::Completed => "completed",
            CanonicalStatus::Failed => "failed",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(CanonicalStatus::Pending),
            "completed" => Some(CanonicalStatus::Completed),
            "failed" => Some(CanonicalStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CanonicalStatus::Completed | CanonicalStatus::Failed)
    }
}

impl Display for CanonicalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
