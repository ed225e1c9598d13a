use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::canonical_statuses::CanonicalStatus;

/// Raw status taxonomy reported by the payment provider for a checkout
/// session. `SUCCESS` and `FAILED` are terminal; everything else is still
/// awaiting payer action or provider resolution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProviderPaymentStatus {
    #[serde(rename = "INITIATED")]
    Initiated,
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "EXPIRED")]
    Expired,
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAILED")]
    Failed,
}

impl ProviderPaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderPaymentStatus::Initiated => "INITIATED",
            ProviderPaymentStatus::Pending => "PENDING",
            ProviderPaymentStatus::Expired => "EXPIRED",
            ProviderPaymentStatus::Success => "SUCCESS",
            ProviderPaymentStatus::Failed => "FAILED",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "INITIATED" => Some(ProviderPaymentStatus::Initiated),
            "PENDING" => Some(ProviderPaymentStatus::Pending),
            "EXPIRED" => Some(ProviderPaymentStatus::Expired),
            "SUCCESS" => Some(ProviderPaymentStatus::Success),
            "FAILED" => Some(ProviderPaymentStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProviderPaymentStatus::Success | ProviderPaymentStatus::Failed
        )
    }

    /// Folds the provider taxonomy into the canonical three-value status.
    /// `EXPIRED` deliberately maps to `pending` to match the provider's
    /// reference behavior, even though an expired session will never
    /// complete.
    pub fn to_canonical(&self) -> CanonicalStatus {
        match self {
            ProviderPaymentStatus::Success => CanonicalStatus::Completed,
            ProviderPaymentStatus::Failed => CanonicalStatus::Failed,
            ProviderPaymentStatus::Initiated
            | ProviderPaymentStatus::Pending
            | ProviderPaymentStatus::Expired => CanonicalStatus::Pending,
        }
    }
}

impl Display for ProviderPaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
