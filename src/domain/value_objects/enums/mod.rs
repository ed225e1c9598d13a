pub mod canonical_statuses;
pub mod provider_statuses;
