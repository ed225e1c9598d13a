pub mod provider_settings;
pub mod transactions;
