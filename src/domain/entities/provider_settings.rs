use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::provider_settings;

/// Per-organization provider credentials. Owned by the merchant setup flow;
/// the checkout gateway only ever reads them.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = provider_settings)]
pub struct ProviderSettingsEntity {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub provider: String,
    pub merchant_key: Option<String>,
    pub merchant_code: Option<String>,
    pub is_connected: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProviderSettingsEntity {
    /// Settings are usable only when the organization finished connecting
    /// the provider and a merchant key is present.
    pub fn usable_merchant_key(&self) -> Option<&str> {
        if !self.is_connected {
            return None;
        }
        self.merchant_key.as_deref().filter(|key| !key.is_empty())
    }
}
