use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use uuid::Uuid;

use crate::{
    domain::{
        entities::provider_settings::ProviderSettingsEntity,
        repositories::provider_settings::ProviderSettingsRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::provider_settings},
};

pub struct ProviderSettingsPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ProviderSettingsPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ProviderSettingsRepository for ProviderSettingsPostgres {
    async fn fetch_provider_settings(
        &self,
        organization_id: Uuid,
        provider: &str,
    ) -> Result<Option<ProviderSettingsEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = provider_settings::table
            .filter(provider_settings::organization_id.eq(organization_id))
            .filter(provider_settings::provider.eq(provider))
            .select(ProviderSettingsEntity::as_select())
            .first::<ProviderSettingsEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }
}
