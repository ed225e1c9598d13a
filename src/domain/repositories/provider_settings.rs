use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::provider_settings::ProviderSettingsEntity;

#[automock]
#[async_trait]
pub trait ProviderSettingsRepository {
    async fn fetch_provider_settings(
        &self,
        organization_id: Uuid,
        provider: &str,
    ) -> Result<Option<ProviderSettingsEntity>>;
}
