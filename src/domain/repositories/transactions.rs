use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::transactions::{InsertTransactionEntity, TransactionEntity};
use crate::domain::value_objects::checkout::StatusUpdateModel;
use crate::domain::value_objects::enums::provider_statuses::ProviderPaymentStatus;

#[automock]
#[async_trait]
pub trait TransactionRepository {
    async fn create_checkout_transaction(
        &self,
        transaction: InsertTransactionEntity,
    ) -> Result<Uuid>;

    async fn find_by_session_token(
        &self,
        session_token: &str,
    ) -> Result<Option<TransactionEntity>>;

    async fn find_by_notification_token(
        &self,
        notification_token: &str,
    ) -> Result<Option<TransactionEntity>>;

    async fn find_by_idempotency_key(
        &self,
        organization_id: Uuid,
        idempotency_key: &str,
    ) -> Result<Option<TransactionEntity>>;

    async fn update_payment_status(
        &self,
        session_token: &str,
        update: StatusUpdateModel,
    ) -> Result<()>;

    /// Opaque verification oracle for asynchronous provider callbacks:
    /// true when the delivered notification token belongs to a known
    /// transaction.
    async fn verify_notification(
        &self,
        notification_token: &str,
        status: ProviderPaymentStatus,
        transaction_ref: Option<String>,
    ) -> Result<bool>;
}
