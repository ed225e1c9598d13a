use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain::{
        entities::transactions::{InsertTransactionEntity, TransactionEntity},
        repositories::transactions::TransactionRepository,
        value_objects::checkout::StatusUpdateModel,
        value_objects::enums::provider_statuses::ProviderPaymentStatus,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::transactions},
};

pub struct TransactionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl TransactionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl TransactionRepository for TransactionPostgres {
    async fn create_checkout_transaction(
        &self,
        transaction: InsertTransactionEntity,
    ) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let transaction_id = insert_into(transactions::table)
            .values(&transaction)
            .returning(transactions::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(transaction_id)
    }

    async fn find_by_session_token(
        &self,
        session_token: &str,
    ) -> Result<Option<TransactionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = transactions::table
            .filter(transactions::session_token.eq(session_token))
            .select(TransactionEntity::as_select())
            .first::<TransactionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_notification_token(
        &self,
        notification_token: &str,
    ) -> Result<Option<TransactionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = transactions::table
            .filter(transactions::notification_token.eq(notification_token))
            .select(TransactionEntity::as_select())
            .first::<TransactionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_idempotency_key(
        &self,
        organization_id: Uuid,
        idempotency_key: &str,
    ) -> Result<Option<TransactionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = transactions::table
            .filter(transactions::organization_id.eq(organization_id))
            .filter(transactions::idempotency_key.eq(idempotency_key))
            .select(TransactionEntity::as_select())
            .first::<TransactionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn update_payment_status(
        &self,
        session_token: &str,
        status_update: StatusUpdateModel,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // The where-clause repeats the monotonic guard so interleaved
        // writers cannot regress a terminal status between the usecase's
        // read and this write.
        let terminal_statuses = [
            ProviderPaymentStatus::Success.to_string(),
            ProviderPaymentStatus::Failed.to_string(),
        ];

        update(transactions::table)
            .filter(transactions::session_token.eq(session_token))
            .filter(transactions::status.ne_all(terminal_statuses.to_vec()))
            .set((
                transactions::status.eq(status_update.status.to_string()),
                transactions::provider_transaction_ref.eq(status_update.transaction_ref),
                transactions::error_code.eq(status_update.error_code),
                transactions::error_message.eq(status_update.error_message),
                transactions::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        if let Some(metadata) = status_update.metadata {
            update(transactions::table)
                .filter(transactions::session_token.eq(session_token))
                .set(transactions::metadata.eq(metadata))
                .execute(&mut conn)?;
        }

        Ok(())
    }

    async fn verify_notification(
        &self,
        notification_token: &str,
        _status: ProviderPaymentStatus,
        _transaction_ref: Option<String>,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let known = transactions::table
            .filter(transactions::notification_token.eq(notification_token))
            .select(transactions::id)
            .first::<Uuid>(&mut conn)
            .optional()?;

        Ok(known.is_some())
    }
}
