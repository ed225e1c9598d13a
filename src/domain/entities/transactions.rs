use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::transactions;

/// Persisted checkout transaction. One row per payment attempt; rows are
/// only ever inserted and status-updated, never deleted by the gateway.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = transactions)]
pub struct TransactionEntity {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub merchant_id: Uuid,
    pub customer_id: Uuid,
    pub product_id: Option<Uuid>,
    pub subscription_id: Option<Uuid>,
    pub order_id: String,
    pub session_token: String,
    pub notification_token: String,
    pub payment_url: String,
    pub amount_minor: i64,
    pub currency: String,
    pub provider_currency: String,
    pub status: String,
    pub provider_transaction_ref: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub idempotency_key: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = transactions)]
pub struct InsertTransactionEntity {
    pub organization_id: Uuid,
    pub merchant_id: Uuid,
    pub customer_id: Uuid,
    pub product_id: Option<Uuid>,
    pub subscription_id: Option<Uuid>,
    pub order_id: String,
    pub session_token: String,
    pub notification_token: String,
    pub payment_url: String,
    pub amount_minor: i64,
    pub currency: String,
    pub provider_currency: String,
    pub status: String,
    pub idempotency_key: Option<String>,
    pub metadata: serde_json::Value,
}
