use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::transactions::TransactionEntity;
use crate::domain::value_objects::enums::{
    canonical_statuses::CanonicalStatus, provider_statuses::ProviderPaymentStatus,
};

const ORDER_ID_SUFFIX_LEN: usize = 6;
const ORDER_ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Merchant-side correlation key: `{prefix}_{millis}_{base36 suffix}`.
/// Collisions require two generations inside the same millisecond drawing
/// the same 6-character suffix, which is accepted as negligible.
pub fn generate_order_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ORDER_ID_SUFFIX_LEN)
        .map(|_| ORDER_ID_ALPHABET[rng.gen_range(0..ORDER_ID_ALPHABET.len())] as char)
        .collect();

    format!("{}_{}_{}", prefix, millis, suffix)
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCheckoutModel {
    pub merchant_id: Uuid,
    pub organization_id: Uuid,
    pub customer_id: Uuid,
    pub amount_minor: i64,
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
    pub notification_url: String,
    pub product_id: Option<Uuid>,
    pub subscription_id: Option<Uuid>,
    pub language: Option<String>,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub idempotency_key: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// What the caller gets back from a successful checkout creation: the local
/// transaction id plus the provider handles needed to redirect the payer.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSessionCreatedDto {
    pub transaction_id: Uuid,
    pub checkout_url: String,
    pub session_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionDto {
    pub id: Uuid,
    pub order_id: String,
    pub session_token: String,
    pub payment_url: String,
    pub amount_minor: i64,
    pub currency: String,
    pub status: String,
    pub canonical_status: CanonicalStatus,
    pub provider_transaction_ref: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TransactionEntity> for TransactionDto {
    fn from(entity: TransactionEntity) -> Self {
        let canonical_status = ProviderPaymentStatus::from_str(&entity.status)
            .map(|status| status.to_canonical())
            .unwrap_or(CanonicalStatus::Pending);

        Self {
            id: entity.id,
            order_id: entity.order_id,
            session_token: entity.session_token,
            payment_url: entity.payment_url,
            amount_minor: entity.amount_minor,
            currency: entity.currency,
            status: entity.status,
            canonical_status,
            provider_transaction_ref: entity.provider_transaction_ref,
            error_code: entity.error_code,
            error_message: entity.error_message,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Status update applied to a persisted transaction, delivered either by a
/// verified provider notification or by an explicit status poll.
#[derive(Debug, Clone)]
pub struct StatusUpdateModel {
    pub status: ProviderPaymentStatus,
    pub transaction_ref: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl StatusUpdateModel {
    pub fn from_status(status: ProviderPaymentStatus) -> Self {
        Self {
            status,
            transaction_ref: None,
            error_code: None,
            error_message: None,
            metadata: None,
        }
    }
}

/// Webhook-style callback payload delivered by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationModel {
    pub notification_token: String,
    pub status: ProviderPaymentStatus,
    pub transaction_ref: Option<String>,
}

/// Parameters handed to the provider's session-creation endpoint, already
/// normalized (currency, order id) by the checkout usecase.
#[derive(Debug, Clone)]
pub struct ProviderSessionRequest {
    pub merchant_key: String,
    pub currency: String,
    pub order_id: String,
    pub amount_minor: i64,
    pub return_url: String,
    pub cancel_url: String,
    pub notification_url: String,
    pub language: Option<String>,
    pub reference: Option<String>,
}

/// Opaque handles issued by the provider for a new checkout session.
#[derive(Debug, Clone)]
pub struct ProviderSession {
    pub session_token: String,
    pub payment_url: String,
    pub notification_token: String,
}

#[derive(Debug, Clone)]
pub struct ProviderStatusSnapshot {
    pub status: ProviderPaymentStatus,
    pub transaction_ref: Option<String>,
}
