use std::sync::Arc;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::{
    entities::transactions::InsertTransactionEntity,
    repositories::{
        provider_settings::ProviderSettingsRepository, transactions::TransactionRepository,
    },
    value_objects::{
        checkout::{
            CheckoutSessionCreatedDto, CreateCheckoutModel, NotificationModel, ProviderSession,
            ProviderSessionRequest, ProviderStatusSnapshot, StatusUpdateModel, TransactionDto,
            generate_order_id,
        },
        enums::{
            canonical_statuses::CanonicalStatus, provider_statuses::ProviderPaymentStatus,
        },
    },
};

pub const PROVIDER_NAME: &str = "orange_money";
pub const ORDER_ID_PREFIX: &str = "chk";

/// Seam between the checkout usecase and a concrete payment provider.
/// Implementations own their currency-mapping rules; the usecase never
/// hard-codes provider currency behavior.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    fn normalize_currency(&self, currency: &str) -> String;

    async fn create_payment_session(
        &self,
        request: ProviderSessionRequest,
    ) -> AnyResult<ProviderSession>;

    async fn fetch_payment_status(
        &self,
        session_token: &str,
        order_id: &str,
        amount_minor: i64,
    ) -> AnyResult<ProviderStatusSnapshot>;
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("amount must be positive")]
    InvalidAmount,
    #[error("provider is not configured for this organization: {0}")]
    Configuration(String),
    #[error("provider request failed")]
    Provider(#[source] anyhow::Error),
    #[error("persistence failure")]
    Persistence(#[source] anyhow::Error),
    #[error("transaction not found")]
    NotFound,
}

impl CheckoutError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            CheckoutError::InvalidAmount => StatusCode::BAD_REQUEST,
            CheckoutError::Configuration(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CheckoutError::Provider(_) => StatusCode::BAD_GATEWAY,
            CheckoutError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CheckoutError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, CheckoutError>;

/// Stateless checkout session adapter: every public operation is a short
/// sequential chain of at most one provider call and one persistence call.
/// All state lives in the store; concurrent checkouts for the same
/// organization are allowed to race and both succeed.
pub struct CheckoutUseCase<T, S, G>
where
    T: TransactionRepository + Send + Sync + 'static,
    S: ProviderSettingsRepository + Send + Sync + 'static,
    G: ProviderGateway + 'static,
{
    transaction_repo: Arc<T>,
    settings_repo: Arc<S>,
    provider_gateway: Arc<G>,
}

impl<T, S, G> CheckoutUseCase<T, S, G>
where
    T: TransactionRepository + Send + Sync + 'static,
    S: ProviderSettingsRepository + Send + Sync + 'static,
    G: ProviderGateway + 'static,
{
    pub fn new(transaction_repo: Arc<T>, settings_repo: Arc<S>, provider_gateway: Arc<G>) -> Self {
        Self {
            transaction_repo,
            settings_repo,
            provider_gateway,
        }
    }

    pub async fn create_checkout_session(
        &self,
        model: CreateCheckoutModel,
    ) -> UseCaseResult<CheckoutSessionCreatedDto> {
        info!(
            organization_id = %model.organization_id,
            merchant_id = %model.merchant_id,
            amount_minor = model.amount_minor,
            currency = %model.currency,
            "checkout: create session requested"
        );

        if model.amount_minor <= 0 {
            let err = CheckoutError::InvalidAmount;
            warn!(
                organization_id = %model.organization_id,
                amount_minor = model.amount_minor,
                status = err.status_code().as_u16(),
                "checkout: rejected non-positive amount"
            );
            return Err(err);
        }

        // Settings problems are a merchant setup failure, checked before any
        // provider traffic.
        let settings = self
            .settings_repo
            .fetch_provider_settings(model.organization_id, PROVIDER_NAME)
            .await
            .map_err(|err| {
                error!(
                    organization_id = %model.organization_id,
                    db_error = ?err,
                    "checkout: failed to load provider settings"
                );
                CheckoutError::Persistence(err)
            })?
            .ok_or_else(|| {
                let err = CheckoutError::Configuration(
                    "no provider settings for organization".to_string(),
                );
                warn!(
                    organization_id = %model.organization_id,
                    status = err.status_code().as_u16(),
                    "checkout: provider settings missing"
                );
                err
            })?;

        let merchant_key = settings
            .usable_merchant_key()
            .map(|key| key.to_string())
            .ok_or_else(|| {
                let err = CheckoutError::Configuration(
                    "provider is disconnected or missing a merchant key".to_string(),
                );
                warn!(
                    organization_id = %model.organization_id,
                    is_connected = settings.is_connected,
                    status = err.status_code().as_u16(),
                    "checkout: provider settings incomplete"
                );
                err
            })?;

        if let Some(key) = model.idempotency_key.as_deref() {
            if let Some(existing) = self
                .transaction_repo
                .find_by_idempotency_key(model.organization_id, key)
                .await
                .map_err(|err| {
                    error!(
                        organization_id = %model.organization_id,
                        db_error = ?err,
                        "checkout: idempotency lookup failed"
                    );
                    CheckoutError::Persistence(err)
                })?
            {
                info!(
                    organization_id = %model.organization_id,
                    transaction_id = %existing.id,
                    "checkout: returning existing session for idempotency key"
                );
                return Ok(CheckoutSessionCreatedDto {
                    transaction_id: existing.id,
                    checkout_url: existing.payment_url,
                    session_token: existing.session_token,
                });
            }
        }

        let order_id = generate_order_id(ORDER_ID_PREFIX);
        let provider_currency = self.provider_gateway.normalize_currency(&model.currency);

        let session = self
            .provider_gateway
            .create_payment_session(ProviderSessionRequest {
                merchant_key,
                currency: provider_currency.clone(),
                order_id: order_id.clone(),
                amount_minor: model.amount_minor,
                return_url: model.success_url.clone(),
                cancel_url: model.cancel_url.clone(),
                notification_url: model.notification_url.clone(),
                language: model.language.clone(),
                reference: model.reference.clone(),
            })
            .await
            .map_err(|err| {
                error!(
                    organization_id = %model.organization_id,
                    order_id = %order_id,
                    error = ?err,
                    "checkout: provider session creation failed"
                );
                CheckoutError::Provider(err)
            })?;

        let transaction_id = self
            .transaction_repo
            .create_checkout_transaction(InsertTransactionEntity {
                organization_id: model.organization_id,
                merchant_id: model.merchant_id,
                customer_id: model.customer_id,
                product_id: model.product_id,
                subscription_id: model.subscription_id,
                order_id: order_id.clone(),
                session_token: session.session_token.clone(),
                notification_token: session.notification_token.clone(),
                payment_url: session.payment_url.clone(),
                amount_minor: model.amount_minor,
                currency: model.currency.clone(),
                provider_currency,
                status: ProviderPaymentStatus::Initiated.to_string(),
                idempotency_key: model.idempotency_key.clone(),
                metadata: model.metadata.clone().unwrap_or_else(|| serde_json::json!({})),
            })
            .await
            .map_err(|err| {
                // The provider session already exists; the orphan is left for
                // a later status check to reconcile. No compensating call.
                error!(
                    organization_id = %model.organization_id,
                    order_id = %order_id,
                    session_token = %session.session_token,
                    db_error = ?err,
                    "checkout: failed to persist transaction, provider session orphaned"
                );
                CheckoutError::Persistence(err)
            })?;

        info!(
            organization_id = %model.organization_id,
            %transaction_id,
            order_id = %order_id,
            "checkout: session created"
        );

        Ok(CheckoutSessionCreatedDto {
            transaction_id,
            checkout_url: session.payment_url,
            session_token: session.session_token,
        })
    }

    /// Applies a status update while keeping persisted statuses monotonic:
    /// a terminal status is never overwritten, and re-delivery of the same
    /// terminal status is accepted without error.
    pub async fn update_transaction_status(
        &self,
        session_token: &str,
        update: StatusUpdateModel,
    ) -> UseCaseResult<()> {
        let current = self
            .transaction_repo
            .find_by_session_token(session_token)
            .await
            .map_err(|err| {
                error!(
                    session_token,
                    db_error = ?err,
                    "checkout: failed to load transaction for status update"
                );
                CheckoutError::Persistence(err)
            })?
            .ok_or(CheckoutError::NotFound)?;

        let current_status =
            ProviderPaymentStatus::from_str(&current.status).unwrap_or(ProviderPaymentStatus::Initiated);

        if current_status.is_terminal() {
            if update.status == current_status {
                info!(
                    session_token,
                    status = %current_status,
                    "checkout: terminal status re-delivered, nothing to do"
                );
            } else {
                warn!(
                    session_token,
                    current_status = %current_status,
                    incoming_status = %update.status,
                    "checkout: ignoring status update that would regress a terminal status"
                );
            }
            return Ok(());
        }

        let status = update.status;
        self.transaction_repo
            .update_payment_status(session_token, update)
            .await
            .map_err(|err| {
                error!(
                    session_token,
                    status = %status,
                    db_error = ?err,
                    "checkout: failed to persist status update"
                );
                CheckoutError::Persistence(err)
            })?;

        info!(session_token, status = %status, "checkout: status updated");
        Ok(())
    }

    /// Fail-closed verification of an asynchronous provider callback: any
    /// persistence error is reported as "not verified" rather than raised,
    /// because an unverifiable notification must never count as a positive
    /// confirmation.
    pub async fn verify_notification(
        &self,
        notification_token: &str,
        status: ProviderPaymentStatus,
        transaction_ref: Option<String>,
    ) -> bool {
        match self
            .transaction_repo
            .verify_notification(notification_token, status, transaction_ref)
            .await
        {
            Ok(verified) => verified,
            Err(err) => {
                error!(
                    error = ?err,
                    "checkout: notification verification errored, treating as rejected"
                );
                false
            }
        }
    }

    /// Verify-then-update flow for webhook delivery. Returns false when the
    /// notification could not be verified; nothing is persisted in that case.
    pub async fn process_notification(&self, model: NotificationModel) -> UseCaseResult<bool> {
        let verified = self
            .verify_notification(
                &model.notification_token,
                model.status,
                model.transaction_ref.clone(),
            )
            .await;

        if !verified {
            warn!(
                status = %model.status,
                "checkout: rejected unverifiable provider notification"
            );
            return Ok(false);
        }

        let transaction = self
            .transaction_repo
            .find_by_notification_token(&model.notification_token)
            .await
            .map_err(|err| {
                error!(
                    db_error = ?err,
                    "checkout: failed to locate transaction for notification"
                );
                CheckoutError::Persistence(err)
            })?
            .ok_or(CheckoutError::NotFound)?;

        self.update_transaction_status(
            &transaction.session_token,
            StatusUpdateModel {
                status: model.status,
                transaction_ref: model.transaction_ref,
                error_code: None,
                error_message: None,
                metadata: None,
            },
        )
        .await?;

        Ok(true)
    }

    /// Pull-based alternative to webhook delivery: ask the provider for the
    /// live status, persist it, and hand back the canonical value.
    pub async fn check_transaction_status(
        &self,
        session_token: &str,
        order_id: &str,
        amount_minor: i64,
    ) -> UseCaseResult<CanonicalStatus> {
        let snapshot = self
            .provider_gateway
            .fetch_payment_status(session_token, order_id, amount_minor)
            .await
            .map_err(|err| {
                error!(
                    session_token,
                    order_id,
                    error = ?err,
                    "checkout: provider status lookup failed"
                );
                CheckoutError::Provider(err)
            })?;

        let canonical = snapshot.status.to_canonical();

        self.update_transaction_status(
            session_token,
            StatusUpdateModel {
                status: snapshot.status,
                transaction_ref: snapshot.transaction_ref,
                error_code: None,
                error_message: None,
                metadata: None,
            },
        )
        .await?;

        info!(
            session_token,
            order_id,
            status = %snapshot.status,
            canonical_status = %canonical,
            "checkout: provider status reconciled"
        );

        Ok(canonical)
    }

    pub async fn get_transaction(&self, session_token: &str) -> UseCaseResult<TransactionDto> {
        let transaction = self
            .transaction_repo
            .find_by_session_token(session_token)
            .await
            .map_err(|err| {
                error!(
                    session_token,
                    db_error = ?err,
                    "checkout: failed to load transaction"
                );
                CheckoutError::Persistence(err)
            })?
            .ok_or(CheckoutError::NotFound)?;

        Ok(TransactionDto::from(transaction))
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::entities::provider_settings::ProviderSettingsEntity;
    use crate::domain::entities::transactions::TransactionEntity;
    use crate::domain::repositories::provider_settings::MockProviderSettingsRepository;
    use crate::domain::repositories::transactions::MockTransactionRepository;

    fn connected_settings(organization_id: Uuid) -> ProviderSettingsEntity {
        ProviderSettingsEntity {
            id: Uuid::new_v4(),
            organization_id,
            provider: PROVIDER_NAME.to_string(),
            merchant_key: Some("mk-test".to_string()),
            merchant_code: Some("123456".to_string()),
            is_connected: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn transaction_with_status(session_token: &str, status: ProviderPaymentStatus) -> TransactionEntity {
        TransactionEntity {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            merchant_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            product_id: None,
            subscription_id: None,
            order_id: "chk_1700000000000_A1B2C3".to_string(),
            session_token: session_token.to_string(),
            notification_token: "NOTIF-1".to_string(),
            payment_url: "https://pay.example/session".to_string(),
            amount_minor: 5000,
            currency: "XOF".to_string(),
            provider_currency: "XOF".to_string(),
            status: status.to_string(),
            provider_transaction_ref: None,
            error_code: None,
            error_message: None,
            idempotency_key: None,
            metadata: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn create_model(organization_id: Uuid) -> CreateCheckoutModel {
        CreateCheckoutModel {
            merchant_id: Uuid::new_v4(),
            organization_id,
            customer_id: Uuid::new_v4(),
            amount_minor: 5000,
            currency: "XOF".to_string(),
            success_url: "https://merchant.example/success".to_string(),
            cancel_url: "https://merchant.example/cancel".to_string(),
            notification_url: "https://merchant.example/notify".to_string(),
            product_id: None,
            subscription_id: None,
            language: Some("fr".to_string()),
            reference: Some("INV-42".to_string()),
            description: None,
            idempotency_key: None,
            metadata: Some(serde_json::json!({"link_id": "lnk-7"})),
        }
    }

    #[tokio::test]
    async fn create_fails_fast_without_settings_and_never_calls_provider() {
        let organization_id = Uuid::new_v4();

        let mut settings_repo = MockProviderSettingsRepository::new();
        settings_repo
            .expect_fetch_provider_settings()
            .returning(|_, _| Ok(None));

        let mut gateway = MockProviderGateway::new();
        gateway.expect_normalize_currency().times(0);
        gateway.expect_create_payment_session().times(0);

        let usecase = CheckoutUseCase::new(
            Arc::new(MockTransactionRepository::new()),
            Arc::new(settings_repo),
            Arc::new(gateway),
        );

        let result = usecase.create_checkout_session(create_model(organization_id)).await;
        assert!(matches!(result, Err(CheckoutError::Configuration(_))));
    }

    #[tokio::test]
    async fn create_fails_fast_when_provider_disconnected() {
        let organization_id = Uuid::new_v4();

        let mut settings_repo = MockProviderSettingsRepository::new();
        settings_repo
            .expect_fetch_provider_settings()
            .returning(move |org_id, _| {
                let mut settings = connected_settings(org_id);
                settings.is_connected = false;
                Ok(Some(settings))
            });

        let mut gateway = MockProviderGateway::new();
        gateway.expect_create_payment_session().times(0);

        let usecase = CheckoutUseCase::new(
            Arc::new(MockTransactionRepository::new()),
            Arc::new(settings_repo),
            Arc::new(gateway),
        );

        let result = usecase.create_checkout_session(create_model(organization_id)).await;
        assert!(matches!(result, Err(CheckoutError::Configuration(_))));
    }

    #[tokio::test]
    async fn create_rejects_non_positive_amount_before_any_lookup() {
        let mut settings_repo = MockProviderSettingsRepository::new();
        settings_repo.expect_fetch_provider_settings().times(0);

        let usecase = CheckoutUseCase::new(
            Arc::new(MockTransactionRepository::new()),
            Arc::new(settings_repo),
            Arc::new(MockProviderGateway::new()),
        );

        let mut model = create_model(Uuid::new_v4());
        model.amount_minor = 0;

        let result = usecase.create_checkout_session(model).await;
        assert!(matches!(result, Err(CheckoutError::InvalidAmount)));
    }

    #[tokio::test]
    async fn create_returns_existing_transaction_for_duplicate_idempotency_key() {
        let organization_id = Uuid::new_v4();
        let existing = transaction_with_status("PAY-EXISTING", ProviderPaymentStatus::Initiated);
        let existing_id = existing.id;

        let mut settings_repo = MockProviderSettingsRepository::new();
        settings_repo
            .expect_fetch_provider_settings()
            .returning(move |org_id, _| Ok(Some(connected_settings(org_id))));

        let mut transaction_repo = MockTransactionRepository::new();
        transaction_repo
            .expect_find_by_idempotency_key()
            .returning(move |_, _| Ok(Some(existing.clone())));
        transaction_repo.expect_create_checkout_transaction().times(0);

        let mut gateway = MockProviderGateway::new();
        gateway.expect_create_payment_session().times(0);

        let usecase = CheckoutUseCase::new(
            Arc::new(transaction_repo),
            Arc::new(settings_repo),
            Arc::new(gateway),
        );

        let mut model = create_model(organization_id);
        model.idempotency_key = Some("idem-1".to_string());

        let dto = usecase.create_checkout_session(model).await.unwrap();
        assert_eq!(dto.transaction_id, existing_id);
        assert_eq!(dto.session_token, "PAY-EXISTING");
    }

    #[tokio::test]
    async fn create_persists_initiated_transaction_and_returns_redirect() {
        let organization_id = Uuid::new_v4();
        let transaction_id = Uuid::new_v4();

        let mut settings_repo = MockProviderSettingsRepository::new();
        settings_repo
            .expect_fetch_provider_settings()
            .returning(move |org_id, _| Ok(Some(connected_settings(org_id))));

        let mut gateway = MockProviderGateway::new();
        gateway
            .expect_normalize_currency()
            .returning(|currency| currency.to_string());
        gateway
            .expect_create_payment_session()
            .withf(|request| {
                request.merchant_key == "mk-test"
                    && request.currency == "XOF"
                    && request.amount_minor == 5000
            })
            .returning(|_| {
                Ok(ProviderSession {
                    session_token: "PAY-1".to_string(),
                    payment_url: "https://pay.example/PAY-1".to_string(),
                    notification_token: "NOTIF-1".to_string(),
                })
            });

        let mut transaction_repo = MockTransactionRepository::new();
        transaction_repo
            .expect_create_checkout_transaction()
            .withf(|insert| {
                insert.status == "INITIATED"
                    && insert.session_token == "PAY-1"
                    && insert.notification_token == "NOTIF-1"
            })
            .returning(move |_| Ok(transaction_id));

        let usecase = CheckoutUseCase::new(
            Arc::new(transaction_repo),
            Arc::new(settings_repo),
            Arc::new(gateway),
        );

        let dto = usecase
            .create_checkout_session(create_model(organization_id))
            .await
            .unwrap();
        assert_eq!(dto.transaction_id, transaction_id);
        assert_eq!(dto.checkout_url, "https://pay.example/PAY-1");
        assert_eq!(dto.session_token, "PAY-1");
    }

    #[tokio::test]
    async fn terminal_status_is_never_regressed_by_a_later_pending_update() {
        let mut transaction_repo = MockTransactionRepository::new();
        transaction_repo
            .expect_find_by_session_token()
            .returning(|token| Ok(Some(transaction_with_status(token, ProviderPaymentStatus::Failed))));
        transaction_repo.expect_update_payment_status().times(0);

        let usecase = CheckoutUseCase::new(
            Arc::new(transaction_repo),
            Arc::new(MockProviderSettingsRepository::new()),
            Arc::new(MockProviderGateway::new()),
        );

        let result = usecase
            .update_transaction_status(
                "PAY-1",
                StatusUpdateModel::from_status(ProviderPaymentStatus::Pending),
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn redelivering_the_same_terminal_status_is_accepted_silently() {
        let mut transaction_repo = MockTransactionRepository::new();
        transaction_repo
            .expect_find_by_session_token()
            .returning(|token| Ok(Some(transaction_with_status(token, ProviderPaymentStatus::Success))));
        transaction_repo.expect_update_payment_status().times(0);

        let usecase = CheckoutUseCase::new(
            Arc::new(transaction_repo),
            Arc::new(MockProviderSettingsRepository::new()),
            Arc::new(MockProviderGateway::new()),
        );

        let result = usecase
            .update_transaction_status(
                "PAY-1",
                StatusUpdateModel::from_status(ProviderPaymentStatus::Success),
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn non_terminal_status_updates_are_persisted() {
        let mut transaction_repo = MockTransactionRepository::new();
        transaction_repo
            .expect_find_by_session_token()
            .returning(|token| {
                Ok(Some(transaction_with_status(token, ProviderPaymentStatus::Initiated)))
            });
        transaction_repo
            .expect_update_payment_status()
            .withf(|token, update| token == "PAY-1" && update.status == ProviderPaymentStatus::Success)
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = CheckoutUseCase::new(
            Arc::new(transaction_repo),
            Arc::new(MockProviderSettingsRepository::new()),
            Arc::new(MockProviderGateway::new()),
        );

        let result = usecase
            .update_transaction_status(
                "PAY-1",
                StatusUpdateModel::from_status(ProviderPaymentStatus::Success),
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn verify_notification_is_fail_closed_on_persistence_errors() {
        let mut transaction_repo = MockTransactionRepository::new();
        transaction_repo
            .expect_verify_notification()
            .returning(|_, _, _| Err(anyhow!("connection reset by peer")));

        let usecase = CheckoutUseCase::new(
            Arc::new(transaction_repo),
            Arc::new(MockProviderSettingsRepository::new()),
            Arc::new(MockProviderGateway::new()),
        );

        let verified = usecase
            .verify_notification("NOTIF-1", ProviderPaymentStatus::Success, None)
            .await;
        assert!(!verified);
    }

    #[tokio::test]
    async fn unverified_notification_changes_nothing() {
        let mut transaction_repo = MockTransactionRepository::new();
        transaction_repo
            .expect_verify_notification()
            .returning(|_, _, _| Ok(false));
        transaction_repo.expect_find_by_notification_token().times(0);
        transaction_repo.expect_update_payment_status().times(0);

        let usecase = CheckoutUseCase::new(
            Arc::new(transaction_repo),
            Arc::new(MockProviderSettingsRepository::new()),
            Arc::new(MockProviderGateway::new()),
        );

        let handled = usecase
            .process_notification(NotificationModel {
                notification_token: "NOTIF-BOGUS".to_string(),
                status: ProviderPaymentStatus::Success,
                transaction_ref: Some("TXN-1".to_string()),
            })
            .await
            .unwrap();
        assert!(!handled);
    }

    #[tokio::test]
    async fn verified_notification_updates_the_transaction() {
        let mut transaction_repo = MockTransactionRepository::new();
        transaction_repo
            .expect_verify_notification()
            .returning(|_, _, _| Ok(true));
        transaction_repo
            .expect_find_by_notification_token()
            .returning(|_| Ok(Some(transaction_with_status("PAY-1", ProviderPaymentStatus::Pending))));
        transaction_repo
            .expect_find_by_session_token()
            .returning(|token| Ok(Some(transaction_with_status(token, ProviderPaymentStatus::Pending))));
        transaction_repo
            .expect_update_payment_status()
            .withf(|token, update| token == "PAY-1" && update.status == ProviderPaymentStatus::Success)
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = CheckoutUseCase::new(
            Arc::new(transaction_repo),
            Arc::new(MockProviderSettingsRepository::new()),
            Arc::new(MockProviderGateway::new()),
        );

        let handled = usecase
            .process_notification(NotificationModel {
                notification_token: "NOTIF-1".to_string(),
                status: ProviderPaymentStatus::Success,
                transaction_ref: Some("TXN-1".to_string()),
            })
            .await
            .unwrap();
        assert!(handled);
    }

    #[tokio::test]
    async fn freshly_created_session_checks_out_as_pending() {
        let organization_id = Uuid::new_v4();
        let transaction_id = Uuid::new_v4();

        let mut settings_repo = MockProviderSettingsRepository::new();
        settings_repo
            .expect_fetch_provider_settings()
            .returning(move |org_id, _| Ok(Some(connected_settings(org_id))));

        let mut gateway = MockProviderGateway::new();
        gateway
            .expect_normalize_currency()
            .returning(|currency| currency.to_string());
        gateway.expect_create_payment_session().returning(|_| {
            Ok(ProviderSession {
                session_token: "PAY-1".to_string(),
                payment_url: "https://pay.example/PAY-1".to_string(),
                notification_token: "NOTIF-1".to_string(),
            })
        });
        gateway
            .expect_fetch_payment_status()
            .returning(|_, _, _| {
                Ok(ProviderStatusSnapshot {
                    status: ProviderPaymentStatus::Initiated,
                    transaction_ref: None,
                })
            });

        let mut transaction_repo = MockTransactionRepository::new();
        transaction_repo
            .expect_create_checkout_transaction()
            .returning(move |_| Ok(transaction_id));
        transaction_repo
            .expect_find_by_session_token()
            .returning(|token| {
                Ok(Some(transaction_with_status(token, ProviderPaymentStatus::Initiated)))
            });
        transaction_repo
            .expect_update_payment_status()
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = CheckoutUseCase::new(
            Arc::new(transaction_repo),
            Arc::new(settings_repo),
            Arc::new(gateway),
        );

        let dto = usecase
            .create_checkout_session(create_model(organization_id))
            .await
            .unwrap();
        assert_eq!(dto.transaction_id, transaction_id);

        let canonical = usecase
            .check_transaction_status(&dto.session_token, "chk_1700000000000_A1B2C3", 5000)
            .await
            .unwrap();
        assert_eq!(canonical, CanonicalStatus::Pending);
    }
}
