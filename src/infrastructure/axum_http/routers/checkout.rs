use std::sync::Arc;

use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;

use crate::{
    application::usecases::checkout::{CheckoutUseCase, ProviderGateway},
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{
            provider_settings::ProviderSettingsRepository, transactions::TransactionRepository,
        },
        value_objects::{
            checkout::{CreateCheckoutModel, NotificationModel},
            enums::canonical_statuses::CanonicalStatus,
        },
    },
    infrastructure::{
        axum_http::error_responses,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                provider_settings::ProviderSettingsPostgres, transactions::TransactionPostgres,
            },
        },
        providers::orange_money::OrangeMoneyClient,
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Result<Router> {
    let transaction_repo = TransactionPostgres::new(Arc::clone(&db_pool));
    let settings_repo = ProviderSettingsPostgres::new(Arc::clone(&db_pool));
    let provider_gateway = OrangeMoneyClient::new(
        &config.provider.api_base_url,
        config.provider.auth_header.clone(),
        config.stage,
    )?;
    let checkout_usecase = CheckoutUseCase::new(
        Arc::new(transaction_repo),
        Arc::new(settings_repo),
        Arc::new(provider_gateway),
    );

    Ok(Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/:session_token", get(get_session))
        .route("/sessions/:session_token/check", post(check_session_status))
        .route("/notifications", post(handle_notification))
        .with_state(Arc::new(checkout_usecase)))
}

pub async fn create_session<T, S, G>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<T, S, G>>>,
    Json(model): Json<CreateCheckoutModel>,
) -> impl IntoResponse
where
    T: TransactionRepository + Send + Sync + 'static,
    S: ProviderSettingsRepository + Send + Sync + 'static,
    G: ProviderGateway + 'static,
{
    match checkout_usecase.create_checkout_session(model).await {
        Ok(dto) => (StatusCode::CREATED, Json(dto)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_session<T, S, G>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<T, S, G>>>,
    Path(session_token): Path<String>,
) -> impl IntoResponse
where
    T: TransactionRepository + Send + Sync + 'static,
    S: ProviderSettingsRepository + Send + Sync + 'static,
    G: ProviderGateway + 'static,
{
    match checkout_usecase.get_transaction(&session_token).await {
        Ok(dto) => (StatusCode::OK, Json(dto)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Serialize)]
struct CheckStatusResponse {
    canonical_status: CanonicalStatus,
}

pub async fn check_session_status<T, S, G>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<T, S, G>>>,
    Path(session_token): Path<String>,
) -> impl IntoResponse
where
    T: TransactionRepository + Send + Sync + 'static,
    S: ProviderSettingsRepository + Send + Sync + 'static,
    G: ProviderGateway + 'static,
{
    let transaction = match checkout_usecase.get_transaction(&session_token).await {
        Ok(dto) => dto,
        Err(err) => return err.into_response(),
    };

    match checkout_usecase
        .check_transaction_status(&session_token, &transaction.order_id, transaction.amount_minor)
        .await
    {
        Ok(canonical_status) => {
            (StatusCode::OK, Json(CheckStatusResponse { canonical_status })).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn handle_notification<T, S, G>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<T, S, G>>>,
    Json(model): Json<NotificationModel>,
) -> impl IntoResponse
where
    T: TransactionRepository + Send + Sync + 'static,
    S: ProviderSettingsRepository + Send + Sync + 'static,
    G: ProviderGateway + 'static,
{
    match checkout_usecase.process_notification(model).await {
        Ok(true) => StatusCode::OK.into_response(),
        Ok(false) => error_responses::forbidden("notification could not be verified"),
        Err(err) => err.into_response(),
    }
}
