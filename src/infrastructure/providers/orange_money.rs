use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use tracing::error;
use url::Url;

use crate::application::usecases::checkout::ProviderGateway;
use crate::config::stage::Stage;
use crate::domain::value_objects::checkout::{
    ProviderSession, ProviderSessionRequest, ProviderStatusSnapshot,
};
use crate::domain::value_objects::enums::provider_statuses::ProviderPaymentStatus;

/// Provider's settlement currency; anything else is substituted with the
/// sandbox marker the web-payment API accepts outside production.
pub const HOME_CURRENCY: &str = "XOF";
pub const SANDBOX_CURRENCY: &str = "OUV";

/// Minimal Orange Money web-payment client built on reqwest. Injected into
/// the checkout usecase behind `ProviderGateway`; never instantiated as a
/// module-level singleton.
pub struct OrangeMoneyClient {
    http: reqwest::Client,
    base_url: Url,
    auth_header: String,
    stage: Stage,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct WebPaymentResponse {
    pay_token: String,
    payment_url: String,
    notif_token: String,
}

#[derive(Debug, Deserialize)]
struct TransactionStatusResponse {
    status: String,
    txnid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorEnvelope {
    code: Option<i64>,
    message: Option<String>,
    description: Option<String>,
}

impl OrangeMoneyClient {
    pub fn new(base_url: &str, auth_header: String, stage: Stage) -> Result<Self> {
        let base_url = Url::parse(base_url).context("invalid provider base url")?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            auth_header,
            stage,
        })
    }

    /// Production traffic uses the bare web-payment path; every other stage
    /// goes through the provider's sandbox segment.
    fn webpayment_path(&self, endpoint: &str) -> String {
        match self.stage {
            Stage::Production => format!("orange-money-webpay/v1/{}", endpoint),
            _ => format!("orange-money-webpay/dev/v1/{}", endpoint),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("invalid provider endpoint path: {path}"))
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let (provider_error_code, provider_error_message, provider_error_description) =
            match serde_json::from_str::<ProviderErrorEnvelope>(&body) {
                Ok(envelope) => (envelope.code, envelope.message, envelope.description),
                Err(_) => (None, None, None),
            };

        error!(
            status = %status,
            provider_error_code = ?provider_error_code,
            provider_error_message = ?provider_error_message,
            provider_error_description = ?provider_error_description,
            response_body = %body,
            context = %context,
            "orange money api request failed"
        );

        anyhow::bail!(
            "Orange Money API request failed: {} (status {}): {}",
            context,
            status,
            body
        );
    }

    /// Client-credentials token issuance. Tokens are short-lived and cheap;
    /// one is fetched per operation instead of being cached.
    async fn get_access_token(&self) -> Result<String> {
        let body = [("grant_type", "client_credentials")];

        let resp = self
            .http
            .post(self.endpoint("oauth/v3/token")?)
            .header(AUTHORIZATION, self.auth_header.as_str())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "oauth token").await?;

        let parsed: TokenResponse = resp.json().await?;
        Ok(parsed.access_token)
    }
}

#[async_trait]
impl ProviderGateway for OrangeMoneyClient {
    fn normalize_currency(&self, currency: &str) -> String {
        if currency == HOME_CURRENCY {
            HOME_CURRENCY.to_string()
        } else {
            SANDBOX_CURRENCY.to_string()
        }
    }

    async fn create_payment_session(
        &self,
        request: ProviderSessionRequest,
    ) -> Result<ProviderSession> {
        let token = self.get_access_token().await?;

        let body = serde_json::json!({
            "merchant_key": request.merchant_key,
            "currency": request.currency,
            "order_id": request.order_id,
            "amount": request.amount_minor,
            "return_url": request.return_url,
            "cancel_url": request.cancel_url,
            "notif_url": request.notification_url,
            "lang": request.language.as_deref().unwrap_or("fr"),
            "reference": request.reference,
        });

        let resp = self
            .http
            .post(self.endpoint(&self.webpayment_path("webpayment"))?)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .json(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create web payment session").await?;

        let parsed: WebPaymentResponse = resp.json().await?;
        Ok(ProviderSession {
            session_token: parsed.pay_token,
            payment_url: parsed.payment_url,
            notification_token: parsed.notif_token,
        })
    }

    async fn fetch_payment_status(
        &self,
        session_token: &str,
        order_id: &str,
        amount_minor: i64,
    ) -> Result<ProviderStatusSnapshot> {
        let token = self.get_access_token().await?;

        let body = serde_json::json!({
            "order_id": order_id,
            "amount": amount_minor,
            "pay_token": session_token,
        });

        let resp = self
            .http
            .post(self.endpoint(&self.webpayment_path("transactionstatus"))?)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .json(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "transaction status").await?;

        let parsed: TransactionStatusResponse = resp.json().await?;
        let status = ProviderPaymentStatus::from_str(&parsed.status).ok_or_else(|| {
            anyhow::anyhow!("unknown provider transaction status: {}", parsed.status)
        })?;

        Ok(ProviderStatusSnapshot {
            status,
            transaction_ref: parsed.txnid,
        })
    }
}
