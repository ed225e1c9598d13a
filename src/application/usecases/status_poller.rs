use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::application::usecases::checkout::{CheckoutError, CheckoutUseCase, ProviderGateway};
use crate::domain::repositories::{
    provider_settings::ProviderSettingsRepository, transactions::TransactionRepository,
};
use crate::domain::value_objects::enums::canonical_statuses::CanonicalStatus;

pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Polls the provider for a session's status at a fixed interval until a
/// terminal canonical status is observed under reconciliation. No backoff
/// and no deadline; callers cancel by aborting the task. Provider or store
/// hiccups are logged and retried on the next tick, an unknown session
/// token ends the poll.
pub async fn poll_until_terminal<T, S, G>(
    usecase: Arc<CheckoutUseCase<T, S, G>>,
    session_token: String,
    order_id: String,
    amount_minor: i64,
    interval: Duration,
) -> Result<CanonicalStatus, CheckoutError>
where
    T: TransactionRepository + Send + Sync + 'static,
    S: ProviderSettingsRepository + Send + Sync + 'static,
    G: ProviderGateway + 'static,
{
    loop {
        match usecase
            .check_transaction_status(&session_token, &order_id, amount_minor)
            .await
        {
            Ok(status) if status.is_terminal() => {
                info!(
                    session_token = %session_token,
                    order_id = %order_id,
                    status = %status,
                    "status poller: terminal status observed, stopping"
                );
                return Ok(status);
            }
            Ok(status) => {
                debug!(
                    session_token = %session_token,
                    order_id = %order_id,
                    status = %status,
                    "status poller: still pending"
                );
            }
            Err(CheckoutError::NotFound) => {
                error!(
                    session_token = %session_token,
                    "status poller: transaction disappeared, stopping"
                );
                return Err(CheckoutError::NotFound);
            }
            Err(err) => {
                error!(
                    session_token = %session_token,
                    order_id = %order_id,
                    error = ?err,
                    "status poller: check failed, retrying on next tick"
                );
            }
        }

        tokio::time::sleep(interval).await;
    }
}
