//! Helpers shared by the network-facing modules

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Run `fut` unless `cancel` fires first
///
/// The losing future is dropped, which closes any connection or child process
/// it owns.
pub async fn with_cancel<F, T>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = fut => result,
    }
}

/// Sleep for `period`, returning early with [`Error::Cancelled`] if `cancel` fires
pub async fn cancellable_sleep(cancel: &CancellationToken, period: Duration) -> Result<()> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        _ = tokio::time::sleep(period) => Ok(()),
    }
}

/// Read a response body for an error message, tolerating transport failures
pub(crate) async fn body_for_diagnostics(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|e| format!("<unreadable body: {e}>"))
}
