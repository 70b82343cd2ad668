//! Remote graceful-shutdown endpoint.
//!
//! Used by integration tests to stop the server cleanly. When a token is
//! configured, the request must present it in the token header; otherwise the
//! request is rejected with 403 and the server keeps running.

use axum::{extract::State, http::HeaderMap, http::StatusCode};

use crate::config::SHUTDOWN_TOKEN_HEADER;
use crate::error::AppError;
use crate::state::AppState;

/// Shutdown handler. Answers 200 and closes the shutdown signal; the actual
/// drain happens in the background waiter so this response is still delivered.
pub async fn shutdown(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    if let Some(expected) = state.shutdown_token.as_deref() {
        let presented = headers
            .get(SHUTDOWN_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());

        if presented != Some(expected) {
            tracing::warn!("Rejected shutdown request: missing or mismatched token");
            return Err(AppError::Forbidden);
        }
    }

    if state.shutdown.close() {
        tracing::info!("Shutdown requested");
    } else {
        tracing::debug!("Shutdown already in progress");
    }

    Ok(StatusCode::OK)
}
