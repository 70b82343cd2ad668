//! Shared state for the shutdown endpoint.

use std::sync::Arc;

use crate::http::shutdown::ShutdownSignal;

/// State handed to request handlers. Read-only apart from the close-once signal.
#[derive(Clone)]
pub struct AppState {
    pub shutdown: ShutdownSignal,
    pub shutdown_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(shutdown: ShutdownSignal, shutdown_token: Option<String>) -> Self {
        Self {
            shutdown,
            shutdown_token: shutdown_token.map(Arc::from),
        }
    }
}
