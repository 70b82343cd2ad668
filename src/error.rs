use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::io;

use crate::address::BindAddress;

/// Invalid combinations of command-line options. Fatal before any network activity.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("if -addr is set, -host and -port must remain unset")]
    ConflictingAddressOptions,

    #[error("too many command-line arguments (expected at most one directory, got {0})")]
    TooManyArguments(usize),
}

/// Failures while binding or serving. All of them end the process with exit code 1.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: BindAddress,
        #[source]
        source: io::Error,
    },

    #[error("Failed to load TLS configuration: {0}")]
    TlsConfig(String),

    #[error("Error in serve: {0}")]
    Transport(#[from] io::Error),
}

/// Errors that are answered with an HTTP response and never escalate further.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("403 Forbidden")]
    Forbidden,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Forbidden => StatusCode::FORBIDDEN,
        };

        (status, self.to_string()).into_response()
    }
}
