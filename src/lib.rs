//! static-server: a minimal static file server.
//!
//! Serves one directory tree over HTTP or HTTPS, with optional CORS headers and
//! a remotely triggerable graceful shutdown endpoint.

pub mod address;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;

pub use address::BindAddress;
pub use app::StaticServer;
pub use config::ServerConfig;
pub use error::{ConfigError, ServerError};
