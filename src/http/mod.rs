//! HTTP server module with optional TLS.
//!
//! The server includes:
//! - Listener binding ahead of serving, so port 0 resolves to a real port
//! - Plain HTTP or HTTPS (TLS 1.3 only) over that listener
//! - Graceful shutdown driven by a close-once signal

pub mod server;
pub mod shutdown;
pub mod static_files;
pub mod tls;

pub use server::Listening;
