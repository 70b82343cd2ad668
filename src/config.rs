//! Configuration types and constants.
//!
//! Defines the flag defaults, the shutdown endpoint constants, logging defaults,
//! and `ServerConfig`, the read-only configuration handed to the server once
//! command-line parsing is done.

use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// Address Defaults
// =============================================================================

/// Default host when `-host` is not given
pub const DEFAULT_HOST: &str = "localhost";

/// Default port when `-port` is not given
pub const DEFAULT_PORT: &str = "8080";

/// Default value shown for `-addr`; only used when the flag is explicitly set
pub const DEFAULT_ADDR: &str = "localhost:8080";

/// Directory served when no positional argument is given
pub const DEFAULT_ROOT_DIR: &str = ".";

// =============================================================================
// TLS Defaults
// =============================================================================

/// Default certificate file used with `-tls`
pub const DEFAULT_CERT_FILE: &str = "cert.pem";

/// Default private key file used with `-tls`
pub const DEFAULT_KEY_FILE: &str = "key.pem";

// =============================================================================
// Shutdown Endpoint
// =============================================================================

/// Path of the remote graceful-shutdown endpoint
pub const SHUTDOWN_PATH: &str = "/__internal/__shutdown";

/// Environment variable holding the optional shutdown token
pub const SHUTDOWN_TOKEN_ENV: &str = "TESTING_KEY";

/// Request header that must carry the shutdown token when one is configured
pub const SHUTDOWN_TOKEN_HEADER: &str = "static-server-testing-key";

// =============================================================================
// Logging
// =============================================================================

/// Default log filter when neither `--log-level` nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "static_server=info,tower_http=info";

/// Log filter used with `-silent`: only errors get through
pub const SILENT_LOG_FILTER: &str = "static_server=error";

/// Log output format: human-readable text (default) or structured JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// A value as seen after command-line parsing, together with whether the user
/// actually typed it or it came from the flag default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagValue<T> {
    pub value: T,
    pub explicit: bool,
}

impl<T> FlagValue<T> {
    /// A value that was provided on the command line.
    pub fn explicit(value: T) -> Self {
        Self {
            value,
            explicit: true,
        }
    }

    /// A value that fell back to the flag default.
    pub fn default_value(value: T) -> Self {
        Self {
            value,
            explicit: false,
        }
    }
}

/// Certificate and key used when serving HTTPS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsFiles {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Root server configuration.
///
/// Built once by the CLI layer and never mutated afterwards. The bind address
/// is derived from `host`, `port` and `explicit_addr` by [`crate::address::resolve`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: FlagValue<String>,
    pub port: FlagValue<String>,
    /// Set only when `-addr` appeared on the command line
    pub explicit_addr: Option<String>,
    pub root_dir: PathBuf,
    /// Suppresses per-request logging
    pub silent: bool,
    /// Adds `Access-Control-Allow-Origin: *` to file responses
    pub cors: bool,
    /// Present only when `-tls` is set
    pub tls: Option<TlsFiles>,
    /// Token required by the shutdown endpoint, if any
    pub shutdown_token: Option<String>,
    /// Upper bound on connection draining during graceful shutdown
    pub drain_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: FlagValue::default_value(DEFAULT_HOST.to_string()),
            port: FlagValue::default_value(DEFAULT_PORT.to_string()),
            explicit_addr: None,
            root_dir: PathBuf::from(DEFAULT_ROOT_DIR),
            silent: false,
            cors: false,
            tls: None,
            shutdown_token: None,
            drain_timeout: None,
        }
    }
}

impl ServerConfig {
    /// URL scheme announced in the startup log line
    pub fn scheme(&self) -> &'static str {
        if self.tls.is_some() {
            "https://"
        } else {
            "http://"
        }
    }
}

/// Read the shutdown token from the environment. Empty values count as unset.
pub fn shutdown_token_from_env() -> Option<String> {
    std::env::var(SHUTDOWN_TOKEN_ENV)
        .ok()
        .filter(|token| !token.is_empty())
}
