//! Bind address resolution.
//!
//! `-addr` and `-host`/`-port` are mutually exclusive ways of saying where to
//! listen. Only flags the user actually typed count towards the conflict, since
//! `-host` and `-port` always carry a non-empty default.

use std::fmt;

use crate::config::ServerConfig;
use crate::error::ConfigError;

/// The `host:port` string the listener binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindAddress(String);

impl BindAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BindAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the bind address for `config`.
///
/// No syntax checks happen here; a malformed host or port surfaces later as a
/// bind error.
pub fn resolve(config: &ServerConfig) -> Result<BindAddress, ConfigError> {
    match &config.explicit_addr {
        Some(_) if config.host.explicit || config.port.explicit => {
            Err(ConfigError::ConflictingAddressOptions)
        }
        Some(addr) => Ok(BindAddress(addr.clone())),
        None => Ok(BindAddress(format!(
            "{}:{}",
            config.host.value, config.port.value
        ))),
    }
}
