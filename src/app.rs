//! Server lifecycle: bind, announce, serve, stop.
//!
//! `StaticServer::bind` takes the server from configuration to a bound
//! listener (loading TLS material if enabled); `serve` installs the router and
//! blocks until a graceful shutdown or a transport failure.

use std::net::SocketAddr;

use axum_server::tls_rustls::RustlsConfig;

use crate::address::BindAddress;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::http::shutdown::{self, ShutdownSignal, ShutdownWaiter};
use crate::http::tls::load_tls_config;
use crate::http::Listening;
use crate::routes::create_router;
use crate::state::AppState;

/// A static file server with its listener bound, ready to serve.
pub struct StaticServer {
    config: ServerConfig,
    listening: Listening,
    tls: Option<RustlsConfig>,
    signal: ShutdownSignal,
    waiter: ShutdownWaiter,
}

impl StaticServer {
    /// Bind the listener for `addr` and prepare TLS when configured.
    pub async fn bind(config: ServerConfig, addr: &BindAddress) -> Result<Self, ServerError> {
        let listening = Listening::bind(addr).await?;

        let tls = match &config.tls {
            Some(files) => {
                tracing::debug!(
                    cert = %files.cert_path.display(),
                    key = %files.key_path.display(),
                    "Loading TLS certificate"
                );
                Some(load_tls_config(files)?)
            }
            None => None,
        };

        let (signal, waiter) = shutdown::channel();

        Ok(Self {
            config,
            listening,
            tls,
            signal,
            waiter,
        })
    }

    /// Address the listener is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.listening.local_addr()
    }

    /// Handle for triggering a graceful shutdown from outside the HTTP surface.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.signal.clone()
    }

    /// Serve until shut down. Returns `Ok(())` on graceful shutdown.
    pub async fn serve(self) -> Result<(), ServerError> {
        let Self {
            config,
            listening,
            tls,
            signal,
            waiter,
        } = self;

        tracing::info!(
            "Serving directory {:?} on {}{}",
            config.root_dir,
            config.scheme(),
            listening.local_addr()
        );
        if config.shutdown_token.is_some() {
            tracing::debug!("Shutdown endpoint requires a token");
        }

        let state = AppState::new(signal, config.shutdown_token.clone());
        let app = create_router(&config, state);

        listening
            .serve(app, tls, waiter, config.drain_timeout)
            .await
    }
}

/// Bind and serve in one step.
pub async fn run(config: ServerConfig, addr: &BindAddress) -> Result<(), ServerError> {
    let server = StaticServer::bind(config, addr).await?;
    shutdown::listen_for_os_signals(server.shutdown_signal());
    server.serve().await
}
