//! Listener acquisition and the serve loop.
//!
//! `Listening` is the state between a successful bind and the end of serving.
//! Serving blocks until the listener is closed by a graceful shutdown, which is
//! reported as `Ok(())`; any other transport failure is an error.

use std::net::SocketAddr;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use tokio::net::TcpListener;

use crate::address::BindAddress;
use crate::error::ServerError;

use super::shutdown::{spawn_shutdown_waiter, ShutdownWaiter};

/// A bound listener that has not started serving yet.
#[derive(Debug)]
pub struct Listening {
    listener: std::net::TcpListener,
    local_addr: SocketAddr,
}

impl Listening {
    /// Bind a TCP listener on `addr`.
    pub async fn bind(addr: &BindAddress) -> Result<Self, ServerError> {
        let bind_error = |source| ServerError::Bind {
            addr: addr.clone(),
            source,
        };

        let listener = TcpListener::bind(addr.as_str()).await.map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;
        let listener = listener.into_std().map_err(bind_error)?;

        tracing::debug!(requested = %addr, bound = %local_addr, "Listener bound");

        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// The address actually bound, with the OS-assigned port when port 0 was requested.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve `app` until a graceful shutdown completes.
    ///
    /// Spawns the shutdown waiter first, then serves plain HTTP or HTTPS
    /// depending on `tls`.
    pub async fn serve(
        self,
        app: Router,
        tls: Option<RustlsConfig>,
        waiter: ShutdownWaiter,
        drain_timeout: Option<std::time::Duration>,
    ) -> Result<(), ServerError> {
        let handle = Handle::new();
        spawn_shutdown_waiter(waiter, handle.clone(), drain_timeout);

        let service = app.into_make_service_with_connect_info::<SocketAddr>();

        let result = match tls {
            None => {
                axum_server::from_tcp(self.listener)
                    .handle(handle)
                    .serve(service)
                    .await
            }
            Some(rustls_config) => {
                axum_server::from_tcp_rustls(self.listener, rustls_config)
                    .handle(handle)
                    .serve(service)
                    .await
            }
        };

        result?;
        tracing::info!("Server stopped");
        Ok(())
    }
}
