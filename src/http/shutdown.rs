//! Graceful shutdown coordination.
//!
//! A [`ShutdownSignal`] is closed at most once, by the shutdown endpoint or by
//! SIGTERM/SIGINT. A single background waiter observes it and asks the server
//! to drain:
//! 1. Stop accepting new connections
//! 2. Let in-flight requests finish
//! 3. Return from the serve call

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum_server::Handle;
use tokio::sync::oneshot;

/// Close-once side of the shutdown channel. Cheap to clone; every clone closes
/// the same signal.
#[derive(Clone, Debug)]
pub struct ShutdownSignal {
    tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

/// Observing side of the shutdown channel. There is exactly one per signal.
#[derive(Debug)]
pub struct ShutdownWaiter {
    rx: oneshot::Receiver<()>,
}

/// Create a connected signal/waiter pair.
pub fn channel() -> (ShutdownSignal, ShutdownWaiter) {
    let (tx, rx) = oneshot::channel();
    (
        ShutdownSignal {
            tx: Arc::new(Mutex::new(Some(tx))),
        },
        ShutdownWaiter { rx },
    )
}

impl ShutdownSignal {
    /// Close the signal. Returns `true` only for the call that actually closed
    /// it; later and concurrent calls are no-ops returning `false`.
    pub fn close(&self) -> bool {
        let sender = self
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match sender {
            Some(tx) => {
                // The waiter may already be gone if serving failed; nothing to do then
                let _ = tx.send(());
                true
            }
            None => false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl ShutdownWaiter {
    /// Wait until the signal is closed. Returns `false` if every
    /// [`ShutdownSignal`] was dropped without closing.
    pub async fn wait(self) -> bool {
        self.rx.await.is_ok()
    }
}

/// Spawn the background task that turns a closed signal into a graceful
/// server shutdown.
///
/// `drain_timeout` of `None` waits for in-flight connections indefinitely.
pub fn spawn_shutdown_waiter(
    waiter: ShutdownWaiter,
    handle: Handle,
    drain_timeout: Option<Duration>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if !waiter.wait().await {
            tracing::debug!("Shutdown signal dropped without being closed");
            return;
        }

        handle.graceful_shutdown(drain_timeout);
        match drain_timeout {
            Some(timeout) => tracing::info!(
                timeout_secs = timeout.as_secs(),
                "Graceful shutdown initiated, draining connections"
            ),
            None => tracing::info!(
                "Graceful shutdown initiated, waiting for in-flight requests to finish"
            ),
        }
    })
}

/// Close `signal` on Ctrl+C or SIGTERM.
pub fn listen_for_os_signals(signal: ShutdownSignal) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown");
            }
        }

        signal.close();
    });
}
