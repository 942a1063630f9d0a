//! Shutdown signals
//!
//! The server drains in-flight requests on Ctrl+C or SIGTERM. Open order
//! notification streams belong to the CLI and are not affected.

use std::io;

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum ShutdownSignalError {
    #[error("failed to install Ctrl+C handler: {0}")]
    CtrlC(#[source] io::Error),

    #[cfg(unix)]
    #[error("failed to install SIGTERM handler: {0}")]
    SigTerm(#[source] io::Error),
}

/// Which signal asked the server to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShutdownSignal {
    CtrlC,
    Terminate,
}

impl ShutdownSignal {
    fn as_str(self) -> &'static str {
        match self {
            ShutdownSignal::CtrlC => "ctrl_c",
            ShutdownSignal::Terminate => "terminate",
        }
    }
}

async fn terminate() -> Result<(), ShutdownSignalError> {
    #[cfg(unix)]
    {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .map_err(ShutdownSignalError::SigTerm)?
            .recv()
            .await;

        Ok(())
    }

    #[cfg(not(unix))]
    {
        std::future::pending().await
    }
}

/// Resolves with the first shutdown signal received.
pub(crate) async fn wait() -> Result<ShutdownSignal, ShutdownSignalError> {
    tokio::select! {
        result = signal::ctrl_c() => {
            result.map_err(ShutdownSignalError::CtrlC)?;

            Ok(ShutdownSignal::CtrlC)
        }
        result = terminate() => {
            result?;

            Ok(ShutdownSignal::Terminate)
        }
    }
}

/// Stop `handle` gracefully once a shutdown signal arrives.
pub(crate) async fn listen(handle: ServerHandle) -> Result<(), ShutdownSignalError> {
    let received = wait().await?;

    info!(signal = received.as_str(), "shutdown signal received, draining requests");

    handle.stop_graceful(None);

    Ok(())
}
