// SPDX-FileCopyrightText: 2026 Hookline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graceful shutdown coordination with signal handling.
//!
//! Installs handlers for SIGTERM and SIGINT (Ctrl+C), triggering a
//! [`CancellationToken`] that the HTTP server monitors. In-flight requests
//! finish before the store is closed.

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is received.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = wait_for_ctrl_c(ctrl_c) => {}
                        _ = sigterm.recv() => {
                            info!("received SIGTERM, initiating shutdown");
                        }
                    }
                }
                Err(e) => {
                    error!(error = %e, "failed to install SIGTERM handler, watching Ctrl+C only");
                    wait_for_ctrl_c(ctrl_c).await;
                }
            }
        }

        #[cfg(not(unix))]
        {
            wait_for_ctrl_c(ctrl_c).await;
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

/// Wait for Ctrl+C. If the listener itself fails, shut down rather than run
/// without a way to stop.
async fn wait_for_ctrl_c(ctrl_c: impl std::future::Future<Output = std::io::Result<()>>) {
    match ctrl_c.await {
        Ok(()) => info!("received SIGINT (Ctrl+C), initiating shutdown"),
        Err(e) => error!(error = %e, "Ctrl+C listener failed, initiating shutdown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listener_error_still_returns() {
        let failing = async { Err(std::io::Error::other("no signal driver")) };
        wait_for_ctrl_c(failing).await;
    }

    #[tokio::test]
    async fn token_is_not_cancelled_without_a_signal() {
        let token = install_signal_handler();
        tokio::task::yield_now().await;
        assert!(!token.is_cancelled());
    }
}
