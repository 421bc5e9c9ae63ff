//! Interrupt handling for the wait loop.

use tokio::sync::watch;
use tracing::{info, warn};

/// Returns a shutdown receiver that turns true on the first Ctrl+C.
///
/// Must be called inside a tokio runtime. The listener task holds the sender
/// for the life of the process.
#[must_use]
pub fn shutdown_on_ctrl_c() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("interrupt received, shutting down scheduler"),
            Err(e) => warn!(error = %e, "failed to listen for interrupt, shutting down scheduler"),
        }
        let _ = tx.send(true);
        // Keep the sender alive so receivers see `true` rather than a closed channel.
        tx.closed().await;
    });
    rx
}
