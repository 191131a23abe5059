// src/service/signal.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Process-wide "stop now" flag.
///
/// Written once by whoever delivers the stop request, read by the controller,
/// the exe handler and the process runner. Waiting on it is a blocking await,
/// not a poll loop.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    token: CancellationToken,
    set: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the signal.
    ///
    /// Returns `true` for the one call that actually set it.
    pub fn request_stop(&self) -> bool {
        if self.set.swap(true, Ordering::SeqCst) {
            return false;
        }
        info!("stop requested");
        self.token.cancel();
        true
    }

    pub fn is_stop_requested(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolve once the signal is set (immediately if it already is).
    pub async fn wait(&self) {
        self.token.cancelled().await
    }
}
