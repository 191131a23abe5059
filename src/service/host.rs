// src/service/host.rs

//! Host integration: how the agent announces itself and how stop requests
//! reach it.

use std::fs;
use std::path::PathBuf;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::service::signal::StopSignal;

/// Registration/deregistration with whatever supervises the agent.
///
/// `register` is also where the host hooks its stop delivery up to the
/// [`StopSignal`].
pub trait ServiceHost: Send {
    fn register(&mut self, stop: &StopSignal) -> Result<()>;
    fn deregister(&mut self) -> Result<()>;
}

/// Host used when running as a plain process.
///
/// - registration writes the PID file (if configured)
/// - Ctrl-C, and SIGTERM on unix, set the stop signal
/// - deregistration removes the PID file
#[derive(Debug, Default)]
pub struct ConsoleHost {
    pid_file: Option<PathBuf>,
    listener: Option<JoinHandle<()>>,
}

impl ConsoleHost {
    pub fn new(pid_file: Option<PathBuf>) -> Self {
        Self {
            pid_file,
            listener: None,
        }
    }
}

impl ServiceHost for ConsoleHost {
    fn register(&mut self, stop: &StopSignal) -> Result<()> {
        if let Some(ref path) = self.pid_file {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, format!("{}\n", std::process::id()))?;
            debug!(path = %path.display(), "pid file written");
        }

        let stop = stop.clone();
        self.listener = Some(tokio::spawn(async move {
            if wait_for_shutdown_signal().await {
                stop.request_stop();
            }
        }));

        info!(pid = std::process::id(), "registered with console host");
        Ok(())
    }

    fn deregister(&mut self) -> Result<()> {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }

        if let Some(ref path) = self.pid_file {
            if let Err(e) = fs::remove_file(path) {
                warn!(path = %path.display(), error = %e, "failed to remove pid file");
            }
        }

        info!("deregistered from console host");
        Ok(())
    }
}

impl Drop for ConsoleHost {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

/// Wait for Ctrl-C (or SIGTERM on unix). Returns `false` if no listener
/// could be installed.
async fn wait_for_shutdown_signal() -> bool {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                return ctrl_c().await;
            }
        };

        tokio::select! {
            received = ctrl_c() => received,
            _ = term.recv() => {
                info!("SIGTERM received");
                true
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c().await
    }
}

async fn ctrl_c() -> bool {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Ctrl-C received");
            true
        }
        Err(e) => {
            warn!(error = %e, "failed to listen for Ctrl-C");
            false
        }
    }
}
