// src/exec/exe.rs

use tracing::{info, warn};

use crate::exec::runner::{self, OutputTarget, ProcessSpec, Wait};
use crate::expand::expand_env;
use crate::service::StopSignal;

/// How an `exe` instruction ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExeOutcome {
    /// The executable was spawned and the handler held until stop.
    Stopped,
    /// The payload referenced an undefined variable; nothing was spawned.
    ExpansionFailed,
    /// The executable could not be started.
    SpawnFailed,
}

/// Runs a standalone executable, then keeps the worker parked until the
/// service is asked to stop.
#[derive(Debug, Clone, Default)]
pub struct ExeHandler;

impl ExeHandler {
    pub fn new() -> Self {
        Self
    }

    /// Spawn the executable named by `payload` once (no wait for exit), then
    /// block until `stop` is set.
    ///
    /// Expansion and spawn failures end this instruction early; they never
    /// reach the caller as errors.
    pub async fn handle(&self, payload: &str, stop: &StopSignal) -> ExeOutcome {
        let program = match expand_env(payload) {
            Ok(p) => p,
            Err(e) => {
                warn!(payload = %payload, error = %e, "could not expand exe path; skipping");
                return ExeOutcome::ExpansionFailed;
            }
        };

        let spec = ProcessSpec::direct(program).with_stdout(OutputTarget::Inherit);
        if let Err(e) = runner::run(&spec, Wait::Detach, stop).await {
            warn!(command = %spec.command_line(), error = %e, "failed to start executable");
            return ExeOutcome::SpawnFailed;
        }

        info!(command = %spec.command_line(), "executable started; holding until stop");
        stop.wait().await;
        info!(command = %spec.command_line(), "stop observed; releasing exe instruction");

        ExeOutcome::Stopped
    }
}
