// src/service/controller.rs

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::errors::Result;
use crate::exec::ExecutorBackend;
use crate::instruction::source::{InstructionSource, SourceItem};
use crate::service::context::ServiceContext;
use crate::service::host::ServiceHost;
use crate::service::signal::StopSignal;
use crate::types::{Instruction, InstructionKind};

/// Lifecycle of one controller run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Stopped,
    Starting,
    Running,
    StopRequested,
    TearingDown,
}

/// Counters for one pass over the instruction file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// `false` if the instruction file could not be opened.
    pub source_opened: bool,
    pub lines: usize,
    /// Instructions handed to the executor backend.
    pub dispatched: usize,
    /// Lines without a `;` delimiter.
    pub skipped: usize,
    /// Instructions with a kind nobody handles.
    pub ignored: usize,
}

/// Owns the run loop: register with the host, read the instruction file
/// once, dispatch each instruction in file order, tear down.
///
/// Instructions are handled strictly one at a time; the backend's future for
/// an instruction is awaited before the next line is read.
pub struct Controller<E: ExecutorBackend, H: ServiceHost> {
    settings: Settings,
    backend: E,
    host: H,
    state: ServiceState,
}

impl<E: ExecutorBackend, H: ServiceHost> fmt::Debug for Controller<E, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend, H: ServiceHost> Controller<E, H> {
    pub fn new(settings: Settings, backend: E, host: H) -> Self {
        Self {
            settings,
            backend,
            host,
            state: ServiceState::Stopped,
        }
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    /// Perform one full pass.
    ///
    /// Only a failed host registration is returned as an error. Everything
    /// else, including an instruction file that cannot be opened, ends the
    /// pass normally and is visible in the returned [`RunSummary`].
    pub async fn run(&mut self) -> Result<RunSummary> {
        self.transition(ServiceState::Starting);
        let ctx = ServiceContext::new(self.settings.clone());

        if let Err(e) = self.host.register(&ctx.stop) {
            error!(error = %e, "service registration failed");
            self.transition(ServiceState::Stopped);
            return Err(e);
        }

        self.transition(ServiceState::Running);
        let summary = self.drive(&ctx).await;

        if ctx.stop.is_stop_requested() {
            self.transition(ServiceState::StopRequested);
        }

        self.transition(ServiceState::TearingDown);
        if let Err(e) = self.host.deregister() {
            warn!(error = %e, "service deregistration failed");
        }
        drop(ctx);
        self.transition(ServiceState::Stopped);

        info!(
            lines = summary.lines,
            dispatched = summary.dispatched,
            skipped = summary.skipped,
            ignored = summary.ignored,
            "instruction pass finished"
        );
        Ok(summary)
    }

    async fn drive(&mut self, ctx: &ServiceContext) -> RunSummary {
        let mut summary = RunSummary::default();

        let mut source = match InstructionSource::open(&ctx.settings.instructions).await {
            Ok(source) => source,
            Err(e) => {
                error!(error = %e, "instruction file unavailable; nothing to do");
                return summary;
            }
        };
        summary.source_opened = true;
        info!(path = %source.path().display(), "reading instructions");

        loop {
            if ctx.stop.is_stop_requested() {
                info!("stop requested; no further instructions accepted");
                break;
            }

            let item = tokio::select! {
                biased;
                _ = ctx.stop.wait() => continue,
                item = source.next_item() => item,
            };

            match item {
                Ok(Some(SourceItem::Instruction { line_no, instruction })) => {
                    self.dispatch(line_no, instruction, &ctx.stop, &mut summary).await;
                }
                Ok(Some(SourceItem::Skipped { line_no })) => {
                    debug!(line_no, "line is not `kind;payload`; skipped");
                    summary.skipped += 1;
                }
                Ok(None) => {
                    info!("end of instruction file");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "failed reading instruction file; ending pass");
                    break;
                }
            }
        }

        summary.lines = source.lines_read();
        summary
    }

    async fn dispatch(
        &mut self,
        line_no: usize,
        instruction: Instruction,
        stop: &StopSignal,
        summary: &mut RunSummary,
    ) {
        if let InstructionKind::Other(ref kind) = instruction.kind {
            debug!(line_no, kind = %kind, "unknown instruction kind; ignored");
            summary.ignored += 1;
            return;
        }

        info!(line_no, kind = %instruction.kind, "dispatching instruction");
        summary.dispatched += 1;

        if let Err(e) = self.backend.execute(instruction, stop.clone()).await {
            warn!(line_no, error = %e, "instruction execution failed");
        }
    }

    fn transition(&mut self, next: ServiceState) {
        debug!(from = ?self.state, to = ?next, "service state change");
        self.state = next;
    }
}
