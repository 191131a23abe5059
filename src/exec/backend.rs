// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The controller talks to an `ExecutorBackend` instead of calling the
//! handlers directly. This makes it easy to swap in a fake executor in tests
//! while keeping the production handlers in [`exe`] and [`cmd`].
//!
//! [`exe`]: crate::exec::exe
//! [`cmd`]: crate::exec::cmd

use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use crate::config::Settings;
use crate::errors::Result;
use crate::exec::cmd::CmdHandler;
use crate::exec::exe::ExeHandler;
use crate::service::StopSignal;
use crate::types::{Instruction, InstructionKind};

/// Trait abstracting how instructions are executed.
///
/// Production code uses [`RealExecutorBackend`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait ExecutorBackend: Send {
    /// Execute one instruction to completion.
    ///
    /// The future may stay pending until `stop` is set (exe instructions do).
    fn execute(
        &mut self,
        instruction: Instruction,
        stop: StopSignal,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Real executor backend used in production.
#[derive(Debug, Clone)]
pub struct RealExecutorBackend {
    exe: ExeHandler,
    cmd: CmdHandler,
}

impl RealExecutorBackend {
    pub fn new(settings: &Settings) -> Self {
        Self {
            exe: ExeHandler::new(),
            cmd: CmdHandler::new(settings.cmd_settings()),
        }
    }
}

impl ExecutorBackend for RealExecutorBackend {
    fn execute(
        &mut self,
        instruction: Instruction,
        stop: StopSignal,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            match instruction.kind {
                InstructionKind::Exe => {
                    let outcome = self.exe.handle(&instruction.payload, &stop).await;
                    debug!(?outcome, "exe instruction finished");
                }
                InstructionKind::Cmd => {
                    let report = self.cmd.handle(&instruction.payload, &stop).await;
                    debug!(?report, "cmd instruction finished");
                }
                InstructionKind::Other(kind) => {
                    debug!(kind = %kind, "no handler for instruction kind; ignoring");
                }
            }
            Ok(())
        })
    }
}
