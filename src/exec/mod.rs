// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running instructions, using
//! `tokio::process::Command`.
//!
//! - [`runner`] spawns a process, routes its stdout and optionally waits for
//!   it with a timeout. It never kills what it spawned.
//! - [`exe`] handles `exe` instructions: spawn once, hold until stop.
//! - [`cmd`] handles `cmd` instructions: run a batch, publish atomically.
//! - [`backend`] provides the `ExecutorBackend` trait and a concrete
//!   `RealExecutorBackend` that the controller uses in production, and which
//!   tests can replace with a fake implementation.

pub mod backend;
pub mod cmd;
pub mod exe;
pub mod runner;

pub use backend::{ExecutorBackend, RealExecutorBackend};
pub use cmd::{BatchReport, CmdHandler};
pub use exe::{ExeHandler, ExeOutcome};
pub use runner::{OutputTarget, ProcessSpec, RunOutcome, Wait};
