// src/service/mod.rs

//! Service lifecycle.
//!
//! - [`controller`] runs the instruction pass and walks the service states.
//! - [`context`] holds per-run state, created at start and dropped at teardown.
//! - [`signal`] is the stop flag handlers block on.
//! - [`host`] registers the agent with its supervisor and delivers stop.

pub mod context;
pub mod controller;
pub mod host;
pub mod signal;

pub use context::ServiceContext;
pub use controller::{Controller, RunSummary, ServiceState};
pub use host::{ConsoleHost, ServiceHost};
pub use signal::StopSignal;
