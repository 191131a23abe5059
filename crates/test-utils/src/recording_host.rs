use std::sync::{Arc, Mutex};

use instrd::errors::{AgentError, Result};
use instrd::service::{ServiceHost, StopSignal};

/// Host calls observed by a [`RecordingHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
    Register,
    Deregister,
}

/// In-memory `ServiceHost` that records calls and hands out the stop signal
/// it was registered with, so tests can request stop from outside.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    calls: Arc<Mutex<Vec<HostCall>>>,
    stop: Arc<Mutex<Option<StopSignal>>>,
    fail_register: bool,
    stop_on_register: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// `register` fails with a config error.
    pub fn failing() -> Self {
        Self {
            fail_register: true,
            ..Self::default()
        }
    }

    /// The stop signal is raised as soon as the controller registers.
    pub fn stopping_immediately() -> Self {
        Self {
            stop_on_register: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Shared handle to the captured stop signal, usable from other tasks.
    pub fn stop_slot(&self) -> Arc<Mutex<Option<StopSignal>>> {
        Arc::clone(&self.stop)
    }
}

impl ServiceHost for RecordingHost {
    fn register(&mut self, stop: &StopSignal) -> Result<()> {
        self.calls.lock().unwrap().push(HostCall::Register);
        if self.fail_register {
            return Err(AgentError::Config("registration refused".to_string()));
        }
        *self.stop.lock().unwrap() = Some(stop.clone());
        if self.stop_on_register {
            stop.request_stop();
        }
        Ok(())
    }

    fn deregister(&mut self) -> Result<()> {
        self.calls.lock().unwrap().push(HostCall::Deregister);
        Ok(())
    }
}
