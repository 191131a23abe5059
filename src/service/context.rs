// src/service/context.rs

use crate::config::Settings;
use crate::service::signal::StopSignal;

/// Everything a run needs, created when the service starts and dropped when
/// it tears down.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    pub settings: Settings,
    pub stop: StopSignal,
}

impl ServiceContext {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            stop: StopSignal::new(),
        }
    }
}
