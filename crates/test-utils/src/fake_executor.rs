use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use instrd::errors::Result;
use instrd::exec::ExecutorBackend;
use instrd::service::StopSignal;
use instrd::types::Instruction;

/// A fake executor that:
/// - records which instructions were dispatched, in order
/// - completes each one immediately without spawning anything.
#[derive(Clone, Default)]
pub struct FakeExecutor {
    executed: Arc<Mutex<Vec<Instruction>>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executed_snapshot(&self) -> Vec<Instruction> {
        self.executed.lock().unwrap().clone()
    }
}

impl ExecutorBackend for FakeExecutor {
    fn execute(
        &mut self,
        instruction: Instruction,
        _stop: StopSignal,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let executed = Arc::clone(&self.executed);

        Box::pin(async move {
            executed.lock().unwrap().push(instruction);
            Ok(())
        })
    }
}
