// tests/exe_env_expansion.rs
#![cfg(unix)]

// The only test in this binary: it mutates the process environment, which
// must not race with other threads reading it.

use std::error::Error;

use instrd::exec::{ExeHandler, ExeOutcome};
use instrd::service::StopSignal;
use instrd_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn payload_variables_are_expanded_before_spawning() -> TestResult {
    init_tracing();
    // SAFETY: no other test runs in this binary, and the variable is set
    // before the handler spawns anything.
    unsafe { std::env::set_var("INSTRD_TEST_SHELL_DIR", "/bin") };

    let stop = StopSignal::new();
    stop.request_stop();

    let outcome = with_timeout(ExeHandler::new().handle("%INSTRD_TEST_SHELL_DIR%/sh", &stop)).await;
    assert_eq!(outcome, ExeOutcome::Stopped);
    Ok(())
}
