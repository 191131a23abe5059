// tests/end_to_end.rs
#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::time::Duration;

use tempfile::TempDir;

use instrd::exec::RealExecutorBackend;
use instrd::service::{Controller, ServiceState};
use instrd_test_utils::builders::SettingsBuilder;
use instrd_test_utils::recording_host::{HostCall, RecordingHost};
use instrd_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

const SEP: &str = "_SEPARATOR_STRING_";

#[tokio::test]
async fn cmd_instruction_publishes_framed_output() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let settings = SettingsBuilder::in_dir(dir.path()).build();
    fs::write(
        &settings.instructions,
        format!("bogus-line-no-semicolon\ncmd;echo hi{SEP}echo bye\n"),
    )?;

    let published = settings.published.clone();
    let backend = RealExecutorBackend::new(&settings);
    let mut controller = Controller::new(settings, backend, RecordingHost::new());

    let summary = with_timeout(controller.run()).await?;

    assert_eq!(summary.dispatched, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(fs::read_to_string(&published)?, format!("hi\n{SEP}bye\n{SEP}"));
    Ok(())
}

#[tokio::test]
async fn later_batch_replaces_earlier_result() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let settings = SettingsBuilder::in_dir(dir.path()).build();
    fs::write(&settings.instructions, "cmd;echo first\ncmd;echo second\n")?;

    let published = settings.published.clone();
    let backend = RealExecutorBackend::new(&settings);
    let mut controller = Controller::new(settings, backend, RecordingHost::new());

    with_timeout(controller.run()).await?;

    assert_eq!(fs::read_to_string(&published)?, format!("second\n{SEP}"));
    Ok(())
}

#[tokio::test]
async fn exe_instruction_holds_the_worker_until_stop() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let settings = SettingsBuilder::in_dir(dir.path()).build();
    fs::write(&settings.instructions, "exe;/bin/sh\ncmd;echo never\n")?;

    let published = settings.published.clone();
    let host = RecordingHost::new();
    let backend = RealExecutorBackend::new(&settings);
    let mut controller = Controller::new(settings, backend, host.clone());

    let stop_slot = host.stop_slot();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        let stop = stop_slot.lock().unwrap().clone();
        if let Some(stop) = stop {
            stop.request_stop();
        }
    });

    let summary = with_timeout(controller.run()).await?;

    // The exe line was dispatched; the cmd line after it never was.
    assert_eq!(summary.dispatched, 1);
    assert!(!published.exists());
    assert_eq!(host.calls(), vec![HostCall::Register, HostCall::Deregister]);
    assert_eq!(controller.state(), ServiceState::Stopped);
    Ok(())
}
