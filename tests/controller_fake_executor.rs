// tests/controller_fake_executor.rs

use std::error::Error;
use std::fs;

use tempfile::TempDir;

use instrd::service::{Controller, ServiceState};
use instrd::types::{Instruction, InstructionKind};
use instrd_test_utils::builders::SettingsBuilder;
use instrd_test_utils::fake_executor::FakeExecutor;
use instrd_test_utils::recording_host::{HostCall, RecordingHost};
use instrd_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn write_instructions(dir: &TempDir, contents: &str) -> TestResult {
    fs::write(dir.path().join("instructions.txt"), contents)?;
    Ok(())
}

#[tokio::test]
async fn instructions_are_dispatched_in_file_order() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    write_instructions(
        &dir,
        "cmd;echo hi_SEPARATOR_STRING_echo bye\nexe;/opt/tool\ncmd;echo last\n",
    )?;

    let executor = FakeExecutor::new();
    let settings = SettingsBuilder::in_dir(dir.path()).build();
    let mut controller = Controller::new(settings, executor.clone(), RecordingHost::new());

    let summary = with_timeout(controller.run()).await?;

    assert_eq!(
        executor.executed_snapshot(),
        vec![
            Instruction::new(InstructionKind::Cmd, "echo hi_SEPARATOR_STRING_echo bye"),
            Instruction::new(InstructionKind::Exe, "/opt/tool"),
            Instruction::new(InstructionKind::Cmd, "echo last"),
        ]
    );
    assert!(summary.source_opened);
    assert_eq!(summary.lines, 3);
    assert_eq!(summary.dispatched, 3);
    assert_eq!(summary.skipped, 0);
    Ok(())
}

#[tokio::test]
async fn malformed_lines_are_skipped_and_processing_continues() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    write_instructions(&dir, "bogus-line-no-semicolon\n\ncmd;echo ok\r\n")?;

    let executor = FakeExecutor::new();
    let settings = SettingsBuilder::in_dir(dir.path()).build();
    let mut controller = Controller::new(settings, executor.clone(), RecordingHost::new());

    let summary = with_timeout(controller.run()).await?;

    assert_eq!(
        executor.executed_snapshot(),
        vec![Instruction::new(InstructionKind::Cmd, "echo ok")]
    );
    assert_eq!(summary.lines, 3);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.dispatched, 1);
    Ok(())
}

#[tokio::test]
async fn unknown_kinds_are_never_dispatched() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    write_instructions(&dir, "reboot;now\nEXE;/bin/tool\nexe;/bin/tool\n")?;

    let executor = FakeExecutor::new();
    let settings = SettingsBuilder::in_dir(dir.path()).build();
    let mut controller = Controller::new(settings, executor.clone(), RecordingHost::new());

    let summary = with_timeout(controller.run()).await?;

    assert_eq!(
        executor.executed_snapshot(),
        vec![Instruction::new(InstructionKind::Exe, "/bin/tool")]
    );
    assert_eq!(summary.ignored, 2);
    Ok(())
}

#[tokio::test]
async fn missing_instruction_file_is_a_quiet_no_op() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;

    let executor = FakeExecutor::new();
    let host = RecordingHost::new();
    let settings = SettingsBuilder::in_dir(dir.path()).build();
    let mut controller = Controller::new(settings, executor.clone(), host.clone());

    let summary = with_timeout(controller.run()).await?;

    assert!(!summary.source_opened);
    assert!(executor.executed_snapshot().is_empty());
    assert_eq!(host.calls(), vec![HostCall::Register, HostCall::Deregister]);
    assert_eq!(controller.state(), ServiceState::Stopped);
    Ok(())
}

#[tokio::test]
async fn host_is_registered_then_deregistered() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    write_instructions(&dir, "cmd;echo hi\n")?;

    let host = RecordingHost::new();
    let settings = SettingsBuilder::in_dir(dir.path()).build();
    let mut controller = Controller::new(settings, FakeExecutor::new(), host.clone());

    assert_eq!(controller.state(), ServiceState::Stopped);
    with_timeout(controller.run()).await?;

    assert_eq!(host.calls(), vec![HostCall::Register, HostCall::Deregister]);
    assert_eq!(controller.state(), ServiceState::Stopped);
    Ok(())
}

#[tokio::test]
async fn failed_registration_aborts_before_any_work() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    write_instructions(&dir, "cmd;echo hi\n")?;

    let executor = FakeExecutor::new();
    let host = RecordingHost::failing();
    let settings = SettingsBuilder::in_dir(dir.path()).build();
    let mut controller = Controller::new(settings, executor.clone(), host.clone());

    assert!(with_timeout(controller.run()).await.is_err());
    assert!(executor.executed_snapshot().is_empty());
    assert_eq!(host.calls(), vec![HostCall::Register]);
    assert_eq!(controller.state(), ServiceState::Stopped);
    Ok(())
}

#[tokio::test]
async fn stop_before_the_first_line_accepts_nothing() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    write_instructions(&dir, "cmd;echo hi\ncmd;echo again\n")?;

    let executor = FakeExecutor::new();
    let host = RecordingHost::stopping_immediately();
    let settings = SettingsBuilder::in_dir(dir.path()).build();
    let mut controller = Controller::new(settings, executor.clone(), host.clone());

    let summary = with_timeout(controller.run()).await?;

    assert!(executor.executed_snapshot().is_empty());
    assert_eq!(summary.dispatched, 0);
    assert_eq!(host.calls(), vec![HostCall::Register, HostCall::Deregister]);
    Ok(())
}

/// There is no acknowledgment channel back to whoever wrote the instructions:
/// the instruction file is left untouched and no status file appears.
#[tokio::test]
async fn issuer_gets_no_acknowledgment() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let contents = "cmd;echo hi\nbroken\nother;thing\n";
    write_instructions(&dir, contents)?;

    let settings = SettingsBuilder::in_dir(dir.path()).build();
    let mut controller = Controller::new(settings, FakeExecutor::new(), RecordingHost::new());
    with_timeout(controller.run()).await?;

    assert_eq!(fs::read_to_string(dir.path().join("instructions.txt"))?, contents);
    let entries: Vec<_> = fs::read_dir(dir.path())?.collect::<Result<_, _>>()?;
    assert_eq!(entries.len(), 1);
    Ok(())
}

#[tokio::test]
async fn a_fresh_run_performs_a_fresh_pass() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    write_instructions(&dir, "cmd;echo hi\n")?;

    let executor = FakeExecutor::new();
    let settings = SettingsBuilder::in_dir(dir.path()).build();
    let mut controller = Controller::new(settings, executor.clone(), RecordingHost::new());

    with_timeout(controller.run()).await?;
    with_timeout(controller.run()).await?;

    assert_eq!(executor.executed_snapshot().len(), 2);
    Ok(())
}
