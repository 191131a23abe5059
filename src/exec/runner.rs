// src/exec/runner.rs

//! Process runner shared by the exe and cmd handlers.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{ChildStdout, Command};
use tokio::sync::oneshot;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::{AgentError, Result};
use crate::service::StopSignal;

/// Where a child's stdout goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Share the agent's stdout.
    Inherit,
    /// Discard.
    Null,
    /// Append to a file, creating it if needed.
    ///
    /// Output is piped through the runner, so once a timed wait ends the
    /// file receives nothing more from this process.
    AppendTo(PathBuf),
}

/// A process to launch: program, arguments and stdout routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    pub stdout: OutputTarget,
}

impl ProcessSpec {
    /// Run `program` directly, without a shell.
    pub fn direct(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdout: OutputTarget::Inherit,
        }
    }

    /// Run `command` through the platform shell (`sh -c` / `cmd /C`).
    pub fn shell(command: &str) -> Self {
        let (program, flag) = if cfg!(windows) {
            ("cmd", "/C")
        } else {
            ("sh", "-c")
        };
        Self {
            program: program.to_string(),
            args: vec![flag.to_string(), command.to_string()],
            stdout: OutputTarget::Inherit,
        }
    }

    pub fn with_stdout(mut self, target: OutputTarget) -> Self {
        self.stdout = target;
        self
    }

    /// Human-readable command line for logs and errors.
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// How long the runner waits for the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// Return right after spawning.
    Detach,
    /// Wait for exit, at most this long.
    Timeout(Duration),
}

/// What the runner observed.
///
/// A process that outlives its wait is left running: nothing here ever
/// kills a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOutcome {
    pub exit_observed: bool,
    pub timed_out: bool,
    /// The stop signal ended the wait early.
    pub stopped: bool,
    pub exit_code: Option<i32>,
}

/// Spawn the process described by `spec` and wait according to `wait`.
///
/// With [`Wait::Timeout`], stderr is piped and logged at debug; with
/// [`Wait::Detach`] it is inherited, since the child may outlive the agent.
///
/// For [`OutputTarget::AppendTo`], output written after a timeout or a stop
/// is read and discarded: the process keeps running but the file is left
/// alone.
pub async fn run(spec: &ProcessSpec, wait: Wait, stop: &StopSignal) -> Result<RunOutcome> {
    let command_line = spec.command_line();

    let append_file = match spec.stdout {
        OutputTarget::AppendTo(ref path) => Some(open_append(path)?),
        _ => None,
    };

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(Stdio::null())
        .stdout(match spec.stdout {
            OutputTarget::Inherit => Stdio::inherit(),
            OutputTarget::Null => Stdio::null(),
            OutputTarget::AppendTo(_) => Stdio::piped(),
        })
        .kill_on_drop(false);

    cmd.stderr(match wait {
        Wait::Detach => Stdio::inherit(),
        Wait::Timeout(_) => Stdio::piped(),
    });

    let mut child = cmd.spawn().map_err(|source| AgentError::Spawn {
        command: command_line.clone(),
        source,
    })?;

    info!(command = %command_line, pid = child.id(), "process spawned");

    if let Some(stderr) = child.stderr.take() {
        let command_line = command_line.clone();
        tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(command = %command_line, "stderr: {}", line);
            }
        });
    }

    let forwarder = match (append_file, child.stdout.take()) {
        (Some(file), Some(stdout)) => Some(Forwarder::spawn(stdout, file, command_line.clone())),
        _ => None,
    };

    let limit = match wait {
        Wait::Detach => return Ok(RunOutcome::default()),
        Wait::Timeout(limit) => limit,
    };
    let deadline = deadline_after(limit);

    let outcome = tokio::select! {
        biased;

        status = child.wait() => {
            let status = status?;
            debug!(command = %command_line, exit_code = ?status.code(), "process exited");
            RunOutcome {
                exit_observed: true,
                exit_code: status.code(),
                ..RunOutcome::default()
            }
        }

        _ = tokio::time::sleep_until(deadline) => {
            warn!(
                command = %command_line,
                timeout_ms = limit.as_millis() as u64,
                "process did not exit before timeout; leaving it running"
            );
            RunOutcome {
                timed_out: true,
                ..RunOutcome::default()
            }
        }

        _ = stop.wait() => {
            info!(command = %command_line, "stop requested while waiting for process");
            RunOutcome {
                stopped: true,
                ..RunOutcome::default()
            }
        }
    };

    if let Some(forwarder) = forwarder {
        if outcome.exit_observed {
            forwarder.finish_by(deadline).await;
        } else {
            forwarder.cut().await;
        }
    }

    Ok(outcome)
}

/// `now + limit`, saturating to roughly thirty years out.
fn deadline_after(limit: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(limit)
        .unwrap_or_else(|| now + Duration::from_secs(30 * 365 * 86_400))
}

fn open_append(path: &Path) -> Result<File> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(File::from_std(file))
}

/// Copies a child's stdout into a file until told to stop writing.
///
/// After the cut the pipe is still drained so the child never sees a closed
/// stdout.
struct Forwarder {
    gate: CancellationToken,
    released: oneshot::Receiver<()>,
}

impl Forwarder {
    fn spawn(stdout: ChildStdout, file: File, command_line: String) -> Self {
        let gate = CancellationToken::new();
        let (tx, released) = oneshot::channel();
        tokio::spawn(forward_stdout(stdout, file, gate.clone(), tx, command_line));
        Self { gate, released }
    }

    /// The child exited: let remaining output through, but stop writing once
    /// `deadline` passes (a grandchild may hold the pipe open).
    async fn finish_by(mut self, deadline: Instant) {
        if tokio::time::timeout_at(deadline, &mut self.released).await.is_err() {
            debug!("stdout still open after exit; cutting output");
            self.cut().await;
        }
    }

    /// Stop writing to the file; returns once the file is released.
    async fn cut(self) {
        self.gate.cancel();
        let _ = self.released.await;
    }
}

async fn forward_stdout(
    mut stdout: ChildStdout,
    file: File,
    gate: CancellationToken,
    released: oneshot::Sender<()>,
    command_line: String,
) {
    let mut sink = Some(file);
    let mut released = Some(released);
    let mut buf = vec![0u8; 8 * 1024];

    loop {
        let read = tokio::select! {
            biased;
            _ = gate.cancelled(), if sink.is_some() => {
                release(&mut sink, &mut released).await;
                continue;
            }
            read = stdout.read(&mut buf) => read,
        };

        let n = match read {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                debug!(command = %command_line, error = %e, "stdout read failed");
                break;
            }
        };

        if let Some(file) = sink.as_mut() {
            if let Err(e) = file.write_all(&buf[..n]).await {
                warn!(command = %command_line, error = %e, "could not write process output");
                release(&mut sink, &mut released).await;
            }
        }
    }

    release(&mut sink, &mut released).await;
}

async fn release(sink: &mut Option<File>, released: &mut Option<oneshot::Sender<()>>) {
    if let Some(mut file) = sink.take() {
        let _ = file.flush().await;
    }
    if let Some(tx) = released.take() {
        let _ = tx.send(());
    }
}
