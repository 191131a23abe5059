// src/exec/cmd.rs

//! Batch execution of `cmd` instructions.
//!
//! A payload holds shell sub-commands joined by the separator token. Each
//! sub-command's stdout is appended to the staging file, followed by the
//! separator. Once the batch is through, the staging file is renamed onto
//! the published path, so readers see either no result or a complete one.
//!
//! Every step is best-effort: failures are logged and the batch moves on.

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::config::CmdSettings;
use crate::exec::runner::{self, OutputTarget, ProcessSpec, Wait};
use crate::service::StopSignal;

/// What happened to one batch. Only used for logging and tests; nothing is
/// reported back to whoever wrote the instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Sub-commands attempted; equals the number of separators written.
    pub executed: usize,
    pub timed_out: usize,
    pub spawn_failures: usize,
    /// Stop arrived mid-batch; remaining sub-commands were skipped.
    pub interrupted: bool,
    pub published: bool,
}

/// Split a payload into sub-commands, in order.
///
/// A trailing empty fragment (payload ending with the separator) is dropped.
/// Empty fragments elsewhere are kept.
pub fn split_sub_commands<'a>(payload: &'a str, separator: &str) -> Vec<&'a str> {
    let mut parts: Vec<&str> = payload.split(separator).collect();
    if parts.last() == Some(&"") {
        parts.pop();
    }
    parts
}

#[derive(Debug, Clone)]
pub struct CmdHandler {
    settings: CmdSettings,
}

impl CmdHandler {
    pub fn new(settings: CmdSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CmdSettings {
        &self.settings
    }

    pub async fn handle(&self, payload: &str, stop: &StopSignal) -> BatchReport {
        let CmdSettings {
            staging,
            published,
            separator,
            timeout,
        } = &self.settings;

        remove_if_present(staging).await;
        remove_if_present(published).await;

        let sub_commands = split_sub_commands(payload, separator);
        info!(count = sub_commands.len(), "starting cmd batch");

        let mut report = BatchReport::default();

        for (idx, sub) in sub_commands.iter().enumerate() {
            if stop.is_stop_requested() {
                report.interrupted = true;
                break;
            }

            debug!(index = idx, command = %sub, "running sub-command");
            let spec = ProcessSpec::shell(sub).with_stdout(OutputTarget::AppendTo(staging.clone()));

            match runner::run(&spec, Wait::Timeout(*timeout), stop).await {
                Ok(outcome) => {
                    if outcome.timed_out {
                        report.timed_out += 1;
                    }
                    if outcome.stopped {
                        report.interrupted = true;
                    }
                }
                Err(e) => {
                    warn!(index = idx, command = %sub, error = %e, "sub-command failed to start");
                    report.spawn_failures += 1;
                }
            }

            append_separator(staging, separator).await;
            report.executed += 1;

            if report.interrupted {
                break;
            }
        }

        if report.interrupted {
            warn!(
                executed = report.executed,
                staging = %staging.display(),
                "stop requested mid-batch; result not published"
            );
            return report;
        }

        match fs::rename(staging, published).await {
            Ok(()) => {
                report.published = true;
                info!(
                    executed = report.executed,
                    timed_out = report.timed_out,
                    path = %published.display(),
                    "cmd batch published"
                );
            }
            Err(e) => {
                warn!(
                    from = %staging.display(),
                    to = %published.display(),
                    error = %e,
                    "failed to publish cmd batch"
                );
            }
        }

        report
    }
}

async fn remove_if_present(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "removed previous result file"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "could not remove previous result file"),
    }
}

async fn append_separator(path: &Path, separator: &str) {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await;

    let mut file = match file {
        Ok(f) => f,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not open staging file for append");
            return;
        }
    };

    if let Err(e) = file.write_all(separator.as_bytes()).await {
        warn!(path = %path.display(), error = %e, "could not append separator");
        return;
    }
    if let Err(e) = file.flush().await {
        warn!(path = %path.display(), error = %e, "could not flush staging file");
    }
}
