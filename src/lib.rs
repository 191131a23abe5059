// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod expand;
pub mod instruction;
pub mod logging;
pub mod service;
pub mod types;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::Settings;
use crate::exec::RealExecutorBackend;
use crate::expand::expand_env;
use crate::instruction::source::{InstructionSource, SourceItem};
use crate::service::{ConsoleHost, Controller};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - executor backend (exe / cmd handlers)
/// - console host (PID file, Ctrl-C / SIGTERM)
/// - the service controller
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = settings_from_args(&args)?;

    if args.dry_run {
        print_dry_run(&settings).await?;
        return Ok(());
    }

    let backend = RealExecutorBackend::new(&settings);
    let host = ConsoleHost::new(settings.pid_file.clone());

    info!(
        instructions = %settings.instructions.display(),
        published = %settings.published.display(),
        "instrd starting"
    );

    let mut controller = Controller::new(settings, backend, host);
    controller.run().await?;
    Ok(())
}

/// Resolve settings from the config file (if any) plus CLI overrides.
pub fn settings_from_args(args: &CliArgs) -> Result<Settings> {
    let mut settings = config::load_or_default(args.config.as_deref().map(Path::new))?;

    if let Some(ref path) = args.instructions {
        settings.instructions = PathBuf::from(expand_env(path)?);
    }

    Ok(settings)
}

/// Simple dry-run output: print resolved paths and every parsed line.
async fn print_dry_run(settings: &Settings) -> Result<()> {
    println!("instrd dry-run");
    println!("  instructions = {}", settings.instructions.display());
    println!("  staging = {}", settings.staging.display());
    println!("  published = {}", settings.published.display());
    if let Some(ref pid_file) = settings.pid_file {
        println!("  pid_file = {}", pid_file.display());
    }
    println!("  separator = {:?}", settings.separator);
    println!("  sub_command_timeout = {:?}", settings.sub_command_timeout);
    println!();

    let mut source = InstructionSource::open(&settings.instructions).await?;
    while let Some(item) = source.next_item().await? {
        match item {
            SourceItem::Instruction { line_no, instruction } => {
                println!("  {line_no:>4}: {}", instruction.kind);
                println!("        payload: {}", instruction.payload);
            }
            SourceItem::Skipped { line_no } => {
                println!("  {line_no:>4}: (skipped, no ';')");
            }
        }
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
