// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `instrd`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "instrd",
    version,
    about = "Execute exe/cmd instructions from an instruction file and publish the results.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to an optional config file (TOML).
    ///
    /// Without it, built-in defaults are used (files under `$INSTRD_HOME`,
    /// or the OS temp dir).
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Override the instruction file path.
    #[arg(long, value_name = "PATH")]
    pub instructions: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `INSTRD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse the instruction file and print it, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
