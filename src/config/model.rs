// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Default separator between `cmd` sub-commands and their outputs.
pub const DEFAULT_SEPARATOR: &str = "_SEPARATOR_STRING_";

/// Default time to wait for each `cmd` sub-command.
pub const DEFAULT_SUB_COMMAND_TIMEOUT: &str = "30s";

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [paths]
/// base_dir = "${INSTRD_HOME}"
/// instructions = "instructions.txt"
/// staging = "commands_result.tmp"
/// published = "commands_result.txt"
/// pid_file = "instrd.pid"
///
/// [exec]
/// separator = "_SEPARATOR_STRING_"
/// sub_command_timeout = "30s"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub paths: PathsSection,

    #[serde(default)]
    pub exec: ExecSection,
}

/// `[paths]` section.
///
/// Relative paths are resolved against `base_dir`. Every value goes through
/// environment-variable expansion first.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    /// Directory relative paths resolve against.
    ///
    /// If `None`: `$INSTRD_HOME`, else the OS temp dir.
    #[serde(default)]
    pub base_dir: Option<String>,

    #[serde(default = "default_instructions")]
    pub instructions: String,

    #[serde(default = "default_staging")]
    pub staging: String,

    #[serde(default = "default_published")]
    pub published: String,

    /// Written on registration, removed on teardown. `None` disables it.
    #[serde(default)]
    pub pid_file: Option<String>,
}

fn default_instructions() -> String {
    "instructions.txt".to_string()
}

fn default_staging() -> String {
    "commands_result.tmp".to_string()
}

fn default_published() -> String {
    "commands_result.txt".to_string()
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            base_dir: None,
            instructions: default_instructions(),
            staging: default_staging(),
            published: default_published(),
            pid_file: None,
        }
    }
}

/// `[exec]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecSection {
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Duration string, e.g. `"30s"` or `"250ms"`.
    #[serde(default = "default_sub_command_timeout")]
    pub sub_command_timeout: String,
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

fn default_sub_command_timeout() -> String {
    DEFAULT_SUB_COMMAND_TIMEOUT.to_string()
}

impl Default for ExecSection {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            sub_command_timeout: default_sub_command_timeout(),
        }
    }
}

/// Fully resolved runtime settings: absolute paths, parsed durations.
///
/// Built from a [`RawConfigFile`] via `TryFrom`, which runs validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub instructions: PathBuf,
    pub staging: PathBuf,
    pub published: PathBuf,
    pub pid_file: Option<PathBuf>,
    pub separator: String,
    pub sub_command_timeout: Duration,
}

impl Settings {
    /// Staging/published/separator/timeout, as consumed by the cmd handler.
    pub fn cmd_settings(&self) -> CmdSettings {
        CmdSettings {
            staging: self.staging.clone(),
            published: self.published.clone(),
            separator: self.separator.clone(),
            timeout: self.sub_command_timeout,
        }
    }
}

/// The subset of [`Settings`] the cmd handler needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdSettings {
    pub staging: PathBuf,
    pub published: PathBuf,
    pub separator: String,
    pub timeout: Duration,
}
