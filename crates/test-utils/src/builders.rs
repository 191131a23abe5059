#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use instrd::config::model::{DEFAULT_SEPARATOR, Settings};

/// Builder for `Settings` rooted in a scratch directory.
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    /// All files live directly under `dir`, with the default file names.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            settings: Settings {
                instructions: dir.join("instructions.txt"),
                staging: dir.join("commands_result.tmp"),
                published: dir.join("commands_result.txt"),
                pid_file: None,
                separator: DEFAULT_SEPARATOR.to_string(),
                sub_command_timeout: Duration::from_secs(30),
            },
        }
    }

    pub fn instructions(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings.instructions = path.into();
        self
    }

    pub fn pid_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings.pid_file = Some(path.into());
        self
    }

    pub fn separator(mut self, separator: &str) -> Self {
        self.settings.separator = separator.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.sub_command_timeout = timeout;
        self
    }

    pub fn build(self) -> Settings {
        self.settings
    }
}
