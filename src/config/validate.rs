// src/config/validate.rs

use std::path::{Path, PathBuf};

use crate::config::duration::parse_duration;
use crate::config::model::{RawConfigFile, Settings};
use crate::errors::{AgentError, Result};
use crate::expand::expand_env_with;

/// Environment variable that overrides the default base directory.
pub const HOME_ENV: &str = "INSTRD_HOME";

impl TryFrom<RawConfigFile> for Settings {
    type Error = AgentError;

    fn try_from(raw: RawConfigFile) -> Result<Self> {
        resolve_settings(&raw, |name| std::env::var(name).ok())
    }
}

/// Validate a raw config and resolve it into [`Settings`].
///
/// This checks:
/// - the separator is non-empty and contains no `;` or line break
/// - `sub_command_timeout` parses and is non-zero
/// - every path expands (no undefined variables)
/// - staging and published resolve to different paths
pub fn resolve_settings<F>(raw: &RawConfigFile, lookup: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    validate_separator(&raw.exec.separator)?;

    let sub_command_timeout = parse_duration(&raw.exec.sub_command_timeout)
        .map_err(|e| AgentError::Config(format!("[exec].sub_command_timeout: {e}")))?;
    if sub_command_timeout.is_zero() {
        return Err(AgentError::Config(
            "[exec].sub_command_timeout must be > 0".to_string(),
        ));
    }

    let base_dir = match raw.paths.base_dir.as_deref() {
        Some(dir) => PathBuf::from(expand_env_with(dir, &lookup)?),
        None => lookup(HOME_ENV)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir),
    };

    let resolve = |value: &str| -> Result<PathBuf> {
        let expanded = expand_env_with(value, &lookup)?;
        Ok(resolve_against(&base_dir, Path::new(&expanded)))
    };

    let instructions = resolve(&raw.paths.instructions)?;
    let staging = resolve(&raw.paths.staging)?;
    let published = resolve(&raw.paths.published)?;
    let pid_file = raw.paths.pid_file.as_deref().map(&resolve).transpose()?;

    if staging == published {
        return Err(AgentError::Config(format!(
            "[paths].staging and [paths].published must differ (both are {:?})",
            staging
        )));
    }

    Ok(Settings {
        instructions,
        staging,
        published,
        pid_file,
        separator: raw.exec.separator.clone(),
        sub_command_timeout,
    })
}

fn validate_separator(separator: &str) -> Result<()> {
    if separator.is_empty() {
        return Err(AgentError::Config(
            "[exec].separator must not be empty".to_string(),
        ));
    }
    if separator.contains([';', '\n', '\r']) {
        return Err(AgentError::Config(format!(
            "[exec].separator must not contain ';' or line breaks (got {:?})",
            separator
        )));
    }
    Ok(())
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
