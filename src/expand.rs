// src/expand.rs

//! Environment-variable expansion for instruction payloads and config paths.
//!
//! Recognised forms:
//! - `%NAME%` (Windows style)
//! - `${NAME}`
//! - `$NAME`
//!
//! Undefined variables are an error. A `%` or `$` that does not form one of
//! the forms above is copied through unchanged.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::errors::{AgentError, Result};

const VAR_PATTERN: &str = r"%([A-Za-z_][A-Za-z0-9_().\-]*)%|\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)";

static VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(VAR_PATTERN).expect("variable pattern is a valid regex"));

/// Expand variables using the process environment.
pub fn expand_env(input: &str) -> Result<String> {
    expand_env_with(input, |name| std::env::var(name).ok())
}

/// Expand variables using a caller-supplied lookup.
pub fn expand_env_with<F>(input: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    if !input.contains(['%', '$']) {
        return Ok(input.to_string());
    }

    let mut out = String::with_capacity(input.len());
    let mut last = 0;

    for caps in VAR_RE.captures_iter(input) {
        let Some(whole) = caps.get(0) else { continue };
        let name = var_name(&caps);

        let value = lookup(name).ok_or_else(|| AgentError::UndefinedVariable(name.to_string()))?;

        out.push_str(&input[last..whole.start()]);
        out.push_str(&value);
        last = whole.end();
    }

    out.push_str(&input[last..]);
    Ok(out)
}

fn var_name<'a>(caps: &Captures<'a>) -> &'a str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
        .unwrap_or_default()
}
