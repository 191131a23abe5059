// tests/expand_env.rs

use std::error::Error;

use instrd::errors::AgentError;
use instrd::expand::{expand_env, expand_env_with};

type TestResult = Result<(), Box<dyn Error>>;

fn lookup(name: &str) -> Option<String> {
    match name {
        "WINDIR" => Some("C:\\Windows".to_string()),
        "HOME" => Some("/home/agent".to_string()),
        "ProgramFiles(x86)" => Some("C:\\Program Files (x86)".to_string()),
        _ => None,
    }
}

#[test]
fn windows_style_variables_expand() -> TestResult {
    assert_eq!(
        expand_env_with("%WINDIR%\\System32\\tool.exe", lookup)?,
        "C:\\Windows\\System32\\tool.exe"
    );
    assert_eq!(
        expand_env_with("%ProgramFiles(x86)%\\app.exe", lookup)?,
        "C:\\Program Files (x86)\\app.exe"
    );
    Ok(())
}

#[test]
fn unix_style_variables_expand() -> TestResult {
    assert_eq!(expand_env_with("$HOME/bin/tool", lookup)?, "/home/agent/bin/tool");
    assert_eq!(expand_env_with("${HOME}tool", lookup)?, "/home/agenttool");
    Ok(())
}

#[test]
fn text_without_variables_is_unchanged() -> TestResult {
    assert_eq!(expand_env_with("/usr/bin/tool", lookup)?, "/usr/bin/tool");
    assert_eq!(expand_env_with("50% done", lookup)?, "50% done");
    assert_eq!(expand_env_with("cost $5", lookup)?, "cost $5");
    Ok(())
}

#[test]
fn undefined_variable_is_an_error() {
    match expand_env_with("%NOPE%\\tool.exe", lookup) {
        Err(AgentError::UndefinedVariable(name)) => assert_eq!(name, "NOPE"),
        other => panic!("expected undefined variable error, got {other:?}"),
    }
}

#[test]
fn process_environment_is_used_by_default() -> TestResult {
    let path = std::env::var("PATH")?;
    assert_eq!(expand_env("${PATH}")?, path);
    Ok(())
}
