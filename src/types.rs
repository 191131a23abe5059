use std::fmt;
use std::str::FromStr;

/// The directive carried by one instruction line.
///
/// - `Exe`: spawn a standalone executable and keep the agent alive until stop.
/// - `Cmd`: run a batch of shell sub-commands and publish their output.
/// - `Other`: anything else; parsed so it can be logged, never dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionKind {
    Exe,
    Cmd,
    Other(String),
}

impl InstructionKind {
    pub fn as_str(&self) -> &str {
        match self {
            InstructionKind::Exe => "exe",
            InstructionKind::Cmd => "cmd",
            InstructionKind::Other(s) => s,
        }
    }
}

impl FromStr for InstructionKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "exe" => InstructionKind::Exe,
            "cmd" => InstructionKind::Cmd,
            other => InstructionKind::Other(other.to_string()),
        })
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed `kind;payload` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub kind: InstructionKind,
    pub payload: String,
}

impl Instruction {
    pub fn new(kind: InstructionKind, payload: impl Into<String>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.kind, self.payload)
    }
}
