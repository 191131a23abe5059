// src/instruction/parser.rs

use std::str::FromStr;

use crate::types::{Instruction, InstructionKind};

/// Field delimiter between `kind` and `payload`.
pub const FIELD_DELIMITER: char = ';';

/// Parse one line of the instruction file.
///
/// The line is split on the **first** `;` only, so the payload may itself
/// contain `;`. Lines without a delimiter produce no instruction; that is
/// not an error, the caller simply moves on to the next line.
///
/// A trailing `\r` is dropped so CRLF files parse the same as LF files.
/// Nothing else is trimmed.
pub fn parse_line(line: &str) -> Option<Instruction> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let (kind, payload) = line.split_once(FIELD_DELIMITER)?;

    // `FromStr` for `InstructionKind` is infallible.
    let kind = InstructionKind::from_str(kind).ok()?;
    Some(Instruction::new(kind, payload))
}
