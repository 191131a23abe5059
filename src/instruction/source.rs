// src/instruction/source.rs

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::errors::{AgentError, Result};
use crate::instruction::parser::parse_line;
use crate::types::Instruction;

/// What the source produced for a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceItem {
    /// The line parsed into an instruction.
    Instruction { line_no: usize, instruction: Instruction },
    /// The line had no `;` delimiter and was skipped.
    Skipped { line_no: usize },
}

/// Lazy, single-pass reader over the instruction file.
///
/// A source is consumed once: it ends at EOF and cannot be rewound. A new
/// pass needs a fresh [`InstructionSource::open`].
#[derive(Debug)]
pub struct InstructionSource {
    path: PathBuf,
    reader: BufReader<File>,
    line_no: usize,
    buf: Vec<u8>,
}

impl InstructionSource {
    /// Open the instruction file for reading.
    ///
    /// Failure here is the terminal "cannot start" condition for a run.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .await
            .map_err(|source| AgentError::InstructionFileUnavailable {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), "instruction file opened");

        Ok(Self {
            path,
            reader: BufReader::new(file),
            line_no: 0,
            buf: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of lines read so far.
    pub fn lines_read(&self) -> usize {
        self.line_no
    }

    /// Read the next raw line (without its line terminator).
    ///
    /// Returns `Ok(None)` at EOF. Invalid UTF-8 is replaced lossily rather
    /// than aborting the pass.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        let n = self.reader.read_until(b'\n', &mut self.buf).await?;
        if n == 0 {
            return Ok(None);
        }
        self.line_no += 1;

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }

        let line = match String::from_utf8(std::mem::take(&mut self.buf)) {
            Ok(s) => s,
            Err(e) => {
                warn!(line_no = self.line_no, "instruction line is not valid UTF-8; decoding lossily");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        Ok(Some(line))
    }

    /// Read the next line and run it through the parser.
    pub async fn next_item(&mut self) -> Result<Option<SourceItem>> {
        let Some(line) = self.next_line().await? else {
            return Ok(None);
        };
        let line_no = self.line_no;

        Ok(Some(match parse_line(&line) {
            Some(instruction) => SourceItem::Instruction { line_no, instruction },
            None => SourceItem::Skipped { line_no },
        }))
    }
}
