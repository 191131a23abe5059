// src/instruction/mod.rs

//! Instruction intake.
//!
//! - [`parser`] turns a single `kind;payload` line into an [`Instruction`].
//! - [`source`] reads the instruction file lazily, one line at a time.
//!
//! [`Instruction`]: crate::types::Instruction

pub mod parser;
pub mod source;

pub use parser::parse_line;
pub use source::InstructionSource;
