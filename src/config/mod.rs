// src/config/mod.rs

//! Configuration loading and validation for instrd.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate values and resolve paths into [`Settings`] (`validate.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{CmdSettings, ExecSection, PathsSection, RawConfigFile, Settings};
pub use validate::resolve_settings;
