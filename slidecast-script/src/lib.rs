//! Slidecast Script Infrastructure
//!
//! Text-only handling of generated animation scripts. Nothing here executes
//! the script; it is extracted, repaired and syntax-checked as plain source.
//! It includes:
//! - Code block extraction from chat completions
//! - Deterministic sanitization of common generation defects
//! - A syntax-only check against the Python grammar

pub mod error;
pub mod extract;
pub mod sanitize;
pub mod syntax;

pub use error::{ExtractionError, ScriptError};
pub use extract::extract_code_block;
pub use sanitize::{Repair, Sanitized, sanitize};
pub use syntax::{check_syntax, prepare_for_render};
