use thiserror::Error;

/// Failure to pull a script out of a completion
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("completion contained no code")]
    Empty,
}

/// Failure to turn a generated script into something renderable
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("script is empty after sanitization")]
    Empty,

    #[error("{class_name}: {message}")]
    SyntaxInvalid { class_name: String, message: String },
}
