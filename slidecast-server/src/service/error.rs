//! Pipeline error taxonomy
//!
//! Every stage fails fast with one of these; nothing substitutes default
//! content on failure.

use slidecast_client::ChatError;
use slidecast_render::RenderError;
use slidecast_script::{ExtractionError, ScriptError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    InputInvalid(String),

    #[error("Material {0} not found")]
    NotFound(Uuid),

    #[error("Material {0} has no slides")]
    NoSlides(Uuid),

    #[error("No slide content could be extracted")]
    EmptyContent,

    #[error("LLM is not configured: {0}")]
    Configuration(String),

    #[error("LLM service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("LLM service rejected the request (status {status})")]
    UpstreamRejected {
        status: u16,
        message: String,
        hint: Option<String>,
    },

    #[error("LLM returned an empty storyboard")]
    EmptyStoryboard,

    #[error("LLM returned no code")]
    EmptyCode,

    #[error("Generated code is not valid Python")]
    SyntaxInvalid { class_name: String, message: String },

    #[error("Rendering toolchain could not be run: {0}")]
    RenderSupervisionFailed(String),

    #[error("Render timed out after {seconds} seconds")]
    RenderTimeout { seconds: u64 },

    #[error("Render failed")]
    RenderFailed { exit_code: Option<i32>, output: String },

    #[error("Render finished but produced no video")]
    ArtifactNotFound { output: String },

    #[error("A render for material {0} is already in progress")]
    RenderInProgress(Uuid),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

impl From<sqlx::Error> for PipelineError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        PipelineError::Storage(format!("content store: {}", err))
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Storage(err.to_string())
    }
}

impl From<ChatError> for PipelineError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Rejected {
                status,
                message,
                hint,
            } => PipelineError::UpstreamRejected {
                status,
                message,
                hint,
            },
            ChatError::Unavailable { .. } | ChatError::InvalidResponse(_) => {
                PipelineError::UpstreamUnavailable(err.to_string())
            }
        }
    }
}

impl From<ScriptError> for PipelineError {
    fn from(err: ScriptError) -> Self {
        match err {
            ScriptError::Empty => {
                PipelineError::InputInvalid("generated source is empty".to_string())
            }
            ScriptError::SyntaxInvalid {
                class_name,
                message,
            } => PipelineError::SyntaxInvalid {
                class_name,
                message,
            },
        }
    }
}

impl From<ExtractionError> for PipelineError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::Empty => PipelineError::EmptyCode,
        }
    }
}

impl From<RenderError> for PipelineError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::SupervisionFailed(msg) => PipelineError::RenderSupervisionFailed(msg),
            RenderError::Timeout { seconds } => PipelineError::RenderTimeout { seconds },
            RenderError::Failed { exit_code, output } => {
                PipelineError::RenderFailed { exit_code, output }
            }
            RenderError::ArtifactNotFound { output } => PipelineError::ArtifactNotFound { output },
        }
    }
}
