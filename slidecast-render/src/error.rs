use thiserror::Error;

/// Ways a render can fail
#[derive(Debug, Error)]
pub enum RenderError {
    /// The toolchain could not be started, or its workspace could not be prepared
    #[error("Render supervision failed: {0}")]
    SupervisionFailed(String),

    /// The toolchain exceeded its wall-clock budget and was killed
    #[error("Render timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Non-zero exit and no video to salvage
    #[error("Render failed with exit code {}", exit_label(.exit_code))]
    Failed {
        exit_code: Option<i32>,
        output: String,
    },

    /// Zero exit but no video anywhere in the working directory
    #[error("Render finished but produced no video")]
    ArtifactNotFound { output: String },
}

impl RenderError {
    /// Bounded toolchain output attached to the failure, if any
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Failed { output, .. } | Self::ArtifactNotFound { output } => Some(output),
            _ => None,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "unknown (killed by signal)".to_string())
}
