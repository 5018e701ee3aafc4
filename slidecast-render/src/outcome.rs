//! Render outcome decision
//!
//! Exit status and artifact presence are independent facts. The toolchain
//! sometimes exits non-zero after writing a usable video, so a found artifact
//! wins over the exit code.

use slidecast_core::domain::artifact::Artifact;

/// What to make of a finished (not timed out) render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderVerdict {
    /// Clean exit, artifact found
    Rendered(Artifact),
    /// Non-zero exit, but an artifact was found anyway
    Salvaged(Artifact),
    /// Clean exit, no artifact
    ArtifactMissing,
    /// Non-zero exit, no artifact
    Failed,
}

pub fn decide(exited_cleanly: bool, artifact: Option<Artifact>) -> RenderVerdict {
    match (exited_cleanly, artifact) {
        (true, Some(artifact)) => RenderVerdict::Rendered(artifact),
        (false, Some(artifact)) => RenderVerdict::Salvaged(artifact),
        (true, None) => RenderVerdict::ArtifactMissing,
        (false, None) => RenderVerdict::Failed,
    }
}
