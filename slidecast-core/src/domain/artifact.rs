//! Artifact domain types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Video file located in a render working directory, not yet published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub source_path: PathBuf,
    pub size_bytes: u64,
}

impl Artifact {
    /// File extension of the artifact, lowercased, defaulting to `mp4`
    pub fn extension(&self) -> String {
        self.source_path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| "mp4".to_string())
    }
}

/// Artifact after it has been copied into durable storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedArtifact {
    /// Externally addressable location recorded on the material
    pub public_url: String,
    /// Where the file lives on disk
    pub stored_path: PathBuf,
}
