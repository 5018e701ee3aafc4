//! Artifact publication
//!
//! Copies a rendered video out of its render working directory into durable
//! storage under a deterministic, per-material name. The copy goes through a
//! temporary file in the destination directory and is renamed into place, so
//! readers never see a partially written video.

use async_trait::async_trait;
use slidecast_core::domain::artifact::{Artifact, PublishedArtifact};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::service::error::{PipelineError, Result};

/// Durable storage for published videos
#[async_trait]
pub trait ArtifactStorage: Send + Sync {
    /// Publish `artifact` as the video of `material_id`, replacing any previous one
    async fn publish(&self, material_id: Uuid, artifact: &Artifact) -> Result<PublishedArtifact>;

    /// Remove a published video that no material refers to
    async fn discard(&self, published: &PublishedArtifact) -> Result<()>;
}

/// File name a material's video is published under
pub fn published_file_name(material_id: Uuid, extension: &str) -> String {
    format!("video_{}.{}", material_id, extension)
}

/// Stores videos in a local directory served under a URL prefix
#[derive(Debug, Clone)]
pub struct LocalArtifactStorage {
    dir: PathBuf,
    public_prefix: String,
}

impl LocalArtifactStorage {
    pub fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.artifact_dir.clone(), config.public_prefix.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn public_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_prefix, file_name)
    }
}

#[async_trait]
impl ArtifactStorage for LocalArtifactStorage {
    async fn publish(&self, material_id: Uuid, artifact: &Artifact) -> Result<PublishedArtifact> {
        let file_name = published_file_name(material_id, &artifact.extension());
        let destination = self.dir.join(&file_name);
        let source = artifact.source_path.clone();
        let dir = self.dir.clone();
        let target = destination.clone();

        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            std::fs::create_dir_all(&dir)?;
            let mut input = std::fs::File::open(&source)?;
            let mut staged = tempfile::NamedTempFile::new_in(&dir)?;
            std::io::copy(&mut input, staged.as_file_mut())?;
            staged.as_file().sync_all()?;
            staged.persist(&target).map_err(|e| e.error)?;
            remove_stale_videos(&dir, material_id, &target)?;
            Ok(())
        })
        .await
        .map_err(|e| PipelineError::Storage(format!("publish task failed: {}", e)))??;

        info!(
            "Published video for material {} to {}",
            material_id,
            destination.display()
        );

        Ok(PublishedArtifact {
            public_url: self.public_url(&file_name),
            stored_path: destination,
        })
    }

    async fn discard(&self, published: &PublishedArtifact) -> Result<()> {
        match tokio::fs::remove_file(&published.stored_path).await {
            Ok(()) => {
                info!("Discarded unreferenced video {}", published.stored_path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Remove the material's videos published under another extension
fn remove_stale_videos(dir: &Path, material_id: Uuid, keep: &Path) -> std::io::Result<()> {
    let prefix = format!("video_{}.", material_id);
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let stale = path != keep
            && path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&prefix));
        if stale {
            debug!("Removing stale video {}", path.display());
            std::fs::remove_file(&path)?;
        }
    }
    Ok(())
}
