//! Artifact resolution
//!
//! The toolchain decides on its own where under the working directory the
//! final video lands, and leaves partial per-scene movies next to it.
//! Resolution tries a ranked list of strategies and takes the first hit.

use slidecast_core::domain::artifact::Artifact;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extensions recognized as video output
pub const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mov", "webm", "mkv", "avi"];

/// One way of finding the rendered video
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactStrategy {
    /// A video file named exactly after the requested output name
    ExactName,
    /// The largest video file anywhere in the tree; the composited final
    /// render is bigger than the partial scene files
    LargestByExtension,
}

impl ArtifactStrategy {
    /// Strategies in the order they are tried
    pub const RANKED: [ArtifactStrategy; 2] = [
        ArtifactStrategy::ExactName,
        ArtifactStrategy::LargestByExtension,
    ];

    pub fn locate(&self, dir: &Path, output_name: &str) -> Option<Artifact> {
        let candidates = video_files(dir);
        match self {
            ArtifactStrategy::ExactName => candidates
                .into_iter()
                .filter(|a| a.source_path.file_stem().is_some_and(|stem| stem == output_name))
                .max_by_key(|a| a.size_bytes),
            ArtifactStrategy::LargestByExtension => {
                candidates.into_iter().max_by_key(|a| a.size_bytes)
            }
        }
    }
}

/// Find the rendered video under `dir`
pub fn resolve_artifact(dir: &Path, output_name: &str) -> Option<Artifact> {
    ArtifactStrategy::RANKED.iter().find_map(|strategy| {
        let found = strategy.locate(dir, output_name);
        if let Some(artifact) = &found {
            debug!(
                "Resolved artifact {} ({} bytes) with {:?}",
                artifact.source_path.display(),
                artifact.size_bytes,
                strategy
            );
        }
        found
    })
}

fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| VIDEO_EXTENSIONS.iter().any(|v| v.eq_ignore_ascii_case(ext)))
}

/// Every video file under `dir`, symlinks not followed
fn video_files(dir: &Path) -> Vec<Artifact> {
    let mut found = Vec::new();
    let mut pending: Vec<PathBuf> = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = match fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Skipping unreadable directory {}: {}", current.display(), e);
                continue;
            }
        };

        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let path = entry.path();
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() && is_video(&path) {
                let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
                found.push(Artifact {
                    source_path: path,
                    size_bytes,
                });
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_kb(path: &Path, kb: usize) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, vec![0u8; kb * 1024]).unwrap();
    }

    #[test]
    fn test_exact_name_is_returned() {
        let dir = TempDir::new().unwrap();
        let expected = dir.path().join("video_42.mp4");
        write_kb(&expected, 1);

        let artifact = resolve_artifact(dir.path(), "video_42").unwrap();
        assert_eq!(artifact.source_path, expected);
        assert_eq!(artifact.size_bytes, 1024);
    }

    #[test]
    fn test_exact_name_beats_larger_files() {
        let dir = TempDir::new().unwrap();
        let expected = dir.path().join("media/videos/scene/720p30/video_42.mp4");
        write_kb(&expected, 5);
        write_kb(&dir.path().join("media/videos/scene/720p30/partial/big.mp4"), 50);

        let artifact = resolve_artifact(dir.path(), "video_42").unwrap();
        assert_eq!(artifact.source_path, expected);
    }

    #[test]
    fn test_largest_video_wins_without_exact_name() {
        let dir = TempDir::new().unwrap();
        write_kb(&dir.path().join("a/one.mp4"), 10);
        write_kb(&dir.path().join("b/c/two.mp4"), 50);
        write_kb(&dir.path().join("three.mp4"), 30);
        write_kb(&dir.path().join("notes.txt"), 100);

        let artifact = resolve_artifact(dir.path(), "video_42").unwrap();
        assert_eq!(artifact.source_path, dir.path().join("b/c/two.mp4"));
        assert_eq!(artifact.size_bytes, 50 * 1024);
    }

    #[test]
    fn test_extensions_are_case_insensitive() {
        let dir = TempDir::new().unwrap();
        write_kb(&dir.path().join("Final.MOV"), 1);

        let artifact = resolve_artifact(dir.path(), "video_42").unwrap();
        assert_eq!(artifact.extension(), "mov");
    }

    #[test]
    fn test_nothing_found() {
        let dir = TempDir::new().unwrap();
        write_kb(&dir.path().join("scene.py"), 1);
        assert!(resolve_artifact(dir.path(), "video_42").is_none());
        assert!(ArtifactStrategy::ExactName.locate(dir.path(), "video_42").is_none());
    }
}
