//! Render job record

use slidecast_core::domain::render::Quality;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// Maximum characters of toolchain output attached to a failure
pub const OUTPUT_EXCERPT_CHARS: usize = 4000;

/// One supervised toolchain invocation
///
/// Owns the working directory: dropping the job removes it, so keep the job
/// alive until the artifact has been published.
#[derive(Debug)]
pub struct RenderJob {
    pub working_dir: TempDir,
    /// Script the toolchain was given; already removed once the job exists
    pub script_path: PathBuf,
    pub output_name: String,
    pub quality: Quality,
    pub timeout: Duration,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RenderJob {
    pub fn working_path(&self) -> &Path {
        self.working_dir.path()
    }

    pub fn exited_cleanly(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Stdout and stderr joined by a blank line, truncated to `limit` characters
    pub fn combined_output(&self, limit: usize) -> String {
        let combined = format!("{}\n\n{}", self.stdout.trim(), self.stderr.trim());
        combined.trim().chars().take(limit).collect()
    }
}
