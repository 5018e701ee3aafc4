//! Render configuration
//!
//! Defines how the rendering toolchain is invoked: which command, which scene
//! class, how long it may run and where its scratch files live.

use std::path::PathBuf;
use std::time::Duration;

use crate::toolchain::default_command;

/// Scene class every generated script must define
pub const DEFAULT_SCENE_CLASS: &str = "EducationalVideo";

/// Render configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Toolchain program followed by any leading arguments
    pub command: Vec<String>,

    /// Scene class passed to the toolchain
    pub scene_class: String,

    /// Hard wall-clock limit for one render
    pub timeout: Duration,

    /// Directory under which script files and working directories are created
    pub work_root: PathBuf,
}

impl RenderConfig {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - RENDER_COMMAND (optional, whitespace-separated, default: platform toolchain)
    /// - RENDER_SCENE_CLASS (optional, default: EducationalVideo)
    /// - RENDER_TIMEOUT (optional, seconds, default: 600)
    /// - RENDER_WORK_ROOT (optional, default: system temp dir)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let command = std::env::var("RENDER_COMMAND")
            .ok()
            .map(|s| s.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|parts| !parts.is_empty())
            .unwrap_or(defaults.command);

        let scene_class = std::env::var("RENDER_SCENE_CLASS")
            .ok()
            .map(|s| s.trim().to_string())
            .unwrap_or(defaults.scene_class);

        let timeout = std::env::var("RENDER_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        let work_root = std::env::var("RENDER_WORK_ROOT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.work_root);

        Self {
            command,
            scene_class,
            timeout,
            work_root,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.command.first().is_none_or(|program| program.is_empty()) {
            anyhow::bail!("render command cannot be empty");
        }

        if self.scene_class.is_empty() {
            anyhow::bail!("render scene class cannot be empty");
        }

        if self.timeout.is_zero() {
            anyhow::bail!("render timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            scene_class: DEFAULT_SCENE_CLASS.to_string(),
            timeout: Duration::from_secs(600), // 10 minutes
            work_root: std::env::temp_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.scene_class, "EducationalVideo");
        assert_eq!(config.timeout, Duration::from_secs(600));
        assert!(!config.command.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = RenderConfig::default();

        config.command = Vec::new();
        assert!(config.validate().is_err());

        config.command = vec![String::new()];
        assert!(config.validate().is_err());

        config.command = vec!["manim".to_string()];
        config.timeout = Duration::ZERO;
        assert!(config.validate().is_err());

        config.timeout = Duration::from_secs(1);
        config.scene_class = String::new();
        assert!(config.validate().is_err());

        config.scene_class = "Lesson".to_string();
        assert!(config.validate().is_ok());
    }
}
