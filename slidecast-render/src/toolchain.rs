//! Rendering toolchain discovery

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::info;

/// Program name looked up on `PATH`
pub const TOOLCHAIN_PROGRAM: &str = "manim";

/// Homebrew install location, preferred on macOS when present
pub const HOMEBREW_TOOLCHAIN: &str = "/opt/homebrew/bin/manim";

const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Toolchain command used when none is configured
pub fn default_command() -> Vec<String> {
    if cfg!(target_os = "macos") && Path::new(HOMEBREW_TOOLCHAIN).exists() {
        vec![HOMEBREW_TOOLCHAIN.to_string()]
    } else {
        vec![TOOLCHAIN_PROGRAM.to_string()]
    }
}

/// Checks that the toolchain can be executed
///
/// Runs the configured command with `--version` and returns the first line it
/// prints.
pub async fn check_toolchain_available(command: &[String]) -> Result<String> {
    let (program, args) = command
        .split_first()
        .context("Render command is empty")?;

    let output = tokio::time::timeout(
        PROBE_TIMEOUT,
        Command::new(program)
            .args(args)
            .arg("--version")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output(),
    )
    .await
    .with_context(|| format!("'{} --version' did not finish", program))?
    .with_context(|| format!("Failed to execute '{} --version'. Is it installed?", program))?;

    if !output.status.success() {
        anyhow::bail!("Rendering toolchain '{}' is not working correctly", program);
    }

    let version = String::from_utf8_lossy(&output.stdout);
    let version = version.lines().next().unwrap_or_default().trim().to_string();
    info!("Rendering toolchain is available: {}", version);

    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_toolchain_is_reported() {
        let command = vec!["slidecast-no-such-toolchain".to_string()];
        assert!(check_toolchain_available(&command).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_command_is_reported() {
        assert!(check_toolchain_available(&[]).await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_version_probe() {
        let command = vec!["echo".to_string(), "Toolchain".to_string()];
        let version = check_toolchain_available(&command).await.unwrap();
        assert_eq!(version, "Toolchain --version");
    }
}
