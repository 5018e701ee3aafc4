//! Render service
//!
//! Runs the rendering toolchain against one script:
//! - Writes the script to a private temporary file
//! - Creates a fresh working directory for the toolchain's output
//! - Spawns the toolchain in its own process group under a hard wall-clock
//!   deadline that also covers draining its output
//! - Kills the whole group on timeout, and any stragglers after a normal exit
//! - Resolves the produced video and decides the outcome
//!
//! The script file is removed on every exit path. The working directory
//! travels with the returned [`RenderJob`] and is removed when it is dropped.

use async_trait::async_trait;
use slidecast_core::domain::artifact::Artifact;
use slidecast_core::domain::render::Quality;
use std::io::Write;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::job::{OUTPUT_EXCERPT_CHARS, RenderJob};
use crate::outcome::{RenderVerdict, decide};
use crate::resolver::resolve_artifact;

/// A located video and the job that produced it
#[derive(Debug)]
pub struct RenderedArtifact {
    pub job: RenderJob,
    pub artifact: Artifact,
    /// The toolchain exited non-zero but left a usable video behind
    pub salvaged: bool,
}

/// Service trait for rendering generated source into a video
#[async_trait]
pub trait RenderService: Send + Sync {
    /// Renders `source` and locates the resulting video
    ///
    /// # Arguments
    /// * `source` - Sanitized, syntax-checked script
    /// * `output_name` - Name (without extension) the toolchain should give the video
    /// * `quality` - Render quality
    async fn render(
        &self,
        source: &str,
        output_name: &str,
        quality: Quality,
    ) -> Result<RenderedArtifact, RenderError>;
}

/// Runs the configured toolchain as a child process
pub struct ToolchainRenderService {
    config: RenderConfig,
}

impl ToolchainRenderService {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Runs the toolchain to completion or timeout, capturing its output
    async fn supervise(
        &self,
        source: &str,
        output_name: &str,
        quality: Quality,
    ) -> Result<RenderJob, RenderError> {
        let (program, leading_args) = self
            .config
            .command
            .split_first()
            .ok_or_else(|| RenderError::SupervisionFailed("render command is empty".to_string()))?;

        std::fs::create_dir_all(&self.config.work_root).map_err(|e| {
            RenderError::SupervisionFailed(format!(
                "cannot create work root {}: {}",
                self.config.work_root.display(),
                e
            ))
        })?;

        // Removed when dropped, on every return path below
        let mut script = tempfile::Builder::new()
            .prefix("slidecast_scene_")
            .suffix(".py")
            .tempfile_in(&self.config.work_root)
            .map_err(|e| RenderError::SupervisionFailed(format!("cannot create script file: {}", e)))?;
        script
            .write_all(source.as_bytes())
            .and_then(|_| script.flush())
            .map_err(|e| RenderError::SupervisionFailed(format!("cannot write script file: {}", e)))?;

        let working_dir = tempfile::Builder::new()
            .prefix("slidecast_render_")
            .tempdir_in(&self.config.work_root)
            .map_err(|e| {
                RenderError::SupervisionFailed(format!("cannot create working directory: {}", e))
            })?;

        info!(
            "Starting render '{}' at {} quality in {}",
            output_name,
            quality,
            working_dir.path().display()
        );

        // One deadline bounds the whole run, including draining the pipes
        let deadline = Instant::now() + self.config.timeout;

        let mut command = Command::new(program);
        command
            .args(leading_args)
            .arg(quality.flag())
            .arg(script.path())
            .arg(&self.config.scene_class)
            .arg("-o")
            .arg(output_name)
            .current_dir(working_dir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // The toolchain leads its own process group so its helpers can be killed with it
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command.spawn().map_err(|e| {
            error!("Failed to start rendering toolchain '{}': {}", program, e);
            RenderError::SupervisionFailed(format!("cannot start '{}': {}", program, e))
        })?;
        let group = child.id();

        let mut stdout_reader = spawn_reader(child.stdout.take());
        let mut stderr_reader = spawn_reader(child.stderr.take());

        let supervised = tokio::time::timeout_at(deadline, async {
            let status = child.wait().await;
            let stdout = (&mut stdout_reader).await.unwrap_or_default();
            let stderr = (&mut stderr_reader).await.unwrap_or_default();
            (status, stdout, stderr)
        })
        .await;

        let (status, stdout, stderr) = match supervised {
            Ok((Ok(status), stdout, stderr)) => {
                if kill_process_group(group) {
                    debug!("Killed processes left behind by render '{}'", output_name);
                }
                (status, stdout, stderr)
            }
            Ok((Err(e), _, _)) => {
                kill_process_group(group);
                return Err(RenderError::SupervisionFailed(format!(
                    "failed waiting for toolchain: {}",
                    e
                )));
            }
            Err(_) => {
                warn!(
                    "Render '{}' exceeded {} s, killing toolchain",
                    output_name,
                    self.config.timeout.as_secs()
                );
                kill_process_group(group);
                // Still running unless it already exited and left helpers holding the pipes
                if child.id().is_some() {
                    if let Err(e) = child.kill().await {
                        error!("Failed to kill timed out toolchain: {}", e);
                    }
                }
                stdout_reader.abort();
                stderr_reader.abort();
                return Err(RenderError::Timeout {
                    seconds: self.config.timeout.as_secs(),
                });
            }
        };

        // Always log stdout/stderr as debug
        if !stdout.trim().is_empty() {
            debug!("toolchain stdout: {}", stdout.trim());
        }
        if !stderr.trim().is_empty() {
            debug!("toolchain stderr: {}", stderr.trim());
        }

        Ok(RenderJob {
            working_dir,
            script_path: script.path().to_path_buf(),
            output_name: output_name.to_string(),
            quality,
            timeout: self.config.timeout,
            exit_code: status.code(),
            stdout,
            stderr,
        })
    }
}

#[async_trait]
impl RenderService for ToolchainRenderService {
    async fn render(
        &self,
        source: &str,
        output_name: &str,
        quality: Quality,
    ) -> Result<RenderedArtifact, RenderError> {
        let job = self.supervise(source, output_name, quality).await?;
        let artifact = resolve_artifact(job.working_path(), output_name);

        match decide(job.exited_cleanly(), artifact) {
            RenderVerdict::Rendered(artifact) => {
                info!(
                    "Render '{}' produced {} ({} bytes)",
                    output_name,
                    artifact.source_path.display(),
                    artifact.size_bytes
                );
                Ok(RenderedArtifact {
                    job,
                    artifact,
                    salvaged: false,
                })
            }
            RenderVerdict::Salvaged(artifact) => {
                warn!(
                    "Toolchain exited with {:?} but left {} ({} bytes), using it",
                    job.exit_code,
                    artifact.source_path.display(),
                    artifact.size_bytes
                );
                Ok(RenderedArtifact {
                    job,
                    artifact,
                    salvaged: true,
                })
            }
            RenderVerdict::ArtifactMissing => {
                error!("Render '{}' exited cleanly but produced no video", output_name);
                Err(RenderError::ArtifactNotFound {
                    output: job.combined_output(OUTPUT_EXCERPT_CHARS),
                })
            }
            RenderVerdict::Failed => {
                error!(
                    "Render '{}' failed with exit code {:?}",
                    output_name, job.exit_code
                );
                Err(RenderError::Failed {
                    exit_code: job.exit_code,
                    output: job.combined_output(OUTPUT_EXCERPT_CHARS),
                })
            }
        }
    }
}

fn spawn_reader<R>(pipe: Option<R>) -> JoinHandle<String>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf).await;
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// Sends SIGKILL to every process in the toolchain's group
///
/// Returns `true` when at least one process was signalled.
#[cfg(unix)]
fn kill_process_group(group: Option<u32>) -> bool {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    match group {
        Some(pgid) => killpg(Pid::from_raw(pgid as i32), Signal::SIGKILL).is_ok(),
        None => false,
    }
}

#[cfg(not(unix))]
fn kill_process_group(_group: Option<u32>) -> bool {
    false
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    const SOURCE: &str = "from manim import *\n\nclass EducationalVideo(Scene):\n    def construct(self):\n        self.wait(1)\n";

    /// Service whose "toolchain" is a shell script run by `sh`
    ///
    /// The script receives the usual arguments:
    /// `$1` quality flag, `$2` script path, `$3` scene class, `$4` `-o`, `$5` output name.
    fn fake_toolchain(root: &Path, body: &str, timeout: Duration) -> ToolchainRenderService {
        let script = root.join("fake_toolchain.sh");
        std::fs::write(&script, body).unwrap();
        let work_root = root.join("work");

        ToolchainRenderService::new(RenderConfig {
            command: vec!["sh".to_string(), script.to_string_lossy().into_owned()],
            scene_class: "EducationalVideo".to_string(),
            timeout,
            work_root,
        })
    }

    fn entries(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[tokio::test]
    async fn test_clean_render() {
        let root = TempDir::new().unwrap();
        let service = fake_toolchain(
            root.path(),
            "test \"$1\" = -ql || exit 3\n\
             test \"$3\" = EducationalVideo || exit 4\n\
             grep -q EducationalVideo \"$2\" || exit 5\n\
             mkdir -p media/videos/scene/480p15\n\
             head -c 4096 /dev/zero > \"media/videos/scene/480p15/$5.mp4\"\n\
             echo rendered\n",
            Duration::from_secs(30),
        );

        let rendered = service.render(SOURCE, "video_abc", Quality::Low).await.unwrap();

        assert!(!rendered.salvaged);
        assert_eq!(rendered.job.exit_code, Some(0));
        assert_eq!(rendered.artifact.size_bytes, 4096);
        assert!(rendered.artifact.source_path.ends_with("video_abc.mp4"));
        assert!(rendered.job.stdout.contains("rendered"));
        assert!(!rendered.job.script_path.exists());
    }

    #[tokio::test]
    async fn test_non_zero_exit_with_video_is_salvaged() {
        let root = TempDir::new().unwrap();
        let service = fake_toolchain(
            root.path(),
            "head -c 2048 /dev/zero > partial.mp4\necho boom >&2\nexit 1\n",
            Duration::from_secs(30),
        );

        let rendered = service.render(SOURCE, "video_abc", Quality::Medium).await.unwrap();

        assert!(rendered.salvaged);
        assert_eq!(rendered.job.exit_code, Some(1));
        assert!(rendered.artifact.source_path.ends_with("partial.mp4"));
    }

    #[tokio::test]
    async fn test_non_zero_exit_without_video_fails_with_output() {
        let root = TempDir::new().unwrap();
        let service = fake_toolchain(
            root.path(),
            "echo 'NameError: name Foo is not defined' >&2\nexit 2\n",
            Duration::from_secs(30),
        );

        let err = service.render(SOURCE, "video_abc", Quality::Medium).await.unwrap_err();

        match err {
            RenderError::Failed { exit_code, output } => {
                assert_eq!(exit_code, Some(2));
                assert!(output.contains("NameError"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // Script and working directory are both gone
        assert!(entries(&root.path().join("work")).is_empty());
    }

    #[tokio::test]
    async fn test_clean_exit_without_video() {
        let root = TempDir::new().unwrap();
        let service = fake_toolchain(root.path(), "echo nothing to do\n", Duration::from_secs(30));

        let err = service.render(SOURCE, "video_abc", Quality::Medium).await.unwrap_err();
        assert!(matches!(err, RenderError::ArtifactNotFound { .. }));
        assert!(err.output().unwrap().contains("nothing to do"));
    }

    #[tokio::test]
    async fn test_timeout_kills_toolchain() {
        let root = TempDir::new().unwrap();
        let service = fake_toolchain(root.path(), "sleep 30\n", Duration::from_secs(1));

        let started = Instant::now();
        let err = service.render(SOURCE, "video_abc", Quality::Medium).await.unwrap_err();

        assert!(matches!(err, RenderError::Timeout { seconds: 1 }));
        assert!(started.elapsed() < Duration::from_secs(15));
        assert!(entries(&root.path().join("work")).is_empty());
    }

    #[tokio::test]
    async fn test_timeout_covers_helpers_holding_output() {
        let root = TempDir::new().unwrap();
        // The toolchain exits at once but a background helper keeps its stdout open
        let service = fake_toolchain(
            root.path(),
            "head -c 2048 /dev/zero > partial.mp4\nsleep 20 &\nexit 0\n",
            Duration::from_secs(2),
        );

        let started = Instant::now();
        let err = service.render(SOURCE, "video_abc", Quality::Medium).await.unwrap_err();

        assert!(matches!(err, RenderError::Timeout { seconds: 2 }));
        assert!(
            started.elapsed() < Duration::from_secs(10),
            "render took {:?} with a 2 s timeout",
            started.elapsed()
        );
    }

    /// Alive and not a zombie waiting to be reaped
    #[cfg(target_os = "linux")]
    fn process_running(pid: u32) -> bool {
        match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
            Ok(stat) => stat
                .rsplit(')')
                .next()
                .and_then(|rest| rest.split_whitespace().next())
                .is_some_and(|state| state != "Z" && state != "X"),
            Err(_) => false,
        }
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_timeout_kills_toolchain_helpers() {
        let root = TempDir::new().unwrap();
        let pid_file = root.path().join("helper.pid");
        let service = fake_toolchain(
            root.path(),
            &format!(
                "sleep 60 >/dev/null 2>&1 &\necho $! > '{}'\nwait\n",
                pid_file.display()
            ),
            Duration::from_secs(1),
        );

        let err = service.render(SOURCE, "video_abc", Quality::Medium).await.unwrap_err();
        assert!(matches!(err, RenderError::Timeout { seconds: 1 }));

        let pid: u32 = std::fs::read_to_string(&pid_file)
            .unwrap()
            .trim()
            .parse()
            .unwrap();
        let mut running = process_running(pid);
        for _ in 0..20 {
            if !running {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
            running = process_running(pid);
        }
        assert!(!running, "helper process {pid} survived the timeout");
    }

    #[tokio::test]
    async fn test_missing_toolchain_is_supervision_failure() {
        let root = TempDir::new().unwrap();
        let service = ToolchainRenderService::new(RenderConfig {
            command: vec!["slidecast-no-such-toolchain".to_string()],
            scene_class: "EducationalVideo".to_string(),
            timeout: Duration::from_secs(5),
            work_root: root.path().to_path_buf(),
        });

        let err = service.render(SOURCE, "video_abc", Quality::Medium).await.unwrap_err();
        assert!(matches!(err, RenderError::SupervisionFailed(_)));
        assert!(entries(root.path()).is_empty());
    }
}
