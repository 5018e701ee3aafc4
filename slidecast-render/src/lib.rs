//! Slidecast Render
//!
//! Supervision of the external rendering toolchain:
//! - Writing generated source to a private script file
//! - Running the toolchain as a child process with a hard timeout
//! - Locating the produced video in the working directory
//! - Deciding between success, salvage and failure

pub mod config;
pub mod error;
pub mod job;
pub mod outcome;
pub mod resolver;
pub mod service;
pub mod toolchain;

pub use config::RenderConfig;
pub use error::RenderError;
pub use job::RenderJob;
pub use outcome::{RenderVerdict, decide};
pub use resolver::{ArtifactStrategy, VIDEO_EXTENSIONS, resolve_artifact};
pub use service::{RenderService, RenderedArtifact, ToolchainRenderService};
pub use toolchain::check_toolchain_available;
