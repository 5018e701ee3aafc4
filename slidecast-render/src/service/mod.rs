//! Service layer
//!
//! The render service turns sanitized source into a located video file.
//! It is trait-based so the server can be tested against a stand-in.

mod render;

pub use render::{RenderService, RenderedArtifact, ToolchainRenderService};
