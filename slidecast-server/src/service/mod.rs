//! Service Module
//!
//! Business logic layer of the generation server. Each pipeline stage lives
//! in its own module; [`GenerationService`] wires them to the content store,
//! the LLM client, the renderer and artifact storage.

pub mod code;
pub mod error;
pub mod generation;
pub mod lease;
pub mod publish;
pub mod slides;
pub mod storyboard;

pub use error::PipelineError;
pub use generation::GenerationService;
pub use publish::{ArtifactStorage, LocalArtifactStorage};
