//! Core domain types
//!
//! This module contains the core domain structures used across slidecast crates.
//! They describe the lesson content that enters the pipeline and the artifacts
//! that leave it. Persistence lives in the server, execution in the renderer.

pub mod artifact;
pub mod material;
pub mod render;
pub mod slide;
pub mod storyboard;
