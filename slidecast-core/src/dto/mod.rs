//! Data Transfer Objects for the generation API
//!
//! One submodule per pipeline step. The server deserializes requests from
//! these types and the client crate serializes them, so both sides agree on
//! field names (including the legacy `manim_code` alias).

pub mod code;
pub mod error;
pub mod material;
pub mod render;
pub mod storyboard;
