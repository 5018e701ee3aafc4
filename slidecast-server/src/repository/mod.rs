//! Repository Module
//!
//! Data access layer for the server.

pub mod material;

// Re-export for convenience
pub use material::{InMemoryMaterialStore, MaterialStore, PgMaterialStore};
