//! Slidecast Core
//!
//! Core types and abstractions for the slidecast lesson-to-video pipeline.
//!
//! This crate contains:
//! - Domain types: Core business entities (Material, Slide, Storyboard, etc.)
//! - DTOs: Request/response bodies shared by the server, its clients and the CLI

pub mod domain;
pub mod dto;
