//! Slide domain types

use serde::{Deserialize, Serialize};

/// Title used when no heading can be derived from a slide body
pub const UNTITLED_SLIDE: &str = "Untitled Slide";

/// One normalized unit of lesson content
///
/// Produced once per pipeline run by the slide normalizer and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub slide_number: u32,
    pub title: String,
    pub content: String,
}

impl Slide {
    /// Renders the slide the way the storyboard prompt lists it
    pub fn to_prompt_block(&self) -> String {
        format!(
            "Slide {}: {}\n{}",
            self.slide_number, self.title, self.content
        )
    }
}
