//! Storyboard DTOs

use serde::{Deserialize, Serialize};

use crate::domain::slide::Slide;
use crate::domain::storyboard::Scene;

/// Request to synthesize a storyboard from normalized slides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryboardRequest {
    #[serde(default)]
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub topic: Option<String>,
}

/// Synthesized storyboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryboardResponse {
    pub topic: String,
    /// Verbatim storyboard text, passed as-is to code synthesis
    pub storyboard: String,
    /// Scenes that could be read from the text (may be empty)
    #[serde(default)]
    pub scenes: Vec<Scene>,
}
