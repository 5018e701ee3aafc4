//! Code synthesis DTOs

use serde::{Deserialize, Serialize};

/// Request to translate a storyboard into animation source code
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeRequest {
    #[serde(default)]
    pub storyboard: String,
    #[serde(default)]
    pub topic: Option<String>,
}

/// Generated animation source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeResponse {
    pub topic: String,
    #[serde(alias = "manim_code")]
    pub generated_source: String,
}
