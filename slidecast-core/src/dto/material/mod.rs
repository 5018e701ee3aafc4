//! Material DTOs for the prepare step

use serde::{Deserialize, Serialize};

use crate::domain::slide::Slide;

/// Request to load and normalize a material's slides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrepareRequest {
    /// Material identifier; kept as a string so malformed ids are reported
    /// as invalid input rather than as a body deserialization failure
    #[serde(default)]
    pub material_id: Option<String>,
}

/// Normalized slides of a material, ready for storyboard synthesis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparedMaterial {
    pub material_id: String,
    pub topic: String,
    pub slides: Vec<Slide>,
    pub total_slides: usize,
}

impl PreparedMaterial {
    pub fn new(material_id: impl Into<String>, topic: impl Into<String>, slides: Vec<Slide>) -> Self {
        Self {
            material_id: material_id.into(),
            topic: topic.into(),
            total_slides: slides.len(),
            slides,
        }
    }
}
