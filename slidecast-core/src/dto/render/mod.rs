//! Render DTOs

use serde::{Deserialize, Serialize};

use crate::domain::render::Quality;

/// Request to render generated source into a video for a material
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderRequest {
    #[serde(default, alias = "manim_code")]
    pub generated_source: String,
    #[serde(default)]
    pub material_id: Option<String>,
    #[serde(default)]
    pub quality: Quality,
}

/// Request to run the whole pipeline for a material in one call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub material_id: Option<String>,
    #[serde(default)]
    pub quality: Quality,
}

/// Outcome of a successful render
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResponse {
    pub success: bool,
    pub video_url: String,
    pub message: String,
}

impl RenderResponse {
    pub fn generated(video_url: impl Into<String>) -> Self {
        Self {
            success: true,
            video_url: video_url.into(),
            message: "Video generated".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_request_accepts_legacy_field_name() {
        let req: RenderRequest = serde_json::from_str(
            r#"{"manim_code": "print(1)", "material_id": "abc", "quality": "low"}"#,
        )
        .unwrap();

        assert_eq!(req.generated_source, "print(1)");
        assert_eq!(req.material_id.as_deref(), Some("abc"));
        assert_eq!(req.quality, Quality::Low);
    }

    #[test]
    fn test_render_request_defaults() {
        let req: RenderRequest = serde_json::from_str("{}").unwrap();
        assert!(req.generated_source.is_empty());
        assert!(req.material_id.is_none());
        assert_eq!(req.quality, Quality::Medium);
    }
}
