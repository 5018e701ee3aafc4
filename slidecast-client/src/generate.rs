//! Video generation API endpoints

use crate::SlidecastClient;
use crate::error::Result;
use slidecast_core::dto::code::{CodeRequest, CodeResponse};
use slidecast_core::dto::material::{PrepareRequest, PreparedMaterial};
use slidecast_core::dto::render::{GenerateRequest, RenderRequest, RenderResponse};
use slidecast_core::dto::storyboard::{StoryboardRequest, StoryboardResponse};

impl SlidecastClient {
    // =============================================================================
    // Step-by-step Generation
    // =============================================================================

    /// Load a material and normalize its slides
    ///
    /// # Arguments
    /// * `material_id` - The material identifier, as typed by the user
    pub async fn prepare(&self, material_id: &str) -> Result<PreparedMaterial> {
        let url = format!("{}/api/generate-video/prepare", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&PrepareRequest {
                material_id: Some(material_id.to_string()),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Synthesize a storyboard from normalized slides
    pub async fn storyboard(&self, req: &StoryboardRequest) -> Result<StoryboardResponse> {
        let url = format!("{}/api/generate-video/storyboard", self.base_url);
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_response(response).await
    }

    /// Translate a storyboard into animation source
    pub async fn code(&self, req: &CodeRequest) -> Result<CodeResponse> {
        let url = format!("{}/api/generate-video/code", self.base_url);
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_response(response).await
    }

    /// Render generated source and publish the video
    pub async fn render(&self, req: &RenderRequest) -> Result<RenderResponse> {
        let url = format!("{}/api/generate-video/render", self.base_url);
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // One-shot Generation
    // =============================================================================

    /// Run every step server-side in a single request
    pub async fn generate(&self, req: &GenerateRequest) -> Result<RenderResponse> {
        let url = format!("{}/api/generate-video", self.base_url);
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_response(response).await
    }

    /// Check that the server is up
    pub async fn health(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_empty_response(response).await
    }
}
