//! Generation Service
//!
//! Runs the lesson-to-video pipeline, one step per inbound request or all of
//! them in a single call:
//! prepare → storyboard → code → render (sanitize, check, supervise, publish).

use chrono::Utc;
use slidecast_client::ChatClient;
use slidecast_core::domain::material::DEFAULT_TOPIC;
use slidecast_core::dto::code::{CodeRequest, CodeResponse};
use slidecast_core::dto::material::{PrepareRequest, PreparedMaterial};
use slidecast_core::dto::render::{GenerateRequest, RenderRequest, RenderResponse};
use slidecast_core::dto::storyboard::{StoryboardRequest, StoryboardResponse};
use slidecast_render::RenderService;
use slidecast_script::prepare_for_render;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::LlmConfig;
use crate::repository::MaterialStore;
use crate::service::code;
use crate::service::error::{PipelineError, Result};
use crate::service::lease::RenderLeases;
use crate::service::publish::ArtifactStorage;
use crate::service::slides::{normalize_slides, parse_material_id};
use crate::service::storyboard;

pub struct GenerationService {
    store: Arc<dyn MaterialStore>,
    chat: Option<ChatClient>,
    llm: LlmConfig,
    scene_class: String,
    renderer: Arc<dyn RenderService>,
    storage: Arc<dyn ArtifactStorage>,
    leases: RenderLeases,
}

impl GenerationService {
    /// `chat` is `None` when no LLM credentials are configured; the
    /// synthesis steps then fail with a configuration error.
    pub fn new(
        store: Arc<dyn MaterialStore>,
        chat: Option<ChatClient>,
        llm: LlmConfig,
        scene_class: impl Into<String>,
        renderer: Arc<dyn RenderService>,
        storage: Arc<dyn ArtifactStorage>,
    ) -> Self {
        Self {
            store,
            chat,
            llm,
            scene_class: scene_class.into(),
            renderer,
            storage,
            leases: RenderLeases::new(),
        }
    }

    pub fn leases(&self) -> &RenderLeases {
        &self.leases
    }

    fn chat(&self) -> Result<&ChatClient> {
        self.chat
            .as_ref()
            .ok_or_else(|| PipelineError::Configuration("LLM_API_KEY is not set".to_string()))
    }

    /// Load a material and normalize its slides
    pub async fn prepare(&self, req: PrepareRequest) -> Result<PreparedMaterial> {
        let id = parse_material_id(req.material_id.as_deref())?;
        let material = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(PipelineError::NotFound(id))?;

        let raw = material.raw_slides();
        if raw.is_empty() {
            return Err(PipelineError::NoSlides(id));
        }

        let slides = normalize_slides(&raw)?;
        info!(material_id = %id, "Prepared {} slide(s)", slides.len());

        Ok(PreparedMaterial::new(
            id.to_string(),
            material.display_topic(),
            slides,
        ))
    }

    /// Synthesize a storyboard from normalized slides
    pub async fn storyboard(&self, req: StoryboardRequest) -> Result<StoryboardResponse> {
        if req.slides.is_empty() {
            return Err(PipelineError::InputInvalid("slides are required".to_string()));
        }
        let topic = resolve_topic(req.topic);
        let chat = self.chat()?;

        let storyboard =
            storyboard::synthesize(chat, self.llm.storyboard, &topic, &req.slides).await?;

        Ok(StoryboardResponse {
            topic,
            storyboard: storyboard.text,
            scenes: storyboard.scenes,
        })
    }

    /// Translate a storyboard into animation source
    pub async fn code(&self, req: CodeRequest) -> Result<CodeResponse> {
        if req.storyboard.trim().is_empty() {
            return Err(PipelineError::InputInvalid("storyboard is required".to_string()));
        }
        let topic = resolve_topic(req.topic);
        let chat = self.chat()?;

        let generated_source =
            code::synthesize(chat, self.llm.code, &self.scene_class, &topic, &req.storyboard)
                .await?;

        Ok(CodeResponse {
            topic,
            generated_source,
        })
    }

    /// Render generated source, publish the video and record it on the material
    ///
    /// Source that fails the syntax check never reaches the toolchain.
    pub async fn render(&self, req: RenderRequest) -> Result<RenderResponse> {
        let id = parse_material_id(req.material_id.as_deref())?;
        if req.generated_source.trim().is_empty() {
            return Err(PipelineError::InputInvalid(
                "generated_source is required".to_string(),
            ));
        }

        if self.store.find_by_id(id).await?.is_none() {
            return Err(PipelineError::NotFound(id));
        }

        let source = prepare_for_render(&req.generated_source).inspect_err(|e| {
            warn!(material_id = %id, "Generated source rejected: {}", e);
        })?;

        let _lease = self.leases.try_acquire(id)?;

        let output_name = format!("video_{}", id);
        let rendered = self.renderer.render(&source, &output_name, req.quality).await?;
        let published = self.storage.publish(id, &rendered.artifact).await?;

        if !self
            .store
            .record_video(id, &published.public_url, Utc::now())
            .await?
        {
            warn!(material_id = %id, "Material disappeared during render, discarding video");
            if let Err(e) = self.storage.discard(&published).await {
                warn!(material_id = %id, "Failed to discard unreferenced video: {}", e);
            }
            return Err(PipelineError::NotFound(id));
        }

        info!(
            material_id = %id,
            salvaged = rendered.salvaged,
            "Video available at {}",
            published.public_url
        );

        Ok(RenderResponse::generated(published.public_url))
    }

    /// Run every step for one material
    pub async fn generate(&self, req: GenerateRequest) -> Result<RenderResponse> {
        let prepared = self
            .prepare(PrepareRequest {
                material_id: req.material_id,
            })
            .await?;

        let storyboard = self
            .storyboard(StoryboardRequest {
                slides: prepared.slides,
                topic: Some(prepared.topic.clone()),
            })
            .await?;

        let code = self
            .code(CodeRequest {
                storyboard: storyboard.storyboard,
                topic: Some(prepared.topic),
            })
            .await?;

        self.render(RenderRequest {
            generated_source: code.generated_source,
            material_id: Some(prepared.material_id),
            quality: req.quality,
        })
        .await
    }
}

fn resolve_topic(topic: Option<String>) -> String {
    topic
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TOPIC.to_string())
}
