//! Video Generation API Handlers
//!
//! One endpoint per pipeline step, plus a one-shot endpoint that runs them
//! all. Bodies are parsed leniently: missing fields default to empty and are
//! reported by the service as invalid input.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use slidecast_core::dto::code::{CodeRequest, CodeResponse};
use slidecast_core::dto::material::{PrepareRequest, PreparedMaterial};
use slidecast_core::dto::render::{GenerateRequest, RenderRequest, RenderResponse};
use slidecast_core::dto::storyboard::{StoryboardRequest, StoryboardResponse};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::service::GenerationService;

type Body<T> = Result<Json<T>, JsonRejection>;

/// POST /api/generate-video/prepare
pub async fn prepare(
    State(service): State<Arc<GenerationService>>,
    body: Body<PrepareRequest>,
) -> ApiResult<Json<PreparedMaterial>> {
    let Json(req) = body?;
    tracing::info!("Preparing material {:?}", req.material_id);

    Ok(Json(service.prepare(req).await?))
}

/// POST /api/generate-video/storyboard
pub async fn storyboard(
    State(service): State<Arc<GenerationService>>,
    body: Body<StoryboardRequest>,
) -> ApiResult<Json<StoryboardResponse>> {
    let Json(req) = body?;
    tracing::info!("Synthesizing storyboard from {} slide(s)", req.slides.len());

    Ok(Json(service.storyboard(req).await?))
}

/// POST /api/generate-video/code
pub async fn code(
    State(service): State<Arc<GenerationService>>,
    body: Body<CodeRequest>,
) -> ApiResult<Json<CodeResponse>> {
    let Json(req) = body?;
    tracing::info!("Synthesizing code for topic {:?}", req.topic);

    Ok(Json(service.code(req).await?))
}

/// POST /api/generate-video/render
pub async fn render(
    State(service): State<Arc<GenerationService>>,
    body: Body<RenderRequest>,
) -> ApiResult<Json<RenderResponse>> {
    let Json(req) = body?;
    tracing::info!(
        "Rendering material {:?} at {} quality",
        req.material_id,
        req.quality
    );

    Ok(Json(service.render(req).await?))
}

/// POST /api/generate-video
pub async fn generate(
    State(service): State<Arc<GenerationService>>,
    body: Body<GenerateRequest>,
) -> ApiResult<Json<RenderResponse>> {
    let Json(req) = body?;
    tracing::info!("Generating video for material {:?}", req.material_id);

    Ok(Json(service.generate(req).await?))
}
