//! API Error Handling
//!
//! Maps pipeline failures onto HTTP status codes and a JSON error body.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use slidecast_core::dto::error::ErrorBody;

use crate::service::PipelineError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    Pipeline(PipelineError),
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(err) => match err {
                PipelineError::InputInvalid(_)
                | PipelineError::NoSlides(_)
                | PipelineError::EmptyContent
                | PipelineError::SyntaxInvalid { .. } => StatusCode::BAD_REQUEST,
                PipelineError::NotFound(_) => StatusCode::NOT_FOUND,
                PipelineError::RenderTimeout { .. } => StatusCode::REQUEST_TIMEOUT,
                PipelineError::RenderInProgress(_) => StatusCode::CONFLICT,
                PipelineError::UpstreamRejected { .. }
                | PipelineError::EmptyStoryboard
                | PipelineError::EmptyCode => StatusCode::BAD_GATEWAY,
                PipelineError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                PipelineError::Configuration(_)
                | PipelineError::RenderSupervisionFailed(_)
                | PipelineError::RenderFailed { .. }
                | PipelineError::ArtifactNotFound { .. }
                | PipelineError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn body(self) -> ErrorBody {
        let err = match self {
            ApiError::BadRequest(msg) => return ErrorBody::new(msg),
            ApiError::Pipeline(err) => err,
        };

        let body = ErrorBody::new(err.to_string());
        match err {
            PipelineError::SyntaxInvalid {
                class_name,
                message,
            } => body.with_details(format!("{}: {}", class_name, message)),
            PipelineError::RenderFailed { output, .. }
            | PipelineError::ArtifactNotFound { output } => body.with_details(output),
            PipelineError::UpstreamRejected { message, hint, .. } => {
                body.with_details(message).with_hint(hint)
            }
            _ => body,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed ({}): {:?}", status, self);
        } else {
            tracing::warn!("Request rejected ({}): {:?}", status, self);
        }

        (status, Json(self.body())).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::Pipeline(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
