//! Error types for the Slidecast clients

use slidecast_core::dto::error::ErrorBody;
use thiserror::Error;

/// Result type alias for server API operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the Slidecast server
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
        /// Remediation hint from the API, if any
        hint: Option<String>,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl ClientError {
    /// Create an API error from status code and raw response body
    ///
    /// A JSON [`ErrorBody`] is unpacked into message and hint; anything else
    /// is kept verbatim as the message.
    pub fn api_error(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => Self::ApiError {
                status,
                message: match parsed.details {
                    Some(details) => format!("{}: {}", parsed.error, details),
                    None => parsed.error,
                },
                hint: parsed.hint,
            },
            Err(_) => Self::ApiError {
                status,
                message: body,
                hint: None,
            },
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Remediation hint attached by the server
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::ApiError { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }
}

/// Errors from the chat-completion client
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChatError {
    /// Retries exhausted on retryable statuses or connection failures
    #[error("LLM service unavailable after {attempts} attempt(s): {last}")]
    Unavailable { attempts: u32, last: String },

    /// Non-retryable error status
    #[error("LLM service rejected the request (status {status}): {message}")]
    Rejected {
        status: u16,
        message: String,
        hint: Option<String>,
    },

    /// Response could not be understood
    #[error("Invalid LLM response: {0}")]
    InvalidResponse(String),
}

impl ChatError {
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Rejected { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_unpacks_error_body() {
        let err = ClientError::api_error(
            400,
            r#"{"error":"Generated code has a syntax error","details":"SyntaxError: unexpected EOF","hint":null}"#,
        );

        match err {
            ClientError::ApiError { status, message, hint } => {
                assert_eq!(status, 400);
                assert_eq!(
                    message,
                    "Generated code has a syntax error: SyntaxError: unexpected EOF"
                );
                assert!(hint.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_keeps_plain_body() {
        let err = ClientError::api_error(404, "not here");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("not here"));
    }
}
