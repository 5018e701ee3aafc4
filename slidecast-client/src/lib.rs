//! Slidecast HTTP Clients
//!
//! Two outbound clients live here:
//! - [`llm::ChatClient`], the resilient chat-completion client used by the
//!   storyboard and code synthesis stages
//! - [`SlidecastClient`], a typed client for the Slidecast server API used by
//!   the CLI
//!
//! # Example
//!
//! ```no_run
//! use slidecast_client::SlidecastClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SlidecastClient::new("http://localhost:8080");
//!
//!     let prepared = client.prepare("6f1c1d9e-4b8e-4f47-9a59-2f7f5a1e8b10").await?;
//!     println!("{} slides for {}", prepared.total_slides, prepared.topic);
//!     Ok(())
//! }
//! ```

pub mod error;
mod generate;
pub mod llm;

// Re-export commonly used types
pub use error::{ChatError, ClientError, Result};
pub use llm::{ChatClient, CompletionOptions, HttpTransport, RetryPolicy};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the Slidecast server API
#[derive(Debug, Clone)]
pub struct SlidecastClient {
    /// Base URL of the server (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl SlidecastClient {
    /// Create a new server client
    ///
    /// The underlying HTTP client has no request timeout: a render may
    /// legitimately take several minutes.
    ///
    /// # Example
    /// ```
    /// use slidecast_client::SlidecastClient;
    ///
    /// let client = SlidecastClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new server client with a custom HTTP client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is ignored
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}
