//! Resilient chat-completion client
//!
//! Wraps a [`ChatTransport`] with bounded retry and exponential backoff.
//! Retryable statuses and connection failures are retried; any other error
//! status fails immediately, tagged with a remediation hint when the status
//! is one we recognize.

mod retry;
mod transport;

pub use retry::{RETRYABLE_STATUSES, RetryPolicy};
pub use transport::{
    ChatChoice, ChatCompletion, ChatMessage, ChatReply, ChatRequest, ChatTransport, HttpTransport,
    TransportError,
};

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::error::ChatError;

/// Per-call sampling and timeout settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub timeout: Duration,
}

/// Hint shown to the operator for statuses with a known cause
pub fn upstream_hint(status: u16) -> Option<&'static str> {
    match status {
        402 => Some("LLM account balance is insufficient; top up the provider account"),
        401 | 403 => Some("LLM credentials were rejected; check LLM_API_KEY"),
        _ => None,
    }
}

/// Chat-completion client shared by the synthesis stages
#[derive(Clone)]
pub struct ChatClient {
    transport: Arc<dyn ChatTransport>,
    model: String,
    retry: RetryPolicy,
}

impl ChatClient {
    pub fn new(transport: Arc<dyn ChatTransport>, model: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            transport,
            model: model.into(),
            retry,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a system + user conversation and return the assistant reply
    ///
    /// The reply may be empty; deciding whether that is acceptable is up to
    /// the caller.
    ///
    /// # Errors
    /// - [`ChatError::Rejected`] on a non-retryable status
    /// - [`ChatError::Unavailable`] once retries are exhausted
    /// - [`ChatError::InvalidResponse`] when the reply has no choices or
    ///   cannot be decoded
    pub async fn complete(
        &self,
        system: &str,
        user: &str,
        options: CompletionOptions,
    ) -> Result<String, ChatError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: options.temperature,
        };

        let mut retries = 0;

        loop {
            let attempt = retries + 1;
            debug!(attempt, model = %self.model, "Sending chat completion request");

            let err = match self.transport.send(&request, options.timeout).await {
                Ok(completion) => {
                    if retries > 0 {
                        info!("Chat completion succeeded after {} attempt(s)", attempt);
                    }
                    return completion
                        .first_content()
                        .map(str::to_string)
                        .ok_or_else(|| ChatError::InvalidResponse("reply has no choices".to_string()));
                }
                Err(err) => err,
            };

            let retry_after = match &err {
                TransportError::Status { status, body, .. }
                    if !RetryPolicy::is_retryable_status(*status) =>
                {
                    error!(status = *status, "LLM service rejected the request");
                    return Err(ChatError::Rejected {
                        status: *status,
                        message: body.clone(),
                        hint: upstream_hint(*status).map(str::to_string),
                    });
                }
                TransportError::Status { retry_after, .. } => *retry_after,
                TransportError::Connection(_) => None,
                TransportError::Decode(message) => {
                    return Err(ChatError::InvalidResponse(message.clone()));
                }
            };

            if retries >= self.retry.max_retries {
                error!(
                    "Chat completion failed after {} attempt(s): {}",
                    attempt, err
                );
                return Err(ChatError::Unavailable {
                    attempts: attempt,
                    last: err.to_string(),
                });
            }

            retries += 1;
            let delay = self.retry.delay(retries, retry_after);
            warn!(
                "Chat completion failed (attempt {}/{}): {}",
                attempt,
                self.retry.max_retries + 1,
                err
            );
            warn!("Retrying in {} ms...", delay.as_millis());

            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Replays a fixed sequence of outcomes and records when each call arrived
    struct ScriptedTransport {
        outcomes: Mutex<VecDeque<Result<ChatCompletion, TransportError>>>,
        calls: Mutex<Vec<Instant>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedTransport {
        fn new(outcomes: Vec<Result<ChatCompletion, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: Mutex::new(Vec::new()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn send(
            &self,
            request: &ChatRequest,
            _timeout: Duration,
        ) -> Result<ChatCompletion, TransportError> {
            self.calls.lock().unwrap().push(Instant::now());
            self.requests.lock().unwrap().push(request.clone());
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("transport called more times than scripted")
        }
    }

    fn status(status: u16) -> Result<ChatCompletion, TransportError> {
        Err(TransportError::Status {
            status,
            body: format!("error {status}"),
            retry_after: None,
        })
    }

    fn reply(content: &str) -> Result<ChatCompletion, TransportError> {
        Ok(ChatCompletion::with_content(content))
    }

    fn options() -> CompletionOptions {
        CompletionOptions {
            temperature: 0.7,
            timeout: Duration::from_secs(90),
        }
    }

    fn client(transport: Arc<ScriptedTransport>) -> ChatClient {
        ChatClient::new(transport, "test-model", RetryPolicy::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_twice_then_succeeds() {
        let transport = ScriptedTransport::new(vec![status(429), status(429), reply("Scene 1: Intro")]);
        let client = client(transport.clone());

        let content = client.complete("sys", "user", options()).await.unwrap();
        assert_eq!(content, "Scene 1: Intro");

        let calls = transport.call_times();
        assert_eq!(calls.len(), 3);
        assert!(calls[1] - calls[0] >= Duration::from_millis(500));
        assert!(calls[2] - calls[1] >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_are_unavailable() {
        let transport = ScriptedTransport::new(vec![status(503), status(503), status(502), status(500)]);
        let client = client(transport.clone());

        let err = client.complete("sys", "user", options()).await.unwrap_err();
        match err {
            ChatError::Unavailable { attempts, last } => {
                assert_eq!(attempts, 4);
                assert!(last.contains("500"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.call_times().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_payment_required_fails_immediately_with_hint() {
        let transport = ScriptedTransport::new(vec![status(402)]);
        let client = client(transport.clone());

        let err = client.complete("sys", "user", options()).await.unwrap_err();
        assert!(matches!(err, ChatError::Rejected { status: 402, .. }));
        assert!(err.hint().unwrap().contains("balance"));
        assert_eq!(transport.call_times().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connection_errors_are_retried() {
        let transport = ScriptedTransport::new(vec![
            Err(TransportError::Connection("connection reset".to_string())),
            reply("ok"),
        ]);
        let client = client(transport.clone());

        assert_eq!(client.complete("sys", "user", options()).await.unwrap(), "ok");
        assert_eq!(transport.call_times().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_header_stretches_backoff() {
        let transport = ScriptedTransport::new(vec![
            Err(TransportError::Status {
                status: 429,
                body: "slow down".to_string(),
                retry_after: Some(Duration::from_secs(3)),
            }),
            reply("ok"),
        ]);
        let client = client(transport.clone());

        client.complete("sys", "user", options()).await.unwrap();
        let calls = transport.call_times();
        assert!(calls[1] - calls[0] >= Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_no_choices_is_invalid_response() {
        let transport = ScriptedTransport::new(vec![Ok(ChatCompletion::default())]);
        let client = client(transport);

        let err = client.complete("sys", "user", options()).await.unwrap_err();
        assert!(matches!(err, ChatError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_request_carries_model_messages_and_temperature() {
        let transport = ScriptedTransport::new(vec![reply("ok")]);
        let client = client(transport.clone());

        client.complete("be brief", "explain X", options()).await.unwrap();

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].model, "test-model");
        assert_eq!(requests[0].messages[0], ChatMessage::system("be brief"));
        assert_eq!(requests[0].messages[1], ChatMessage::user("explain X"));
        assert_eq!(requests[0].temperature, 0.7);
    }
}
