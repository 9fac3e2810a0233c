//! Generation Client
//!
//! Sends one [`GenerationRequest`] to the provider, either streamed or
//! single-shot, and folds every provider failure into a [`GenerationResult`].
//! Nothing is retried; a failed request leaves the client ready for the next
//! submission.

use futures::StreamExt;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::provider::{GenerationRequest, SharedProvider};
use crate::types::{Credential, ErrorCategory, LlmError, PlannerError};

/// Lifecycle of one generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    Requesting,
    Streaming,
    Completed,
    Failed,
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GenerationState::Idle => "idle",
            GenerationState::Requesting => "requesting",
            GenerationState::Streaming => "streaming",
            GenerationState::Completed => "completed",
            GenerationState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Outcome of one generation
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
    Success { full_text: String },
    RateLimited,
    ModelNotFound { identifier: String },
    TransientError { message: String },
}

impl GenerationResult {
    /// Classify a provider failure for the model that was requested
    pub fn from_error(err: &LlmError, model: &str) -> Self {
        match err.category {
            ErrorCategory::RateLimit => GenerationResult::RateLimited,
            ErrorCategory::NotFound => GenerationResult::ModelNotFound {
                identifier: model.to_string(),
            },
            _ => GenerationResult::TransientError {
                message: err.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success { .. })
    }

    /// Full text on success
    pub fn text(&self) -> Option<&str> {
        match self {
            GenerationResult::Success { full_text } => Some(full_text),
            _ => None,
        }
    }

    /// Convert failures into the matching application error
    pub fn into_text(self) -> Result<String, PlannerError> {
        match self {
            GenerationResult::Success { full_text } => Ok(full_text),
            GenerationResult::RateLimited => Err(PlannerError::RateLimited),
            GenerationResult::ModelNotFound { identifier } => {
                Err(PlannerError::ModelNotFound { identifier })
            }
            GenerationResult::TransientError { message } => {
                Err(PlannerError::Transient { message })
            }
        }
    }
}

/// Receives text as it arrives
pub trait FragmentObserver {
    fn on_fragment(&mut self, fragment: &str);

    /// Called once with the full text after a successful generation
    fn on_complete(&mut self, _full_text: &str) {}

    /// Called once when the generation fails
    fn on_failed(&mut self) {}
}

/// Observer that ignores everything
impl FragmentObserver for () {
    fn on_fragment(&mut self, _fragment: &str) {}
}

/// Issues generation requests and tracks their state
pub struct GenerationClient {
    provider: SharedProvider,
    state: GenerationState,
}

impl GenerationClient {
    pub fn new(provider: SharedProvider) -> Self {
        Self {
            provider,
            state: GenerationState::Idle,
        }
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    fn transition(&mut self, next: GenerationState) {
        debug!("Generation state: {} -> {}", self.state, next);
        self.state = next;
    }

    /// Single-shot generation. The observer sees the whole text as one fragment.
    pub async fn generate<O: FragmentObserver + ?Sized>(
        &mut self,
        credential: &Credential,
        request: &GenerationRequest,
        observer: &mut O,
    ) -> GenerationResult {
        let start = self.begin(request);

        match self.provider.generate(credential, request).await {
            Ok(full_text) => {
                observer.on_fragment(&full_text);
                self.complete(full_text, start, observer)
            }
            Err(e) => self.fail(&e, request, observer),
        }
    }

    /// Streamed generation. Fragments are appended in arrival order and
    /// forwarded to the observer one by one.
    pub async fn generate_streaming<O: FragmentObserver + ?Sized>(
        &mut self,
        credential: &Credential,
        request: &GenerationRequest,
        observer: &mut O,
    ) -> GenerationResult {
        let start = self.begin(request);

        let mut stream = match self.provider.stream_generate(credential, request).await {
            Ok(stream) => stream,
            Err(e) => return self.fail(&e, request, observer),
        };

        self.transition(GenerationState::Streaming);
        let mut full_text = String::new();
        let mut fragments = 0usize;

        while let Some(item) = stream.next().await {
            match item {
                Ok(fragment) => {
                    fragments += 1;
                    full_text.push_str(&fragment);
                    observer.on_fragment(&fragment);
                }
                Err(e) => {
                    warn!(
                        "Stream failed after {} fragments ({} chars)",
                        fragments,
                        full_text.len()
                    );
                    return self.fail(&e, request, observer);
                }
            }
        }

        debug!("Stream finished with {} fragments", fragments);
        self.complete(full_text, start, observer)
    }

    fn begin(&mut self, request: &GenerationRequest) -> Instant {
        debug!(
            "Requesting {} from {} (tools: {})",
            request.model_identifier,
            self.provider.name(),
            request.tools_enabled
        );
        self.transition(GenerationState::Requesting);
        Instant::now()
    }

    fn complete<O: FragmentObserver + ?Sized>(
        &mut self,
        full_text: String,
        start: Instant,
        observer: &mut O,
    ) -> GenerationResult {
        info!(
            "Generation completed in {:.1}s ({} chars)",
            start.elapsed().as_secs_f64(),
            full_text.len()
        );
        self.transition(GenerationState::Completed);
        observer.on_complete(&full_text);
        GenerationResult::Success { full_text }
    }

    fn fail<O: FragmentObserver + ?Sized>(
        &mut self,
        err: &LlmError,
        request: &GenerationRequest,
        observer: &mut O,
    ) -> GenerationResult {
        warn!("Generation failed: {}", err);
        self.transition(GenerationState::Failed);
        observer.on_failed();
        GenerationResult::from_error(err, request.model_identifier.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::mock::MockProvider;
    use crate::types::ModelId;
    use std::sync::Arc;

    #[derive(Default)]
    struct Recorder {
        fragments: Vec<String>,
        completed: Option<String>,
        failed: bool,
    }

    impl FragmentObserver for Recorder {
        fn on_fragment(&mut self, fragment: &str) {
            self.fragments.push(fragment.to_string());
        }

        fn on_complete(&mut self, full_text: &str) {
            self.completed = Some(full_text.to_string());
        }

        fn on_failed(&mut self) {
            self.failed = true;
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new(
            "prompt".to_string(),
            ModelId::new("gemini-2.5-flash"),
            false,
        )
    }

    fn key() -> Credential {
        Credential::new("key")
    }

    #[tokio::test]
    async fn test_stream_accumulates_in_order() {
        let mock = Arc::new(MockProvider::new().with_fragments(&["Hello, ", "world", "!"]));
        let mut client = GenerationClient::new(mock.clone());
        let mut recorder = Recorder::default();

        let result = client
            .generate_streaming(&key(), &request(), &mut recorder)
            .await;

        assert_eq!(
            result,
            GenerationResult::Success {
                full_text: "Hello, world!".to_string()
            }
        );
        assert_eq!(recorder.fragments, vec!["Hello, ", "world", "!"]);
        assert_eq!(recorder.completed.as_deref(), Some("Hello, world!"));
        assert_eq!(client.state(), GenerationState::Completed);
        assert_eq!(mock.generate_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_stream_completes_with_empty_text() {
        let mock = Arc::new(MockProvider::new());
        let mut client = GenerationClient::new(mock);

        let result = client.generate_streaming(&key(), &request(), &mut ()).await;
        assert_eq!(result.text(), Some(""));
    }

    #[tokio::test]
    async fn test_single_shot_success() {
        let mock = Arc::new(MockProvider::new().with_fragments(&["# Briefing"]));
        let mut client = GenerationClient::new(mock);
        let mut recorder = Recorder::default();

        let result = client.generate(&key(), &request(), &mut recorder).await;
        assert_eq!(result.text(), Some("# Briefing"));
        assert_eq!(recorder.fragments, vec!["# Briefing"]);
    }

    #[tokio::test]
    async fn test_failures_are_classified() {
        let cases = [
            (
                LlmError::new(ErrorCategory::RateLimit, "Quota exceeded").with_status(429),
                GenerationResult::RateLimited,
            ),
            (
                LlmError::new(ErrorCategory::NotFound, "models/x is not found").with_status(404),
                GenerationResult::ModelNotFound {
                    identifier: "gemini-2.5-flash".to_string(),
                },
            ),
        ];

        for (error, expected) in cases {
            let mock = Arc::new(MockProvider::new().failing(error));
            let mut client = GenerationClient::new(mock);
            let mut recorder = Recorder::default();

            let result = client
                .generate_streaming(&key(), &request(), &mut recorder)
                .await;
            assert_eq!(result, expected);
            assert!(recorder.failed);
            assert_eq!(client.state(), GenerationState::Failed);
        }
    }

    #[tokio::test]
    async fn test_other_failures_keep_raw_detail() {
        let error = LlmError::new(ErrorCategory::Auth, "API key not valid").with_status(403);
        let mock = Arc::new(MockProvider::new().failing(error));
        let mut client = GenerationClient::new(mock);

        let result = client.generate(&key(), &request(), &mut ()).await;
        match result {
            GenerationResult::TransientError { message } => {
                assert!(message.contains("API key not valid"));
            }
            other => panic!("expected TransientError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mid_stream_error_fails_generation() {
        let mock = Arc::new(MockProvider::new().with_stream(vec![
            Ok("Day 1".to_string()),
            Err(LlmError::new(ErrorCategory::RateLimit, "Resource exhausted")),
        ]));
        let mut client = GenerationClient::new(mock);
        let mut recorder = Recorder::default();

        let result = client
            .generate_streaming(&key(), &request(), &mut recorder)
            .await;
        assert_eq!(result, GenerationResult::RateLimited);
        assert_eq!(recorder.fragments, vec!["Day 1"]);
        assert!(recorder.completed.is_none());
    }

    #[tokio::test]
    async fn test_blocked_stream_is_not_an_empty_success() {
        let mock = Arc::new(MockProvider::new().with_stream(vec![Err(LlmError::new(
            ErrorCategory::BadRequest,
            "Prompt blocked by the provider: SAFETY",
        ))]));
        let mut client = GenerationClient::new(mock);
        let mut recorder = Recorder::default();

        let result = client
            .generate_streaming(&key(), &request(), &mut recorder)
            .await;
        match result {
            GenerationResult::TransientError { message } => assert!(message.contains("SAFETY")),
            other => panic!("expected TransientError, got {other:?}"),
        }
        assert!(recorder.failed);
        assert_eq!(client.state(), GenerationState::Failed);
    }

    #[tokio::test]
    async fn test_client_is_reusable_after_failure() {
        let failing = Arc::new(
            MockProvider::new().failing(LlmError::new(ErrorCategory::Transient, "overloaded")),
        );
        let mut client = GenerationClient::new(failing);
        let _ = client.generate(&key(), &request(), &mut ()).await;
        assert_eq!(client.state(), GenerationState::Failed);

        client.provider = Arc::new(MockProvider::new().with_fragments(&["ok"]));
        let result = client.generate(&key(), &request(), &mut ()).await;
        assert!(result.is_success());
        assert_eq!(client.state(), GenerationState::Completed);
    }

    #[test]
    fn test_into_text_maps_to_guidance() {
        let err = GenerationResult::RateLimited.into_text().unwrap_err();
        assert!(err.to_string().contains("shorter route"));

        let err = GenerationResult::ModelNotFound {
            identifier: "gemini-x".to_string(),
        }
        .into_text()
        .unwrap_err();
        assert!(err.to_string().contains("gemini-x"));
    }
}
