//! Generative Provider Abstraction
//!
//! Defines the `GenerativeProvider` trait at the seam between the planner and
//! the hosted text-generation service. Providers return raw provider errors as
//! `LlmError`; classification into user-facing outcomes happens in the
//! generation client.
//!
//! ## Modules
//!
//! - `gemini`: Google Generative Language REST API
//! - `sse`: server-sent-event frame decoder for streamed responses

mod gemini;
mod sse;

pub use gemini::GeminiProvider;
pub use sse::decode_sse;

// Re-export error types from centralized location
pub use crate::types::{ErrorCategory, ErrorClassifier, LlmError};

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::constants::network::DEFAULT_TIMEOUT_SECS;
use crate::types::{Credential, ModelId, PlannerError, Result};

/// Result of a raw provider call
pub type ProviderResult<T> = std::result::Result<T, LlmError>;

/// Lazily produced text fragments of a streamed generation
pub type FragmentStream = BoxStream<'static, ProviderResult<String>>;

/// Shared provider type
pub type SharedProvider = Arc<dyn GenerativeProvider>;

// =============================================================================
// Request / Listing Types
// =============================================================================

/// One generation request. Built once per submission, never retried.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub compiled_prompt: String,
    pub model_identifier: ModelId,
    /// Attach the web search tool
    pub tools_enabled: bool,
}

impl GenerationRequest {
    pub fn new(compiled_prompt: String, model_identifier: ModelId, tools_enabled: bool) -> Self {
        Self {
            compiled_prompt,
            model_identifier,
            tools_enabled,
        }
    }
}

/// A model as listed by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Provider name, possibly prefixed (`models/gemini-2.5-flash`)
    pub name: String,
    /// Supported generation methods; `None` when the provider omits the list
    pub generation_methods: Option<Vec<String>>,
}

// =============================================================================
// Provider Configuration
// =============================================================================

/// Configuration for generative providers
///
/// The credential is not part of the configuration; it is passed per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider type: "gemini"
    pub provider: String,
    /// Single-shot deadline and streaming idle timeout, in seconds
    pub timeout_secs: u64,
    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,
    /// API base URL (for proxies and tests)
    #[serde(default)]
    pub api_base: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: None,
            api_base: None,
        }
    }
}

impl From<&LlmConfig> for ProviderConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            provider: config.provider.clone(),
            timeout_secs: config.timeout_secs,
            temperature: config.temperature,
            api_base: config.api_base.clone(),
        }
    }
}

// =============================================================================
// Provider Trait
// =============================================================================

/// Hosted text-generation service
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// List the models visible to the credential
    async fn list_models(&self, credential: &Credential) -> ProviderResult<Vec<CatalogEntry>>;

    /// Single-shot generation returning the full text
    async fn generate(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> ProviderResult<String>;

    /// Streamed generation. Errors before the first byte are returned
    /// directly; errors mid-stream arrive as stream items.
    async fn stream_generate(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> ProviderResult<FragmentStream>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Create a shared provider from configuration
pub fn create_provider(config: &ProviderConfig) -> Result<SharedProvider> {
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiProvider::new(config.clone())?)),
        _ => Err(PlannerError::Config(format!(
            "Unknown provider: {}. Supported: gemini",
            config.provider
        ))),
    }
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use futures::stream;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Scripted provider that counts every call
    pub struct MockProvider {
        pub catalog: ProviderResult<Vec<CatalogEntry>>,
        pub fragments: Vec<ProviderResult<String>>,
        pub open_error: Option<LlmError>,
        pub list_calls: AtomicU32,
        pub generate_calls: AtomicU32,
        pub last_request: Mutex<Option<GenerationRequest>>,
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self {
                catalog: Ok(Vec::new()),
                fragments: Vec::new(),
                open_error: None,
                list_calls: AtomicU32::new(0),
                generate_calls: AtomicU32::new(0),
                last_request: Mutex::new(None),
            }
        }

        pub fn with_catalog(mut self, catalog: ProviderResult<Vec<CatalogEntry>>) -> Self {
            self.catalog = catalog;
            self
        }

        pub fn with_fragments(mut self, fragments: &[&str]) -> Self {
            self.fragments = fragments.iter().map(|f| Ok(f.to_string())).collect();
            self
        }

        pub fn with_stream(mut self, items: Vec<ProviderResult<String>>) -> Self {
            self.fragments = items;
            self
        }

        pub fn failing(mut self, error: LlmError) -> Self {
            self.open_error = Some(error);
            self
        }

        pub fn total_calls(&self) -> u32 {
            self.list_calls.load(Ordering::SeqCst) + self.generate_calls.load(Ordering::SeqCst)
        }

        fn record(&self, request: &GenerationRequest) -> ProviderResult<()> {
            self.generate_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            match &self.open_error {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl GenerativeProvider for MockProvider {
        async fn list_models(&self, _credential: &Credential) -> ProviderResult<Vec<CatalogEntry>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.catalog.clone()
        }

        async fn generate(
            &self,
            _credential: &Credential,
            request: &GenerationRequest,
        ) -> ProviderResult<String> {
            self.record(request)?;
            self.fragments.iter().cloned().collect()
        }

        async fn stream_generate(
            &self,
            _credential: &Credential,
            request: &GenerationRequest,
        ) -> ProviderResult<FragmentStream> {
            self.record(request)?;
            Ok(Box::pin(stream::iter(self.fragments.clone())))
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    pub fn entry(name: &str, methods: Option<&[&str]>) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            generation_methods: methods.map(|m| m.iter().map(|s| s.to_string()).collect()),
        }
    }
}
