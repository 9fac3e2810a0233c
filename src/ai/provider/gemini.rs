//! Google Gemini Provider
//!
//! Generative provider over the Generative Language REST API.
//! - Listing: `GET {base}/models`, paged with `nextPageToken`.
//! - Single-shot: `POST {base}/models/{id}:generateContent`.
//! - Streaming: `POST {base}/models/{id}:streamGenerateContent?alt=sse`.
//! - The key travels in the `x-goog-api-key` header.

use async_trait::async_trait;
use futures::{StreamExt, future};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

use super::sse::decode_sse;
use super::{
    CatalogEntry, ErrorCategory, ErrorClassifier, FragmentStream, GenerationRequest,
    GenerativeProvider, LlmError, ProviderConfig, ProviderResult,
};
use crate::constants::catalog::{MAX_PAGES, PAGE_SIZE};
use crate::constants::network::{CATALOG_TIMEOUT_SECS, CONNECTION_TIMEOUT_SECS, DEFAULT_API_BASE};
use crate::types::{Credential, PlannerError, Result};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API provider. Holds no credential; the key is supplied per call.
#[derive(Debug)]
pub struct GeminiProvider {
    api_base: Url,
    temperature: Option<f32>,
    timeout: Duration,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let base = config
            .api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let api_base = Url::parse(&base)
            .map_err(|e| PlannerError::Config(format!("Invalid API base URL '{}': {}", base, e)))?;
        if !matches!(api_base.scheme(), "http" | "https") {
            return Err(PlannerError::Config(format!(
                "API base URL must be http(s), got '{}'",
                base
            )));
        }

        let timeout = Duration::from_secs(config.timeout_secs);

        // read_timeout bounds the gap between chunks, not the whole body, so a
        // long stream keeps going as long as bytes keep arriving
        let client = reqwest::Client::builder()
            .read_timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECTION_TIMEOUT_SECS))
            .build()
            .map_err(|e| PlannerError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_base,
            temperature: config.temperature,
            timeout,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.as_str().trim_end_matches('/'), path)
    }

    fn build_request(&self, request: &GenerationRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: request.compiled_prompt.clone(),
                }],
            }],
            tools: request
                .tools_enabled
                .then(|| vec![serde_json::json!({ "google_search": {} })]),
            generation_config: self.temperature.map(|temperature| GenerationConfig {
                temperature: Some(temperature),
            }),
        }
    }

    /// Whole-request deadline; streamed bodies are bounded by the read timeout only
    fn request_deadline(&self, streaming: bool) -> Option<Duration> {
        (!streaming).then_some(self.timeout)
    }

    async fn post(
        &self,
        credential: &Credential,
        url: &str,
        request: &GenerationRequest,
        streaming: bool,
    ) -> ProviderResult<reqwest::Response> {
        let body = self.build_request(request);

        let mut builder = self
            .client
            .post(url)
            .header(API_KEY_HEADER, credential.expose())
            .json(&body);
        if let Some(deadline) = self.request_deadline(streaming) {
            builder = builder.timeout(deadline);
        }

        let response = builder.send().await.map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response)
    }
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    async fn list_models(&self, credential: &Credential) -> ProviderResult<Vec<CatalogEntry>> {
        let url = self.endpoint("models");
        let mut entries = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 0..MAX_PAGES {
            let mut query = vec![("pageSize", PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let response = self
                .client
                .get(&url)
                .header(API_KEY_HEADER, credential.expose())
                .query(&query)
                .timeout(Duration::from_secs(CATALOG_TIMEOUT_SECS))
                .send()
                .await
                .map_err(transport_error)?;

            if !response.status().is_success() {
                return Err(error_from_response(response).await);
            }

            let listing: ListModelsResponse = response.json().await.map_err(|e| {
                LlmError::new(
                    ErrorCategory::Unknown,
                    format!("Malformed model listing: {}", e),
                )
            })?;

            debug!(page, count = listing.models.len(), "Fetched model listing page");

            entries.extend(listing.models.into_iter().map(|m| CatalogEntry {
                name: m.name,
                generation_methods: m.supported_generation_methods,
            }));

            match listing.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => return Ok(entries),
            }
        }

        warn!("Model listing truncated after {} pages", MAX_PAGES);
        Ok(entries)
    }

    async fn generate(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> ProviderResult<String> {
        info!(
            "Generating with Gemini (model: {}, tools: {})",
            request.model_identifier, request.tools_enabled
        );

        let start_time = Instant::now();
        let url = self.endpoint(&format!(
            "models/{}:generateContent",
            request.model_identifier
        ));

        let response = self.post(credential, &url, request, false).await?;
        let body: Value = response.json().await.map_err(|e| {
            LlmError::new(
                ErrorCategory::Unknown,
                format!("Failed to parse Gemini response: {}", e),
            )
        })?;

        if let Some(err) = response_error(&body) {
            return Err(err);
        }

        let text = extract_text(&body);
        debug!(
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            chars = text.len(),
            "Received Gemini response"
        );
        Ok(text)
    }

    async fn stream_generate(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> ProviderResult<FragmentStream> {
        info!(
            "Streaming with Gemini (model: {}, tools: {})",
            request.model_identifier, request.tools_enabled
        );

        let url = self.endpoint(&format!(
            "models/{}:streamGenerateContent?alt=sse",
            request.model_identifier
        ));

        let response = self.post(credential, &url, request, true).await?;
        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(transport_error))
            .boxed();

        let fragments = decode_sse(bytes).filter_map(|frame| {
            future::ready(match frame {
                Ok(value) => match response_error(&value) {
                    Some(err) => Some(Err(err)),
                    None => {
                        let text = extract_text(&value);
                        (!text.is_empty()).then_some(Ok(text))
                    }
                },
                Err(err) => Some(Err(err)),
            })
        });

        Ok(fragments.boxed())
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// =============================================================================
// Response Helpers
// =============================================================================

/// Concatenate the text parts of the first candidate
fn extract_text(body: &Value) -> String {
    body.pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

/// Embedded error or blocked prompt, for whole responses and stream frames
fn response_error(body: &Value) -> Option<LlmError> {
    if let Some(err) = embedded_error(body) {
        return Some(err);
    }
    block_reason(body).map(|reason| {
        LlmError::new(
            ErrorCategory::BadRequest,
            format!("Prompt blocked by the provider: {}", reason),
        )
    })
}

fn block_reason(body: &Value) -> Option<&str> {
    let has_candidates = body
        .get("candidates")
        .and_then(Value::as_array)
        .is_some_and(|c| !c.is_empty());
    if has_candidates {
        return None;
    }
    body.pointer("/promptFeedback/blockReason")
        .and_then(Value::as_str)
}

/// `{"error": {"code": 429, "message": "...", "status": "RESOURCE_EXHAUSTED"}}`
fn embedded_error(body: &Value) -> Option<LlmError> {
    let error = body.get("error")?;
    let status = error
        .get("code")
        .and_then(Value::as_u64)
        .and_then(|c| u16::try_from(c).ok());
    let code = error.get("status").and_then(Value::as_str);
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Unknown provider error");

    Some(ErrorClassifier::classify(status, code, message))
}

async fn error_from_response(response: reqwest::Response) -> LlmError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let parsed = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| embedded_error(&v));

    match parsed {
        // HTTP status is authoritative over the body's numeric code
        Some(mut err) => {
            let classified = ErrorClassifier::classify(
                Some(status.as_u16()),
                err.code.as_deref(),
                &err.message,
            );
            err.category = classified.category;
            err.status = Some(status.as_u16());
            err
        }
        None => {
            let message = if text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                text
            };
            ErrorClassifier::classify_http_status(status.as_u16(), &message)
        }
    }
}

fn transport_error(err: reqwest::Error) -> LlmError {
    if err.is_timeout() {
        return LlmError::new(ErrorCategory::Network, format!("Request timed out: {}", err));
    }
    if err.is_connect() {
        return LlmError::new(ErrorCategory::Network, format!("Connection failed: {}", err));
    }
    ErrorClassifier::classify(err.status().map(|s| s.as_u16()), None, &err.to_string())
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    supported_generation_methods: Option<Vec<String>>,
}
