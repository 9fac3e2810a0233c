//! Trip Planner
//!
//! Orchestrates one submission: validate the form, pick the model, compile
//! the prompt, run the generation and hand fragments to the observer.
//! Validation runs before any provider contact.

use tracing::{debug, info};

use crate::ai::catalog::ModelCatalogResolver;
use crate::ai::client::{FragmentObserver, GenerationClient, GenerationResult, GenerationState};
use crate::ai::prompt::{self, DEFAULT_STATIC_CONTEXT};
use crate::ai::provider::{GenerationRequest, SharedProvider};
use crate::trip::{FormState, TripInputs};
use crate::types::{ModelId, Result};

/// Outcome of one submission
#[derive(Debug, Clone)]
pub struct Submission {
    pub inputs: TripInputs,
    pub model: ModelId,
    pub result: GenerationResult,
}

/// Plans trips against one provider
pub struct TripPlanner {
    client: GenerationClient,
    resolver: ModelCatalogResolver,
    static_context: String,
    preferred_model: Option<ModelId>,
}

impl TripPlanner {
    pub fn new(provider: SharedProvider) -> Self {
        Self {
            client: GenerationClient::new(provider.clone()),
            resolver: ModelCatalogResolver::new(provider),
            static_context: DEFAULT_STATIC_CONTEXT.to_string(),
            preferred_model: None,
        }
    }

    /// Domain context paragraph for every prompt
    pub fn with_static_context(mut self, context: impl Into<String>) -> Self {
        self.static_context = context.into();
        self
    }

    /// Model used when the form does not name one and the catalog offers it
    pub fn with_preferred_model(mut self, model: Option<ModelId>) -> Self {
        self.preferred_model = model;
        self
    }

    pub fn state(&self) -> GenerationState {
        self.client.state()
    }

    /// Run one submission.
    ///
    /// Returns `Err` only for validation failures; provider failures are
    /// reported through [`Submission::result`].
    pub async fn plan<O: FragmentObserver + ?Sized>(
        &mut self,
        form: &FormState,
        observer: &mut O,
    ) -> Result<Submission> {
        let (credential, inputs) = form.validate_submission()?;

        let model = match &form.model {
            Some(model) => model.clone(),
            None => self
                .resolver
                .resolve(Some(&credential))
                .await
                .choose(self.preferred_model.as_ref()),
        };

        let compiled = prompt::compile(&inputs, &self.static_context, form.live_search);
        debug!("Compiled prompt: {} chars", compiled.len());

        info!(
            "Planning {} -> {} with {} (stream: {}, live search: {})",
            inputs.origin(),
            inputs.destination(),
            model,
            form.stream,
            form.live_search
        );

        let request = GenerationRequest::new(compiled, model.clone(), form.live_search);
        let result = if form.stream {
            self.client
                .generate_streaming(&credential, &request, observer)
                .await
        } else {
            self.client.generate(&credential, &request, observer).await
        };

        Ok(Submission {
            inputs,
            model,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::mock::{MockProvider, entry};
    use crate::trip::FormUpdate;
    use crate::types::{Credential, PlannerError, ValidationErrorKind};
    use chrono::NaiveDate;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    fn form() -> FormState {
        FormState::new(NaiveDate::from_ymd_opt(2026, 2, 14).unwrap()).apply([
            FormUpdate::Credential(Some(Credential::new("key"))),
            FormUpdate::Origin("North Bend, WA".to_string()),
            FormUpdate::Destination("Moab UT".to_string()),
        ])
    }

    #[tokio::test]
    async fn test_empty_origin_never_reaches_provider() {
        let mock = Arc::new(MockProvider::new().with_fragments(&["unused"]));
        let mut planner = TripPlanner::new(mock.clone());

        let form = form().apply([FormUpdate::Origin(String::new())]);
        let err = planner.plan(&form, &mut ()).await.unwrap_err();

        match err {
            PlannerError::Validation(v) => {
                assert_eq!(v.kind, ValidationErrorKind::MissingField);
                assert_eq!(v.field.as_deref(), Some("origin"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(mock.total_calls(), 0);
        assert_eq!(planner.state(), GenerationState::Idle);
    }

    #[tokio::test]
    async fn test_missing_credential_never_reaches_provider() {
        let mock = Arc::new(MockProvider::new());
        let mut planner = TripPlanner::new(mock.clone());

        let form = form().apply([FormUpdate::Credential(None)]);
        assert!(planner.plan(&form, &mut ()).await.is_err());
        assert_eq!(mock.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_plan_uses_catalog_when_no_model_requested() {
        let mock = Arc::new(
            MockProvider::new()
                .with_catalog(Ok(vec![
                    entry("models/gemini-2.5-pro", Some(&["generateContent"])),
                    entry("models/gemini-2.5-flash", Some(&["generateContent"])),
                ]))
                .with_fragments(&["Hello, ", "world", "!"]),
        );
        let mut planner = TripPlanner::new(mock.clone())
            .with_preferred_model(Some(ModelId::new("gemini-2.5-flash")));

        let submission = planner.plan(&form(), &mut ()).await.unwrap();

        assert_eq!(submission.model.as_str(), "gemini-2.5-flash");
        assert_eq!(submission.result.text(), Some("Hello, world!"));
        assert_eq!(submission.inputs.destination(), "Moab UT");
        assert_eq!(mock.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(mock.generate_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_requested_model_skips_catalog_and_sends_tools() {
        let mock = Arc::new(MockProvider::new().with_fragments(&["ok"]));
        let mut planner = TripPlanner::new(mock.clone()).with_static_context("Solo traveler.");

        let form = form().apply([
            FormUpdate::Model(Some(ModelId::new("gemini-2.5-pro"))),
            FormUpdate::LiveSearch(true),
            FormUpdate::Streaming(false),
        ]);
        let submission = planner.plan(&form, &mut ()).await.unwrap();
        assert!(submission.result.is_success());
        assert_eq!(mock.list_calls.load(Ordering::SeqCst), 0);

        let request = mock.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.model_identifier.as_str(), "gemini-2.5-pro");
        assert!(request.tools_enabled);
        assert!(request.compiled_prompt.contains("Solo traveler."));
        assert!(request.compiled_prompt.contains("LIVE DATA REQUIRED"));
    }
}
