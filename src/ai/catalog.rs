//! Model Catalog Resolver
//!
//! Turns a credential into a non-empty, ordered list of models that support
//! text generation. Discovery never fails: an absent credential, a provider
//! failure, or an empty listing all yield the built-in fallback list.

use std::fmt;
use tracing::{debug, info, warn};

use super::provider::{CatalogEntry, SharedProvider};
use crate::constants::catalog::{FALLBACK_MODELS, GENERATE_METHOD, NAME_HEURISTIC_PREFIX};
use crate::types::{Credential, ModelId};

/// A model offered for generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub identifier: ModelId,
    pub supports_generation: bool,
}

impl ModelDescriptor {
    fn generative(identifier: ModelId) -> Self {
        Self {
            identifier,
            supports_generation: true,
        }
    }
}

/// Where the catalog came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Live,
    Fallback,
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Live => write!(f, "live"),
            CatalogSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// Non-empty ordered model list
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelDescriptor>,
    source: CatalogSource,
}

impl ModelCatalog {
    /// The built-in list
    pub fn fallback() -> Self {
        Self {
            models: FALLBACK_MODELS
                .iter()
                .map(|id| ModelDescriptor::generative(ModelId::new(id)))
                .collect(),
            source: CatalogSource::Fallback,
        }
    }

    fn live(models: Vec<ModelDescriptor>) -> Self {
        if models.is_empty() {
            return Self::fallback();
        }
        Self {
            models,
            source: CatalogSource::Live,
        }
    }

    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    pub fn source(&self) -> CatalogSource {
        self.source
    }

    pub fn is_fallback(&self) -> bool {
        self.source == CatalogSource::Fallback
    }

    pub fn contains(&self, id: &ModelId) -> bool {
        self.models.iter().any(|m| &m.identifier == id)
    }

    /// The preferred model when the catalog offers it, else the first entry
    pub fn choose(&self, preferred: Option<&ModelId>) -> ModelId {
        if let Some(id) = preferred {
            if self.contains(id) {
                return id.clone();
            }
            debug!("Preferred model {} not in catalog, using first entry", id);
        }
        self.models
            .first()
            .map(|m| m.identifier.clone())
            .unwrap_or_else(|| ModelId::new(FALLBACK_MODELS[0]))
    }
}

/// Keep entries that can generate text.
///
/// The explicit capability list decides. The name prefix check is used only
/// for entries whose listing omits the capabilities.
pub fn filter_generation_models(entries: Vec<CatalogEntry>) -> Vec<ModelDescriptor> {
    let mut seen = Vec::<ModelId>::new();

    entries
        .into_iter()
        .filter(|entry| match &entry.generation_methods {
            Some(methods) => methods.iter().any(|m| m == GENERATE_METHOD),
            None => ModelId::new(&entry.name)
                .as_str()
                .starts_with(NAME_HEURISTIC_PREFIX),
        })
        .map(|entry| ModelId::new(&entry.name))
        .filter(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(id.clone());
                true
            }
        })
        .map(ModelDescriptor::generative)
        .collect()
}

/// Resolves the model catalog for a credential
pub struct ModelCatalogResolver {
    provider: SharedProvider,
}

impl ModelCatalogResolver {
    pub fn new(provider: SharedProvider) -> Self {
        Self { provider }
    }

    /// Never fails. No network call without a credential.
    pub async fn resolve(&self, credential: Option<&Credential>) -> ModelCatalog {
        let Some(credential) = credential.filter(|c| !c.is_empty()) else {
            debug!("No credential, using fallback model list");
            return ModelCatalog::fallback();
        };

        match self.provider.list_models(credential).await {
            Ok(entries) => {
                let total = entries.len();
                let catalog = ModelCatalog::live(filter_generation_models(entries));
                info!(
                    "Model catalog: {} of {} listed models usable ({})",
                    catalog.models().len(),
                    total,
                    catalog.source()
                );
                catalog
            }
            Err(e) => {
                warn!("Model discovery failed, using fallback list: {}", e);
                ModelCatalog::fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::mock::{MockProvider, entry};
    use crate::types::{ErrorCategory, LlmError};
    use std::sync::Arc;

    fn fallback_ids() -> Vec<&'static str> {
        FALLBACK_MODELS.to_vec()
    }

    fn ids(catalog: &ModelCatalog) -> Vec<&str> {
        catalog.models().iter().map(|m| m.identifier.as_str()).collect()
    }

    #[tokio::test]
    async fn test_empty_credential_uses_fallback_without_network() {
        let mock = Arc::new(MockProvider::new());
        let resolver = ModelCatalogResolver::new(mock.clone());

        let catalog = resolver.resolve(None).await;
        assert_eq!(ids(&catalog), fallback_ids());
        assert!(catalog.is_fallback());

        let blank = Credential::new("  ");
        let catalog = resolver.resolve(Some(&blank)).await;
        assert!(catalog.is_fallback());
        assert_eq!(mock.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_uses_fallback() {
        let mock = Arc::new(MockProvider::new().with_catalog(Err(LlmError::new(
            ErrorCategory::Auth,
            "API key not valid",
        ))));
        let resolver = ModelCatalogResolver::new(mock.clone());

        let catalog = resolver.resolve(Some(&Credential::new("bad"))).await;
        assert_eq!(ids(&catalog), fallback_ids());
        assert_eq!(mock.total_calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_listing_uses_fallback() {
        let mock = Arc::new(MockProvider::new().with_catalog(Ok(vec![entry(
            "models/embedding-001",
            Some(&["embedContent"]),
        )])));
        let catalog = ModelCatalogResolver::new(mock)
            .resolve(Some(&Credential::new("key")))
            .await;
        assert!(catalog.is_fallback());
    }

    #[tokio::test]
    async fn test_live_catalog_keeps_provider_order() {
        let mock = Arc::new(MockProvider::new().with_catalog(Ok(vec![
            entry("models/gemini-2.5-pro", Some(&["generateContent", "countTokens"])),
            entry("models/text-embedding-004", Some(&["embedContent"])),
            entry("models/gemini-2.5-flash", Some(&["generateContent"])),
        ])));
        let catalog = ModelCatalogResolver::new(mock)
            .resolve(Some(&Credential::new("key")))
            .await;

        assert_eq!(catalog.source(), CatalogSource::Live);
        assert_eq!(ids(&catalog), vec!["gemini-2.5-pro", "gemini-2.5-flash"]);
        assert!(catalog.models().iter().all(|m| m.supports_generation));
    }

    #[test]
    fn test_capability_list_beats_name() {
        let models = filter_generation_models(vec![
            // gemini-named but declares no generation capability
            entry("models/gemini-embedding-001", Some(&["embedContent"])),
            // capability list missing: name decides
            entry("models/gemini-legacy", None),
            entry("models/other-legacy", None),
            entry("models/custom-tuned", Some(&["generateContent"])),
            entry("models/custom-tuned", Some(&["generateContent"])),
        ]);

        let names: Vec<&str> = models.iter().map(|m| m.identifier.as_str()).collect();
        assert_eq!(names, vec!["gemini-legacy", "custom-tuned"]);
    }

    #[test]
    fn test_choose_model() {
        let catalog = ModelCatalog::fallback();
        assert_eq!(catalog.choose(None).as_str(), "gemini-3-flash-preview");
        assert_eq!(
            catalog.choose(Some(&ModelId::new("gemini-2.5-flash"))).as_str(),
            "gemini-2.5-flash"
        );
        assert_eq!(
            catalog.choose(Some(&ModelId::new("gemini-1.0-pro"))).as_str(),
            "gemini-3-flash-preview"
        );
    }
}
