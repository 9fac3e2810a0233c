//! AI Integration Layer
//!
//! Model discovery, prompt compilation and generation against the hosted
//! text-generation service.

pub mod catalog;
pub mod client;
pub mod prompt;
pub mod provider;

pub use catalog::{CatalogSource, ModelCatalog, ModelCatalogResolver, ModelDescriptor};
pub use client::{FragmentObserver, GenerationClient, GenerationResult, GenerationState};
pub use prompt::{PromptBuilder, PromptSection};
pub use provider::{
    CatalogEntry, ErrorCategory, ErrorClassifier, GeminiProvider, GenerationRequest,
    GenerativeProvider, LlmError, ProviderConfig, SharedProvider, create_provider,
};
