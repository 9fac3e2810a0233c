//! Models Command
//!
//! Lists the models offered for generation, live or fallback.

use tokio::runtime::Runtime;

use super::resolve_credential;
use crate::ai::catalog::ModelCatalogResolver;
use crate::ai::provider::{ProviderConfig, create_provider};
use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::{ModelId, Result};

pub fn run() -> Result<()> {
    let config = ConfigLoader::load()?;
    let output = Output::new();

    let credential = resolve_credential(&config, false)?;
    if credential.is_none() {
        output.warning("No API key found; showing the built-in model list");
    }

    let provider = create_provider(&ProviderConfig::from(&config.llm))?;
    let resolver = ModelCatalogResolver::new(provider);

    let rt = Runtime::new()?;
    let catalog = rt.block_on(resolver.resolve(credential.as_ref()));

    let preferred = config.llm.model.as_deref().map(ModelId::new);
    let default = catalog.choose(preferred.as_ref());

    output.header(&format!("Models ({})", catalog.source()));
    for model in catalog.models() {
        let marker = if model.identifier == default { "*" } else { " " };
        println!("{} {}", marker, model.identifier);
    }

    if catalog.is_fallback() && credential.is_some() {
        output.warning("Model discovery failed; run with --verbose for details");
    }
    if let Some(preferred) = preferred
        && !catalog.contains(&preferred)
    {
        output.warning(&format!(
            "Configured model '{}' is not in the catalog; '{}' will be used",
            preferred, default
        ));
    }

    Ok(())
}
