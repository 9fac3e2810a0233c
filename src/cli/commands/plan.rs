//! Plan Command
//!
//! The single submit action: fill the form from config and flags, validate,
//! generate the briefing, stream it to the terminal and save an offline copy.

use chrono::Local;
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::info;

use super::{TripArgs, load_static_context, resolve_credential};
use crate::ai::provider::{ProviderConfig, create_provider};
use crate::cli::presenter::{DownloadArtifact, ResponsePresenter, TerminalSink, download_filename};
use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::planner::TripPlanner;
use crate::trip::{FormState, FormUpdate};
use crate::types::{ModelId, Result};

/// Options for one `plan` run
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    pub trip: TripArgs,
    /// Explicit model; skips catalog discovery
    pub model: Option<String>,
    pub no_stream: bool,
    pub output: Option<PathBuf>,
    pub no_save: bool,
}

pub fn run(options: PlanOptions) -> Result<()> {
    let config = ConfigLoader::load()?;
    let output = Output::new();
    let today = Local::now().date_naive();

    let mut form = FormState::from_config(&config, today).apply(options.trip.updates());
    if let Some(model) = options.model.as_deref() {
        form = form.apply([FormUpdate::Model(Some(ModelId::new(model)))]);
    }
    if options.no_stream {
        form = form.apply([FormUpdate::Streaming(false)]);
    }

    // prompt for the key only when the route is filled in
    let route_given = !form.origin.trim().is_empty() && !form.destination.trim().is_empty();
    let credential = resolve_credential(&config, route_given)?;
    form = form.apply([FormUpdate::Credential(credential)]);

    let static_context = load_static_context(&config, options.trip.context_file.as_deref())?;
    let provider = create_provider(&ProviderConfig::from(&config.llm))?;
    let mut planner = TripPlanner::new(provider)
        .with_static_context(static_context)
        .with_preferred_model(config.llm.model.as_deref().map(ModelId::new));

    output.step(&format!(
        "Planning {} → {} for {}...",
        form.origin.trim(),
        form.destination.trim(),
        form.vehicle.tow_vehicle
    ));
    if form.live_search {
        output.step("Live search enabled: fuel prices, closures and campground ratings");
    }

    let mut presenter = ResponsePresenter::new(TerminalSink::stdout());
    let rt = Runtime::new()?;
    let submission = rt.block_on(planner.plan(&form, &mut presenter))?;

    let model = submission.model.clone();
    let destination = submission.inputs.destination().to_string();
    let text = submission.result.into_text()?;
    output.success(&format!("Briefing complete ({})", model));

    if config.output.save && !options.no_save {
        let dir = options.output.unwrap_or_else(|| config.output.dir.clone());
        let artifact = DownloadArtifact::offer(&text, download_filename(&destination, today));
        let path = artifact.save(&dir)?;
        output.success(&format!("Offline copy: {}", path.display()));
    } else {
        info!("Offline copy disabled");
    }

    Ok(())
}
