//! TripBrief - RV Travel-Day Briefing Generator
//!
//! Collects trip, rig and preference inputs, compiles them into a briefing
//! prompt, sends it to a hosted Gemini model and streams the markdown answer
//! back with an offline copy.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tripbrief::{FormState, FormUpdate, TripPlanner};
//! use tripbrief::ai::{ProviderConfig, create_provider};
//!
//! let provider = create_provider(&ProviderConfig::default())?;
//! let mut planner = TripPlanner::new(provider);
//! let form = FormState::new(today).apply([
//!     FormUpdate::Credential(Some(Credential::new(key))),
//!     FormUpdate::Origin("North Bend, WA".into()),
//!     FormUpdate::Destination("Moab, UT".into()),
//! ]);
//! let submission = planner.plan(&form, &mut ()).await?;
//! println!("{}", submission.result.into_text()?);
//! ```
//!
//! ## Modules
//!
//! - [`trip`]: trip inputs and the form state reducer
//! - [`ai`]: model catalog, prompt compiler, generation client, providers
//! - [`planner`]: one submission end to end
//! - [`cli`]: terminal presenter and commands
//! - [`config`]: layered configuration

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod planner;
pub mod trip;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{ErrorCategory, PlannerError, Result, ValidationError};
pub use types::{Credential, ModelId};

// Trip
pub use trip::{FormState, FormUpdate, HomeschoolTopic, TripInputs, VehicleProfile};

// Planning
pub use planner::{Submission, TripPlanner};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{
    FragmentObserver, GenerationClient, GenerationResult, GenerationState, ModelCatalog,
    ModelCatalogResolver,
};
