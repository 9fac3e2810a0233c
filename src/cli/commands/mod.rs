//! CLI Commands
//!
//! Shared trip flags, credential lookup and static-context loading used by
//! the individual commands.

pub mod config;
pub mod models;
pub mod plan;
pub mod prompt;

use chrono::{NaiveDate, NaiveTime};
use clap::Args;
use console::Term;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::ai::prompt::DEFAULT_STATIC_CONTEXT;
use crate::config::Config;
use crate::constants::CREDENTIAL_ENV_VARS;
use crate::trip::{FormUpdate, HomeschoolTopic};
use crate::types::{Credential, PlannerError, Result};

/// Parse departure time: `14:30`, `14:30:00` or `2:30 PM`
fn parse_time(s: &str) -> std::result::Result<NaiveTime, String> {
    let trimmed = s.trim();
    ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| format!("Invalid time '{}'. Use HH:MM (24h) or H:MM AM/PM", s))
}

/// Trip fields shared by `plan` and `prompt`
#[derive(Debug, Clone, Default, Args)]
pub struct TripArgs {
    #[arg(long = "from", value_name = "ORIGIN", help = "Departure location")]
    pub origin: Option<String>,
    #[arg(long = "to", value_name = "DESTINATION", help = "Destination")]
    pub destination: Option<String>,
    #[arg(long, help = "Departure date, YYYY-MM-DD (default: tomorrow)")]
    pub date: Option<NaiveDate>,
    #[arg(long, value_parser = parse_time, help = "Departure time (default: config, 09:00)")]
    pub time: Option<NaiveTime>,
    #[arg(
        long,
        value_parser = clap::value_parser!(u8).range(2..=12),
        help = "Maximum driving hours per day (2-12)"
    )]
    pub max_drive_hours: Option<u8>,

    // Rig
    #[arg(long, help = "Tow vehicle description; 'diesel' in it selects diesel pricing")]
    pub tow_vehicle: Option<String>,
    #[arg(long, help = "Trailer description")]
    pub trailer: Option<String>,
    #[arg(long, help = "Rig length, e.g. 39'")]
    pub length: Option<String>,
    #[arg(long, help = "Rig weight, e.g. ~14k lbs")]
    pub weight: Option<String>,
    #[arg(long, help = "Fuel economy while towing")]
    pub mpg: Option<f64>,

    // Preferences
    #[arg(long, help = "Skip membership campgrounds (Thousand Trails/Harvest Hosts)")]
    pub no_membership: bool,
    #[arg(long, help = "Do not suggest boondocking")]
    pub no_boondock: bool,
    #[arg(long, help = "Lunch stops need not fit the slide-outs")]
    pub no_slide_out: bool,
    #[arg(long, help = "No hotel nights")]
    pub no_luxury: bool,
    #[arg(long, help = "Homeschool topic: general, geology, history, wildlife, engineering, auto")]
    pub topic: Option<HomeschoolTopic>,

    #[arg(long, conflicts_with = "no_live_search", help = "Let the model search the web for live data")]
    pub live_search: bool,
    #[arg(long, help = "Disable live web search")]
    pub no_live_search: bool,
    #[arg(long, help = "File with the domain context paragraph")]
    pub context_file: Option<PathBuf>,
}

impl TripArgs {
    /// Form updates for every flag that was given
    pub fn updates(&self) -> Vec<FormUpdate> {
        let mut updates = Vec::new();

        if let Some(origin) = &self.origin {
            updates.push(FormUpdate::Origin(origin.clone()));
        }
        if let Some(destination) = &self.destination {
            updates.push(FormUpdate::Destination(destination.clone()));
        }
        if let Some(date) = self.date {
            updates.push(FormUpdate::DepartureDate(date));
        }
        if let Some(time) = self.time {
            updates.push(FormUpdate::DepartureTime(time));
        }
        if let Some(hours) = self.max_drive_hours {
            updates.push(FormUpdate::MaxDriveHours(hours));
        }
        if let Some(v) = &self.tow_vehicle {
            updates.push(FormUpdate::TowVehicle(v.clone()));
        }
        if let Some(v) = &self.trailer {
            updates.push(FormUpdate::Trailer(v.clone()));
        }
        if let Some(v) = &self.length {
            updates.push(FormUpdate::Length(v.clone()));
        }
        if let Some(v) = &self.weight {
            updates.push(FormUpdate::Weight(v.clone()));
        }
        if let Some(mpg) = self.mpg {
            updates.push(FormUpdate::Mpg(mpg));
        }
        if self.no_membership {
            updates.push(FormUpdate::Membership(false));
        }
        if self.no_boondock {
            updates.push(FormUpdate::Boondocking(false));
        }
        if self.no_slide_out {
            updates.push(FormUpdate::SlideOutDining(false));
        }
        if self.no_luxury {
            updates.push(FormUpdate::LuxuryBreak(false));
        }
        if let Some(topic) = self.topic {
            updates.push(FormUpdate::Topic(topic));
        }
        if self.live_search {
            updates.push(FormUpdate::LiveSearch(true));
        } else if self.no_live_search {
            updates.push(FormUpdate::LiveSearch(false));
        }

        updates
    }
}

// =============================================================================
// Credential
// =============================================================================

/// Look up the API key: config (which already includes `TRIPBRIEF_LLM__API_KEY`),
/// then the provider environment variables, then hidden terminal entry.
pub fn resolve_credential(config: &Config, interactive: bool) -> Result<Option<Credential>> {
    if let Some(credential) =
        credential_from_sources(config.llm.api_key.clone(), |var| std::env::var(var).ok())
    {
        return Ok(Some(credential));
    }

    let term = Term::stderr();
    if interactive && term.is_term() {
        term.write_str("Gemini API key (input hidden): ")?;
        let key = term.read_secure_line()?;
        return Ok(Credential::from_optional(Some(key)));
    }

    Ok(None)
}

fn credential_from_sources(
    configured: Option<String>,
    env: impl Fn(&str) -> Option<String>,
) -> Option<Credential> {
    if let Some(credential) = Credential::from_optional(configured) {
        debug!("Using API key from configuration");
        return Some(credential);
    }

    CREDENTIAL_ENV_VARS.iter().find_map(|var| {
        let credential = Credential::from_optional(env(var))?;
        debug!("Using API key from {}", var);
        Some(credential)
    })
}

// =============================================================================
// Static Context
// =============================================================================

/// Domain context for the prompt: context file, then configured text, then
/// the built-in paragraph
pub fn load_static_context(config: &Config, override_file: Option<&Path>) -> Result<String> {
    if let Some(path) = override_file.or(config.trip.context_file.as_deref()) {
        let content = fs::read_to_string(path).map_err(|e| {
            PlannerError::Config(format!(
                "Cannot read context file {}: {}",
                path.display(),
                e
            ))
        })?;
        return Ok(content.trim().to_string());
    }

    Ok(config
        .trip
        .static_context
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_STATIC_CONTEXT)
        .to_string())
}
