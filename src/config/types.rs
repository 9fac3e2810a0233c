//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/tripbrief/) and project (.tripbrief/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::network::DEFAULT_TIMEOUT_SECS;
use crate::constants::trip::{
    DEFAULT_DEPARTURE_TIME, DEFAULT_DRIVE_HOURS, MAX_DRIVE_HOURS, MIN_DRIVE_HOURS,
};
use crate::trip::{PreferenceSet, VehicleProfile};
use crate::types::{PlannerError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Rig defaults pre-seeded into the form
    pub vehicle: VehicleProfile,

    /// Preference defaults pre-seeded into the form
    pub preferences: PreferenceSet,

    /// Trip defaults and prompt context
    pub trip: TripConfig,

    /// Briefing download settings
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            vehicle: VehicleProfile::default(),
            preferences: PreferenceSet::default(),
            trip: TripConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `PlannerError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if let Some(temperature) = self.llm.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(PlannerError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(PlannerError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.provider != "gemini" {
            return Err(PlannerError::Config(format!(
                "Unknown provider: {}. Supported: gemini",
                self.llm.provider
            )));
        }

        if !(MIN_DRIVE_HOURS..=MAX_DRIVE_HOURS).contains(&self.trip.max_drive_hours) {
            return Err(PlannerError::Config(format!(
                "trip.max_drive_hours must be between {} and {}, got {}",
                MIN_DRIVE_HOURS, MAX_DRIVE_HOURS, self.trip.max_drive_hours
            )));
        }

        if chrono::NaiveTime::parse_from_str(&self.trip.departure_time, "%H:%M").is_err() {
            return Err(PlannerError::Config(format!(
                "trip.departure_time must be HH:MM, got '{}'",
                self.trip.departure_time
            )));
        }

        if self.vehicle.mpg.is_nan() || self.vehicle.mpg <= 0.0 {
            return Err(PlannerError::Config(format!(
                "vehicle.mpg must be greater than 0, got {}",
                self.vehicle.mpg
            )));
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name
    pub provider: String,

    /// Preferred model identifier; unset lets the catalog pick
    pub model: Option<String>,

    /// API base URL (for proxies or tests)
    pub api_base: Option<String>,

    /// Single-shot deadline and streaming idle timeout, in seconds
    pub timeout_secs: u64,

    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,

    /// Stream the briefing as it is generated
    pub stream: bool,

    /// Attach the web search tool so the model can look up live data
    pub live_search: bool,

    /// API key. Never serialized to output.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("stream", &self.stream)
            .field("live_search", &self.live_search)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: None,
            api_base: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: None,
            stream: true,
            live_search: false,
            api_key: None,
        }
    }
}

// =============================================================================
// Trip Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TripConfig {
    /// Default driving hours per day (2-12)
    pub max_drive_hours: u8,

    /// Default departure time, 24h `HH:MM`
    pub departure_time: String,

    /// Domain context paragraph included in every prompt
    pub static_context: Option<String>,

    /// File holding the domain context (wins over `static_context`)
    pub context_file: Option<PathBuf>,
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            max_drive_hours: DEFAULT_DRIVE_HOURS,
            departure_time: DEFAULT_DEPARTURE_TIME.to_string(),
            static_context: None,
            context_file: None,
        }
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the briefing file is written to
    pub dir: PathBuf,

    /// Save the briefing after a successful run
    pub save: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            save: true,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
