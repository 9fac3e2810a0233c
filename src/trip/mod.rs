//! Trip Input Model
//!
//! The immutable snapshot of everything the user supplied for one briefing
//! request, plus the vehicle and preference records it is assembled from.
//!
//! ## Modules
//!
//! - `form`: session-scoped form state with pure reducer updates

pub mod form;

pub use form::{FormState, FormUpdate, reduce};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::trip::vehicle;

// =============================================================================
// Vehicle Profile
// =============================================================================

/// Tow vehicle and trailer description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleProfile {
    pub tow_vehicle: String,
    pub trailer_name: String,
    /// Free-form length, e.g. `39'`
    pub length: String,
    /// Free-form weight, e.g. `~14k lbs`
    pub weight: String,
    /// Estimated fuel economy while towing
    pub mpg: f64,
}

impl Default for VehicleProfile {
    fn default() -> Self {
        Self {
            tow_vehicle: vehicle::TOW_VEHICLE.to_string(),
            trailer_name: vehicle::TRAILER.to_string(),
            length: vehicle::LENGTH.to_string(),
            weight: vehicle::WEIGHT.to_string(),
            mpg: vehicle::MPG,
        }
    }
}

impl VehicleProfile {
    /// Fuel type inferred from the tow vehicle description
    pub fn fuel_type(&self) -> FuelType {
        FuelType::infer(&self.tow_vehicle)
    }
}

/// Fuel type of the tow vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelType {
    Diesel,
    Gas,
}

impl FuelType {
    /// Textual heuristic: any mention of "diesel" means diesel, anything
    /// else is treated as gas. Unlisted diesel models are misclassified.
    pub fn infer(tow_vehicle: &str) -> Self {
        if tow_vehicle.to_lowercase().contains("diesel") {
            FuelType::Diesel
        } else {
            FuelType::Gas
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelType::Diesel => write!(f, "Diesel"),
            FuelType::Gas => write!(f, "Gas"),
        }
    }
}

// =============================================================================
// Preferences
// =============================================================================

/// Homeschool focus for the leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HomeschoolTopic {
    #[default]
    #[serde(rename = "general")]
    GeneralKnowledge,
    Geology,
    #[serde(rename = "history")]
    AmericanHistory,
    #[serde(rename = "wildlife")]
    WildlifeBiology,
    Engineering,
    /// Let the model pick a topic from the route
    Auto,
}

impl HomeschoolTopic {
    pub const ALL: [HomeschoolTopic; 6] = [
        HomeschoolTopic::GeneralKnowledge,
        HomeschoolTopic::Geology,
        HomeschoolTopic::AmericanHistory,
        HomeschoolTopic::WildlifeBiology,
        HomeschoolTopic::Engineering,
        HomeschoolTopic::Auto,
    ];

    /// Human-readable label used in the prompt
    pub fn label(&self) -> &'static str {
        match self {
            HomeschoolTopic::GeneralKnowledge => "General Knowledge",
            HomeschoolTopic::Geology => "Geology & Earth Science",
            HomeschoolTopic::AmericanHistory => "American History",
            HomeschoolTopic::WildlifeBiology => "Wildlife Biology",
            HomeschoolTopic::Engineering => "Engineering/Infrastructure",
            HomeschoolTopic::Auto => "auto",
        }
    }

    /// CLI slug
    pub fn slug(&self) -> &'static str {
        match self {
            HomeschoolTopic::GeneralKnowledge => "general",
            HomeschoolTopic::Geology => "geology",
            HomeschoolTopic::AmericanHistory => "history",
            HomeschoolTopic::WildlifeBiology => "wildlife",
            HomeschoolTopic::Engineering => "engineering",
            HomeschoolTopic::Auto => "auto",
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, HomeschoolTopic::Auto)
    }
}

impl fmt::Display for HomeschoolTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for HomeschoolTopic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        HomeschoolTopic::ALL
            .into_iter()
            .find(|t| t.slug() == lower || t.label().to_lowercase() == lower)
            .ok_or_else(|| {
                format!(
                    "Unknown homeschool topic: {}. Valid values: general, geology, history, wildlife, engineering, auto",
                    s
                )
            })
    }
}

/// Accommodation, dining and topic preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceSet {
    /// Prefer membership campgrounds (Thousand Trails / Harvest Hosts)
    pub membership: bool,
    /// Dispersed camping without hookups is acceptable
    pub boondocking: bool,
    /// Lunch stops must have room to run the slide-outs
    pub slide_out_dining: bool,
    /// A hotel night (Marriott / Amex points) is acceptable
    pub luxury_break: bool,
    pub homeschool_topic: HomeschoolTopic,
}

impl Default for PreferenceSet {
    fn default() -> Self {
        Self {
            membership: true,
            boondocking: true,
            slide_out_dining: true,
            luxury_break: true,
            homeschool_topic: HomeschoolTopic::default(),
        }
    }
}

// =============================================================================
// Trip Inputs
// =============================================================================

/// Immutable record of one briefing request
///
/// Built only through [`FormState::snapshot`], which performs the submit-time
/// checks; owned by the request that created it and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct TripInputs {
    origin: String,
    destination: String,
    departure: NaiveDateTime,
    max_drive_hours: u8,
    vehicle: VehicleProfile,
    preferences: PreferenceSet,
}

impl TripInputs {
    pub(crate) fn new(
        origin: String,
        destination: String,
        departure: NaiveDateTime,
        max_drive_hours: u8,
        vehicle: VehicleProfile,
        preferences: PreferenceSet,
    ) -> Self {
        Self {
            origin,
            destination,
            departure,
            max_drive_hours,
            vehicle,
            preferences,
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn departure_date(&self) -> NaiveDate {
        self.departure.date()
    }

    pub fn departure_time(&self) -> NaiveTime {
        self.departure.time()
    }

    pub fn max_drive_hours(&self) -> u8 {
        self.max_drive_hours
    }

    pub fn vehicle(&self) -> &VehicleProfile {
        &self.vehicle
    }

    pub fn preferences(&self) -> &PreferenceSet {
        &self.preferences
    }

    pub fn homeschool_topic(&self) -> HomeschoolTopic {
        self.preferences.homeschool_topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuel_type_inference() {
        assert_eq!(FuelType::infer("2023 RAM 2500 Rebel (Gas)"), FuelType::Gas);
        assert_eq!(FuelType::infer("2022 F-250 Diesel"), FuelType::Diesel);
        assert_eq!(FuelType::infer("Silverado 3500 DIESEL dually"), FuelType::Diesel);
        assert_eq!(FuelType::infer("Power Stroke 6.7"), FuelType::Gas);
        assert_eq!(FuelType::Diesel.to_string(), "Diesel");
    }

    #[test]
    fn test_topic_parsing() {
        assert_eq!("geology".parse::<HomeschoolTopic>().unwrap(), HomeschoolTopic::Geology);
        assert_eq!(
            "American History".parse::<HomeschoolTopic>().unwrap(),
            HomeschoolTopic::AmericanHistory
        );
        assert_eq!("AUTO".parse::<HomeschoolTopic>().unwrap(), HomeschoolTopic::Auto);
        assert!("astronomy".parse::<HomeschoolTopic>().is_err());
    }

    #[test]
    fn test_vehicle_defaults() {
        let vehicle = VehicleProfile::default();
        assert_eq!(vehicle.tow_vehicle, "2023 RAM 2500 Rebel (Gas)");
        assert_eq!(vehicle.fuel_type(), FuelType::Gas);
        assert!(vehicle.mpg > 0.0);
    }

    #[test]
    fn test_preference_defaults_allow_everything() {
        let prefs = PreferenceSet::default();
        assert!(prefs.membership && prefs.boondocking && prefs.slide_out_dining && prefs.luxury_break);
        assert_eq!(prefs.homeschool_topic, HomeschoolTopic::GeneralKnowledge);
    }
}
