//! Form State
//!
//! Session-scoped state behind the trip form. Field edits are expressed as
//! [`FormUpdate`] values folded in by the pure [`reduce`] function; the state
//! is passed explicitly to whatever needs it.

use chrono::{Days, NaiveDate, NaiveTime};

use super::{HomeschoolTopic, PreferenceSet, TripInputs, VehicleProfile};
use crate::config::Config;
use crate::constants::trip::{DEFAULT_DRIVE_HOURS, MAX_DRIVE_HOURS, MIN_DRIVE_HOURS};
use crate::types::{Credential, ModelId, ValidationError};

/// Current values of every form field
#[derive(Debug, Clone)]
pub struct FormState {
    pub credential: Option<Credential>,
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub max_drive_hours: u8,
    pub vehicle: VehicleProfile,
    pub preferences: PreferenceSet,
    /// Explicitly requested model; `None` lets the catalog pick
    pub model: Option<ModelId>,
    pub live_search: bool,
    pub stream: bool,
}

/// A single field edit
#[derive(Debug, Clone)]
pub enum FormUpdate {
    Credential(Option<Credential>),
    Origin(String),
    Destination(String),
    DepartureDate(NaiveDate),
    DepartureTime(NaiveTime),
    MaxDriveHours(u8),
    TowVehicle(String),
    Trailer(String),
    Length(String),
    Weight(String),
    Mpg(f64),
    Membership(bool),
    Boondocking(bool),
    SlideOutDining(bool),
    LuxuryBreak(bool),
    Topic(HomeschoolTopic),
    Model(Option<ModelId>),
    LiveSearch(bool),
    Streaming(bool),
}

impl FormState {
    /// Fresh form: departure tomorrow at 09:00, pre-seeded rig defaults
    pub fn new(today: NaiveDate) -> Self {
        Self {
            credential: None,
            origin: String::new(),
            destination: String::new(),
            departure_date: tomorrow(today),
            departure_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            max_drive_hours: DEFAULT_DRIVE_HOURS,
            vehicle: VehicleProfile::default(),
            preferences: PreferenceSet::default(),
            model: None,
            live_search: false,
            stream: true,
        }
    }

    /// Form seeded from configuration defaults
    pub fn from_config(config: &Config, today: NaiveDate) -> Self {
        let departure_time = NaiveTime::parse_from_str(&config.trip.departure_time, "%H:%M")
            .unwrap_or_else(|_| Self::new(today).departure_time);

        Self {
            credential: Credential::from_optional(config.llm.api_key.clone()),
            departure_time,
            max_drive_hours: clamp_drive_hours(config.trip.max_drive_hours),
            vehicle: config.vehicle.clone(),
            preferences: config.preferences.clone(),
            live_search: config.llm.live_search,
            stream: config.llm.stream,
            ..Self::new(today)
        }
    }

    /// Fold a batch of updates into the state
    pub fn apply(self, updates: impl IntoIterator<Item = FormUpdate>) -> Self {
        updates.into_iter().fold(self, reduce)
    }

    /// Capture the trip fields as an immutable snapshot.
    ///
    /// Checks presence of the route endpoints and vehicle fields, and the
    /// numeric ranges. The credential is not required here.
    pub fn snapshot(&self) -> Result<TripInputs, ValidationError> {
        let origin = required("origin", &self.origin, "Enter a departure location")?;
        let destination = required("destination", &self.destination, "Enter a destination")?;

        let vehicle = VehicleProfile {
            tow_vehicle: required("tow_vehicle", &self.vehicle.tow_vehicle, "Describe the tow vehicle")?,
            trailer_name: required("trailer", &self.vehicle.trailer_name, "Describe the trailer")?,
            length: required("length", &self.vehicle.length, "Enter the rig length")?,
            weight: required("weight", &self.vehicle.weight, "Enter the rig weight")?,
            mpg: self.vehicle.mpg,
        };

        if !vehicle.mpg.is_finite() || vehicle.mpg <= 0.0 {
            return Err(ValidationError::out_of_range(
                "mpg",
                format!("Fuel economy must be greater than 0 (got {})", vehicle.mpg),
            ));
        }

        if !(MIN_DRIVE_HOURS..=MAX_DRIVE_HOURS).contains(&self.max_drive_hours) {
            return Err(ValidationError::out_of_range(
                "max_drive_hours",
                format!(
                    "Driving hours per day must be between {} and {} (got {})",
                    MIN_DRIVE_HOURS, MAX_DRIVE_HOURS, self.max_drive_hours
                ),
            ));
        }

        Ok(TripInputs::new(
            origin,
            destination,
            self.departure_date.and_time(self.departure_time),
            self.max_drive_hours,
            vehicle,
            self.preferences.clone(),
        ))
    }

    /// Submit-time checks: credential first, then the trip snapshot
    pub fn validate_submission(&self) -> Result<(Credential, TripInputs), ValidationError> {
        let credential = self
            .credential
            .clone()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                ValidationError::missing(
                    "api_key",
                    "API key missing. Set GEMINI_API_KEY or llm.api_key in the config",
                )
            })?;

        Ok((credential, self.snapshot()?))
    }
}

/// Apply one update. Pure: the input state is consumed and a new one returned.
pub fn reduce(state: FormState, update: FormUpdate) -> FormState {
    let mut next = state;
    match update {
        FormUpdate::Credential(credential) => next.credential = credential,
        FormUpdate::Origin(origin) => next.origin = origin,
        FormUpdate::Destination(destination) => next.destination = destination,
        FormUpdate::DepartureDate(date) => next.departure_date = date,
        FormUpdate::DepartureTime(time) => next.departure_time = time,
        FormUpdate::MaxDriveHours(hours) => next.max_drive_hours = clamp_drive_hours(hours),
        FormUpdate::TowVehicle(v) => next.vehicle.tow_vehicle = v,
        FormUpdate::Trailer(v) => next.vehicle.trailer_name = v,
        FormUpdate::Length(v) => next.vehicle.length = v,
        FormUpdate::Weight(v) => next.vehicle.weight = v,
        FormUpdate::Mpg(mpg) => next.vehicle.mpg = mpg,
        FormUpdate::Membership(on) => next.preferences.membership = on,
        FormUpdate::Boondocking(on) => next.preferences.boondocking = on,
        FormUpdate::SlideOutDining(on) => next.preferences.slide_out_dining = on,
        FormUpdate::LuxuryBreak(on) => next.preferences.luxury_break = on,
        FormUpdate::Topic(topic) => next.preferences.homeschool_topic = topic,
        FormUpdate::Model(model) => next.model = model,
        FormUpdate::LiveSearch(on) => next.live_search = on,
        FormUpdate::Streaming(on) => next.stream = on,
    }
    next
}

fn clamp_drive_hours(hours: u8) -> u8 {
    hours.clamp(MIN_DRIVE_HOURS, MAX_DRIVE_HOURS)
}

fn tomorrow(today: NaiveDate) -> NaiveDate {
    today.checked_add_days(Days::new(1)).unwrap_or(today)
}

fn required(field: &str, value: &str, message: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::missing(field, message))
    } else {
        Ok(trimmed.to_string())
    }
}
