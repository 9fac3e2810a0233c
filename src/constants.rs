//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Model catalog constants
pub mod catalog {
    /// Built-in identifiers used when live discovery fails or yields nothing
    pub const FALLBACK_MODELS: [&str; 2] = ["gemini-3-flash-preview", "gemini-2.5-flash"];

    /// Capability a model must advertise to be offered for generation
    pub const GENERATE_METHOD: &str = "generateContent";

    /// Name prefix used only when the provider omits the capability list
    pub const NAME_HEURISTIC_PREFIX: &str = "gemini";

    /// Listing page size
    pub const PAGE_SIZE: u32 = 1000;

    /// Maximum pages followed through `nextPageToken`
    pub const MAX_PAGES: usize = 5;
}

/// Trip form constants
pub mod trip {
    /// Allowed driving hours per day
    pub const MIN_DRIVE_HOURS: u8 = 2;
    pub const MAX_DRIVE_HOURS: u8 = 12;
    pub const DEFAULT_DRIVE_HOURS: u8 = 6;

    /// Default departure time (24h)
    pub const DEFAULT_DEPARTURE_TIME: &str = "09:00";

    /// Vehicle defaults pre-seeded into the form
    pub mod vehicle {
        pub const TOW_VEHICLE: &str = "2023 RAM 2500 Rebel (Gas)";
        pub const TRAILER: &str = "2026 Impression 318RL";
        pub const LENGTH: &str = "39'";
        pub const WEIGHT: &str = "~14k lbs";
        pub const MPG: f64 = 8.5;
    }
}

/// Prompt template constants
pub mod prompt {
    /// Canonical output-structure template version
    pub const TEMPLATE_VERSION: &str = "v12";

    /// Ranked options requested for every stop category
    pub const OPTIONS_PER_STOP: usize = 2;
}

/// Output artifact constants
pub mod output {
    /// Download filename prefix
    pub const FILENAME_PREFIX: &str = "Trip_Plan";

    /// Replacement for spaces in the destination part of the filename
    pub const SPACE_SEPARATOR: char = '_';

    /// Artifact MIME type
    pub const MIME_TYPE: &str = "text/markdown";

    /// Transient marker shown while the response is streaming
    pub const IN_PROGRESS_MARKER: &str = "▌";
}

/// HTTP/Network constants
pub mod network {
    /// Default Gemini REST endpoint
    pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 30;

    /// Timeout for the catalog listing (seconds)
    pub const CATALOG_TIMEOUT_SECS: u64 = 15;
}

/// Environment variables consulted for the API key, in order
pub const CREDENTIAL_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];
