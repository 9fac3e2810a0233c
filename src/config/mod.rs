//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/tripbrief/config.toml)
//! 3. Project config (.tripbrief/config.toml)
//! 4. Environment variables (TRIPBRIEF_*)
//! 5. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::{ConfigLoader, ConfigScope, PROJECT_DIR};
pub use types::*;
