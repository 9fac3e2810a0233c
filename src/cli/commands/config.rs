//! Config Command
//!
//! Manage TripBrief configuration.
//!
//! Usage:
//!   tripbrief config show [-g] [-f json]
//!   tripbrief config path
//!   tripbrief config edit [-g]
//!   tripbrief config init [-g] [--force]

use crate::cli::ui::Output;
use crate::config::{ConfigLoader, ConfigScope};
use crate::types::Result;

/// Show configuration
pub fn show(global: bool, format: &str) -> Result<()> {
    if !global {
        // merged effective config; the API key is never printed
        return ConfigLoader::show_config(format == "json");
    }

    let output = Output::new();
    match ConfigScope::Global.path() {
        Some(global_path) if global_path.exists() => {
            let content = ConfigLoader::redacted_file(&global_path)?;
            println!("# Global Config: {}\n", global_path.display());
            println!("{}", content);
        }
        Some(_) => {
            output.info("No global config found.");
            output.info("Run 'tripbrief config init --global' to create one.");
        }
        None => output.warning("Cannot determine global config directory."),
    }
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Edit configuration file
pub fn edit(global: bool) -> Result<()> {
    ConfigLoader::edit_config(global)
}

/// Initialize global configuration
pub fn init_global(force: bool) -> Result<()> {
    let dir = ConfigLoader::init_global(force)?;
    let output = Output::new();
    output.success("Initialized global configuration");
    output.field("Directory", &dir.display().to_string());
    if let Some(config_path) = ConfigLoader::global_config_path() {
        output.field("Config", &config_path.display().to_string());
    }
    Ok(())
}

/// Initialize project configuration in the current directory
pub fn init_project(force: bool) -> Result<()> {
    let dir = ConfigLoader::init_project(force)?;
    let output = Output::new();
    output.success("Initialized project configuration");
    output.field("Directory", &dir.display().to_string());
    output.field(
        "Config",
        &ConfigLoader::project_config_path().display().to_string(),
    );
    Ok(())
}
