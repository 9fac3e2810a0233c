//! Layered configuration
//!
//! Later layers override earlier ones:
//! 1. compiled-in defaults
//! 2. `~/.config/tripbrief/config.toml`
//! 3. `.tripbrief/config.toml` in the working directory
//! 4. `TRIPBRIEF_*` environment variables (`__` separates sections)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use super::types::Config;
use crate::types::{PlannerError, Result};

/// Project data directory name
pub const PROJECT_DIR: &str = ".tripbrief";

const CONFIG_FILE: &str = "config.toml";

/// Which config file a command acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    Global,
    Project,
}

impl ConfigScope {
    pub fn from_flag(global: bool) -> Self {
        if global { Self::Global } else { Self::Project }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::Project => "Project",
        }
    }

    fn init_hint(self) -> &'static str {
        match self {
            Self::Global => "tripbrief config init --global",
            Self::Project => "tripbrief config init",
        }
    }

    /// Config file for this scope; `None` when no home directory is known
    pub fn path(self) -> Option<PathBuf> {
        match self {
            Self::Global => ConfigLoader::global_config_path(),
            Self::Project => Some(ConfigLoader::project_config_path()),
        }
    }

    fn require_path(self) -> Result<PathBuf> {
        self.path().ok_or_else(|| {
            PlannerError::Config(format!(
                "No {} config location (set HOME or XDG_CONFIG_HOME)",
                self.label().to_lowercase()
            ))
        })
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Merge every layer and validate the result
    pub fn load() -> Result<Config> {
        let mut figment = Self::base();

        for scope in [ConfigScope::Global, ConfigScope::Project] {
            if let Some(path) = scope.path().filter(|p| p.exists()) {
                debug!("{} config: {}", scope.label(), path.display());
                figment = figment.merge(Toml::file(&path));
            }
        }

        // TRIPBRIEF_LLM__API_KEY -> llm.api_key
        figment = figment.merge(Env::prefixed("TRIPBRIEF_").split("__").lowercase(true));

        Self::extract(figment)
    }

    /// Defaults overlaid with a single file, ignoring other layers
    pub fn load_from_file(path: &Path) -> Result<Config> {
        Self::extract(Self::base().merge(Toml::file(path)))
    }

    fn base() -> Figment {
        Figment::new().merge(Serialized::defaults(Config::default()))
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .map_err(|e| PlannerError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Locations
    // =========================================================================

    /// `$XDG_CONFIG_HOME/tripbrief`, falling back to `~/.config/tripbrief`
    pub fn global_dir() -> Option<PathBuf> {
        let base = match env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            Some(xdg) => PathBuf::from(xdg),
            None => PathBuf::from(env::var_os("HOME")?).join(".config"),
        };
        Some(base.join("tripbrief"))
    }

    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join(CONFIG_FILE))
    }

    pub fn project_config_path() -> PathBuf {
        Path::new(PROJECT_DIR).join(CONFIG_FILE)
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    pub fn show_path() {
        println!("Configuration files (✓ = present):");
        for scope in [ConfigScope::Global, ConfigScope::Project] {
            match scope.path() {
                Some(path) => {
                    let mark = if path.exists() { "✓" } else { "✗" };
                    println!("  {:<8} {} {}", format!("{}:", scope.label()), mark, path.display());
                }
                None => println!("  {:<8} unavailable", format!("{}:", scope.label())),
            }
        }
    }

    /// Print the merged configuration; `api_key` is skipped on serialization
    pub fn show_config(as_json: bool) -> Result<()> {
        let config = Self::load()?;

        let rendered = if as_json {
            serde_json::to_string_pretty(&config)?
        } else {
            toml::to_string_pretty(&config).map_err(|e| PlannerError::Config(e.to_string()))?
        };
        println!("{}", rendered);

        Ok(())
    }

    /// Contents of one config file with `llm.api_key` stripped
    pub fn redacted_file(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)?;
        let mut table: toml::Table = content.parse().map_err(|e: toml::de::Error| {
            PlannerError::Config(format!("Invalid TOML in {}: {}", path.display(), e))
        })?;

        let key_removed = match table.get_mut("llm") {
            Some(toml::Value::Table(llm)) => llm.remove("api_key").is_some(),
            _ => false,
        };

        let mut rendered =
            toml::to_string_pretty(&table).map_err(|e| PlannerError::Config(e.to_string()))?;
        if key_removed {
            rendered.push_str("\n# llm.api_key is set (hidden)\n");
        }
        Ok(rendered)
    }

    /// Open the scope's config file in `$EDITOR`
    pub fn edit_config(global: bool) -> Result<()> {
        let scope = ConfigScope::from_flag(global);
        let path = scope.require_path()?;

        if !path.exists() {
            println!("{} config not found at {}", scope.label(), path.display());
            println!("Create it with: {}", scope.init_hint());
            return Ok(());
        }

        let editor = Self::editor();
        let status = Command::new(&editor)
            .arg(&path)
            .status()
            .map_err(|e| PlannerError::Config(format!("Cannot start '{}': {}", editor, e)))?;

        if !status.success() {
            return Err(PlannerError::Config(format!(
                "'{}' exited with {}",
                editor, status
            )));
        }

        println!("Saved {}", path.display());
        Ok(())
    }

    fn editor() -> String {
        env::var("VISUAL")
            .or_else(|_| env::var("EDITOR"))
            .unwrap_or_else(|_| {
                let fallback = if cfg!(target_os = "windows") {
                    "notepad"
                } else if cfg!(target_os = "macos") {
                    "open"
                } else {
                    "vi"
                };
                fallback.to_string()
            })
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write the commented global template; returns its directory
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let path = ConfigScope::Global.require_path()?;
        Self::write_template(&path, &Self::default_global_config(), force)?;
        Ok(path.parent().map(Path::to_path_buf).unwrap_or_default())
    }

    pub fn init_project(force: bool) -> Result<PathBuf> {
        Self::init_project_at(Path::new("."), force)
    }

    /// Write the project template under `root`; returns the `.tripbrief` dir
    pub fn init_project_at(root: &Path, force: bool) -> Result<PathBuf> {
        let dir = root.join(PROJECT_DIR);
        Self::write_template(&dir.join(CONFIG_FILE), &Self::default_project_config(), force)?;
        Ok(dir)
    }

    fn write_template(path: &Path, content: &str, force: bool) -> Result<()> {
        if path.exists() && !force {
            info!("Keeping existing config: {}", path.display());
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        info!("Wrote config template: {}", path.display());
        Ok(())
    }

    // =========================================================================
    // Templates
    // =========================================================================

    fn default_global_config() -> String {
        r#"# TripBrief Global Configuration
# User-wide defaults. Project settings in .tripbrief/config.toml override these.
# The API key is read from GEMINI_API_KEY / GOOGLE_API_KEY or TRIPBRIEF_LLM__API_KEY.

version = "1.0"

[llm]
provider = "gemini"
timeout_secs = 300
stream = true
live_search = false

# Your rig
[vehicle]
tow_vehicle = "2023 RAM 2500 Rebel (Gas)"
trailer_name = "2026 Impression 318RL"
length = "39'"
weight = "~14k lbs"
mpg = 8.5
"#
        .to_string()
    }

    fn default_project_config() -> String {
        r#"# TripBrief Project Configuration
# Settings for trips planned from this directory.

version = "1.0"

[preferences]
membership = true
boondocking = true
slide_out_dining = true
luxury_break = true
homeschool_topic = "general"

[trip]
max_drive_hours = 6
departure_time = "09:00"

[output]
dir = "."
save = true
"#
        .to_string()
    }
}
