//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.burrow/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::selector::{DEFAULT_MAX_VISIBLE_ROWS, HighlightStyle};
use super::terminal::Color;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BurrowConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub browse: BrowseConfig,
    #[serde(default)]
    pub inspect: InspectConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub max_visible_rows: Option<u16>,
    pub highlight_foreground: Option<Color>,
    pub highlight_background: Option<Color>,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BrowseConfig {
    pub file_pattern: Option<String>,
    pub max_visible_rows: Option<u16>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InspectConfig {
    pub max_depth: Option<usize>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BROWSE_MAX_VISIBLE_ROWS: u16 = 200;
pub const DEFAULT_FILE_PATTERN: &str = "*";
pub const DEFAULT_MAX_DEPTH: usize = 64;
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Window height for flat selection and the inspector.
    pub max_visible_rows: u16,
    /// Window height for the filesystem browser.
    pub browse_max_visible_rows: u16,
    pub highlight: HighlightStyle,
    pub file_pattern: String,
    pub max_depth: usize,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub max_rows: Option<u16>,
    pub pattern: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.burrow`, where config and logs live.
pub fn burrow_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".burrow"))
}

/// Returns the path to `~/.burrow/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    burrow_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.burrow/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `BurrowConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<BurrowConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(BurrowConfig::default())
        }
    }
}

pub fn load_config_from(path: &Path) -> Result<BurrowConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(BurrowConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: BurrowConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Burrow Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# max_visible_rows = 100             # Or set BURROW_MAX_ROWS env var
# highlight_foreground = "black"     # black, white, grey, darkgrey, red, green,
# highlight_background = "white"     # yellow, blue, magenta, cyan
# log_level = "debug"                # Or set BURROW_LOG env var
# log_file = "/tmp/burrow.log"       # Defaults to ~/.burrow/burrow.log

# [browse]
# file_pattern = "*"                 # Or set BURROW_PATTERN env var
# max_visible_rows = 200

# [inspect]
# max_depth = 64
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &BurrowConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// [`resolve`] with an explicit environment lookup.
pub fn resolve_with_env(
    config: &BurrowConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let env_rows = env("BURROW_MAX_ROWS").and_then(|v| match v.trim().parse::<u16>() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!("Ignoring BURROW_MAX_ROWS={v:?}: {e}");
            None
        }
    });

    // Rows: CLI → env → config → default. A zero window is never valid.
    let max_visible_rows = cli
        .max_rows
        .or(env_rows)
        .or(config.general.max_visible_rows)
        .unwrap_or(DEFAULT_MAX_VISIBLE_ROWS)
        .max(1);

    let browse_max_visible_rows = cli
        .max_rows
        .or(env_rows)
        .or(config.browse.max_visible_rows)
        .unwrap_or(DEFAULT_BROWSE_MAX_VISIBLE_ROWS)
        .max(1);

    // Pattern: CLI → env → config → default
    let file_pattern = cli
        .pattern
        .clone()
        .or_else(|| env("BURROW_PATTERN"))
        .or_else(|| config.browse.file_pattern.clone())
        .unwrap_or_else(|| DEFAULT_FILE_PATTERN.to_string());

    let defaults = HighlightStyle::default();
    let highlight = HighlightStyle {
        foreground: config.general.highlight_foreground.unwrap_or(defaults.foreground),
        background: config.general.highlight_background.unwrap_or(defaults.background),
    };

    // Log level: env → config → default
    let log_level = env("BURROW_LOG")
        .or_else(|| config.general.log_level.clone())
        .map(|level| {
            level.parse::<LevelFilter>().unwrap_or_else(|_| {
                warn!("Unknown log level {level:?}, using {DEFAULT_LOG_LEVEL}");
                DEFAULT_LOG_LEVEL
            })
        })
        .unwrap_or(DEFAULT_LOG_LEVEL);

    let log_file = config
        .general
        .log_file
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| burrow_dir().map(|d| d.join("burrow.log")));

    ResolvedConfig {
        max_visible_rows,
        browse_max_visible_rows,
        highlight,
        file_pattern,
        max_depth: config.inspect.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
        log_level,
        log_file,
    }
}
