//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.studydungeon/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DungeonConfig {
    #[serde(default)]
    pub study: StudyConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StudyConfig {
    pub card_limit: Option<u32>,
    pub study_minutes: Option<u32>,
    pub deck_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UiConfig {
    pub border: Option<BorderStyle>,
    pub menu_wrap: Option<bool>,
}

/// Glyph set used for boxes and the screen border.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum BorderStyle {
    #[serde(rename = "plain")]
    #[default]
    Plain,
    #[serde(rename = "rounded")]
    Rounded,
    #[serde(rename = "double")]
    Double,
    #[serde(rename = "thick")]
    Thick,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_CARD_LIMIT: u32 = 15;
pub const DEFAULT_STUDY_MINUTES: u32 = 25;
pub const CARD_LIMIT_RANGE: (u32, u32) = (1, 100);
pub const STUDY_MINUTES_RANGE: (u32, u32) = (1, 60);
pub const DEFAULT_DECK_DIR: &str = "decks";

// ============================================================================
// Study Settings
// ============================================================================

/// Per-process study settings, adjusted from the Settings scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudySettings {
    card_limit: u32,
    study_minutes: u32,
    session_underway: bool,
}

impl Default for StudySettings {
    fn default() -> Self {
        Self::new(DEFAULT_CARD_LIMIT, DEFAULT_STUDY_MINUTES)
    }
}

impl StudySettings {
    /// Out-of-range values are clamped into range.
    pub fn new(card_limit: u32, study_minutes: u32) -> Self {
        Self {
            card_limit: card_limit.clamp(CARD_LIMIT_RANGE.0, CARD_LIMIT_RANGE.1),
            study_minutes: study_minutes.clamp(STUDY_MINUTES_RANGE.0, STUDY_MINUTES_RANGE.1),
            session_underway: false,
        }
    }

    pub fn card_limit(&self) -> u32 {
        self.card_limit
    }

    pub fn study_minutes(&self) -> u32 {
        self.study_minutes
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(u64::from(self.study_minutes) * 60)
    }

    pub fn increase_card_limit(&mut self) {
        self.card_limit = (self.card_limit + 1).min(CARD_LIMIT_RANGE.1);
    }

    pub fn decrease_card_limit(&mut self) {
        self.card_limit = self.card_limit.saturating_sub(1).max(CARD_LIMIT_RANGE.0);
    }

    pub fn increase_minutes(&mut self) {
        self.study_minutes = (self.study_minutes + 1).min(STUDY_MINUTES_RANGE.1);
    }

    pub fn decrease_minutes(&mut self) {
        self.study_minutes = self.study_minutes.saturating_sub(1).max(STUDY_MINUTES_RANGE.0);
    }

    pub fn reset(&mut self) {
        self.card_limit = DEFAULT_CARD_LIMIT;
        self.study_minutes = DEFAULT_STUDY_MINUTES;
    }

    /// Marks a study session as started and returns its start time.
    pub fn begin_session(&mut self) -> Instant {
        self.session_underway = true;
        Instant::now()
    }

    pub fn end_session(&mut self) {
        self.session_underway = false;
    }

    pub fn session_underway(&self) -> bool {
        self.session_underway
    }
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub settings: StudySettings,
    pub deck_dir: PathBuf,
    pub border: BorderStyle,
    pub menu_wrap: bool,
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

/// Returns the path to `~/.studydungeon/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".studydungeon").join("config.toml"))
}

/// Load config from `explicit` if given, else `~/.studydungeon/config.toml`.
///
/// If the default file doesn't exist, generates a commented-out default and
/// returns `DungeonConfig::default()`. An explicit path that doesn't exist is
/// an I/O error. A malformed file returns `ConfigError::Parse`.
pub fn load_config(explicit: Option<&Path>) -> Result<DungeonConfig, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(DungeonConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(DungeonConfig::default());
    }

    read_config(&path)
}

fn read_config(path: &Path) -> Result<DungeonConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: DungeonConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Study Dungeon Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [study]
# card_limit = 15                    # Cards per session, 1..=100
# study_minutes = 25                 # Session time limit, 1..=60
# deck_dir = "decks"                 # Or set STUDYDUNGEON_DECK_DIR env var

# [ui]
# border = "plain"                   # "plain", "rounded", "double", "thick"
# menu_wrap = true                   # Wrap selection at the ends of menus
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_deck_dir` is from the `--deck-dir` flag (None = not specified).
pub fn resolve(config: &DungeonConfig, cli_deck_dir: Option<&Path>) -> ResolvedConfig {
    let env_deck_dir = std::env::var("STUDYDUNGEON_DECK_DIR").ok();
    resolve_with_env(config, cli_deck_dir, env_deck_dir.as_deref())
}

fn resolve_with_env(config: &DungeonConfig, cli_deck_dir: Option<&Path>, env_deck_dir: Option<&str>) -> ResolvedConfig {
    // Deck dir: CLI → env → config → default
    let deck_dir = cli_deck_dir
        .map(Path::to_path_buf)
        .or_else(|| env_deck_dir.map(PathBuf::from))
        .or_else(|| config.study.deck_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DECK_DIR));

    let card_limit = config.study.card_limit.unwrap_or(DEFAULT_CARD_LIMIT);
    let study_minutes = config.study.study_minutes.unwrap_or(DEFAULT_STUDY_MINUTES);
    let settings = StudySettings::new(card_limit, study_minutes);
    if settings.card_limit() != card_limit || settings.study_minutes() != study_minutes {
        warn!(
            "Study settings out of range (card_limit={}, study_minutes={}), clamped to {}/{}",
            card_limit,
            study_minutes,
            settings.card_limit(),
            settings.study_minutes()
        );
    }

    ResolvedConfig {
        settings,
        deck_dir,
        border: config.ui.border.unwrap_or_default(),
        menu_wrap: config.ui.menu_wrap.unwrap_or(true),
    }
}
