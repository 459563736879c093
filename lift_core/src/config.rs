//! Configuration file support for Lift.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/lift/config.toml`.

use crate::{Error, Preferences, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Trailing window of history handed to the planner (about six months)
pub const HISTORY_LOOKBACK_DAYS: i64 = 183;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_history_lookback_days")]
    pub history_lookback_days: i64,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub progression: ProgressionConfig,

    #[serde(default)]
    pub preferences: Preferences,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_lookback_days: default_history_lookback_days(),
            data: DataConfig::default(),
            selection: SelectionConfig::default(),
            progression: ProgressionConfig::default(),
            preferences: Preferences::default(),
        }
    }
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Exercise selection parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "default_continuity_ratio")]
    pub continuity_ratio: f64,

    #[serde(default = "default_compound_min_primary")]
    pub compound_min_primary: usize,

    #[serde(default = "default_recent_window_days")]
    pub recent_window_days: i64,

    #[serde(default = "default_full_body_count")]
    pub full_body_count: usize,

    #[serde(default = "default_split_count")]
    pub split_count: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            continuity_ratio: default_continuity_ratio(),
            compound_min_primary: default_compound_min_primary(),
            recent_window_days: default_recent_window_days(),
            full_body_count: default_full_body_count(),
            split_count: default_split_count(),
        }
    }
}

/// Progression parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressionConfig {
    #[serde(default = "default_sets")]
    pub default_sets: usize,

    #[serde(default = "default_reps")]
    pub default_reps: u32,

    #[serde(default = "default_beginner_days")]
    pub beginner_days: i64,

    #[serde(default = "default_weight_increment_kg")]
    pub weight_increment_kg: f64,

    #[serde(default = "default_too_easy_increment_kg")]
    pub too_easy_increment_kg: f64,

    #[serde(default = "default_too_easy_rep_bump")]
    pub too_easy_rep_bump: u32,

    #[serde(default = "default_failure_reduction")]
    pub failure_reduction: f64,

    #[serde(default = "default_bodyweight_rep_step")]
    pub bodyweight_rep_step: u32,

    #[serde(default = "default_bodyweight_rep_ceiling")]
    pub bodyweight_rep_ceiling: u32,

    #[serde(default = "default_bodyweight_set_ceiling")]
    pub bodyweight_set_ceiling: usize,

    #[serde(default = "default_bodyweight_rep_floor")]
    pub bodyweight_rep_floor: u32,

    #[serde(default = "default_bodyweight_set_floor")]
    pub bodyweight_set_floor: usize,

    #[serde(default = "default_bodyweight_restart_reps")]
    pub bodyweight_restart_reps: u32,

    #[serde(default = "default_phase_streak")]
    pub phase_streak: usize,

    #[serde(default = "default_max_sets_before_drop")]
    pub max_sets_before_drop: usize,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            default_sets: default_sets(),
            default_reps: default_reps(),
            beginner_days: default_beginner_days(),
            weight_increment_kg: default_weight_increment_kg(),
            too_easy_increment_kg: default_too_easy_increment_kg(),
            too_easy_rep_bump: default_too_easy_rep_bump(),
            failure_reduction: default_failure_reduction(),
            bodyweight_rep_step: default_bodyweight_rep_step(),
            bodyweight_rep_ceiling: default_bodyweight_rep_ceiling(),
            bodyweight_set_ceiling: default_bodyweight_set_ceiling(),
            bodyweight_rep_floor: default_bodyweight_rep_floor(),
            bodyweight_set_floor: default_bodyweight_set_floor(),
            bodyweight_restart_reps: default_bodyweight_restart_reps(),
            phase_streak: default_phase_streak(),
            max_sets_before_drop: default_max_sets_before_drop(),
        }
    }
}

// Default value functions
fn default_history_lookback_days() -> i64 {
    HISTORY_LOOKBACK_DAYS
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        dirs::home_dir()
            .map(|home| home.join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("lift")
}

fn default_continuity_ratio() -> f64 {
    crate::selection::CONTINUITY_RATIO
}

fn default_compound_min_primary() -> usize {
    crate::selection::COMPOUND_MIN_PRIMARY
}

fn default_recent_window_days() -> i64 {
    crate::selection::RECENT_WINDOW_DAYS
}

fn default_full_body_count() -> usize {
    crate::selection::FULL_BODY_COUNT
}

fn default_split_count() -> usize {
    crate::selection::SPLIT_COUNT
}

fn default_sets() -> usize {
    crate::progression::DEFAULT_SETS
}

fn default_reps() -> u32 {
    crate::progression::DEFAULT_REPS
}

fn default_beginner_days() -> i64 {
    crate::progression::BEGINNER_DAYS
}

fn default_weight_increment_kg() -> f64 {
    crate::progression::WEIGHT_INCREMENT_KG
}

fn default_too_easy_increment_kg() -> f64 {
    crate::progression::TOO_EASY_INCREMENT_KG
}

fn default_too_easy_rep_bump() -> u32 {
    crate::progression::TOO_EASY_REP_BUMP
}

fn default_failure_reduction() -> f64 {
    crate::progression::FAILURE_REDUCTION
}

fn default_bodyweight_rep_step() -> u32 {
    crate::progression::BODYWEIGHT_REP_STEP
}

fn default_bodyweight_rep_ceiling() -> u32 {
    crate::progression::BODYWEIGHT_REP_CEILING
}

fn default_bodyweight_set_ceiling() -> usize {
    crate::progression::BODYWEIGHT_SET_CEILING
}

fn default_bodyweight_rep_floor() -> u32 {
    crate::progression::BODYWEIGHT_REP_FLOOR
}

fn default_bodyweight_set_floor() -> usize {
    crate::progression::BODYWEIGHT_SET_FLOOR
}

fn default_bodyweight_restart_reps() -> u32 {
    crate::progression::BODYWEIGHT_RESTART_REPS
}

fn default_phase_streak() -> usize {
    crate::progression::PHASE_STREAK
}

fn default_max_sets_before_drop() -> usize {
    crate::progression::MAX_SETS_BEFORE_DROP
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject values the planner cannot work with
    pub fn validate(&self) -> Result<()> {
        let selection = &self.selection;
        if !(0.0..=1.0).contains(&selection.continuity_ratio) {
            return Err(Error::Config(format!(
                "continuity_ratio must be within 0..=1, got {}",
                selection.continuity_ratio
            )));
        }
        if selection.full_body_count == 0 || selection.split_count == 0 {
            return Err(Error::Config("session sizes must be positive".into()));
        }

        let progression = &self.progression;
        if progression.default_sets == 0 || progression.default_reps == 0 {
            return Err(Error::Config("default sets and reps must be positive".into()));
        }
        if !(0.0..1.0).contains(&progression.failure_reduction) {
            return Err(Error::Config(format!(
                "failure_reduction must be within 0..1, got {}",
                progression.failure_reduction
            )));
        }
        if progression.bodyweight_rep_floor > progression.bodyweight_rep_ceiling
            || progression.bodyweight_set_floor > progression.bodyweight_set_ceiling
        {
            return Err(Error::Config("bodyweight floors exceed ceilings".into()));
        }
        if progression.bodyweight_set_floor == 0 {
            return Err(Error::Config("bodyweight_set_floor must be positive".into()));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|home| home.join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("lift").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
