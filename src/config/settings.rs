//! Scoring and evaluation settings.
//!
//! Settings are persisted to `~/.config/hotscore/settings.json` (or XDG
//! equivalent). Every field has a default so partial files load cleanly.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Relation scorer configuration.
    pub scoring: ScoringSettings,
    /// Evaluation configuration.
    pub evaluation: EvaluationSettings,
}

impl Settings {
    /// Default settings location for the current user, if one can be resolved.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "hotscore")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Loads settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Writes settings as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.evaluation.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Invalid(format!(
                "threshold must be within [0, 1], got {threshold}"
            )));
        }
        let fraction = self.evaluation.training_fraction;
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "training_fraction must be within (0, 1), got {fraction}"
            )));
        }
        Ok(())
    }
}

/// Relation scorer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    /// Whether primary recipients contribute to scores.
    pub use_to: bool,
    /// Whether cc recipients contribute to scores.
    pub use_cc: bool,
    /// Whether address keys are lowercased.
    pub case_fold: bool,
    /// Senders whose messages always score 1.0.
    pub vip_addresses: Vec<String>,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            use_to: true,
            use_cc: true,
            case_fold: false,
            vip_addresses: Vec::new(),
        }
    }
}

/// Evaluation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    /// Score at or above which a message is predicted hot.
    pub threshold: f64,
    /// Share of a single corpus used for training when no test set is given.
    pub training_fraction: f64,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            training_fraction: 0.8,
        }
    }
}
