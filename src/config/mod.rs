//! Configuration and settings management.
//!
//! This module provides the scoring and evaluation settings types and their
//! persistence. Settings are stored in the user's config directory as JSON.

mod settings;

pub use settings::{ConfigError, EvaluationSettings, ScoringSettings, Settings};
