//! Content-based scoring from message subjects.
//!
//! The scorer is a thin adapter: it feeds `(subject, is_read)` pairs to a
//! trainable [`TextClassifier`] and asks it for read probabilities. The
//! classifier's internals are its own business.

use super::{Analyzer, ScoreVector, ScoringResult};
use crate::domain::EmailMessage;

/// Score used when a message carries no text to judge.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// A trainable binary text classifier.
#[cfg_attr(test, mockall::automock)]
pub trait TextClassifier: Send + Sync {
    /// Learns from labelled samples; `true` marks the positive class.
    fn train(&mut self, samples: &[(String, bool)]);

    /// Probability in `[0, 1]` that `text` belongs to the positive class.
    fn predict_proba(&self, text: &str) -> f64;
}

/// Scores messages by their subject line, independent of correspondents.
#[derive(Debug, Clone, Default)]
pub struct ContentScorer<C> {
    classifier: C,
}

impl<C: TextClassifier> ContentScorer<C> {
    /// Wraps a classifier.
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    /// The wrapped classifier.
    pub fn classifier(&self) -> &C {
        &self.classifier
    }
}

impl<C: TextClassifier> Analyzer for ContentScorer<C> {
    fn name(&self) -> &'static str {
        "content"
    }

    fn analyze(&mut self, messages: &[EmailMessage]) {
        let samples: Vec<(String, bool)> = messages
            .iter()
            .filter_map(|m| m.non_empty_subject().map(|s| (s.to_string(), m.is_read)))
            .collect();

        tracing::debug!(
            messages = messages.len(),
            samples = samples.len(),
            "content scorer trained"
        );
        if samples.is_empty() {
            return;
        }
        self.classifier.train(&samples);
    }

    fn classify(&self, messages: &[EmailMessage]) -> ScoringResult<ScoreVector> {
        Ok(messages
            .iter()
            .map(|m| match m.non_empty_subject() {
                Some(subject) => self.classifier.predict_proba(subject).clamp(0.0, 1.0),
                None => NEUTRAL_SCORE,
            })
            .collect())
    }
}
