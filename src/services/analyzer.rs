//! The shared analyze/classify capability and the analyzer factory.
//!
//! Every scorer goes through two phases. `analyze` is the training pass that
//! populates internal statistics from historical messages. `classify` is the
//! read-only pass that produces one score in `[0, 1]` per message. Drivers
//! pick a scorer by name through [`AnalyzerKind`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::{BayesianClassifier, CombineRule, Combiner, ContentScorer, RelationScorer};
use crate::config::ScoringSettings;
use crate::domain::EmailMessage;

/// Errors that can occur while scoring or evaluating.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// The caller passed inputs that cannot be lined up.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A driver asked for an analyzer that does not exist.
    #[error("unknown analyzer: {0}")]
    UnknownAnalyzer(String),
}

/// Result type for scoring operations.
pub type ScoringResult<T> = Result<T, ScoringError>;

/// One score per message, aligned with the classified message slice.
pub type ScoreVector = Vec<f64>;

/// A scorer with a training phase and a read-only classification phase.
pub trait Analyzer: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Accumulates statistics from a training corpus.
    ///
    /// Repeated calls accumulate; discard the analyzer for a fresh model.
    fn analyze(&mut self, messages: &[EmailMessage]);

    /// Scores each message, returning a vector aligned with `messages`.
    fn classify(&self, messages: &[EmailMessage]) -> ScoringResult<ScoreVector>;
}

/// The closed set of analyzers a driver can build by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyzerKind {
    /// Relation scorer over from, to and cc roles (as configured).
    Relation,
    /// Relation scorer restricted to the sender.
    FromOnly,
    /// Subject-based content scorer.
    Content,
    /// Relation and content scores averaged.
    Linear,
    /// Relation and content scores combined as a probabilistic OR.
    Product,
    /// The larger of the relation and content scores.
    Max,
}

impl AnalyzerKind {
    /// Every kind, in the order drivers list them.
    pub const ALL: [AnalyzerKind; 6] = [
        AnalyzerKind::Relation,
        AnalyzerKind::FromOnly,
        AnalyzerKind::Content,
        AnalyzerKind::Linear,
        AnalyzerKind::Product,
        AnalyzerKind::Max,
    ];

    /// The name drivers select this kind with.
    pub fn as_str(self) -> &'static str {
        match self {
            AnalyzerKind::Relation => "relation",
            AnalyzerKind::FromOnly => "from-only",
            AnalyzerKind::Content => "content",
            AnalyzerKind::Linear => "linear",
            AnalyzerKind::Product => "product",
            AnalyzerKind::Max => "max",
        }
    }

    /// Builds an untrained analyzer of this kind.
    pub fn build(self, settings: &ScoringSettings) -> Box<dyn Analyzer> {
        match self {
            AnalyzerKind::Relation => Box::new(RelationScorer::from_settings(settings)),
            AnalyzerKind::FromOnly => Box::new(
                RelationScorer::from_settings(settings).with_roles(false, false),
            ),
            AnalyzerKind::Content => Box::new(ContentScorer::new(BayesianClassifier::new())),
            AnalyzerKind::Linear => Box::new(Self::combined(CombineRule::Linear, settings)),
            AnalyzerKind::Product => Box::new(Self::combined(CombineRule::Product, settings)),
            AnalyzerKind::Max => Box::new(Self::combined(CombineRule::Max, settings)),
        }
    }

    fn combined(rule: CombineRule, settings: &ScoringSettings) -> Combiner {
        Combiner::new(
            rule,
            Box::new(RelationScorer::from_settings(settings)),
            Box::new(ContentScorer::new(BayesianClassifier::new())),
        )
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalyzerKind {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ScoringError::UnknownAnalyzer(s.to_string()))
    }
}
