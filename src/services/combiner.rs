//! Combiners merging two analyzers' scores into one.
//!
//! Each rule is commutative and closed on `[0, 1]`, and for any inputs
//! `Product >= Max >= Linear >= min`.

use std::fmt;

use super::{Analyzer, ScoreVector, ScoringError, ScoringResult};
use crate::domain::EmailMessage;

/// Fixed rule for merging two scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombineRule {
    /// Arithmetic mean.
    Linear,
    /// Probabilistic OR of independent scores: `p + q - pq`.
    Product,
    /// The larger score.
    Max,
}

impl CombineRule {
    /// Short name of the rule.
    pub fn as_str(self) -> &'static str {
        match self {
            CombineRule::Linear => "linear",
            CombineRule::Product => "product",
            CombineRule::Max => "max",
        }
    }

    /// Combines two scores in `[0, 1]`.
    pub fn apply(self, p: f64, q: f64) -> f64 {
        match self {
            CombineRule::Linear => (0.5 * p + 0.5 * q).max(p.min(q)).min(p.max(q)),
            // Rounding in p + q - pq can land just under max(p, q).
            CombineRule::Product => (p + q - p * q).min(1.0).max(p.max(q)),
            CombineRule::Max => p.max(q),
        }
    }

    /// Combines two aligned score vectors elementwise.
    pub fn combine(self, first: &[f64], second: &[f64]) -> ScoringResult<ScoreVector> {
        if first.len() != second.len() {
            return Err(ScoringError::InvalidInput(format!(
                "cannot combine score vectors of length {} and {}",
                first.len(),
                second.len()
            )));
        }
        Ok(first
            .iter()
            .zip(second)
            .map(|(&p, &q)| self.apply(p, q))
            .collect())
    }
}

impl fmt::Display for CombineRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two analyzers whose scores are merged with a [`CombineRule`].
pub struct Combiner {
    rule: CombineRule,
    first: Box<dyn Analyzer>,
    second: Box<dyn Analyzer>,
}

impl Combiner {
    /// Wraps two analyzers.
    pub fn new(rule: CombineRule, first: Box<dyn Analyzer>, second: Box<dyn Analyzer>) -> Self {
        Self {
            rule,
            first,
            second,
        }
    }

    /// The merge rule.
    pub fn rule(&self) -> CombineRule {
        self.rule
    }
}

impl Analyzer for Combiner {
    fn name(&self) -> &'static str {
        self.rule.as_str()
    }

    fn analyze(&mut self, messages: &[EmailMessage]) {
        self.first.analyze(messages);
        self.second.analyze(messages);
    }

    fn classify(&self, messages: &[EmailMessage]) -> ScoringResult<ScoreVector> {
        let first = self.first.classify(messages)?;
        let second = self.second.classify(messages)?;
        if first.len() != messages.len() {
            return Err(ScoringError::InvalidInput(format!(
                "{} returned {} scores for {} messages",
                self.first.name(),
                first.len(),
                messages.len()
            )));
        }
        self.rule.combine(&first, &second)
    }
}
