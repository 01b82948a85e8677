//! Explicit scoring context for drivers.
//!
//! Holds the configured analyzer and evaluator so callers pass one object
//! around instead of relying on process-wide model state.

use crate::config::Settings;
use crate::domain::EmailMessage;
use crate::services::{
    Analyzer, AnalyzerKind, EvaluationReport, Evaluator, ScoreVector, ScoringResult,
};

/// A trained (or trainable) analyzer plus the evaluator it is judged by.
pub struct ScoringContext {
    kind: AnalyzerKind,
    analyzer: Box<dyn Analyzer>,
    evaluator: Evaluator,
}

impl ScoringContext {
    /// Builds an untrained context for the given analyzer kind.
    pub fn new(kind: AnalyzerKind, settings: &Settings) -> Self {
        Self {
            kind,
            analyzer: kind.build(&settings.scoring),
            evaluator: Evaluator::new(settings.evaluation.threshold),
        }
    }

    /// Builds an untrained context for an analyzer selected by name.
    pub fn from_name(name: &str, settings: &Settings) -> ScoringResult<Self> {
        Ok(Self::new(name.parse()?, settings))
    }

    /// The analyzer kind in use.
    pub fn kind(&self) -> AnalyzerKind {
        self.kind
    }

    /// The evaluator in use.
    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Runs the training pass.
    pub fn train(&mut self, messages: &[EmailMessage]) {
        tracing::info!(
            analyzer = %self.kind,
            messages = messages.len(),
            "training"
        );
        self.analyzer.analyze(messages);
    }

    /// Scores messages with the trained analyzer.
    pub fn score(&self, messages: &[EmailMessage]) -> ScoringResult<ScoreVector> {
        self.analyzer.classify(messages)
    }

    /// Scores messages and evaluates the scores against their read flags.
    pub fn evaluate(&self, messages: &[EmailMessage]) -> ScoringResult<EvaluationReport> {
        let scores = self.score(messages)?;
        self.evaluator.evaluate(messages, &scores)
    }

    /// Trains on one corpus and evaluates on another.
    pub fn run(
        &mut self,
        training: &[EmailMessage],
        test: &[EmailMessage],
    ) -> ScoringResult<EvaluationReport> {
        self.train(training);
        let report = self.evaluate(test)?;
        tracing::info!(
            analyzer = %self.kind,
            total = report.total,
            error_rate = report.error_rate,
            "evaluation complete"
        );
        Ok(report)
    }
}
