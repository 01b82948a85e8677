//! Evaluation of scores against read/unread ground truth.
//!
//! A message is predicted *hot* when its score reaches the threshold. Read
//! messages are taken as historically relevant, so a hot unread message is a
//! false alarm and a not-hot read message is a miss.

use serde::Serialize;

use super::{ScoringError, ScoringResult};
use crate::domain::EmailMessage;

/// Default hot/not-hot cut-off.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Confusion-style summary of one evaluation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Threshold the report was computed with.
    pub threshold: f64,
    /// Messages evaluated.
    pub total: usize,
    /// Messages actually read.
    pub read: usize,
    /// Messages actually unread.
    pub unread: usize,
    /// Messages predicted hot.
    pub hot: usize,
    /// Messages predicted not hot.
    pub not_hot: usize,
    /// Read messages predicted not hot.
    pub misses: usize,
    /// Unread messages predicted hot.
    pub false_alarms: usize,
    /// `misses / total`.
    pub miss_rate: f64,
    /// `false_alarms / total`.
    pub false_alarm_rate: f64,
    /// `(misses + false_alarms) / total`.
    pub error_rate: f64,
    /// `false_alarms / hot`.
    pub hot_error_rate: f64,
    /// `misses / not_hot`.
    pub not_hot_error_rate: f64,
    /// Indices of missed messages.
    pub miss_indices: Vec<usize>,
    /// Indices of false-alarm messages.
    pub false_alarm_indices: Vec<usize>,
}

impl EvaluationReport {
    /// Fixed-format multi-line report: counts, then rates as percentages.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Total: {}\n", self.total));
        out.push_str(&format!("Read: {}\n", self.read));
        out.push_str(&format!("Unread: {}\n", self.unread));
        out.push_str(&format!("Hot: {}\n", self.hot));
        out.push_str(&format!("Not hot: {}\n", self.not_hot));
        out.push_str(&format!("Misses: {}\n", self.misses));
        out.push_str(&format!("False alarms: {}\n", self.false_alarms));
        out.push_str(&format!("Miss rate: {:.3}%\n", self.miss_rate * 100.0));
        out.push_str(&format!(
            "False alarm rate: {:.3}%\n",
            self.false_alarm_rate * 100.0
        ));
        out.push_str(&format!("Error rate: {:.3}%\n", self.error_rate * 100.0));
        out.push_str(&format!(
            "Hot error rate: {:.3}%\n",
            self.hot_error_rate * 100.0
        ));
        out.push_str(&format!(
            "Not hot error rate: {:.3}%\n",
            self.not_hot_error_rate * 100.0
        ));
        out
    }

    /// Exports the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Turns scores into an [`EvaluationReport`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluator {
    threshold: f64,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl Evaluator {
    /// Creates an evaluator with the given hot threshold.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The hot threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Compares `scores` with each message's read flag.
    ///
    /// `scores` must be aligned 1:1 with `messages`.
    pub fn evaluate(
        &self,
        messages: &[EmailMessage],
        scores: &[f64],
    ) -> ScoringResult<EvaluationReport> {
        if messages.len() != scores.len() {
            return Err(ScoringError::InvalidInput(format!(
                "{} scores for {} messages",
                scores.len(),
                messages.len()
            )));
        }

        let mut report = EvaluationReport {
            threshold: self.threshold,
            total: messages.len(),
            ..Default::default()
        };

        for (index, (message, &score)) in messages.iter().zip(scores).enumerate() {
            let hot = score >= self.threshold;
            if message.is_read {
                report.read += 1;
            } else {
                report.unread += 1;
            }

            if hot {
                report.hot += 1;
                if !message.is_read {
                    report.false_alarms += 1;
                    report.false_alarm_indices.push(index);
                }
            } else {
                report.not_hot += 1;
                if message.is_read {
                    report.misses += 1;
                    report.miss_indices.push(index);
                }
            }
        }

        report.miss_rate = ratio(report.misses, report.total);
        report.false_alarm_rate = ratio(report.false_alarms, report.total);
        report.error_rate = ratio(report.misses + report.false_alarms, report.total);
        report.hot_error_rate = ratio(report.false_alarms, report.hot);
        report.not_hot_error_rate = ratio(report.misses, report.not_hot);

        tracing::debug!(
            total = report.total,
            misses = report.misses,
            false_alarms = report.false_alarms,
            "evaluation finished"
        );
        Ok(report)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}
