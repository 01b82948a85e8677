//! Naive Bayes text classifier backing the default content scorer.

use std::collections::HashMap;

use rust_stemmers::{Algorithm, Stemmer};

use super::TextClassifier;

/// Multinomial naive Bayes over stemmed, lowercase word tokens.
pub struct BayesianClassifier {
    positive_tokens: HashMap<String, u32>,
    negative_tokens: HashMap<String, u32>,
    positive_total: u64,
    negative_total: u64,
    positive_count: u32,
    negative_count: u32,
    stemmer: Stemmer,
}

impl BayesianClassifier {
    /// Create an untrained classifier
    pub fn new() -> Self {
        Self {
            positive_tokens: HashMap::new(),
            negative_tokens: HashMap::new(),
            positive_total: 0,
            negative_total: 0,
            positive_count: 0,
            negative_count: 0,
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Learn from a single sample
    pub fn learn(&mut self, text: &str, positive: bool) {
        let tokens = self.tokenize(text);
        let (table, total, count) = if positive {
            (
                &mut self.positive_tokens,
                &mut self.positive_total,
                &mut self.positive_count,
            )
        } else {
            (
                &mut self.negative_tokens,
                &mut self.negative_total,
                &mut self.negative_count,
            )
        };

        *count += 1;
        for token in tokens {
            *total += 1;
            *table.entry(token).or_insert(0) += 1;
        }
    }

    /// Training sample counts as (positive, negative)
    pub fn training_counts(&self) -> (u32, u32) {
        (self.positive_count, self.negative_count)
    }

    /// Number of distinct tokens seen in either class
    pub fn vocabulary_size(&self) -> usize {
        self.positive_tokens.len()
            + self
                .negative_tokens
                .keys()
                .filter(|t| !self.positive_tokens.contains_key(*t))
                .count()
    }

    /// Tokenize text into stemmed words
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| s.len() >= 2 && s.len() <= 25)
            .map(|s| self.stemmer.stem(s).to_string())
            .collect()
    }
}

impl Default for BayesianClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TextClassifier for BayesianClassifier {
    fn train(&mut self, samples: &[(String, bool)]) {
        for (text, positive) in samples {
            self.learn(text, *positive);
        }
    }

    fn predict_proba(&self, text: &str) -> f64 {
        if self.positive_count == 0 || self.negative_count == 0 {
            return 0.5; // Not enough training data
        }

        let samples = f64::from(self.positive_count) + f64::from(self.negative_count);
        let mut log_odds = (f64::from(self.positive_count) / samples).ln()
            - (f64::from(self.negative_count) / samples).ln();

        // Laplace smoothing over the shared vocabulary
        let vocabulary = self.vocabulary_size() as f64 + 1.0;
        let positive_denominator = self.positive_total as f64 + vocabulary;
        let negative_denominator = self.negative_total as f64 + vocabulary;

        for token in self.tokenize(text) {
            let positive = self.positive_tokens.get(&token).copied().unwrap_or(0);
            let negative = self.negative_tokens.get(&token).copied().unwrap_or(0);
            log_odds += ((f64::from(positive) + 1.0) / positive_denominator).ln()
                - ((f64::from(negative) + 1.0) / negative_denominator).ln();
        }

        1.0 / (1.0 + (-log_odds).exp())
    }
}
