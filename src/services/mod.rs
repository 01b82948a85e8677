//! Scoring services.
//!
//! This module contains the relevance scoring engine: the address book of
//! correspondent statistics, the scorers that share the [`Analyzer`]
//! capability, the combiners that merge them, and the evaluator.
//!
//! # Architecture
//!
//! ```text
//! training corpus --analyze--> RelationScorer (AddressBook)
//!                              ContentScorer  (TextClassifier)
//!                                    |
//! new messages ------classify--------+--> ScoreVector --> Combiner (optional)
//!                                                             |
//!                                                             v
//!                                          Evaluator --> EvaluationReport
//! ```
//!
//! # Services Overview
//!
//! - [`AddressBook`]: canonical address keys and per-role counters
//! - [`RelationScorer`]: scores messages from correspondent history
//! - [`ContentScorer`]: scores messages from their subject line
//! - [`Combiner`]: merges two analyzers with a [`CombineRule`]
//! - [`Evaluator`]: measures scores against read/unread ground truth

mod address_book;
mod analyzer;
mod bayesian;
mod combiner;
mod content_scorer;
mod evaluator;
mod relation_scorer;

pub use address_book::{canonicalize, parse_address_list, AddressBook, MAX_ADDRESS_LEN};
pub use analyzer::{Analyzer, AnalyzerKind, ScoreVector, ScoringError, ScoringResult};
pub use bayesian::BayesianClassifier;
pub use combiner::{CombineRule, Combiner};
pub use content_scorer::{ContentScorer, TextClassifier, NEUTRAL_SCORE};
pub use evaluator::{EvaluationReport, Evaluator, DEFAULT_THRESHOLD};
pub use relation_scorer::RelationScorer;
