//! hotscore - Relevance scoring for email messages and correspondents
//!
//! This crate scores messages by how likely the user is to read or reply to
//! them, so a mail client can surface "hot" messages first. It provides the
//! per-address statistics, the relation and content scorers, the combiners
//! that merge them, and an evaluator reporting calibrated accuracy metrics.

pub mod app;
pub mod config;
pub mod domain;
pub mod services;

pub use app::ScoringContext;
