//! Driver layer.
//!
//! Ties settings, corpus files and the scoring services together for the
//! command-line tool and other embedders.

pub mod corpus;
mod context;

pub use context::ScoringContext;
pub use corpus::CorpusError;
