//! Relation-based scoring from correspondent history.
//!
//! Training counts, per address and header role, how many messages arrived
//! and how many of them were read or replied to. A new message is scored by
//! pooling those counts over its sender and (optionally) its recipients:
//! `sum(read + replied) / sum(received)`.

use std::collections::HashSet;

use rayon::prelude::*;

use super::{AddressBook, Analyzer, ScoreVector, ScoringResult};
use crate::config::ScoringSettings;
use crate::domain::{CanonicalAddress, EmailMessage, Role};

/// Scores messages by how the user engaged with their correspondents before.
#[derive(Debug, Clone)]
pub struct RelationScorer {
    book: AddressBook,
    use_to: bool,
    use_cc: bool,
    vips: HashSet<CanonicalAddress>,
}

impl Default for RelationScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl RelationScorer {
    /// Creates a scorer that uses sender, recipients and cc.
    pub fn new() -> Self {
        Self {
            book: AddressBook::new(),
            use_to: true,
            use_cc: true,
            vips: HashSet::new(),
        }
    }

    /// Creates a scorer that only looks at the sender.
    pub fn from_only() -> Self {
        Self::new().with_roles(false, false)
    }

    /// Creates a scorer configured from settings.
    pub fn from_settings(settings: &ScoringSettings) -> Self {
        let book = if settings.case_fold {
            AddressBook::with_case_folding()
        } else {
            AddressBook::new()
        };
        let mut scorer = Self {
            book,
            use_to: settings.use_to,
            use_cc: settings.use_cc,
            vips: HashSet::new(),
        };
        for vip in &settings.vip_addresses {
            if !scorer.mark_vip(vip) {
                tracing::warn!(address = %vip, "ignoring unparsable VIP address");
            }
        }
        scorer
    }

    /// Selects which recipient roles contribute at classification time.
    pub fn with_roles(mut self, use_to: bool, use_cc: bool) -> Self {
        self.use_to = use_to;
        self.use_cc = use_cc;
        self
    }

    /// Marks a sender whose messages always score 1.0.
    ///
    /// Returns false if the address does not parse.
    pub fn mark_vip(&mut self, raw: &str) -> bool {
        let key = self.book.key(raw);
        if key.is_empty() {
            return false;
        }
        self.vips.insert(key)
    }

    /// Whether `to` recipients contribute to scores.
    pub fn uses_to(&self) -> bool {
        self.use_to
    }

    /// Whether `cc` recipients contribute to scores.
    pub fn uses_cc(&self) -> bool {
        self.use_cc
    }

    /// The statistics learned so far.
    pub fn address_book(&self) -> &AddressBook {
        &self.book
    }

    /// Trains on `messages` split into `partitions` independent books.
    ///
    /// The partial books are merged by summation, which gives the same
    /// counters as [`Analyzer::analyze`] over the whole corpus.
    pub fn analyze_parallel(&mut self, messages: &[EmailMessage], partitions: usize) {
        if messages.is_empty() {
            return;
        }
        let chunk_size = messages.len().div_ceil(partitions.max(1));
        let template = self.empty_book();

        let trained = messages
            .par_chunks(chunk_size)
            .map(|chunk| {
                let mut book = template.clone();
                accumulate(&mut book, chunk);
                book
            })
            .reduce(
                || template.clone(),
                |mut left, right| {
                    left.merge(right);
                    left
                },
            );

        self.book.merge(trained);
        tracing::debug!(
            messages = messages.len(),
            partitions,
            addresses = self.book.len(),
            "relation scorer trained in parallel"
        );
    }

    fn empty_book(&self) -> AddressBook {
        if self.book.folds_case() {
            AddressBook::with_case_folding()
        } else {
            AddressBook::new()
        }
    }

    /// Scores a single message against the learned statistics.
    pub fn score(&self, message: &EmailMessage) -> f64 {
        let senders = self.book.keys(&message.from);
        if senders.iter().any(|addr| self.vips.contains(addr)) {
            return 1.0;
        }

        let mut top: u64 = 0;
        let mut bottom: u64 = 0;
        let mut add = |addrs: Vec<CanonicalAddress>, role: Role| {
            for addr in addrs {
                if let Some(record) = self.book.lookup(&addr) {
                    let stats = record.role(role);
                    top += u64::from(stats.engaged());
                    bottom += u64::from(stats.received);
                }
            }
        };

        add(senders, Role::From);
        if self.use_to {
            add(self.book.keys(&message.to), Role::To);
        }
        if self.use_cc {
            add(self.book.keys(&message.cc), Role::Cc);
        }

        if bottom == 0 {
            return 0.0;
        }
        (top as f64 / bottom as f64).min(1.0)
    }
}

/// Adds every message's engagement to the sender, to and cc records.
fn accumulate(book: &mut AddressBook, messages: &[EmailMessage]) {
    for message in messages {
        let engagement = message.engagement();
        for (header, role) in [
            (&message.from, Role::From),
            (&message.to, Role::To),
            (&message.cc, Role::Cc),
        ] {
            for key in book.keys(header) {
                book.record_mut(key).role_mut(role).record(engagement);
            }
        }
    }
}

impl Analyzer for RelationScorer {
    fn name(&self) -> &'static str {
        if self.use_to || self.use_cc {
            "relation"
        } else {
            "from-only"
        }
    }

    fn analyze(&mut self, messages: &[EmailMessage]) {
        accumulate(&mut self.book, messages);
        tracing::debug!(
            messages = messages.len(),
            addresses = self.book.len(),
            "relation scorer trained"
        );
    }

    fn classify(&self, messages: &[EmailMessage]) -> ScoringResult<ScoreVector> {
        let scores: ScoreVector = messages.par_iter().map(|m| self.score(m)).collect();
        tracing::debug!(messages = messages.len(), "relation scorer classified");
        Ok(scores)
    }
}
