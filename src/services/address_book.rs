//! Address book of per-correspondent engagement statistics.
//!
//! Raw header values are reduced to canonical addresses with RFC 2822
//! address-list parsing. Malformed headers and implausibly long addresses
//! are dropped quietly so one dirty message never aborts a training run.

use std::collections::HashMap;

use mailparse::{addrparse, MailAddr};

use crate::domain::{AddressRecord, CanonicalAddress, Role, RoleStatistics};

/// Longest address, in characters, that is treated as a real address.
pub const MAX_ADDRESS_LEN: usize = 60;

/// Extracts the bare address from a single `Name <addr>` or bare token.
///
/// Returns an empty address when the token cannot be parsed.
pub fn canonicalize(raw: &str) -> CanonicalAddress {
    parse_address_list(raw)
        .into_iter()
        .next()
        .unwrap_or_default()
}

/// Splits a comma-joined header into canonical addresses.
///
/// Group syntax is flattened and empty list elements are ignored.
/// Unparsable headers yield an empty list. Addresses longer than
/// [`MAX_ADDRESS_LEN`], or that are not a bare `local@domain`, are skipped.
pub fn parse_address_list(raw_header: &str) -> Vec<CanonicalAddress> {
    let header = drop_empty_elements(raw_header);
    if header.is_empty() {
        return Vec::new();
    }

    let parsed = match addrparse(&header) {
        Ok(list) => list,
        Err(e) => {
            tracing::trace!(header = raw_header, error = %e, "skipping unparsable address header");
            return Vec::new();
        }
    };

    let mut addresses = Vec::new();
    for entry in parsed.iter() {
        match entry {
            MailAddr::Single(info) => addresses.push(info.addr.trim().to_string()),
            MailAddr::Group(group) => {
                addresses.extend(group.addrs.iter().map(|info| info.addr.trim().to_string()))
            }
        }
    }

    addresses
        .into_iter()
        .map(CanonicalAddress::from)
        .filter(|addr| {
            if addr.is_empty() {
                return false;
            }
            if !is_bare_address(addr.as_str()) {
                tracing::trace!(address = %addr, "skipping malformed address");
                return false;
            }
            if addr.len() > MAX_ADDRESS_LEN {
                tracing::trace!(address = %addr, "skipping overlong address");
                return false;
            }
            true
        })
        .collect()
}

/// Removes empty elements (`a, , b`) from a comma-joined header.
///
/// Commas inside quoted strings, comments and angle brackets are not
/// separators. Group syntax survives since elements are rejoined in order.
fn drop_empty_elements(header: &str) -> String {
    let mut elements = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut angle = 0usize;
    let mut comment = 0usize;

    for ch in header.chars() {
        if escaped {
            escaped = false;
            current.push(ch);
            continue;
        }
        match ch {
            '\\' if in_quotes || comment > 0 => escaped = true,
            '"' if comment == 0 => in_quotes = !in_quotes,
            '<' if !in_quotes && comment == 0 => angle += 1,
            '>' if !in_quotes && comment == 0 => angle = angle.saturating_sub(1),
            '(' if !in_quotes => comment += 1,
            ')' if !in_quotes => comment = comment.saturating_sub(1),
            ',' if !in_quotes && angle == 0 && comment == 0 => {
                push_element(&mut elements, &current);
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    push_element(&mut elements, &current);

    elements.join(", ")
}

fn push_element(elements: &mut Vec<String>, element: &str) {
    let element = element.trim();
    if !element.is_empty() {
        elements.push(element.to_string());
    }
}

/// A parse result is only an address when it is one `local@domain` token.
fn is_bare_address(addr: &str) -> bool {
    addr.contains('@') && !addr.contains(',') && !addr.chars().any(char::is_whitespace)
}

/// Mapping from canonical address to its engagement record.
#[derive(Debug, Clone, Default)]
pub struct AddressBook {
    records: HashMap<CanonicalAddress, AddressRecord>,
    case_fold: bool,
}

impl AddressBook {
    /// Creates an empty, case-sensitive address book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty address book that lowercases keys.
    pub fn with_case_folding() -> Self {
        Self {
            records: HashMap::new(),
            case_fold: true,
        }
    }

    /// Whether keys are lowercased.
    pub fn folds_case(&self) -> bool {
        self.case_fold
    }

    /// Canonicalizes a raw address into this book's key space.
    pub fn key(&self, raw: &str) -> CanonicalAddress {
        self.fold(canonicalize(raw))
    }

    /// Parses a header into this book's key space.
    pub fn keys(&self, raw_header: &str) -> Vec<CanonicalAddress> {
        parse_address_list(raw_header)
            .into_iter()
            .map(|addr| self.fold(addr))
            .collect()
    }

    fn fold(&self, addr: CanonicalAddress) -> CanonicalAddress {
        if self.case_fold {
            CanonicalAddress(addr.0.to_lowercase())
        } else {
            addr
        }
    }

    /// Returns the record for a raw address, creating it on first sight.
    ///
    /// Returns `None` when the address does not canonicalize.
    pub fn get_or_create(&mut self, raw: &str) -> Option<&mut AddressRecord> {
        let key = self.key(raw);
        if key.is_empty() {
            return None;
        }
        Some(self.record_mut(key))
    }

    /// Returns the record for an already canonical key, creating it if needed.
    pub(crate) fn record_mut(&mut self, key: CanonicalAddress) -> &mut AddressRecord {
        self.records.entry(key).or_default()
    }

    /// Looks up a raw address without growing the book.
    pub fn get(&self, raw: &str) -> Option<&AddressRecord> {
        let key = self.key(raw);
        if key.is_empty() {
            return None;
        }
        self.records.get(&key)
    }

    /// Looks up an already canonical key.
    pub fn lookup(&self, key: &CanonicalAddress) -> Option<&AddressRecord> {
        self.records.get(key)
    }

    /// Whether a canonical key is present.
    pub fn contains(&self, key: &CanonicalAddress) -> bool {
        self.records.contains_key(key)
    }

    /// Number of distinct addresses.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no address has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over all records in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalAddress, &AddressRecord)> {
        self.records.iter()
    }

    /// Adds every counter from `other` into this book.
    ///
    /// Counters sum per address and role, so merging is associative and
    /// commutative and partitioned training can be reduced in any order.
    pub fn merge(&mut self, other: AddressBook) {
        for (key, record) in other.records {
            let key = self.fold(key);
            self.records.entry(key).or_default().merge(&record);
        }
    }

    /// Top correspondents in a role.
    ///
    /// Only addresses with at least `min_received` messages are ranked.
    /// Ties on score are broken by volume, then alphabetically.
    pub fn ranked(
        &self,
        role: Role,
        min_received: u32,
        limit: usize,
    ) -> Vec<(&CanonicalAddress, &RoleStatistics)> {
        let mut ranked: Vec<_> = self
            .records
            .iter()
            .map(|(addr, record)| (addr, record.role(role)))
            .filter(|(_, stats)| stats.received > 0 && stats.received >= min_received)
            .collect();

        ranked.sort_by(|(a_addr, a), (b_addr, b)| {
            b.score()
                .total_cmp(&a.score())
                .then_with(|| b.received.cmp(&a.received))
                .then_with(|| a_addr.cmp(b_addr))
        });
        ranked.truncate(limit);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Engagement;
    use pretty_assertions::assert_eq;

    #[test]
    fn canonicalize_strips_display_name() {
        assert_eq!(
            canonicalize("Alice Smith <alice@example.com>"),
            CanonicalAddress::from("alice@example.com")
        );
        assert_eq!(
            canonicalize("bob@example.com"),
            CanonicalAddress::from("bob@example.com")
        );
    }

    #[test]
    fn canonicalize_preserves_case() {
        assert_eq!(
            canonicalize("Alice@Example.com"),
            CanonicalAddress::from("Alice@Example.com")
        );
    }

    #[test]
    fn canonicalize_empty_input_is_empty() {
        assert!(canonicalize("").is_empty());
        assert!(canonicalize("   ").is_empty());
    }

    #[test]
    fn parse_list_splits_header() {
        let addrs = parse_address_list("Ann <ann@x.com>, bob@x.com,\"Lee, C\" <c@x.com>");
        assert_eq!(
            addrs,
            vec![
                CanonicalAddress::from("ann@x.com"),
                CanonicalAddress::from("bob@x.com"),
                CanonicalAddress::from("c@x.com"),
            ]
        );
    }

    #[test]
    fn parse_list_flattens_groups() {
        let addrs = parse_address_list("team: ann@x.com, bob@x.com;");
        assert_eq!(addrs.len(), 2);
    }

    #[test]
    fn parse_list_skips_overlong_addresses() {
        let long = format!("{}@example.com", "a".repeat(49));
        assert_eq!(long.len(), 61);
        let ok = format!("{}@example.com", "a".repeat(48));

        let addrs = parse_address_list(&format!("{long}, {ok}"));
        assert_eq!(addrs, vec![CanonicalAddress::from(ok)]);
    }

    #[test]
    fn parse_list_returns_only_bare_addresses() {
        for header in [
            "",
            ",",
            " , ,",
            "<>",
            "Name <",
            "\"unterminated",
            "a@x.com b@x.com",
            "a@x.com, , b@x.com",
            "not an address",
        ] {
            for addr in parse_address_list(header) {
                let addr = addr.as_str();
                assert!(!addr.is_empty(), "{header:?}");
                assert!(addr.contains('@'), "{header:?} -> {addr:?}");
                assert!(!addr.contains(','), "{header:?} -> {addr:?}");
                assert!(!addr.contains(char::is_whitespace), "{header:?} -> {addr:?}");
            }
        }
    }

    #[test]
    fn parse_list_skips_empty_elements() {
        let expected = vec![
            CanonicalAddress::from("a@x.com"),
            CanonicalAddress::from("b@x.com"),
        ];
        assert_eq!(parse_address_list("a@x.com, , b@x.com"), expected);
        assert_eq!(parse_address_list("a@x.com,,b@x.com"), expected);
        assert_eq!(parse_address_list(", a@x.com, b@x.com,"), expected);
    }

    #[test]
    fn empty_elements_keep_quoted_commas() {
        assert_eq!(
            parse_address_list("\"Lee, C\" <c@x.com>, , team: a@x.com, b@x.com;"),
            vec![
                CanonicalAddress::from("c@x.com"),
                CanonicalAddress::from("a@x.com"),
                CanonicalAddress::from("b@x.com"),
            ]
        );
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut book = AddressBook::new();
        let first = book
            .get_or_create("a@x.com")
            .map(|r| r as *const AddressRecord)
            .unwrap();
        let second = book
            .get_or_create("A. Person <a@x.com>")
            .map(|r| r as *const AddressRecord)
            .unwrap();

        assert!(std::ptr::eq(first, second));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn get_or_create_keeps_counters() {
        let mut book = AddressBook::new();
        book.get_or_create("a@x.com")
            .unwrap()
            .from
            .record(Engagement::Read);
        let record = book.get_or_create("Ann <a@x.com>").unwrap();
        assert_eq!(record.from.read, 1);
    }

    #[test]
    fn get_does_not_create() {
        let book = AddressBook::new();
        assert!(book.get("a@x.com").is_none());
        assert!(book.is_empty());
    }

    #[test]
    fn case_sensitive_by_default() {
        let mut book = AddressBook::new();
        book.get_or_create("a@x.com");
        book.get_or_create("A@X.com");
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn case_folding_merges_variants() {
        let mut book = AddressBook::with_case_folding();
        book.get_or_create("a@x.com");
        book.get_or_create("A@X.com");
        assert_eq!(book.len(), 1);
        assert!(book.get("Ann <A@x.COM>").is_some());
    }

    #[test]
    fn merge_sums_counters() {
        let mut left = AddressBook::new();
        left.get_or_create("a@x.com")
            .unwrap()
            .from
            .record(Engagement::Read);
        let mut right = AddressBook::new();
        right
            .get_or_create("a@x.com")
            .unwrap()
            .from
            .record(Engagement::Ignored);
        right
            .get_or_create("b@x.com")
            .unwrap()
            .to
            .record(Engagement::Replied);

        left.merge(right);

        assert_eq!(left.len(), 2);
        let a = left.get("a@x.com").unwrap();
        assert_eq!(a.from.received, 2);
        assert_eq!(a.from.read, 1);
        assert_eq!(left.get("b@x.com").unwrap().to.replied, 1);
    }

    #[test]
    fn ranked_orders_by_score_then_volume() {
        let mut book = AddressBook::new();
        let rec = book.get_or_create("low@x.com").unwrap();
        rec.from.record(Engagement::Ignored);
        rec.from.record(Engagement::Read);
        let rec = book.get_or_create("high@x.com").unwrap();
        rec.from.record(Engagement::Replied);
        let rec = book.get_or_create("busy@x.com").unwrap();
        rec.from.record(Engagement::Read);
        rec.from.record(Engagement::Read);
        book.get_or_create("recipient@x.com")
            .unwrap()
            .to
            .record(Engagement::Read);

        let ranked: Vec<&str> = book
            .ranked(Role::From, 0, 10)
            .into_iter()
            .map(|(addr, _)| addr.as_str())
            .collect();
        assert_eq!(ranked, vec!["busy@x.com", "high@x.com", "low@x.com"]);

        let top = book.ranked(Role::From, 2, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].0.as_str(), "busy@x.com");
    }
}
