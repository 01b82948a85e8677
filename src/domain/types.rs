//! Core identifier types for domain entities.
//!
//! These newtype wrappers keep message identifiers and address-book keys
//! from being mixed up with arbitrary strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to a message by the external message store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailId(pub String);

impl fmt::Display for EmailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EmailId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EmailId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Bare, display-name-stripped email address used as an address book key.
///
/// An empty value means the raw header could not be parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonicalAddress(pub String);

impl CanonicalAddress {
    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when parsing produced no address.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length of the address in characters.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for CanonicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CanonicalAddress {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CanonicalAddress {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
