//! Domain layer types for the relevance scoring engine.
//!
//! This module contains the message records consumed from the external
//! store and the per-address statistics the relation scorer accumulates.

mod address;
mod email;
mod types;

pub use address::{AddressRecord, Role, RoleStatistics};
pub use email::{EmailMessage, Engagement, LastAction};
pub use types::{CanonicalAddress, EmailId};
