//! Email message types consumed by the scoring engine.
//!
//! Messages are read-only inputs exported by the external message store.
//! Address headers stay as the raw comma-joined strings the store holds;
//! parsing them is the address book's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::EmailId;

/// A single email message as seen by the scorers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Store identifier, if the export carries one.
    #[serde(default)]
    pub id: Option<EmailId>,
    /// Raw `From` header.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub from: String,
    /// Raw comma-joined `To` header.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub to: String,
    /// Raw comma-joined `Cc` header.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cc: String,
    /// Subject line.
    #[serde(default)]
    pub subject: Option<String>,
    /// Whether the user has read the message.
    #[serde(default)]
    pub is_read: bool,
    /// Last action the user took on the message.
    #[serde(default)]
    pub last_action: LastAction,
    /// Date the message was received.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl EmailMessage {
    /// Creates an unread message from the given sender.
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            ..Default::default()
        }
    }

    /// Sets the store identifier.
    pub fn with_id(mut self, id: impl Into<EmailId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the raw `To` header.
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = to.into();
        self
    }

    /// Sets the raw `Cc` header.
    pub fn cc(mut self, cc: impl Into<String>) -> Self {
        self.cc = cc.into();
        self
    }

    /// Sets the subject line.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the read flag.
    pub fn read(mut self, is_read: bool) -> Self {
        self.is_read = is_read;
        self
    }

    /// Sets the last action.
    pub fn action(mut self, action: LastAction) -> Self {
        self.last_action = action;
        self
    }

    /// Sets the received date.
    pub fn dated(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Returns the subject if it is present and not blank.
    pub fn non_empty_subject(&self) -> Option<&str> {
        self.subject
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The strongest engagement signal this message carries.
    ///
    /// A reply outranks a read, so each message counts toward at most one
    /// of the `replied`/`read` counters.
    pub fn engagement(&self) -> Engagement {
        if self.last_action.is_reply_like() {
            Engagement::Replied
        } else if self.is_read {
            Engagement::Read
        } else {
            Engagement::Ignored
        }
    }
}

/// Store exports write absent headers as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Last action the user took on a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LastAction {
    /// No action recorded.
    #[default]
    None,
    /// The user replied.
    Replied,
    /// The user forwarded the message.
    Forwarded,
    /// Any other action (moved, flagged, ...).
    Other,
}

impl LastAction {
    /// Whether the action sent something back out, which counts as a reply.
    pub fn is_reply_like(self) -> bool {
        matches!(self, LastAction::Replied | LastAction::Forwarded)
    }
}

/// Per-message engagement signal used to update address statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engagement {
    /// Replied to or forwarded.
    Replied,
    /// Read without replying.
    Read,
    /// Neither read nor replied.
    Ignored,
}
