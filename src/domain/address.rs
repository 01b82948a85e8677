//! Per-address behavioral statistics.
//!
//! Every correspondent is tracked separately in each header role it shows up
//! in, so a colleague who both writes to you and gets cc'd on your threads
//! accumulates two independent histories.

use serde::{Deserialize, Serialize};

use super::Engagement;

/// Header role an address appeared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sender.
    From,
    /// Primary recipient.
    To,
    /// Carbon copy recipient.
    Cc,
}

impl Role {
    /// All roles in header order.
    pub const ALL: [Role; 3] = [Role::From, Role::To, Role::Cc];
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "from" => Ok(Role::From),
            "to" => Ok(Role::To),
            "cc" => Ok(Role::Cc),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Engagement counters for one address in one role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleStatistics {
    /// Messages received with this address in this role.
    pub received: u32,
    /// Messages read (without a reply).
    pub read: u32,
    /// Messages replied to or forwarded.
    pub replied: u32,
}

impl RoleStatistics {
    /// Counts one more message with the given engagement.
    pub fn record(&mut self, engagement: Engagement) {
        self.received = self.received.saturating_add(1);
        match engagement {
            Engagement::Replied => self.replied = self.replied.saturating_add(1),
            Engagement::Read => self.read = self.read.saturating_add(1),
            Engagement::Ignored => {}
        }
    }

    /// Adds another set of counters into this one.
    pub fn merge(&mut self, other: &RoleStatistics) {
        self.received = self.received.saturating_add(other.received);
        self.read = self.read.saturating_add(other.read);
        self.replied = self.replied.saturating_add(other.replied);
    }

    /// Messages that were read or replied to.
    pub fn engaged(&self) -> u32 {
        self.read.saturating_add(self.replied)
    }

    /// Fraction of received messages the user engaged with.
    pub fn score(&self) -> f64 {
        if self.received == 0 {
            return 0.0;
        }
        f64::from(self.engaged()) / f64::from(self.received)
    }
}

/// Statistics for one canonical address across all three roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    /// Counters while the address was the sender.
    pub from: RoleStatistics,
    /// Counters while the address was a primary recipient.
    pub to: RoleStatistics,
    /// Counters while the address was cc'd.
    pub cc: RoleStatistics,
}

impl AddressRecord {
    /// Returns the counters for a role.
    pub fn role(&self, role: Role) -> &RoleStatistics {
        match role {
            Role::From => &self.from,
            Role::To => &self.to,
            Role::Cc => &self.cc,
        }
    }

    /// Returns the counters for a role, mutably.
    pub fn role_mut(&mut self, role: Role) -> &mut RoleStatistics {
        match role {
            Role::From => &mut self.from,
            Role::To => &mut self.to,
            Role::Cc => &mut self.cc,
        }
    }

    /// Engagement score for a role.
    pub fn score(&self, role: Role) -> f64 {
        self.role(role).score()
    }

    /// Adds another record's counters role by role.
    pub fn merge(&mut self, other: &AddressRecord) {
        for role in Role::ALL {
            self.role_mut(role).merge(other.role(role));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_statistics_score_zero() {
        assert_eq!(RoleStatistics::default().score(), 0.0);
    }

    #[test]
    fn score_counts_reads_and_replies() {
        let mut stats = RoleStatistics::default();
        stats.record(Engagement::Read);
        stats.record(Engagement::Replied);
        stats.record(Engagement::Ignored);
        stats.record(Engagement::Ignored);

        assert_eq!(
            stats,
            RoleStatistics {
                received: 4,
                read: 1,
                replied: 1,
            }
        );
        assert!((stats.score() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn roles_accumulate_independently() {
        let mut record = AddressRecord::default();
        record.role_mut(Role::From).record(Engagement::Read);
        record.role_mut(Role::Cc).record(Engagement::Ignored);

        assert_eq!(record.score(Role::From), 1.0);
        assert_eq!(record.score(Role::To), 0.0);
        assert_eq!(record.score(Role::Cc), 0.0);
        assert_eq!(record.cc.received, 1);
    }

    #[test]
    fn merge_sums_every_role() {
        let mut a = AddressRecord::default();
        a.from.record(Engagement::Read);
        let mut b = AddressRecord::default();
        b.from.record(Engagement::Ignored);
        b.to.record(Engagement::Replied);

        a.merge(&b);
        assert_eq!(a.from.received, 2);
        assert_eq!(a.from.read, 1);
        assert_eq!(a.to.replied, 1);
    }

    #[test]
    fn role_parsing() {
        assert_eq!("CC".parse::<Role>().unwrap(), Role::Cc);
        assert!("bcc".parse::<Role>().is_err());
    }
}
