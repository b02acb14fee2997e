//! Structural differences between two assignment sets

use crate::{Assignment, MemberId, RoleName};
use serde::{Deserialize, Serialize};

/// An assignment present in both sets whose detail or order moved
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentChange {
    pub role: RoleName,
    pub member_id: MemberId,
    pub previous: Assignment,
    pub current: Assignment,
}

impl AssignmentChange {
    pub fn detail_changed(&self) -> bool {
        self.previous.detail != self.current.detail
    }

    pub fn order_changed(&self) -> bool {
        self.previous.order != self.current.order
    }
}

/// Result of comparing a current set against a previous one
///
/// All three lists are sorted by (role, member id) so the same pair of sets
/// always produces the same diff.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssignmentDiff {
    pub added: Vec<Assignment>,
    pub removed: Vec<Assignment>,
    pub changed: Vec<AssignmentChange>,
}

impl AssignmentDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    /// Total number of differences
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }

    /// Roles touched by any difference, deduplicated and sorted
    pub fn touched_roles(&self) -> Vec<RoleName> {
        let mut roles: Vec<RoleName> = self
            .added
            .iter()
            .chain(self.removed.iter())
            .map(|a| a.role.clone())
            .chain(self.changed.iter().map(|c| c.role.clone()))
            .collect();
        roles.sort();
        roles.dedup();
        roles
    }
}
