//! Assignment sets: who holds which role within one context
//!
//! The assignment set is the canonical role → members state for one
//! assignment context. It knows each role's layout (ordering, capacity)
//! but nothing about exclusivity; that is enforced one layer up.
//!
//! Invariants:
//! - a (role, member) pair appears at most once
//! - in an ordered role, order values are exactly 1..N in list order
//! - a bounded role never holds more entries than its capacity

use crate::{
    AssignmentChange, AssignmentDiff, AssignmentRecord, ContextId, MemberId, RoleCatalog,
    RoleName, RoleSpec, RosterError, RosterResult, SnapshotDigest,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A member holding a role
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// The assigned member
    pub member_id: MemberId,
    /// The role held
    pub role: RoleName,
    /// Free-text detail (e.g. a song key or a speaking topic)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Position within an ordered role, 1-based
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl Assignment {
    pub fn new(member_id: MemberId, role: RoleName) -> Self {
        Self {
            member_id,
            role,
            detail: None,
            order: None,
        }
    }

    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }
}

/// What an [`AssignmentSet::add`] call did
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AddOutcome {
    /// Whether the set changed at all
    pub changed: bool,
    /// Entries pushed out of a bounded role to make room
    pub evicted: Vec<Assignment>,
}

impl AddOutcome {
    fn unchanged() -> Self {
        Self::default()
    }
}

/// Role → ordered list of assignments for one context
#[derive(Clone, Debug)]
pub struct AssignmentSet {
    /// The context this set belongs to
    pub context_id: ContextId,
    /// Layout of the roles this context knows about
    layout: BTreeMap<RoleName, RoleSpec>,
    /// Assignments per role, in list order
    roles: BTreeMap<RoleName, Vec<Assignment>>,
}

impl AssignmentSet {
    /// Create an empty set, as creation flows do
    pub fn new(context_id: ContextId, catalog: &RoleCatalog) -> Self {
        Self {
            context_id,
            layout: catalog.roles.clone(),
            roles: BTreeMap::new(),
        }
    }

    /// Hydrate from server-provided records
    ///
    /// Ordered roles are sorted by their incoming order value (missing values
    /// last) and then renumbered densely. A repeated (role, member) record
    /// keeps only its first occurrence. Capacities are not enforced here:
    /// what the server holds is taken as-is.
    pub fn from_records(
        context_id: ContextId,
        catalog: &RoleCatalog,
        records: impl IntoIterator<Item = AssignmentRecord>,
    ) -> Self {
        let mut set = Self::new(context_id, catalog);

        for record in records {
            let entries = set.roles.entry(record.role.clone()).or_default();
            if entries.iter().any(|a| a.member_id == record.member_id) {
                continue;
            }
            entries.push(Assignment {
                member_id: record.member_id,
                role: record.role,
                detail: record.detail,
                order: record.order,
            });
        }

        let ordered: Vec<RoleName> = set
            .roles
            .keys()
            .filter(|role| set.is_ordered(role))
            .cloned()
            .collect();
        for role in ordered {
            if let Some(entries) = set.roles.get_mut(&role) {
                entries.sort_by_key(|a| a.order.unwrap_or(u32::MAX));
            }
        }

        let names: Vec<RoleName> = set.roles.keys().cloned().collect();
        for role in names {
            set.resequence(&role);
        }
        set
    }

    // --- Layout ---

    pub fn is_ordered(&self, role: &RoleName) -> bool {
        self.layout.get(role).map(|r| r.ordered).unwrap_or(false)
    }

    pub fn capacity(&self, role: &RoleName) -> Option<usize> {
        self.layout.get(role).and_then(|r| r.capacity)
    }

    // --- Mutation ---

    /// Append `member` to `role`
    ///
    /// Re-adding a member with the same detail is a no-op; with a different
    /// detail it updates the detail in place. When a bounded role is full,
    /// its earliest entries are evicted.
    pub fn add(&mut self, role: &RoleName, member: &MemberId, detail: Option<String>) -> AddOutcome {
        let capacity = self.capacity(role);
        let entries = self.roles.entry(role.clone()).or_default();

        if let Some(existing) = entries.iter_mut().find(|a| a.member_id == *member) {
            if existing.detail == detail {
                return AddOutcome::unchanged();
            }
            existing.detail = detail;
            return AddOutcome {
                changed: true,
                evicted: Vec::new(),
            };
        }

        entries.push(Assignment::new(member.clone(), role.clone()).with_detail(detail));

        let mut evicted = Vec::new();
        if let Some(capacity) = capacity {
            let capacity = capacity.max(1);
            if entries.len() > capacity {
                let overflow = entries.len() - capacity;
                evicted = entries.drain(..overflow).collect();
            }
        }

        self.resequence(role);
        for entry in &mut evicted {
            entry.order = None;
        }

        AddOutcome {
            changed: true,
            evicted,
        }
    }

    /// Remove `member` from `role`, renumbering an ordered role
    pub fn remove(&mut self, role: &RoleName, member: &MemberId) -> RosterResult<Assignment> {
        let position = self.position(role, member)?;
        let removed = self
            .roles
            .get_mut(role)
            .map(|entries| entries.remove(position))
            .ok_or_else(|| not_found(role, member))?;

        if self.roles.get(role).map(Vec::is_empty).unwrap_or(false) {
            self.roles.remove(role);
        }
        self.resequence(role);
        Ok(removed)
    }

    /// Replace the free-text detail of an existing assignment
    pub fn set_detail(
        &mut self,
        role: &RoleName,
        member: &MemberId,
        detail: Option<String>,
    ) -> RosterResult<()> {
        let entry = self
            .roles
            .get_mut(role)
            .and_then(|entries| entries.iter_mut().find(|a| a.member_id == *member))
            .ok_or_else(|| not_found(role, member))?;
        entry.detail = detail;
        Ok(())
    }

    /// Move `member` to `new_index` within `role`, shifting the others
    pub fn reorder(
        &mut self,
        role: &RoleName,
        member: &MemberId,
        new_index: usize,
    ) -> RosterResult<()> {
        let position = self.position(role, member)?;
        let entries = self
            .roles
            .get_mut(role)
            .ok_or_else(|| not_found(role, member))?;

        if new_index >= entries.len() {
            return Err(RosterError::IndexOutOfRange {
                role: role.clone(),
                index: new_index,
                len: entries.len(),
            });
        }

        let entry = entries.remove(position);
        entries.insert(new_index, entry);
        self.resequence(role);
        Ok(())
    }

    /// Renumber an ordered role to 1..N in list order
    fn resequence(&mut self, role: &RoleName) {
        let ordered = self.is_ordered(role);
        if let Some(entries) = self.roles.get_mut(role) {
            for (index, entry) in entries.iter_mut().enumerate() {
                entry.order = if ordered {
                    Some(index as u32 + 1)
                } else {
                    None
                };
            }
        }
    }

    fn position(&self, role: &RoleName, member: &MemberId) -> RosterResult<usize> {
        self.roles
            .get(role)
            .and_then(|entries| entries.iter().position(|a| a.member_id == *member))
            .ok_or_else(|| not_found(role, member))
    }

    // --- Queries ---

    pub fn contains(&self, role: &RoleName, member: &MemberId) -> bool {
        self.get(role, member).is_some()
    }

    pub fn get(&self, role: &RoleName, member: &MemberId) -> Option<&Assignment> {
        self.roles
            .get(role)
            .and_then(|entries| entries.iter().find(|a| a.member_id == *member))
    }

    /// Entries of `role` in list order
    pub fn entries(&self, role: &RoleName) -> &[Assignment] {
        self.roles.get(role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Member ids of `role` in list order
    pub fn members_of(&self, role: &RoleName) -> Vec<MemberId> {
        self.entries(role)
            .iter()
            .map(|a| a.member_id.clone())
            .collect()
    }

    /// Every role `member` holds, in role-name order
    pub fn roles_of(&self, member: &MemberId) -> Vec<RoleName> {
        self.roles
            .iter()
            .filter(|(_, entries)| entries.iter().any(|a| a.member_id == *member))
            .map(|(role, _)| role.clone())
            .collect()
    }

    /// Roles with at least one assignment
    pub fn role_names(&self) -> Vec<RoleName> {
        self.roles.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.roles.values().flatten()
    }

    /// Total number of assignments
    pub fn len(&self) -> usize {
        self.roles.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // --- Comparison & serialization ---

    /// Flat records: roles in name order, entries in list order
    pub fn to_records(&self) -> Vec<AssignmentRecord> {
        self.iter().map(AssignmentRecord::from).collect()
    }

    /// Records in canonical order: unordered roles sorted by member id
    pub fn canonical_records(&self) -> Vec<AssignmentRecord> {
        let mut records = Vec::with_capacity(self.len());
        for (role, entries) in &self.roles {
            let mut role_records: Vec<AssignmentRecord> =
                entries.iter().map(AssignmentRecord::from).collect();
            if !self.is_ordered(role) {
                role_records.sort_by(|a, b| a.member_id.cmp(&b.member_id));
            }
            records.extend(role_records);
        }
        records
    }

    /// Content digest, independent of insertion history in unordered roles
    pub fn digest(&self) -> SnapshotDigest {
        SnapshotDigest::of_records(&self.canonical_records())
    }

    /// Compare this set against `previous`
    ///
    /// Membership is compared as a set of (role, member) pairs. An entry in
    /// both is "changed" when its detail differs, or, for ordered roles, when
    /// its order value differs.
    pub fn diff(&self, previous: &AssignmentSet) -> AssignmentDiff {
        let current = self.keyed();
        let before = previous.keyed();

        let mut diff = AssignmentDiff::default();

        for (key, assignment) in &current {
            match before.get(key) {
                None => diff.added.push((*assignment).clone()),
                Some(old) => {
                    let detail_changed = old.detail != assignment.detail;
                    let order_changed = self.is_ordered(&key.0) && old.order != assignment.order;
                    if detail_changed || order_changed {
                        diff.changed.push(AssignmentChange {
                            role: key.0.clone(),
                            member_id: key.1.clone(),
                            previous: (*old).clone(),
                            current: (*assignment).clone(),
                        });
                    }
                }
            }
        }

        for (key, assignment) in &before {
            if !current.contains_key(key) {
                diff.removed.push((*assignment).clone());
            }
        }

        diff
    }

    fn keyed(&self) -> BTreeMap<(RoleName, MemberId), &Assignment> {
        self.iter()
            .map(|a| ((a.role.clone(), a.member_id.clone()), a))
            .collect()
    }
}

impl PartialEq for AssignmentSet {
    fn eq(&self, other: &Self) -> bool {
        self.context_id == other.context_id
            && self.canonical_records() == other.canonical_records()
    }
}

impl Eq for AssignmentSet {}

fn not_found(role: &RoleName, member: &MemberId) -> RosterError {
    RosterError::AssignmentNotFound {
        role: role.clone(),
        member: member.clone(),
    }
}
