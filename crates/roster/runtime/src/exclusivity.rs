//! Exclusivity Validator — keeps one person in at most one role per group
//!
//! Conflicts are resolved by removal, never by rejecting the request
//! outright: assigning someone to a role strips them from every other role
//! of its exclusivity group. The guarded [`ExclusivityValidator::admit`]
//! path additionally respects group precedence, so asking for a lower role
//! never demotes someone who already holds a higher one.

use roster_types::{
    Assignment, AssignmentSet, ExclusivityGroup, Member, MemberId, RoleCatalog, RoleName,
};
use tracing::{debug, warn};

/// Result of checking a candidate assignment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignmentCheck {
    /// Always true: conflicts are resolved by removal
    pub allowed: bool,
    /// Roles in the same group the member currently holds
    pub conflicts: Vec<RoleName>,
    /// The highest-precedence conflicting role ranked above the target
    pub outranked_by: Option<RoleName>,
}

/// What [`ExclusivityValidator::resolve`] did to the set
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ResolveOutcome {
    /// Whether the set changed
    pub changed: bool,
    /// Assignments stripped because they conflicted with the target role
    pub displaced: Vec<Assignment>,
    /// Assignments pushed out of a full bounded role
    pub evicted: Vec<Assignment>,
}

/// Outcome of a precedence-aware admission
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The member now holds the role
    Admitted(ResolveOutcome),
    /// The member already holds a higher role in the same group; set untouched
    Rejected { held_role: RoleName },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted(_))
    }
}

/// Enforces exclusivity groups over assignment sets
#[derive(Clone, Debug, Default)]
pub struct ExclusivityValidator {
    groups: Vec<ExclusivityGroup>,
}

impl ExclusivityValidator {
    pub fn new(catalog: &RoleCatalog) -> Self {
        Self {
            groups: catalog.groups.clone(),
        }
    }

    pub fn groups(&self) -> &[ExclusivityGroup] {
        &self.groups
    }

    pub fn group_of(&self, role: &RoleName) -> Option<&ExclusivityGroup> {
        self.groups.iter().find(|g| g.contains(role))
    }

    /// Report which roles would be vacated by assigning `member` to `role`
    pub fn check_assignment(
        &self,
        set: &AssignmentSet,
        member: &MemberId,
        role: &RoleName,
    ) -> AssignmentCheck {
        let Some(group) = self.group_of(role) else {
            return AssignmentCheck {
                allowed: true,
                conflicts: Vec::new(),
                outranked_by: None,
            };
        };

        let conflicts: Vec<RoleName> = group
            .others(role)
            .filter(|other| set.contains(other, member))
            .cloned()
            .collect();

        AssignmentCheck {
            allowed: true,
            outranked_by: highest_above(group, role, &conflicts),
            conflicts,
        }
    }

    /// Strip `member` from every other role of `role`'s group, then insert
    ///
    /// If `role` already holds `member` the existing assignment is kept as
    /// it is, so resolving twice is the same as resolving once.
    pub fn resolve(
        &self,
        set: &mut AssignmentSet,
        member: &MemberId,
        role: &RoleName,
        detail: Option<String>,
    ) -> ResolveOutcome {
        let mut outcome = ResolveOutcome::default();

        let conflicts = self.check_assignment(set, member, role).conflicts;
        for other in &conflicts {
            if let Ok(removed) = set.remove(other, member) {
                debug!(
                    context = %set.context_id,
                    member = %member,
                    from = %other,
                    to = %role,
                    "Member displaced from conflicting role"
                );
                outcome.displaced.push(removed);
            }
        }

        if !set.contains(role, member) {
            let added = set.add(role, member, detail);
            for evicted in &added.evicted {
                debug!(
                    context = %set.context_id,
                    member = %evicted.member_id,
                    role = %role,
                    "Member evicted from full role"
                );
            }
            outcome.evicted = added.evicted;
            outcome.changed = added.changed;
        }

        outcome.changed |= !outcome.displaced.is_empty();
        outcome
    }

    /// Resolve, unless `member` holds a higher-precedence role of the group
    pub fn admit(
        &self,
        set: &mut AssignmentSet,
        member: &MemberId,
        role: &RoleName,
        detail: Option<String>,
    ) -> Admission {
        let check = self.check_assignment(set, member, role);
        if let Some(held_role) = check.outranked_by {
            warn!(
                context = %set.context_id,
                member = %member,
                requested = %role,
                held = %held_role,
                "Assignment rejected: member holds a higher role"
            );
            return Admission::Rejected { held_role };
        }
        Admission::Admitted(self.resolve(set, member, role, detail))
    }

    /// Candidates that may be offered for `role`
    ///
    /// Drops anyone holding a higher-precedence role of the same group, so a
    /// member picker never lists the current leader or co-leader.
    pub fn eligible_candidates<'a>(
        &self,
        set: &AssignmentSet,
        role: &RoleName,
        candidates: &'a [Member],
    ) -> Vec<&'a Member> {
        candidates
            .iter()
            .filter(|m| self.check_assignment(set, &m.id, role).outranked_by.is_none())
            .collect()
    }

    /// Members holding more than one role of some group
    ///
    /// Empty for any set built only through [`resolve`](Self::resolve) and
    /// [`admit`](Self::admit); server-hydrated data may not be.
    pub fn violations(&self, set: &AssignmentSet) -> Vec<(MemberId, Vec<RoleName>)> {
        let mut members: Vec<MemberId> = set.iter().map(|a| a.member_id.clone()).collect();
        members.sort();
        members.dedup();

        let mut violations = Vec::new();
        for member in members {
            let held = set.roles_of(&member);
            for group in &self.groups {
                let in_group: Vec<RoleName> =
                    held.iter().filter(|r| group.contains(r)).cloned().collect();
                if in_group.len() > 1 {
                    violations.push((member.clone(), in_group));
                }
            }
        }
        violations
    }
}

/// The highest-ranked role in `held` that outranks `target`
fn highest_above(
    group: &ExclusivityGroup,
    target: &RoleName,
    held: &[RoleName],
) -> Option<RoleName> {
    let target_rank = group.rank(target)?;
    held.iter()
        .filter_map(|r| group.rank(r).map(|rank| (rank, r)))
        .filter(|(rank, _)| *rank < target_rank)
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, r)| r.clone())
}
