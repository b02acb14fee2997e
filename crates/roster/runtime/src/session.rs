//! Selection Session — the open-picker / toggle / commit-or-cancel cycle
//!
//! A session edits a working selection for one role. Nothing touches the
//! assignment set until [`SelectionSession::commit`], which builds a new set
//! and leaves the caller's set as it was; cancelling simply drops the
//! working selection.

use crate::exclusivity::{Admission, ExclusivityValidator};
use roster_types::{
    Assignment, AssignmentSet, Member, MemberId, RoleName, RosterError, RosterResult,
};
use tracing::info;

/// Session lifecycle
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Closed,
    Open {
        role: RoleName,
        /// Membership of the role when the picker opened
        initial: Vec<MemberId>,
        /// Working selection, in the order members were picked
        working: Vec<MemberId>,
    },
}

/// Why a pick was left out of a commit
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectionReason {
    /// The member holds a higher role in the same exclusivity group
    HigherRole(RoleName),
    /// More new picks than the role has slots; only the latest were kept
    RoleFull { capacity: usize },
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::HigherRole(role) => write!(f, "already holds {}", role),
            RejectionReason::RoleFull { capacity } => {
                write!(f, "role holds only {} and was filled by later picks", capacity)
            }
        }
    }
}

/// A pick for `role` that was not applied; the member's roles are untouched
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedSelection {
    pub member_id: MemberId,
    pub reason: RejectionReason,
}

/// Everything a commit did, for the screen to apply and report
#[derive(Clone, Debug)]
pub struct CommitOutcome {
    /// The role that was edited
    pub role: RoleName,
    /// The updated set
    pub set: AssignmentSet,
    /// Members newly assigned to the role, all present in `set`
    ///
    /// Picker commits never carry a detail; call `set_detail` afterwards.
    pub added: Vec<MemberId>,
    /// Members deselected from the role; their detail goes with them and a
    /// later re-pick starts without one
    pub removed: Vec<MemberId>,
    /// Picks refused for a higher role or a full role
    pub rejected: Vec<RejectedSelection>,
    /// Assignments removed from conflicting roles or evicted from full ones
    pub displaced: Vec<Assignment>,
}

impl CommitOutcome {
    /// Whether the screen should warn about members moved or refused
    pub fn needs_attention(&self) -> bool {
        !self.rejected.is_empty() || !self.displaced.is_empty()
    }
}

/// Picker state for one role at a time
#[derive(Clone, Debug, Default)]
pub struct SelectionSession {
    state: SessionState,
}

impl SelectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Open { .. })
    }

    /// The role being edited, if open
    pub fn role(&self) -> Option<&RoleName> {
        match &self.state {
            SessionState::Open { role, .. } => Some(role),
            SessionState::Closed => None,
        }
    }

    /// The working selection, empty when closed
    pub fn selection(&self) -> &[MemberId] {
        match &self.state {
            SessionState::Open { working, .. } => working,
            SessionState::Closed => &[],
        }
    }

    pub fn is_selected(&self, member: &MemberId) -> bool {
        self.selection().contains(member)
    }

    /// Open the picker for `role`, seeded with its current members
    ///
    /// Reopening discards any previous working selection.
    pub fn open(&mut self, role: RoleName, current_members: Vec<MemberId>) {
        let mut initial = Vec::with_capacity(current_members.len());
        for member in current_members {
            if !initial.contains(&member) {
                initial.push(member);
            }
        }
        self.state = SessionState::Open {
            role,
            working: initial.clone(),
            initial,
        };
    }

    /// Flip `member` in the working selection
    pub fn toggle(&mut self, member: &MemberId) -> RosterResult<bool> {
        let working = self.working_mut("toggle")?;
        if let Some(position) = working.iter().position(|m| m == member) {
            working.remove(position);
            Ok(false)
        } else {
            working.push(member.clone());
            Ok(true)
        }
    }

    /// Select every member of the visible subset
    pub fn select_all(&mut self, visible: &[Member]) -> RosterResult<()> {
        let working = self.working_mut("select all")?;
        for member in visible {
            if !working.contains(&member.id) {
                working.push(member.id.clone());
            }
        }
        Ok(())
    }

    /// Deselect every member of the visible subset; hidden ones stay
    pub fn deselect_all(&mut self, visible: &[Member]) -> RosterResult<()> {
        let working = self.working_mut("deselect all")?;
        working.retain(|id| !visible.iter().any(|m| m.id == *id));
        Ok(())
    }

    /// Close without touching anything; a no-op when already closed
    pub fn cancel(&mut self) {
        self.state = SessionState::Closed;
    }

    /// Apply the working selection to a copy of `set` and close
    ///
    /// Newly picked members go through [`ExclusivityValidator::admit`];
    /// deselected members are removed. When a bounded role gets more new
    /// picks than its capacity, only the latest eligible picks are admitted
    /// and the rest are rejected before anyone's roles change. Current
    /// holders that were kept can still be evicted by the admitted picks.
    /// On error the session stays as it was.
    pub fn commit(
        &mut self,
        set: &AssignmentSet,
        validator: &ExclusivityValidator,
    ) -> RosterResult<CommitOutcome> {
        let SessionState::Open {
            role,
            initial,
            working,
        } = &self.state
        else {
            return Err(RosterError::InvalidState(
                "cannot commit a closed selection session".into(),
            ));
        };

        let mut next = set.clone();
        let mut outcome = CommitOutcome {
            role: role.clone(),
            set: set.clone(),
            added: Vec::new(),
            removed: Vec::new(),
            rejected: Vec::new(),
            displaced: Vec::new(),
        };

        for member in initial.iter().filter(|m| !working.contains(m)) {
            if next.contains(role, member) {
                next.remove(role, member)?;
                outcome.removed.push(member.clone());
            }
        }

        let picks: Vec<&MemberId> = working
            .iter()
            .filter(|m| !next.contains(role, m))
            .collect();
        let eligible: Vec<&MemberId> = picks
            .iter()
            .copied()
            .filter(|m| validator.check_assignment(&next, m, role).outranked_by.is_none())
            .collect();
        let capacity = next.capacity(role).map(|c| c.max(1));
        let overflow: &[&MemberId] = match capacity {
            Some(capacity) if eligible.len() > capacity => &eligible[..eligible.len() - capacity],
            _ => &[],
        };

        for member in picks {
            if overflow.contains(&member) {
                outcome.rejected.push(RejectedSelection {
                    member_id: member.clone(),
                    reason: RejectionReason::RoleFull {
                        capacity: capacity.unwrap_or(1),
                    },
                });
                continue;
            }
            match validator.admit(&mut next, member, role, None) {
                Admission::Admitted(resolved) => {
                    outcome.added.push(member.clone());
                    outcome.displaced.extend(resolved.displaced);
                    outcome.displaced.extend(resolved.evicted);
                }
                Admission::Rejected { held_role } => {
                    outcome.rejected.push(RejectedSelection {
                        member_id: member.clone(),
                        reason: RejectionReason::HigherRole(held_role),
                    });
                }
            }
        }

        info!(
            context = %next.context_id,
            role = %role,
            added = outcome.added.len(),
            removed = outcome.removed.len(),
            rejected = outcome.rejected.len(),
            displaced = outcome.displaced.len(),
            "Selection committed"
        );

        outcome.set = next;
        self.state = SessionState::Closed;
        Ok(outcome)
    }

    fn working_mut(&mut self, operation: &str) -> RosterResult<&mut Vec<MemberId>> {
        match &mut self.state {
            SessionState::Open { working, .. } => Ok(working),
            SessionState::Closed => Err(RosterError::InvalidState(format!(
                "cannot {} in a closed selection session",
                operation
            ))),
        }
    }
}
