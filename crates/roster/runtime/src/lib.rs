//! Roster Runtime
//!
//! This crate keeps people-to-role assignments consistent while a screen
//! edits them: conflicting roles are resolved, pickers commit or cancel as a
//! unit, and the owning screen is told about a change only when there is
//! one.
//!
//! # Architecture
//!
//! The [`AssignmentEditor`] is the main entry point. It owns one context's
//! [`AssignmentSet`](roster_types::AssignmentSet) and composes:
//!
//! - [`ExclusivityValidator`] — one person, at most one role per exclusivity group
//! - [`SelectionSession`] — open picker → toggle → commit or cancel
//! - [`AssignmentReconciler`] — Idle → Dirty → Notified change detection
//! - [`MemberDirectory`] / [`AssignmentStore`] — the collaborator boundaries
//! - [`RosterConfig`] — roles and exclusivity groups as configuration data
//!
//! # Key Invariants
//!
//! 1. After any resolution, a member holds at most one role per group
//! 2. Ordered roles always carry order values 1..N
//! 3. The first evaluation after mounting never notifies
//! 4. A cancelled selection leaves the assignment set untouched
//! 5. The core performs no I/O of its own; collaborators are called only
//!    when the screen asks
//!
//! # Example
//!
//! ```rust
//! use roster_runtime::{AssignmentEditor, RosterConfig};
//! use roster_types::{AssignmentRecord, ContextId, MemberId, RoleName};
//!
//! let catalog = RosterConfig::default().into_catalog().unwrap();
//! let mut editor = AssignmentEditor::hydrated(
//!     ContextId::new("group-1"),
//!     &catalog,
//!     vec![
//!         AssignmentRecord::new("u1", "leader"),
//!         AssignmentRecord::new("u3", "member"),
//!     ],
//! );
//!
//! // Pick u3 as the new leader: u3 leaves the member list, u1 is replaced
//! editor.open_selection(RoleName::new("leader")).unwrap();
//! editor.toggle(&MemberId::new("u3")).unwrap();
//! let outcome = editor.commit_selection(|_, _| {}).unwrap();
//!
//! assert_eq!(outcome.set.members_of(&RoleName::new("leader")), vec![MemberId::new("u3")]);
//! assert!(outcome.set.members_of(&RoleName::new("member")).is_empty());
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod directory;
pub mod editor;
pub mod exclusivity;
pub mod reconciler;
pub mod session;
pub mod store;

// Re-export main types for convenience
pub use config::{GroupConfig, RoleConfig, RosterConfig};
pub use directory::{filter_candidates, InMemoryDirectory, MemberDirectory};
pub use editor::{AssignmentEditor, CandidateList, SaveOutcome};
pub use exclusivity::{Admission, AssignmentCheck, ExclusivityValidator, ResolveOutcome};
pub use reconciler::{compare, AssignmentReconciler, Evaluation, ReconcilerState};
pub use session::{
    CommitOutcome, RejectedSelection, RejectionReason, SelectionSession, SessionState,
};
pub use store::{AssignmentStore, InMemoryAssignmentStore};
