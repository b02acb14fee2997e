//! Assignment Editor — one editing session for one assignment context
//!
//! The editor owns the context's assignment set for as long as the screen
//! is mounted. It composes the pieces:
//!
//! - [`SelectionSession`] — one open picker at a time
//! - [`ExclusivityValidator`] — resolves conflicts on commit and add
//! - [`AssignmentReconciler`] — decides when the owner hears about edits
//!
//! and talks to the collaborators only when asked: candidates are fetched
//! through a [`MemberDirectory`], saves go through an [`AssignmentStore`].

use crate::{
    directory::{filter_candidates, MemberDirectory},
    exclusivity::{Admission, ExclusivityValidator},
    reconciler::{AssignmentReconciler, ReconcilerState},
    session::{CommitOutcome, SelectionSession},
    store::AssignmentStore,
};
use roster_types::{
    Assignment, AssignmentDiff, AssignmentRecord, AssignmentSet, ContextId, Member, MemberId,
    RoleCatalog, RoleName, RosterError, RosterResult,
};
use tracing::{info, warn};

/// Candidates returned by [`AssignmentEditor::load_candidates`]
///
/// A directory failure yields an empty list with the error kept alongside,
/// so the screen can show it without the editor retrying.
#[derive(Clone, Debug, Default)]
pub struct CandidateList {
    pub members: Vec<Member>,
    pub error: Option<RosterError>,
}

/// What a save attempt did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing differed from the last saved state; the store was not called
    Unchanged,
    /// The store accepted this many records
    Saved { records: usize },
}

/// Editing session for one assignment context
pub struct AssignmentEditor {
    /// Role layout and groups this context was opened with
    catalog: RoleCatalog,
    /// The working set
    set: AssignmentSet,
    /// State at the last hydrate or successful save
    saved: AssignmentSet,
    validator: ExclusivityValidator,
    reconciler: AssignmentReconciler,
    session: SelectionSession,
}

impl AssignmentEditor {
    /// Start with an empty set, as creation flows do
    pub fn new(context_id: ContextId, catalog: &RoleCatalog) -> Self {
        let set = AssignmentSet::new(context_id, catalog);
        let mut reconciler = AssignmentReconciler::new();
        reconciler.evaluate(&set);

        Self {
            catalog: catalog.clone(),
            saved: set.clone(),
            set,
            validator: ExclusivityValidator::new(catalog),
            reconciler,
            session: SelectionSession::new(),
        }
    }

    /// Start from server data; nothing is reported as changed
    pub fn hydrated(
        context_id: ContextId,
        catalog: &RoleCatalog,
        records: Vec<AssignmentRecord>,
    ) -> Self {
        let mut editor = Self::new(context_id, catalog);
        editor.hydrate(records);
        editor
    }

    /// Replace the working set with server data and make it the baseline
    ///
    /// Any open picker is closed.
    pub fn hydrate(&mut self, records: Vec<AssignmentRecord>) {
        let context_id = self.set.context_id.clone();
        self.set = AssignmentSet::from_records(context_id, &self.catalog, records);
        for (member, roles) in self.validator.violations(&self.set) {
            warn!(
                context = %self.set.context_id,
                member = %member,
                roles = ?roles,
                "Hydrated data holds member in exclusive roles"
            );
        }
        self.saved = self.set.clone();
        self.reconciler.rebase(&self.set);
        self.session.cancel();
    }

    // --- Queries ---

    pub fn context_id(&self) -> &ContextId {
        &self.set.context_id
    }

    pub fn assignments(&self) -> &AssignmentSet {
        &self.set
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    pub fn validator(&self) -> &ExclusivityValidator {
        &self.validator
    }

    pub fn reconciler_state(&self) -> ReconcilerState {
        self.reconciler.state()
    }

    pub fn session(&self) -> &SelectionSession {
        &self.session
    }

    /// Difference between the working set and the last saved state
    pub fn pending_changes(&self) -> AssignmentDiff {
        self.set.diff(&self.saved)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        !self.pending_changes().is_empty()
    }

    // --- Candidates ---

    /// Fetch candidates for this context, narrowed by `query`
    pub async fn load_candidates(
        &self,
        directory: &dyn MemberDirectory,
        query: &str,
    ) -> CandidateList {
        match directory.list_candidates(&self.set.context_id).await {
            Ok(members) => CandidateList {
                members: filter_candidates(&members, query)
                    .into_iter()
                    .cloned()
                    .collect(),
                error: None,
            },
            Err(error) => {
                warn!(
                    context = %self.set.context_id,
                    error = %error,
                    "Candidate lookup failed"
                );
                CandidateList {
                    members: Vec::new(),
                    error: Some(error),
                }
            }
        }
    }

    /// Candidates that may be offered for `role`
    pub fn eligible_candidates<'a>(
        &self,
        role: &RoleName,
        candidates: &'a [Member],
    ) -> Vec<&'a Member> {
        self.validator.eligible_candidates(&self.set, role, candidates)
    }

    // --- Selection ---

    /// Open the picker for `role`; only one role may be open at a time
    pub fn open_selection(&mut self, role: RoleName) -> RosterResult<()> {
        if let Some(open) = self.session.role() {
            return Err(RosterError::InvalidState(format!(
                "selection for role '{}' is already open",
                open
            )));
        }
        let current = self.set.members_of(&role);
        self.session.open(role, current);
        Ok(())
    }

    pub fn toggle(&mut self, member: &MemberId) -> RosterResult<bool> {
        self.session.toggle(member)
    }

    pub fn select_all(&mut self, visible: &[Member]) -> RosterResult<()> {
        self.session.select_all(visible)
    }

    pub fn deselect_all(&mut self, visible: &[Member]) -> RosterResult<()> {
        self.session.deselect_all(visible)
    }

    /// Close the picker without changing anything
    pub fn cancel_selection(&mut self) {
        self.session.cancel();
    }

    /// Commit the open picker and tell `on_update` if anything changed
    pub fn commit_selection<F>(&mut self, on_update: F) -> RosterResult<CommitOutcome>
    where
        F: FnOnce(&AssignmentSet, &AssignmentDiff),
    {
        let outcome = self.session.commit(&self.set, &self.validator)?;
        self.set = outcome.set.clone();
        self.reconciler.reconcile(&self.set, on_update);
        Ok(outcome)
    }

    // --- Direct edits ---

    /// Assign `member` to `role` outside a picker, respecting precedence
    pub fn add<F>(
        &mut self,
        role: &RoleName,
        member: &MemberId,
        detail: Option<String>,
        on_update: F,
    ) -> Admission
    where
        F: FnOnce(&AssignmentSet, &AssignmentDiff),
    {
        let admission = self.validator.admit(&mut self.set, member, role, detail);
        self.reconciler.reconcile(&self.set, on_update);
        admission
    }

    pub fn remove<F>(
        &mut self,
        role: &RoleName,
        member: &MemberId,
        on_update: F,
    ) -> RosterResult<Assignment>
    where
        F: FnOnce(&AssignmentSet, &AssignmentDiff),
    {
        let removed = self.set.remove(role, member)?;
        self.reconciler.reconcile(&self.set, on_update);
        Ok(removed)
    }

    pub fn set_detail<F>(
        &mut self,
        role: &RoleName,
        member: &MemberId,
        detail: Option<String>,
        on_update: F,
    ) -> RosterResult<()>
    where
        F: FnOnce(&AssignmentSet, &AssignmentDiff),
    {
        self.set.set_detail(role, member, detail)?;
        self.reconciler.reconcile(&self.set, on_update);
        Ok(())
    }

    pub fn reorder<F>(
        &mut self,
        role: &RoleName,
        member: &MemberId,
        new_index: usize,
        on_update: F,
    ) -> RosterResult<()>
    where
        F: FnOnce(&AssignmentSet, &AssignmentDiff),
    {
        self.set.reorder(role, member, new_index)?;
        self.reconciler.reconcile(&self.set, on_update);
        Ok(())
    }

    // --- Persistence ---

    /// Save the working set if it differs from the last saved state
    ///
    /// A store failure leaves the editor exactly as it was, so the save can
    /// be attempted again.
    pub async fn save(&mut self, store: &dyn AssignmentStore) -> RosterResult<SaveOutcome> {
        let pending = self.pending_changes();
        if pending.is_empty() {
            return Ok(SaveOutcome::Unchanged);
        }

        let records = self.set.to_records();
        let count = records.len();
        if let Err(error) = store.save_assignments(&self.set.context_id, records).await {
            warn!(
                context = %self.set.context_id,
                error = %error,
                "Saving assignments failed"
            );
            return Err(error);
        }

        info!(
            context = %self.set.context_id,
            records = count,
            changes = pending.len(),
            "Assignments saved"
        );

        self.saved = self.set.clone();
        self.reconciler.rebase(&self.set);
        Ok(SaveOutcome::Saved { records: count })
    }

    /// Reload from the store, discarding unsaved edits
    pub async fn reload(&mut self, store: &dyn AssignmentStore) -> RosterResult<()> {
        let records = store.load_assignments(&self.set.context_id).await?;
        self.hydrate(records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{directory::InMemoryDirectory, store::InMemoryAssignmentStore, RosterConfig};

    fn catalog() -> RoleCatalog {
        RosterConfig::default().into_catalog().unwrap()
    }

    fn role(name: &str) -> RoleName {
        RoleName::new(name)
    }

    fn member(id: &str) -> MemberId {
        MemberId::new(id)
    }

    fn no_op(_: &AssignmentSet, _: &AssignmentDiff) {}

    fn server_records() -> Vec<AssignmentRecord> {
        vec![
            AssignmentRecord::new("u1", "leader"),
            AssignmentRecord::new("u2", "co_leader"),
            AssignmentRecord::new("u3", "member"),
            AssignmentRecord::new("u4", "member"),
        ]
    }

    #[test]
    fn test_hydrate_does_not_notify() {
        let editor =
            AssignmentEditor::hydrated(ContextId::new("group-1"), &catalog(), server_records());

        assert_eq!(editor.assignments().len(), 4);
        assert!(!editor.has_unsaved_changes());
        assert_eq!(editor.reconciler_state(), ReconcilerState::Idle);
    }

    #[test]
    fn test_only_one_selection_open() {
        let mut editor = AssignmentEditor::new(ContextId::new("event-1"), &catalog());
        editor.open_selection(role("usher")).unwrap();

        let err = editor.open_selection(role("tech")).unwrap_err();
        assert!(matches!(err, RosterError::InvalidState(_)));

        editor.cancel_selection();
        editor.open_selection(role("tech")).unwrap();
        assert_eq!(editor.session().role(), Some(&role("tech")));
    }

    #[test]
    fn test_commit_notifies_owner_once() {
        let mut editor = AssignmentEditor::new(ContextId::new("event-1"), &catalog());
        let mut notified = Vec::new();

        editor.open_selection(role("usher")).unwrap();
        editor.toggle(&member("u1")).unwrap();
        editor
            .commit_selection(|_, diff| notified.push(diff.len()))
            .unwrap();

        // Reopening and committing the same selection is not a change
        editor.open_selection(role("usher")).unwrap();
        editor
            .commit_selection(|_, diff| notified.push(diff.len()))
            .unwrap();

        assert_eq!(notified, vec![1]);
        assert_eq!(editor.reconciler_state(), ReconcilerState::Idle);
        assert!(editor.has_unsaved_changes());
    }

    #[test]
    fn test_commit_without_open_selection_fails() {
        let mut editor = AssignmentEditor::new(ContextId::new("event-1"), &catalog());
        let err = editor.commit_selection(no_op).unwrap_err();
        assert!(matches!(err, RosterError::InvalidState(_)));
    }

    #[test]
    fn test_direct_edits_go_through_reconciler() {
        let mut editor = AssignmentEditor::new(ContextId::new("event-1"), &catalog());
        let mut calls = 0;

        editor.add(&role("song"), &member("s1"), Some("G".into()), |_, _| calls += 1);
        editor.add(&role("song"), &member("s2"), None, |_, _| calls += 1);
        editor
            .reorder(&role("song"), &member("s2"), 0, |_, _| calls += 1)
            .unwrap();
        editor
            .set_detail(&role("song"), &member("s2"), Some("D".into()), |_, _| calls += 1)
            .unwrap();
        editor
            .remove(&role("song"), &member("s1"), |_, _| calls += 1)
            .unwrap();

        assert_eq!(calls, 5);
        assert!(editor
            .reorder(&role("song"), &member("s2"), 3, |_, _| calls += 1)
            .is_err());
        assert_eq!(calls, 5);
    }

    #[test]
    fn test_add_lower_role_is_rejected() {
        let mut editor =
            AssignmentEditor::hydrated(ContextId::new("group-1"), &catalog(), server_records());
        let mut calls = 0;

        let admission = editor.add(&role("member"), &member("u1"), None, |_, _| calls += 1);

        assert!(!admission.is_admitted());
        assert_eq!(calls, 0);
        assert_eq!(editor.assignments().roles_of(&member("u1")), vec![role("leader")]);
    }

    #[tokio::test]
    async fn test_save_skips_when_unchanged() {
        let store = InMemoryAssignmentStore::new();
        let mut editor =
            AssignmentEditor::hydrated(ContextId::new("group-1"), &catalog(), server_records());

        assert_eq!(editor.save(&store).await.unwrap(), SaveOutcome::Unchanged);
        assert_eq!(store.save_count().await, 0);
    }

    #[tokio::test]
    async fn test_save_persists_flat_records() {
        let store = InMemoryAssignmentStore::new();
        let context = ContextId::new("event-7");
        let mut editor = AssignmentEditor::new(context.clone(), &catalog());

        editor.add(&role("singer"), &member("s1"), Some("alto".into()), no_op);
        editor.add(&role("usher"), &member("u1"), None, no_op);

        let outcome = editor.save(&store).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Saved { records: 2 });
        assert!(!editor.has_unsaved_changes());

        let stored = store.load_assignments(&context).await.unwrap();
        assert_eq!(
            stored,
            vec![
                AssignmentRecord::new("s1", "singer")
                    .with_detail("alto")
                    .with_order(1),
                AssignmentRecord::new("u1", "usher"),
            ]
        );

        assert_eq!(editor.save(&store).await.unwrap(), SaveOutcome::Unchanged);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_changes() {
        let store = InMemoryAssignmentStore::new();
        store.set_failure(Some("timeout".into())).await;
        let mut editor = AssignmentEditor::new(ContextId::new("event-1"), &catalog());
        editor.add(&role("tech"), &member("t1"), None, no_op);

        let err = editor.save(&store).await.unwrap_err();
        assert_eq!(err, RosterError::Persistence("timeout".into()));
        assert!(editor.has_unsaved_changes());

        store.set_failure(None).await;
        assert_eq!(
            editor.save(&store).await.unwrap(),
            SaveOutcome::Saved { records: 1 }
        );
    }

    #[tokio::test]
    async fn test_reload_discards_unsaved_edits() {
        let store = InMemoryAssignmentStore::new();
        let context = ContextId::new("group-1");
        store
            .save_assignments(&context, server_records())
            .await
            .unwrap();

        let mut editor = AssignmentEditor::new(context, &catalog());
        editor.reload(&store).await.unwrap();
        assert_eq!(editor.assignments().len(), 4);

        editor.add(&role("usher"), &member("u9"), None, no_op);
        assert!(editor.has_unsaved_changes());
        editor.reload(&store).await.unwrap();
        assert!(!editor.has_unsaved_changes());
        assert_eq!(editor.assignments().len(), 4);
    }

    #[tokio::test]
    async fn test_load_candidates() {
        let directory = InMemoryDirectory::with_members(vec![
            Member::new("u1", "Anna Lee", "anna@church.org"),
            Member::new("u2", "Ben Okafor", "ben@church.org"),
        ]);
        let editor = AssignmentEditor::new(ContextId::new("event-1"), &catalog());

        let all = editor.load_candidates(&directory, "").await;
        assert_eq!(all.members.len(), 2);
        assert!(all.error.is_none());

        let filtered = editor.load_candidates(&directory, "okafor").await;
        assert_eq!(filtered.members[0].id, member("u2"));

        directory.set_failure(Some("offline".into())).await;
        let failed = editor.load_candidates(&directory, "").await;
        assert!(failed.members.is_empty());
        assert_eq!(failed.error, Some(RosterError::Directory("offline".into())));
    }
}
