//! Assignment Reconciler — decides when local edits are worth announcing
//!
//! Screens produce a new assignment set after every interaction. The
//! reconciler holds the last announced snapshot and only reports a change
//! when the structural diff against it is non-empty. The very first
//! evaluation adopts its input as the baseline: hydrating from the server
//! is not a user edit.

use roster_types::{AssignmentDiff, AssignmentSet, SnapshotDigest};
use tracing::debug;

/// Reconciler lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReconcilerState {
    /// Nothing pending
    #[default]
    Idle,
    /// The last evaluation found a difference not yet announced
    Dirty,
    /// The owner was told; the baseline has advanced
    Notified,
}

/// Result of one evaluation
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Evaluation {
    pub should_notify: bool,
    pub diff: AssignmentDiff,
}

/// Compare `current` against `previous` without any held state
pub fn compare(current: &AssignmentSet, previous: &AssignmentSet) -> Evaluation {
    if current.digest() == previous.digest() {
        return Evaluation::default();
    }
    let diff = current.diff(previous);
    Evaluation {
        should_notify: !diff.is_empty(),
        diff,
    }
}

/// Tracks the last announced snapshot for one assignment context
#[derive(Clone, Debug, Default)]
pub struct AssignmentReconciler {
    /// Last announced snapshot; `None` until the first evaluation
    baseline: Option<AssignmentSet>,
    /// Digest of `baseline`, kept to short-circuit unchanged evaluations
    baseline_digest: Option<SnapshotDigest>,
    state: ReconcilerState,
}

impl AssignmentReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ReconcilerState {
        self.state
    }

    /// Whether the initial-mount evaluation has happened
    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn baseline(&self) -> Option<&AssignmentSet> {
        self.baseline.as_ref()
    }

    /// Compare `current` against the held baseline
    ///
    /// The first call never notifies; it records `current` as the baseline.
    pub fn evaluate(&mut self, current: &AssignmentSet) -> Evaluation {
        let digest = current.digest();

        if self.baseline.is_none() {
            debug!(context = %current.context_id, "Reconciler baseline adopted");
            self.baseline = Some(current.clone());
            self.baseline_digest = Some(digest);
            self.state = ReconcilerState::Idle;
            return Evaluation::default();
        }

        if self.baseline_digest == Some(digest) {
            self.state = ReconcilerState::Idle;
            return Evaluation::default();
        }

        let diff = match &self.baseline {
            Some(baseline) => current.diff(baseline),
            None => AssignmentDiff::default(),
        };
        self.state = if diff.is_empty() {
            ReconcilerState::Idle
        } else {
            ReconcilerState::Dirty
        };

        debug!(
            context = %current.context_id,
            state = ?self.state,
            changes = diff.len(),
            "Reconciler evaluated"
        );

        Evaluation {
            should_notify: !diff.is_empty(),
            diff,
        }
    }

    /// Record that the owner was told about `current`
    pub fn mark_notified(&mut self, current: &AssignmentSet) {
        self.baseline_digest = Some(current.digest());
        self.baseline = Some(current.clone());
        self.state = ReconcilerState::Notified;
    }

    /// Evaluate and, if anything changed, call `on_update` and advance
    ///
    /// Returns whether the callback ran.
    pub fn reconcile<F>(&mut self, current: &AssignmentSet, on_update: F) -> bool
    where
        F: FnOnce(&AssignmentSet, &AssignmentDiff),
    {
        let evaluation = self.evaluate(current);
        if !evaluation.should_notify {
            return false;
        }
        on_update(current, &evaluation.diff);
        self.mark_notified(current);
        true
    }

    /// Replace the baseline without notifying, e.g. after a save or reload
    pub fn rebase(&mut self, current: &AssignmentSet) {
        self.baseline_digest = Some(current.digest());
        self.baseline = Some(current.clone());
        self.state = ReconcilerState::Idle;
    }
}
