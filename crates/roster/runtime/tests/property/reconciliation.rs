//! Property tests: diffing and change detection.

#[path = "strategies.rs"]
mod strategies;

use proptest::prelude::*;
use roster_runtime::{compare, AssignmentReconciler};
use strategies::*;

proptest! {
    /// A set never differs from itself.
    #[test]
    fn diff_is_reflexive(set in arb_set()) {
        prop_assert!(set.diff(&set).is_empty());
        prop_assert!(!compare(&set, &set).should_notify);
    }

    /// The first evaluation never notifies, whatever the initial content.
    #[test]
    fn first_evaluation_never_notifies(set in arb_set()) {
        let mut reconciler = AssignmentReconciler::new();
        prop_assert!(!reconciler.evaluate(&set).should_notify);
    }

    /// Digest equality and an empty diff agree.
    #[test]
    fn digest_matches_diff(a in arb_set(), b in arb_set()) {
        let same_digest = a.digest() == b.digest();
        prop_assert_eq!(same_digest, a.diff(&b).is_empty());
    }

    /// Notifications fire exactly when the set differs from the last one announced.
    #[test]
    fn reconciler_notifies_on_difference(sets in prop::collection::vec(arb_set(), 1..6)) {
        let mut reconciler = AssignmentReconciler::new();
        let mut last = None;

        for set in &sets {
            let expected = match &last {
                None => false,
                Some(previous) => !set.diff(previous).is_empty(),
            };
            let notified = reconciler.reconcile(set, |_, _| {});
            prop_assert_eq!(notified, expected);
            if last.is_none() || notified {
                last = Some(set.clone());
            }
        }
    }
}
