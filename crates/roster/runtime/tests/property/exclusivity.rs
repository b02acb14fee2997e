//! Property tests: resolution keeps members in at most one role per group.

#[path = "strategies.rs"]
mod strategies;

use proptest::prelude::*;
use roster_runtime::ExclusivityValidator;
use strategies::*;

proptest! {
    /// After resolve, the member holds at most one role of the target's group.
    #[test]
    fn resolve_leaves_one_role_per_group(
        set in arb_set(),
        member in arb_member(),
        role in arb_role(),
    ) {
        let catalog = catalog();
        let validator = ExclusivityValidator::new(&catalog);
        let mut set = set;

        validator.resolve(&mut set, &member, &role, None);

        prop_assert!(set.contains(&role, &member));
        if let Some(group) = catalog.group_of(&role) {
            let held = set
                .roles_of(&member)
                .into_iter()
                .filter(|r| group.contains(r))
                .count();
            prop_assert_eq!(held, 1);
        }
    }

    /// Resolving twice is the same as resolving once.
    #[test]
    fn resolve_is_idempotent(
        set in arb_set(),
        member in arb_member(),
        role in arb_role(),
        detail in arb_detail(),
    ) {
        let validator = ExclusivityValidator::new(&catalog());
        let mut once = set;
        validator.resolve(&mut once, &member, &role, detail.clone());
        let mut twice = once.clone();
        let second = validator.resolve(&mut twice, &member, &role, detail);

        prop_assert!(!second.changed);
        prop_assert_eq!(once.to_records(), twice.to_records());
    }

    /// A sequence of admissions never produces an exclusivity violation.
    #[test]
    fn admissions_never_violate_groups(
        requests in prop::collection::vec((arb_member(), arb_role()), 0..30),
    ) {
        let catalog = catalog();
        let validator = ExclusivityValidator::new(&catalog);
        let mut set = roster_types::AssignmentSet::new(
            roster_types::ContextId::new("prop"),
            &catalog,
        );

        for (member, role) in requests {
            validator.admit(&mut set, &member, &role, None);
            prop_assert!(validator.violations(&set).is_empty());
            for (role, capacity) in [("leader", 1), ("co_leader", 1)] {
                prop_assert!(set.entries(&roster_types::RoleName::new(role)).len() <= capacity);
            }
        }
    }
}
