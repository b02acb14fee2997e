//! Shared generators for roster property tests.

#![allow(dead_code)]

use proptest::prelude::*;
use roster_types::{
    AssignmentSet, ContextId, ExclusivityGroup, MemberId, RoleCatalog, RoleName, RoleSpec,
};

pub const ROLES: [&str; 5] = ["leader", "co_leader", "member", "singer", "usher"];

pub fn catalog() -> RoleCatalog {
    RoleCatalog::new()
        .with_role(RoleSpec::new("leader", "Leader").single())
        .with_role(RoleSpec::new("co_leader", "Co-leader").single())
        .with_role(RoleSpec::new("member", "Member"))
        .with_role(RoleSpec::new("singer", "Singer").ordered())
        .with_role(RoleSpec::new("usher", "Usher"))
        .with_group(
            ExclusivityGroup::new("leadership")
                .with_role("leader")
                .with_role("co_leader")
                .with_role("member"),
        )
}

pub fn arb_role() -> impl Strategy<Value = RoleName> {
    prop::sample::select(ROLES.to_vec()).prop_map(RoleName::new)
}

pub fn arb_member() -> impl Strategy<Value = MemberId> {
    (0u8..8).prop_map(|n| MemberId::new(format!("u{}", n)))
}

pub fn arb_detail() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![Just("alto".to_string()), Just("tenor".to_string())])
}

/// A set built from raw adds, so it may violate exclusivity
pub fn arb_set() -> impl Strategy<Value = AssignmentSet> {
    prop::collection::vec((arb_role(), arb_member(), arb_detail()), 0..20).prop_map(|adds| {
        let mut set = AssignmentSet::new(ContextId::new("prop"), &catalog());
        for (role, member, detail) in adds {
            set.add(&role, &member, detail);
        }
        set
    })
}

/// Every order value of `role` in `set`, in list order
pub fn orders(set: &AssignmentSet, role: &RoleName) -> Vec<Option<u32>> {
    set.entries(role).iter().map(|a| a.order).collect()
}
