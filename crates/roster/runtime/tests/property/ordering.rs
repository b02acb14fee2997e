//! Property tests: ordered roles always number their entries 1..N.

#[path = "strategies.rs"]
mod strategies;

use proptest::prelude::*;
use roster_types::RoleName;
use strategies::*;

#[derive(Clone, Debug)]
enum Op {
    Add(u8),
    Remove(u8),
    Reorder(u8, usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..6).prop_map(Op::Add),
        (0u8..6).prop_map(Op::Remove),
        (0u8..6, 0usize..8).prop_map(|(m, i)| Op::Reorder(m, i)),
    ]
}

proptest! {
    /// Any mix of add/remove/reorder keeps singer orders dense and unique.
    #[test]
    fn ordered_role_stays_dense(ops in prop::collection::vec(arb_op(), 0..40)) {
        let singer = RoleName::new("singer");
        let mut set = roster_types::AssignmentSet::new(
            roster_types::ContextId::new("prop"),
            &catalog(),
        );

        for op in ops {
            let before = set.to_records();
            let result = match op {
                Op::Add(m) => {
                    set.add(&singer, &roster_types::MemberId::new(format!("s{}", m)), None);
                    Ok(())
                }
                Op::Remove(m) => set
                    .remove(&singer, &roster_types::MemberId::new(format!("s{}", m)))
                    .map(|_| ()),
                Op::Reorder(m, index) => {
                    set.reorder(&singer, &roster_types::MemberId::new(format!("s{}", m)), index)
                }
            };

            // Failed mutations are all-or-nothing
            if result.is_err() {
                prop_assert_eq!(set.to_records(), before);
            }

            let expected: Vec<Option<u32>> =
                (1..=set.entries(&singer).len() as u32).map(Some).collect();
            prop_assert_eq!(orders(&set, &singer), expected);
        }
    }
}
