use indoc::indoc;

use crate::build::Builder;
use crate::test_utils::{TRAFFIC, analyzed, infs_concluding, value_id};

#[test]
fn single_test_resolves_two_way_table() {
    let (table, independents) = analyzed(indoc! {"
        @B,A
        x,1
        y,2
    "});

    let mut builder = Builder::new(&table, false);
    let root = builder.build(&independents, table.inferences(), independents.len() as u32);

    let node = builder.node(root);
    assert_eq!(node.test, Some(value_id(&table, "A", "1")));
    assert_eq!(node.infs_hold, infs_concluding(&table, "B", "x"));
    assert_eq!(node.infs_fall, infs_concluding(&table, "B", "y"));
    assert_eq!(node.child_hold, None);
    assert_eq!(node.child_fall, None);
    assert_eq!(builder.test_depth(root), 1);
}

#[test]
fn repeated_frontiers_share_a_node() {
    let (table, independents) = analyzed(indoc! {"
        @B,A
        x,1
        y,2
    "});

    let mut builder = Builder::new(&table, false);
    let bound = independents.len() as u32;
    let first = builder.build(&independents, table.inferences(), bound);
    let second = builder.build(&independents, table.inferences(), bound);

    assert_eq!(first, second);
    assert_eq!(builder.node_count(), 1);
}

#[test]
fn grid_table_needs_one_test_per_name() {
    let (table, independents) = analyzed(indoc! {"
        @C,N,M
        a,x,p
        b,x,q
        c,y,p
        d,y,q
    "});

    let mut builder = Builder::new(&table, false);
    let root = builder.build(&independents, table.inferences(), independents.len() as u32);

    assert_eq!(builder.test_depth(root), 2);
}

#[test]
fn traffic_light_depth_is_bounded_by_name_count() {
    let (table, independents) = analyzed(TRAFFIC);

    let mut builder = Builder::new(&table, false);
    let root = builder.build(&independents, table.inferences(), independents.len() as u32);

    // Three independent names: canStop, isClose, signal.
    assert!(builder.test_depth(root) <= 3);
}

#[test]
fn quick_mode_never_beats_full_search() {
    let (table, independents) = analyzed(TRAFFIC);
    let bound = independents.len() as u32;

    let mut full = Builder::new(&table, false);
    let full_root = full.build(&independents, table.inferences(), bound);
    let mut quick = Builder::new(&table, true);
    let quick_root = quick.build(&independents, table.inferences(), bound);

    assert!(quick.test_depth(quick_root) >= full.test_depth(full_root));
}

#[test]
fn leaves_carry_the_remaining_conclusions() {
    // Conflicting conclusions under one name leave no feasible test
    // below the root's hold branch, so the conflict lands in a bucket
    // (caught later by the consistency check).
    let (table, independents) = analyzed(indoc! {"
        @foo,K
        a,1
        b,1
        c,2
    "});

    let mut builder = Builder::new(&table, false);
    let root = builder.build(&independents, table.inferences(), independents.len() as u32);

    let node = builder.node(root);
    assert_eq!(node.test, Some(value_id(&table, "K", "1")));
    let mut hold = infs_concluding(&table, "foo", "a");
    hold.extend(infs_concluding(&table, "foo", "b"));
    hold.sort_by(|&a, &b| table.inf_cmp(a, b));
    assert_eq!(node.infs_hold, hold);
}
