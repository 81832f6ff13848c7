//! Tests for SearchTree: insertion policies, validation and adaptive search

use rstest::{fixture, rstest};

use treeartist::domain::{DomainError, InsertMode, SearchStrategy, SearchTree, TreeArena};
use treeartist::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[fixture]
fn ten_five_fifteen() -> SearchTree<i64> {
    SearchTree::from_values([10, 5, 15], InsertMode::Ordered).unwrap()
}

fn value_of(tree: &SearchTree<i64>, idx: treeartist::domain::Index) -> i64 {
    *tree.value(idx).unwrap()
}

// ============================================================
// Ordered insertion
// ============================================================

#[rstest]
#[case::descending(&[50, 40, 30, 20, 10])]
#[case::ascending(&[1, 2, 3, 4, 5, 6])]
#[case::zigzag(&[50, 10, 40, 20, 30])]
fn given_single_child_chain_when_inserting_ordered_then_valid_after_every_insert(#[case] values: &[i64]) {
    let mut tree = SearchTree::new();
    for value in values {
        tree.insert_ordered(*value).unwrap();
        assert!(tree.is_valid(), "invalid after inserting {value}");
        assert!(tree.is_fully_ordered(), "out of order after inserting {value}");
    }
}

#[rstest]
#[case(&[5, 3, 7, 1, 4])]
#[case(&[50, 25, 75, 10, 30, 60, 90, 5, 27, 65])]
#[case(&[-8, 4, -20, 0, 13, 2, -9])]
fn given_distinct_values_when_inserting_ordered_then_every_value_found(#[case] values: &[i64]) {
    let tree = SearchTree::from_values(values.iter().copied(), InsertMode::Ordered).unwrap();

    assert!(tree.is_valid());
    assert!(tree.is_fully_ordered());
    assert_eq!(tree.len(), values.len());
    for value in values {
        let idx = tree.search(value).expect("inserted value must be found");
        assert_eq!(value_of(&tree, idx), *value);
    }
    for missing in [-1000, 1000, 6, -7] {
        if !values.contains(&missing) {
            assert!(tree.search(&missing).is_none(), "{missing} should be absent");
        }
    }
}

#[test]
fn given_ordered_values_when_inserting_then_smaller_left_larger_right() {
    let tree = SearchTree::from_values([5, 3, 7, 1, 4], InsertMode::Ordered).unwrap();
    let arena = tree.arena();
    let root = tree.root().unwrap();
    let three = arena.left(root).unwrap();
    let seven = arena.right(root).unwrap();

    assert_eq!(value_of(&tree, root), 5);
    assert_eq!(value_of(&tree, three), 3);
    assert_eq!(value_of(&tree, seven), 7);
    assert_eq!(value_of(&tree, arena.left(three).unwrap()), 1);
    assert_eq!(value_of(&tree, arena.right(three).unwrap()), 4);
    assert_eq!(arena.parent(three), Some(root));
}

#[rstest]
fn given_existing_value_when_inserting_ordered_then_duplicate_error(mut ten_five_fifteen: SearchTree<i64>) {
    let result = ten_five_fifteen.insert_ordered(15);
    assert_eq!(result, Err(DomainError::DuplicateValue("15".to_string())));
    assert_eq!(ten_five_fifteen.len(), 3);
}

#[test]
fn given_duplicate_in_sequence_when_building_ordered_then_fails() {
    let result = SearchTree::from_values([4, 2, 4], InsertMode::Ordered);
    assert!(matches!(result, Err(DomainError::DuplicateValue(v)) if v == "4"));
}

// ============================================================
// Corrupt insertion
// ============================================================

#[rstest]
fn given_valid_tree_when_inserting_corrupt_then_attaches_left_of_leftmost(
    mut ten_five_fifteen: SearchTree<i64>,
) {
    assert!(ten_five_fifteen.is_valid());
    let five = ten_five_fifteen.search(&5).unwrap();

    let twenty = ten_five_fifteen.insert_leftmost_corrupt(20).unwrap();

    assert_eq!(ten_five_fifteen.arena().left(five), Some(twenty));
    assert_eq!(ten_five_fifteen.arena().parent(twenty), Some(five));
    assert!(!ten_five_fifteen.is_valid());
    assert!(!ten_five_fifteen.is_fully_ordered());
}

#[rstest]
fn given_in_order_value_when_inserting_corrupt_then_tree_stays_valid(mut ten_five_fifteen: SearchTree<i64>) {
    ten_five_fifteen.insert_leftmost_corrupt(1).unwrap();
    assert!(ten_five_fifteen.is_valid());
    assert_eq!(ten_five_fifteen.search_strategy(), SearchStrategy::Ordered);
}

#[test]
fn given_corrupt_mode_when_building_then_left_spine_in_insertion_order() {
    let tree = SearchTree::from_values([1, 2, 3, 4], InsertMode::LeftmostCorrupt).unwrap();
    let arena = tree.arena();

    let spine: Vec<i64> = std::iter::successors(tree.root(), |idx| arena.left(*idx))
        .map(|idx| value_of(&tree, idx))
        .collect();
    assert_eq!(spine, vec![1, 2, 3, 4]);
    assert_eq!(tree.height(), 4);
    assert!(!tree.is_valid());
}

#[test]
fn given_descending_corrupt_inserts_when_validating_then_still_valid() {
    let tree = SearchTree::from_values([9, 7, 3], InsertMode::LeftmostCorrupt).unwrap();
    assert!(tree.is_valid());
    assert!(tree.search(&3).is_some());
}

// ============================================================
// Adaptive search
// ============================================================

#[rstest]
fn given_scenario_ten_five_fifteen_when_searching_then_finds_five_not_twenty(
    ten_five_fifteen: SearchTree<i64>,
) {
    let five = ten_five_fifteen.search(&5).expect("5 is in the tree");
    assert_eq!(value_of(&ten_five_fifteen, five), 5);
    assert!(ten_five_fifteen.search(&20).is_none());
}

#[rstest]
fn given_corrupted_tree_when_searching_then_only_left_spine_is_visible(
    mut ten_five_fifteen: SearchTree<i64>,
) {
    ten_five_fifteen.insert_leftmost_corrupt(20).unwrap();

    assert_eq!(ten_five_fifteen.search_strategy(), SearchStrategy::LeftSpine);
    assert!(ten_five_fifteen.search(&10).is_some());
    assert!(ten_five_fifteen.search(&5).is_some());
    assert!(ten_five_fifteen.search(&20).is_some());
    // 15 hangs off the right of the root and is never scanned
    assert!(ten_five_fifteen.search(&15).is_none());
}

#[rstest]
fn given_corrupted_tree_when_inserting_ordered_then_duplicates_judged_by_degraded_search(
    mut ten_five_fifteen: SearchTree<i64>,
) {
    ten_five_fifteen.insert_leftmost_corrupt(20).unwrap();

    // 5 is on the left spine, so it is still seen as present
    assert!(matches!(
        ten_five_fifteen.insert_ordered(5),
        Err(DomainError::DuplicateValue(_))
    ));

    // 15 is invisible to the spine scan and gets inserted a second time
    let idx = ten_five_fifteen.insert_ordered(15).unwrap();
    let first_fifteen = ten_five_fifteen.arena().right(ten_five_fifteen.root().unwrap()).unwrap();
    assert_eq!(ten_five_fifteen.arena().right(first_fifteen), Some(idx));
    assert_eq!(ten_five_fifteen.len(), 5);
}

#[rstest]
fn given_unchanged_tree_when_querying_repeatedly_then_same_answers(mut ten_five_fifteen: SearchTree<i64>) {
    for _ in 0..3 {
        assert!(ten_five_fifteen.is_valid());
        assert_eq!(ten_five_fifteen.search(&15), ten_five_fifteen.search(&15));
    }
    ten_five_fifteen.insert_leftmost_corrupt(99).unwrap();
    let first = ten_five_fifteen.search(&99);
    for _ in 0..3 {
        assert!(!ten_five_fifteen.is_valid());
        assert_eq!(ten_five_fifteen.search(&99), first);
    }
}

#[test]
fn given_empty_tree_when_searching_then_absent_and_valid() {
    let tree: SearchTree<i64> = SearchTree::new();
    assert!(tree.is_valid());
    assert!(tree.search(&1).is_none());
    assert_eq!(tree.leftmost(), None);
}

// ============================================================
// Validator quirk: only one child per node is inspected
// ============================================================

//      10
//     /  \
//    5    3   <- right child out of order, never inspected
#[test]
fn given_bad_right_child_next_to_left_child_when_validating_then_not_detected() {
    let mut arena = TreeArena::new();
    let root = arena.add_root(10).unwrap();
    arena.add_left(root, 5).unwrap();
    arena.add_right(root, 3).unwrap();
    let tree = SearchTree::from(arena);

    assert!(tree.is_valid());
    assert!(!tree.is_fully_ordered());
    assert_eq!(tree.height(), 2);
}

//    10
//      \
//       3   <- only child, so it is inspected
#[test]
fn given_bad_only_right_child_when_validating_then_detected() {
    let mut arena = TreeArena::new();
    let root = arena.add_root(10).unwrap();
    arena.add_right(root, 3).unwrap();
    let tree = SearchTree::from(arena);

    assert!(!tree.is_valid());
    assert_eq!(tree.search_strategy(), SearchStrategy::LeftSpine);
}

// ============================================================
// Height
// ============================================================

#[rstest]
#[case::empty(&[], 0)]
#[case::root_only(&[8], 1)]
#[case::spec_example(&[5, 3, 7, 1, 4], 3)]
#[case::chain(&[1, 2, 3, 4, 5], 5)]
fn given_ordered_build_when_measuring_height_then_counts_levels(#[case] values: &[i64], #[case] expected: usize) {
    let tree = SearchTree::from_values(values.iter().copied(), InsertMode::Ordered).unwrap();
    assert_eq!(tree.height(), expected);
}

#[rstest]
fn given_insertions_after_build_when_not_recomputed_then_height_is_stale(mut ten_five_fifteen: SearchTree<i64>) {
    assert_eq!(ten_five_fifteen.height(), 2);
    ten_five_fifteen.insert_ordered(1).unwrap();
    ten_five_fifteen.insert_leftmost_corrupt(0).unwrap();
    assert_eq!(ten_five_fifteen.height(), 2);
    assert_eq!(ten_five_fifteen.recompute_height(), 4);
    assert_eq!(ten_five_fifteen.height(), 4);
}
