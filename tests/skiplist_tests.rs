//! Skip List Tests
//!
//! Tests verify:
//! - Ordered insertion and traversal
//! - Rank lookup and rank-of-score queries
//! - Threshold lookup (first entry at or above a score)
//! - Removal and span integrity
//! - Tie-break ordering for equal scores

use bytes::Bytes;
use scorekv::skiplist::SkipList;

fn collect_values(list: &SkipList) -> Vec<Bytes> {
    let mut out = Vec::new();
    let mut node = list.front();
    while let Some(id) = node {
        out.push(list.value(id).clone());
        node = list.next(id);
    }
    out
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_list_is_empty() {
    let list = SkipList::new();
    assert_eq!(list.len(), 0);
    assert!(list.is_empty());
    assert!(list.front().is_none());
    assert!(list.back().is_none());
}

#[test]
fn test_insert_orders_by_score() {
    let mut list = SkipList::new();
    list.insert(3.0, Bytes::from_static(b"c"));
    list.insert(1.0, Bytes::from_static(b"a"));
    list.insert(2.0, Bytes::from_static(b"b"));

    assert_eq!(list.len(), 3);
    assert_eq!(
        collect_values(&list),
        vec![
            Bytes::from_static(b"a"),
            Bytes::from_static(b"b"),
            Bytes::from_static(b"c"),
        ]
    );
}

#[test]
fn test_front_and_back() {
    let mut list = SkipList::new();
    list.insert(10.0, Bytes::from_static(b"low"));
    list.insert(20.0, Bytes::from_static(b"high"));

    let front = list.front().unwrap();
    let back = list.back().unwrap();
    assert_eq!(list.value(front).as_ref(), b"low");
    assert_eq!(list.value(back).as_ref(), b"high");
    assert_eq!(list.score(front), 10.0);
    assert_eq!(list.score(back), 20.0);
}

#[test]
fn test_backward_traversal() {
    let mut list = SkipList::new();
    for (score, value) in [(1.0, "a"), (2.0, "b"), (3.0, "c")] {
        list.insert(score, Bytes::from(value));
    }

    let mut out = Vec::new();
    let mut node = list.back();
    while let Some(id) = node {
        out.push(list.value(id).clone());
        node = list.prev(id);
    }
    assert_eq!(
        out,
        vec![
            Bytes::from_static(b"c"),
            Bytes::from_static(b"b"),
            Bytes::from_static(b"a"),
        ]
    );
}

#[test]
fn test_negative_and_infinite_scores() {
    let mut list = SkipList::new();
    list.insert(0.0, Bytes::from_static(b"zero"));
    list.insert(f64::NEG_INFINITY, Bytes::from_static(b"bottom"));
    list.insert(f64::INFINITY, Bytes::from_static(b"top"));
    list.insert(-10.0, Bytes::from_static(b"neg"));

    assert_eq!(
        collect_values(&list),
        vec![
            Bytes::from_static(b"bottom"),
            Bytes::from_static(b"neg"),
            Bytes::from_static(b"zero"),
            Bytes::from_static(b"top"),
        ]
    );
}

// =============================================================================
// Rank Tests
// =============================================================================

#[test]
fn test_get_by_rank() {
    let mut list = SkipList::new();
    for i in 1..=5 {
        list.insert(i as f64, Bytes::from(format!("v{}", i)));
    }

    for rank in 1..=5usize {
        let id = list.get_by_rank(rank).unwrap();
        assert_eq!(list.score(id), rank as f64);
    }
    assert!(list.get_by_rank(0).is_none());
    assert!(list.get_by_rank(6).is_none());
}

#[test]
fn test_get_by_rank_large() {
    let mut list = SkipList::new();
    for i in 0..1000 {
        list.insert(i as f64, Bytes::from(format!("v{:04}", i)));
    }
    for rank in [1usize, 2, 499, 500, 999, 1000] {
        let id = list.get_by_rank(rank).unwrap();
        assert_eq!(list.score(id), (rank - 1) as f64);
    }
}

#[test]
fn test_rank_at_least() {
    let mut list = SkipList::new();
    for score in [10.0, 20.0, 30.0] {
        list.insert(score, Bytes::from_static(b"v"));
    }

    // Existing scores report their own 1-based rank.
    assert_eq!(list.rank_at_least(10.0), 1);
    assert_eq!(list.rank_at_least(20.0), 2);
    assert_eq!(list.rank_at_least(30.0), 3);

    // Absent scores report the insertion position.
    assert_eq!(list.rank_at_least(5.0), 1);
    assert_eq!(list.rank_at_least(15.0), 2);
    assert_eq!(list.rank_at_least(35.0), 4);
}

#[test]
fn test_rank_at_least_empty() {
    let list = SkipList::new();
    assert_eq!(list.rank_at_least(42.0), 1);
}

// =============================================================================
// Threshold Lookup Tests
// =============================================================================

#[test]
fn test_first_at_least() {
    let mut list = SkipList::new();
    for score in [10.0, 20.0, 30.0] {
        list.insert(score, Bytes::from(format!("{}", score)));
    }

    let id = list.first_at_least(15.0).unwrap();
    assert_eq!(list.score(id), 20.0);

    let id = list.first_at_least(20.0).unwrap();
    assert_eq!(list.score(id), 20.0);

    let id = list.first_at_least(f64::NEG_INFINITY).unwrap();
    assert_eq!(list.score(id), 10.0);

    assert!(list.first_at_least(31.0).is_none());
}

// =============================================================================
// Removal Tests
// =============================================================================

#[test]
fn test_remove_requires_score_and_value_match() {
    let mut list = SkipList::new();
    list.insert(1.0, Bytes::from_static(b"a"));

    assert!(!list.remove(1.0, b"b"));
    assert!(!list.remove(2.0, b"a"));
    assert_eq!(list.len(), 1);

    assert!(list.remove(1.0, b"a"));
    assert!(list.is_empty());
    assert!(list.front().is_none());
    assert!(list.back().is_none());
}

#[test]
fn test_remove_updates_links() {
    let mut list = SkipList::new();
    for (score, value) in [(1.0, "a"), (2.0, "b"), (3.0, "c")] {
        list.insert(score, Bytes::from(value));
    }

    assert!(list.remove(2.0, b"b"));
    assert_eq!(
        collect_values(&list),
        vec![Bytes::from_static(b"a"), Bytes::from_static(b"c")]
    );

    // Back link and tail survive removal of the last entry.
    assert!(list.remove(3.0, b"c"));
    let back = list.back().unwrap();
    assert_eq!(list.value(back).as_ref(), b"a");
}

#[test]
fn test_ranks_stay_consistent_after_removals() {
    let mut list = SkipList::new();
    for i in 0..100 {
        list.insert(i as f64, Bytes::from(format!("v{:03}", i)));
    }
    for i in (0..100).step_by(2) {
        assert!(list.remove(i as f64, format!("v{:03}", i).as_bytes()));
    }

    assert_eq!(list.len(), 50);
    // Remaining entries are the odd scores, re-ranked densely.
    for (pos, score) in (1..100).step_by(2).enumerate() {
        let id = list.get_by_rank(pos + 1).unwrap();
        assert_eq!(list.score(id), score as f64);
    }
    assert_eq!(list.rank_at_least(1.0), 1);
    assert_eq!(list.rank_at_least(99.0), 50);
}

#[test]
fn test_slot_reuse_after_removal() {
    let mut list = SkipList::new();
    list.insert(1.0, Bytes::from_static(b"a"));
    assert!(list.remove(1.0, b"a"));
    list.insert(2.0, Bytes::from_static(b"b"));

    assert_eq!(list.len(), 1);
    let id = list.front().unwrap();
    assert_eq!(list.score(id), 2.0);
    assert_eq!(list.value(id).as_ref(), b"b");
}

// =============================================================================
// Tie-break Tests
// =============================================================================

#[test]
fn test_equal_scores_order_by_value() {
    let mut list = SkipList::new();
    list.insert(1.0, Bytes::from_static(b"banana"));
    list.insert(1.0, Bytes::from_static(b"apple"));
    list.insert(1.0, Bytes::from_static(b"cherry"));

    assert_eq!(
        collect_values(&list),
        vec![
            Bytes::from_static(b"apple"),
            Bytes::from_static(b"banana"),
            Bytes::from_static(b"cherry"),
        ]
    );
}

#[test]
fn test_equal_scores_order_independent_of_insertion() {
    let mut forward = SkipList::new();
    let mut reversed = SkipList::new();
    let values = ["x", "y", "z"];
    for v in values {
        forward.insert(7.0, Bytes::from(v));
    }
    for v in values.iter().rev() {
        reversed.insert(7.0, Bytes::from(*v));
    }

    assert_eq!(collect_values(&forward), collect_values(&reversed));
}

// =============================================================================
// Value Update Tests
// =============================================================================

#[test]
fn test_set_value_in_place() {
    let mut list = SkipList::new();
    list.insert(1.0, Bytes::from_static(b"old"));
    list.insert(2.0, Bytes::from_static(b"other"));

    let id = list.front().unwrap();
    list.set_value(id, Bytes::from_static(b"new"));

    assert_eq!(list.len(), 2);
    assert_eq!(
        collect_values(&list),
        vec![Bytes::from_static(b"new"), Bytes::from_static(b"other")]
    );
}
