use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeSet;

fn validate_tree<K: Key>(t: &QuaternaryTree<K>) {
    let mut stack: Vec<&Node<K>> = Vec::new();
    if let Some(root) = &t.root {
        stack.push(root);
    }

    let mut node_count = 0usize;
    while let Some(node) = stack.pop() {
        node_count += 1;
        for child in node.children.iter().flatten() {
            stack.push(child);
        }
    }

    assert_eq!(
        node_count, t.count,
        "reachable node count must match QuaternaryTree::len"
    );
    assert_eq!(t.is_empty(), t.count == 0);
    assert!(t.height() <= t.count);
}

fn sorted<K: Ord>(mut keys: Vec<K>) -> Vec<K> {
    keys.sort();
    keys
}

/// Checks that all traversals, materialized and lazy, cover the same keys.
fn assert_traversals_agree(t: &QuaternaryTree<i32>) {
    let pre = t.traverse_preorder();
    let ino = t.traverse_inorder();
    let post = t.traverse_postorder();

    assert_eq!(pre.len(), t.len());
    assert_eq!(pre, t.preorder().copied().collect::<Vec<_>>());
    assert_eq!(ino, t.inorder().copied().collect::<Vec<_>>());
    assert_eq!(post, t.postorder().copied().collect::<Vec<_>>());

    let pre = sorted(pre);
    assert_eq!(pre, sorted(ino));
    assert_eq!(pre, sorted(post));
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 3)]
    Insert(#[proptest(strategy = "-64i32..64")] i32),
    #[proptest(weight = 2)]
    Remove(#[proptest(strategy = "-64i32..64")] i32),
    Contains(#[proptest(strategy = "-64i32..64")] i32),
}

fn distinct_keys() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::btree_set(-1000i32..1000, 1..=64)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_mixed_ops_stay_consistent(ops in prop::collection::vec(any::<Op>(), 0..=500)) {
        let mut t: QuaternaryTree<i32> = QuaternaryTree::new();

        for op in ops {
            match op {
                Op::Insert(k) => {
                    let before = t.len();
                    t.insert(k);
                    prop_assert_eq!(t.len(), before + 1);
                    prop_assert!(t.contains(&k));
                }
                Op::Remove(k) => {
                    let before = t.len();
                    t.remove(&k);
                    prop_assert!(t.len() <= before);
                }
                Op::Contains(k) => {
                    // A hit on the routing path is always a real key.
                    if t.contains(&k) {
                        prop_assert!(t.preorder().any(|x| *x == k));
                    }
                }
            }
        }

        validate_tree(&t);
        assert_traversals_agree(&t);
    }

    #[test]
    fn prop_inserts_allocate_one_node_each(keys in prop::collection::vec(-50i32..50, 0..=300)) {
        let t = QuaternaryTree::from_keys(keys.iter().copied());

        validate_tree(&t);
        prop_assert_eq!(t.len(), keys.len());
        prop_assert_eq!(sorted(t.traverse_preorder()), sorted(keys.clone()));
        assert_traversals_agree(&t);
        if let Some(&first) = keys.first() {
            prop_assert_eq!(t.traverse_preorder()[0], first);
            prop_assert_eq!(t.postorder().last(), Some(&first));
        }
    }

    #[test]
    fn prop_remove_present_key_removes_exactly_it(keys in distinct_keys(), pick in any::<prop::sample::Index>()) {
        let k = keys[pick.index(keys.len())];
        let mut t = QuaternaryTree::from_keys(keys.iter().copied());
        t.remove(&k);

        validate_tree(&t);
        prop_assert_eq!(t.len(), keys.len() - 1);
        prop_assert!(!t.contains(&k));
        let expected: Vec<i32> = keys.iter().copied().filter(|&x| x != k).collect();
        prop_assert_eq!(sorted(t.traverse_preorder()), sorted(expected));
        assert_traversals_agree(&t);
    }

    #[test]
    fn prop_root_replacement_is_subtree_min(keys in distinct_keys()) {
        let mut t = QuaternaryTree::from_keys(keys.iter().copied());
        let root = t.root.as_ref().unwrap();
        let expected = root
            .replacement_source()
            .map(|(_, subtree)| subtree.find_min().key);

        t.remove(&keys[0]);
        prop_assert_eq!(t.root.as_ref().map(|n| n.key), expected);
    }

    #[test]
    fn prop_remove_absent_is_noop(keys in prop::collection::vec(-100i32..100, 0..=200), k in -150i32..150) {
        prop_assume!(!keys.contains(&k));
        let mut t = QuaternaryTree::from_keys(keys.iter().copied());
        let before = t.clone();
        t.remove(&k);
        prop_assert_eq!(t, before);
    }

    #[test]
    fn prop_remove_is_idempotent(keys in distinct_keys(), pick in any::<prop::sample::Index>()) {
        let k = keys[pick.index(keys.len())];
        let mut t = QuaternaryTree::from_keys(keys.iter().copied());
        t.remove(&k);
        let once = t.clone();
        t.remove(&k);
        prop_assert_eq!(t, once);
    }

    #[test]
    fn prop_non_negative_keys_skip_slot_one(keys in prop::collection::vec(0u32..1000, 0..=300)) {
        let t = QuaternaryTree::from_keys(keys);
        let mut stack: Vec<&Node<u32>> = t.root.iter().map(|n| n.as_ref()).collect();
        while let Some(node) = stack.pop() {
            prop_assert!(node.child(Slot::Half).is_none());
            stack.extend(node.children.iter().flatten().map(|n| n.as_ref()));
        }
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys = [10, 3, 20, 50, 1, -4];
    let all: BTreeSet<i32> = keys.iter().copied().collect();

    for_each_permutation(&keys, |perm| {
        let t = QuaternaryTree::from_keys(perm.iter().copied());
        validate_tree(&t);
        assert_eq!(t.traverse_preorder()[0], perm[0]);
        assert_traversals_agree(&t);

        // Any single key removed from a fresh tree leaves every other key in place.
        for &k in &keys {
            let mut t = t.clone();
            t.remove(&k);
            validate_tree(&t);
            let mut expected = all.clone();
            expected.remove(&k);
            let got: BTreeSet<i32> = t.traverse_inorder().into_iter().collect();
            assert_eq!(got, expected, "insert order {perm:?}, removed {k}");
            assert_eq!(t.len(), keys.len() - 1);
        }
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys = [10, 3, 20, 50, 1, -4];
    let base_tree = QuaternaryTree::from_keys(keys);

    for_each_permutation(&keys, |perm| {
        let mut t = base_tree.clone();

        for k in perm {
            let before = t.len();
            t.remove(&k);
            assert!(t.len() <= before);
            validate_tree(&t);
            assert_traversals_agree(&t);
        }
    });
}
