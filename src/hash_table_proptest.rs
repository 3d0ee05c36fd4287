#![cfg(test)]

// Property tests for HashTable and LinkedList kept inside the crate,
// alongside the unit tests.

use crate::hash::{Digest, Hashable};
use crate::hash_table::HashTable;
use crate::linked_list::{LinkedList, NodeRef};
use crate::Error;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt;

// Key newtype hashing like its inner string.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl Hashable for Key {
    fn digest(&self) -> Digest {
        self.0.digest()
    }
}

// Same key shape, but every digest collides.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
struct CollidingKey(String);
impl Hashable for CollidingKey {
    fn digest(&self) -> Digest {
        0
    }
}

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum OpI {
    GetOrInsert(usize, i32),
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::GetOrInsert(i, v)),
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Runs `ops` against both the table and a std HashMap model. `wrap` builds
// the table's key type from a pool string.
fn run_model<K, F>(
    mut sut: HashTable<K, i32>,
    pool: &[String],
    ops: Vec<OpI>,
    wrap: F,
) -> Result<(), TestCaseError>
where
    K: Hashable + Eq + Clone + Ord + fmt::Debug,
    F: Fn(&str) -> K,
{
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut max_capacity = sut.capacity();

    for op in ops {
        match op {
            OpI::GetOrInsert(i, v) => {
                let k = pool[i].as_str();
                let before = model.get(k).copied().unwrap_or_default();
                let slot = sut.get_or_insert(wrap(k));
                prop_assert_eq!(*slot, before);
                *slot = v;
                model.insert(k.to_string(), v);
            }
            OpI::Insert(i, v) => {
                let k = pool[i].as_str();
                prop_assert_eq!(sut.insert(wrap(k), v), model.insert(k.to_string(), v));
            }
            OpI::Remove(i) => {
                let k = pool[i].as_str();
                prop_assert_eq!(sut.remove(&wrap(k)), model.remove(k));
                prop_assert!(!sut.contains_key(&wrap(k)));
            }
            OpI::Get(i) => {
                let k = pool[i].as_str();
                prop_assert_eq!(sut.get(&wrap(k)), model.get(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&wrap(&s)), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = pool[i].as_str();
                match (sut.get_mut(&wrap(k)), model.get_mut(k)) {
                    (Some(a), Some(b)) => {
                        *a = a.wrapping_add(d);
                        *b = b.wrapping_add(d);
                    }
                    (None, None) => {}
                    (a, b) => prop_assert!(false, "presence mismatch: {:?} vs {:?}", a, b),
                }
            }
            OpI::Iterate => {
                let got: BTreeMap<K, i32> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let want: BTreeMap<K, i32> = model.iter().map(|(k, v)| (wrap(k.as_str()), *v)).collect();
                prop_assert_eq!(got, want);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.size(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.capacity() >= max_capacity, "capacity never shrinks");
        max_capacity = sut.capacity();
        prop_assert!(sut.load() < sut.load_factor());
        let distinct: BTreeSet<&K> = sut.keys().collect();
        prop_assert_eq!(distinct.len(), sut.len(), "keys are unique");
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// - get_or_insert returns the stored value (default on a miss) and writes land.
// - insert/remove return the previous value exactly as the model does.
// - iteration yields each live entry exactly once.
// - len == size, capacity only grows, and load stays below the threshold.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_model(HashTable::with_capacity(2), &pool, ops, |s| Key(s.to_string()))?;
    }

    #[test]
    fn prop_state_machine_from_zero_capacity((pool, ops) in arb_scenario()) {
        run_model(HashTable::with_capacity(0), &pool, ops, |s| Key(s.to_string()))?;
    }
}

// Property: the same invariants hold when every key lands in one chain.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_model(HashTable::new(), &pool, ops, |s| CollidingKey(s.to_string()))?;
    }
}

#[derive(Clone, Debug)]
enum ListOp {
    PushBack(u8),
    PushFront(u8),
    PopFront,
    PopBack,
    RemoveAt(usize),
    RemoveTracked(usize),
}

fn arb_list_ops() -> impl Strategy<Value = Vec<ListOp>> {
    let op = prop_oneof![
        3 => any::<u8>().prop_map(ListOp::PushBack),
        2 => any::<u8>().prop_map(ListOp::PushFront),
        1 => Just(ListOp::PopFront),
        1 => Just(ListOp::PopBack),
        1 => (0usize..40).prop_map(ListOp::RemoveAt),
        1 => (0usize..40).prop_map(ListOp::RemoveTracked),
    ];
    proptest::collection::vec(op, 0..120)
}

// Property: LinkedList behaves like a VecDeque, values are small so
// duplicates are common, and removed NodeRefs never resolve again.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_list_matches_deque(ops in arb_list_ops()) {
        let mut sut: LinkedList<u8> = LinkedList::new();
        let mut model: VecDeque<u8> = VecDeque::new();
        let mut issued: Vec<NodeRef> = Vec::new();
        let mut stale: Vec<NodeRef> = Vec::new();

        for op in ops {
            match op {
                ListOp::PushBack(v) => {
                    issued.push(sut.push_back(v % 4));
                    model.push_back(v % 4);
                }
                ListOp::PushFront(v) => {
                    issued.push(sut.push_front(v % 4));
                    model.push_front(v % 4);
                }
                ListOp::PopFront => prop_assert_eq!(sut.pop_front(), model.pop_front()),
                ListOp::PopBack => prop_assert_eq!(sut.pop_back(), model.pop_back()),
                ListOp::RemoveAt(i) => {
                    let len = model.len();
                    match model.remove(i) {
                        Some(v) => prop_assert_eq!(sut.remove_at(i), Ok(v)),
                        None => prop_assert_eq!(sut.remove_at(i), Err(Error::OutOfBounds { index: i, len })),
                    }
                }
                ListOp::RemoveTracked(i) => {
                    if issued.is_empty() {
                        continue;
                    }
                    let node = issued.swap_remove(i % issued.len());
                    let pos = sut.nodes().position(|(n, _)| n == node);
                    match pos {
                        Some(p) => {
                            let v = model.remove(p);
                            prop_assert_eq!(sut.remove(node).ok(), v);
                        }
                        None => prop_assert_eq!(sut.remove(node), Err(Error::StaleNode)),
                    }
                    stale.push(node);
                }
            }

            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            prop_assert!(sut.iter().eq(model.iter()));
            prop_assert!(backward_walk_matches(&sut));
            for &n in &stale {
                prop_assert!(sut.get(n).is_none());
            }
        }
    }
}

// Walking `prev` from the tail must mirror the forward walk.
fn backward_walk_matches(list: &LinkedList<u8>) -> bool {
    let forward: Vec<u8> = list.iter().copied().collect();
    let mut backward = Vec::new();
    let mut cur = list.tail();
    while let Some(n) = cur {
        backward.push(list[n]);
        cur = list.prev(n);
    }
    backward.reverse();
    forward == backward
}
