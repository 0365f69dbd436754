#![cfg(test)]

// Property tests for HashSymTable kept inside the crate so they can check
// bucket placement through `assert_consistent`.

use crate::hash_sym_table::HashSymTable;
use crate::list_sym_table::ListSymTable;
use crate::sym_table::PutError;
use core::hash::{BuildHasher, Hasher};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Get(usize),
    Contains(String),
    Replace(usize, i32),
    Remove(usize),
    Mutate(usize, i32),
    Map,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Replace(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Map),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Runs one scenario against the hash table, the list table and a std
// HashMap model, checking every observable result after each op.
fn run_scenario<S: BuildHasher>(
    mut sut: HashSymTable<i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut list: ListSymTable<i32> = ListSymTable::new();
    let mut model: HashMap<String, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = &pool[i];
                let already = model.contains_key(k);
                match sut.try_put(k, v) {
                    Ok(()) => {
                        prop_assert!(!already, "put must fail on duplicate");
                        model.insert(k.clone(), v);
                    }
                    Err(PutError::DuplicateKey) => {
                        prop_assert!(already, "duplicate error only when key exists");
                    }
                    Err(PutError::OutOfMemory) => prop_assert!(false, "unexpected OOM"),
                }
                prop_assert_eq!(list.put(k, v), !already);
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
                prop_assert_eq!(list.get(k), model.get(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains(&s), model.contains_key(&s));
                prop_assert_eq!(list.contains(&s), model.contains_key(&s));
            }
            OpI::Replace(i, v) => {
                let k = &pool[i];
                let expected = match model.get_mut(k) {
                    Some(mv) => Ok(core::mem::replace(mv, v)),
                    None => Err(v),
                };
                prop_assert_eq!(sut.replace(k, v), expected);
                prop_assert_eq!(list.replace(k, v), expected);
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let expected = model.remove(k);
                prop_assert_eq!(sut.remove(k), expected);
                prop_assert_eq!(list.remove(k), expected);
                prop_assert!(!sut.contains(k));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(mv) = model.get_mut(k) {
                    *mv = mv.wrapping_add(d);
                    let Some(sv) = sut.get_mut(k) else {
                        return Err(TestCaseError::fail("live key should resolve"));
                    };
                    *sv = sv.wrapping_add(d);
                    if let Some(lv) = list.get_mut(k) {
                        *lv = lv.wrapping_add(d);
                    }
                } else {
                    prop_assert!(sut.get_mut(k).is_none());
                }
            }
            OpI::Map => {
                let mut seen: BTreeMap<String, i32> = BTreeMap::new();
                sut.map(|k, v| {
                    let prev = seen.insert(k.to_string(), *v);
                    assert!(prev.is_none(), "key visited twice");
                });
                let m: BTreeMap<String, i32> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(&seen, &m);
                let l: BTreeMap<String, i32> =
                    list.iter().map(|(k, v)| (k.to_string(), *v)).collect();
                prop_assert_eq!(&l, &m);
            }
            OpI::Clear => {
                sut.clear();
                list.clear();
                model.clear();
            }
        }

        // Post-conditions after each op
        sut.assert_consistent();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(list.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.iter().len(), model.len());
    }
    Ok(())
}

// Property: State-machine equivalence against ListSymTable and
// std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - Duplicate keys are rejected and leave the first value in place.
// - `get`/`contains` parity with the model for pooled and random keys.
// - `replace` returns the old value on hit and hands the new value back on miss.
// - `remove` returns the stored value and the key is absent afterwards.
// - `map` visits each live binding exactly once.
// - Every node sits in the bucket its key hashes to; `len` parity after each op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(HashSymTable::new(), &pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress chain walking.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: Same state-machine invariants as above, with every key in one
// chain. This stresses unlinking at the head, middle and tail.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(HashSymTable::with_hasher(ConstBuildHasher), &pool, ops)?;
    }
}

// Property: growth across one or more tiers keeps every binding exactly
// once and in its hashed bucket, including after removals interleaved
// with the growth.
proptest! {
    #![proptest_config(ProptestConfig { cases: 16, .. ProptestConfig::default() })]
    #[test]
    fn prop_growth_preserves_bindings(
        keys in proptest::collection::btree_set("[a-zA-Z0-9]{1,12}", 400..1600),
        remove_every in 2usize..7,
    ) {
        let mut sut: HashSymTable<usize> = HashSymTable::new();
        let mut live: BTreeSet<String> = BTreeSet::new();
        let mut peak = 0;
        for (i, k) in keys.iter().enumerate() {
            prop_assert!(sut.put(k, i));
            live.insert(k.clone());
            peak = peak.max(sut.len());
            if i % remove_every == 0 {
                // Drop an earlier key so removals interleave with growth.
                let victim = keys.iter().nth(i / 2).cloned().unwrap_or_default();
                if live.remove(&victim) {
                    prop_assert!(sut.remove(&victim).is_some());
                }
            }
        }
        sut.assert_consistent();
        prop_assert_eq!(sut.len(), live.len());
        let mut seen = BTreeSet::new();
        for (k, _) in &sut {
            prop_assert!(seen.insert(k.to_string()), "key visited twice");
        }
        prop_assert_eq!(seen, live);
        // Growth is driven by the largest size the table reached.
        prop_assert!(sut.bucket_count() >= peak);
        if sut.tier() > 0 {
            prop_assert!(crate::BUCKET_COUNTS[sut.tier() - 1] < peak);
        }
    }
}
