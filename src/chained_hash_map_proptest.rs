#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can check
// the structural invariants of the underlying ChainTable.

use crate::chained_hash_map::ChainedHashMap;
use crate::config::{threshold_for, DEFAULT_CAPACITY};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, BuildHasherDefault, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations: indices shrink to earlier keys, and the pool is
// large enough that runs cross several growth thresholds.
#[derive(Clone, Debug)]
enum Op {
    Put(usize, i32),
    PutNull(i32),
    Get(usize),
    GetNull,
    Contains(String),
    Mutate(usize, i32),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=48).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Put(i, v)),
            1 => any::<i32>().prop_map(Op::PutNull),
            2 => idx.clone().prop_map(Op::Get),
            1 => Just(Op::GetNull),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(Op::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
        ];
        proptest::collection::vec(op, 1..150).prop_map(move |ops| (pool.clone(), ops))
    })
}

// State-machine equivalence against std::collections::HashMap plus an
// Option for the null key. Checked after every op:
// - lookups (regular, borrowed, null) agree with the model;
// - size counts distinct keys, the null key included;
// - capacity is a power-of-two multiple of the default and the threshold
//   matches it; size never exceeds the threshold;
// - every chain node sits in the bucket its hash maps to and is reachable
//   exactly once.
fn run_state_machine<S>(pool: &[String], ops: Vec<Op>) -> Result<(), TestCaseError>
where
    S: BuildHasher + Default,
{
    let mut sut: ChainedHashMap<Key, i32, S> = ChainedHashMap::default();
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut model_null: Option<i32> = None;

    for op in ops {
        match op {
            Op::Put(i, v) => {
                let k = Key(pool[i].clone());
                sut.put(k.clone(), v);
                model.insert(k, v);
            }
            Op::PutNull(v) => {
                sut.put_null(v);
                model_null = Some(v);
            }
            Op::Get(i) => {
                let k = Key(pool[i].clone());
                prop_assert_eq!(sut.get(&k), model.get(&k));
                prop_assert_eq!(sut.get(pool[i].as_str()), model.get(&k));
            }
            Op::GetNull => {
                prop_assert_eq!(sut.get_null(), model_null.as_ref());
            }
            Op::Contains(s) => {
                let has_model = model.contains_key(&Key(s.clone()));
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            Op::Mutate(i, d) => {
                let k = Key(pool[i].clone());
                match (sut.get_mut(&k), model.get_mut(&k)) {
                    (Some(sv), Some(mv)) => {
                        *sv = sv.saturating_add(d);
                        *mv = mv.saturating_add(d);
                    }
                    (None, None) => {}
                    (s, m) => prop_assert!(false, "presence mismatch: {:?} vs {:?}", s, m),
                }
            }
        }

        let expected = model.len() + usize::from(model_null.is_some());
        prop_assert_eq!(sut.size(), expected);
        prop_assert_eq!(sut.is_empty(), expected == 0);
        let cap = sut.capacity();
        prop_assert!(cap >= DEFAULT_CAPACITY && (cap / DEFAULT_CAPACITY).is_power_of_two());
        prop_assert_eq!(sut.threshold(), threshold_for(cap));
        prop_assert!(sut.size() <= sut.threshold());
        sut.check_invariants();
    }

    for (k, v) in &model {
        prop_assert_eq!(sut.get(k), Some(v));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine::<hashbrown::hash_map::DefaultHashBuilder>(&pool, ops)?;
    }
}

// Folds every written byte into one of four hashes, so most keys collide
// and chains grow long even after resizes.
#[derive(Default)]
struct FourWayHasher(u64);
impl Hasher for FourWayHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = self.0.wrapping_add(u64::from(b));
        }
    }
    fn finish(&self) -> u64 {
        self.0 % 4
    }
}

// Same state machine under heavy collisions: equality resolution inside
// long chains and relinking of long chains on growth.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_state_machine::<BuildHasherDefault<FourWayHasher>>(&pool, ops)?;
    }
}
