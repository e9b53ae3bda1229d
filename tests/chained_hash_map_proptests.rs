use chained_hashmap::ChainedHashMap;
use proptest::prelude::*;
use std::collections::HashMap;

// Property: after any sequence of puts (keys drawn from a small range so
// overwrites are common), every key maps to its last value and size equals
// the number of distinct keys.
proptest! {
    #[test]
    fn prop_last_write_wins(pairs in proptest::collection::vec((0u16..300, any::<i64>()), 0..400)) {
        let mut m = ChainedHashMap::new();
        let mut model = HashMap::new();
        for &(k, v) in &pairs {
            m.put(k, v);
            model.insert(k, v);
        }

        prop_assert_eq!(m.size(), model.len());
        for (k, v) in &model {
            prop_assert_eq!(m.get(k), Some(v));
        }
        for k in 300u16..310 {
            prop_assert_eq!(m.get(&k), None);
        }
    }
}

// Property: capacity only depends on how many distinct keys were inserted,
// and stays the smallest doubling of 16 whose threshold admits them.
proptest! {
    #[test]
    fn prop_capacity_tracks_distinct_keys(n in 0usize..2000) {
        let m: ChainedHashMap<usize, ()> = (0..n).map(|k| (k, ())).collect();
        prop_assert_eq!(m.size(), n);

        let mut cap = 16usize;
        while n > cap * 3 / 4 {
            cap *= 2;
        }
        prop_assert_eq!(m.capacity(), cap);
    }
}
