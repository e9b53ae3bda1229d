//! ChainedHashMap: public map with a dedicated null-key slot and
//! load-factor driven growth on top of [`ChainTable`].

use crate::chain_table::{ChainTable, Upsert};
use crate::config::{threshold_for, DEFAULT_CAPACITY, GROWTH_FACTOR};
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// Clears the top bit so every stored hash is a non-negative `i64`.
const HASH_MASK: u64 = i64::MAX as u64;

/// A hash map resolving collisions by separate chaining.
///
/// Keys must satisfy the usual `Hash`/`Eq` contract: `a == b` implies
/// `hash(a) == hash(b)`, and both must be deterministic for as long as the
/// key is stored. The hash function is fixed by the `S` type parameter;
/// the default builder uses fixed keys, so a given key always lands in the
/// same bucket for a given capacity.
///
/// Besides regular keys the map has one slot for the absent ("null") key,
/// reached through [`put_null`](Self::put_null) and
/// [`get_null`](Self::get_null). It counts toward [`size`](Self::size) but
/// never occupies a bucket.
///
/// Entries are never removed. Before every insert, if `size() >= threshold()`
/// the bucket array doubles and all entries are rehashed.
pub struct ChainedHashMap<K, V, S = DefaultHashBuilder> {
    hasher: S,
    table: ChainTable<K, V>,
    null_value: Option<V>,
    threshold: usize,
    reentrancy: DebugReentrancy,
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    /// Empty map with 16 buckets and a growth threshold of 12.
    pub fn new() -> Self {
        Self::with_state(DefaultHashBuilder::default())
    }
}

impl<K, V, S> Default for ChainedHashMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_state(S::default())
    }
}

impl<K, V, S> ChainedHashMap<K, V, S> {
    fn with_state(hasher: S) -> Self {
        log::trace!(
            "ChainedHashMap created: capacity={} threshold={}",
            DEFAULT_CAPACITY,
            threshold_for(DEFAULT_CAPACITY)
        );
        Self {
            hasher,
            table: ChainTable::with_capacity(DEFAULT_CAPACITY),
            null_value: None,
            threshold: threshold_for(DEFAULT_CAPACITY),
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// Number of distinct keys stored, the null key included.
    #[inline]
    pub fn size(&self) -> usize {
        self.table.len() + usize::from(self.null_value.is_some())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Current number of buckets.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Size at which the next insert grows the map.
    #[inline]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Store `value` under the null key, replacing any previous one.
    pub fn put_null(&mut self, value: V) {
        let _g = self.reentrancy.enter("put_null");
        if self.size() >= self.threshold {
            self.threshold = grow(&mut self.table, self.null_value.is_some());
        }
        self.null_value = Some(value);
    }

    /// Value stored under the null key, or `None` if it was never set.
    pub fn get_null(&self) -> Option<&V> {
        self.null_value.as_ref()
    }

    pub fn get_null_mut(&mut self) -> Option<&mut V> {
        self.null_value.as_mut()
    }

    pub fn contains_null(&self) -> bool {
        self.null_value.is_some()
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        self.table.check_invariants();
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q) & HASH_MASK
    }

    /// Insert `key` with `value`, or overwrite the value if `key` is present.
    pub fn put(&mut self, key: K, value: V) {
        let _g = self.reentrancy.enter("put");
        if self.size() >= self.threshold {
            self.threshold = grow(&mut self.table, self.null_value.is_some());
        }
        let hash = self.make_hash(&key);
        if self.table.upsert(hash, key, value) == Upsert::Updated {
            log::trace!("ChainedHashMap overwrote value for existing key");
        }
    }

    /// Value stored under `key`, or `None` if absent.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get");
        let hash = self.make_hash(key);
        self.table.get(hash, |k| k.borrow() == key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get_mut");
        let hash = self.make_hash(key);
        self.table.get_mut(hash, |k| k.borrow() == key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("contains_key");
        let hash = self.make_hash(key);
        self.table.find(hash, |k| k.borrow() == key).is_some()
    }
}

/// Double the bucket count of `table` and return the new threshold.
fn grow<K, V>(table: &mut ChainTable<K, V>, has_null: bool) -> usize {
    let old_capacity = table.capacity();
    let new_capacity = old_capacity
        .checked_mul(GROWTH_FACTOR)
        .unwrap_or_else(|| capacity_overflow());
    table.grow(new_capacity);
    let threshold = threshold_for(new_capacity);
    log::debug!(
        "ChainedHashMap resized: capacity {} -> {}, threshold={}, size={}",
        old_capacity,
        new_capacity,
        threshold,
        table.len() + usize::from(has_null)
    );
    threshold
}

#[cold]
fn capacity_overflow() -> ! {
    panic!("ChainedHashMap capacity overflow")
}

impl<K, V, S> Extend<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, S> fmt::Debug for ChainedHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedHashMap")
            .field("size", &self.size())
            .field("capacity", &self.capacity())
            .field("threshold", &self.threshold)
            .field("has_null_key", &self.contains_null())
            .finish()
    }
}
