//! ChainTable: structural layer holding the bucket array and collision chains.
//!
//! Entries live in a `SlotMap` arena; a bucket stores the key of its chain
//! head and each entry stores the key of its successor. Every entry carries
//! the hash it was inserted with, so relinking on growth never calls back
//! into `K: Hash`. The only user code this layer runs is the equality
//! closure handed to lookups and `K: Eq` in `upsert`.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Arena key of a chain node.
    pub(crate) struct EntryKey;
}

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
    next: Option<EntryKey>,
}

/// Outcome of [`ChainTable::upsert`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Upsert {
    /// A new node was linked; the table grew by one entry.
    Inserted,
    /// An equal key was already present and its value was overwritten.
    Updated,
}

pub(crate) struct ChainTable<K, V> {
    buckets: Vec<Option<EntryKey>>,
    entries: SlotMap<EntryKey, Entry<K, V>>,
}

impl<K, V> ChainTable<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "a chain table needs at least one bucket");
        Self {
            buckets: vec![None; capacity],
            entries: SlotMap::with_capacity_and_key(capacity),
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Number of live nodes across all chains.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    fn bucket_index(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    /// Walk the chain for `hash` and return the first node whose key
    /// satisfies `is_match`. Nodes with a different cached hash are skipped
    /// without running `is_match`.
    pub(crate) fn find<F>(&self, hash: u64, mut is_match: F) -> Option<EntryKey>
    where
        F: FnMut(&K) -> bool,
    {
        let mut cursor = self.buckets[self.bucket_index(hash)];
        while let Some(k) = cursor {
            let entry = &self.entries[k];
            if entry.hash == hash && is_match(&entry.key) {
                return Some(k);
            }
            cursor = entry.next;
        }
        None
    }

    pub(crate) fn get<F>(&self, hash: u64, is_match: F) -> Option<&V>
    where
        F: FnMut(&K) -> bool,
    {
        let k = self.find(hash, is_match)?;
        self.entries.get(k).map(|e| &e.value)
    }

    pub(crate) fn get_mut<F>(&mut self, hash: u64, is_match: F) -> Option<&mut V>
    where
        F: FnMut(&K) -> bool,
    {
        let k = self.find(hash, is_match)?;
        self.entries.get_mut(k).map(|e| &mut e.value)
    }

    /// Overwrite the value of an equal key in the chain for `hash`, or append
    /// a new node at the chain tail.
    pub(crate) fn upsert(&mut self, hash: u64, key: K, value: V) -> Upsert
    where
        K: Eq,
    {
        let idx = self.bucket_index(hash);
        let mut tail = None;
        let mut cursor = self.buckets[idx];
        while let Some(k) = cursor {
            let entry = &mut self.entries[k];
            if entry.hash == hash && entry.key == key {
                entry.value = value;
                return Upsert::Updated;
            }
            tail = Some(k);
            cursor = entry.next;
        }

        let node = self.entries.insert(Entry {
            key,
            value,
            hash,
            next: None,
        });
        self.link_after(idx, tail, node);
        Upsert::Inserted
    }

    /// Make `node` the successor of `tail`, or the head of bucket `idx` when
    /// the chain is empty.
    #[inline]
    fn link_after(&mut self, idx: usize, tail: Option<EntryKey>, node: EntryKey) {
        match tail {
            Some(t) => self.entries[t].next = Some(node),
            None => self.buckets[idx] = Some(node),
        }
    }

    /// Replace the bucket array with `new_capacity` empty buckets and relink
    /// every node under its new index.
    ///
    /// Nodes are visited bucket by bucket, head to tail, and appended to the
    /// tail of their new chain, so two nodes sharing a new bucket keep the
    /// relative order they had in that traversal.
    pub(crate) fn grow(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity >= self.buckets.len());
        let old = std::mem::replace(&mut self.buckets, vec![None; new_capacity]);
        let mut tails: Vec<Option<EntryKey>> = vec![None; new_capacity];

        for head in old {
            let mut cursor = head;
            while let Some(k) = cursor {
                let hash = {
                    let entry = &mut self.entries[k];
                    cursor = entry.next.take();
                    entry.hash
                };
                let idx = self.bucket_index(hash);
                self.link_after(idx, tails[idx], k);
                tails[idx] = Some(k);
            }
        }
    }

    /// Keys of bucket `idx`, head to tail.
    #[cfg(test)]
    pub(crate) fn chain_keys(&self, idx: usize) -> Vec<&K> {
        let mut out = Vec::new();
        let mut cursor = self.buckets[idx];
        while let Some(k) = cursor {
            let entry = &self.entries[k];
            out.push(&entry.key);
            cursor = entry.next;
        }
        out
    }

    /// Panics unless every node is reachable exactly once and sits in the
    /// bucket its cached hash maps to.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let mut seen = 0usize;
        for (idx, head) in self.buckets.iter().enumerate() {
            let mut cursor = *head;
            while let Some(k) = cursor {
                seen += 1;
                assert!(seen <= self.entries.len(), "cycle or shared node in chains");
                let entry = &self.entries[k];
                assert_eq!(self.bucket_index(entry.hash), idx, "node in wrong bucket");
                cursor = entry.next;
            }
        }
        assert_eq!(seen, self.entries.len(), "unreachable nodes in arena");
    }
}
