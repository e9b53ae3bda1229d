//! chained-hashmap: a single-threaded hash map that resolves collisions by
//! separate chaining, keeps a dedicated slot for the absent ("null") key and
//! doubles its bucket array once the load factor reaches 3/4.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small, predictable hash table whose bucket layout can be
//!   reasoned about directly (index = hash mod capacity).
//! - Layers:
//!   - ChainTable<K, V>: structural layer. A `Vec` of bucket heads plus a
//!     `SlotMap` arena of chain nodes linked by arena keys. Knows nothing
//!     about hashers; callers hand it precomputed hashes.
//!   - ChainedHashMap<K, V, S>: public API. Hashes keys, owns the null-key
//!     slot, enforces the growth threshold and guards against reentrancy.
//!
//! Constraints
//! - Single-threaded: no interior synchronization. The map is `Send` but
//!   not `Sync`; callers that share it across threads wrap the whole map
//!   in a lock.
//! - Unique keys: `put` on an existing key overwrites its value in place.
//! - No removal and no iteration over entries.
//! - Lookups never panic on a miss; they return `None`, the null key
//!   included.
//!
//! Sizing
//! - Capacity starts at 16 and doubles; threshold is `floor(capacity * 3/4)`.
//! - The check `size >= threshold` runs before every insert (also before an
//!   overwrite), so after any `put` the size never exceeds the threshold.
//! - Growth relinks existing nodes instead of reallocating them. Nodes are
//!   visited bucket by bucket, head to tail, and appended to their new
//!   chain, which keeps chain order deterministic across resizes.
//!
//! Hashing
//! - Each node stores its key's hash, masked to the non-negative `i64`
//!   range. Growth reuses the stored hash and never calls `K: Hash`.
//! - The hasher is a type parameter with a fixed-key default; there is no
//!   runtime hasher injection.
//!
//! Null key
//! - The null key lives outside the bucket array. A real key that happens
//!   to hash to bucket 0 is chained there like any other key and never
//!   aliases the null slot.
//!
//! Reentrancy
//! - The only user code the map runs is `K: Hash` and `K: Eq`. A
//!   debug-only guard panics if such a callback re-enters the same map.

mod chain_table;
mod chained_hash_map;
mod chained_hash_map_proptest;
pub mod config;
mod reentrancy;

// Public surface
pub use chained_hash_map::ChainedHashMap;
