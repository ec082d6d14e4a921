//! BucketedHashTable: a fixed set of buckets, each a sorted GrowableArray
//! of key/value entries.
//!
//! A key's bucket is `hash(key) % num_buckets`. Within a bucket, entries are
//! kept in key order and found by binary search (a linear scan for buckets
//! of at most two entries). The bucket count never changes after
//! construction; buckets allocate lazily on their first insertion.
//!
//! References handed out by lookups borrow the whole table, so the borrow
//! checker forces callers to release them before the next insert or remove,
//! which may shift or reallocate the bucket they point into.

use crate::config::TableConfig;
use crate::diagnostics::BucketStats;
use crate::error::Error;
use crate::growable_array::{GrowableArray, Position};
use crate::key_policy::{ByComparator, KeyPolicy, Ordered, Unordered};
use crate::reentrancy::DebugReentrancy;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// A key/value pair stored in a bucket.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

pub struct BucketedHashTable<K, V, P = Ordered, S = DefaultHashBuilder> {
    buckets: Box<[GrowableArray<Entry<K, V>>]>,
    initial_bucket_capacity: usize,
    policy: P,
    hasher: S,
    reentrancy: DebugReentrancy,
}

impl<K, V> BucketedHashTable<K, V>
where
    K: Ord + Hash,
{
    /// Sorted table with the default configuration and hasher.
    pub fn new() -> Self {
        Self::from_parts(TableConfig::default(), Ordered, DefaultHashBuilder::default())
    }

    /// Sorted table with `num_buckets` buckets.
    pub fn with_buckets(num_buckets: usize) -> Result<Self, Error> {
        Self::with_config(TableConfig::default().with_num_buckets(num_buckets))
    }

    pub fn with_config(config: TableConfig) -> Result<Self, Error> {
        Self::with_parts(config, Ordered, DefaultHashBuilder::default())
    }
}

impl<K, V> Default for BucketedHashTable<K, V>
where
    K: Ord + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, F> BucketedHashTable<K, V, ByComparator<F>>
where
    K: Hash,
    F: Fn(&K, &K) -> Ordering,
{
    /// Table whose buckets are sorted by `cmp` instead of `K: Ord`.
    pub fn with_comparator(config: TableConfig, cmp: F) -> Result<Self, Error> {
        Self::with_parts(config, ByComparator::new(cmp), DefaultHashBuilder::default())
    }
}

impl<K, V> BucketedHashTable<K, V, Unordered>
where
    K: Eq + Hash,
{
    /// Table with unsorted buckets, for keys that have no ordering.
    ///
    /// Lookups scan the whole bucket; use a sorted table when possible.
    pub fn unordered(config: TableConfig) -> Result<Self, Error> {
        Self::with_parts(config, Unordered, DefaultHashBuilder::default())
    }
}

impl<K, V, P, S> BucketedHashTable<K, V, P, S>
where
    K: Hash,
    P: KeyPolicy<K>,
    S: BuildHasher,
{
    /// Build a table from an explicit configuration, key policy and hasher.
    pub fn with_parts(config: TableConfig, policy: P, hasher: S) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::from_parts(config, policy, hasher))
    }

    fn from_parts(config: TableConfig, policy: P, hasher: S) -> Self {
        debug_assert!(config.validate().is_ok());
        let buckets = (0..config.num_buckets)
            .map(|_| GrowableArray::new())
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            buckets,
            initial_bucket_capacity: config.initial_bucket_capacity,
            policy,
            hasher,
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    pub fn initial_bucket_capacity(&self) -> usize {
        self.initial_bucket_capacity
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Index of the bucket `key` belongs to.
    pub fn bucket_index(&self, key: &K) -> usize {
        let _g = self.reentrancy.enter();
        self.index_of(key)
    }

    fn index_of(&self, key: &K) -> usize {
        (self.hasher.hash_one(key) % self.buckets.len() as u64) as usize
    }

    /// Entries of bucket `index`, in stored order.
    pub fn bucket(&self, index: usize) -> Option<&[Entry<K, V>]> {
        self.buckets.get(index).map(|b| b.as_slice())
    }

    /// Number of entries. Walks every bucket.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| b.is_empty())
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let _g = self.reentrancy.enter();
        let bucket = &self.buckets[self.index_of(key)];
        if bucket.is_empty() {
            return None;
        }
        let pos = self.policy.locate(bucket, key);
        pos.found.then(|| &bucket[pos.index].value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let _g = self.reentrancy.enter();
        let idx = self.index_of(key);
        let bucket = &mut self.buckets[idx];
        if bucket.is_empty() {
            return None;
        }
        let pos = self.policy.locate(bucket, key);
        if pos.found {
            Some(&mut bucket[pos.index].value)
        } else {
            None
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Return the value stored for `key`, inserting `V::default()` first if
    /// the key is absent. The flag is true when the key was already present.
    pub fn get_or_insert(&mut self, key: K) -> (&mut V, bool)
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Like [`get_or_insert`](Self::get_or_insert); `default` only runs when
    /// a new entry is created.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> (&mut V, bool)
    where
        F: FnOnce() -> V,
    {
        let _g = self.reentrancy.enter();
        let idx = self.index_of(&key);
        let bucket = &mut self.buckets[idx];
        let pos = prepare_slot(bucket, &self.policy, &key, self.initial_bucket_capacity);
        if !pos.found {
            let value = default();
            bucket.insert_unchecked(Entry { key, value }, pos.index);
        }
        (&mut bucket[pos.index].value, pos.found)
    }

    /// Store `value` under `key`, returning the value it replaced.
    ///
    /// An existing key keeps its original key object.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let _g = self.reentrancy.enter();
        let idx = self.index_of(&key);
        let bucket = &mut self.buckets[idx];
        let pos = prepare_slot(bucket, &self.policy, &key, self.initial_bucket_capacity);
        if pos.found {
            Some(core::mem::replace(&mut bucket[pos.index].value, value))
        } else {
            bucket.insert_unchecked(Entry { key, value }, pos.index);
            None
        }
    }

    /// Remove `key`. Returns whether an entry was removed.
    pub fn remove(&mut self, key: &K) -> bool {
        self.remove_entry(key).is_some()
    }

    /// Remove `key` and hand back the stored pair.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let _g = self.reentrancy.enter();
        let idx = self.index_of(key);
        let bucket = &mut self.buckets[idx];
        if bucket.is_empty() {
            return None;
        }
        let pos = self.policy.locate(bucket, key);
        if !pos.found {
            return None;
        }
        bucket
            .remove_at(pos.index)
            .ok()
            .map(|Entry { key, value }| (key, value))
    }

    /// Drop every entry. Bucket allocations are kept.
    ///
    /// Runs without the reentrancy guard: a bucket's length is zeroed
    /// before its entries drop, so `Drop` impls may read the table.
    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.clear();
        }
    }

    /// Reallocate every bucket to its exact length.
    pub fn shrink_to_fit(&mut self) {
        let _g = self.reentrancy.enter();
        for bucket in self.buckets.iter_mut() {
            bucket.shrink_to_fit();
        }
    }

    /// Drop every entry and release every bucket allocation.
    ///
    /// Buckets allocate again lazily on their next insertion. Like
    /// [`clear`](Self::clear), entry destructors may read the table.
    pub fn free(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.free();
        }
    }

    /// Occupancy statistics plus any adjacent entries found out of order.
    pub fn diagnostics(&self) -> BucketStats {
        let _g = self.reentrancy.enter();
        BucketStats::collect(&self.buckets, &self.policy)
    }

    /// All entries, bucket by bucket, in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .flat_map(|b| b.iter())
            .map(|e| (&e.key, &e.value))
    }

    /// Like [`iter`](Self::iter) with mutable values. Keys stay immutable
    /// so bucket order cannot be broken.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> {
        self.buckets
            .iter_mut()
            .flat_map(|b| b.iter_mut())
            .map(|e| (&e.key, &mut e.value))
    }
}

/// Allocate `bucket` on first use, then find where `key` is or belongs.
fn prepare_slot<K, V, P>(
    bucket: &mut GrowableArray<Entry<K, V>>,
    policy: &P,
    key: &K,
    initial_capacity: usize,
) -> Position
where
    P: KeyPolicy<K>,
{
    if bucket.capacity() == 0 {
        bucket.reserve(initial_capacity);
    }
    policy.locate(bucket, key)
}

impl<K, V, P, S> fmt::Debug for BucketedHashTable<K, V, P, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.buckets
                    .iter()
                    .flat_map(|b| b.iter())
                    .map(|e| (&e.key, &e.value)),
            )
            .finish()
    }
}
