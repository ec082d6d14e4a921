//! How a bucket finds a key: ordered (sorted bucket, binary search) or
//! equality-only (unsorted bucket, linear scan).

use crate::bucketed_hash_table::Entry;
use crate::growable_array::{GrowableArray, Position};
use core::cmp::Ordering;
use core::fmt;

/// Sorted buckets up to this length are scanned linearly.
pub(crate) const LINEAR_SCAN_MAX: usize = 2;

/// Key lookup strategy for the entries of one bucket.
pub trait KeyPolicy<K> {
    /// Whether buckets are kept sorted by key.
    const SORTED: bool;

    /// Find `key` in `bucket`.
    ///
    /// On a miss, `index` is where a new entry must go: the sorted insertion
    /// point for ordered policies, the end of the bucket otherwise.
    fn locate<V>(&self, bucket: &GrowableArray<Entry<K, V>>, key: &K) -> Position;

    /// True if `prev` must not be stored directly before `next`.
    ///
    /// Equal keys side by side are not a violation. Unsorted policies never
    /// report one.
    fn out_of_order(&self, prev: &K, next: &K) -> bool;
}

/// Binary search for longer buckets, a short linear scan otherwise.
fn locate_sorted<K, V, F>(bucket: &GrowableArray<Entry<K, V>>, mut cmp: F) -> Position
where
    F: FnMut(&K) -> Ordering,
{
    if bucket.len() > LINEAR_SCAN_MAX {
        bucket.binary_search_by(|e| cmp(&e.key))
    } else {
        bucket.linear_search_by(|e| cmp(&e.key))
    }
}

/// Buckets sorted by the key's `Ord` implementation. The default.
#[derive(Copy, Clone, Debug, Default)]
pub struct Ordered;

impl<K: Ord> KeyPolicy<K> for Ordered {
    const SORTED: bool = true;

    #[inline]
    fn locate<V>(&self, bucket: &GrowableArray<Entry<K, V>>, key: &K) -> Position {
        locate_sorted(bucket, |probe| probe.cmp(key))
    }

    #[inline]
    fn out_of_order(&self, prev: &K, next: &K) -> bool {
        prev.cmp(next) == Ordering::Greater
    }
}

/// Buckets sorted by a caller-supplied comparator.
#[derive(Copy, Clone)]
pub struct ByComparator<F> {
    cmp: F,
}

impl<F> ByComparator<F> {
    pub fn new(cmp: F) -> Self {
        Self { cmp }
    }
}

impl<F> fmt::Debug for ByComparator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ByComparator")
    }
}

impl<K, F> KeyPolicy<K> for ByComparator<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    const SORTED: bool = true;

    #[inline]
    fn locate<V>(&self, bucket: &GrowableArray<Entry<K, V>>, key: &K) -> Position {
        locate_sorted(bucket, |probe| (self.cmp)(probe, key))
    }

    #[inline]
    fn out_of_order(&self, prev: &K, next: &K) -> bool {
        (self.cmp)(prev, next) == Ordering::Greater
    }
}

/// Unsorted buckets compared with `Eq`; new entries are appended.
///
/// For keys without a natural order. Lookups cost a full scan of the
/// bucket, so prefer [`Ordered`] whenever the key type allows it.
#[derive(Copy, Clone, Debug, Default)]
pub struct Unordered;

impl<K: Eq> KeyPolicy<K> for Unordered {
    const SORTED: bool = false;

    fn locate<V>(&self, bucket: &GrowableArray<Entry<K, V>>, key: &K) -> Position {
        match bucket.iter().position(|e| e.key == *key) {
            Some(i) => Position::hit(i),
            None => Position::miss(bucket.len()),
        }
    }

    #[inline]
    fn out_of_order(&self, _prev: &K, _next: &K) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(keys: &[i32]) -> GrowableArray<Entry<i32, ()>> {
        keys.iter()
            .map(|&key| Entry { key, value: () })
            .collect()
    }

    /// Invariant: the linear path (tiny buckets) and binary path (larger
    /// buckets) agree on hits and insertion points.
    #[test]
    fn ordered_search_paths_agree() {
        for keys in [&[][..], &[4][..], &[2, 6][..], &[1, 3, 5, 7, 9, 11][..]] {
            let b = bucket(keys);
            for probe in 0..13 {
                let expect = match keys.binary_search(&probe) {
                    Ok(i) => Position::hit(i),
                    Err(i) => Position::miss(i),
                };
                assert_eq!(Ordered.locate(&b, &probe), expect, "keys {keys:?} probe {probe}");
            }
        }
    }

    #[test]
    fn comparator_can_reverse_order() {
        let desc = ByComparator::new(|a: &i32, b: &i32| b.cmp(a));
        let b = bucket(&[9, 7, 5, 3]);
        assert_eq!(desc.locate(&b, &5), Position::hit(2));
        assert_eq!(desc.locate(&b, &8), Position::miss(1));
        assert!(desc.out_of_order(&1, &2));
        assert!(!desc.out_of_order(&2, &2));
    }

    #[test]
    fn unordered_scans_and_appends() {
        let b = bucket(&[5, 1, 9]);
        assert_eq!(Unordered.locate(&b, &9), Position::hit(2));
        assert_eq!(Unordered.locate(&b, &4), Position::miss(3));
        assert!(!<Unordered as KeyPolicy<i32>>::out_of_order(&Unordered, &9, &1));
    }
}
