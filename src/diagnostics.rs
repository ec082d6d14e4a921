//! Bucket occupancy statistics and sortedness checks.
//!
//! Useful when tuning the hasher and bucket count: a good configuration
//! keeps the standard deviation of bucket lengths small relative to the
//! mean. Ordering problems (usually a comparator that is not a total order,
//! or keys mutated in place) are reported as [`OrderViolation`]s rather
//! than panics.

use crate::bucketed_hash_table::Entry;
use crate::growable_array::GrowableArray;
use crate::key_policy::KeyPolicy;
use core::fmt;

/// An adjacent pair of entries stored in the wrong order.
///
/// The entry at `index` sorts strictly before the one at `index - 1`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OrderViolation {
    pub bucket: usize,
    pub index: usize,
}

/// Snapshot of a table's shape.
#[derive(Clone, Debug, PartialEq)]
pub struct BucketStats {
    pub num_buckets: usize,
    /// Buckets that currently own an allocation.
    pub allocated_buckets: usize,
    pub total_items: usize,
    pub min_len: usize,
    pub max_len: usize,
    pub mean_len: f64,
    /// Population variance of bucket lengths.
    pub variance: f64,
    pub std_dev: f64,
    pub violations: Vec<OrderViolation>,
}

impl BucketStats {
    /// True if no bucket has entries out of order.
    pub fn is_sorted(&self) -> bool {
        self.violations.is_empty()
    }

    pub(crate) fn collect<K, V, P>(buckets: &[GrowableArray<Entry<K, V>>], policy: &P) -> Self
    where
        P: KeyPolicy<K>,
    {
        let num_buckets = buckets.len();
        let mut total_items = 0;
        let mut allocated_buckets = 0;
        let mut min_len = usize::MAX;
        let mut max_len = 0;
        let mut violations = Vec::new();

        for (b, bucket) in buckets.iter().enumerate() {
            let len = bucket.len();
            total_items += len;
            min_len = min_len.min(len);
            max_len = max_len.max(len);
            if bucket.capacity() > 0 {
                allocated_buckets += 1;
            }
            if P::SORTED {
                for (i, pair) in bucket.windows(2).enumerate() {
                    if policy.out_of_order(&pair[0].key, &pair[1].key) {
                        violations.push(OrderViolation {
                            bucket: b,
                            index: i + 1,
                        });
                    }
                }
            }
        }
        if num_buckets == 0 {
            min_len = 0;
        }

        let n = num_buckets.max(1) as f64;
        let mean_len = total_items as f64 / n;
        let variance = buckets
            .iter()
            .map(|bucket| {
                let d = bucket.len() as f64 - mean_len;
                d * d
            })
            .sum::<f64>()
            / n;

        BucketStats {
            num_buckets,
            allocated_buckets,
            total_items,
            min_len,
            max_len,
            mean_len,
            variance,
            std_dev: variance.sqrt(),
            violations,
        }
    }
}

impl fmt::Display for BucketStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} items in {} buckets ({} allocated): min {}, max {}, mean {:.3}, variance {:.3}, std dev {:.3}",
            self.total_items,
            self.num_buckets,
            self.allocated_buckets,
            self.min_len,
            self.max_len,
            self.mean_len,
            self.variance,
            self.std_dev,
        )?;
        for v in &self.violations {
            write!(
                f,
                "\nwarning: bucket {} entry {} sorts before entry {}",
                v.bucket,
                v.index,
                v.index - 1
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_policy::{ByComparator, Ordered, Unordered};

    fn buckets(layout: &[&[u32]]) -> Vec<GrowableArray<Entry<u32, ()>>> {
        layout
            .iter()
            .map(|keys| keys.iter().map(|&key| Entry { key, value: () }).collect())
            .collect()
    }

    #[test]
    fn occupancy_statistics() {
        let b = buckets(&[&[1, 2, 3], &[], &[4], &[5, 6, 7, 8]]);
        let s = BucketStats::collect(&b, &Ordered);
        assert_eq!(s.num_buckets, 4);
        assert_eq!(s.allocated_buckets, 3);
        assert_eq!(s.total_items, 8);
        assert_eq!(s.min_len, 0);
        assert_eq!(s.max_len, 4);
        assert_eq!(s.mean_len, 2.0);
        // (1 + 4 + 1 + 4) / 4
        assert_eq!(s.variance, 2.5);
        assert!((s.std_dev - 2.5f64.sqrt()).abs() < 1e-12);
        assert!(s.is_sorted());
    }

    #[test]
    fn violations_point_at_the_later_entry() {
        let b = buckets(&[&[1, 3, 2, 2], &[9, 4]]);
        let s = BucketStats::collect(&b, &Ordered);
        assert_eq!(
            s.violations,
            vec![
                OrderViolation { bucket: 0, index: 2 },
                OrderViolation { bucket: 1, index: 1 },
            ]
        );
        let report = s.to_string();
        assert!(report.contains("warning: bucket 0 entry 2 sorts before entry 1"));
        assert!(report.contains("warning: bucket 1 entry 1 sorts before entry 0"));
    }

    #[test]
    fn equal_neighbours_are_allowed() {
        let b = buckets(&[&[2, 2, 2]]);
        assert!(BucketStats::collect(&b, &Ordered).is_sorted());
    }

    #[test]
    fn policy_decides_what_sorted_means() {
        let b = buckets(&[&[9, 4, 1]]);
        let desc = ByComparator::new(|a: &u32, b: &u32| b.cmp(a));
        assert!(BucketStats::collect(&b, &desc).is_sorted());
        assert!(BucketStats::collect(&b, &Unordered).is_sorted());
        assert!(!BucketStats::collect(&b, &Ordered).is_sorted());
    }
}
