//! Table configuration.

use crate::error::Error;

/// Bucket count used by [`TableConfig::default`].
pub const DEFAULT_NUM_BUCKETS: usize = 256;

/// Capacity reserved on a bucket's first insertion by default.
pub const DEFAULT_BUCKET_CAPACITY: usize = 4;

/// Shape of a [`BucketedHashTable`](crate::BucketedHashTable), fixed for
/// the table's lifetime.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TableConfig {
    /// Number of buckets. Must be at least one.
    pub num_buckets: usize,
    /// Capacity reserved when a bucket receives its first entry. Must be at
    /// least one.
    pub initial_bucket_capacity: usize,
}

impl TableConfig {
    pub const fn new(num_buckets: usize, initial_bucket_capacity: usize) -> Self {
        Self {
            num_buckets,
            initial_bucket_capacity,
        }
    }

    pub const fn with_num_buckets(mut self, num_buckets: usize) -> Self {
        self.num_buckets = num_buckets;
        self
    }

    pub const fn with_initial_bucket_capacity(mut self, capacity: usize) -> Self {
        self.initial_bucket_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.num_buckets == 0 {
            return Err(Error::NoBuckets);
        }
        if self.initial_bucket_capacity == 0 {
            return Err(Error::ZeroBucketCapacity);
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_BUCKETS, DEFAULT_BUCKET_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(TableConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_values_are_rejected() {
        let c = TableConfig::default().with_num_buckets(0);
        assert_eq!(c.validate(), Err(Error::NoBuckets));
        let c = TableConfig::default().with_initial_bucket_capacity(0);
        assert_eq!(c.validate(), Err(Error::ZeroBucketCapacity));
    }

    #[test]
    fn setters_chain() {
        let c = TableConfig::default()
            .with_num_buckets(7)
            .with_initial_bucket_capacity(2);
        assert_eq!(c, TableConfig::new(7, 2));
    }
}
