//! Error types for the `bucket-table` crate

/// Errors reported by [`GrowableArray`](crate::GrowableArray) and
/// [`BucketedHashTable`](crate::BucketedHashTable).
///
/// Lookups that miss are not errors; they return `None` or `false`.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A single-element position was outside the valid range.
    ///
    /// Insertions accept `0..=len`, removals accept `0..len`.
    #[error("position {position} is out of bounds for length {len}")]
    PositionOutOfBounds { position: usize, len: usize },

    /// A range of `count` elements starting at `start` does not fit inside
    /// an array of length `len`.
    #[error("range of {count} elements at {start} is out of bounds for length {len}")]
    RangeOutOfBounds {
        start: usize,
        count: usize,
        len: usize,
    },

    /// A table was configured with zero buckets.
    #[error("a table needs at least one bucket")]
    NoBuckets,

    /// A table was configured with an initial bucket capacity of zero.
    #[error("initial bucket capacity must be at least one")]
    ZeroBucketCapacity,

    /// The requested capacity does not fit in the address space.
    #[error("requested capacity overflows the address space")]
    CapacityOverflow,

    /// The allocator refused to provide memory.
    #[error("allocator could not provide {bytes} bytes")]
    OutOfMemory { bytes: usize },
}

/// Coarse classification of [`Error`] values.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Caller passed a malformed argument; the container is unchanged.
    InvalidArgument,
    /// Memory could not be obtained; the container is unchanged.
    OutOfMemory,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::PositionOutOfBounds { .. }
            | Error::RangeOutOfBounds { .. }
            | Error::NoBuckets
            | Error::ZeroBucketCapacity => ErrorKind::InvalidArgument,
            Error::CapacityOverflow | Error::OutOfMemory { .. } => ErrorKind::OutOfMemory,
        }
    }
}
