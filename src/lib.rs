//! bucket-table: a growable array with an explicit growth policy, and a
//! hash table whose buckets are sorted growable arrays searched by binary
//! search.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: two small storage primitives that share one discipline:
//!   amortized array growth, order-preserving positional edits, and
//!   hash-bucket indexing.
//! - Layers:
//!   - RawBuffer<T>: uninitialized slots sized to an exact capacity; the
//!     only code that calls the allocator.
//!   - GrowableArray<T>: tracks which slots are live; growth policy,
//!     insert/remove at a position, linear and binary search, sorted insert.
//!   - BucketedHashTable<K, V, P, S>: a fixed number of
//!     `GrowableArray<Entry<K, V>>` buckets; `S: BuildHasher` picks the
//!     bucket and `P: KeyPolicy<K>` finds the key inside it.
//!
//! Constraints
//! - Single-threaded: no locks, no atomics. The table is `Send` but not
//!   `Sync`; wrap it in a mutex to share it.
//! - The bucket count is fixed at construction; there is no rehashing.
//! - Buckets allocate on first insertion, with exactly the configured
//!   initial capacity.
//! - Sorted buckets (`Ordered`, `ByComparator`) are non-decreasing by key
//!   after every operation. `Unordered` buckets keep arrival order.
//!
//! Reference lifetimes
//! - Values returned by `get`, `get_mut` and `get_or_insert` borrow the
//!   table. Any insert or remove can shift or reallocate a bucket, and the
//!   borrow checker rejects code that would keep such a reference across
//!   one.
//!
//! Failure model
//! - Malformed arguments (positions past the end, zero buckets) return
//!   [`Error`] values of kind [`ErrorKind::InvalidArgument`] and leave the
//!   container unchanged.
//! - Growth aborts on allocation failure, like `Vec`; `try_reserve` is the
//!   non-aborting variant.
//! - A missing key is not an error: lookups return `Option`/`bool`.
//!
//! Reentrancy
//! - Table operations run user code (hashing, comparisons, value
//!   constructors). A debug-only guard panics if that code re-enters the
//!   same table; release builds carry no cost.
//! - `Drop` for `K`/`V` may read the table. Entries are unlinked before
//!   they drop (`remove` hands the pair out first, `clear`/`free` zero each
//!   bucket's length first), so no guard is held while destructors run.
//!
//! Diagnostics
//! - `BucketedHashTable::diagnostics` reports bucket occupancy statistics
//!   and any entries found out of order, for tuning the hasher and bucket
//!   count or catching a comparator that is not a total order.

mod bucketed_hash_table;
pub mod config;
mod diagnostics;
mod error;
mod growable_array;
mod growable_array_proptest;
pub mod key_policy;
mod raw_buffer;
mod reentrancy;

// Public surface
pub use bucketed_hash_table::{BucketedHashTable, Entry};
pub use config::TableConfig;
pub use diagnostics::{BucketStats, OrderViolation};
pub use error::{Error, ErrorKind};
pub use growable_array::{GrowableArray, Position};
pub use key_policy::{ByComparator, KeyPolicy, Ordered, Unordered};
