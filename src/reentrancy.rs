//! Debug-only reentrancy guard for table operations.
//!
//! Table operations call user code (hashers, comparators, `Ord`/`Eq`
//! impls, value constructors) while a bucket is being searched or edited.
//! If that code reaches back into the same table through a raw pointer,
//! debug builds panic instead of observing a half-updated bucket. Release
//! builds compile the guard away.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-table operation tracker. Public entry points start with
/// `let _g = self.reentrancy.enter();`.
#[derive(Debug, Default)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    active: Cell<bool>,
    // Send but never Sync, in every build profile.
    _not_sync: PhantomData<Cell<()>>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(false),
            _not_sync: PhantomData,
        }
    }

    /// Mark an operation as running until the returned guard drops.
    ///
    /// Panics in debug builds if an operation is already running.
    #[inline]
    pub(crate) fn enter(&self) -> OperationGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.active.replace(true),
                "reentrant call into BucketedHashTable from user code"
            );
            OperationGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            OperationGuard { _owner: PhantomData }
        }
    }
}

/// Clears the running flag on drop.
pub(crate) struct OperationGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _owner: PhantomData<&'a DebugReentrancy>,
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.active.set(false);
    }
}
