//! RawBuffer: uninitialized element storage sized to an exact capacity.
//!
//! This is the only module that talks to the global allocator. It never
//! reads or drops elements; tracking which slots are live is the job of
//! `GrowableArray`.

use crate::error::Error;
use core::alloc::Layout;
use core::marker::PhantomData;
use core::mem;
use core::ptr::NonNull;
use std::alloc;

/// Why a capacity change could not be carried out.
#[derive(Debug)]
pub(crate) enum AllocFailure {
    CapacityOverflow,
    Exhausted(Layout),
}

impl AllocFailure {
    /// Fail the way `Vec` does: panic on overflow, abort on exhaustion.
    pub(crate) fn raise(self) -> ! {
        match self {
            AllocFailure::CapacityOverflow => panic!("capacity overflow"),
            AllocFailure::Exhausted(layout) => alloc::handle_alloc_error(layout),
        }
    }
}

impl From<AllocFailure> for Error {
    fn from(failure: AllocFailure) -> Self {
        match failure {
            AllocFailure::CapacityOverflow => Error::CapacityOverflow,
            AllocFailure::Exhausted(layout) => Error::OutOfMemory {
                bytes: layout.size(),
            },
        }
    }
}

pub(crate) struct RawBuffer<T> {
    ptr: NonNull<T>,
    cap: usize,
    _owns: PhantomData<T>,
}

// SAFETY: RawBuffer uniquely owns its allocation, like Box<[T]>.
unsafe impl<T: Send> Send for RawBuffer<T> {}
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    pub(crate) const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            _owns: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    fn layout(cap: usize) -> Result<Layout, AllocFailure> {
        Layout::array::<T>(cap).map_err(|_| AllocFailure::CapacityOverflow)
    }

    /// Reallocate to exactly `new_cap` slots.
    ///
    /// Slots `[0, min(cap, new_cap))` keep their bytes. Anything living at
    /// or past `new_cap` must already have been dropped or moved out by the
    /// caller. On failure the buffer is left untouched.
    pub(crate) fn set_capacity(&mut self, new_cap: usize) -> Result<(), AllocFailure> {
        if new_cap == self.cap {
            return Ok(());
        }
        if Self::IS_ZST {
            self.cap = new_cap;
            return Ok(());
        }
        if new_cap == 0 {
            self.release();
            return Ok(());
        }

        let new_layout = Self::layout(new_cap)?;
        let raw = if self.cap == 0 {
            // SAFETY: T is not zero-sized and new_cap > 0, so the layout has
            // a non-zero size.
            unsafe { alloc::alloc(new_layout) }
        } else {
            let old_layout = Self::layout(self.cap)?;
            // SAFETY: ptr came from this allocator with `old_layout`; the new
            // size is non-zero and Layout::array bounded it by isize::MAX.
            unsafe { alloc::realloc(self.ptr.as_ptr().cast::<u8>(), old_layout, new_layout.size()) }
        };

        match NonNull::new(raw.cast::<T>()) {
            Some(ptr) => {
                self.ptr = ptr;
                self.cap = new_cap;
                Ok(())
            }
            None => Err(AllocFailure::Exhausted(new_layout)),
        }
    }

    /// Return the allocation. Live elements must already be dropped.
    pub(crate) fn release(&mut self) {
        if !Self::IS_ZST && self.cap > 0 {
            if let Ok(layout) = Self::layout(self.cap) {
                // SAFETY: the allocation was made with exactly this layout.
                unsafe { alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), layout) };
            }
        }
        self.ptr = NonNull::dangling();
        self.cap = 0;
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        self.release();
    }
}
