//! GrowableArray: contiguous owned storage with an explicit growth policy,
//! positional insert/remove and linear/binary search.
//!
//! Growth policy
//! - `reserve(n)` is a no-op when `n <= capacity`.
//! - Otherwise the new capacity is `n + capacity / 2`: enough for the
//!   request plus half the prior capacity as slack.
//! - The first reservation of an empty array (`capacity == 0`, `n > 1`)
//!   allocates exactly `n`, so a caller-chosen initial size is honored.
//! - Capacity only shrinks through `shrink_to_fit` and `free`.
//!
//! Aliasing
//! - Rust forbids passing `&self[i]` into a `&mut self` method, so the
//!   self-referential forms are explicit: `push_from_within` and
//!   `insert_from_within` clone the source into a staging array before the
//!   buffer can move.

use crate::error::Error;
use crate::raw_buffer::{AllocFailure, RawBuffer};
use core::cmp::Ordering;
use core::fmt;
use core::ops::{Deref, DerefMut, Range};
use core::ptr;
use core::slice;

/// Outcome of a search: where the key is, or where it would be inserted.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Position {
    /// Index of the match, or the insertion point that keeps order.
    pub index: usize,
    /// Whether an element comparing equal was found at `index`.
    pub found: bool,
}

impl Position {
    #[inline]
    pub(crate) fn hit(index: usize) -> Self {
        Position { index, found: true }
    }

    #[inline]
    pub(crate) fn miss(index: usize) -> Self {
        Position {
            index,
            found: false,
        }
    }
}

/// Capacity chosen by `reserve` for a request of `min_capacity` slots.
fn grown_capacity(capacity: usize, min_capacity: usize) -> Option<usize> {
    if capacity == 0 && min_capacity > 1 {
        return Some(min_capacity);
    }
    // capacity + (min_capacity - capacity) + capacity / 2
    min_capacity.checked_add(capacity / 2)
}

/// Owned, contiguous, resizable sequence.
pub struct GrowableArray<T> {
    buf: RawBuffer<T>,
    len: usize,
}

impl<T> GrowableArray<T> {
    /// Create an empty array. Does not allocate.
    pub const fn new() -> Self {
        Self {
            buf: RawBuffer::new(),
            len: 0,
        }
    }

    /// Create an empty array with exactly `capacity` slots reserved.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut a = Self::new();
        a.reserve(capacity);
        a
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [0, len) are initialized and the pointer is
        // non-null and aligned even when nothing is allocated.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, with exclusive access through &mut self.
        unsafe { slice::from_raw_parts_mut(self.buf.as_ptr(), self.len) }
    }

    /// Make room for at least `min_capacity` elements.
    ///
    /// Aborts on allocation failure and panics if the capacity overflows.
    pub fn reserve(&mut self, min_capacity: usize) {
        if let Err(failure) = self.grow_to(min_capacity) {
            failure.raise();
        }
    }

    /// Like [`reserve`](Self::reserve), but reports failure instead of
    /// aborting. The array is unchanged on error.
    pub fn try_reserve(&mut self, min_capacity: usize) -> Result<(), Error> {
        self.grow_to(min_capacity).map_err(Error::from)
    }

    fn grow_to(&mut self, min_capacity: usize) -> Result<(), AllocFailure> {
        let capacity = self.capacity();
        if min_capacity <= capacity {
            return Ok(());
        }
        let target = grown_capacity(capacity, min_capacity)
            .ok_or(AllocFailure::CapacityOverflow)?;
        self.buf.set_capacity(target)
    }

    /// Capacity needed to hold `additional` more elements.
    fn required(&self, additional: usize) -> usize {
        match self.len.checked_add(additional) {
            Some(n) => n,
            None => AllocFailure::CapacityOverflow.raise(),
        }
    }

    /// Shorten the array to `new_len`, dropping `[new_len, len)` in index
    /// order. No-op if `new_len >= len`.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let dropped = self.len - new_len;
        // Shrink first so a panicking destructor cannot cause a double drop.
        self.len = new_len;
        // SAFETY: [new_len, new_len + dropped) were live and are no longer
        // reachable through `len`.
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(self.buf.as_ptr().add(new_len), dropped);
            ptr::drop_in_place(tail);
        }
    }

    /// Set the length to `new_len`, filling new slots with `f()`.
    pub fn resize_with<F>(&mut self, new_len: usize, mut f: F)
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }
        self.reserve(new_len);
        while self.len < new_len {
            let value = f();
            // SAFETY: len < new_len <= capacity, and the slot is vacant.
            unsafe { self.buf.as_ptr().add(self.len).write(value) };
            self.len += 1;
        }
    }

    /// Append `value`.
    pub fn push_back(&mut self, value: T) {
        let needed = self.required(1);
        self.reserve(needed);
        // SAFETY: len < capacity after the reserve.
        unsafe { self.buf.as_ptr().add(self.len).write(value) };
        self.len += 1;
    }

    /// Remove and return the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot at the old last index was live and is now past len.
        Some(unsafe { self.buf.as_ptr().add(self.len).read() })
    }

    /// Insert `value` at `position`, shifting `[position, len)` right.
    ///
    /// `position` may equal `len` (append).
    pub fn insert_at(&mut self, value: T, position: usize) -> Result<(), Error> {
        if position > self.len {
            return Err(Error::PositionOutOfBounds {
                position,
                len: self.len,
            });
        }
        self.insert_unchecked(value, position);
        Ok(())
    }

    pub(crate) fn insert_unchecked(&mut self, value: T, position: usize) {
        debug_assert!(position <= self.len);
        let needed = self.required(1);
        self.reserve(needed);
        // SAFETY: position <= len < capacity; the tail move stays in bounds.
        unsafe {
            let p = self.buf.as_ptr().add(position);
            ptr::copy(p, p.add(1), self.len - position);
            p.write(value);
        }
        self.len += 1;
    }

    /// Insert every item of `values` at `position`, preserving their order.
    ///
    /// The items are gathered into a staging array before the tail moves.
    pub fn insert_range_at<I>(&mut self, values: I, position: usize) -> Result<(), Error>
    where
        I: IntoIterator<Item = T>,
    {
        if position > self.len {
            return Err(Error::PositionOutOfBounds {
                position,
                len: self.len,
            });
        }
        let staged: GrowableArray<T> = values.into_iter().collect();
        self.splice_staged(staged, position);
        Ok(())
    }

    /// Move every element of `staged` into `self` at `position`.
    fn splice_staged(&mut self, mut staged: GrowableArray<T>, position: usize) {
        debug_assert!(position <= self.len);
        let count = staged.len;
        if count == 0 {
            return;
        }
        let needed = self.required(count);
        self.reserve(needed);
        // SAFETY: capacity >= len + count. The tail moves within our buffer;
        // the staged items come from a separate allocation and ownership is
        // transferred by zeroing `staged.len` before it drops.
        unsafe {
            let p = self.buf.as_ptr().add(position);
            ptr::copy(p, p.add(count), self.len - position);
            ptr::copy_nonoverlapping(staged.buf.as_ptr(), p, count);
            staged.len = 0;
        }
        self.len += count;
    }

    /// Remove and return the element at `position`, shifting the tail left.
    pub fn remove_at(&mut self, position: usize) -> Result<T, Error> {
        if position >= self.len {
            return Err(Error::PositionOutOfBounds {
                position,
                len: self.len,
            });
        }
        // SAFETY: position < len; after the read the slot is logically
        // vacant and the tail is shifted over it.
        let value = unsafe {
            let p = self.buf.as_ptr().add(position);
            let value = p.read();
            ptr::copy(p.add(1), p, self.len - position - 1);
            value
        };
        self.len -= 1;
        Ok(value)
    }

    /// Drop `count` elements starting at `start` and close the gap.
    pub fn remove_range_at(&mut self, start: usize, count: usize) -> Result<(), Error> {
        let end = match start.checked_add(count) {
            Some(end) if end <= self.len => end,
            _ => {
                return Err(Error::RangeOutOfBounds {
                    start,
                    count,
                    len: self.len,
                })
            }
        };
        if count == 0 {
            return Ok(());
        }
        let old_len = self.len;
        // A panicking destructor leaks the tail instead of double dropping.
        self.len = start;
        // SAFETY: [start, end) are live; after dropping them the tail
        // [end, old_len) is moved down over the vacated slots.
        unsafe {
            let base = self.buf.as_ptr();
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base.add(start), count));
            ptr::copy(base.add(end), base.add(start), old_len - end);
        }
        self.len = old_len - count;
        Ok(())
    }

    /// Scan from the front for the first element not ordered before the key.
    ///
    /// `f` reports how an element compares to the key being searched for
    /// (the same convention as `slice::binary_search_by`). Returns `len`
    /// with `found == false` when every element is smaller.
    pub fn linear_search_by<F>(&self, mut f: F) -> Position
    where
        F: FnMut(&T) -> Ordering,
    {
        for (i, item) in self.as_slice().iter().enumerate() {
            match f(item) {
                Ordering::Less => continue,
                Ordering::Equal => return Position::hit(i),
                Ordering::Greater => return Position::miss(i),
            }
        }
        Position::miss(self.len)
    }

    /// Binary search over a sorted array.
    ///
    /// Stops at the first equal element probed; with duplicates present any
    /// one of them may be reported. On a miss, `index` is the insertion
    /// point that keeps the array sorted.
    pub fn binary_search_by<F>(&self, mut f: F) -> Position
    where
        F: FnMut(&T) -> Ordering,
    {
        let items = self.as_slice();
        let mut lo = 0;
        let mut hi = items.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match f(&items[mid]) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Position::hit(mid),
            }
        }
        Position::miss(lo)
    }

    /// Insert into a sorted array, keeping it sorted under `cmp`.
    ///
    /// When an equal element exists and `allow_duplicate` is false, nothing
    /// is inserted and `value` is dropped. The returned position reports the
    /// index used and whether an equal element was already present.
    pub fn insert_sorted_by<F>(&mut self, value: T, allow_duplicate: bool, mut cmp: F) -> Position
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let pos = self.binary_search_by(|probe| cmp(probe, &value));
        if !pos.found || allow_duplicate {
            self.insert_unchecked(value, pos.index);
        }
        pos
    }

    /// True if no adjacent pair is ordered `Greater` under `cmp`.
    pub fn is_sorted_by<F>(&self, mut cmp: F) -> bool
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.as_slice()
            .windows(2)
            .all(|w| cmp(&w[0], &w[1]) != Ordering::Greater)
    }

    /// Reallocate to exactly `len` slots; releases the buffer when empty.
    pub fn shrink_to_fit(&mut self) {
        if let Err(failure) = self.buf.set_capacity(self.len) {
            failure.raise();
        }
    }

    /// Drop every element; capacity is retained.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Drop every element and release the buffer. Safe to call repeatedly.
    pub fn free(&mut self) {
        self.clear();
        self.buf.release();
    }
}

impl<T: Default> GrowableArray<T> {
    /// Set the length to `new_len`, filling new slots with `T::default()`.
    pub fn resize(&mut self, new_len: usize) {
        self.resize_with(new_len, T::default);
    }
}

impl<T: Clone> GrowableArray<T> {
    /// Append a copy of the element at `index` of this same array.
    pub fn push_from_within(&mut self, index: usize) -> Result<(), Error> {
        let copy = match self.as_slice().get(index) {
            Some(item) => item.clone(),
            None => {
                return Err(Error::PositionOutOfBounds {
                    position: index,
                    len: self.len,
                })
            }
        };
        self.push_back(copy);
        Ok(())
    }

    /// Insert copies of `source` (a range of this array) at `position`.
    ///
    /// Source and destination may overlap.
    pub fn insert_from_within(&mut self, source: Range<usize>, position: usize) -> Result<(), Error> {
        if source.start > source.end || source.end > self.len {
            return Err(Error::RangeOutOfBounds {
                start: source.start,
                count: source.end.saturating_sub(source.start),
                len: self.len,
            });
        }
        if position > self.len {
            return Err(Error::PositionOutOfBounds {
                position,
                len: self.len,
            });
        }
        let staged: GrowableArray<T> = self.as_slice()[source].iter().cloned().collect();
        self.splice_staged(staged, position);
        Ok(())
    }
}

impl<T: Ord> GrowableArray<T> {
    /// [`linear_search_by`](Self::linear_search_by) using `Ord`.
    pub fn linear_search(&self, key: &T) -> Position {
        self.linear_search_by(|probe| probe.cmp(key))
    }

    /// [`binary_search_by`](Self::binary_search_by) using `Ord`.
    pub fn binary_search(&self, key: &T) -> Position {
        self.binary_search_by(|probe| probe.cmp(key))
    }

    /// [`insert_sorted_by`](Self::insert_sorted_by) using `Ord`.
    pub fn insert_sorted(&mut self, value: T, allow_duplicate: bool) -> Position {
        self.insert_sorted_by(value, allow_duplicate, T::cmp)
    }

    pub fn is_sorted(&self) -> bool {
        self.is_sorted_by(T::cmp)
    }
}

impl<T> Drop for GrowableArray<T> {
    fn drop(&mut self) {
        // RawBuffer releases the allocation afterwards.
        self.clear();
    }
}

impl<T> Default for GrowableArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for GrowableArray<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for GrowableArray<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone> Clone for GrowableArray<T> {
    fn clone(&self) -> Self {
        let mut out = Self::with_capacity(self.len);
        for item in self.as_slice() {
            out.push_back(item.clone());
        }
        out
    }
}

impl<T: fmt::Debug> fmt::Debug for GrowableArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq> PartialEq for GrowableArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for GrowableArray<T> {}

impl<T> FromIterator<T> for GrowableArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut out = Self::new();
        out.extend(iter);
        out
    }
}

impl<T> Extend<T> for GrowableArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let needed = self.required(lower);
        self.reserve(needed);
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a GrowableArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a mut GrowableArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}
