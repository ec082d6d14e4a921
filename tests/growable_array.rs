// GrowableArray integration tests.
//
// Each test documents the behavior verified and the invariant it relies on:
// - Growth: capacity is monotone and always >= len.
// - Sortedness: insert_sorted keeps the array non-decreasing.
// - Destruction: shrinking destroys exactly the dropped tail.
// - Idempotence: clear/free twice leave the same empty state.
// - Aliasing: copying from the array into itself survives reallocation.
use bucket_table::{Error, ErrorKind, GrowableArray, Position};
use std::cell::RefCell;

thread_local! {
    static DROPPED: RefCell<Vec<u32>> = const { RefCell::new(Vec::new()) };
}

/// Element that logs its id on drop. `Default` builds id `u32::MAX`.
struct Logged(u32);

impl Default for Logged {
    fn default() -> Self {
        Logged(u32::MAX)
    }
}

impl Drop for Logged {
    fn drop(&mut self) {
        DROPPED.with(|d| d.borrow_mut().push(self.0));
    }
}

fn take_dropped() -> Vec<u32> {
    DROPPED.with(|d| std::mem::take(&mut *d.borrow_mut()))
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Key(u32);

// Test: sorted insert in arbitrary order.
// Verifies: final order, hit with index, miss with a usable insertion point.
#[test]
fn sorted_insert_and_binary_search() {
    let mut a = GrowableArray::new();
    for k in [200, 100, 50, 500] {
        a.insert_sorted(Key(k), false);
    }
    assert_eq!(a.as_slice(), &[Key(50), Key(100), Key(200), Key(500)]);

    assert_eq!(
        a.binary_search(&Key(100)),
        Position {
            index: 1,
            found: true
        }
    );

    let miss = a.binary_search(&Key(999));
    assert!(!miss.found);
    assert_eq!(miss.index, 4);
    a.insert_at(Key(999), miss.index).unwrap();
    assert!(a.is_sorted());
}

// Test: resize from 5 down to 2 with a logging destructor.
// Verifies: indices 2, 3, 4 are destroyed, 0 and 1 are not.
#[test]
fn resize_down_destroys_exactly_the_tail() {
    take_dropped();
    let mut a: GrowableArray<Logged> = (0..5).map(Logged).collect();
    a.resize(2);
    assert_eq!(take_dropped(), vec![2, 3, 4]);
    assert_eq!(a.len(), 2);
    assert_eq!(a[0].0, 0);
    assert_eq!(a[1].0, 1);

    a.resize(4);
    assert!(take_dropped().is_empty(), "growing constructs, never destroys");
    assert_eq!(a[3].0, u32::MAX);
}

// Test: clear and free are idempotent.
// Verifies: every element destroyed once; repeated calls are no-ops.
#[test]
fn clear_and_free_twice() {
    take_dropped();
    let mut a: GrowableArray<Logged> = (0..3).map(Logged).collect();
    let cap = a.capacity();
    a.clear();
    a.clear();
    assert_eq!(take_dropped(), vec![0, 1, 2]);
    assert!(a.is_empty());
    assert_eq!(a.capacity(), cap);

    a.push_back(Logged(9));
    a.free();
    a.free();
    assert_eq!(take_dropped(), vec![9]);
    assert_eq!(a.capacity(), 0);
    assert!(a.is_empty());
}

// Test: dropping the array destroys each remaining element once.
#[test]
fn drop_destroys_live_elements() {
    take_dropped();
    let mut a: GrowableArray<Logged> = (0..4).map(Logged).collect();
    let removed = a.remove_at(1).unwrap();
    assert_eq!(removed.0, 1);
    drop(removed);
    drop(a);
    let mut dropped = take_dropped();
    dropped.sort();
    assert_eq!(dropped, vec![0, 1, 2, 3]);
}

// Test: self-referential append when the buffer is full.
// Assumes: with_capacity(n) reserves exactly n.
// Verifies: the appended copy equals the source element.
#[test]
fn self_append_across_reallocation() {
    let mut a: GrowableArray<Vec<u8>> = GrowableArray::with_capacity(3);
    a.push_back(vec![1]);
    a.push_back(vec![2, 2]);
    a.push_back(vec![3, 3, 3]);
    assert_eq!(a.capacity(), 3);
    a.push_from_within(1).unwrap();
    assert!(a.capacity() > 3);
    assert_eq!(a[3], vec![2, 2]);

    // Duplicate the whole array into its own middle.
    a.insert_from_within(0..4, 2).unwrap();
    let lens: Vec<usize> = a.iter().map(Vec::len).collect();
    assert_eq!(lens, vec![1, 2, 1, 2, 3, 2, 3, 2]);
}

// Test: growth invariant under interleaved reserve and push_back.
#[test]
fn capacity_is_monotone() {
    let mut a = GrowableArray::new();
    let mut last = 0;
    for i in 0..500usize {
        if i % 37 == 0 {
            a.reserve(i + 10);
        }
        a.push_back(i);
        assert!(a.capacity() >= a.len());
        assert!(a.capacity() >= last);
        last = a.capacity();
    }
}

// Test: malformed arguments are reported, not applied.
#[test]
fn invalid_positions_are_rejected() {
    let mut a: GrowableArray<u8> = [1, 2, 3].into_iter().collect();
    let err = a.insert_at(0, 4).unwrap_err();
    assert_eq!(err, Error::PositionOutOfBounds { position: 4, len: 3 });
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(a.insert_range_at([7, 8], 9).is_err());
    assert_eq!(
        a.remove_range_at(2, 2),
        Err(Error::RangeOutOfBounds {
            start: 2,
            count: 2,
            len: 3
        })
    );
    assert_eq!(a.as_slice(), &[1, 2, 3]);
}

// Test: the linear search reports the first element not less than the key.
#[test]
fn linear_search_by_custom_comparator() {
    let a: GrowableArray<(u8, &str)> = [(1, "a"), (4, "b"), (4, "c"), (9, "d")]
        .into_iter()
        .collect();
    let pos = a.linear_search_by(|(k, _)| k.cmp(&4));
    assert_eq!(pos, Position { index: 1, found: true });
    let pos = a.linear_search_by(|(k, _)| k.cmp(&5));
    assert_eq!(pos, Position { index: 3, found: false });
}
