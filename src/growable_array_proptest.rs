#![cfg(test)]

// Property tests for GrowableArray kept inside the crate so they can look
// at the growth policy directly.

use crate::growable_array::GrowableArray;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Push(i16),
    InsertAt(usize, i16),
    InsertRange(usize, Vec<i16>),
    RemoveAt(usize),
    RemoveRange(usize, usize),
    Resize(usize),
    Reserve(usize),
    PushFromWithin(usize),
    InsertFromWithin(usize, usize, usize),
    ShrinkToFit,
    Clear,
    Free,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i16>().prop_map(Op::Push),
        3 => (0usize..40, any::<i16>()).prop_map(|(p, v)| Op::InsertAt(p, v)),
        2 => (0usize..40, proptest::collection::vec(any::<i16>(), 0..6))
            .prop_map(|(p, vs)| Op::InsertRange(p, vs)),
        2 => (0usize..40).prop_map(Op::RemoveAt),
        2 => (0usize..40, 0usize..8).prop_map(|(s, c)| Op::RemoveRange(s, c)),
        1 => (0usize..48).prop_map(Op::Resize),
        1 => (0usize..64).prop_map(Op::Reserve),
        2 => (0usize..40).prop_map(Op::PushFromWithin),
        2 => (0usize..40, 0usize..8, 0usize..40)
            .prop_map(|(s, c, p)| Op::InsertFromWithin(s, c, p)),
        1 => Just(Op::ShrinkToFit),
        1 => Just(Op::Clear),
        1 => Just(Op::Free),
    ]
}

// Property: state-machine equivalence against Vec.
// Invariants exercised across random operation sequences:
// - Contents always equal the model after every operation.
// - Out-of-range positions/ranges are rejected and change nothing.
// - `capacity >= len`, and capacity only decreases through shrink_to_fit
//   and free.
// - Self-referential inserts (push_from_within / insert_from_within) copy
//   the right values even when they reallocate.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_matches_vec_model(ops in proptest::collection::vec(arb_op(), 1..80)) {
        let mut sut: GrowableArray<i16> = GrowableArray::new();
        let mut model: Vec<i16> = Vec::new();

        for op in ops {
            let cap_before = sut.capacity();
            let mut may_shrink = false;
            match op {
                Op::Push(v) => {
                    sut.push_back(v);
                    model.push(v);
                }
                Op::InsertAt(p, v) => {
                    let ok = sut.insert_at(v, p).is_ok();
                    prop_assert_eq!(ok, p <= model.len());
                    if ok { model.insert(p, v); }
                }
                Op::InsertRange(p, vs) => {
                    let ok = sut.insert_range_at(vs.clone(), p).is_ok();
                    prop_assert_eq!(ok, p <= model.len());
                    if ok { model.splice(p..p, vs); }
                }
                Op::RemoveAt(p) => {
                    match sut.remove_at(p) {
                        Ok(v) => {
                            prop_assert_eq!(v, model.remove(p));
                        }
                        Err(_) => {
                            prop_assert!(p >= model.len());
                        }
                    }
                }
                Op::RemoveRange(s, c) => {
                    let ok = sut.remove_range_at(s, c).is_ok();
                    prop_assert_eq!(ok, s + c <= model.len());
                    if ok { model.drain(s..s + c); }
                }
                Op::Resize(n) => {
                    sut.resize(n);
                    model.resize(n, 0);
                }
                Op::Reserve(n) => {
                    sut.reserve(n);
                    prop_assert!(sut.capacity() >= n);
                }
                Op::PushFromWithin(i) => {
                    let ok = sut.push_from_within(i).is_ok();
                    prop_assert_eq!(ok, i < model.len());
                    if ok { model.push(model[i]); }
                }
                Op::InsertFromWithin(s, c, p) => {
                    let ok = sut.insert_from_within(s..s + c, p).is_ok();
                    prop_assert_eq!(ok, s + c <= model.len() && p <= model.len());
                    if ok {
                        let copy: Vec<i16> = model[s..s + c].to_vec();
                        model.splice(p..p, copy);
                    }
                }
                Op::ShrinkToFit => {
                    sut.shrink_to_fit();
                    prop_assert_eq!(sut.capacity(), model.len());
                    may_shrink = true;
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                    prop_assert_eq!(sut.capacity(), cap_before);
                }
                Op::Free => {
                    sut.free();
                    model.clear();
                    prop_assert_eq!(sut.capacity(), 0);
                    may_shrink = true;
                }
            }

            prop_assert_eq!(sut.as_slice(), model.as_slice());
            prop_assert!(sut.capacity() >= sut.len());
            if !may_shrink {
                prop_assert!(sut.capacity() >= cap_before, "capacity must not shrink");
            }
        }
    }
}

// Property: inserting any sequence with insert_sorted yields the sorted
// sequence, and binary_search then finds every inserted value.
proptest! {
    #[test]
    fn prop_insert_sorted_sorts(values in proptest::collection::vec(-50i32..50, 0..120), allow_dup in any::<bool>()) {
        let mut sut: GrowableArray<i32> = GrowableArray::new();
        for &v in &values {
            let pos = sut.insert_sorted(v, allow_dup);
            prop_assert!(pos.index <= sut.len());
            prop_assert!(sut.is_sorted());
        }

        let mut expected = values.clone();
        expected.sort();
        if !allow_dup {
            expected.dedup();
        }
        prop_assert_eq!(sut.as_slice(), expected.as_slice());

        for &v in &values {
            let pos = sut.binary_search(&v);
            prop_assert!(pos.found);
            prop_assert_eq!(sut[pos.index], v);
        }
        let miss = sut.binary_search(&1000);
        prop_assert!(!miss.found);
        prop_assert_eq!(miss.index, sut.len());
    }
}
