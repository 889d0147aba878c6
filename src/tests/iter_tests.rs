extern crate alloc;
extern crate std;

use crate::{caps, AnyIter, AnyView};
use alloc::format;
use alloc::vec::Vec;
use core::cmp::Ordering;
use static_assertions::{assert_impl_all, assert_not_impl_any};

type Ints<'a> = AnyView<'a, i32, caps![random_access | sized | common]>;
type IntIter<'v> = AnyIter<'v, i32, caps![random_access | sized | common]>;

assert_impl_all!(IntIter<'static>: Clone, PartialEq, PartialOrd);
assert_not_impl_any!(AnyIter<'static, i32, caps![input]>: Clone, PartialEq);
assert_not_impl_any!(AnyIter<'static, i32, caps![bidirectional]>: PartialOrd);

fn ints(values: &[i32]) -> Ints<'static> {
    AnyView::new(values.to_vec())
}

// =============================================================================
// Basic Traversal
// =============================================================================

#[test]
fn test_walk_to_end() {
    let view = ints(&[4, 5, 6]);
    let mut it = view.begin();
    let mut seen = Vec::new();
    while !it.is_end() {
        seen.push(it.get());
        it.advance();
    }
    assert_eq!(seen, [4, 5, 6]);
    assert!(it == view.end());
}

#[test]
fn test_clones_are_independent() {
    let view = ints(&[1, 2, 3]);
    let mut first = view.begin();
    let second = first.clone();
    first.advance();
    assert_eq!(first.get(), 2);
    assert_eq!(second.get(), 1);
    assert!(first != second);
}

#[test]
fn test_retreat_undoes_advance() {
    let view = ints(&[1, 2, 3]);
    let mut it = view.begin();
    it.advance();
    it.advance();
    it.retreat();
    assert_eq!(it.get(), 2);
}

// =============================================================================
// Random Access
// =============================================================================

#[test]
fn test_arithmetic() {
    let view = ints(&[10, 20, 30, 40, 50]);
    let begin = view.begin();

    let third = &begin + 2;
    assert_eq!(third.get(), 30);
    assert_eq!((third.clone() - 1).get(), 20);
    assert_eq!((begin.clone() + 4).get(), 50);

    let mut it = begin.clone();
    it += 3;
    it -= 1;
    assert_eq!(it.get(), 30);
    assert!(it == third);
}

#[test]
fn test_at_leaves_iterator() {
    let view = ints(&[10, 20, 30]);
    let mut it = view.begin();
    it.advance();
    assert_eq!(it.at(1), 30);
    assert_eq!(it.at(-1), 10);
    assert_eq!(it.get(), 20);
}

#[test]
fn test_distance() {
    let view = ints(&[1, 2, 3, 4]);
    let begin = view.begin();
    let end = view.end();
    assert_eq!(&end - &begin, 4);
    assert_eq!(&begin - &end, -4);
    assert_eq!(end.offset_from(&begin), 4);
    assert_eq!(&begin - &begin, 0);
}

#[test]
fn test_ordering_follows_position() {
    let view = ints(&[1, 2, 3]);
    let begin = view.begin();
    let later = &begin + 2;

    assert!(begin < later);
    assert!(later > begin);
    assert!(begin <= begin.clone());
    assert_eq!(begin.partial_cmp(&later), Some(Ordering::Less));
    assert_eq!(later.partial_cmp(&begin), Some(Ordering::Greater));
    assert_eq!(later.partial_cmp(&(&begin + 2)), Some(Ordering::Equal));
}

#[test]
#[should_panic(expected = "before the start")]
fn test_jump_before_start_panics() {
    let view = ints(&[1, 2, 3]);
    let mut it = view.begin();
    it -= 1;
}

// =============================================================================
// Different Views
// =============================================================================

#[test]
fn test_iterators_of_different_views() {
    let left = ints(&[1, 2, 3]);
    let right = ints(&[1, 2, 3]);

    assert!(left.begin() != right.begin());
    assert_eq!(left.begin().partial_cmp(&right.begin()), None);
    assert!(right.end() != left.end());
}

#[test]
#[should_panic(expected = "different views")]
fn test_distance_across_views_panics() {
    let left = ints(&[1, 2, 3]);
    let right = ints(&[1, 2, 3]);
    let _ = &left.end() - &right.begin();
}

#[test]
fn test_sentinel_of_other_view() {
    let left: AnyView<'_, i32, caps![forward]> = AnyView::new(alloc::vec![1]);
    let right: AnyView<'_, i32, caps![forward]> = AnyView::new(alloc::vec![]);
    assert!(right.begin().is_end());
    assert!(right.begin() == right.end());
    assert!(right.begin() != left.end());
}

// =============================================================================
// Rust Iterators
// =============================================================================

#[test]
fn test_iter_collects() {
    let view = ints(&[3, 1, 2]);
    assert_eq!(view.iter().collect::<Vec<_>>(), [3, 1, 2]);

    let mut total = 0;
    for value in &view {
        total += value;
    }
    assert_eq!(total, 6);
}

#[test]
fn test_iter_is_fused() {
    let view = ints(&[1]);
    let mut iter = view.iter();
    assert_eq!(iter.next(), Some(1));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next(), None);
}

#[test]
fn test_iter_clone_resumes() {
    let view = ints(&[1, 2, 3]);
    let mut iter = view.iter();
    iter.next();
    let rest = iter.clone();
    assert_eq!(iter.count(), 2);
    assert_eq!(rest.collect::<Vec<_>>(), [2, 3]);
}

#[test]
fn test_iterator_into_iter_from_middle() {
    let view = ints(&[1, 2, 3, 4]);
    let from_third = &view.begin() + 2;
    assert_eq!(from_third.into_iter().collect::<Vec<_>>(), [3, 4]);
}

#[test]
fn test_debug_mentions_category() {
    let view = ints(&[1]);
    let debug = format!("{:?}", view.begin());
    assert!(debug.contains("random_access | sized | common"), "{debug}");
    let sentinel: AnyView<'_, i32, caps![forward]> = AnyView::new(alloc::vec![1]);
    assert!(format!("{:?}", sentinel.end()).starts_with("AnySentinel"));
}
