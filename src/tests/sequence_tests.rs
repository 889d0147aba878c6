extern crate alloc;
extern crate std;

use crate::sequence::{
    BidirectionalSequence, CommonSequence, ContiguousSequence, Empty, Iterated,
    RandomAccessSequence, Sequence, SizedSequence,
};
use alloc::vec;
use alloc::vec::Vec;

/// Reads every item from `begin` to the end.
fn drain<R: Sequence>(range: &R) -> Vec<R::Item> {
    let mut items = Vec::new();
    let mut cursor = range.begin();
    while !range.is_end(&cursor) {
        items.push(range.read(&cursor));
        range.advance(&mut cursor);
    }
    items
}

// =============================================================================
// Slices
// =============================================================================

#[test]
fn test_slice_reads_references() {
    let data = [10, 20, 30];
    let slice: &[i32] = &data;
    let items = drain(&slice);
    assert_eq!(items, [&10, &20, &30]);
    assert!(core::ptr::eq(items[1], &data[1]));
}

#[test]
fn test_slice_capabilities() {
    let data = [1u8, 2, 3, 4];
    let slice: &[u8] = &data;

    assert_eq!(slice.size(), 4);
    assert_eq!(CommonSequence::end(&slice), 4);
    assert_eq!(ContiguousSequence::as_slice(&slice), &data);

    let mut cursor = Sequence::begin(&slice);
    slice.jump(&mut cursor, 3);
    assert_eq!(*slice.read(&cursor), 4);
    slice.retreat(&mut cursor);
    assert_eq!(*slice.read(&cursor), 3);
    assert_eq!(slice.distance(&0, &cursor), 2);
    assert_eq!(slice.distance(&cursor, &0), -2);
}

#[test]
#[should_panic(expected = "before the start")]
fn test_slice_jump_before_start_panics() {
    let data = [1u8, 2];
    let slice: &[u8] = &data;
    let mut cursor = Sequence::begin(&slice);
    slice.jump(&mut cursor, -1);
}

#[test]
#[should_panic]
fn test_slice_read_at_end_panics() {
    let data = [1u8, 2];
    let slice: &[u8] = &data;
    let end = CommonSequence::end(&slice);
    let _ = slice.read(&end);
}

// =============================================================================
// Arrays And Vectors
// =============================================================================

#[test]
fn test_array_yields_clones() {
    let array = [1, 2, 3, 4, 5];
    assert_eq!(drain(&array), [1, 2, 3, 4, 5]);
    assert_eq!(array.size(), 5);
    assert_eq!(CommonSequence::end(&array), 5);
}

#[test]
fn test_vec_random_access() {
    let values = vec!['a', 'b', 'c', 'd'];
    let mut cursor = values.begin();
    values.jump(&mut cursor, 2);
    assert_eq!(values.read(&cursor), 'c');
    values.jump(&mut cursor, -2);
    assert_eq!(values.read(&cursor), 'a');
    assert_eq!(values.distance(&cursor, &CommonSequence::end(&values)), 4);
}

// =============================================================================
// Integer Ranges
// =============================================================================

#[test]
fn test_range_yields_values() {
    assert_eq!(drain(&(3u32..7)), [3, 4, 5, 6]);
    assert_eq!(drain(&(-2i64..2)), [-2, -1, 0, 1]);
}

#[test]
fn test_range_size() {
    assert_eq!((0u8..255).size(), 255);
    assert_eq!((5i32..5).size(), 0);
    #[allow(clippy::reversed_empty_ranges)]
    let backwards = 9u16..3;
    assert_eq!(backwards.size(), 0);
    assert!(drain(&backwards).is_empty());
}

#[test]
fn test_range_end_is_clamped() {
    #[allow(clippy::reversed_empty_ranges)]
    let backwards = 9u16..3;
    let begin = backwards.begin();
    let end = CommonSequence::end(&backwards);
    assert_eq!(begin, end);
}

#[test]
fn test_range_jump_and_distance() {
    let range = -10i32..10;
    let mut cursor = range.begin();
    range.jump(&mut cursor, 15);
    assert_eq!(range.read(&cursor), 5);
    range.jump(&mut cursor, -20);
    assert_eq!(range.read(&cursor), -15);
    assert_eq!(range.distance(&range.begin(), &cursor), -5);
    assert_eq!(range.distance(&cursor, &CommonSequence::end(&range)), 25);
}

#[test]
fn test_range_wider_than_signed_max() {
    let range = -100i8..100;
    assert_eq!(range.size(), 200);

    let mut cursor = range.begin();
    range.jump(&mut cursor, 150);
    assert_eq!(range.read(&cursor), 50);
    assert_eq!(range.distance(&range.begin(), &cursor), 150);
    range.jump(&mut cursor, -150);
    assert_eq!(cursor, range.begin());

    assert_eq!((i8::MIN..i8::MAX).size(), 255);
    assert_eq!(drain(&(i8::MIN..i8::MAX)).len(), 255);
}

// =============================================================================
// Iterated
// =============================================================================

#[test]
fn test_iterated_passes_are_independent() {
    let words = Iterated::new(["x", "y", "z"].into_iter());
    let mut first = words.begin();
    words.advance(&mut first);
    words.advance(&mut first);

    let second = words.begin();
    assert_eq!(words.read(&first), "z");
    assert_eq!(words.read(&second), "x");
    assert_eq!(drain(&words), ["x", "y", "z"]);
}

#[test]
fn test_iterated_empty() {
    let none = Iterated::new(core::iter::empty::<u8>());
    assert!(none.is_end(&none.begin()));
}

#[test]
#[should_panic(expected = "past the end")]
fn test_iterated_read_at_end_panics() {
    let one = Iterated::new(core::iter::once(1u8));
    let mut cursor = one.begin();
    one.advance(&mut cursor);
    let _ = one.read(&cursor);
}

// =============================================================================
// Empty
// =============================================================================

#[test]
fn test_empty_has_no_items() {
    let empty = Empty::<alloc::string::String>::NEW;
    assert!(empty.is_end(&empty.begin()));
    assert_eq!(empty.size(), 0);
    assert_eq!(empty.distance(&(), &()), 0);
}

#[test]
fn test_empty_contiguous_slice() {
    let empty = Empty::<&u64>::default();
    assert!(ContiguousSequence::as_slice(&empty).is_empty());
}
