//! The protocol a concrete sequence implements to be erased.
//!
//! A sequence hands out cursors and interprets them: every operation takes the
//! sequence by shared reference plus the cursor it applies to. Cursors do not
//! borrow the sequence, so an erased iterator can own one in its own storage.
//!
//! The capability traits mirror [`Traversal`](crate::Traversal) and the
//! modifiers of [`Category`](crate::Category):
//!
//! | Trait                     | Adds                                  |
//! |---------------------------|---------------------------------------|
//! | [`Sequence`]              | begin, end test, read, advance        |
//! | [`ForwardSequence`]       | cloneable, comparable cursors         |
//! | [`BidirectionalSequence`] | retreat                               |
//! | [`RandomAccessSequence`]  | jump by offset, distance              |
//! | [`ContiguousSequence`]    | the elements as a slice               |
//! | [`SizedSequence`]         | element count                         |
//! | [`CommonSequence`]        | an end cursor of the begin cursor type |
//!
//! Reading at the end, retreating before the start or jumping out of bounds
//! are caller errors. The implementations in this module panic on them.

use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;
use core::ops::{Deref, Range};

use num_traits::{AsPrimitive, PrimInt};

/// A sequence traversed through cursors.
#[diagnostic::on_unimplemented(message = "`{Self}` is not a sequence that can be erased")]
pub trait Sequence {
    /// What reading a cursor yields.
    type Item;
    /// A position in the sequence.
    type Cursor;

    /// A cursor at the first element.
    fn begin(&self) -> Self::Cursor;

    /// Returns `true` if `cursor` is past the last element.
    fn is_end(&self, cursor: &Self::Cursor) -> bool;

    /// The element at `cursor`. The cursor must not be at the end.
    fn read(&self, cursor: &Self::Cursor) -> Self::Item;

    /// Moves `cursor` to the next element.
    fn advance(&self, cursor: &mut Self::Cursor);
}

/// A multi-pass sequence: cursors can be duplicated and compared.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not provide forward traversal",
    label = "cursors of this sequence cannot be cloned and compared"
)]
pub trait ForwardSequence: Sequence<Cursor: Clone + PartialEq> {}

#[diagnostic::on_unimplemented(message = "`{Self}` does not provide bidirectional traversal")]
pub trait BidirectionalSequence: ForwardSequence {
    /// Moves `cursor` to the previous element.
    fn retreat(&self, cursor: &mut Self::Cursor);
}

#[diagnostic::on_unimplemented(message = "`{Self}` does not provide random access traversal")]
pub trait RandomAccessSequence: BidirectionalSequence {
    /// Moves `cursor` by `n` elements, backwards when negative.
    fn jump(&self, cursor: &mut Self::Cursor, n: isize);

    /// The number of advances from `from` to `to`, negative if `to` comes first.
    fn distance(&self, from: &Self::Cursor, to: &Self::Cursor) -> isize;
}

#[diagnostic::on_unimplemented(message = "`{Self}` does not store its elements contiguously")]
pub trait ContiguousSequence: RandomAccessSequence {
    type Element;

    /// Every element, in order. Cursor `c` refers to index
    /// `distance(&begin(), &c)`.
    fn as_slice(&self) -> &[Self::Element];
}

#[diagnostic::on_unimplemented(message = "`{Self}` does not know its size")]
pub trait SizedSequence: Sequence {
    /// The number of elements, computed without advancing any cursor.
    fn size(&self) -> usize;
}

#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a common sequence",
    label = "the end of this sequence is not a cursor"
)]
pub trait CommonSequence: ForwardSequence {
    /// A cursor past the last element, equal to any cursor that reached it.
    fn end(&self) -> Self::Cursor;
}

// =============================================================================
// Slices
// =============================================================================

impl<'a, T> Sequence for &'a [T] {
    type Item = &'a T;
    type Cursor = usize;

    #[inline]
    fn begin(&self) -> usize {
        0
    }

    #[inline]
    fn is_end(&self, cursor: &usize) -> bool {
        *cursor >= <[T]>::len(self)
    }

    #[inline]
    fn read(&self, cursor: &usize) -> &'a T {
        let slice: &'a [T] = *self;
        &slice[*cursor]
    }

    #[inline]
    fn advance(&self, cursor: &mut usize) {
        *cursor += 1;
    }
}

impl<T> ForwardSequence for &[T] {}

impl<T> BidirectionalSequence for &[T] {
    #[inline]
    fn retreat(&self, cursor: &mut usize) {
        *cursor -= 1;
    }
}

impl<T> RandomAccessSequence for &[T] {
    #[inline]
    fn jump(&self, cursor: &mut usize, n: isize) {
        *cursor = offset(*cursor, n);
    }

    #[inline]
    fn distance(&self, from: &usize, to: &usize) -> isize {
        to.wrapping_sub(*from) as isize
    }
}

impl<T> ContiguousSequence for &[T] {
    type Element = T;

    #[inline]
    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T> SizedSequence for &[T] {
    #[inline]
    fn size(&self) -> usize {
        <[T]>::len(self)
    }
}

impl<T> CommonSequence for &[T] {
    #[inline]
    fn end(&self) -> usize {
        <[T]>::len(self)
    }
}

#[inline]
fn offset(cursor: usize, n: isize) -> usize {
    match cursor.checked_add_signed(n) {
        Some(moved) => moved,
        None => panic!("cursor moved before the start of the sequence"),
    }
}

// =============================================================================
// Owned arrays and vectors
// =============================================================================

// Owning sequences yield clones of their elements. Borrow them as a slice to
// read by reference instead.
macro_rules! owned_sequence {
    ([$($param:tt)*] $ty:ty) => {
        impl<$($param)*> Sequence for $ty {
            type Item = T;
            type Cursor = usize;

            #[inline]
            fn begin(&self) -> usize {
                0
            }

            #[inline]
            fn is_end(&self, cursor: &usize) -> bool {
                *cursor >= self.len()
            }

            #[inline]
            fn read(&self, cursor: &usize) -> T {
                self[*cursor].clone()
            }

            #[inline]
            fn advance(&self, cursor: &mut usize) {
                *cursor += 1;
            }
        }

        impl<$($param)*> ForwardSequence for $ty {}

        impl<$($param)*> BidirectionalSequence for $ty {
            #[inline]
            fn retreat(&self, cursor: &mut usize) {
                *cursor -= 1;
            }
        }

        impl<$($param)*> RandomAccessSequence for $ty {
            #[inline]
            fn jump(&self, cursor: &mut usize, n: isize) {
                *cursor = offset(*cursor, n);
            }

            #[inline]
            fn distance(&self, from: &usize, to: &usize) -> isize {
                to.wrapping_sub(*from) as isize
            }
        }

        impl<$($param)*> SizedSequence for $ty {
            #[inline]
            fn size(&self) -> usize {
                self.len()
            }
        }

        impl<$($param)*> CommonSequence for $ty {
            #[inline]
            fn end(&self) -> usize {
                self.len()
            }
        }
    };
}

owned_sequence!([T: Clone, const N: usize] [T; N]);
owned_sequence!([T: Clone] Vec<T>);

// =============================================================================
// Integer ranges
// =============================================================================

/// Half-open integer ranges yield their values. A range whose start exceeds
/// its end is empty.
impl<T> Sequence for Range<T>
where
    T: PrimInt + AsPrimitive<usize>,
    usize: AsPrimitive<T>,
{
    type Item = T;
    type Cursor = T;

    #[inline]
    fn begin(&self) -> T {
        self.start
    }

    #[inline]
    fn is_end(&self, cursor: &T) -> bool {
        *cursor >= self.end
    }

    #[inline]
    fn read(&self, cursor: &T) -> T {
        debug_assert!(*cursor < self.end, "read past the end of the range");
        *cursor
    }

    #[inline]
    fn advance(&self, cursor: &mut T) {
        *cursor = *cursor + T::one();
    }
}

impl<T> ForwardSequence for Range<T>
where
    T: PrimInt + AsPrimitive<usize>,
    usize: AsPrimitive<T>,
{
}

impl<T> BidirectionalSequence for Range<T>
where
    T: PrimInt + AsPrimitive<usize>,
    usize: AsPrimitive<T>,
{
    #[inline]
    fn retreat(&self, cursor: &mut T) {
        *cursor = *cursor - T::one();
    }
}

impl<T> RandomAccessSequence for Range<T>
where
    T: PrimInt + AsPrimitive<usize>,
    usize: AsPrimitive<T>,
{
    #[inline]
    fn jump(&self, cursor: &mut T, n: isize) {
        // Wrapping in `usize` keeps ranges wider than `T::MAX` exact.
        *cursor = AsPrimitive::<usize>::as_(*cursor)
            .wrapping_add_signed(n)
            .as_();
    }

    #[inline]
    fn distance(&self, from: &T, to: &T) -> isize {
        // Two's complement difference, exact for any pair inside the range.
        AsPrimitive::<usize>::as_(*to).wrapping_sub(from.as_()) as isize
    }
}

impl<T> SizedSequence for Range<T>
where
    T: PrimInt + AsPrimitive<usize>,
    usize: AsPrimitive<T>,
{
    #[inline]
    fn size(&self) -> usize {
        if self.end > self.start {
            AsPrimitive::<usize>::as_(self.end).wrapping_sub(self.start.as_())
        } else {
            0
        }
    }
}

impl<T> CommonSequence for Range<T>
where
    T: PrimInt + AsPrimitive<usize>,
    usize: AsPrimitive<T>,
{
    #[inline]
    fn end(&self) -> T {
        self.end.max(self.start)
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// An input sequence over a cloneable iterator.
///
/// Every [`begin`](Sequence::begin) clones the iterator, so independent passes
/// observe the same elements. Items are cloned on read.
///
/// ```
/// use any_view::{caps, sequence::Iterated, AnyView};
///
/// let words = "one two three".split(' ');
/// let view: AnyView<'_, &str, caps![input | move_only]> = AnyView::new(Iterated::new(words));
/// assert_eq!(view.iter().collect::<Vec<_>>(), ["one", "two", "three"]);
/// ```
#[derive(Clone, Debug)]
pub struct Iterated<It> {
    iter: It,
}

impl<It: Iterator + Clone> Iterated<It> {
    pub fn new(iter: It) -> Self {
        Self { iter }
    }
}

/// Cursor of [`Iterated`]: the remaining iterator and the element under it.
pub struct IteratedCursor<It: Iterator> {
    rest: It,
    current: Option<It::Item>,
}

impl<It> fmt::Debug for IteratedCursor<It>
where
    It: Iterator,
    It::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IteratedCursor")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl<It> Sequence for Iterated<It>
where
    It: Iterator + Clone,
    It::Item: Clone,
{
    type Item = It::Item;
    type Cursor = IteratedCursor<It>;

    fn begin(&self) -> Self::Cursor {
        let mut rest = self.iter.clone();
        let current = rest.next();
        IteratedCursor { rest, current }
    }

    #[inline]
    fn is_end(&self, cursor: &Self::Cursor) -> bool {
        cursor.current.is_none()
    }

    fn read(&self, cursor: &Self::Cursor) -> It::Item {
        match &cursor.current {
            Some(item) => item.clone(),
            None => panic!("read past the end of an iterated sequence"),
        }
    }

    #[inline]
    fn advance(&self, cursor: &mut Self::Cursor) {
        cursor.current = cursor.rest.next();
    }
}

// =============================================================================
// Empty
// =============================================================================

/// A sequence with no elements that provides every capability.
///
/// Backs [`AnyView::default`](crate::AnyView).
pub struct Empty<I>(PhantomData<fn() -> I>);

impl<I> Empty<I> {
    pub const NEW: Self = Empty(PhantomData);
}

impl<I> Default for Empty<I> {
    fn default() -> Self {
        Self::NEW
    }
}

impl<I> Clone for Empty<I> {
    fn clone(&self) -> Self {
        Self::NEW
    }
}

impl<I> fmt::Debug for Empty<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Empty")
    }
}

impl<I> Sequence for Empty<I> {
    type Item = I;
    type Cursor = ();

    #[inline]
    fn begin(&self) {}

    #[inline]
    fn is_end(&self, _: &()) -> bool {
        true
    }

    fn read(&self, _: &()) -> I {
        panic!("read from an empty sequence")
    }

    #[inline]
    fn advance(&self, _: &mut ()) {}
}

impl<I> ForwardSequence for Empty<I> {}

impl<I> BidirectionalSequence for Empty<I> {
    #[inline]
    fn retreat(&self, _: &mut ()) {}
}

impl<I> RandomAccessSequence for Empty<I> {
    #[inline]
    fn jump(&self, _: &mut (), _: isize) {}

    #[inline]
    fn distance(&self, _: &(), _: &()) -> isize {
        0
    }
}

impl<I> ContiguousSequence for Empty<I>
where
    I: Deref,
    I::Target: Sized,
{
    type Element = I::Target;

    #[inline]
    fn as_slice(&self) -> &[I::Target] {
        &[]
    }
}

impl<I> SizedSequence for Empty<I> {
    #[inline]
    fn size(&self) -> usize {
        0
    }
}

impl<I> CommonSequence for Empty<I> {
    #[inline]
    fn end(&self) {}
}
