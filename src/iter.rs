//! Erased cursors and iterators.
//!
//! An [`AnyIter`] pairs the address of the source it walks with an owned
//! [`AnyCursor`]. Its methods and operator impls follow the traversal level of
//! the view's descriptor: a forward iterator can be cloned and compared, a
//! random access one supports `+`, `-`, ordering and distances.

use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Deref, Sub, SubAssign};
use core::ptr::{self, NonNull};

use crate::category::{
    BidirectionalLevel, ContiguousLevel, Descriptor, ForwardLevel, RandomAccessLevel,
};
use crate::storage::CursorStorage;
use crate::table::{guaranteed, Table};

// =============================================================================
// AnyCursor
// =============================================================================

/// A position in an erased source, without the source itself.
///
/// This is the cursor type of [`AnyView`](crate::AnyView) when the view is
/// used as a [`Sequence`](crate::sequence::Sequence).
pub struct AnyCursor<'a, I, D> {
    pub(crate) state: CursorStorage,
    pub(crate) table: &'a Table<I>,
    _marker: PhantomData<D>,
}

impl<'a, I, D> AnyCursor<'a, I, D> {
    /// # Safety
    ///
    /// `state` must have been produced by `table`.
    #[inline]
    pub(crate) unsafe fn new(state: CursorStorage, table: &'a Table<I>) -> Self {
        Self {
            state,
            table,
            _marker: PhantomData,
        }
    }

    /// Returns `true` if the cursor was produced by `table`.
    #[inline]
    pub(crate) fn belongs_to(&self, table: &Table<I>) -> bool {
        ptr::eq(self.table, table)
    }
}

impl<I, D> Drop for AnyCursor<'_, I, D> {
    fn drop(&mut self) {
        // SAFETY: the state was produced by this table and is dropped once.
        unsafe { (self.table.drop_cursor)(&mut self.state) }
    }
}

impl<I, D> Clone for AnyCursor<'_, I, D>
where
    D: Descriptor,
    D::Traversal: ForwardLevel,
{
    fn clone(&self) -> Self {
        let ops = guaranteed(self.table.forward);
        // SAFETY: the state belongs to the table it is cloned with.
        unsafe { Self::new((ops.clone_cursor)(&self.state), self.table) }
    }
}

/// Cursors of different source types are never equal.
impl<I, D> PartialEq for AnyCursor<'_, I, D>
where
    D: Descriptor,
    D::Traversal: ForwardLevel,
{
    fn eq(&self, other: &Self) -> bool {
        if !other.belongs_to(self.table) {
            return false;
        }
        let ops = guaranteed(self.table.forward);
        // SAFETY: both states hold the cursor type of the shared table.
        unsafe { (ops.eq)(&self.state, &other.state) }
    }
}

impl<I, D> fmt::Debug for AnyCursor<'_, I, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyCursor")
            .field("category", &self.table.category)
            .field("state", &self.state)
            .finish()
    }
}

// =============================================================================
// AnyIter
// =============================================================================

/// An iterator over an erased source.
///
/// Borrows the view it came from for `'v` (or the borrowed source itself, for
/// detached iterators) and owns its cursor, so iterators from the same view
/// move independently.
pub struct AnyIter<'v, I, D> {
    range: NonNull<()>,
    cursor: AnyCursor<'v, I, D>,
}

impl<'v, I, D> AnyIter<'v, I, D> {
    /// # Safety
    ///
    /// `range` must address the source `cursor` belongs to and stay valid
    /// for `'v`.
    #[inline]
    pub(crate) unsafe fn from_parts(range: NonNull<()>, cursor: AnyCursor<'v, I, D>) -> Self {
        Self { range, cursor }
    }

    /// # Safety
    ///
    /// `range` must address the source of `table` and stay valid for `'v`.
    #[inline]
    pub(crate) unsafe fn begin(range: NonNull<()>, table: &'v Table<I>) -> Self {
        Self::from_parts(range, AnyCursor::new((table.begin)(range), table))
    }

    #[inline]
    fn same_source(&self, other: &Self) -> bool {
        self.range == other.range && other.cursor.belongs_to(self.cursor.table)
    }

    /// The item under the iterator. Must not be called at the end.
    #[inline]
    pub fn get(&self) -> I {
        // SAFETY: `range` and the cursor belong to the same table.
        unsafe { (self.cursor.table.read)(self.range, &self.cursor.state) }
    }

    /// Moves to the next item.
    #[inline]
    pub fn advance(&mut self) {
        // SAFETY: as in `get`.
        unsafe { (self.cursor.table.advance)(self.range, &mut self.cursor.state) }
    }

    /// Returns `true` once the iterator is past the last item.
    #[inline]
    pub fn is_end(&self) -> bool {
        // SAFETY: as in `get`.
        unsafe { (self.cursor.table.is_end)(self.range, &self.cursor.state) }
    }
}

impl<I, D> Clone for AnyIter<'_, I, D>
where
    D: Descriptor,
    D::Traversal: ForwardLevel,
{
    fn clone(&self) -> Self {
        Self {
            range: self.range,
            cursor: self.cursor.clone(),
        }
    }
}

/// Iterators over different views are never equal.
impl<I, D> PartialEq for AnyIter<'_, I, D>
where
    D: Descriptor,
    D::Traversal: ForwardLevel,
{
    fn eq(&self, other: &Self) -> bool {
        self.range == other.range && self.cursor == other.cursor
    }
}

impl<I, D> AnyIter<'_, I, D>
where
    D: Descriptor,
    D::Traversal: BidirectionalLevel,
{
    /// Moves to the previous item. Must not be called at the first one.
    #[inline]
    pub fn retreat(&mut self) {
        let retreat = guaranteed(self.cursor.table.retreat);
        // SAFETY: as in `get`.
        unsafe { retreat(self.range, &mut self.cursor.state) }
    }
}

impl<I, D> AnyIter<'_, I, D>
where
    D: Descriptor,
    D::Traversal: RandomAccessLevel,
{
    /// Moves by `n` items, backwards when `n` is negative.
    #[inline]
    pub fn jump(&mut self, n: isize) {
        let ops = guaranteed(self.cursor.table.random_access);
        // SAFETY: as in `get`.
        unsafe { (ops.jump)(self.range, &mut self.cursor.state, n) }
    }

    /// The item `n` positions away, leaving `self` where it is.
    pub fn at(&self, n: isize) -> I {
        let mut moved = self.clone();
        moved.jump(n);
        moved.get()
    }

    /// The number of advances from `origin` to `self`, negative if `self`
    /// comes first.
    ///
    /// # Panics
    ///
    /// Panics if the iterators come from different views.
    pub fn offset_from(&self, origin: &Self) -> isize {
        assert!(
            self.same_source(origin),
            "distance between iterators of different views"
        );
        let ops = guaranteed(self.cursor.table.random_access);
        // SAFETY: both cursors belong to the same source and table.
        unsafe { (ops.distance)(self.range, &origin.cursor.state, &self.cursor.state) }
    }
}

/// Ordered by position. Iterators over different views are unordered.
impl<I, D> PartialOrd for AnyIter<'_, I, D>
where
    D: Descriptor,
    D::Traversal: RandomAccessLevel,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !self.same_source(other) {
            return None;
        }
        Some(0isize.cmp(&other.offset_from(self)))
    }
}

impl<I, D> AddAssign<isize> for AnyIter<'_, I, D>
where
    D: Descriptor,
    D::Traversal: RandomAccessLevel,
{
    #[inline]
    fn add_assign(&mut self, n: isize) {
        self.jump(n);
    }
}

impl<I, D> SubAssign<isize> for AnyIter<'_, I, D>
where
    D: Descriptor,
    D::Traversal: RandomAccessLevel,
{
    #[inline]
    fn sub_assign(&mut self, n: isize) {
        self.jump(-n);
    }
}

impl<I, D> Add<isize> for AnyIter<'_, I, D>
where
    D: Descriptor,
    D::Traversal: RandomAccessLevel,
{
    type Output = Self;

    #[inline]
    fn add(mut self, n: isize) -> Self {
        self.jump(n);
        self
    }
}

impl<'v, I, D> Add<isize> for &AnyIter<'v, I, D>
where
    D: Descriptor,
    D::Traversal: RandomAccessLevel,
{
    type Output = AnyIter<'v, I, D>;

    #[inline]
    fn add(self, n: isize) -> AnyIter<'v, I, D> {
        self.clone() + n
    }
}

impl<I, D> Sub<isize> for AnyIter<'_, I, D>
where
    D: Descriptor,
    D::Traversal: RandomAccessLevel,
{
    type Output = Self;

    #[inline]
    fn sub(mut self, n: isize) -> Self {
        self.jump(-n);
        self
    }
}

impl<'v, I, D> Sub<isize> for &AnyIter<'v, I, D>
where
    D: Descriptor,
    D::Traversal: RandomAccessLevel,
{
    type Output = AnyIter<'v, I, D>;

    #[inline]
    fn sub(self, n: isize) -> AnyIter<'v, I, D> {
        self.clone() - n
    }
}

/// `&a - &b` is [`a.offset_from(&b)`](AnyIter::offset_from).
impl<I, D> Sub for &AnyIter<'_, I, D>
where
    D: Descriptor,
    D::Traversal: RandomAccessLevel,
{
    type Output = isize;

    #[inline]
    fn sub(self, origin: Self) -> isize {
        self.offset_from(origin)
    }
}

impl<I, D> AnyIter<'_, I, D>
where
    D: Descriptor,
    D::Traversal: ContiguousLevel,
    I: Deref,
    I::Target: Sized,
{
    /// Address of the element under the iterator.
    ///
    /// At the end this is one past the last element and must not be read.
    #[inline]
    pub fn as_ptr(&self) -> *const I::Target {
        let ops = guaranteed(self.cursor.table.contiguous);
        // SAFETY: as in `get`.
        unsafe { (ops.address)(self.range, &self.cursor.state).cast() }
    }
}

impl<I, D> fmt::Debug for AnyIter<'_, I, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyIter")
            .field("range", &self.range)
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl<'v, I, D> IntoIterator for AnyIter<'v, I, D> {
    type Item = I;
    type IntoIter = Iter<'v, I, D>;

    #[inline]
    fn into_iter(self) -> Iter<'v, I, D> {
        Iter { current: self }
    }
}

// =============================================================================
// AnySentinel
// =============================================================================

/// The end of a view whose end is not an iterator.
///
/// Compares equal to every iterator of the same view that is at the end.
pub struct AnySentinel<'v, I, D> {
    range: NonNull<()>,
    table: &'v Table<I>,
    _marker: PhantomData<D>,
}

impl<'v, I, D> AnySentinel<'v, I, D> {
    #[inline]
    pub(crate) fn new(range: NonNull<()>, table: &'v Table<I>) -> Self {
        Self {
            range,
            table,
            _marker: PhantomData,
        }
    }
}

impl<I, D> Clone for AnySentinel<'_, I, D> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<I, D> Copy for AnySentinel<'_, I, D> {}

impl<I, D> PartialEq<AnySentinel<'_, I, D>> for AnyIter<'_, I, D> {
    #[inline]
    fn eq(&self, end: &AnySentinel<'_, I, D>) -> bool {
        self.range == end.range && self.cursor.belongs_to(end.table) && self.is_end()
    }
}

impl<I, D> PartialEq<AnyIter<'_, I, D>> for AnySentinel<'_, I, D> {
    #[inline]
    fn eq(&self, iter: &AnyIter<'_, I, D>) -> bool {
        iter == self
    }
}

impl<I, D> fmt::Debug for AnySentinel<'_, I, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnySentinel")
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Iter
// =============================================================================

/// A Rust [`Iterator`] over the items of a view.
///
/// Created by [`AnyView::iter`](crate::AnyView::iter) or by converting an
/// [`AnyIter`] with [`IntoIterator`].
pub struct Iter<'v, I, D> {
    current: AnyIter<'v, I, D>,
}

impl<I, D> Iterator for Iter<'_, I, D> {
    type Item = I;

    #[inline]
    fn next(&mut self) -> Option<I> {
        if self.current.is_end() {
            return None;
        }
        let item = self.current.get();
        self.current.advance();
        Some(item)
    }
}

impl<I, D> FusedIterator for Iter<'_, I, D> {}

impl<I, D> Clone for Iter<'_, I, D>
where
    D: Descriptor,
    D::Traversal: ForwardLevel,
{
    fn clone(&self) -> Self {
        Self {
            current: self.current.clone(),
        }
    }
}

impl<I, D> fmt::Debug for Iter<'_, I, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.current).finish()
    }
}
