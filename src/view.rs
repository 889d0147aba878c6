use core::fmt;
use core::marker::PhantomData;
use core::ops::Deref;
use core::ptr::NonNull;
use core::slice;

use crate::category::{
    BidirectionalLevel, Caps, ContiguousLevel, Descriptor, Flag, ForwardLevel, Input,
    RandomAccessLevel, No, Yes,
};
use crate::iter::{AnyCursor, AnyIter, AnySentinel, Iter};
use crate::sequence::{
    BidirectionalSequence, CommonSequence, ContiguousSequence, Empty, ForwardSequence,
    RandomAccessSequence, Sequence, SizedSequence,
};
use crate::storage::{Placement, RangeStorage};
use crate::table::{guaranteed, Erase, Holds, Table};
use crate::{Category, Error};

/// A type-erased view over any sequence with item type `I` that provides the
/// capabilities of the descriptor `D`.
///
/// The source is stored inline when it is small enough and on the heap
/// otherwise; see the crate documentation for the exact policy. Which methods
/// and trait impls the view has is decided by `D`:
///
/// | Descriptor has   | View gains                                         |
/// |------------------|----------------------------------------------------|
/// | `forward`        | cloneable, comparable iterators                    |
/// | `bidirectional`  | [`AnyIter::retreat`]                               |
/// | `random_access`  | iterator arithmetic, ordering, distance            |
/// | `contiguous`     | [`as_slice`](Self::as_slice), [`AnyIter::as_ptr`]  |
/// | `sized`          | [`len`](Self::len)                                 |
/// | `common`         | [`end`](Self::end) is an [`AnyIter`]               |
/// | `borrowed`       | [`begin_detached`](Self::begin_detached)           |
/// | no `move_only`   | [`Clone`], [`try_clone`](Self::try_clone)          |
///
/// # Examples
///
/// ```
/// use any_view::{caps, AnyView};
///
/// type Numbers = AnyView<'static, i32, caps![random_access | sized | common]>;
///
/// let evens: Numbers = AnyView::new((0..10).step_by(2).collect::<Vec<_>>());
/// let mut it = evens.begin();
/// it += 3;
/// assert_eq!(it.get(), 6);
/// assert_eq!(&evens.end() - &it, 2);
/// assert_eq!(evens.len(), 5);
/// ```
pub struct AnyView<'a, I, D = Caps<Input>> {
    storage: RangeStorage,
    table: &'a Table<I>,
    _marker: PhantomData<D>,
}

#[cfg(target_pointer_width = "64")]
static_assertions::assert_eq_size!(AnyView<'static, u32>, [usize; 5]);
#[cfg(target_pointer_width = "64")]
static_assertions::assert_eq_size!(AnyIter<'static, u32, Caps<Input>>, [usize; 5]);
static_assertions::assert_not_impl_any!(AnyView<'static, u32>: Send, Sync);
static_assertions::assert_not_impl_any!(AnyIter<'static, u32, Caps<Input>>: Send, Sync);
static_assertions::assert_not_impl_any!(AnyCursor<'static, u32, Caps<Input>>: Send, Sync);

impl<'a, I, D: Descriptor> AnyView<'a, I, D> {
    /// The capabilities of this view type.
    pub const CATEGORY: Category = D::CATEGORY;

    /// Erases `source`, reporting allocation failure.
    ///
    /// Owning views take the sequence by value; borrowing views take `&'a R`
    /// and never allocate.
    pub fn try_new<S>(source: S) -> Result<Self, Error>
    where
        <D as Descriptor>::Borrowed: Holds<'a, S>,
        <<D as Descriptor>::Borrowed as Holds<'a, S>>::Target: Sequence<Item = I>,
        D: Erase<'a, <<D as Descriptor>::Borrowed as Holds<'a, S>>::Target>,
    {
        let storage = <<D as Descriptor>::Borrowed as Holds<'a, S>>::store(source)?;
        Ok(Self {
            storage,
            table: <D as Erase<'a, <<D as Descriptor>::Borrowed as Holds<'a, S>>::Target>>::TABLE,
            _marker: PhantomData,
        })
    }

    /// Erases `source`.
    ///
    /// Allocation failure is handed to [`handle_alloc_error`], as `Box::new`
    /// does.
    ///
    /// [`handle_alloc_error`]: alloc::alloc::handle_alloc_error
    pub fn new<S>(source: S) -> Self
    where
        <D as Descriptor>::Borrowed: Holds<'a, S>,
        <<D as Descriptor>::Borrowed as Holds<'a, S>>::Target: Sequence<Item = I>,
        D: Erase<'a, <<D as Descriptor>::Borrowed as Holds<'a, S>>::Target>,
    {
        match Self::try_new(source) {
            Ok(view) => view,
            Err(err) => err.raise(),
        }
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.table.category
    }

    #[inline]
    pub(crate) fn placement(&self) -> Placement {
        self.storage.placement()
    }

    #[inline]
    fn range(&self) -> NonNull<()> {
        self.storage.address()
    }

    /// An iterator at the first item.
    ///
    /// Every call starts a new, independent pass, also for input views.
    #[inline]
    pub fn begin(&self) -> AnyIter<'_, I, D> {
        // SAFETY: the storage holds the source of `table` for as long as
        // `self` is borrowed.
        unsafe { AnyIter::begin(self.range(), self.table) }
    }

    /// The end of the view: an [`AnyIter`] for common views, an
    /// [`AnySentinel`] otherwise. Both compare with iterators by `==`.
    #[inline]
    pub fn end(&self) -> <D::Common as EndKind>::End<'_, I, D> {
        // SAFETY: as in `begin`.
        unsafe { <D::Common as EndKind>::end(self.range(), self.table) }
    }

    /// Returns `true` if the view has no items.
    pub fn is_empty(&self) -> bool {
        match self.table.size {
            // SAFETY: as in `begin`.
            Some(size) => unsafe { size(self.range()) == 0 },
            None => self.begin().is_end(),
        }
    }

    /// A Rust iterator over the items.
    #[inline]
    pub fn iter(&self) -> Iter<'_, I, D> {
        self.begin().into_iter()
    }
}

impl<I, D> AnyView<'_, I, D>
where
    D: Descriptor<Sized = Yes>,
{
    /// The number of items, without walking them.
    #[inline]
    pub fn len(&self) -> usize {
        let size = guaranteed(self.table.size);
        // SAFETY: as in `begin`.
        unsafe { size(self.range()) }
    }
}

impl<'a, I, D> AnyView<'a, I, D>
where
    D: Descriptor<Borrowed = Yes>,
{
    /// Like [`begin`](Self::begin), but bound to the borrowed source rather
    /// than to the view, so the iterator may outlive the view.
    ///
    /// ```
    /// use any_view::{caps, AnyView};
    ///
    /// let letters = ['a', 'b', 'c'];
    /// let mut it = {
    ///     let view: AnyView<'_, char, caps![forward | borrowed]> = AnyView::new(&letters);
    ///     view.begin_detached()
    /// };
    /// it.advance();
    /// assert_eq!(it.get(), 'b');
    /// ```
    #[inline]
    pub fn begin_detached(&self) -> AnyIter<'a, I, D> {
        debug_assert_eq!(self.placement(), Placement::Borrowed);
        // SAFETY: borrowed storage addresses the caller's source, which lives
        // for `'a`.
        unsafe { AnyIter::begin(self.range(), self.table) }
    }

    /// Like [`end`](Self::end), bound to the borrowed source.
    #[inline]
    pub fn end_detached(&self) -> <D::Common as EndKind>::End<'a, I, D> {
        debug_assert_eq!(self.placement(), Placement::Borrowed);
        // SAFETY: as in `begin_detached`.
        unsafe { <D::Common as EndKind>::end(self.range(), self.table) }
    }
}

impl<I, D> AnyView<'_, I, D>
where
    D: Descriptor,
    D::Traversal: ContiguousLevel,
    I: Deref,
    I::Target: Sized,
{
    /// The elements, in order.
    pub fn as_slice(&self) -> &[I::Target] {
        let ops = guaranteed(self.table.contiguous);
        // SAFETY: the entry returns the parts of the source's own slice, which
        // lives at least as long as `self` is borrowed.
        unsafe {
            let (data, len) = (ops.slice)(self.range());
            slice::from_raw_parts(data.cast::<I::Target>(), len)
        }
    }
}

impl<I, D> AnyView<'_, I, D>
where
    D: Descriptor<Copyable = Yes>,
{
    /// Copies the view, reporting allocation failure.
    ///
    /// Owned sources are cloned; borrowed sources share the same referent.
    pub fn try_clone(&self) -> Result<Self, Error> {
        let clone = guaranteed(self.table.clone_range);
        // SAFETY: the storage holds the source of `table`.
        let storage = unsafe { clone(&self.storage)? };
        Ok(Self {
            storage,
            table: self.table,
            _marker: PhantomData,
        })
    }
}

impl<I, D> Clone for AnyView<'_, I, D>
where
    D: Descriptor<Copyable = Yes>,
{
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(view) => view,
            Err(err) => err.raise(),
        }
    }
}

impl<I, D> Drop for AnyView<'_, I, D> {
    fn drop(&mut self) {
        // SAFETY: the storage holds the source of `table` and is never used
        // again.
        unsafe { (self.table.drop_range)(&mut self.storage) }
    }
}

/// An empty view.
impl<'a, I: 'a, D> Default for AnyView<'a, I, D>
where
    D: Erase<'a, Empty<I>>,
{
    fn default() -> Self {
        let storage = if <D::Borrowed as Flag>::VALUE {
            // `Empty` is zero-sized, so the address stays valid after the
            // temporary is gone.
            RangeStorage::borrowed(&Empty::<I>::NEW)
        } else {
            RangeStorage::owned(Empty::<I>::NEW)
        };
        Self {
            storage,
            table: <D as Erase<'a, Empty<I>>>::TABLE,
            _marker: PhantomData,
        }
    }
}

impl<I, D> fmt::Debug for AnyView<'_, I, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyView")
            .field("category", &self.table.category)
            .field("placement", &self.storage.placement())
            .finish_non_exhaustive()
    }
}

impl<'v, I, D: Descriptor> IntoIterator for &'v AnyView<'_, I, D> {
    type Item = I;
    type IntoIter = Iter<'v, I, D>;

    #[inline]
    fn into_iter(self) -> Iter<'v, I, D> {
        self.iter()
    }
}

// =============================================================================
// End kinds
// =============================================================================

/// What [`AnyView::end`] returns for a common flag.
///
/// [`Yes`] gives an [`AnyIter`], [`No`] an [`AnySentinel`].
pub trait EndKind: Flag {
    type End<'v, I: 'v, D>;

    #[doc(hidden)]
    unsafe fn end<'v, I: 'v, D>(range: NonNull<()>, table: &'v Table<I>) -> Self::End<'v, I, D>;
}

impl EndKind for Yes {
    type End<'v, I: 'v, D> = AnyIter<'v, I, D>;

    #[inline]
    unsafe fn end<'v, I: 'v, D>(range: NonNull<()>, table: &'v Table<I>) -> AnyIter<'v, I, D> {
        let end = guaranteed(table.end);
        AnyIter::from_parts(range, AnyCursor::new(end(range), table))
    }
}

impl EndKind for No {
    type End<'v, I: 'v, D> = AnySentinel<'v, I, D>;

    #[inline]
    unsafe fn end<'v, I: 'v, D>(range: NonNull<()>, table: &'v Table<I>) -> AnySentinel<'v, I, D> {
        AnySentinel::new(range, table)
    }
}

// =============================================================================
// Re-erasure
// =============================================================================
//
// A view is itself a sequence with exactly the capabilities of its
// descriptor, so it can be erased again, for instance to narrow it.

impl<'a, I, D: Descriptor> AnyView<'a, I, D> {
    #[inline]
    #[track_caller]
    fn check(&self, cursor: &AnyCursor<'a, I, D>) {
        assert!(
            cursor.belongs_to(self.table),
            "cursor used with a view over a different source type"
        );
    }
}

impl<'a, I, D: Descriptor> Sequence for AnyView<'a, I, D> {
    type Item = I;
    type Cursor = AnyCursor<'a, I, D>;

    fn begin(&self) -> Self::Cursor {
        // SAFETY: the state comes from `table`.
        unsafe { AnyCursor::new((self.table.begin)(self.range()), self.table) }
    }

    fn is_end(&self, cursor: &Self::Cursor) -> bool {
        self.check(cursor);
        // SAFETY: the cursor belongs to this view's table.
        unsafe { (self.table.is_end)(self.range(), &cursor.state) }
    }

    fn read(&self, cursor: &Self::Cursor) -> I {
        self.check(cursor);
        // SAFETY: as in `is_end`.
        unsafe { (self.table.read)(self.range(), &cursor.state) }
    }

    fn advance(&self, cursor: &mut Self::Cursor) {
        self.check(cursor);
        // SAFETY: as in `is_end`.
        unsafe { (self.table.advance)(self.range(), &mut cursor.state) }
    }
}

impl<I, D> ForwardSequence for AnyView<'_, I, D>
where
    D: Descriptor,
    D::Traversal: ForwardLevel,
{
}

impl<I, D> BidirectionalSequence for AnyView<'_, I, D>
where
    D: Descriptor,
    D::Traversal: BidirectionalLevel,
{
    fn retreat(&self, cursor: &mut Self::Cursor) {
        self.check(cursor);
        let retreat = guaranteed(self.table.retreat);
        // SAFETY: as in `is_end`.
        unsafe { retreat(self.range(), &mut cursor.state) }
    }
}

impl<I, D> RandomAccessSequence for AnyView<'_, I, D>
where
    D: Descriptor,
    D::Traversal: RandomAccessLevel,
{
    fn jump(&self, cursor: &mut Self::Cursor, n: isize) {
        self.check(cursor);
        let ops = guaranteed(self.table.random_access);
        // SAFETY: as in `is_end`.
        unsafe { (ops.jump)(self.range(), &mut cursor.state, n) }
    }

    fn distance(&self, from: &Self::Cursor, to: &Self::Cursor) -> isize {
        self.check(from);
        self.check(to);
        let ops = guaranteed(self.table.random_access);
        // SAFETY: as in `is_end`.
        unsafe { (ops.distance)(self.range(), &from.state, &to.state) }
    }
}

impl<I, D> ContiguousSequence for AnyView<'_, I, D>
where
    D: Descriptor,
    D::Traversal: ContiguousLevel,
    I: Deref,
    I::Target: Sized,
{
    type Element = I::Target;

    #[inline]
    fn as_slice(&self) -> &[I::Target] {
        AnyView::as_slice(self)
    }
}

impl<I, D> SizedSequence for AnyView<'_, I, D>
where
    D: Descriptor<Sized = Yes>,
{
    #[inline]
    fn size(&self) -> usize {
        self.len()
    }
}

impl<I, D> CommonSequence for AnyView<'_, I, D>
where
    D: Descriptor<Common = Yes>,
    D::Traversal: ForwardLevel,
{
    fn end(&self) -> Self::Cursor {
        let end = guaranteed(self.table.end);
        // SAFETY: the state comes from `table`.
        unsafe { AnyCursor::new(end(self.range()), self.table) }
    }
}
