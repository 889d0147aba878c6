//! Operation tables.
//!
//! A [`Table`] is a struct of function pointers built once per pair of source
//! type and descriptor, as a `const`. Entries the descriptor does not ask for
//! are `None`; entries it does ask for are always `Some`, because the slot
//! traits below only have impls for sources that provide them.

use core::fmt;
use core::ops::Deref;
use core::ptr::NonNull;

use crate::category::{
    Bidirectional, Caps, Contiguous, Descriptor, Flag, Forward, ForwardLevel, Input, Level, No,
    RandomAccess, Yes,
};
use crate::sequence::{
    BidirectionalSequence, CommonSequence, ContiguousSequence, ForwardSequence,
    RandomAccessSequence, Sequence, SizedSequence,
};
use crate::storage::{CursorStorage, RangeStorage};
use crate::view::EndKind;
use crate::{Category, Error};

pub type RangeOp<T> = unsafe fn(NonNull<()>) -> T;
pub type CursorQuery<T> = unsafe fn(NonNull<()>, &CursorStorage) -> T;
pub type CursorStep = unsafe fn(NonNull<()>, &mut CursorStorage);
pub type CloneRange = unsafe fn(&RangeStorage) -> Result<RangeStorage, Error>;

/// The operations of one erased source, as seen through one descriptor.
///
/// Range entries take the address of the source value; cursor entries take
/// the cursor storage they apply to.
pub struct Table<I> {
    pub(crate) category: Category,
    pub(crate) drop_range: unsafe fn(&mut RangeStorage),
    pub(crate) clone_range: Option<CloneRange>,
    pub(crate) size: Option<RangeOp<usize>>,
    pub(crate) begin: RangeOp<CursorStorage>,
    pub(crate) end: Option<RangeOp<CursorStorage>>,
    pub(crate) is_end: CursorQuery<bool>,
    pub(crate) read: CursorQuery<I>,
    pub(crate) advance: CursorStep,
    pub(crate) drop_cursor: unsafe fn(&mut CursorStorage),
    pub(crate) forward: Option<ForwardOps>,
    pub(crate) retreat: Option<CursorStep>,
    pub(crate) random_access: Option<RandomAccessOps>,
    pub(crate) contiguous: Option<ContiguousOps>,
}

#[derive(Clone, Copy)]
pub struct ForwardOps {
    pub(crate) clone_cursor: unsafe fn(&CursorStorage) -> CursorStorage,
    pub(crate) eq: unsafe fn(&CursorStorage, &CursorStorage) -> bool,
}

#[derive(Clone, Copy)]
pub struct RandomAccessOps {
    pub(crate) jump: unsafe fn(NonNull<()>, &mut CursorStorage, isize),
    pub(crate) distance: unsafe fn(NonNull<()>, &CursorStorage, &CursorStorage) -> isize,
}

#[derive(Clone, Copy)]
pub struct ContiguousOps {
    /// Start and length of the element slice.
    pub(crate) slice: RangeOp<(*const (), usize)>,
    /// Address of the element under a cursor.
    pub(crate) address: CursorQuery<*const ()>,
}

impl ForwardOps {
    const fn of<R: ForwardSequence>() -> Self {
        Self {
            clone_cursor: clone_cursor::<R>,
            eq: eq_cursor::<R>,
        }
    }
}

impl RandomAccessOps {
    const fn of<R: RandomAccessSequence>() -> Self {
        Self {
            jump: jump::<R>,
            distance: distance::<R>,
        }
    }
}

impl ContiguousOps {
    const fn of<R: ContiguousSequence>() -> Self {
        Self {
            slice: slice::<R>,
            address: element_address::<R>,
        }
    }
}

impl<I> fmt::Debug for Table<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("category", &self.category)
            .field("clone_range", &self.clone_range.is_some())
            .field("size", &self.size.is_some())
            .field("end", &self.end.is_some())
            .field("forward", &self.forward.is_some())
            .field("retreat", &self.retreat.is_some())
            .field("random_access", &self.random_access.is_some())
            .field("contiguous", &self.contiguous.is_some())
            .finish()
    }
}

/// Unwraps an entry that the descriptor guarantees is present.
#[inline]
#[track_caller]
pub(crate) fn guaranteed<T>(entry: Option<T>) -> T {
    match entry {
        Some(entry) => entry,
        None => unreachable!("operation table lacks an entry its descriptor guarantees"),
    }
}

// =============================================================================
// Entries
// =============================================================================
//
// Every entry is only ever called with the address of an `R` and with cursor
// storage holding an `R::Cursor` that was produced by the same table.

unsafe fn drop_range<R>(storage: &mut RangeStorage) {
    storage.drop_as::<R>();
}

unsafe fn clone_owned<R: Clone>(storage: &RangeStorage) -> Result<RangeStorage, Error> {
    storage.try_clone_as::<R>()
}

unsafe fn copy_borrowed(storage: &RangeStorage) -> Result<RangeStorage, Error> {
    Ok(storage.copy_borrowed())
}

unsafe fn size<R: SizedSequence>(range: NonNull<()>) -> usize {
    range.cast::<R>().as_ref().size()
}

unsafe fn begin<R: Sequence>(range: NonNull<()>) -> CursorStorage {
    CursorStorage::owned(range.cast::<R>().as_ref().begin())
}

unsafe fn end<R: CommonSequence>(range: NonNull<()>) -> CursorStorage {
    CursorStorage::owned(range.cast::<R>().as_ref().end())
}

unsafe fn is_end<R: Sequence>(range: NonNull<()>, cursor: &CursorStorage) -> bool {
    range.cast::<R>().as_ref().is_end(cursor.get::<R::Cursor>())
}

unsafe fn read<R: Sequence>(range: NonNull<()>, cursor: &CursorStorage) -> R::Item {
    range.cast::<R>().as_ref().read(cursor.get::<R::Cursor>())
}

unsafe fn advance<R: Sequence>(range: NonNull<()>, cursor: &mut CursorStorage) {
    range.cast::<R>().as_ref().advance(cursor.get_mut::<R::Cursor>());
}

unsafe fn drop_cursor<R: Sequence>(cursor: &mut CursorStorage) {
    cursor.drop_as::<R::Cursor>();
}

unsafe fn clone_cursor<R: ForwardSequence>(cursor: &CursorStorage) -> CursorStorage {
    CursorStorage::owned(cursor.get::<R::Cursor>().clone())
}

unsafe fn eq_cursor<R: ForwardSequence>(lhs: &CursorStorage, rhs: &CursorStorage) -> bool {
    lhs.get::<R::Cursor>() == rhs.get::<R::Cursor>()
}

unsafe fn retreat<R: BidirectionalSequence>(range: NonNull<()>, cursor: &mut CursorStorage) {
    range.cast::<R>().as_ref().retreat(cursor.get_mut::<R::Cursor>());
}

unsafe fn jump<R: RandomAccessSequence>(range: NonNull<()>, cursor: &mut CursorStorage, n: isize) {
    range.cast::<R>().as_ref().jump(cursor.get_mut::<R::Cursor>(), n);
}

unsafe fn distance<R: RandomAccessSequence>(
    range: NonNull<()>,
    from: &CursorStorage,
    to: &CursorStorage,
) -> isize {
    range
        .cast::<R>()
        .as_ref()
        .distance(from.get::<R::Cursor>(), to.get::<R::Cursor>())
}

unsafe fn slice<R: ContiguousSequence>(range: NonNull<()>) -> (*const (), usize) {
    let elements = range.cast::<R>().as_ref().as_slice();
    (elements.as_ptr().cast(), elements.len())
}

unsafe fn element_address<R: ContiguousSequence>(
    range: NonNull<()>,
    cursor: &CursorStorage,
) -> *const () {
    let range = range.cast::<R>().as_ref();
    let index = range.distance(&range.begin(), cursor.get::<R::Cursor>());
    range.as_slice().as_ptr().wrapping_offset(index).cast()
}

// =============================================================================
// Slots
// =============================================================================

/// Traversal entries a source provides at a given level.
#[diagnostic::on_unimplemented(
    message = "`{R}` does not provide the traversal requested by `{Self}`",
    note = "request a weaker traversal, or implement the matching sequence trait for `{R}`"
)]
pub trait Synthesize<R: Sequence>: Level {
    const FORWARD: Option<ForwardOps>;
    const RETREAT: Option<CursorStep>;
    const RANDOM_ACCESS: Option<RandomAccessOps>;
    const CONTIGUOUS: Option<ContiguousOps>;
}

impl<R: Sequence> Synthesize<R> for Input {
    const FORWARD: Option<ForwardOps> = None;
    const RETREAT: Option<CursorStep> = None;
    const RANDOM_ACCESS: Option<RandomAccessOps> = None;
    const CONTIGUOUS: Option<ContiguousOps> = None;
}

impl<R: ForwardSequence> Synthesize<R> for Forward {
    const FORWARD: Option<ForwardOps> = Some(ForwardOps::of::<R>());
    const RETREAT: Option<CursorStep> = None;
    const RANDOM_ACCESS: Option<RandomAccessOps> = None;
    const CONTIGUOUS: Option<ContiguousOps> = None;
}

impl<R: BidirectionalSequence> Synthesize<R> for Bidirectional {
    const FORWARD: Option<ForwardOps> = Some(ForwardOps::of::<R>());
    const RETREAT: Option<CursorStep> = Some(retreat::<R>);
    const RANDOM_ACCESS: Option<RandomAccessOps> = None;
    const CONTIGUOUS: Option<ContiguousOps> = None;
}

impl<R: RandomAccessSequence> Synthesize<R> for RandomAccess {
    const FORWARD: Option<ForwardOps> = Some(ForwardOps::of::<R>());
    const RETREAT: Option<CursorStep> = Some(retreat::<R>);
    const RANDOM_ACCESS: Option<RandomAccessOps> = Some(RandomAccessOps::of::<R>());
    const CONTIGUOUS: Option<ContiguousOps> = None;
}

// Items must dereference to the slice elements so that an iterator's address
// and the item it reads agree.
impl<R> Synthesize<R> for Contiguous
where
    R: ContiguousSequence,
    R::Item: Deref<Target = R::Element>,
{
    const FORWARD: Option<ForwardOps> = Some(ForwardOps::of::<R>());
    const RETREAT: Option<CursorStep> = Some(retreat::<R>);
    const RANDOM_ACCESS: Option<RandomAccessOps> = Some(RandomAccessOps::of::<R>());
    const CONTIGUOUS: Option<ContiguousOps> = Some(ContiguousOps::of::<R>());
}

#[diagnostic::on_unimplemented(
    message = "`{R}` cannot be erased into a sized view",
    note = "implement `SizedSequence` for `{R}`, or drop `sized` from the capabilities"
)]
pub trait SizeSlot<R>: Flag {
    const SIZE: Option<RangeOp<usize>>;
}

impl<R> SizeSlot<R> for No {
    const SIZE: Option<RangeOp<usize>> = None;
}

impl<R: SizedSequence> SizeSlot<R> for Yes {
    const SIZE: Option<RangeOp<usize>> = Some(size::<R>);
}

#[diagnostic::on_unimplemented(
    message = "`{R}` cannot be erased into a common view at traversal `{T}`",
    note = "`common` needs at least forward traversal and `CommonSequence` for `{R}`; otherwise drop `common` from the capabilities"
)]
pub trait EndSlot<T: Level, R>: EndKind {
    const END: Option<RangeOp<CursorStorage>>;
}

impl<T: Level, R> EndSlot<T, R> for No {
    const END: Option<RangeOp<CursorStorage>> = None;
}

// An input cursor cannot be compared, so an end cursor needs forward traversal.
impl<T: ForwardLevel, R: CommonSequence> EndSlot<T, R> for Yes {
    const END: Option<RangeOp<CursorStorage>> = Some(end::<R>);
}

/// Range copying for a copyable flag `Self` and borrowed flag `B`.
#[diagnostic::on_unimplemented(
    message = "`{R}` cannot be erased into a copyable view",
    note = "implement `Clone` for `{R}`, borrow it, or add `move_only` to the capabilities"
)]
pub trait CloneSlot<B: Flag, R>: Flag {
    const CLONE: Option<CloneRange>;
}

impl<B: Flag, R> CloneSlot<B, R> for No {
    const CLONE: Option<CloneRange> = None;
}

impl<R: Clone> CloneSlot<No, R> for Yes {
    const CLONE: Option<CloneRange> = Some(clone_owned::<R>);
}

impl<R> CloneSlot<Yes, R> for Yes {
    const CLONE: Option<CloneRange> = Some(copy_borrowed);
}

// =============================================================================
// Erasure
// =============================================================================

/// A descriptor that can erase the source type `R`.
///
/// Implemented for every [`Caps`] whose capabilities `R` provides. A bound
/// `D: Erase<'a, R>` that does not hold names the missing capability.
pub trait Erase<'a, R: Sequence + 'a>: Descriptor {
    #[doc(hidden)]
    const TABLE: &'a Table<R::Item>;
}

impl<'a, R, T, S, C, B, Cp> Erase<'a, R> for Caps<T, S, C, B, Cp>
where
    R: Sequence + 'a,
    T: Synthesize<R>,
    S: SizeSlot<R>,
    C: EndSlot<T, R>,
    B: Flag,
    Cp: CloneSlot<B, R>,
{
    const TABLE: &'a Table<R::Item> = &Table {
        category: <Self as Descriptor>::CATEGORY,
        drop_range: drop_range::<R>,
        clone_range: <Cp as CloneSlot<B, R>>::CLONE,
        size: <S as SizeSlot<R>>::SIZE,
        begin: begin::<R>,
        end: <C as EndSlot<T, R>>::END,
        is_end: is_end::<R>,
        read: read::<R>,
        advance: advance::<R>,
        drop_cursor: drop_cursor::<R>,
        forward: <T as Synthesize<R>>::FORWARD,
        retreat: <T as Synthesize<R>>::RETREAT,
        random_access: <T as Synthesize<R>>::RANDOM_ACCESS,
        contiguous: <T as Synthesize<R>>::CONTIGUOUS,
    };
}

/// How a view of borrowed flag `Self` holds a source passed as `S`.
///
/// Owning views take the sequence itself; borrowing views take `&'a R`.
#[diagnostic::on_unimplemented(
    message = "a view with borrowed flag `{Self}` cannot hold `{S}`",
    note = "borrowed views take `&R`, owning views take the sequence by value"
)]
pub trait Holds<'a, S>: Flag {
    /// The sequence type the view operates on.
    type Target: Sequence + 'a;

    #[doc(hidden)]
    fn store(source: S) -> Result<RangeStorage, Error>;
}

impl<'a, R: Sequence + 'a> Holds<'a, R> for No {
    type Target = R;

    #[inline]
    fn store(source: R) -> Result<RangeStorage, Error> {
        RangeStorage::try_owned(source)
    }
}

impl<'a, R: Sequence + 'a> Holds<'a, &'a R> for Yes {
    type Target = R;

    #[inline]
    fn store(source: &'a R) -> Result<RangeStorage, Error> {
        Ok(RangeStorage::borrowed(source))
    }
}
