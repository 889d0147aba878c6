//! Erased storage: one value of a type known only to its operation table.
//!
//! A value that fits the inline buffer lives in it; anything larger or more
//! aligned is moved into an owning heap allocation. Borrowed values are kept
//! as a plain pointer. Relocating the storage is a Rust move: it never
//! allocates and never fails, whichever placement is in use.
//!
//! ```text
//! Inline:    [ value bytes .......... ] tag
//! Heap:      [ ptr ──▶ value | ...... ] tag
//! Borrowed:  [ ptr ──▶ caller's value ] tag
//! ```
//!
//! The storage does not know the type it holds, so it has no `Drop` impl.
//! Owners call [`RawStorage::drop_as`] with the type they stored.

use alloc::alloc::{alloc, dealloc, Layout};
use core::any::type_name;
use core::cell::UnsafeCell;
use core::fmt;
use core::mem::{align_of, size_of, ManuallyDrop, MaybeUninit};
use core::ptr::{self, NonNull};

use crate::Error;

/// Inline capacity of range storage, in machine words.
pub(crate) const RANGE_WORDS: usize = 3;

/// Inline capacity of cursor storage, in machine words.
pub(crate) const CURSOR_WORDS: usize = 2;

pub type RangeStorage = RawStorage<RANGE_WORDS>;
pub type CursorStorage = RawStorage<CURSOR_WORDS>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    Inline,
    Heap,
    Borrowed,
}

#[repr(C)]
union Slot<const WORDS: usize> {
    inline: ManuallyDrop<UnsafeCell<[MaybeUninit<usize>; WORDS]>>,
    ptr: NonNull<u8>,
}

/// Type-erased storage for a single value.
pub struct RawStorage<const WORDS: usize> {
    slot: Slot<WORDS>,
    placement: Placement,
}

#[cfg(target_pointer_width = "64")]
static_assertions::assert_eq_size!(RangeStorage, [usize; 4]);
#[cfg(target_pointer_width = "64")]
static_assertions::assert_eq_size!(CursorStorage, [usize; 3]);

impl<const WORDS: usize> RawStorage<WORDS> {
    /// Bytes available inline.
    pub(crate) const CAPACITY: usize = WORDS * size_of::<usize>();

    /// Returns `true` if a `T` is stored inline.
    #[inline]
    pub(crate) const fn fits<T>() -> bool {
        size_of::<T>() <= Self::CAPACITY && align_of::<T>() <= align_of::<usize>()
    }

    /// Takes ownership of `value`, inline if it fits, on the heap otherwise.
    pub(crate) fn try_owned<T>(value: T) -> Result<Self, Error> {
        if Self::fits::<T>() {
            let slot = Slot {
                inline: ManuallyDrop::new(UnsafeCell::new([MaybeUninit::uninit(); WORDS])),
            };
            let storage = Self {
                slot,
                placement: Placement::Inline,
            };
            // SAFETY: `fits` checked size and alignment against the buffer.
            unsafe { storage.address().cast::<T>().as_ptr().write(value) };
            return Ok(storage);
        }

        let layout = Layout::new::<T>();
        let ptr = if layout.size() == 0 {
            NonNull::<T>::dangling().cast::<u8>()
        } else {
            // SAFETY: the layout has a non-zero size.
            match NonNull::new(unsafe { alloc(layout) }) {
                Some(ptr) => ptr,
                None => {
                    log::debug!(
                        "any_view: allocation of {} bytes for {} failed",
                        layout.size(),
                        type_name::<T>()
                    );
                    return Err(Error::Alloc { layout });
                }
            }
        };
        log::trace!(
            "any_view: {} ({} bytes, align {}) exceeds {} inline bytes, stored on the heap",
            type_name::<T>(),
            layout.size(),
            layout.align(),
            Self::CAPACITY
        );
        // SAFETY: `ptr` is valid for writes of `T` and properly aligned.
        unsafe { ptr.cast::<T>().as_ptr().write(value) };
        Ok(Self {
            slot: Slot { ptr },
            placement: Placement::Heap,
        })
    }

    /// Like [`try_owned`](Self::try_owned), diverging on allocation failure.
    #[inline]
    pub(crate) fn owned<T>(value: T) -> Self {
        match Self::try_owned(value) {
            Ok(storage) => storage,
            Err(err) => err.raise(),
        }
    }

    /// Refers to `value` without owning it.
    ///
    /// The caller keeps `value` alive for as long as the storage is used.
    #[inline]
    pub(crate) fn borrowed<T>(value: &T) -> Self {
        Self {
            slot: Slot {
                ptr: NonNull::from(value).cast::<u8>(),
            },
            placement: Placement::Borrowed,
        }
    }

    #[inline]
    pub(crate) fn placement(&self) -> Placement {
        self.placement
    }

    /// Address of the held value.
    ///
    /// Stable across moves of the storage unless the value is inline.
    #[inline]
    pub(crate) fn address(&self) -> NonNull<()> {
        match self.placement {
            // SAFETY: the placement tag says which union field is live.
            Placement::Inline => unsafe {
                NonNull::new_unchecked(self.slot.inline.get()).cast::<()>()
            },
            Placement::Heap | Placement::Borrowed => unsafe { self.slot.ptr.cast::<()>() },
        }
    }

    /// # Safety
    ///
    /// The storage must hold a `T`.
    #[inline]
    pub(crate) unsafe fn get<T>(&self) -> &T {
        self.address().cast::<T>().as_ref()
    }

    /// # Safety
    ///
    /// The storage must own a `T`; it must not be borrowed.
    #[inline]
    pub(crate) unsafe fn get_mut<T>(&mut self) -> &mut T {
        debug_assert_ne!(self.placement, Placement::Borrowed);
        self.address().cast::<T>().as_mut()
    }

    /// Duplicates the held value. Borrowed storage copies the reference.
    ///
    /// The clone is made before any allocation, so a failed allocation drops
    /// it and leaves nothing behind.
    ///
    /// # Safety
    ///
    /// The storage must hold a `T`.
    pub(crate) unsafe fn try_clone_as<T: Clone>(&self) -> Result<Self, Error> {
        match self.placement {
            Placement::Borrowed => Ok(self.copy_borrowed()),
            Placement::Inline | Placement::Heap => Self::try_owned(self.get::<T>().clone()),
        }
    }

    /// Copies a borrowed reference.
    #[inline]
    pub(crate) fn copy_borrowed(&self) -> Self {
        debug_assert_eq!(self.placement, Placement::Borrowed, "storage does not borrow its value");
        Self {
            // SAFETY: borrowed storage always holds `ptr`.
            slot: Slot {
                ptr: unsafe { self.slot.ptr },
            },
            placement: Placement::Borrowed,
        }
    }

    /// Drops the held value and releases its allocation. Borrowed values are
    /// left alone.
    ///
    /// # Safety
    ///
    /// The storage must hold a `T`, and must not be used again afterwards.
    pub(crate) unsafe fn drop_as<T>(&mut self) {
        match self.placement {
            Placement::Inline => ptr::drop_in_place(self.address().cast::<T>().as_ptr()),
            Placement::Heap => {
                let ptr = self.slot.ptr;
                ptr::drop_in_place(ptr.cast::<T>().as_ptr());
                let layout = Layout::new::<T>();
                if layout.size() != 0 {
                    dealloc(ptr.as_ptr(), layout);
                }
            }
            Placement::Borrowed => {}
        }
    }
}

impl<const WORDS: usize> fmt::Debug for RawStorage<WORDS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawStorage")
            .field("placement", &self.placement)
            .field("address", &self.address())
            .finish()
    }
}
