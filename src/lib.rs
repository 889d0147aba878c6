#![no_std]
#![doc = include_str!("../README.md")]
//!
//! # Quick Start
//!
//! ```rust
//! use any_view::{caps, AnyView};
//!
//! // Any random access source of `u32` with a known length
//! type Numbers<'a> = AnyView<'a, u32, caps![random_access | sized]>;
//!
//! fn total(numbers: &Numbers<'_>) -> u32 {
//!     numbers.iter().sum()
//! }
//!
//! let from_vec: Numbers = AnyView::new(vec![1u32, 2, 3]);
//! let from_range: Numbers = AnyView::new(1u32..4);
//! let from_array: Numbers = AnyView::new([3u32, 2, 1]);
//!
//! assert_eq!(total(&from_vec), 6);
//! assert_eq!(total(&from_range), 6);
//! assert_eq!(total(&from_array), 6);
//! assert_eq!(from_range.len(), 3);
//! ```
//!
//! # Capabilities
//!
//! A view type names what its users may rely on, and nothing more. A source
//! that offers more is narrowed; a source that offers less is rejected at
//! compile time:
//!
//! ```rust
//! use any_view::{caps, AnyView};
//!
//! // A vector is random access, but this view only promises a single pass
//! let once: AnyView<'_, char, caps![input | move_only]> = AnyView::new(vec!['a', 'b']);
//! assert_eq!(once.iter().collect::<String>(), "ab");
//! ```
//!
//! ```compile_fail
//! use any_view::{caps, sequence::Iterated, AnyView};
//!
//! // An iterator is single pass and cannot back a forward view
//! let view: AnyView<'_, u8, caps![forward]> = AnyView::new(Iterated::new(0u8..3));
//! ```
//!
//! ```compile_fail
//! use any_view::{caps, AnyView};
//!
//! // A common end needs comparable cursors, so at least forward traversal
//! let view: AnyView<'_, u8, caps![input | common]> = AnyView::new(vec![1u8, 2]);
//! ```
//!
//! # Storage
//!
//! Sources of up to three machine words with at most word alignment live
//! inside the view; larger sources are moved to the heap. Cursors get two
//! words. Moving a view never allocates, whatever the placement.
//!
//! ```rust
//! use any_view::{caps, AnyView};
//! use core::mem::size_of;
//!
//! # #[cfg(target_pointer_width = "64")]
//! assert_eq!(size_of::<AnyView<'static, u8, caps![forward]>>(), 40);
//! ```

extern crate alloc;

pub mod category;
mod error;
mod iter;
pub mod sequence;
mod storage;
mod table;
mod view;

pub use category::{Category, Traversal};
pub use error::Error;
pub use iter::{AnyCursor, AnyIter, AnySentinel, Iter};
pub use table::{Erase, Holds};
pub use view::{AnyView, EndKind};

#[cfg(test)]
#[path = "tests/category_tests.rs"]
mod category_tests;

#[cfg(test)]
#[path = "tests/storage_tests.rs"]
mod storage_tests;

#[cfg(test)]
#[path = "tests/sequence_tests.rs"]
mod sequence_tests;

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod view_tests;

#[cfg(test)]
#[path = "tests/iter_tests.rs"]
mod iter_tests;

#[cfg(test)]
#[path = "tests/property_tests.rs"]
mod property_tests;
