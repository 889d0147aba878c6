use core::alloc::Layout;

use thiserror::Error;

/// Failure to build or copy an erased value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The value did not fit inline and the heap allocation failed.
    #[error(
        "failed to allocate {} bytes (align {}) for an erased value",
        .layout.size(),
        .layout.align()
    )]
    Alloc { layout: Layout },
}

impl Error {
    /// Hands the failure to the global allocation error handler.
    ///
    /// Infallible constructors use this the way `Box::new` does.
    pub(crate) fn raise(self) -> ! {
        match self {
            Error::Alloc { layout } => alloc::alloc::handle_alloc_error(layout),
        }
    }
}
