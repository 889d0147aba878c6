//! Capability descriptors.
//!
//! A capability set has two faces. [`Category`] is a plain value that can be
//! inspected and combined in `const` context. [`Descriptor`] is its type-level
//! mirror: [`AnyView`](crate::AnyView) is parameterized by a descriptor, and
//! the descriptor decides which methods and trait impls the view has.
//!
//! Descriptors are usually spelled with the [`caps!`](crate::caps) macro:
//!
//! ```
//! use any_view::{caps, category::Descriptor, Category};
//!
//! type Full = caps![random_access | sized | common | borrowed];
//! assert_eq!(
//!     <Full as Descriptor>::CATEGORY,
//!     Category::RANDOM_ACCESS.sized().common().borrowed(),
//! );
//! ```

use core::fmt;
use core::marker::PhantomData;
use core::ops::BitOr;

use crate::view::EndKind;

/// Sealed trait module to prevent external implementations.
mod private {
    pub trait Sealed {}
}

/// Traversal strength, from weakest to strongest.
///
/// Each level implies every weaker one, so the derived ordering is the
/// "provides at least" relation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Traversal {
    /// Single pass; cursors cannot be duplicated.
    Input,
    /// Multi-pass; cursors can be copied and compared.
    Forward,
    /// Forward plus stepping backwards.
    Bidirectional,
    /// Bidirectional plus constant-time offsets and distances.
    RandomAccess,
    /// Random access over elements laid out contiguously in memory.
    Contiguous,
}

impl Traversal {
    #[inline]
    const fn rank(self) -> u8 {
        self as u8
    }

    /// Returns `true` if `self` provides every guarantee of `other`.
    #[inline]
    pub const fn implies(self, other: Traversal) -> bool {
        self.rank() >= other.rank()
    }

    /// The weaker of two traversal levels.
    #[inline]
    pub const fn weakest(self, other: Traversal) -> Traversal {
        if self.implies(other) {
            other
        } else {
            self
        }
    }

    /// Lowercase name, as accepted by [`caps!`](crate::caps).
    pub const fn name(self) -> &'static str {
        match self {
            Traversal::Input => "input",
            Traversal::Forward => "forward",
            Traversal::Bidirectional => "bidirectional",
            Traversal::RandomAccess => "random_access",
            Traversal::Contiguous => "contiguous",
        }
    }
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A capability set: one traversal level plus independent modifiers.
///
/// Values are built from a traversal constant and the builder methods:
///
/// ```
/// use any_view::{Category, Traversal};
///
/// let requested = Category::RANDOM_ACCESS.sized().move_only();
/// assert_eq!(requested.traversal(), Traversal::RandomAccess);
/// assert!(requested.is_sized());
/// assert!(!requested.is_copyable());
/// ```
///
/// `|` composes two sets by keeping only what both guarantee: the weaker
/// traversal and the logical AND of every modifier.
///
/// ```
/// use any_view::Category;
///
/// let source = Category::CONTIGUOUS.sized().common();
/// let requested = Category::FORWARD.sized().borrowed();
/// assert_eq!(source | requested, Category::FORWARD.sized());
/// assert!(!source.admits(requested));
/// assert!(source.admits(Category::FORWARD.sized()));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Category {
    traversal: Traversal,
    sized: bool,
    common: bool,
    borrowed: bool,
    copyable: bool,
}

impl Category {
    pub const INPUT: Self = Self::new(Traversal::Input);
    pub const FORWARD: Self = Self::new(Traversal::Forward);
    pub const BIDIRECTIONAL: Self = Self::new(Traversal::Bidirectional);
    pub const RANDOM_ACCESS: Self = Self::new(Traversal::RandomAccess);
    pub const CONTIGUOUS: Self = Self::new(Traversal::Contiguous);

    /// A copyable, unsized, non-common, owning set with the given traversal.
    #[inline]
    pub const fn new(traversal: Traversal) -> Self {
        Self {
            traversal,
            sized: false,
            common: false,
            borrowed: false,
            copyable: true,
        }
    }

    #[inline]
    pub const fn sized(self) -> Self {
        Self {
            sized: true,
            ..self
        }
    }

    #[inline]
    pub const fn common(self) -> Self {
        Self {
            common: true,
            ..self
        }
    }

    #[inline]
    pub const fn borrowed(self) -> Self {
        Self {
            borrowed: true,
            ..self
        }
    }

    #[inline]
    pub const fn move_only(self) -> Self {
        Self {
            copyable: false,
            ..self
        }
    }

    #[inline]
    pub const fn traversal(&self) -> Traversal {
        self.traversal
    }

    #[inline]
    pub const fn is_sized(&self) -> bool {
        self.sized
    }

    #[inline]
    pub const fn is_common(&self) -> bool {
        self.common
    }

    #[inline]
    pub const fn is_borrowed(&self) -> bool {
        self.borrowed
    }

    #[inline]
    pub const fn is_copyable(&self) -> bool {
        self.copyable
    }

    /// The guarantees shared by `self` and `other`.
    ///
    /// Same as `self | other`, usable in `const` context.
    #[inline]
    pub const fn meet(self, other: Self) -> Self {
        Self {
            traversal: self.traversal.weakest(other.traversal),
            sized: self.sized && other.sized,
            common: self.common && other.common,
            borrowed: self.borrowed && other.borrowed,
            copyable: self.copyable && other.copyable,
        }
    }

    /// Returns `true` if `self` provides everything `requested` asks for.
    #[inline]
    pub const fn admits(&self, requested: Self) -> bool {
        let shared = self.meet(requested);
        shared.traversal.rank() == requested.traversal.rank()
            && shared.sized == requested.sized
            && shared.common == requested.common
            && shared.borrowed == requested.borrowed
            && shared.copyable == requested.copyable
    }
}

impl BitOr for Category {
    type Output = Category;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        self.meet(rhs)
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.traversal.name())?;
        if self.sized {
            f.write_str(" | sized")?;
        }
        if self.common {
            f.write_str(" | common")?;
        }
        if self.borrowed {
            f.write_str(" | borrowed")?;
        }
        if !self.copyable {
            f.write_str(" | move_only")?;
        }
        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// =============================================================================
// Type-level mirror
// =============================================================================

/// Type-level `true` for a modifier.
pub struct Yes;

/// Type-level `false` for a modifier.
pub struct No;

/// A type-level boolean.
pub trait Flag: private::Sealed + 'static {
    const VALUE: bool;
}

impl private::Sealed for Yes {}
impl private::Sealed for No {}

impl Flag for Yes {
    const VALUE: bool = true;
}

impl Flag for No {
    const VALUE: bool = false;
}

/// Traversal tag for [`Traversal::Input`].
pub struct Input;
/// Traversal tag for [`Traversal::Forward`].
pub struct Forward;
/// Traversal tag for [`Traversal::Bidirectional`].
pub struct Bidirectional;
/// Traversal tag for [`Traversal::RandomAccess`].
pub struct RandomAccess;
/// Traversal tag for [`Traversal::Contiguous`].
pub struct Contiguous;

/// A traversal tag.
///
/// The marker traits below form the same hierarchy as [`Traversal`]; view and
/// iterator methods are gated on them.
pub trait Level: private::Sealed + 'static {
    const TRAVERSAL: Traversal;
}

pub trait ForwardLevel: Level {}
pub trait BidirectionalLevel: ForwardLevel {}
pub trait RandomAccessLevel: BidirectionalLevel {}
pub trait ContiguousLevel: RandomAccessLevel {}

macro_rules! level {
    ($tag:ident => $traversal:ident: $($marker:ident),*) => {
        impl private::Sealed for $tag {}

        impl Level for $tag {
            const TRAVERSAL: Traversal = Traversal::$traversal;
        }

        $(impl $marker for $tag {})*
    };
}

level!(Input => Input:);
level!(Forward => Forward: ForwardLevel);
level!(Bidirectional => Bidirectional: ForwardLevel, BidirectionalLevel);
level!(RandomAccess => RandomAccess: ForwardLevel, BidirectionalLevel, RandomAccessLevel);
level!(Contiguous => Contiguous: ForwardLevel, BidirectionalLevel, RandomAccessLevel, ContiguousLevel);

/// A capability set at the type level.
///
/// Implemented only by [`Caps`].
pub trait Descriptor: private::Sealed + 'static {
    type Traversal: Level;
    type Sized: Flag;
    type Common: EndKind;
    type Borrowed: Flag;
    type Copyable: Flag;

    /// The same capability set as a value.
    const CATEGORY: Category;
}

/// The descriptor with traversal `T` and modifiers `S`ized, `C`ommon,
/// `B`orrowed and `Cp` (copyable).
///
/// Prefer the [`caps!`](crate::caps) macro over spelling this out.
pub struct Caps<T, S = No, C = No, B = No, Cp = Yes>(PhantomData<fn() -> (T, S, C, B, Cp)>);

impl<T, S, C, B, Cp> private::Sealed for Caps<T, S, C, B, Cp> {}

impl<T, S, C, B, Cp> Descriptor for Caps<T, S, C, B, Cp>
where
    T: Level,
    S: Flag,
    C: EndKind,
    B: Flag,
    Cp: Flag,
{
    type Traversal = T;
    type Sized = S;
    type Common = C;
    type Borrowed = B;
    type Copyable = Cp;

    const CATEGORY: Category = Category {
        traversal: T::TRAVERSAL,
        sized: S::VALUE,
        common: C::VALUE,
        borrowed: B::VALUE,
        copyable: Cp::VALUE,
    };
}

/// Names a [`Descriptor`] type.
///
/// Takes a traversal (`input`, `forward`, `bidirectional`, `random_access`,
/// `contiguous`) followed by any of `sized`, `common`, `borrowed`,
/// `move_only`, separated by `|`.
///
/// ```
/// use any_view::{caps, AnyView};
///
/// type Numbers = AnyView<'static, u32, caps![bidirectional | sized | move_only]>;
///
/// let view = Numbers::new(0u32..4);
/// assert_eq!(view.len(), 4);
/// ```
#[macro_export]
macro_rules! caps {
    (input $(| $flag:ident)*) => {
        $crate::caps!(@flags $crate::category::Input; $($flag)*)
    };
    (forward $(| $flag:ident)*) => {
        $crate::caps!(@flags $crate::category::Forward; $($flag)*)
    };
    (bidirectional $(| $flag:ident)*) => {
        $crate::caps!(@flags $crate::category::Bidirectional; $($flag)*)
    };
    (random_access $(| $flag:ident)*) => {
        $crate::caps!(@flags $crate::category::RandomAccess; $($flag)*)
    };
    (contiguous $(| $flag:ident)*) => {
        $crate::caps!(@flags $crate::category::Contiguous; $($flag)*)
    };
    (@flags $traversal:ty; $($flag:ident)*) => {
        $crate::caps!(
            @build $traversal;
            $crate::category::No;
            $crate::category::No;
            $crate::category::No;
            $crate::category::Yes;
            $($flag)*
        )
    };
    (@build $t:ty; $s:ty; $c:ty; $b:ty; $cp:ty;) => {
        $crate::category::Caps<$t, $s, $c, $b, $cp>
    };
    (@build $t:ty; $s:ty; $c:ty; $b:ty; $cp:ty; sized $($rest:ident)*) => {
        $crate::caps!(@build $t; $crate::category::Yes; $c; $b; $cp; $($rest)*)
    };
    (@build $t:ty; $s:ty; $c:ty; $b:ty; $cp:ty; common $($rest:ident)*) => {
        $crate::caps!(@build $t; $s; $crate::category::Yes; $b; $cp; $($rest)*)
    };
    (@build $t:ty; $s:ty; $c:ty; $b:ty; $cp:ty; borrowed $($rest:ident)*) => {
        $crate::caps!(@build $t; $s; $c; $crate::category::Yes; $cp; $($rest)*)
    };
    (@build $t:ty; $s:ty; $c:ty; $b:ty; $cp:ty; move_only $($rest:ident)*) => {
        $crate::caps!(@build $t; $s; $c; $b; $crate::category::No; $($rest)*)
    };
    (@build $t:ty; $s:ty; $c:ty; $b:ty; $cp:ty; $unknown:ident $($rest:ident)*) => {
        ::core::compile_error!(::core::concat!(
            "unknown capability `",
            ::core::stringify!($unknown),
            "`, expected one of: sized, common, borrowed, move_only"
        ))
    };
}
