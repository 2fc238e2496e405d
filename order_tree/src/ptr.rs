use core::{
    fmt::Debug,
    hash::Hash,
    num::NonZeroU64,
    panic::{RefUnwindSafe, UnwindSafe},
    sync::atomic::{AtomicU64, Ordering},
};

/// A trait containing index and generation information for the arenas
/// backing an `OrderTree`.
///
/// Users should never have to manually implement this, use the `ptr_struct`
/// macro. The `PartialEq`/`Eq` implementation must differentiate between
/// pointers at the same index but different generation, and `Default` should
/// use the `invalid` function.
pub trait Ptr:
    Debug
    + Hash
    + Clone
    + Copy
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + Send
    + Sync
    + Unpin
    + RefUnwindSafe
    + UnwindSafe
{
    /// Returns a new `Ptr` with a generation value of 1. Because arena
    /// generations start at 2, this is guaranteed to never be valid.
    fn invalid() -> Self;

    /// Returns the raw index. Do not rely on this if the `Ptr` is invalidated
    /// after `inx` is used.
    fn inx(self) -> usize;

    /// Returns the generation of this `Ptr`.
    fn gen(self) -> NonZeroU64;

    /// Do not use this unless you are manually managing internal details
    #[doc(hidden)]
    fn _from_raw(inx: usize, gen: NonZeroU64) -> Self;
}

/// The lowest generation any arena allocates under
#[inline]
pub(crate) fn gen_two() -> NonZeroU64 {
    NonZeroU64::MIN.saturating_add(1)
}

// Shared by every arena in the process, so that no two arenas ever allocate
// under the same generation and a `Ptr` from one arena never addresses an
// entry of another.
static NEXT_GEN: AtomicU64 = AtomicU64::new(2);

/// Claims a generation that no arena has used yet
pub(crate) fn next_gen() -> NonZeroU64 {
    match NonZeroU64::new(NEXT_GEN.fetch_add(1, Ordering::Relaxed)) {
        Some(gen) if gen >= gen_two() => gen,
        _ => panic!("generation overflow"),
    }
}

/// Convenience macro for making new structs that implement `Ptr`, with a
/// `usize` index and a `NonZeroU64` generation counter. Each struct name can
/// be followed by a comma separated list of attributes, and multiple structs
/// are separated by semicolons.
///
/// ```
/// use order_tree::{ptr_struct, Ptr};
///
/// ptr_struct!(P0 doc="An example struct `P0` that implements `Ptr`"; P1);
///
/// assert_eq!(format!("{:?}", P0::invalid()), format!("P0[{}](1)", usize::MAX));
/// assert_ne!(P0::_from_raw(3, P1::invalid().gen()), P0::invalid());
/// ```
#[macro_export]
macro_rules! ptr_struct {
    ($($struct_name:ident $($attributes:meta),*);*) => {
        $(
            $(#[$attributes])*
            #[derive(
                core::hash::Hash,
                core::clone::Clone,
                core::marker::Copy,
                core::cmp::PartialEq,
                core::cmp::Eq,
                core::cmp::PartialOrd,
                core::cmp::Ord
            )]
            pub struct $struct_name {
                // note: in this order `PartialOrd` will order primarily off of `_internal_inx`
                #[doc(hidden)]
                _internal_inx: usize,
                #[doc(hidden)]
                _internal_gen: core::num::NonZeroU64,
            }

            impl $crate::Ptr for $struct_name {
                #[inline]
                fn invalid() -> Self {
                    Self {
                        _internal_inx: usize::MAX,
                        _internal_gen: core::num::NonZeroU64::MIN,
                    }
                }

                #[inline]
                fn inx(self) -> usize {
                    self._internal_inx
                }

                #[inline]
                fn gen(self) -> core::num::NonZeroU64 {
                    self._internal_gen
                }

                #[inline]
                #[doc(hidden)]
                fn _from_raw(_internal_inx: usize, _internal_gen: core::num::NonZeroU64) -> Self {
                    Self {
                        _internal_inx,
                        _internal_gen,
                    }
                }
            }

            impl core::default::Default for $struct_name {
                #[inline]
                fn default() -> Self {
                    $crate::Ptr::invalid()
                }
            }

            // This is manually implemented so that it is inline and has no newlines, which
            // makes nested `Debug` output look much nicer.
            impl core::fmt::Debug for $struct_name {
                fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                    f.write_fmt(format_args!(
                        "{}[{:?}]({:?})",
                        stringify!($struct_name),
                        $crate::Ptr::inx(*self),
                        $crate::Ptr::gen(*self),
                    ))
                }
            }

            impl core::fmt::Display for $struct_name {
                fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                    core::fmt::Debug::fmt(self, f)
                }
            }
        )*
    };
}

ptr_struct!(
    PNode doc="A handle to a node in the insertion order chain of an `OrderTree`";
    PLevel doc="A handle to one level (the root or a nested map) of an `OrderTree`"
);
