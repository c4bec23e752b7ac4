use core::ptr::NonNull;

/// Declares `B` as a base of `Self`, making `Own<Self>` convertible to `Own<B>`.
///
/// Every type is its own base. Other bases are either sub-objects embedded
/// as fields or trait objects; both are usually declared with
/// [`impl_upcast!`](crate::impl_upcast). Converting the other way is never
/// expressible:
///
/// ```compile_fail
/// use tenure_core::{heap, impl_upcast, Own};
///
/// struct Super;
/// struct Sub {
///     base: Super,
/// }
/// impl_upcast!(Sub: base => Super);
///
/// let sup: Own<Super> = heap(Super);
/// let sub: Own<Sub> = sup.upcast();
/// ```
///
/// # Safety
///
/// Given a pointer to a live `Self`, `upcast_ptr` must return a pointer to a
/// valid `B` located inside that same object.
pub unsafe trait Upcast<B: ?Sized> {
    /// # Safety
    ///
    /// `this` must point to a live `Self`.
    unsafe fn upcast_ptr(this: NonNull<Self>) -> NonNull<B>;
}

unsafe impl<T: ?Sized> Upcast<T> for T {
    #[inline(always)]
    unsafe fn upcast_ptr(this: NonNull<T>) -> NonNull<T> {
        this
    }
}

/// Whether `Own<A>` converts to `Own<B>`.
///
/// The answer is decided by the type checker: this only compiles when the
/// conversion exists, so it can gate code in a `const` item.
///
/// ```
/// use tenure_core::{can_convert, impl_upcast};
///
/// struct Super;
/// struct Sub {
///     base: Super,
/// }
/// impl_upcast!(Sub: base => Super);
///
/// const _: () = assert!(can_convert::<Sub, Super>());
/// ```
pub const fn can_convert<A, B>() -> bool
where
    A: ?Sized + Upcast<B>,
    B: ?Sized,
{
    true
}

/// Implements [`Upcast`] for embedded bases or trait objects.
///
/// ```
/// use tenure_core::{heap, impl_upcast, Own};
///
/// trait Shape {
///     fn area(&self) -> u32;
/// }
///
/// #[repr(C)]
/// struct Tagged {
///     tag: u32,
/// }
///
/// #[repr(C)]
/// struct Square {
///     tagged: Tagged,
///     side: u32,
/// }
///
/// impl Shape for Square {
///     fn area(&self) -> u32 {
///         self.side * self.side
///     }
/// }
///
/// impl_upcast!(Square: tagged => Tagged);
/// impl_upcast!(Square as dyn Shape);
///
/// let shape: Own<dyn Shape> = heap(Square { tagged: Tagged { tag: 1 }, side: 3 }).upcast();
/// assert_eq!(shape.area(), 9);
/// ```
///
/// Embedded bases must be aligned inside the derived type, which rules out
/// packed layouts:
///
/// ```compile_fail
/// use tenure_core::impl_upcast;
///
/// struct Base {
///     id: u32,
/// }
///
/// #[repr(C, packed)]
/// struct Packed {
///     tag: u8,
///     base: Base,
/// }
///
/// impl_upcast!(Packed: base => Base);
/// ```
#[macro_export]
macro_rules! impl_upcast {
    ($derived:ty as $target:ty) => {
        unsafe impl $crate::Upcast<$target> for $derived {
            #[inline(always)]
            unsafe fn upcast_ptr(
                this: ::core::ptr::NonNull<Self>,
            ) -> ::core::ptr::NonNull<$target> {
                this
            }
        }
    };
    ($derived:ty : $($field:ident => $base:ty),+ $(,)?) => {
        $(
            const _: () = ::core::assert!(
                ::core::mem::align_of::<$derived>() >= ::core::mem::align_of::<$base>()
                    && ::core::mem::offset_of!($derived, $field)
                        % ::core::mem::align_of::<$base>()
                        == 0,
                "base field is not aligned for its type",
            );

            unsafe impl $crate::Upcast<$base> for $derived {
                #[inline(always)]
                unsafe fn upcast_ptr(
                    this: ::core::ptr::NonNull<Self>,
                ) -> ::core::ptr::NonNull<$base> {
                    unsafe {
                        ::core::ptr::NonNull::new_unchecked(::core::ptr::addr_of_mut!(
                            (*this.as_ptr()).$field
                        ))
                    }
                }
            }
        )+
    };
}
