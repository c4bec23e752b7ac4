use core::{any::type_name, marker::PhantomData, ptr::NonNull};

use crate::{FnDisposer, Own};

/// Disposer that runs `T`'s destructor but leaves its storage alone.
///
/// For objects placed in memory the handle does not own: arenas, pools, or
/// slots managed by the caller.
///
/// ```
/// use core::ptr::NonNull;
/// use tenure::DropOnly;
///
/// let arena = bumpalo::Bump::new();
/// let slot = arena.alloc(String::from("in arena"));
/// let own = unsafe { DropOnly::own(NonNull::from(slot)) };
/// assert_eq!(own.as_str(), "in arena");
/// ```
pub struct DropOnly<T>(PhantomData<fn(T)>);

impl<T> DropOnly<T> {
    pub const INSTANCE: &'static FnDisposer = &FnDisposer::new(Self::dispose, type_name::<T>);

    unsafe fn dispose(origin: NonNull<()>) {
        unsafe { origin.cast::<T>().as_ptr().drop_in_place() };
    }

    /// # Safety
    ///
    /// `ptr` must point to a live `T` that nothing else drops, in storage that
    /// stays valid for as long as the returned handle exists.
    pub unsafe fn own(ptr: NonNull<T>) -> Own<T> {
        unsafe { Own::from_raw_parts(ptr, Self::INSTANCE) }
    }
}
