use core::{any::type_name, marker::PhantomData, mem, ptr::NonNull};

use crate::{disposer::FnDisposer, heap::place, HeapDisposer, Own, RawParts};

/// Heap block owning a primary handle and whatever was attached to it.
///
/// Fields drop in declaration order: the primary goes first, then the
/// attachments in their own drop order (tuple and `Vec` elements front to
/// back).
struct Bundle<T: ?Sized, A> {
    primary: Own<T>,
    _attachments: A,
}

struct BundleDisposer<T: ?Sized, A>(PhantomData<fn(*const T, A)>);

impl<T: ?Sized, A> BundleDisposer<T, A> {
    const INSTANCE: &'static FnDisposer = &FnDisposer::new(
        HeapDisposer::<Bundle<T, A>>::dispose_raw,
        type_name::<Bundle<T, A>>,
    )
    .with_complete_object(Self::complete_object);

    unsafe fn complete_object(origin: NonNull<()>) -> NonNull<()> {
        let bundle = unsafe { origin.cast::<Bundle<T, A>>().as_ref() };
        bundle.primary.complete_object().unwrap_or(origin)
    }
}

impl<T: ?Sized> Own<T> {
    /// Ties `attachments` to the lifetime of this handle.
    ///
    /// The returned handle exposes the same object at the same address. When
    /// it is disposed, the primary object is destroyed first and the
    /// attachments after it; pass a tuple to attach several handles, which
    /// are then destroyed in tuple order. Attaching again to the result keeps
    /// earlier attachments ahead of later ones.
    ///
    /// Attaching a value that has nothing to drop, such as `()`, returns the
    /// handle unchanged. Attaching to an empty handle drops the attachments
    /// right away and returns an empty handle.
    ///
    /// ```
    /// use tenure_core::heap;
    ///
    /// let config = heap(String::from("config"));
    /// let log = heap(Vec::<String>::new());
    /// let service = heap(7u32).attach((config, log));
    /// assert_eq!(*service, 7);
    /// ```
    ///
    /// The returned handle does not carry the attachments' type, so they
    /// cannot borrow anything:
    ///
    /// ```compile_fail
    /// use tenure_core::{heap, Own};
    ///
    /// struct Peek<'a>(&'a [u64]);
    ///
    /// fn escape() -> Own<u8> {
    ///     let local = vec![7u64; 64];
    ///     heap(1u8).attach(heap(Peek(&local)))
    /// }
    /// ```
    pub fn attach<A: 'static>(self, attachments: A) -> Own<T> {
        if !mem::needs_drop::<A>() {
            return self;
        }

        let Some(raw) = Own::into_raw_parts(self) else {
            drop(attachments);
            return Own::null();
        };

        let ptr = raw.ptr;
        let bundle = Bundle {
            primary: unsafe { Own::from_raw(raw) },
            _attachments: attachments,
        };
        let origin = place(bundle);

        unsafe {
            Own::from_raw(RawParts {
                ptr,
                origin: origin.cast(),
                disposer: BundleDisposer::<T, A>::INSTANCE,
            })
        }
    }
}
