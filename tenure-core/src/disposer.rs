use alloc::alloc::dealloc;
use core::{alloc::Layout, any::type_name, fmt, marker::PhantomData, mem, ptr::NonNull};

/// Destroys complete objects of one concrete type.
///
/// A disposer is bound to a type when a handle is created and is referenced,
/// never owned, by every handle derived from it. It always receives the
/// address it was bound to, no matter which view of the object the handle
/// currently exposes.
pub trait Disposer {
    /// Destroys the object at `origin` and releases its storage.
    ///
    /// # Safety
    /// - `origin` must be the address this disposer was bound to when the
    ///   owning handle was created.
    /// - The object must be live and must not be used afterwards.
    unsafe fn dispose(&self, origin: NonNull<()>);

    /// Address of the complete object behind `origin`.
    ///
    /// This is `origin` itself unless the disposer owns a wrapper around the
    /// object, as attach bundles do.
    ///
    /// # Safety
    /// `origin` must be a live object this disposer was bound to.
    unsafe fn complete_object(&self, origin: NonNull<()>) -> NonNull<()> {
        origin
    }

    /// Name of the type this disposer destroys, for diagnostics.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// A disposer backed by a plain function pointer.
///
/// `FnDisposer` is not generic, so a `&'static FnDisposer` can be produced
/// for any target type through an associated const, including types that are
/// not `'static` themselves.
#[derive(Clone, Copy)]
pub struct FnDisposer {
    dispose: unsafe fn(NonNull<()>),
    complete_object: unsafe fn(NonNull<()>) -> NonNull<()>,
    name: fn() -> &'static str,
}

impl FnDisposer {
    pub const fn new(dispose: unsafe fn(NonNull<()>), name: fn() -> &'static str) -> Self {
        Self {
            dispose,
            complete_object: identity,
            name,
        }
    }

    /// Replaces the identity mapping used by [`Disposer::complete_object`].
    pub const fn with_complete_object(
        self,
        complete_object: unsafe fn(NonNull<()>) -> NonNull<()>,
    ) -> Self {
        Self {
            complete_object,
            ..self
        }
    }
}

unsafe fn identity(origin: NonNull<()>) -> NonNull<()> {
    origin
}

impl Disposer for FnDisposer {
    #[inline]
    unsafe fn dispose(&self, origin: NonNull<()>) {
        unsafe { (self.dispose)(origin) }
    }

    #[inline]
    unsafe fn complete_object(&self, origin: NonNull<()>) -> NonNull<()> {
        unsafe { (self.complete_object)(origin) }
    }

    fn name(&self) -> &'static str {
        (self.name)()
    }
}

impl fmt::Debug for FnDisposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnDisposer").field(&(self.name)()).finish()
    }
}

/// The disposer for values placed on the global heap by [`heap`](crate::heap).
///
/// Never instantiated; the per-type singleton is [`HeapDisposer::INSTANCE`].
pub struct HeapDisposer<T>(PhantomData<fn(T)>);

impl<T> HeapDisposer<T> {
    pub const INSTANCE: &'static FnDisposer =
        &FnDisposer::new(Self::dispose_raw, type_name::<T>);

    pub(crate) unsafe fn dispose_raw(origin: NonNull<()>) {
        let ptr = origin.cast::<T>();
        unsafe { ptr.as_ptr().drop_in_place() };

        let layout = Layout::new::<T>();
        if layout.size() != 0 {
            unsafe { dealloc(ptr.as_ptr().cast(), layout) };
        }
    }
}

/// Runs `disposer` on `origin`, aborting the process if it unwinds.
///
/// # Safety
/// Same contract as [`Disposer::dispose`].
pub(crate) unsafe fn dispose_or_abort(disposer: &dyn Disposer, origin: NonNull<()>) {
    let guard = AbortOnUnwind {
        name: disposer.name(),
    };
    unsafe { disposer.dispose(origin) };
    mem::forget(guard);
}

/// Only dropped when a disposer unwinds. Panicking again during unwinding aborts.
struct AbortOnUnwind {
    name: &'static str,
}

impl Drop for AbortOnUnwind {
    fn drop(&mut self) {
        panic!("disposer for `{}` panicked; aborting", self.name);
    }
}
