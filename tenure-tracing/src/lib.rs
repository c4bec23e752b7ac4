use core::{any::type_name, fmt, marker::PhantomData, ptr::NonNull};

use tenure_core::{heap, Disposer, HeapDisposer, Own};
use tracing::{trace, trace_span};

/// Wraps another disposer, recording every disposal as a `dispose` span.
pub struct Traced {
    inner: &'static dyn Disposer,
}

impl Traced {
    pub const fn new(inner: &'static dyn Disposer) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &'static dyn Disposer {
        self.inner
    }
}

impl Disposer for Traced {
    unsafe fn dispose(&self, origin: NonNull<()>) {
        let _span = trace_span!("dispose", ty = self.inner.name(), origin = ?origin).entered();
        unsafe { self.inner.dispose(origin) };
        trace!("disposed");
    }

    #[inline]
    unsafe fn complete_object(&self, origin: NonNull<()>) -> NonNull<()> {
        unsafe { self.inner.complete_object(origin) }
    }

    #[inline]
    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

impl fmt::Debug for Traced {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traced")
            .field("inner", &self.inner.name())
            .finish()
    }
}

/// Per-type traced heap disposer, see [`traced_heap`].
pub struct TracedHeap<T>(PhantomData<fn(T)>);

impl<T> TracedHeap<T> {
    pub const INSTANCE: &'static Traced = &Traced::new(HeapDisposer::<T>::INSTANCE);
}

/// Like [`heap`], but the returned handle reports its disposal.
pub fn traced_heap<T>(value: T) -> Own<T> {
    trace!(ty = type_name::<T>(), "placing on heap");
    let Some(mut raw) = Own::into_raw_parts(heap(value)) else {
        return Own::null();
    };
    raw.disposer = TracedHeap::<T>::INSTANCE;
    unsafe { Own::from_raw(raw) }
}

/// Emits an event once everything owned by a handle has been disposed.
///
/// Works with any handle, whatever its disposer, by attaching a marker that
/// is dropped after the handle's own contents.
pub fn log_disposal<T: ?Sized>(own: Own<T>, label: &'static str) -> Own<T> {
    own.attach(DisposalMarker { label })
}

struct DisposalMarker {
    label: &'static str,
}

impl Drop for DisposalMarker {
    fn drop(&mut self) {
        trace!(label = self.label, "handle disposed");
    }
}
