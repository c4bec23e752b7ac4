use alloc::boxed::Box;
use core::{
    fmt,
    marker::PhantomData,
    mem::{self, ManuallyDrop},
    ops::{Deref, DerefMut},
    ptr::{self, NonNull},
};

use crate::{disposer::dispose_or_abort, Disposer, HeapDisposer, Upcast, Void};

/// The pieces of a non-empty [`Own`].
///
/// `ptr` is the view the handle exposes, `origin` the address `disposer` was
/// bound to: the complete object, or a block wrapping it. The two differ once
/// a handle has been narrowed to a base that does not sit at offset zero, or
/// had other handles attached.
pub struct RawParts<T: ?Sized> {
    pub ptr: NonNull<T>,
    pub origin: NonNull<()>,
    pub disposer: &'static dyn Disposer,
}

impl<T: ?Sized> Clone for RawParts<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for RawParts<T> {}

impl<T: ?Sized> fmt::Debug for RawParts<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawParts")
            .field("ptr", &self.ptr.cast::<()>())
            .field("origin", &self.origin)
            .field("disposer", &self.disposer.name())
            .finish()
    }
}

/// An exclusively owned object together with the disposer that destroys it.
///
/// A handle is either empty or owns exactly one object. It cannot be cloned;
/// every operation that hands ownership elsewhere consumes or empties the
/// source, so an object is disposed exactly once, when the last handle in a
/// chain of moves is dropped or cleared.
///
/// ```
/// use tenure_core::{heap, Own};
///
/// let mut a = heap(1u32);
/// let b = a.take();
/// assert!(a.is_null());
/// assert_eq!(*b, 1);
/// ```
pub struct Own<T: ?Sized> {
    raw: Option<RawParts<T>>,
    _p: PhantomData<T>,
}

impl<T: ?Sized> Own<T> {
    /// An empty handle.
    #[inline]
    pub const fn null() -> Self {
        Self {
            raw: None,
            _p: PhantomData,
        }
    }

    /// # Safety
    ///
    /// `ptr` must point to a live complete object that `disposer` knows how
    /// to destroy, and nothing else may dispose of it.
    #[inline]
    pub unsafe fn from_raw_parts(ptr: NonNull<T>, disposer: &'static dyn Disposer) -> Self {
        unsafe {
            Self::from_raw(RawParts {
                ptr,
                origin: ptr.cast(),
                disposer,
            })
        }
    }

    /// # Safety
    ///
    /// The parts must have come from [`Own::into_raw_parts`], or satisfy the
    /// same contract: `origin` is a live complete object destroyable by
    /// `disposer`, and `ptr` is a view into that object.
    #[inline]
    pub unsafe fn from_raw(raw: RawParts<T>) -> Self {
        Self {
            raw: Some(raw),
            _p: PhantomData,
        }
    }

    /// Releases ownership without disposing. Returns `None` for an empty handle.
    #[inline]
    pub fn into_raw_parts(this: Self) -> Option<RawParts<T>> {
        let mut this = ManuallyDrop::new(this);
        this.raw.take()
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.raw.is_none()
    }

    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.raw.as_ref().map(|raw| unsafe { raw.ptr.as_ref() })
    }

    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.raw.as_mut().map(|raw| unsafe { raw.ptr.as_mut() })
    }

    /// Address of the exposed view, or null. Does not affect ownership.
    #[inline]
    pub fn addr(&self) -> *const () {
        match &self.raw {
            Some(raw) => raw.ptr.cast::<()>().as_ptr(),
            None => ptr::null(),
        }
    }

    /// Address the disposer will receive, or null.
    #[inline]
    pub fn origin(this: &Self) -> *const () {
        match &this.raw {
            Some(raw) => raw.origin.as_ptr(),
            None => ptr::null(),
        }
    }

    #[inline]
    pub fn disposer(this: &Self) -> Option<&'static dyn Disposer> {
        this.raw.as_ref().map(|raw| raw.disposer)
    }

    /// Compares the exposed addresses of two handles.
    ///
    /// Equal addresses never mean shared ownership; at most one of two live
    /// non-empty handles can own a given object.
    #[inline]
    pub fn ptr_eq<U: ?Sized>(a: &Self, b: &Own<U>) -> bool {
        a.addr() == b.addr()
    }

    /// Moves ownership out, leaving this handle empty.
    #[inline]
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::null())
    }

    /// Disposes the owned object, if any. Clearing an empty handle does nothing.
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::null();
    }

    #[inline]
    pub fn into_option(self) -> Option<Self> {
        if self.is_null() {
            None
        } else {
            Some(self)
        }
    }

    /// Narrows the handle to a base view.
    ///
    /// Only compiles when `T: Upcast<B>`. The disposer and the complete-object
    /// address are carried over untouched, so the whole object is still
    /// destroyed when the returned handle goes away.
    pub fn upcast<B: ?Sized>(self) -> Own<B>
    where
        T: Upcast<B>,
    {
        match Own::into_raw_parts(self) {
            Some(raw) => unsafe {
                Own::from_raw(RawParts {
                    ptr: <T as Upcast<B>>::upcast_ptr(raw.ptr),
                    origin: raw.origin,
                    disposer: raw.disposer,
                })
            },
            None => Own::null(),
        }
    }

    /// Erases the static type.
    ///
    /// The erased handle points at the complete object, not at the view this
    /// handle exposed, and keeps the original disposer. Only types without
    /// borrows can be erased, since [`Void`] has no lifetime to keep them in:
    ///
    /// ```compile_fail
    /// use tenure_core::{heap, Own, Void};
    ///
    /// struct Peek<'a>(&'a [u64]);
    ///
    /// fn escape() -> Own<Void> {
    ///     let local = vec![7u64; 64];
    ///     heap(Peek(&local)).erase()
    /// }
    /// ```
    pub fn erase(self) -> Own<Void>
    where
        T: 'static,
    {
        match Own::into_raw_parts(self) {
            Some(raw) => unsafe {
                let object = raw.disposer.complete_object(raw.origin);
                Own::from_raw(RawParts {
                    ptr: object.cast(),
                    origin: raw.origin,
                    disposer: raw.disposer,
                })
            },
            None => Own::null(),
        }
    }

    pub(crate) fn complete_object(&self) -> Option<NonNull<()>> {
        self.raw
            .as_ref()
            .map(|raw| unsafe { raw.disposer.complete_object(raw.origin) })
    }
}

impl<T: ?Sized> Drop for Own<T> {
    fn drop(&mut self) {
        // Empty the handle first so a disposer that reaches back into it sees null.
        if let Some(raw) = self.raw.take() {
            unsafe { dispose_or_abort(raw.disposer, raw.origin) };
        }
    }
}

impl<T: ?Sized> Default for Own<T> {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

impl<T> From<Box<T>> for Own<T> {
    fn from(b: Box<T>) -> Self {
        let ptr = NonNull::from(Box::leak(b));
        unsafe { Own::from_raw_parts(ptr, HeapDisposer::<T>::INSTANCE) }
    }
}

impl<T: ?Sized> From<Option<Own<T>>> for Own<T> {
    #[inline]
    fn from(own: Option<Own<T>>) -> Self {
        own.unwrap_or_default()
    }
}

impl<T: ?Sized> Deref for Own<T> {
    type Target = T;

    #[inline]
    #[track_caller]
    fn deref(&self) -> &T {
        match &self.raw {
            Some(raw) => unsafe { raw.ptr.as_ref() },
            None => null_deref(),
        }
    }
}

impl<T: ?Sized> DerefMut for Own<T> {
    #[inline]
    #[track_caller]
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.raw {
            Some(raw) => unsafe { raw.ptr.as_mut() },
            None => null_deref(),
        }
    }
}

#[cold]
#[track_caller]
fn null_deref() -> ! {
    panic!("dereferenced an empty `Own`")
}

impl<T> fmt::Debug for Own<T>
where
    T: ?Sized + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(v) => f.debug_tuple("Own").field(&v).finish(),
            None => f.write_str("Own(null)"),
        }
    }
}

impl<T: ?Sized> fmt::Pointer for Own<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.addr(), f)
    }
}
