use alloc::alloc::{alloc, handle_alloc_error};
use core::{alloc::Layout, fmt, ptr::NonNull};

use crate::{AllocError, HeapDisposer, Own};

/// Returned by [`try_heap`] when the global allocator fails. Carries the value
/// that could not be placed.
pub struct TryHeapError<T>(pub T);

impl<T> TryHeapError<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for TryHeapError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TryHeapError").finish_non_exhaustive()
    }
}

impl<T> fmt::Display for TryHeapError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to allocate {} bytes", Layout::new::<T>().size())
    }
}

impl<T> core::error::Error for TryHeapError<T> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&AllocError)
    }
}

/// Moves `value` to the global heap and returns its owning handle.
///
/// Aborts through [`handle_alloc_error`] if the allocator fails.
///
/// ```
/// let own = tenure_core::heap(String::from("owned"));
/// assert_eq!(own.as_str(), "owned");
/// ```
pub fn heap<T>(value: T) -> Own<T> {
    match try_heap(value) {
        Ok(own) => own,
        Err(_) => handle_alloc_error(Layout::new::<T>()),
    }
}

/// Moves `value` to the global heap, handing it back on allocation failure.
pub fn try_heap<T>(value: T) -> Result<Own<T>, TryHeapError<T>> {
    let ptr = match allocate::<T>() {
        Ok(ptr) => ptr,
        Err(AllocError) => return Err(TryHeapError(value)),
    };

    unsafe {
        ptr.as_ptr().write(value);
        Ok(Own::from_raw_parts(ptr, HeapDisposer::<T>::INSTANCE))
    }
}

/// Moves `value` to the heap for storage released by [`HeapDisposer<T>`].
pub(crate) fn place<T>(value: T) -> NonNull<T> {
    match allocate::<T>() {
        Ok(ptr) => {
            unsafe { ptr.as_ptr().write(value) };
            ptr
        }
        Err(AllocError) => handle_alloc_error(Layout::new::<T>()),
    }
}

/// Storage for one `T`, released by [`HeapDisposer<T>`]. Zero-sized types get
/// a dangling pointer and are never deallocated.
fn allocate<T>() -> Result<NonNull<T>, AllocError> {
    let layout = Layout::new::<T>();
    if layout.size() == 0 {
        return Ok(NonNull::dangling());
    }

    let ptr = unsafe { alloc(layout) };
    NonNull::new(ptr.cast()).ok_or(AllocError)
}
