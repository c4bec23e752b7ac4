use core::ptr::NonNull;

use crate::{Disposer, Own};

/// A disposer that never destroys anything.
///
/// Handles built on it satisfy APIs that want an [`Own`] for objects owned
/// elsewhere, typically statics.
#[derive(Debug, Default, Clone, Copy)]
pub struct Leak;

impl Leak {
    pub const INSTANCE: &'static Leak = &Leak;
}

impl Disposer for Leak {
    #[inline]
    unsafe fn dispose(&self, _origin: NonNull<()>) {}

    fn name(&self) -> &'static str {
        "Leak"
    }
}

/// Wraps a `'static` exclusive reference in a handle that never disposes it.
pub fn unowned<T: ?Sized>(value: &'static mut T) -> Own<T> {
    unsafe { Own::from_raw_parts(NonNull::from(value), Leak::INSTANCE) }
}
