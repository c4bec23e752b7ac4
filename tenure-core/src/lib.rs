//! Exclusive-ownership handles with pluggable disposal.
//!
//! [`Own<T>`] pairs a pointer with a [`Disposer`] bound to the concrete type
//! that was originally allocated. Handles can be narrowed to a base view with
//! [`Own::upcast`], erased to [`Own<Void>`](Void) with [`Own::erase`], or
//! bundled with other owned values through [`Own::attach`]. Whatever the view,
//! disposal always targets the complete object with its original disposer.
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub use crate::{
    disposer::{Disposer, FnDisposer, HeapDisposer},
    heap::{heap, try_heap, TryHeapError},
    own::{Own, RawParts},
    upcast::{can_convert, Upcast},
    void::Void,
};

mod attach;
mod disposer;
mod heap;
mod own;
mod upcast;
mod void;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("memory allocation failed")]
pub struct AllocError;
