//! Single-owner handles with pluggable disposal.
//!
//! Everything in [`tenure_core`] is re-exported here, together with disposer
//! adapters for objects whose storage the handle does not own. Enable the
//! `tracing` feature for [`traced_heap`](trace::traced_heap) and friends.
#![cfg_attr(not(test), no_std)]

pub use tenure_core::*;
#[cfg(feature = "tracing")]
pub use tenure_tracing as trace;

pub use crate::{
    drop_only::DropOnly,
    leak::{unowned, Leak},
};

mod drop_only;
mod leak;
