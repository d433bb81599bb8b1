//! Script bridge registry crate.
//!
//! Holds the [`HandleRegistry`], which maps each native object to its single
//! script-visible handle and decides whether a handle is still live.

mod registry;

pub use registry::HandleRegistry;
