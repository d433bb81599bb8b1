//! Core types shared by the script bridge crates.
//!
//! - [`NativeAddr`] / [`ObjectKind`]: identity of host-owned objects
//! - [`ForeignHandle`] / [`ExtensionStore`]: the script-visible proxy and its fields
//! - [`Dynamic`], [`ScriptTable`], [`NativeFn`], [`CallContext`]: the value and
//!   call model spoken at the script boundary
//! - [`Host`] / [`TextBuffer`]: what the host application implements
//! - [`NativeError`] / [`ConversionError`]: errors raised into script code

pub mod convert;
pub mod error;
pub mod handle;
pub mod host;
pub mod ids;
pub mod runtime;

pub use convert::{FromDynamic, IntoDynamic};
pub use error::{ConversionError, NativeError};
pub use handle::{ExtensionStore, ForeignHandle};
pub use host::{Host, TextBuffer};
pub use ids::{NativeAddr, ObjectKind};
pub use runtime::{
    CallContext, Dynamic, Environment, NativeCallable, NativeFn, ScriptTable, TableKey,
    call_method,
};
