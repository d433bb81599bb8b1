//! Script-side value model and native call machinery.
//!
//! ## Key Types
//!
//! - [`Dynamic`]: Value exchanged with script code (primitives, handles, tables, functions)
//! - [`ScriptTable`]: Shared key/value table
//! - [`NativeFn`]: Type-erased callable wrapper
//! - [`CallContext`]: Bridge between script code and Rust for function calls
//! - [`Environment`]: Session operations reachable from native code

mod call_context;
mod dynamic;
mod environment;
mod native_fn;
mod table;

pub use call_context::CallContext;
pub use dynamic::Dynamic;
pub use environment::{Environment, call_method};
pub use native_fn::{NativeCallable, NativeFn};
pub use table::{ScriptTable, TableKey};
