//! Scripting bridge between an editor and its extension layer.
//!
//! The editor owns documents and windows. Script code sees them through
//! [`ForeignHandle`]s that are unique per object and go stale, rather than
//! dangling, once the editor reports the object closed.
//!
//! - [`ScriptSession`]: registry, dispatch tables and the `vis` root table
//! - [`SessionConfig`]: module search path and naming
//! - [`events`]: `notify_*` entry points for the host's lifecycle points
//! - [`iter`]: lazy traversal of documents, windows and lines
//!
//! # Example
//!
//! ```ignore
//! use scriptbridge::prelude::*;
//!
//! let session = ScriptSession::start(SessionConfig::from_env())?;
//! session.notify_window_open(&mut editor, win);
//!
//! for doc in session.documents(&editor) {
//!     let name = session.get(&editor, &Dynamic::Handle(doc), "name")?;
//! }
//! ```

pub mod config;
mod dispatch;
pub mod error;
pub mod events;
pub mod iter;
mod namespace;
mod session;

pub use config::SessionConfig;
pub use error::SessionError;
pub use iter::{CollectionCursor, Handles, LinesCursor};
pub use namespace::EVENTS;
pub use session::ScriptSession;

pub use scriptbridge_core::{
    CallContext, ConversionError, Dynamic, Environment, ExtensionStore, ForeignHandle,
    FromDynamic, Host, IntoDynamic, NativeAddr, NativeCallable, NativeError, NativeFn,
    ObjectKind, ScriptTable, TableKey, TextBuffer,
};
pub use scriptbridge_registry::HandleRegistry;

pub mod prelude {
    pub use crate::config::SessionConfig;
    pub use crate::error::SessionError;
    pub use crate::session::ScriptSession;
    pub use scriptbridge_core::{
        CallContext, Dynamic, Environment, ForeignHandle, Host, NativeAddr, NativeError, NativeFn,
        ObjectKind, ScriptTable, TextBuffer,
    };
}
