//! Scripting session.
//!
//! A [`ScriptSession`] owns everything with session lifetime: the handle
//! registry, the per-kind dispatch tables and the global table. It is the
//! [`Environment`] native functions run in.
//!
//! # Re-entrancy
//!
//! All methods take `&self`. The registry sits in a `RefCell` that is only
//! borrowed for the duration of a single registry operation and never while
//! a script function runs, so a callback may freely re-enter the session
//! (through the host, e.g. a command that closes another window).
//!
//! # Example
//!
//! ```ignore
//! let session = Rc::new(ScriptSession::start(SessionConfig::from_env())?);
//!
//! // Host lifecycle points
//! session.notify_window_open(&mut host, win);
//! session.notify_document_close(&mut host, doc);
//!
//! // Script-level access
//! let files = session.call_method(&mut host, &session.namespace_value(), "files", &[])?;
//! ```

use std::cell::RefCell;

use tracing::info;

use scriptbridge_core::{
    Dynamic, Environment, ForeignHandle, Host, IntoDynamic, NativeAddr, NativeError, ObjectKind,
    ScriptTable, call_method,
};
use scriptbridge_registry::HandleRegistry;

use crate::config::SessionConfig;
use crate::dispatch::{self, TypeTables};
use crate::error::SessionError;
use crate::iter::Handles;
use crate::namespace::{self, EVENTS};

/// One scripting session of the host application.
///
/// Single-threaded: handles and tables are `Rc`-based, so a session is
/// neither `Send` nor `Sync`.
#[derive(Debug)]
pub struct ScriptSession {
    config: SessionConfig,
    registry: RefCell<HandleRegistry>,
    types: TypeTables,
    globals: ScriptTable,
    namespace: ScriptTable,
}

impl ScriptSession {
    /// Start a session: empty registry, dispatch tables, and the root table
    /// published under the configured namespace.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidNamespace`] if the namespace name is
    /// empty or not an identifier.
    pub fn start(config: SessionConfig) -> Result<Self, SessionError> {
        let name = config.namespace();
        if !is_identifier(name) {
            return Err(SessionError::InvalidNamespace(name.to_owned()));
        }

        let globals = ScriptTable::new();
        let namespace = namespace::install(&globals, name);
        info!(
            namespace = name,
            search_paths = config.search_paths().len(),
            "script session started"
        );

        Ok(Self {
            registry: RefCell::new(HandleRegistry::new()),
            types: TypeTables::new(),
            globals,
            namespace,
            config,
        })
    }

    /// End the session. Every outstanding handle becomes stale.
    pub fn quit(&self) {
        let live = self.registry.borrow().len();
        self.registry.borrow_mut().clear();
        info!(live_handles = live, "script session ended");
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The root table (`vis`).
    pub fn namespace(&self) -> &ScriptTable {
        &self.namespace
    }

    /// The root table as a value, for method calls on it.
    pub fn namespace_value(&self) -> Dynamic {
        Dynamic::Table(self.namespace.clone())
    }

    /// The current callback table, if scripts left one in place.
    pub fn events(&self) -> Option<ScriptTable> {
        match self.namespace.get(EVENTS) {
            Dynamic::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Shared default table of a handle kind.
    ///
    /// Functions stored here become methods of every handle of that kind.
    pub fn type_table(&self, kind: ObjectKind) -> &ScriptTable {
        self.types.for_kind(kind).defaults()
    }

    // =========================================================================
    // Handles
    // =========================================================================

    /// Check if `handle` still refers to a live native object.
    pub fn is_live(&self, handle: &ForeignHandle) -> bool {
        self.registry.borrow().is_live(handle)
    }

    /// Registered handle of an object, without creating one.
    pub fn lookup(&self, addr: NativeAddr, kind: ObjectKind) -> Option<ForeignHandle> {
        self.registry.borrow().lookup(addr, kind)
    }

    /// Number of live handles.
    pub fn live_handles(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Iterate the host's open documents, proxying each.
    pub fn documents<'a>(&'a self, host: &'a dyn Host) -> Handles<'a> {
        Handles::new(self, host, ObjectKind::Document)
    }

    /// Iterate the host's windows, proxying each.
    pub fn windows<'a>(&'a self, host: &'a dyn Host) -> Handles<'a> {
        Handles::new(self, host, ObjectKind::Window)
    }

    pub(crate) fn unregister(&self, addr: NativeAddr, kind: ObjectKind) -> Option<ForeignHandle> {
        self.registry.borrow_mut().unregister(addr, kind)
    }

    // =========================================================================
    // Script-level access
    // =========================================================================

    /// Read `target[key]`.
    pub fn get(
        &self,
        host: &dyn Host,
        target: &Dynamic,
        key: impl IntoDynamic,
    ) -> Result<Dynamic, NativeError> {
        self.index(host, target, &key.into_dynamic())
    }

    /// Write `target[key] = value`.
    pub fn set(
        &self,
        target: &Dynamic,
        key: impl IntoDynamic,
        value: impl IntoDynamic,
    ) -> Result<(), NativeError> {
        self.new_index(target, &key.into_dynamic(), value.into_dynamic())
    }

    /// Call a function value.
    pub fn call(
        &self,
        host: &mut dyn Host,
        func: &Dynamic,
        args: &[Dynamic],
    ) -> Result<Dynamic, NativeError> {
        match func {
            Dynamic::Function(f) => f.invoke(self, host, args),
            other => Err(NativeError::NotCallable {
                type_name: other.type_name(),
            }),
        }
    }

    /// Call `target:name(args...)`.
    pub fn call_method(
        &self,
        host: &mut dyn Host,
        target: &Dynamic,
        name: &str,
        args: &[Dynamic],
    ) -> Result<Dynamic, NativeError> {
        call_method(self, host, target, name, args)
    }

    /// `vis.command(text)` from the host side.
    pub fn run_command(&self, host: &mut dyn Host, text: &str) -> Result<bool, NativeError> {
        let ok = self.call_method(
            host,
            &self.namespace_value(),
            "command",
            &[text.into_dynamic()],
        )?;
        Ok(ok.is_truthy())
    }

    /// `vis.info(text)` from the host side.
    pub fn show_info(&self, host: &mut dyn Host, text: &str) -> Result<(), NativeError> {
        self.call_method(host, &self.namespace_value(), "info", &[text.into_dynamic()])?;
        Ok(())
    }
}

impl Environment for ScriptSession {
    fn globals(&self) -> &ScriptTable {
        &self.globals
    }

    fn proxy(&self, addr: NativeAddr, kind: ObjectKind) -> Option<ForeignHandle> {
        self.registry.borrow_mut().proxy(addr, kind)
    }

    fn resolve(&self, handle: &ForeignHandle) -> Option<NativeAddr> {
        self.is_live(handle).then(|| handle.addr())
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    fn index(
        &self,
        host: &dyn Host,
        target: &Dynamic,
        key: &Dynamic,
    ) -> Result<Dynamic, NativeError> {
        match target {
            Dynamic::Table(table) => Ok(table.raw_get(key)),
            Dynamic::Handle(handle) => Ok(dispatch::get(
                self,
                host,
                self.types.for_kind(handle.kind()),
                handle,
                key,
            )),
            other => Err(NativeError::NotIndexable {
                type_name: other.type_name(),
            }),
        }
    }

    fn new_index(
        &self,
        target: &Dynamic,
        key: &Dynamic,
        value: Dynamic,
    ) -> Result<(), NativeError> {
        match target {
            Dynamic::Table(table) => table.raw_set(key, value),
            Dynamic::Handle(handle) => dispatch::set(self, handle, key, value),
            other => Err(NativeError::NotIndexable {
                type_name: other.type_name(),
            }),
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
