//! Script-visible proxies for native objects.

use std::fmt;
use std::rc::Rc;

use crate::ids::{NativeAddr, ObjectKind};
use crate::runtime::{Dynamic, ScriptTable, TableKey};

/// Per-handle table of script-defined fields.
///
/// Created empty together with its handle and dropped with it. Entries here
/// never shadow native-backed attributes on read.
#[derive(Debug, Clone, Default)]
pub struct ExtensionStore {
    table: ScriptTable,
}

impl ExtensionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a field, `nil` if unset.
    pub fn get(&self, key: &TableKey) -> Dynamic {
        self.table.get_key(key)
    }

    /// Write a field; `nil` removes it.
    pub fn set(&self, key: TableKey, value: Dynamic) {
        self.table.set_key(key, value);
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if no fields are set.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The backing table.
    pub fn table(&self) -> &ScriptTable {
        &self.table
    }
}

struct HandleInner {
    addr: NativeAddr,
    kind: ObjectKind,
    extensions: ExtensionStore,
}

/// Script-visible handle wrapping exactly one native object's address.
///
/// Cloning shares the handle; [`ptr_eq`](Self::ptr_eq) is the identity the
/// registry guarantees: two handles for the same live `(addr, kind)` are
/// always the same handle.
///
/// A handle alone says nothing about whether its object still exists. Only
/// the registry can tell, and every dispatch operation asks it.
#[derive(Clone)]
pub struct ForeignHandle(Rc<HandleInner>);

impl ForeignHandle {
    /// Create a new handle with an empty extension store.
    ///
    /// Handles are normally created through the registry's
    /// `get_or_create`, which keeps them unique per address.
    pub fn new(addr: NativeAddr, kind: ObjectKind) -> Self {
        Self(Rc::new(HandleInner {
            addr,
            kind,
            extensions: ExtensionStore::new(),
        }))
    }

    /// The wrapped address. Never dereferenced by the bridge.
    pub fn addr(&self) -> NativeAddr {
        self.0.addr
    }

    /// The native kind.
    pub fn kind(&self) -> ObjectKind {
        self.0.kind
    }

    /// Script-defined fields of this handle.
    pub fn extensions(&self) -> &ExtensionStore {
        &self.0.extensions
    }

    /// Check if two values are the same handle.
    pub fn ptr_eq(&self, other: &ForeignHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ForeignHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignHandle")
            .field("addr", &self.0.addr)
            .field("kind", &self.0.kind)
            .field("extensions", &self.0.extensions.len())
            .finish()
    }
}
