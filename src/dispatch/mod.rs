//! Attribute dispatch for foreign handles.
//!
//! Every handle kind has a [`KindTable`]: a fixed list of native-backed
//! attributes, each derived freshly from the host on every read, and a
//! shared default table holding the kind's methods. Reads consult them in
//! that order and fall back to the handle's own extension store. Writes
//! always land in the extension store, so a script can never shadow a
//! native attribute.
//!
//! ```text
//! get(handle, key)
//!   stale?               -> nil
//!   native attribute?    -> getter(host, addr)
//!   shared default?      -> method
//!   extension store      -> value or nil
//! ```

mod document;
mod window;

use std::fmt;

use scriptbridge_core::{
    Dynamic, Environment, ForeignHandle, Host, NativeAddr, NativeError, ObjectKind, ScriptTable,
    TableKey,
};

/// Accessor for a native-backed attribute of a live object.
pub(crate) type Getter = fn(&dyn Environment, &dyn Host, NativeAddr) -> Dynamic;

/// Dispatch table for one handle kind.
pub(crate) struct KindTable {
    attributes: &'static [(&'static str, Getter)],
    defaults: ScriptTable,
}

impl KindTable {
    fn new(attributes: &'static [(&'static str, Getter)], defaults: ScriptTable) -> Self {
        Self {
            attributes,
            defaults,
        }
    }

    /// Native-backed attribute named `key`, if any.
    fn attribute(&self, key: &Dynamic) -> Option<Getter> {
        let name = key.as_str()?;
        self.attributes
            .iter()
            .find(|(attr, _)| *attr == name)
            .map(|(_, getter)| *getter)
    }

    /// Names of the native-backed attributes.
    pub(crate) fn attribute_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes.iter().map(|(name, _)| *name)
    }

    /// Shared default table (methods).
    pub(crate) fn defaults(&self) -> &ScriptTable {
        &self.defaults
    }
}

impl fmt::Debug for KindTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindTable")
            .field("attributes", &self.attribute_names().collect::<Vec<_>>())
            .field("defaults", &self.defaults)
            .finish()
    }
}

/// Dispatch tables for every handle kind.
#[derive(Debug)]
pub(crate) struct TypeTables {
    document: KindTable,
    window: KindTable,
}

impl TypeTables {
    pub(crate) fn new() -> Self {
        Self {
            document: KindTable::new(document::ATTRIBUTES, document::methods()),
            window: KindTable::new(window::ATTRIBUTES, window::methods()),
        }
    }

    pub(crate) fn for_kind(&self, kind: ObjectKind) -> &KindTable {
        match kind {
            ObjectKind::Document => &self.document,
            ObjectKind::Window => &self.window,
        }
    }
}

/// Read `handle[key]`.
pub(crate) fn get(
    env: &dyn Environment,
    host: &dyn Host,
    table: &KindTable,
    handle: &ForeignHandle,
    key: &Dynamic,
) -> Dynamic {
    let Some(addr) = env.resolve(handle) else {
        return Dynamic::Nil;
    };
    if let Some(getter) = table.attribute(key) {
        return getter(env, host, addr);
    }
    match table.defaults.raw_get(key) {
        Dynamic::Nil => handle.extensions().table().raw_get(key),
        method => method,
    }
}

/// Write `handle[key] = value`.
///
/// Stale handles swallow the write. Otherwise the value goes to the
/// extension store, even when `key` names a native attribute.
pub(crate) fn set(
    env: &dyn Environment,
    handle: &ForeignHandle,
    key: &Dynamic,
    value: Dynamic,
) -> Result<(), NativeError> {
    if env.resolve(handle).is_none() {
        return Ok(());
    }
    let key = TableKey::from_dynamic(key)?;
    handle.extensions().set(key, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_table_layout() {
        let tables = TypeTables::new();
        let doc = tables.for_kind(ObjectKind::Document);
        assert_eq!(doc.attribute_names().collect::<Vec<_>>(), vec!["name"]);
        for method in ["insert", "delete", "lines"] {
            assert!(doc.defaults().get(method).as_function().is_some(), "{method}");
        }
    }

    #[test]
    fn window_table_layout() {
        let tables = TypeTables::new();
        let win = tables.for_kind(ObjectKind::Window);
        assert_eq!(win.attribute_names().collect::<Vec<_>>(), vec!["file"]);
        assert!(win.defaults().is_empty());
    }

    #[test]
    fn attribute_lookup_needs_string_key() {
        let tables = TypeTables::new();
        let doc = tables.for_kind(ObjectKind::Document);
        assert!(doc.attribute(&Dynamic::String("name".into())).is_some());
        assert!(doc.attribute(&Dynamic::String("file".into())).is_none());
        assert!(doc.attribute(&Dynamic::Int(1)).is_none());
    }
}
