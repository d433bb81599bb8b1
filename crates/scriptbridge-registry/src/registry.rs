//! HandleRegistry - the identity-preserving proxy cache.
//!
//! This module provides [`HandleRegistry`], the single source of truth for
//! "does a live script handle exist for this native object". Every place that
//! exposes a native object to script code goes through
//! [`get_or_create`](HandleRegistry::get_or_create), which is what keeps the
//! one-handle-per-object invariant.
//!
//! # Lifetime Model
//!
//! Entries are added lazily, the first time a native object is proxied, and
//! removed explicitly when the host reports the object's destruction. Nothing
//! is garbage collected: if the host forgets to report a close, the entry
//! stays. A handle whose entry has been removed is *stale*; dispatch code
//! asks [`is_live`](HandleRegistry::is_live) before touching the host.
//!
//! # Re-entrancy
//!
//! `register` never overwrites and `unregister` of an absent entry is a
//! no-op. Nested lifecycle notifications (a close callback that closes
//! another object) therefore cannot corrupt the table, whatever order the
//! calls arrive in.
//!
//! # Example
//!
//! ```
//! use scriptbridge_core::{NativeAddr, ObjectKind};
//! use scriptbridge_registry::HandleRegistry;
//!
//! let mut registry = HandleRegistry::new();
//! let doc = NativeAddr::new(0x1);
//!
//! let a = registry.proxy(doc, ObjectKind::Document).unwrap();
//! let b = registry.proxy(doc, ObjectKind::Document).unwrap();
//! assert!(a.ptr_eq(&b));
//!
//! registry.unregister(doc, ObjectKind::Document);
//! assert!(!registry.is_live(&a));
//! ```

use rustc_hash::FxHashMap;
use tracing::debug;

use scriptbridge_core::{ForeignHandle, NativeAddr, ObjectKind};

/// Session-wide map from native object to its unique script handle.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    handles: FxHashMap<(NativeAddr, ObjectKind), ForeignHandle>,
}

impl HandleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the registered handle for an object, if any.
    pub fn lookup(&self, addr: NativeAddr, kind: ObjectKind) -> Option<ForeignHandle> {
        self.handles.get(&(addr, kind)).cloned()
    }

    /// Register a handle under its own address and kind.
    ///
    /// If an entry already exists it is kept and returned; the given handle
    /// is then simply not registered.
    pub fn register(&mut self, handle: ForeignHandle) -> ForeignHandle {
        let key = (handle.addr(), handle.kind());
        self.handles
            .entry(key)
            .or_insert_with(|| {
                debug!(addr = %key.0, kind = %key.1, "handle registered");
                handle
            })
            .clone()
    }

    /// Remove the entry for an object.
    ///
    /// Returns the removed handle with its extension store emptied; removing
    /// an absent entry is a no-op.
    pub fn unregister(&mut self, addr: NativeAddr, kind: ObjectKind) -> Option<ForeignHandle> {
        let removed = self.handles.remove(&(addr, kind))?;
        debug!(addr = %addr, kind = %kind, "handle unregistered");
        removed.extensions().table().clear();
        Some(removed)
    }

    /// Return the handle for an object, creating it on a miss.
    ///
    /// A new handle is always built for exactly `(addr, kind)` with an empty
    /// extension store; `init` may then populate it before it is registered.
    /// The null address never gets a handle: `init` is not called and `None`
    /// is returned. This is what lets "window has no document" reach script
    /// code as `nil`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn get_or_create<F>(
        &mut self,
        addr: NativeAddr,
        kind: ObjectKind,
        init: F,
    ) -> Option<ForeignHandle>
    where
        F: FnOnce(&ForeignHandle),
    {
        let addr = addr.non_null()?;
        if let Some(existing) = self.lookup(addr, kind) {
            return Some(existing);
        }
        let handle = ForeignHandle::new(addr, kind);
        init(&handle);
        debug!(addr = %addr, kind = %kind, "handle registered");
        self.handles.insert((addr, kind), handle.clone());
        Some(handle)
    }

    /// [`get_or_create`](Self::get_or_create) with nothing to initialize.
    pub fn proxy(&mut self, addr: NativeAddr, kind: ObjectKind) -> Option<ForeignHandle> {
        self.get_or_create(addr, kind, |_| {})
    }

    /// Check if `handle` is the live handle for its object.
    ///
    /// Compares identity, not just the address: once a handle has been
    /// unregistered it stays stale even if the host reuses the address for a
    /// new object that later gets its own handle.
    pub fn is_live(&self, handle: &ForeignHandle) -> bool {
        self.handles
            .get(&(handle.addr(), handle.kind()))
            .is_some_and(|current| current.ptr_eq(handle))
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Check if no handles are live.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Iterate live handles in no particular order.
    pub fn handles(&self) -> impl Iterator<Item = &ForeignHandle> {
        self.handles.values()
    }

    /// Drop every entry, making all outstanding handles stale.
    pub fn clear(&mut self) {
        if !self.handles.is_empty() {
            debug!(count = self.handles.len(), "registry cleared");
        }
        for (_, handle) in self.handles.drain() {
            handle.extensions().table().clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::{Rc, Weak};

    use scriptbridge_core::{CallContext, Dynamic, NativeError, NativeFn};

    use super::*;

    const DOC: NativeAddr = NativeAddr::new(0x10);
    const WIN: NativeAddr = NativeAddr::new(0x20);

    #[test]
    fn get_or_create_is_identity_preserving() {
        let mut registry = HandleRegistry::new();
        let a = registry.proxy(DOC, ObjectKind::Document).unwrap();
        let b = registry.proxy(DOC, ObjectKind::Document).unwrap();
        assert!(a.ptr_eq(&b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn get_or_create_initializes_once() {
        let mut registry = HandleRegistry::new();
        let calls = Cell::new(0);
        let init = |_: &ForeignHandle| calls.set(calls.get() + 1);
        registry.get_or_create(DOC, ObjectKind::Document, init);
        registry.get_or_create(DOC, ObjectKind::Document, init);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn null_address_never_creates() {
        let mut registry = HandleRegistry::new();
        let called = Cell::new(false);
        let handle = registry.get_or_create(NativeAddr::NULL, ObjectKind::Window, |_| {
            called.set(true);
        });
        assert!(handle.is_none());
        assert!(!called.get());
        assert!(registry.is_empty());
    }

    #[test]
    fn created_handle_matches_requested_object() {
        let mut registry = HandleRegistry::new();
        let handle = registry
            .get_or_create(DOC, ObjectKind::Document, |h| {
                assert_eq!(h.addr(), DOC);
                assert_eq!(h.kind(), ObjectKind::Document);
            })
            .unwrap();

        assert_eq!(handle.addr(), DOC);
        assert_eq!(handle.kind(), ObjectKind::Document);
        assert!(registry.lookup(DOC, ObjectKind::Document).unwrap().ptr_eq(&handle));
        assert!(registry.lookup(WIN, ObjectKind::Window).is_none());
    }

    #[test]
    fn created_handle_starts_with_empty_store() {
        let mut registry = HandleRegistry::new();
        let old = registry.proxy(DOC, ObjectKind::Document).unwrap();
        old.extensions().set("tag".into(), Dynamic::Bool(true));
        registry.unregister(DOC, ObjectKind::Document);

        let fresh = registry
            .get_or_create(DOC, ObjectKind::Document, |h| {
                assert!(h.extensions().is_empty());
                h.extensions().set("ready".into(), Dynamic::Bool(true));
            })
            .unwrap();
        assert!(!fresh.ptr_eq(&old));
        assert_eq!(fresh.extensions().len(), 1);
        assert!(fresh.extensions().get(&"tag".into()).is_nil());
    }

    #[test]
    fn kinds_are_separate_namespaces() {
        let mut registry = HandleRegistry::new();
        let doc = registry.proxy(DOC, ObjectKind::Document).unwrap();
        let win = registry.proxy(DOC, ObjectKind::Window).unwrap();
        assert!(!doc.ptr_eq(&win));
        assert_eq!(registry.len(), 2);

        registry.unregister(DOC, ObjectKind::Window);
        assert!(registry.is_live(&doc));
        assert!(!registry.is_live(&win));
    }

    #[test]
    fn register_does_not_overwrite() {
        let mut registry = HandleRegistry::new();
        let first = registry.register(ForeignHandle::new(WIN, ObjectKind::Window));
        let second = ForeignHandle::new(WIN, ObjectKind::Window);
        let kept = registry.register(second.clone());

        assert!(kept.ptr_eq(&first));
        assert!(!registry.is_live(&second));
    }

    #[test]
    fn unregister_is_idempotent() {
        let mut registry = HandleRegistry::new();
        registry.proxy(WIN, ObjectKind::Window);
        assert!(registry.unregister(WIN, ObjectKind::Window).is_some());
        assert!(registry.unregister(WIN, ObjectKind::Window).is_none());
        assert!(registry.lookup(WIN, ObjectKind::Window).is_none());
    }

    #[test]
    fn new_handle_after_unregister() {
        let mut registry = HandleRegistry::new();
        let old = registry.proxy(DOC, ObjectKind::Document).unwrap();
        old.extensions().set("seen".into(), Dynamic::Bool(true));

        registry.unregister(DOC, ObjectKind::Document);
        let new = registry.proxy(DOC, ObjectKind::Document).unwrap();

        assert!(!new.ptr_eq(&old));
        assert!(new.extensions().is_empty());
        assert!(registry.is_live(&new));
        assert!(!registry.is_live(&old));
    }

    #[test]
    fn clear_makes_everything_stale() {
        let mut registry = HandleRegistry::new();
        let doc = registry.proxy(DOC, ObjectKind::Document).unwrap();
        let win = registry.proxy(WIN, ObjectKind::Window).unwrap();
        assert_eq!(registry.handles().count(), 2);

        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.is_live(&doc));
        assert!(!registry.is_live(&win));
    }

    #[test]
    fn unregister_empties_the_extension_store() {
        let mut registry = HandleRegistry::new();
        let handle = registry.proxy(DOC, ObjectKind::Document).unwrap();
        handle.extensions().set("self".into(), Dynamic::Handle(handle.clone()));
        handle.extensions().set("n".into(), Dynamic::Int(1));

        let removed = registry.unregister(DOC, ObjectKind::Document).unwrap();
        assert!(removed.ptr_eq(&handle));
        assert!(handle.extensions().is_empty());
    }

    #[test]
    fn self_referencing_handle_is_freed_after_unregister() {
        let mut registry = HandleRegistry::new();
        let marker = Rc::new(());
        let weak: Weak<()> = Rc::downgrade(&marker);

        let handle = registry.proxy(WIN, ObjectKind::Window).unwrap();
        handle.extensions().set("self".into(), Dynamic::Handle(handle.clone()));
        let owned = NativeFn::new("owner", move |_: &mut CallContext| -> Result<(), NativeError> {
            drop(Rc::clone(&marker));
            Ok(())
        });
        handle.extensions().set("owner".into(), Dynamic::Function(owned));
        drop(handle);
        assert!(weak.upgrade().is_some());

        registry.unregister(WIN, ObjectKind::Window);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn clear_empties_every_extension_store() {
        let mut registry = HandleRegistry::new();
        let doc = registry.proxy(DOC, ObjectKind::Document).unwrap();
        doc.extensions().set("self".into(), Dynamic::Handle(doc.clone()));

        registry.clear();
        assert!(doc.extensions().is_empty());
    }
}
