//! Lazy traversal of native collections.
//!
//! The host keeps open documents and windows in singly-linked lists. A
//! [`CollectionCursor`] walks such a list one link at a time, remembering
//! only the address of the next element, and proxies each element as it is
//! reached. Nothing is snapshotted: removing elements while a traversal is
//! in progress is the caller's problem, exactly as it is for the host.
//!
//! [`LinesCursor`] does the same for the lines of one document, re-checking
//! the document's handle on every step.

use std::cell::{Cell, RefCell};

use tracing::trace;

use scriptbridge_core::{
    CallContext, Environment, ForeignHandle, Host, NativeAddr, NativeError, NativeFn, ObjectKind,
};

/// Position in a native linked collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionCursor {
    kind: ObjectKind,
    next: NativeAddr,
}

impl CollectionCursor {
    /// Start a traversal at the current head of the `kind` collection.
    pub fn begin(host: &dyn Host, kind: ObjectKind) -> Self {
        let next = match kind {
            ObjectKind::Document => host.first_document(),
            ObjectKind::Window => host.first_window(),
        };
        Self { kind, next }
    }

    /// Yield the next element's handle, or `None` at the end of the list.
    ///
    /// The link to the following element is read before the handle is
    /// returned, so the caller may close the yielded object without
    /// breaking the traversal.
    pub fn advance(&mut self, env: &dyn Environment, host: &dyn Host) -> Option<ForeignHandle> {
        let addr = self.next.non_null()?;
        self.next = match self.kind {
            ObjectKind::Document => host.next_document(addr),
            ObjectKind::Window => host.next_window(addr),
        };
        trace!(addr = %addr, kind = %self.kind, "collection step");
        env.proxy(addr, self.kind)
    }

    /// Kind of object this cursor walks.
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Check if the traversal has reached the end.
    pub fn is_done(&self) -> bool {
        self.next.is_null()
    }
}

/// [`Iterator`] over a native collection.
pub struct Handles<'a> {
    cursor: CollectionCursor,
    env: &'a dyn Environment,
    host: &'a dyn Host,
}

impl<'a> Handles<'a> {
    pub fn new(env: &'a dyn Environment, host: &'a dyn Host, kind: ObjectKind) -> Self {
        Self {
            cursor: CollectionCursor::begin(host, kind),
            env,
            host,
        }
    }
}

impl Iterator for Handles<'_> {
    type Item = ForeignHandle;

    fn next(&mut self) -> Option<ForeignHandle> {
        self.cursor.advance(self.env, self.host)
    }
}

/// Script iterator function over a native collection.
///
/// Each call returns the next handle, then `nil` forever.
pub(crate) fn collection_iterator(host: &dyn Host, kind: ObjectKind) -> NativeFn {
    let cursor = Cell::new(CollectionCursor::begin(host, kind));
    let name = match kind {
        ObjectKind::Document => "files_iter",
        ObjectKind::Window => "windows_iter",
    };
    NativeFn::new(name, move |ctx: &mut CallContext| -> Result<(), NativeError> {
        let mut current = cursor.get();
        let handle = current.advance(ctx.env(), ctx.host());
        cursor.set(current);
        ctx.set_return(handle);
        Ok(())
    })
}

/// Position in a document's text, one line per step.
#[derive(Debug, Clone)]
pub struct LinesCursor {
    doc: ForeignHandle,
    pos: usize,
}

impl LinesCursor {
    /// Start at the beginning of `doc`.
    pub fn new(doc: ForeignHandle) -> Self {
        Self { doc, pos: 0 }
    }

    /// Byte offset of the next line.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Read the next line, terminator included.
    ///
    /// Ends when the document has been closed, when the buffer reports no
    /// further content, or when the line buffer cannot be allocated. Invalid
    /// UTF-8 is replaced.
    pub fn advance(&mut self, env: &dyn Environment, host: &dyn Host) -> Option<String> {
        let addr = env.resolve(&self.doc)?;
        let text = host.text(addr)?;

        let next = text.line_next(self.pos);
        if next <= self.pos {
            return None;
        }
        let len = next - self.pos;

        let mut buf = Vec::new();
        if buf.try_reserve_exact(len).is_err() {
            trace!(len, "line buffer allocation failed");
            return None;
        }
        buf.resize(len, 0);
        let read = text.read(self.pos, &mut buf);
        buf.truncate(read);

        trace!(doc = %addr, pos = self.pos, len = read, "line step");
        self.pos = next;
        Some(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Wrap this cursor into a script iterator function.
    pub fn into_function(self) -> NativeFn {
        let cursor = RefCell::new(self);
        NativeFn::new("lines_iter", move |ctx: &mut CallContext| -> Result<(), NativeError> {
            let line = cursor.borrow_mut().advance(ctx.env(), ctx.host());
            ctx.set_return(line);
            Ok(())
        })
    }
}
