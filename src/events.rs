//! Lifecycle event bridge.
//!
//! The host calls one `notify_*` method at each lifecycle point of a
//! document or window. The bridge looks the matching callback up in the
//! root table's `events` table by a fixed name and, if it is a function,
//! calls it with the object's handle.
//!
//! Close notifications always unregister the handle afterwards, whether
//! the callback was missing, succeeded or failed. Callback errors are
//! logged and never reach the host.
//!
//! | notification | callback | cleanup |
//! |--------------|----------|---------|
//! | `notify_window_open` | `win_open` | none |
//! | `notify_window_close` | `win_close` | unregister window |
//! | `notify_document_open` | none | none |
//! | `notify_document_save` | none | none |
//! | `notify_document_close` | `file_close` | unregister document |

use tracing::{debug, warn};

use scriptbridge_core::{Dynamic, Environment, Host, NativeAddr, NativeFn, ObjectKind};

use crate::ScriptSession;

/// Called with a window's handle after the window opened.
pub const WIN_OPEN: &str = "win_open";
/// Called with a window's handle before the window is destroyed.
pub const WIN_CLOSE: &str = "win_close";
/// Reserved for document open notifications.
pub const FILE_OPEN: &str = "file_open";
/// Reserved for document save notifications.
pub const FILE_SAVE: &str = "file_save";
/// Called with a document's handle before the document is destroyed.
pub const FILE_CLOSE: &str = "file_close";

impl ScriptSession {
    /// A window was created.
    pub fn notify_window_open(&self, host: &mut dyn Host, win: NativeAddr) {
        self.fire(host, WIN_OPEN, win, ObjectKind::Window);
    }

    /// A window is about to be destroyed.
    pub fn notify_window_close(&self, host: &mut dyn Host, win: NativeAddr) {
        self.close(host, WIN_CLOSE, win, ObjectKind::Window);
    }

    /// A document was opened. No callback is dispatched.
    pub fn notify_document_open(&self, _host: &mut dyn Host, doc: NativeAddr) {
        debug!(event = FILE_OPEN, addr = %doc, "event not dispatched");
    }

    /// A document was written. No callback is dispatched.
    pub fn notify_document_save(&self, _host: &mut dyn Host, doc: NativeAddr) {
        debug!(event = FILE_SAVE, addr = %doc, "event not dispatched");
    }

    /// A document is about to be destroyed.
    pub fn notify_document_close(&self, host: &mut dyn Host, doc: NativeAddr) {
        self.close(host, FILE_CLOSE, doc, ObjectKind::Document);
    }

    fn close(&self, host: &mut dyn Host, event: &'static str, addr: NativeAddr, kind: ObjectKind) {
        if addr.is_null() {
            return;
        }
        self.fire(host, event, addr, kind);
        self.unregister(addr, kind);
    }

    /// Call the `event` callback with the handle of `addr`.
    fn fire(&self, host: &mut dyn Host, event: &'static str, addr: NativeAddr, kind: ObjectKind) {
        if addr.is_null() {
            return;
        }
        let Some(callback) = self.callback(event) else {
            return;
        };
        let Some(handle) = self.proxy(addr, kind) else {
            return;
        };

        debug!(event, addr = %addr, "dispatching event");
        if let Err(err) = callback.invoke(self, host, &[Dynamic::Handle(handle)]) {
            warn!(event, addr = %addr, error = %err, "event callback failed");
        }
    }

    /// The function stored under `event`, if any.
    fn callback(&self, event: &str) -> Option<NativeFn> {
        match self.events()?.get(event) {
            Dynamic::Function(func) => Some(func),
            _ => None,
        }
    }
}
