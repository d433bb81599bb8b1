//! Boundary traits implemented by the host application.
//!
//! The host owns every document and window. It exposes them to the bridge
//! by address: the head of each collection, the `next` link of each
//! element, and a handful of per-object accessors. The bridge only ever
//! calls back with addresses it is currently holding a live handle for,
//! but implementations must still treat unknown addresses gracefully
//! (return `None` / [`NativeAddr::NULL`]).

use crate::ids::NativeAddr;

/// The native text-buffer engine of one document.
///
/// Positions and lengths are byte offsets. The bridge passes the boolean
/// results of `insert` and `delete` through to script code unchanged.
pub trait TextBuffer {
    /// Insert `data` at byte offset `pos`.
    fn insert(&mut self, pos: usize, data: &[u8]) -> bool;

    /// Delete `len` bytes starting at `pos`.
    fn delete(&mut self, pos: usize, len: usize) -> bool;

    /// Offset of the start of the line following the one containing `pos`.
    ///
    /// Returns `pos` itself when there is no further content.
    fn line_next(&self, pos: usize) -> usize;

    /// Copy bytes starting at `pos` into `buf`, returning how many were copied.
    fn read(&self, pos: usize, buf: &mut [u8]) -> usize;
}

/// The host application as seen from the script bridge.
pub trait Host {
    /// First document of the open-documents list, or null.
    fn first_document(&self) -> NativeAddr;

    /// Document linked after `doc`, or null.
    fn next_document(&self, doc: NativeAddr) -> NativeAddr;

    /// First window of the window list, or null.
    fn first_window(&self) -> NativeAddr;

    /// Window linked after `win`, or null.
    fn next_window(&self, win: NativeAddr) -> NativeAddr;

    /// Display name of a document; `None` for an unnamed buffer.
    fn document_name(&self, doc: NativeAddr) -> Option<String>;

    /// Document shown by a window, or null.
    fn window_document(&self, win: NativeAddr) -> NativeAddr;

    /// Text buffer of a document.
    fn text(&self, doc: NativeAddr) -> Option<&dyn TextBuffer>;

    /// Mutable text buffer of a document.
    fn text_mut(&mut self, doc: NativeAddr) -> Option<&mut dyn TextBuffer>;

    /// Run a command string through the host's command interpreter.
    fn run_command(&mut self, command: &str) -> bool;

    /// Show an informational message to the user.
    fn show_info(&mut self, message: &str);
}
