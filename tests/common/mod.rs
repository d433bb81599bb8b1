//! In-memory editor used by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use scriptbridge::prelude::*;

/// Byte buffer with newline-delimited lines.
#[derive(Debug, Default)]
pub struct MemBuffer {
    pub bytes: Vec<u8>,
    pub read_only: bool,
    /// Report every line as ending at `usize::MAX`.
    pub oversized_lines: bool,
}

impl MemBuffer {
    pub fn new(text: &[u8]) -> Self {
        Self {
            bytes: text.to_vec(),
            read_only: false,
            oversized_lines: false,
        }
    }

    pub fn as_str(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl TextBuffer for MemBuffer {
    fn insert(&mut self, pos: usize, data: &[u8]) -> bool {
        if self.read_only || pos > self.bytes.len() {
            return false;
        }
        self.bytes.splice(pos..pos, data.iter().copied());
        true
    }

    fn delete(&mut self, pos: usize, len: usize) -> bool {
        if self.read_only || pos.saturating_add(len) > self.bytes.len() {
            return false;
        }
        self.bytes.drain(pos..pos + len);
        true
    }

    fn line_next(&self, pos: usize) -> usize {
        if self.oversized_lines {
            return usize::MAX;
        }
        if pos >= self.bytes.len() {
            return pos;
        }
        match self.bytes[pos..].iter().position(|&b| b == b'\n') {
            Some(offset) => pos + offset + 1,
            None => self.bytes.len(),
        }
    }

    fn read(&self, pos: usize, buf: &mut [u8]) -> usize {
        let available = self.bytes.len().saturating_sub(pos);
        let len = available.min(buf.len());
        buf[..len].copy_from_slice(&self.bytes[pos..pos + len]);
        len
    }
}

struct MockDocument {
    addr: NativeAddr,
    name: Option<String>,
    text: MemBuffer,
}

struct MockWindow {
    addr: NativeAddr,
    doc: NativeAddr,
}

/// Editor with linked documents and windows.
///
/// List order is link order. Commands of the form `close-window <addr>`
/// close a window through the attached session, which is how tests drive
/// re-entrant lifecycle events.
#[derive(Default)]
pub struct MockHost {
    documents: Vec<MockDocument>,
    windows: Vec<MockWindow>,
    closing: Vec<NativeAddr>,
    pub commands: Vec<String>,
    pub infos: Vec<String>,
    session: Option<Rc<ScriptSession>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let commands re-enter `session`.
    pub fn attach(&mut self, session: Rc<ScriptSession>) {
        self.session = Some(session);
    }

    pub fn add_document(&mut self, addr: u64, name: Option<&str>, text: &str) -> NativeAddr {
        let addr = NativeAddr::new(addr);
        self.documents.push(MockDocument {
            addr,
            name: name.map(str::to_owned),
            text: MemBuffer::new(text.as_bytes()),
        });
        addr
    }

    pub fn add_window(&mut self, addr: u64, doc: NativeAddr) -> NativeAddr {
        let addr = NativeAddr::new(addr);
        self.windows.push(MockWindow { addr, doc });
        addr
    }

    pub fn rename(&mut self, doc: NativeAddr, name: &str) {
        if let Some(d) = self.documents.iter_mut().find(|d| d.addr == doc) {
            d.name = Some(name.to_owned());
        }
    }

    pub fn buffer(&self, doc: NativeAddr) -> Option<&MemBuffer> {
        self.documents.iter().find(|d| d.addr == doc).map(|d| &d.text)
    }

    pub fn buffer_mut(&mut self, doc: NativeAddr) -> Option<&mut MemBuffer> {
        self.documents
            .iter_mut()
            .find(|d| d.addr == doc)
            .map(|d| &mut d.text)
    }

    /// Remove a document, notifying the attached session first.
    pub fn close_document(&mut self, doc: NativeAddr) {
        if let Some(session) = self.session.clone() {
            session.notify_document_close(self, doc);
        }
        self.documents.retain(|d| d.addr != doc);
    }

    /// Remove a window, notifying the attached session first.
    ///
    /// Closing a window that is already being closed fails.
    pub fn close_window(&mut self, win: NativeAddr) -> bool {
        if self.closing.contains(&win) || !self.windows.iter().any(|w| w.addr == win) {
            return false;
        }
        self.closing.push(win);
        if let Some(session) = self.session.clone() {
            session.notify_window_close(self, win);
        }
        self.windows.retain(|w| w.addr != win);
        self.closing.retain(|&w| w != win);
        true
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    fn document(&self, doc: NativeAddr) -> Option<&MockDocument> {
        self.documents.iter().find(|d| d.addr == doc)
    }

    fn next_in<T>(items: &[T], addr: NativeAddr, key: impl Fn(&T) -> NativeAddr) -> NativeAddr {
        items
            .iter()
            .position(|item| key(item) == addr)
            .and_then(|i| items.get(i + 1))
            .map(key)
            .unwrap_or(NativeAddr::NULL)
    }
}

impl Host for MockHost {
    fn first_document(&self) -> NativeAddr {
        self.documents.first().map(|d| d.addr).unwrap_or(NativeAddr::NULL)
    }

    fn next_document(&self, doc: NativeAddr) -> NativeAddr {
        Self::next_in(&self.documents, doc, |d| d.addr)
    }

    fn first_window(&self) -> NativeAddr {
        self.windows.first().map(|w| w.addr).unwrap_or(NativeAddr::NULL)
    }

    fn next_window(&self, win: NativeAddr) -> NativeAddr {
        Self::next_in(&self.windows, win, |w| w.addr)
    }

    fn document_name(&self, doc: NativeAddr) -> Option<String> {
        self.document(doc).and_then(|d| d.name.clone())
    }

    fn window_document(&self, win: NativeAddr) -> NativeAddr {
        self.windows
            .iter()
            .find(|w| w.addr == win)
            .map(|w| w.doc)
            .unwrap_or(NativeAddr::NULL)
    }

    fn text(&self, doc: NativeAddr) -> Option<&dyn TextBuffer> {
        self.document(doc).map(|d| &d.text as &dyn TextBuffer)
    }

    fn text_mut(&mut self, doc: NativeAddr) -> Option<&mut dyn TextBuffer> {
        self.documents
            .iter_mut()
            .find(|d| d.addr == doc)
            .map(|d| &mut d.text as &mut dyn TextBuffer)
    }

    fn run_command(&mut self, command: &str) -> bool {
        self.commands.push(command.to_owned());
        match command.split_once(' ') {
            Some(("close-window", arg)) => match arg.parse::<u64>() {
                Ok(raw) => self.close_window(NativeAddr::new(raw)),
                Err(_) => false,
            },
            _ => command != "fail",
        }
    }

    fn show_info(&mut self, message: &str) {
        self.infos.push(message.to_owned());
    }
}

/// Fresh session with the default configuration.
pub fn session() -> Rc<ScriptSession> {
    Rc::new(ScriptSession::start(SessionConfig::default()).expect("default config is valid"))
}

/// Fresh session attached to a fresh host.
pub fn attached() -> (Rc<ScriptSession>, MockHost) {
    let session = session();
    let mut host = MockHost::new();
    host.attach(Rc::clone(&session));
    (session, host)
}

/// Values passed to a [`recorder`] callback.
pub type Calls = Rc<RefCell<Vec<Dynamic>>>;

/// Callback that records its first argument.
pub fn recorder() -> (NativeFn, Calls) {
    let calls: Calls = Rc::default();
    let seen = Rc::clone(&calls);
    let func = NativeFn::new("recorder", move |ctx: &mut CallContext| -> Result<(), NativeError> {
        let arg: Dynamic = ctx.arg(0)?;
        seen.borrow_mut().push(arg);
        Ok(())
    });
    (func, calls)
}

/// Store `callback` under `event` in the session's callback table.
pub fn on(session: &ScriptSession, event: &str, callback: NativeFn) {
    let events = session.events().expect("events table present");
    events.set(event, callback);
}

/// Call `vis:<name>()` and drain the returned iterator function.
pub fn drain(session: &ScriptSession, host: &mut MockHost, name: &str) -> Vec<Dynamic> {
    let iter = session
        .call_method(host, &session.namespace_value(), name, &[])
        .expect("iterator function");
    drain_iter(session, host, &iter)
}

/// Call an iterator function until it returns nil.
pub fn drain_iter(session: &ScriptSession, host: &mut MockHost, iter: &Dynamic) -> Vec<Dynamic> {
    let mut out = Vec::new();
    loop {
        match session.call(host, iter, &[]).expect("iterator step") {
            Dynamic::Nil => break,
            value => out.push(value),
        }
        assert!(out.len() < 1000, "iterator does not terminate");
    }
    out
}

/// Read `handle[key]`.
pub fn attr(session: &ScriptSession, host: &MockHost, handle: &Dynamic, key: &str) -> Dynamic {
    session.get(host, handle, key).expect("indexing a handle never fails")
}
