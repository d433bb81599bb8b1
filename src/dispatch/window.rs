//! Window handles (`vis.window`).

use scriptbridge_core::{Dynamic, Environment, Host, NativeAddr, ObjectKind, ScriptTable};

use super::Getter;

pub(super) const ATTRIBUTES: &[(&str, Getter)] = &[("file", file)];

/// Windows have no methods yet.
pub(super) fn methods() -> ScriptTable {
    ScriptTable::new()
}

/// Handle of the displayed document, nil if the window shows none.
fn file(env: &dyn Environment, host: &dyn Host, win: NativeAddr) -> Dynamic {
    env.proxy(host.window_document(win), ObjectKind::Document)
        .map(Dynamic::Handle)
        .unwrap_or_default()
}
