//! Document handles (`vis.file`).

use scriptbridge_core::{
    CallContext, Dynamic, Environment, Host, NativeAddr, NativeError, NativeFn, ObjectKind,
    ScriptTable,
};

use super::Getter;
use crate::iter::LinesCursor;

pub(super) const ATTRIBUTES: &[(&str, Getter)] = &[("name", name)];

/// Shared default table of document handles.
pub(super) fn methods() -> ScriptTable {
    let methods = ScriptTable::new();
    methods.set("insert", NativeFn::new("insert", insert));
    methods.set("delete", NativeFn::new("delete", delete));
    methods.set("lines", NativeFn::new("lines", lines));
    methods
}

// =============================================================================
// ATTRIBUTES
// =============================================================================

/// Current display name, nil for an unnamed buffer.
fn name(_env: &dyn Environment, host: &dyn Host, doc: NativeAddr) -> Dynamic {
    host.document_name(doc)
        .map(Dynamic::String)
        .unwrap_or_default()
}

// =============================================================================
// METHODS
// =============================================================================

/// Insert text at a byte offset.
///
/// Usage: `ok = file:insert(pos, text)`
fn insert(ctx: &mut CallContext) -> Result<(), NativeError> {
    let doc = ctx.this_handle(ObjectKind::Document)?;
    let pos: usize = ctx.arg(0)?;
    let text: String = ctx.arg(1)?;

    let inserted = match ctx.resolve(&doc) {
        Some(addr) => ctx
            .host_mut()
            .text_mut(addr)
            .is_some_and(|buffer| buffer.insert(pos, text.as_bytes())),
        None => false,
    };
    ctx.set_return(inserted);
    Ok(())
}

/// Delete a byte range.
///
/// Usage: `ok = file:delete(pos, len)`
fn delete(ctx: &mut CallContext) -> Result<(), NativeError> {
    let doc = ctx.this_handle(ObjectKind::Document)?;
    let pos: usize = ctx.arg(0)?;
    let len: usize = ctx.arg(1)?;

    let deleted = match ctx.resolve(&doc) {
        Some(addr) => ctx
            .host_mut()
            .text_mut(addr)
            .is_some_and(|buffer| buffer.delete(pos, len)),
        None => false,
    };
    ctx.set_return(deleted);
    Ok(())
}

/// Iterate the document's lines, terminators included.
///
/// Usage: `for line in file:lines() do ... end`
fn lines(ctx: &mut CallContext) -> Result<(), NativeError> {
    let doc = ctx.this_handle(ObjectKind::Document)?;
    ctx.set_return(LinesCursor::new(doc).into_function());
    Ok(())
}
