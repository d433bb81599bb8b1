//! The global root table (`vis`).
//!
//! ```text
//! vis.files()        -> iterator over open documents
//! vis.windows()      -> iterator over windows
//! vis.command(text)  -> bool
//! vis.info(text)
//! vis.events         -> table of lifecycle callbacks
//! ```
//!
//! Every function also works as a method (`vis:files()`); the receiver is
//! ignored.

use scriptbridge_core::{CallContext, NativeError, NativeFn, ObjectKind, ScriptTable};

use crate::iter::collection_iterator;

/// Key of the callback table inside the root table.
pub const EVENTS: &str = "events";

/// Build the root table and publish it in `globals` under `name`.
pub(crate) fn install(globals: &ScriptTable, name: &str) -> ScriptTable {
    let root = ScriptTable::new();
    root.set("files", NativeFn::new("files", files));
    root.set("windows", NativeFn::new("windows", windows));
    root.set("command", NativeFn::new("command", command));
    root.set("info", NativeFn::new("info", info));
    root.set(EVENTS, ScriptTable::new());
    globals.set(name, root.clone());
    root
}

// =============================================================================
// COLLECTIONS
// =============================================================================

/// Usage: `for file in vis.files() do ... end`
fn files(ctx: &mut CallContext) -> Result<(), NativeError> {
    let iter = collection_iterator(ctx.host(), ObjectKind::Document);
    ctx.set_return(iter);
    Ok(())
}

/// Usage: `for win in vis.windows() do ... end`
fn windows(ctx: &mut CallContext) -> Result<(), NativeError> {
    let iter = collection_iterator(ctx.host(), ObjectKind::Window);
    ctx.set_return(iter);
    Ok(())
}

// =============================================================================
// HOST SERVICES
// =============================================================================

/// Run an editor command.
///
/// Usage: `ok = vis.command("w")`
fn command(ctx: &mut CallContext) -> Result<(), NativeError> {
    let text: String = ctx.arg(0)?;
    let ok = ctx.host_mut().run_command(&text);
    ctx.set_return(ok);
    Ok(())
}

/// Show a message in the status area.
///
/// Usage: `vis.info("saved")`
fn info(ctx: &mut CallContext) -> Result<(), NativeError> {
    let text: String = ctx.arg(0)?;
    ctx.host_mut().show_info(&text);
    Ok(())
}
