//! The seam through which native code re-enters the scripting session.

use crate::error::NativeError;
use crate::handle::ForeignHandle;
use crate::host::Host;
use crate::ids::{NativeAddr, ObjectKind};

use super::{Dynamic, ScriptTable};

/// Session-side operations available to native functions.
///
/// Implemented by the scripting session, which owns the handle registry and
/// the per-kind dispatch tables. Native functions reach it through
/// [`CallContext::env`](super::CallContext::env).
pub trait Environment {
    /// The global table.
    fn globals(&self) -> &ScriptTable;

    /// Return the unique live handle for a native object, creating it on
    /// first use. `None` for the null address.
    fn proxy(&self, addr: NativeAddr, kind: ObjectKind) -> Option<ForeignHandle>;

    /// Address of `handle` if it is still live, `None` if it went stale.
    fn resolve(&self, handle: &ForeignHandle) -> Option<NativeAddr>;

    /// Read `target[key]`.
    fn index(
        &self,
        host: &dyn Host,
        target: &Dynamic,
        key: &Dynamic,
    ) -> Result<Dynamic, NativeError>;

    /// Write `target[key] = value`.
    fn new_index(
        &self,
        target: &Dynamic,
        key: &Dynamic,
        value: Dynamic,
    ) -> Result<(), NativeError>;
}

/// Call `target:name(args...)`: look `name` up on `target` and call it
/// with `target` as the receiver.
pub fn call_method(
    env: &dyn Environment,
    host: &mut dyn Host,
    target: &Dynamic,
    name: &str,
    args: &[Dynamic],
) -> Result<Dynamic, NativeError> {
    let method = env.index(&*host, target, &Dynamic::String(name.to_owned()))?;
    match method {
        Dynamic::Function(func) => func.invoke_method(env, host, target.clone(), args),
        other => Err(NativeError::NotCallable {
            type_name: other.type_name(),
        }),
    }
}
