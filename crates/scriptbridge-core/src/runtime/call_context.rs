//! Call context bridging script code and native Rust functions.

use std::fmt;

use crate::convert::{FromDynamic, IntoDynamic};
use crate::error::NativeError;
use crate::handle::ForeignHandle;
use crate::host::Host;
use crate::ids::{NativeAddr, ObjectKind};

use super::{Dynamic, Environment, call_method};

/// Context for native function calls.
///
/// Gives a native function its arguments, a way to set its return value,
/// the host, and the environment for re-entering attribute dispatch (reading
/// a handle's fields, calling another function, proxying a native object).
///
/// ## Typed Argument Access
///
/// ```ignore
/// let pos: usize = ctx.arg(0)?;
/// let text: String = ctx.arg(1)?;
/// ```
///
/// ## Methods
///
/// For method calls slot 0 holds the receiver and `arg_offset` is 1, so
/// `arg(0)` is the first argument after the receiver.
///
/// ```ignore
/// let doc = ctx.this_handle(ObjectKind::Document)?;
/// ```
pub struct CallContext<'a> {
    /// Session the call runs in
    env: &'a dyn Environment,
    /// Host application
    host: &'a mut dyn Host,
    /// Argument slots (for methods, slot 0 is `this`)
    slots: &'a [Dynamic],
    /// Index of first argument (0 for functions, 1 for methods)
    arg_offset: usize,
    /// Return value slot
    return_slot: &'a mut Dynamic,
}

impl<'a> CallContext<'a> {
    /// Create a new call context.
    ///
    /// # Arguments
    ///
    /// * `env` - Environment used to re-enter dispatch
    /// * `host` - Host application
    /// * `slots` - The argument slots (for methods, slot 0 is `this`)
    /// * `arg_offset` - Offset to first argument (0 for functions, 1 for methods)
    /// * `return_slot` - Where to store the return value
    pub fn new(
        env: &'a dyn Environment,
        host: &'a mut dyn Host,
        slots: &'a [Dynamic],
        arg_offset: usize,
        return_slot: &'a mut Dynamic,
    ) -> Self {
        Self {
            env,
            host,
            slots,
            arg_offset,
            return_slot,
        }
    }

    /// Get the number of arguments (excluding `this` for methods).
    pub fn arg_count(&self) -> usize {
        self.slots.len().saturating_sub(self.arg_offset)
    }

    /// Get a raw reference to an argument slot.
    pub fn arg_slot(&self, index: usize) -> Result<&Dynamic, NativeError> {
        let slot_index = self.arg_offset + index;
        self.slots
            .get(slot_index)
            .ok_or(NativeError::ArgumentIndexOutOfBounds {
                index,
                count: self.arg_count(),
            })
    }

    /// Get a typed argument value.
    ///
    /// A missing argument converts like `nil`, so `Option<T>` parameters
    /// may simply be left off by the caller.
    pub fn arg<T: FromDynamic>(&self, index: usize) -> Result<T, NativeError> {
        let nil = Dynamic::Nil;
        let slot = self.slots.get(self.arg_offset + index).unwrap_or(&nil);
        T::from_dynamic(slot).map_err(NativeError::Conversion)
    }

    /// Get the receiver of a method call.
    pub fn this(&self) -> Result<&Dynamic, NativeError> {
        if self.arg_offset == 0 {
            return Err(NativeError::invalid_this("not called as a method"));
        }
        self.slots
            .first()
            .ok_or_else(|| NativeError::invalid_this("no slots available"))
    }

    /// Get the receiver of a method call as a handle of the given kind.
    ///
    /// The handle may be stale; the caller decides how to degrade.
    pub fn this_handle(&self, kind: ObjectKind) -> Result<ForeignHandle, NativeError> {
        match self.this()? {
            Dynamic::Handle(h) if h.kind() == kind => Ok(h.clone()),
            other => Err(NativeError::invalid_this(format!(
                "expected {}, got {}",
                kind.type_name(),
                other.type_name()
            ))),
        }
    }

    /// Set the return value from a raw slot.
    pub fn set_return_slot(&mut self, slot: Dynamic) {
        *self.return_slot = slot;
    }

    /// Set a typed return value.
    pub fn set_return<T: IntoDynamic>(&mut self, value: T) {
        *self.return_slot = value.into_dynamic();
    }

    /// The environment this call runs in.
    pub fn env(&self) -> &'a dyn Environment {
        self.env
    }

    /// Get access to the host.
    pub fn host(&self) -> &dyn Host {
        &*self.host
    }

    /// Get mutable access to the host.
    pub fn host_mut(&mut self) -> &mut dyn Host {
        &mut *self.host
    }

    /// Proxy a native object, see [`Environment::proxy`].
    pub fn proxy(&self, addr: NativeAddr, kind: ObjectKind) -> Option<ForeignHandle> {
        self.env.proxy(addr, kind)
    }

    /// Address of a live handle, `None` if stale.
    pub fn resolve(&self, handle: &ForeignHandle) -> Option<NativeAddr> {
        self.env.resolve(handle)
    }

    /// Read `target[key]`.
    pub fn get(&self, target: &Dynamic, key: impl IntoDynamic) -> Result<Dynamic, NativeError> {
        self.env.index(&*self.host, target, &key.into_dynamic())
    }

    /// Write `target[key] = value`.
    pub fn set(
        &self,
        target: &Dynamic,
        key: impl IntoDynamic,
        value: impl IntoDynamic,
    ) -> Result<(), NativeError> {
        self.env
            .new_index(target, &key.into_dynamic(), value.into_dynamic())
    }

    /// Call a function value.
    pub fn call(&mut self, func: &Dynamic, args: &[Dynamic]) -> Result<Dynamic, NativeError> {
        let func = func.as_function().ok_or(NativeError::NotCallable {
            type_name: func.type_name(),
        })?;
        func.invoke(self.env, &mut *self.host, args)
    }

    /// Call `target:name(args...)`.
    pub fn call_method(
        &mut self,
        target: &Dynamic,
        name: &str,
        args: &[Dynamic],
    ) -> Result<Dynamic, NativeError> {
        call_method(self.env, &mut *self.host, target, name, args)
    }
}

impl fmt::Debug for CallContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("arg_count", &self.arg_count())
            .field("arg_offset", &self.arg_offset)
            .finish()
    }
}
