//! Native function storage and callable trait.

use std::fmt;
use std::rc::Rc;

use crate::error::NativeError;
use crate::host::Host;

use super::{CallContext, Dynamic, Environment};

/// Type-erased native function.
///
/// This wraps any callable that implements `NativeCallable`, allowing
/// functions of different signatures to be stored uniformly in tables and
/// passed around as [`Dynamic::Function`](super::Dynamic::Function) values.
/// Script callbacks registered by an interpreter binding are stored the same
/// way.
///
/// The callable sits behind an `Rc`: cloning shares it, and iterator
/// functions keep their cursor state inside the closure.
#[derive(Clone)]
pub struct NativeFn {
    name: &'static str,
    inner: Rc<dyn NativeCallable>,
}

impl NativeFn {
    /// Create a new NativeFn from a callable.
    pub fn new<F>(name: &'static str, f: F) -> Self
    where
        F: NativeCallable + 'static,
    {
        Self {
            name,
            inner: Rc::new(f),
        }
    }

    /// Name used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Call this native function with the given context.
    pub fn call(&self, ctx: &mut CallContext) -> Result<(), NativeError> {
        self.inner.call(ctx)
    }

    /// Call as a plain function and return its result.
    pub fn invoke(
        &self,
        env: &dyn Environment,
        host: &mut dyn Host,
        args: &[Dynamic],
    ) -> Result<Dynamic, NativeError> {
        let mut ret = Dynamic::Nil;
        let mut ctx = CallContext::new(env, host, args, 0, &mut ret);
        self.call(&mut ctx)?;
        Ok(ret)
    }

    /// Call as a method: `this` goes into slot 0 ahead of `args`.
    pub fn invoke_method(
        &self,
        env: &dyn Environment,
        host: &mut dyn Host,
        this: Dynamic,
        args: &[Dynamic],
    ) -> Result<Dynamic, NativeError> {
        let mut slots = Vec::with_capacity(args.len() + 1);
        slots.push(this);
        slots.extend_from_slice(args);

        let mut ret = Dynamic::Nil;
        let mut ctx = CallContext::new(env, host, &slots, 1, &mut ret);
        self.call(&mut ctx)?;
        Ok(ret)
    }

    /// Check if two values share the same underlying callable.
    pub fn ptr_eq(&self, other: &NativeFn) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Trait for callable native functions.
///
/// The `call` method receives a `CallContext` that provides access to
/// arguments, the host, and allows setting the return value.
pub trait NativeCallable {
    /// Call this function with the given context.
    fn call(&self, ctx: &mut CallContext) -> Result<(), NativeError>;
}

// Implement NativeCallable for closures that take CallContext
impl<F> NativeCallable for F
where
    F: Fn(&mut CallContext) -> Result<(), NativeError>,
{
    fn call(&self, ctx: &mut CallContext) -> Result<(), NativeError> {
        (self)(ctx)
    }
}
