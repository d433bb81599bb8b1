//! Script-visible value type.

use std::fmt;

use crate::handle::ForeignHandle;

use super::{NativeFn, ScriptTable};

/// A dynamic value exchanged between script code and native code.
///
/// Handles, tables and functions are shared references: cloning one yields
/// the same object, and equality on them is reference identity. This is what
/// lets script code compare two handles with `==` and get `true` exactly
/// when they proxy the same native object.
#[derive(Clone, Default)]
pub enum Dynamic {
    /// Absent value
    #[default]
    Nil,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value (owned)
    String(String),
    /// Proxy for a host-owned document or window
    Handle(ForeignHandle),
    /// Shared key/value table
    Table(ScriptTable),
    /// Native callable
    Function(NativeFn),
}

impl Dynamic {
    /// Get a human-readable name for this value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Dynamic::Nil => "nil",
            Dynamic::Bool(_) => "boolean",
            Dynamic::Int(_) | Dynamic::Float(_) => "number",
            Dynamic::String(_) => "string",
            Dynamic::Handle(h) => h.kind().type_name(),
            Dynamic::Table(_) => "table",
            Dynamic::Function(_) => "function",
        }
    }

    /// Check if this value is nil.
    pub fn is_nil(&self) -> bool {
        matches!(self, Dynamic::Nil)
    }

    /// Script truthiness: everything except `nil` and `false` is true.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Dynamic::Nil | Dynamic::Bool(false))
    }

    /// Integer value, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Dynamic::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Borrow the string contents, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Dynamic::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the handle, if this is a handle.
    pub fn as_handle(&self) -> Option<&ForeignHandle> {
        match self {
            Dynamic::Handle(h) => Some(h),
            _ => None,
        }
    }

    /// Borrow the table, if this is a table.
    pub fn as_table(&self) -> Option<&ScriptTable> {
        match self {
            Dynamic::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Borrow the function, if this is a function.
    pub fn as_function(&self) -> Option<&NativeFn> {
        match self {
            Dynamic::Function(f) => Some(f),
            _ => None,
        }
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dynamic::Nil => write!(f, "Nil"),
            Dynamic::Bool(v) => write!(f, "Bool({})", v),
            Dynamic::Int(v) => write!(f, "Int({})", v),
            Dynamic::Float(v) => write!(f, "Float({})", v),
            Dynamic::String(s) => write!(f, "String({:?})", s),
            Dynamic::Handle(h) => write!(f, "Handle({:?})", h),
            Dynamic::Table(t) => write!(f, "Table(len={})", t.len()),
            Dynamic::Function(func) => write!(f, "{:?}", func),
        }
    }
}

impl PartialEq for Dynamic {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Dynamic::Nil, Dynamic::Nil) => true,
            (Dynamic::Bool(a), Dynamic::Bool(b)) => a == b,
            (Dynamic::Int(a), Dynamic::Int(b)) => a == b,
            (Dynamic::Float(a), Dynamic::Float(b)) => a == b,
            (Dynamic::Int(a), Dynamic::Float(b)) | (Dynamic::Float(b), Dynamic::Int(a)) => {
                int_eq_float(*a, *b)
            }
            (Dynamic::String(a), Dynamic::String(b)) => a == b,
            (Dynamic::Handle(a), Dynamic::Handle(b)) => a.ptr_eq(b),
            (Dynamic::Table(a), Dynamic::Table(b)) => a.ptr_eq(b),
            (Dynamic::Function(a), Dynamic::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// Exact integer/float comparison; no rounding of large integers.
fn int_eq_float(i: i64, f: f64) -> bool {
    f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 && f as i64 == i
}
