//! Conversion traits for native argument extraction and return values.
//!
//! - [`FromDynamic`]: Extract a Rust value from a [`Dynamic`]
//! - [`IntoDynamic`]: Convert a Rust value into a [`Dynamic`]
//!
//! Integer targets accept integral floats (`2.0` converts to `2`) and reject
//! anything that does not fit, so a negative position passed to a buffer
//! operation is a conversion error rather than a wrapped offset. String
//! targets accept numbers and format them.

use crate::error::ConversionError;
use crate::handle::ForeignHandle;
use crate::runtime::{Dynamic, NativeFn, ScriptTable};

/// Extract a value from a Dynamic.
pub trait FromDynamic: Sized {
    /// Extract a value from the given slot.
    ///
    /// Returns a `ConversionError` if the slot contains an incompatible type.
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError>;
}

/// Convert a value into a Dynamic.
pub trait IntoDynamic {
    /// Convert this value into a Dynamic.
    fn into_dynamic(self) -> Dynamic;
}

fn integral(slot: &Dynamic, target_type: &'static str) -> Result<i64, ConversionError> {
    match slot {
        Dynamic::Int(v) => Ok(*v),
        Dynamic::Float(f) if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 => {
            Ok(*f as i64)
        }
        Dynamic::Float(f) => Err(ConversionError::FloatConversion {
            value: *f,
            target_type,
        }),
        _ => Err(ConversionError::TypeMismatch {
            expected: "number",
            actual: slot.type_name(),
        }),
    }
}

// ============================================================================
// Integer implementations
// ============================================================================

macro_rules! impl_dynamic_int {
    ($($ty:ty),*) => {
        $(
            impl FromDynamic for $ty {
                fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
                    let v = integral(slot, stringify!($ty))?;
                    <$ty>::try_from(v).map_err(|_| ConversionError::IntegerOverflow {
                        value: v,
                        target_type: stringify!($ty),
                    })
                }
            }

            impl IntoDynamic for $ty {
                fn into_dynamic(self) -> Dynamic {
                    Dynamic::Int(self as i64)
                }
            }
        )*
    };
}

impl_dynamic_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

// ============================================================================
// Float implementations
// ============================================================================

impl FromDynamic for f64 {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::Float(v) => Ok(*v),
            Dynamic::Int(v) => Ok(*v as f64),
            _ => Err(ConversionError::TypeMismatch {
                expected: "number",
                actual: slot.type_name(),
            }),
        }
    }
}

impl IntoDynamic for f64 {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Float(self)
    }
}

// ============================================================================
// Other primitives
// ============================================================================

impl FromDynamic for bool {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::Bool(v) => Ok(*v),
            _ => Err(ConversionError::TypeMismatch {
                expected: "boolean",
                actual: slot.type_name(),
            }),
        }
    }
}

impl IntoDynamic for bool {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Bool(self)
    }
}

impl FromDynamic for String {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::String(s) => Ok(s.clone()),
            Dynamic::Int(v) => Ok(v.to_string()),
            Dynamic::Float(v) => Ok(v.to_string()),
            _ => Err(ConversionError::TypeMismatch {
                expected: "string",
                actual: slot.type_name(),
            }),
        }
    }
}

impl IntoDynamic for String {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::String(self)
    }
}

impl IntoDynamic for &str {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::String(self.to_owned())
    }
}

impl IntoDynamic for () {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Nil
    }
}

// ============================================================================
// Reference types
// ============================================================================

impl FromDynamic for Dynamic {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        Ok(slot.clone())
    }
}

impl IntoDynamic for Dynamic {
    fn into_dynamic(self) -> Dynamic {
        self
    }
}

impl FromDynamic for ForeignHandle {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::Handle(h) => Ok(h.clone()),
            _ => Err(ConversionError::TypeMismatch {
                expected: "handle",
                actual: slot.type_name(),
            }),
        }
    }
}

impl IntoDynamic for ForeignHandle {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Handle(self)
    }
}

impl FromDynamic for ScriptTable {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::Table(t) => Ok(t.clone()),
            _ => Err(ConversionError::TypeMismatch {
                expected: "table",
                actual: slot.type_name(),
            }),
        }
    }
}

impl IntoDynamic for ScriptTable {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Table(self)
    }
}

impl FromDynamic for NativeFn {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::Function(f) => Ok(f.clone()),
            _ => Err(ConversionError::TypeMismatch {
                expected: "function",
                actual: slot.type_name(),
            }),
        }
    }
}

impl IntoDynamic for NativeFn {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Function(self)
    }
}

impl<T: FromDynamic> FromDynamic for Option<T> {
    fn from_dynamic(slot: &Dynamic) -> Result<Self, ConversionError> {
        match slot {
            Dynamic::Nil => Ok(None),
            other => T::from_dynamic(other).map(Some),
        }
    }
}

impl<T: IntoDynamic> IntoDynamic for Option<T> {
    fn into_dynamic(self) -> Dynamic {
        match self {
            Some(v) => v.into_dynamic(),
            None => Dynamic::Nil,
        }
    }
}
