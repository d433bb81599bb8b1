//! Error types for native calls made from script code.
//!
//! Stale handles are deliberately absent from this hierarchy: using a handle
//! whose native object has been closed degrades to `nil`, a no-op, or
//! `false`, and never raises.
//!
//! ```text
//! NativeError
//! ├── Conversion(ConversionError) - argument/return value conversion
//! ├── InvalidThis                 - method called on the wrong receiver
//! ├── ArgumentIndexOutOfBounds    - missing argument
//! ├── NotIndexable / NotCallable  - misuse of a value
//! ├── InvalidKey                  - value cannot be used as a table key
//! └── Script                      - error raised by script code itself
//! ```

use thiserror::Error;

/// Errors that can occur when converting between Rust and script values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// Type mismatch during conversion
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Integer does not fit in the target type
    #[error("integer overflow: value {value} does not fit in {target_type}")]
    IntegerOverflow { value: i64, target_type: &'static str },

    /// Float has no exact integer representation
    #[error("float conversion error: value {value} cannot be represented as {target_type}")]
    FloatConversion {
        value: f64,
        target_type: &'static str,
    },
}

/// Errors raised by native functions and dispatch operations.
///
/// A `NativeError` aborts the current script call only; it never crosses
/// into host control flow through the lifecycle event bridge.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NativeError {
    /// Error converting arguments or return values
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Invalid `this` reference for a method call
    #[error("invalid 'this' reference: {message}")]
    InvalidThis { message: String },

    /// Argument index out of bounds
    #[error("argument index {index} out of bounds (function has {count} arguments)")]
    ArgumentIndexOutOfBounds { index: usize, count: usize },

    /// Indexing a value that has no fields
    #[error("attempt to index a {type_name} value")]
    NotIndexable { type_name: &'static str },

    /// Calling a value that is not a function
    #[error("attempt to call a {type_name} value")]
    NotCallable { type_name: &'static str },

    /// Using a value that cannot be a table key
    #[error("invalid table key of type {type_name}")]
    InvalidKey { type_name: &'static str },

    /// Error raised by script code
    #[error("{message}")]
    Script { message: String },
}

impl NativeError {
    /// Create an "invalid this" error with a message.
    pub fn invalid_this(message: impl Into<String>) -> Self {
        NativeError::InvalidThis {
            message: message.into(),
        }
    }

    /// Create a script-raised error.
    pub fn script(message: impl Into<String>) -> Self {
        NativeError::Script {
            message: message.into(),
        }
    }
}
