//! Session-level errors.

use thiserror::Error;

pub use scriptbridge_core::{ConversionError, NativeError};

/// Errors that can occur while starting a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The configured root table name cannot be used as a global
    #[error("invalid namespace name: '{0}'")]
    InvalidNamespace(String),
}
