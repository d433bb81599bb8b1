//! Identifier types for host-owned native objects.
//!
//! The host hands the bridge opaque addresses for its documents and windows.
//! The bridge never dereferences them: addresses are only used as registry
//! keys and passed back to the host through [`Host`](crate::Host).

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Stable identity of a host-owned native object.
///
/// The value is chosen by the host (a pointer value, a slot index, an id)
/// and must stay the same for the object's whole lifetime. Zero is the
/// null object and is never proxied.
///
/// # Example
///
/// ```
/// use scriptbridge_core::NativeAddr;
///
/// let doc = NativeAddr::new(0x1);
/// assert!(!doc.is_null());
/// assert!(NativeAddr::NULL.is_null());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct NativeAddr(u64);

impl NativeAddr {
    /// The null object.
    pub const NULL: NativeAddr = NativeAddr(0);

    /// Create an address from its raw value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Check if this is the null object.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// `None` for the null object, the address otherwise.
    #[inline]
    pub const fn non_null(self) -> Option<Self> {
        if self.is_null() { None } else { Some(self) }
    }
}

impl fmt::Display for NativeAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u64> for NativeAddr {
    fn from(raw: u64) -> Self {
        Self::new(raw)
    }
}

impl From<NativeAddr> for u64 {
    fn from(addr: NativeAddr) -> Self {
        addr.0
    }
}

/// The kinds of native object exposed to scripts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive,
)]
#[repr(u8)]
pub enum ObjectKind {
    /// An editable document (a file and its text buffer).
    Document = 0,
    /// A display window showing exactly one document.
    Window = 1,
}

impl ObjectKind {
    /// Script-facing type name, used in diagnostics.
    pub const fn type_name(self) -> &'static str {
        match self {
            ObjectKind::Document => "vis.file",
            ObjectKind::Window => "vis.window",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
