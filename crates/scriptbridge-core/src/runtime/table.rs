//! Shared key/value tables.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

use crate::convert::IntoDynamic;
use crate::error::NativeError;

use super::Dynamic;

/// A value usable as a table key.
///
/// Integral floats are folded into `Int` so that `t[1]` and `t[1.0]` name
/// the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableKey {
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    String(String),
}

impl TableKey {
    /// Convert a value into a key.
    ///
    /// `nil`, NaN, handles, tables and functions cannot be keys.
    pub fn from_dynamic(value: &Dynamic) -> Result<Self, NativeError> {
        match value {
            Dynamic::Bool(b) => Ok(TableKey::Bool(*b)),
            Dynamic::Int(i) => Ok(TableKey::Int(*i)),
            Dynamic::Float(f) if f.is_nan() => Err(NativeError::InvalidKey { type_name: "NaN" }),
            Dynamic::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Ok(TableKey::Int(*f as i64))
                } else {
                    Ok(TableKey::Float(OrderedFloat(*f)))
                }
            }
            Dynamic::String(s) => Ok(TableKey::String(s.clone())),
            other => Err(NativeError::InvalidKey {
                type_name: other.type_name(),
            }),
        }
    }

    /// Convert back into a value.
    pub fn to_dynamic(&self) -> Dynamic {
        match self {
            TableKey::Bool(b) => Dynamic::Bool(*b),
            TableKey::Int(i) => Dynamic::Int(*i),
            TableKey::Float(f) => Dynamic::Float(f.into_inner()),
            TableKey::String(s) => Dynamic::String(s.clone()),
        }
    }

    /// Borrow the key as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TableKey::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for TableKey {
    fn from(s: &str) -> Self {
        TableKey::String(s.to_owned())
    }
}

impl From<String> for TableKey {
    fn from(s: String) -> Self {
        TableKey::String(s)
    }
}

impl From<i64> for TableKey {
    fn from(i: i64) -> Self {
        TableKey::Int(i)
    }
}

/// A shared, mutable key/value table.
///
/// Cloning a `ScriptTable` yields another reference to the same table.
/// Storing `nil` under a key removes the key.
#[derive(Clone, Default)]
pub struct ScriptTable {
    entries: Rc<RefCell<FxHashMap<TableKey, Dynamic>>>,
}

impl ScriptTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value stored under `key`, or `nil`.
    pub fn get(&self, key: impl Into<TableKey>) -> Dynamic {
        self.get_key(&key.into())
    }

    /// Get the value stored under an already converted key, or `nil`.
    pub fn get_key(&self, key: &TableKey) -> Dynamic {
        self.entries.borrow().get(key).cloned().unwrap_or_default()
    }

    /// Store `value` under `key`; `nil` removes the entry.
    pub fn set(&self, key: impl Into<TableKey>, value: impl IntoDynamic) {
        self.set_key(key.into(), value.into_dynamic());
    }

    /// Store a value under an already converted key; `nil` removes the entry.
    pub fn set_key(&self, key: TableKey, value: Dynamic) {
        let mut entries = self.entries.borrow_mut();
        if value.is_nil() {
            entries.remove(&key);
        } else {
            entries.insert(key, value);
        }
    }

    /// Read with a dynamic key. Keys that cannot exist in a table read as `nil`.
    pub fn raw_get(&self, key: &Dynamic) -> Dynamic {
        match TableKey::from_dynamic(key) {
            Ok(key) => self.get_key(&key),
            Err(_) => Dynamic::Nil,
        }
    }

    /// Write with a dynamic key.
    pub fn raw_set(&self, key: &Dynamic, value: Dynamic) -> Result<(), NativeError> {
        let key = TableKey::from_dynamic(key)?;
        self.set_key(key, value);
        Ok(())
    }

    /// Check if a key is present.
    pub fn contains(&self, key: impl Into<TableKey>) -> bool {
        self.entries.borrow().contains_key(&key.into())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Check if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        let entries = std::mem::take(&mut *self.entries.borrow_mut());
        drop(entries);
    }

    /// Snapshot of the current keys.
    pub fn keys(&self) -> Vec<TableKey> {
        self.entries.borrow().keys().cloned().collect()
    }

    /// Check if two tables are the same table.
    pub fn ptr_eq(&self, other: &ScriptTable) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }
}

impl fmt::Debug for ScriptTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptTable")
            .field("len", &self.len())
            .finish()
    }
}
