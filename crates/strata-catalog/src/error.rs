//! Catalog-specific error types.

use std::error::Error;
use std::fmt;

/// Errors from catalog registration and lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogError {
    /// A second registration attempted to claim an existing key.
    /// The first factory remains authoritative.
    DuplicateName {
        /// The key that was already registered.
        name: String,
    },
    /// A lookup requested a key no factory was registered under.
    UnknownName {
        /// The key that was requested.
        requested: String,
        /// Every registered key, in registration order.
        known: Vec<String>,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name } => {
                write!(f, "catalog key '{name}' is already registered")
            }
            Self::UnknownName { requested, known } => {
                write!(
                    f,
                    "unknown catalog key '{requested}'; registered keys: [{}]",
                    known.join(", ")
                )
            }
        }
    }
}

impl Error for CatalogError {}
