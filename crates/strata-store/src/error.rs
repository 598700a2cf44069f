//! Error types for the data store.

use std::error::Error;
use std::fmt;

use strata_catalog::CatalogError;
use strata_core::ElementKind;

/// Errors from tree construction, typed access, and input processing.
///
/// Every variant carries enough context (tree path, requested vs. stored
/// type) to diagnose without re-running. All are fatal: they indicate a
/// programming or configuration defect, never a transient fault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// A typed group registration or lookup found an existing child of a
    /// different concrete type.
    GroupTypeConflict {
        /// Full path of the conflicting child.
        path: String,
        /// The concrete type the caller asked for.
        requested: &'static str,
    },
    /// A typed field registration found an existing field of a different
    /// element kind.
    FieldKindConflict {
        /// Full path of the conflicting field.
        path: String,
        /// The element kind the field was first registered with.
        registered: ElementKind,
        /// The element kind the second registration asked for.
        requested: ElementKind,
    },
    /// A field was accessed as the wrong element type.
    ///
    /// Detected by comparing kind tags, not by a failed downcast, so the
    /// error names both sides.
    ElementKindMismatch {
        /// Path (or bare name, when accessed without tree context) of the field.
        field: String,
        /// The element kind the access asked for.
        requested: ElementKind,
        /// The element kind the buffer actually holds.
        stored: ElementKind,
    },
    /// A required field was left unset by input and has no default.
    MissingRequiredInput {
        /// Full path of the unset field.
        path: String,
    },
    /// `create_child` was asked to insert under a name already taken.
    DuplicateChild {
        /// Full path of the existing child.
        path: String,
    },
    /// A group lookup named a child that does not exist.
    UnknownChild {
        /// Path of the group that was searched.
        path: String,
        /// The child name that was requested.
        name: String,
    },
    /// A field lookup named a field that does not exist.
    UnknownField {
        /// Path of the group that was searched.
        path: String,
        /// The field name that was requested.
        name: String,
    },
    /// `create_child` failed to resolve its catalog key.
    ///
    /// Wraps the catalog error unchanged, adding the path of the group
    /// that attempted the construction.
    UnknownChildType {
        /// Path of the group that called `create_child`.
        path: String,
        /// The underlying catalog lookup failure.
        source: CatalogError,
    },
    /// A serialized buffer payload could not be decoded.
    MalformedPayload {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// A post-input hook rejected the assembled input values.
    InvalidValue {
        /// Full path of the group whose hook failed.
        path: String,
        /// Human-readable description of the violated constraint.
        detail: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GroupTypeConflict { path, requested } => {
                write!(f, "group '{path}' exists with a different type than {requested}")
            }
            Self::FieldKindConflict {
                path,
                registered,
                requested,
            } => {
                write!(
                    f,
                    "field '{path}' is registered as {registered}, cannot re-register as {requested}"
                )
            }
            Self::ElementKindMismatch {
                field,
                requested,
                stored,
            } => {
                write!(f, "field '{field}' holds {stored}, accessed as {requested}")
            }
            Self::MissingRequiredInput { path } => {
                write!(f, "required input '{path}' was not supplied and has no default")
            }
            Self::DuplicateChild { path } => {
                write!(f, "child '{path}' already exists")
            }
            Self::UnknownChild { path, name } => {
                write!(f, "group '{path}' has no child named '{name}'")
            }
            Self::UnknownField { path, name } => {
                write!(f, "group '{path}' has no field named '{name}'")
            }
            Self::UnknownChildType { path, source } => {
                write!(f, "cannot create child under '{path}': {source}")
            }
            Self::MalformedPayload { detail } => {
                write!(f, "malformed buffer payload: {detail}")
            }
            Self::InvalidValue { path, detail } => {
                write!(f, "invalid input for '{path}': {detail}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownChildType { source, .. } => Some(source),
            _ => None,
        }
    }
}
