//! Checkpoint-specific error types.

use std::error::Error;
use std::fmt;
use std::io;

use strata_core::ElementKind;
use strata_store::StoreError;

/// Errors from checkpoint writing, reading, or restoring.
#[derive(Debug)]
pub enum RestartError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The blob does not start with the expected `b"SRSB"` magic bytes.
    InvalidMagic,
    /// The format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the blob.
        found: u8,
    },
    /// A record could not be decoded (truncated or corrupt data).
    MalformedRecord {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// A record's path does not name a field in the target tree.
    UnknownPath {
        /// The path from the record.
        path: String,
    },
    /// A record's element kind does not match the target field's.
    KindMismatch {
        /// The field's full path.
        path: String,
        /// The element kind the tree's field holds.
        stored: ElementKind,
        /// The element kind recorded in the blob.
        found: ElementKind,
    },
    /// A field rejected its recorded payload.
    Store(StoreError),
}

impl fmt::Display for RestartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"SRSB\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported checkpoint format version {found}")
            }
            Self::MalformedRecord { detail } => write!(f, "malformed record: {detail}"),
            Self::UnknownPath { path } => {
                write!(f, "checkpoint record '{path}' has no matching field in the tree")
            }
            Self::KindMismatch {
                path,
                stored,
                found,
            } => {
                write!(
                    f,
                    "field '{path}' holds {stored} but the checkpoint recorded {found}"
                )
            }
            Self::Store(e) => write!(f, "restore failed: {e}"),
        }
    }
}

impl Error for RestartError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RestartError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<StoreError> for RestartError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
