//! Binary checkpoint format for Strata data trees.
//!
//! A checkpoint is one packed record per field, written in deterministic
//! depth-first tree order (a node's fields before its children, both in
//! insertion order). Each record is tagged with the field's full path,
//! element kind, and shape-carrying payload, so a reader can restore
//! fields by path regardless of the order records appear in the blob —
//! the contract a restart needs when the reading process rebuilds its
//! tree independently.
//!
//! # Format
//!
//! ```text
//! [MAGIC "SRSB"] [VERSION u8] [record count u32]
//! [Record 1] [Record 2] ... [Record N]
//! ```
//!
//! Each record: length-prefixed path, `u8` element-kind tag,
//! length-prefixed payload (the field's own packed encoding, shape
//! included). All integers little-endian; strings length-prefixed
//! `u32` + UTF-8.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use error::RestartError;
pub use reader::CheckpointReader;
pub use writer::{collect_records, write_checkpoint, Record};

/// Magic bytes at the start of every checkpoint blob.
pub const MAGIC: [u8; 4] = *b"SRSB";

/// Current binary format version.
pub const FORMAT_VERSION: u8 = 1;
