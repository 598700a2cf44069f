//! Core types for the Strata data substrate.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! element type tags that guard every typed access to type-erased field
//! storage, the [`Element`] trait binding a Rust type to its tag and byte
//! codec, and the input-processing flags attached to fields.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod element;
pub mod flags;

pub use element::{Element, ElementKind};
pub use flags::InputFlag;
