//! Name-keyed factory catalogs for the Strata data substrate.
//!
//! A [`Catalog`] maps string keys — the tags found in an input document —
//! to factories that construct concrete implementations of one abstract
//! base. There is one catalog value per abstract base, built once during
//! single-threaded startup and then passed by shared reference to every
//! call site that constructs from a key. No global registry exists: the
//! catalog you thread through is the only source of constructible types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;

pub use catalog::{Catalog, Factory};
pub use error::CatalogError;
