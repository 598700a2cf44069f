//! Test fixtures for Strata development.
//!
//! Not published; consumed as a dev-dependency by sibling crates.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{sample_tree, sample_tree_topology};
