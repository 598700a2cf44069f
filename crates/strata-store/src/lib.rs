//! Hierarchical type-erased data store for the Strata substrate.
//!
//! This crate is the tree layer: [`Group`] nodes own named child groups and
//! named [`Field`]s, both in insertion order. Fields are type-erased buffers
//! guarded by an element-kind tag; groups are addressed by absolute slash
//! paths (`/problem/regionA/permeability`). Concrete group types implement
//! [`Member`] and are constructed either directly ([`Group::register_group`])
//! or from a catalog key found in an input document
//! ([`Group::create_child`]).
//!
//! # Phases
//!
//! A tree moves through three phases: construction (groups and fields are
//! registered, input values assigned), input processing
//! ([`Group::process_input_recursive`] validates required fields and applies
//! defaults), and execution (buffers are resized and read/written by
//! kernels). Topology changes after input processing are not policed but
//! are the caller's responsibility to keep consistent.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod error;
pub mod field;
pub mod group;
pub mod member;

pub use array::Array;
pub use error::StoreError;
pub use field::{Field, FieldRef};
pub use group::{process_input_tree, Group};
pub use member::{Construct, IntoMember, Member};
