//! Strata: the extensibility substrate for multiphysics simulation codes.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Strata sub-crates. For most users, adding `strata` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use strata::prelude::*;
//!
//! // Startup: build the catalog of constructible model types.
//! let catalog = strata::models::standard_catalog();
//!
//! // Input phase: tags become catalog keys, attributes become fields.
//! let mut root = Group::new("problem");
//! root.create_child(&catalog, "ParallelPlatesPermeability", "fracture")
//!     .unwrap();
//! root.process_input_recursive().unwrap();
//!
//! // Execution phase: allocate per-entity state, dispatch to the
//! // concrete type, run the update.
//! let member = root.child_mut("fracture").unwrap();
//! match strata::models::select_permeability_mut(member).unwrap() {
//!     PermeabilityVariantMut::ParallelPlates(m) => {
//!         m.allocate_state(100);
//!         m.update().unwrap();
//!     }
//!     PermeabilityVariantMut::Constant(m) => {
//!         m.allocate_state(100);
//!     }
//! }
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `strata-core` | Element kinds, the `Element` trait, input flags |
//! | [`catalog`] | `strata-catalog` | Name-keyed factory catalogs |
//! | [`store`] | `strata-store` | Groups, fields, typed arrays, the member traits |
//! | [`restart`] | `strata-restart` | Binary checkpoint writer and reader |
//! | [`models`] | `strata-models` | Reference constitutive models and dispatch |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Element kinds, the `Element` trait, and input flags (`strata-core`).
pub use strata_core as core;

/// Name-keyed factory catalogs (`strata-catalog`).
///
/// One [`catalog::Catalog`] value per abstract base, built at startup and
/// threaded by reference to every construction site.
pub use strata_catalog as catalog;

/// The hierarchical data store (`strata-store`).
///
/// [`store::Group`] trees own [`store::Field`] buffers; concrete node
/// types implement [`store::Member`].
pub use strata_store as store;

/// Binary checkpoint format (`strata-restart`).
///
/// Write with [`restart::write_checkpoint`], restore by path with
/// [`restart::CheckpointReader`].
pub use strata_restart as restart;

/// Reference constitutive models and closed-set dispatch (`strata-models`).
pub use strata_models as models;

/// Common imports for typical Strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    // Core tags and flags
    pub use strata_core::{Element, ElementKind, InputFlag};

    // Catalog
    pub use strata_catalog::{Catalog, CatalogError};

    // Store
    pub use strata_store::{
        process_input_tree, Array, Construct, Field, FieldRef, Group, Member, StoreError,
    };

    // Restart
    pub use strata_restart::{write_checkpoint, CheckpointReader, RestartError};

    // Models and dispatch
    pub use strata_models::{
        standard_catalog, ConstitutiveModel, DispatchError, PermeabilityVariant,
        PermeabilityVariantMut, SolidVariant, SolidVariantMut,
    };
}
