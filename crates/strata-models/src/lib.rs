//! Reference constitutive models for the Strata substrate.
//!
//! This crate is the consumer layer that exercises the substrate the way
//! a simulation code does: concrete material models implement
//! [`ConstitutiveModel`], register their fields at construction, are
//! built from input-document tags through [`standard_catalog`], and are
//! re-dispatched to their concrete types inside per-entity loops through
//! the closed-set selectors in [`dispatch`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod base;
pub mod dispatch;
pub mod permeability;
pub mod solid;

pub use base::{standard_catalog, ConstitutiveModel};
pub use dispatch::{
    select_permeability, select_permeability_mut, select_solid, select_solid_mut, DispatchError,
    PermeabilityVariant, PermeabilityVariantMut, SolidVariant, SolidVariantMut,
};
pub use permeability::{ConstantPermeability, ParallelPlatesPermeability};
pub use solid::{ElasticIsotropic, ElasticTransverseIsotropic};
