//! Closed-set dispatch: resolve an abstract member to its concrete model
//! once, then run tight per-entity loops against the concrete type.
//!
//! Each model family enumerates its concrete types in a borrowed variant
//! enum. A selector tests the member's exact dynamic type against each
//! variant and hands back the enum; call sites match it exhaustively, so
//! the compiler proves every in-set type is handled and the only runtime
//! failure left is a genuinely out-of-set object. The cost of this design
//! is explicit: adding a concrete type to a family means adding a variant
//! and a selector arm here, and every match site breaks at compile time
//! until it covers the new type. That coupling buys per-entity loops that
//! run against inlinable concrete methods instead of virtual calls.
//!
//! Selector arms are ordered hottest type first; the order affects
//! throughput only, never the result, because the concrete types are
//! disjoint.

use std::any::Any;
use std::error::Error;
use std::fmt;

use strata_store::Member;

use crate::permeability::{ConstantPermeability, ParallelPlatesPermeability};
use crate::solid::{ElasticIsotropic, ElasticTransverseIsotropic};

/// Errors from closed-set dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchError {
    /// The member's concrete type is outside the family's enumerated set.
    UnrecognizedVariant {
        /// Full tree path of the offending member.
        path: String,
        /// The family whose set was searched.
        family: &'static str,
    },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedVariant { path, family } => {
                write!(f, "'{path}' is not in the {family} dispatch set")
            }
        }
    }
}

impl Error for DispatchError {}

// ── Permeability family ─────────────────────────────────────────

/// Borrowed view of a permeability model's concrete type.
#[derive(Clone, Copy)]
pub enum PermeabilityVariant<'a> {
    /// Spatially uniform permeability.
    Constant(&'a ConstantPermeability),
    /// Aperture-driven fracture permeability.
    ParallelPlates(&'a ParallelPlatesPermeability),
}

/// Mutable borrowed view of a permeability model's concrete type.
pub enum PermeabilityVariantMut<'a> {
    /// Spatially uniform permeability.
    Constant(&'a mut ConstantPermeability),
    /// Aperture-driven fracture permeability.
    ParallelPlates(&'a mut ParallelPlatesPermeability),
}

/// Resolve a member to its concrete permeability type.
pub fn select_permeability(
    member: &dyn Member,
) -> Result<PermeabilityVariant<'_>, DispatchError> {
    let any = member as &dyn Any;
    if let Some(model) = any.downcast_ref::<ConstantPermeability>() {
        return Ok(PermeabilityVariant::Constant(model));
    }
    if let Some(model) = any.downcast_ref::<ParallelPlatesPermeability>() {
        return Ok(PermeabilityVariant::ParallelPlates(model));
    }
    Err(DispatchError::UnrecognizedVariant {
        path: member.group().path().to_string(),
        family: "permeability",
    })
}

/// Resolve a member to its concrete permeability type, mutable.
pub fn select_permeability_mut(
    member: &mut dyn Member,
) -> Result<PermeabilityVariantMut<'_>, DispatchError> {
    let path = member.group().path().to_string();
    let any = member as &mut dyn Any;
    if any.is::<ConstantPermeability>() {
        let model = any
            .downcast_mut::<ConstantPermeability>()
            .expect("type checked above");
        return Ok(PermeabilityVariantMut::Constant(model));
    }
    if any.is::<ParallelPlatesPermeability>() {
        let model = any
            .downcast_mut::<ParallelPlatesPermeability>()
            .expect("type checked above");
        return Ok(PermeabilityVariantMut::ParallelPlates(model));
    }
    Err(DispatchError::UnrecognizedVariant {
        path,
        family: "permeability",
    })
}

// ── Solid family ────────────────────────────────────────────────

/// Borrowed view of a solid model's concrete type.
#[derive(Clone, Copy)]
pub enum SolidVariant<'a> {
    /// Isotropic linear elasticity.
    Isotropic(&'a ElasticIsotropic),
    /// Transversely isotropic linear elasticity.
    TransverseIsotropic(&'a ElasticTransverseIsotropic),
}

/// Mutable borrowed view of a solid model's concrete type.
pub enum SolidVariantMut<'a> {
    /// Isotropic linear elasticity.
    Isotropic(&'a mut ElasticIsotropic),
    /// Transversely isotropic linear elasticity.
    TransverseIsotropic(&'a mut ElasticTransverseIsotropic),
}

/// Resolve a member to its concrete solid type.
pub fn select_solid(member: &dyn Member) -> Result<SolidVariant<'_>, DispatchError> {
    let any = member as &dyn Any;
    if let Some(model) = any.downcast_ref::<ElasticIsotropic>() {
        return Ok(SolidVariant::Isotropic(model));
    }
    if let Some(model) = any.downcast_ref::<ElasticTransverseIsotropic>() {
        return Ok(SolidVariant::TransverseIsotropic(model));
    }
    Err(DispatchError::UnrecognizedVariant {
        path: member.group().path().to_string(),
        family: "solid",
    })
}

/// Resolve a member to its concrete solid type, mutable.
pub fn select_solid_mut(member: &mut dyn Member) -> Result<SolidVariantMut<'_>, DispatchError> {
    let path = member.group().path().to_string();
    let any = member as &mut dyn Any;
    if any.is::<ElasticIsotropic>() {
        let model = any
            .downcast_mut::<ElasticIsotropic>()
            .expect("type checked above");
        return Ok(SolidVariantMut::Isotropic(model));
    }
    if any.is::<ElasticTransverseIsotropic>() {
        let model = any
            .downcast_mut::<ElasticTransverseIsotropic>()
            .expect("type checked above");
        return Ok(SolidVariantMut::TransverseIsotropic(model));
    }
    Err(DispatchError::UnrecognizedVariant {
        path,
        family: "solid",
    })
}
