//! The [`ConstitutiveModel`] base trait and the standard catalog.

use strata_catalog::Catalog;
use strata_store::{IntoMember, Member};

use crate::permeability::{ConstantPermeability, ParallelPlatesPermeability};
use crate::solid::{ElasticIsotropic, ElasticTransverseIsotropic};

/// Abstract base for material models.
///
/// A constitutive model is a tree member whose fields hold its input
/// parameters and per-entity state. Models are constructed from catalog
/// keys found in the input document and later re-dispatched to their
/// concrete types inside per-entity loops (see [`crate::dispatch`]).
pub trait ConstitutiveModel: Member {
    /// The catalog key this model registers under.
    fn catalog_name(&self) -> &'static str;

    /// The instance name chosen by the input document.
    fn instance_name(&self) -> &str {
        self.group().name()
    }

    /// Size per-entity state for `entity_count` entities.
    ///
    /// Default: resize every field of the model's group. Scalar inputs
    /// and fixed-extent parameters are unaffected by group resize.
    fn allocate_state(&mut self, entity_count: usize) {
        self.group_mut().resize(entity_count);
    }
}

impl IntoMember for dyn ConstitutiveModel {
    fn into_member(self: Box<Self>) -> Box<dyn Member> {
        self
    }
}

/// Build the catalog of every built-in constitutive model.
///
/// This is the registration surface: called once during single-threaded
/// startup, before any input processing, and the returned value is
/// threaded by reference to every `create`/`create_child` site. The
/// catalog key of each model equals its `catalog_name()`.
pub fn standard_catalog() -> Catalog<dyn ConstitutiveModel> {
    use strata_store::Construct;

    let mut catalog: Catalog<dyn ConstitutiveModel> = Catalog::new();
    catalog
        .register(ConstantPermeability::CATALOG_NAME, |name| {
            Box::new(ConstantPermeability::construct(name))
        })
        .expect("built-in catalog keys are distinct");
    catalog
        .register(ParallelPlatesPermeability::CATALOG_NAME, |name| {
            Box::new(ParallelPlatesPermeability::construct(name))
        })
        .expect("built-in catalog keys are distinct");
    catalog
        .register(ElasticIsotropic::CATALOG_NAME, |name| {
            Box::new(ElasticIsotropic::construct(name))
        })
        .expect("built-in catalog keys are distinct");
    catalog
        .register(ElasticTransverseIsotropic::CATALOG_NAME, |name| {
            Box::new(ElasticTransverseIsotropic::construct(name))
        })
        .expect("built-in catalog keys are distinct");
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_creates_under_its_own_key() {
        let catalog = standard_catalog();
        for key in catalog.names().map(str::to_string).collect::<Vec<_>>() {
            let model = catalog.create(&key, "probe").unwrap();
            assert_eq!(model.catalog_name(), key);
            assert_eq!(model.instance_name(), "probe");
        }
    }

    #[test]
    fn builtin_count_and_order() {
        let catalog = standard_catalog();
        let names: Vec<_> = catalog.names().collect();
        assert_eq!(
            names,
            vec![
                "ConstantPermeability",
                "ParallelPlatesPermeability",
                "ElasticIsotropic",
                "ElasticTransverseIsotropic",
            ]
        );
    }

    #[test]
    fn unknown_key_lists_builtins() {
        let catalog = standard_catalog();
        match catalog.create("GammaModel", "x") {
            Err(strata_catalog::CatalogError::UnknownName { requested, known }) => {
                assert_eq!(requested, "GammaModel");
                assert_eq!(known.len(), 4);
            }
            other => panic!("expected UnknownName, got {:?}", other.map(|_| ())),
        }
    }
}
