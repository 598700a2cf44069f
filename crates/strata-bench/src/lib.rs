//! Benchmark profiles for the Strata data substrate.
//!
//! Provides pre-built trees of constitutive models for the criterion
//! benches: [`mixed_model_tree`] assembles alternating permeability
//! models with processed input and allocated per-entity state.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use strata_models::{
    select_permeability_mut, standard_catalog, ConstitutiveModel, PermeabilityVariantMut,
};
use strata_store::{Group, Member};

/// Build a tree with `models` permeability models of alternating concrete
/// type, each carrying `entities` rows of allocated state.
///
/// Even indices are `ConstantPermeability`, odd are
/// `ParallelPlatesPermeability`; all input is processed and state
/// updated once, so benches observe steady-state buffers.
pub fn mixed_model_tree(models: usize, entities: usize) -> Group {
    let catalog = standard_catalog();
    let mut root = Group::new("bench");
    let constitutive = root
        .register_group::<Group>("constitutive")
        .expect("fresh group");

    for i in 0..models {
        let key = if i % 2 == 0 {
            "ConstantPermeability"
        } else {
            "ParallelPlatesPermeability"
        };
        let name = format!("model{i}");
        let member = constitutive
            .create_child(&catalog, key, &name)
            .expect("distinct names");
        if i % 2 == 0 {
            member
                .group_mut()
                .register_field::<f64>("permeabilityComponents")
                .expect("registered at construction")
                .assign_slice(&[1e-15, 1e-15, 1e-16]);
        }
    }

    root.process_input_recursive().expect("inputs assigned");

    let constitutive = root
        .get_group_mut::<Group>("constitutive")
        .expect("built above");
    for i in 0..models {
        let member = constitutive
            .child_mut(&format!("model{i}"))
            .expect("built above");
        match select_permeability_mut(member).expect("in-set models only") {
            PermeabilityVariantMut::Constant(m) => {
                m.allocate_state(entities);
                m.update().expect("allocated");
            }
            PermeabilityVariantMut::ParallelPlates(m) => {
                m.allocate_state(entities);
                m.aperture_mut()
                    .expect("registered at construction")
                    .values_mut()
                    .fill(1e-4);
                m.update().expect("allocated");
            }
        }
    }

    root
}
