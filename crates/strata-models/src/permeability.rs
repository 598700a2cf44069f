//! Permeability models: per-entity permeability tensor diagonals.

use strata_core::InputFlag;
use strata_store::{Array, Construct, Group, Member, StoreError};

use crate::base::ConstitutiveModel;

/// Field name: the user-supplied diagonal components.
const COMPONENTS: &str = "permeabilityComponents";
/// Field name: per-entity permeability state, `[entities, 3]`.
const PERMEABILITY: &str = "permeability";
/// Field name: per-entity hydraulic aperture.
const APERTURE: &str = "aperture";
/// Field name: exponent of the aperture law.
const APERTURE_EXPONENT: &str = "apertureExponent";

/// Spatially uniform permeability.
///
/// The input document supplies three diagonal components; every entity's
/// permeability row is a copy of them. Updates during time stepping are
/// no-ops — the tensor never evolves.
pub struct ConstantPermeability {
    group: Group,
}

impl ConstantPermeability {
    /// Catalog key for this model.
    pub const CATALOG_NAME: &'static str = "ConstantPermeability";

    /// The user-supplied diagonal components `(xx, yy, zz)`.
    pub fn components(&self) -> Result<[f64; 3], StoreError> {
        let values = self.group.get_array::<f64>(COMPONENTS)?;
        Ok([values.values()[0], values.values()[1], values.values()[2]])
    }

    /// Per-entity permeability state, `[entities, 3]`.
    pub fn permeability(&self) -> Result<&Array<f64>, StoreError> {
        self.group.get_array::<f64>(PERMEABILITY)
    }

    /// Copy the input components into every entity's permeability row.
    pub fn update(&mut self) -> Result<(), StoreError> {
        let components = self.components()?;
        let state = self.group.get_array_mut::<f64>(PERMEABILITY)?;
        for row in 0..state.shape()[0] {
            state.row_mut(row).copy_from_slice(&components);
        }
        Ok(())
    }
}

impl Member for ConstantPermeability {
    fn group(&self) -> &Group {
        &self.group
    }

    fn group_mut(&mut self) -> &mut Group {
        &mut self.group
    }

    fn process_input(&mut self) -> Result<(), StoreError> {
        let supplied = self.group.get_array::<f64>(COMPONENTS)?.len();
        if supplied != 3 {
            return Err(StoreError::InvalidValue {
                path: self.group.path().to_string(),
                detail: format!("{COMPONENTS} expects 3 values, got {supplied}"),
            });
        }
        Ok(())
    }
}

impl Construct for ConstantPermeability {
    fn construct(name: &str) -> Self {
        let mut group = Group::new(name);
        group
            .register_field::<f64>(COMPONENTS)
            .expect("fresh group")
            .set_extent(3)
            .set_input_flag(InputFlag::Required)
            .set_description("Diagonal permeability components (xx, yy, zz) [m^2]");
        group
            .register_field::<f64>(PERMEABILITY)
            .expect("fresh group")
            .set_components(3)
            .set_description("Per-entity permeability tensor diagonal [m^2]");
        Self { group }
    }
}

impl ConstitutiveModel for ConstantPermeability {
    fn catalog_name(&self) -> &'static str {
        Self::CATALOG_NAME
    }
}

/// Aperture-driven fracture permeability.
///
/// Each entity carries a hydraulic aperture `w`; the update applies the
/// parallel-plates law `k = w^e / 12` (cubic by default) to every
/// diagonal component. The aperture itself is written by the coupled
/// mechanics kernels between updates.
pub struct ParallelPlatesPermeability {
    group: Group,
}

impl ParallelPlatesPermeability {
    /// Catalog key for this model.
    pub const CATALOG_NAME: &'static str = "ParallelPlatesPermeability";

    /// Exponent of the aperture law (3.0 unless overridden by input).
    pub fn aperture_exponent(&self) -> Result<f64, StoreError> {
        Ok(*self.group.get_array::<f64>(APERTURE_EXPONENT)?.value())
    }

    /// Per-entity hydraulic aperture, mutable — written by kernels.
    pub fn aperture_mut(&mut self) -> Result<&mut Array<f64>, StoreError> {
        self.group.get_array_mut::<f64>(APERTURE)
    }

    /// Per-entity permeability state, `[entities, 3]`.
    pub fn permeability(&self) -> Result<&Array<f64>, StoreError> {
        self.group.get_array::<f64>(PERMEABILITY)
    }

    /// Recompute every entity's permeability from its current aperture.
    pub fn update(&mut self) -> Result<(), StoreError> {
        let exponent = self.aperture_exponent()?;
        let apertures = self.group.get_array::<f64>(APERTURE)?.values().to_vec();
        let state = self.group.get_array_mut::<f64>(PERMEABILITY)?;
        for (row, aperture) in apertures.iter().enumerate() {
            let value = aperture.powf(exponent) / 12.0;
            state.row_mut(row).fill(value);
        }
        Ok(())
    }
}

impl Member for ParallelPlatesPermeability {
    fn group(&self) -> &Group {
        &self.group
    }

    fn group_mut(&mut self) -> &mut Group {
        &mut self.group
    }

    fn process_input(&mut self) -> Result<(), StoreError> {
        let exponent = self.aperture_exponent()?;
        if !exponent.is_finite() || exponent <= 0.0 {
            return Err(StoreError::InvalidValue {
                path: self.group.path().to_string(),
                detail: format!("{APERTURE_EXPONENT} must be finite and positive, got {exponent}"),
            });
        }
        Ok(())
    }
}

impl Construct for ParallelPlatesPermeability {
    fn construct(name: &str) -> Self {
        let mut group = Group::new(name);
        group
            .register_field::<f64>(APERTURE_EXPONENT)
            .expect("fresh group")
            .set_default(3.0)
            .set_input_flag(InputFlag::Optional)
            .set_description("Exponent of the aperture-permeability law");
        group
            .register_field::<f64>(APERTURE)
            .expect("fresh group")
            .set_per_entity()
            .set_description("Per-entity hydraulic aperture [m]");
        group
            .register_field::<f64>(PERMEABILITY)
            .expect("fresh group")
            .set_components(3)
            .set_description("Per-entity permeability tensor diagonal [m^2]");
        Self { group }
    }
}

impl ConstitutiveModel for ParallelPlatesPermeability {
    fn catalog_name(&self) -> &'static str {
        Self::CATALOG_NAME
    }
}
