//! Solid models: elastic stiffness from user moduli, per-entity stress.

use strata_core::InputFlag;
use strata_store::{Construct, Group, Member, StoreError};

use crate::base::ConstitutiveModel;

const YOUNG_MODULUS: &str = "defaultYoungModulus";
const POISSON_RATIO: &str = "defaultPoissonRatio";
const BULK_MODULUS: &str = "bulkModulus";
const SHEAR_MODULUS: &str = "shearModulus";
const MEAN_STRESS: &str = "meanStress";

const YOUNG_TRANSVERSE: &str = "defaultYoungModulusTransverse";
const YOUNG_AXIAL: &str = "defaultYoungModulusAxial";
const POISSON_TRANSVERSE: &str = "defaultPoissonRatioTransverse";
const POISSON_AXIAL_TRANSVERSE: &str = "defaultPoissonRatioAxialTransverse";
const SHEAR_AXIAL_TRANSVERSE: &str = "defaultShearModulusAxialTransverse";
const SHEAR_TRANSVERSE: &str = "shearModulusTransverse";
const AXIAL_STRESS: &str = "axialStress";

/// Isotropic linear elasticity.
///
/// Input supplies Young's modulus and Poisson's ratio; the post-input
/// hook derives bulk and shear moduli. Per-entity state is the mean
/// stress, advanced by volumetric strain increments.
pub struct ElasticIsotropic {
    group: Group,
}

impl ElasticIsotropic {
    /// Catalog key for this model.
    pub const CATALOG_NAME: &'static str = "ElasticIsotropic";

    /// Derived bulk modulus `K = E / 3(1 - 2v)`.
    pub fn bulk_modulus(&self) -> Result<f64, StoreError> {
        Ok(*self.group.get_array::<f64>(BULK_MODULUS)?.value())
    }

    /// Derived shear modulus `G = E / 2(1 + v)`.
    pub fn shear_modulus(&self) -> Result<f64, StoreError> {
        Ok(*self.group.get_array::<f64>(SHEAR_MODULUS)?.value())
    }

    /// Per-entity mean stress.
    pub fn mean_stress(&self) -> Result<&[f64], StoreError> {
        Ok(self.group.get_array::<f64>(MEAN_STRESS)?.values())
    }

    /// Advance every entity's mean stress by `K * dEps_v`.
    ///
    /// # Panics
    ///
    /// Panics if `volumetric_strain` does not hold one increment per
    /// entity.
    pub fn update_mean_stress(&mut self, volumetric_strain: &[f64]) -> Result<(), StoreError> {
        let bulk = self.bulk_modulus()?;
        let stress = self.group.get_array_mut::<f64>(MEAN_STRESS)?;
        assert_eq!(
            volumetric_strain.len(),
            stress.len(),
            "one strain increment per entity"
        );
        for (sigma, d_eps) in stress.values_mut().iter_mut().zip(volumetric_strain) {
            *sigma += bulk * d_eps;
        }
        Ok(())
    }
}

impl Member for ElasticIsotropic {
    fn group(&self) -> &Group {
        &self.group
    }

    fn group_mut(&mut self) -> &mut Group {
        &mut self.group
    }

    fn process_input(&mut self) -> Result<(), StoreError> {
        let young = *self.group.get_array::<f64>(YOUNG_MODULUS)?.value();
        let poisson = *self.group.get_array::<f64>(POISSON_RATIO)?.value();
        if !young.is_finite() || young <= 0.0 {
            return Err(StoreError::InvalidValue {
                path: self.group.path().to_string(),
                detail: format!("{YOUNG_MODULUS} must be finite and positive, got {young}"),
            });
        }
        if !(poisson > -1.0 && poisson < 0.5) {
            return Err(StoreError::InvalidValue {
                path: self.group.path().to_string(),
                detail: format!("{POISSON_RATIO} must lie in (-1, 0.5), got {poisson}"),
            });
        }
        let bulk = young / (3.0 * (1.0 - 2.0 * poisson));
        let shear = young / (2.0 * (1.0 + poisson));
        self.group
            .get_array_mut::<f64>(BULK_MODULUS)?
            .set_value(bulk);
        self.group
            .get_array_mut::<f64>(SHEAR_MODULUS)?
            .set_value(shear);
        Ok(())
    }
}

impl Construct for ElasticIsotropic {
    fn construct(name: &str) -> Self {
        let mut group = Group::new(name);
        group
            .register_field::<f64>(YOUNG_MODULUS)
            .expect("fresh group")
            .set_input_flag(InputFlag::Required)
            .set_description("Young's modulus [Pa]");
        group
            .register_field::<f64>(POISSON_RATIO)
            .expect("fresh group")
            .set_input_flag(InputFlag::Required)
            .set_description("Poisson's ratio");
        group
            .register_field::<f64>(BULK_MODULUS)
            .expect("fresh group")
            .set_description("Derived bulk modulus [Pa]");
        group
            .register_field::<f64>(SHEAR_MODULUS)
            .expect("fresh group")
            .set_description("Derived shear modulus [Pa]");
        group
            .register_field::<f64>(MEAN_STRESS)
            .expect("fresh group")
            .set_per_entity()
            .set_description("Per-entity mean stress [Pa]");
        Self { group }
    }
}

impl ConstitutiveModel for ElasticIsotropic {
    fn catalog_name(&self) -> &'static str {
        Self::CATALOG_NAME
    }
}

/// Transversely isotropic linear elasticity.
///
/// Five user moduli describe the transverse plane and the axis normal to
/// it. The hook validates them and derives the in-plane shear modulus
/// (the plane itself is isotropic, so `G_t = E_t / 2(1 + v_t)` holds
/// exactly). Per-entity state is the axial stress, advanced by axial
/// strain increments under a uniaxial-stress assumption.
pub struct ElasticTransverseIsotropic {
    group: Group,
}

impl ElasticTransverseIsotropic {
    /// Catalog key for this model.
    pub const CATALOG_NAME: &'static str = "ElasticTransverseIsotropic";

    /// The axial Young's modulus supplied by input.
    pub fn axial_modulus(&self) -> Result<f64, StoreError> {
        Ok(*self.group.get_array::<f64>(YOUNG_AXIAL)?.value())
    }

    /// Derived in-plane shear modulus.
    pub fn transverse_shear_modulus(&self) -> Result<f64, StoreError> {
        Ok(*self.group.get_array::<f64>(SHEAR_TRANSVERSE)?.value())
    }

    /// Per-entity axial stress.
    pub fn axial_stress(&self) -> Result<&[f64], StoreError> {
        Ok(self.group.get_array::<f64>(AXIAL_STRESS)?.values())
    }

    /// Advance every entity's axial stress by `E_a * dEps_a`.
    ///
    /// # Panics
    ///
    /// Panics if `axial_strain` does not hold one increment per entity.
    pub fn update_axial_stress(&mut self, axial_strain: &[f64]) -> Result<(), StoreError> {
        let axial = self.axial_modulus()?;
        let stress = self.group.get_array_mut::<f64>(AXIAL_STRESS)?;
        assert_eq!(
            axial_strain.len(),
            stress.len(),
            "one strain increment per entity"
        );
        for (sigma, d_eps) in stress.values_mut().iter_mut().zip(axial_strain) {
            *sigma += axial * d_eps;
        }
        Ok(())
    }
}

impl Member for ElasticTransverseIsotropic {
    fn group(&self) -> &Group {
        &self.group
    }

    fn group_mut(&mut self) -> &mut Group {
        &mut self.group
    }

    fn process_input(&mut self) -> Result<(), StoreError> {
        for name in [YOUNG_TRANSVERSE, YOUNG_AXIAL, SHEAR_AXIAL_TRANSVERSE] {
            let value = *self.group.get_array::<f64>(name)?.value();
            if !value.is_finite() || value <= 0.0 {
                return Err(StoreError::InvalidValue {
                    path: self.group.path().to_string(),
                    detail: format!("{name} must be finite and positive, got {value}"),
                });
            }
        }
        let poisson_t = *self.group.get_array::<f64>(POISSON_TRANSVERSE)?.value();
        let poisson_at = *self
            .group
            .get_array::<f64>(POISSON_AXIAL_TRANSVERSE)?
            .value();
        if !(poisson_t > -1.0 && poisson_t < 0.5) {
            return Err(StoreError::InvalidValue {
                path: self.group.path().to_string(),
                detail: format!("{POISSON_TRANSVERSE} must lie in (-1, 0.5), got {poisson_t}"),
            });
        }
        if !(poisson_at > -1.0 && poisson_at < 1.0) {
            return Err(StoreError::InvalidValue {
                path: self.group.path().to_string(),
                detail: format!(
                    "{POISSON_AXIAL_TRANSVERSE} must lie in (-1, 1), got {poisson_at}"
                ),
            });
        }
        let young_t = *self.group.get_array::<f64>(YOUNG_TRANSVERSE)?.value();
        let shear_t = young_t / (2.0 * (1.0 + poisson_t));
        self.group
            .get_array_mut::<f64>(SHEAR_TRANSVERSE)?
            .set_value(shear_t);
        Ok(())
    }
}

impl Construct for ElasticTransverseIsotropic {
    fn construct(name: &str) -> Self {
        let mut group = Group::new(name);
        for (field, description) in [
            (YOUNG_TRANSVERSE, "Transverse-plane Young's modulus [Pa]"),
            (YOUNG_AXIAL, "Axial Young's modulus [Pa]"),
            (SHEAR_AXIAL_TRANSVERSE, "Axial-transverse shear modulus [Pa]"),
        ] {
            group
                .register_field::<f64>(field)
                .expect("fresh group")
                .set_input_flag(InputFlag::Required)
                .set_description(description);
        }
        group
            .register_field::<f64>(POISSON_TRANSVERSE)
            .expect("fresh group")
            .set_input_flag(InputFlag::Required)
            .set_description("In-plane Poisson's ratio");
        group
            .register_field::<f64>(POISSON_AXIAL_TRANSVERSE)
            .expect("fresh group")
            .set_input_flag(InputFlag::Required)
            .set_description("Axial-transverse Poisson's ratio");
        group
            .register_field::<f64>(SHEAR_TRANSVERSE)
            .expect("fresh group")
            .set_description("Derived in-plane shear modulus [Pa]");
        group
            .register_field::<f64>(AXIAL_STRESS)
            .expect("fresh group")
            .set_per_entity()
            .set_description("Per-entity axial stress [Pa]");
        Self { group }
    }
}

impl ConstitutiveModel for ElasticTransverseIsotropic {
    fn catalog_name(&self) -> &'static str {
        Self::CATALOG_NAME
    }
}
