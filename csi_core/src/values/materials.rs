//! Material property records.

use serde::{Deserialize, Serialize};

use super::{check_parallel, DefinitionInfo};
use crate::enums::{ConcreteCurveType, HysteresisType, MaterialType, SteelCurveType};
use crate::errors::ApiResult;

/// Material type plus display metadata (`PropMaterial.GetMaterial`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDefinition {
    pub material_type: MaterialType,
    pub info: DefinitionInfo,
}

impl MaterialDefinition {
    pub fn new(material_type: MaterialType) -> Self {
        MaterialDefinition {
            material_type,
            info: DefinitionInfo::default(),
        }
    }
}

/// Isotropic mechanical properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsotropicProperties {
    /// Modulus of elasticity E
    pub elastic_modulus: f64,
    /// Poisson's ratio
    pub poisson_ratio: f64,
    /// Coefficient of thermal expansion
    pub thermal_coefficient: f64,
    /// Shear modulus G, reported by the engine; ignored when setting
    #[serde(default)]
    pub shear_modulus: f64,
}

impl IsotropicProperties {
    /// Build from E, ν and α; G follows from E / (2(1 + ν))
    pub fn new(elastic_modulus: f64, poisson_ratio: f64, thermal_coefficient: f64) -> Self {
        IsotropicProperties {
            elastic_modulus,
            poisson_ratio,
            thermal_coefficient,
            shear_modulus: shear_modulus(elastic_modulus, poisson_ratio),
        }
    }
}

pub(crate) fn shear_modulus(elastic_modulus: f64, poisson_ratio: f64) -> f64 {
    elastic_modulus / (2.0 * (1.0 + poisson_ratio))
}

/// Weight and mass per unit volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightAndMass {
    pub weight_per_volume: f64,
    pub mass_per_volume: f64,
}

/// Other properties for steel materials (`PropMaterial.SetOSteel`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteelProperties {
    /// Minimum yield stress
    pub fy: f64,
    /// Minimum tensile stress
    pub fu: f64,
    /// Expected yield stress
    pub effective_fy: f64,
    /// Expected tensile stress
    pub effective_fu: f64,
    pub curve_type: SteelCurveType,
    pub hysteresis: HysteresisType,
    pub strain_at_hardening: f64,
    pub strain_at_max_stress: f64,
    pub strain_at_rupture: f64,
}

impl SteelProperties {
    /// ASTM A992 in kip/in units with SAP2000 default strain limits
    pub fn a992() -> Self {
        SteelProperties {
            fy: 50.0,
            fu: 65.0,
            effective_fy: 55.0,
            effective_fu: 71.5,
            curve_type: SteelCurveType::ParametricSimple,
            hysteresis: HysteresisType::Kinematic,
            strain_at_hardening: 0.015,
            strain_at_max_stress: 0.11,
            strain_at_rupture: 0.17,
        }
    }
}

/// Other properties for concrete materials (`PropMaterial.SetOConcrete`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcreteProperties {
    /// Specified compressive strength f'c
    pub fc: f64,
    pub is_lightweight: bool,
    /// Shear strength reduction factor for lightweight concrete
    pub shear_strength_factor: f64,
    pub curve_type: ConcreteCurveType,
    pub hysteresis: HysteresisType,
    /// Strain at f'c
    pub strain_at_fc: f64,
    pub strain_ultimate: f64,
    /// Drucker-Prager friction angle, degrees
    pub friction_angle: f64,
    /// Drucker-Prager dilatational angle, degrees
    pub dilatational_angle: f64,
}

impl ConcreteProperties {
    /// Normal-weight concrete with SAP2000 default strain limits
    pub fn normal_weight(fc: f64) -> Self {
        ConcreteProperties {
            fc,
            is_lightweight: false,
            shear_strength_factor: 0.0,
            curve_type: ConcreteCurveType::Mander,
            hysteresis: HysteresisType::Takeda,
            strain_at_fc: 0.002219,
            strain_ultimate: 0.005,
            friction_angle: 0.0,
            dilatational_angle: 0.0,
        }
    }
}

/// One point on a user stress-strain curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressStrainPoint {
    /// Engine point marker (0 = none, ±1 = A, ±2 = B, ...)
    pub point_id: i32,
    pub strain: f64,
    pub stress: f64,
}

/// A user stress-strain curve, positive and negative branches together
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StressStrainCurve {
    pub points: Vec<StressStrainPoint>,
}

impl StressStrainCurve {
    pub fn new(points: Vec<StressStrainPoint>) -> Self {
        StressStrainCurve { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Split into the parallel `PointID`, `Strain`, `Stress` arrays
    pub fn to_arrays(&self) -> (Vec<i32>, Vec<f64>, Vec<f64>) {
        let ids = self.points.iter().map(|p| p.point_id).collect();
        let strains = self.points.iter().map(|p| p.strain).collect();
        let stresses = self.points.iter().map(|p| p.stress).collect();
        (ids, strains, stresses)
    }

    /// Rebuild from parallel arrays; they must share one length
    pub fn from_arrays(point_ids: &[i32], strains: &[f64], stresses: &[f64]) -> ApiResult<Self> {
        check_parallel(&[
            ("point_ids", point_ids.len()),
            ("strains", strains.len()),
            ("stresses", stresses.len()),
        ])?;
        let points = point_ids
            .iter()
            .zip(strains)
            .zip(stresses)
            .map(|((&point_id, &strain), &stress)| StressStrainPoint { point_id, strain, stress })
            .collect();
        Ok(StressStrainCurve { points })
    }
}

/// Material damping (`PropMaterial.SetDamping`)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialDamping {
    pub modal_ratio: f64,
    pub viscous_mass_coefficient: f64,
    pub viscous_stiffness_coefficient: f64,
    pub hysteretic_mass_coefficient: f64,
    pub hysteretic_stiffness_coefficient: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ApiError;

    #[test]
    fn test_isotropic_shear_modulus() {
        let props = IsotropicProperties::new(29000.0, 0.3, 6.5e-6);
        assert!((props.shear_modulus - 11153.846).abs() < 1e-3);
    }

    #[test]
    fn test_curve_arrays_roundtrip() {
        let curve = StressStrainCurve::new(vec![
            StressStrainPoint { point_id: -1, strain: -0.002, stress: -4.0 },
            StressStrainPoint { point_id: 0, strain: 0.0, stress: 0.0 },
            StressStrainPoint { point_id: 1, strain: 0.0017, stress: 50.0 },
        ]);
        let (ids, strains, stresses) = curve.to_arrays();
        assert_eq!(ids, vec![-1, 0, 1]);
        assert_eq!(StressStrainCurve::from_arrays(&ids, &strains, &stresses).unwrap(), curve);
    }

    #[test]
    fn test_curve_rejects_ragged_arrays() {
        let err = StressStrainCurve::from_arrays(&[0, 1], &[0.0, 0.1], &[0.0]).unwrap_err();
        assert_eq!(err, ApiError::length_mismatch("stresses", 2, 1));
    }

    #[test]
    fn test_presets() {
        assert_eq!(SteelProperties::a992().fy, 50.0);
        assert!(!ConcreteProperties::normal_weight(4.0).is_lightweight);
    }
}
