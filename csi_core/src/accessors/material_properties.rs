//! # Material Properties
//!
//! Material definitions and their mechanical properties. Every property call
//! takes a material temperature as its last argument; this accessor always
//! sends `0.0`, which the engine reads as "the material's only temperature".
//!
//! `set_material` is an upsert: a new name creates a material with the
//! engine's defaults for its type, an existing name is updated in place.

use super::{check_reported_count, name_list, read_info, with_info, Definitions};
use crate::engine::{Call, Dispatch, Interface};
use crate::enums::{ConcreteCurveType, HysteresisType, MaterialType, SteelCurveType, WeightOrMass};
use crate::errors::ApiResult;
use crate::values::{
    check_parallel, ConcreteProperties, IsotropicProperties, MaterialDamping, MaterialDefinition, SteelProperties,
    StressStrainCurve, WeightAndMass,
};

/// Temperature argument trailing every property call
const TEMPERATURE: f64 = 0.0;

pub struct MaterialProperties<'a> {
    engine: &'a dyn Dispatch,
}

impl<'a> MaterialProperties<'a> {
    pub fn new(engine: &'a dyn Dispatch) -> Self {
        MaterialProperties { engine }
    }

    /// Names of materials of one type
    pub fn name_list_of(&self, material_type: MaterialType) -> ApiResult<Vec<String>> {
        name_list(self.engine, Interface::PropMaterial, Some(material_type.code()))
    }

    /// Add a material from the engine's built-in library and return its name.
    ///
    /// An empty or already used `user_name` lets the engine choose a name.
    pub fn add_material(
        &self,
        material_type: MaterialType,
        region: &str,
        standard: &str,
        grade: &str,
        user_name: &str,
    ) -> ApiResult<String> {
        let mut reply = Call::new(Interface::PropMaterial, "AddMaterial")
            .out()
            .arg(material_type.code())
            .arg(region)
            .arg(standard)
            .arg(grade)
            .arg(user_name)
            .invoke(self.engine)?;
        reply.string(0)
    }

    pub fn material(&self, name: &str) -> ApiResult<MaterialDefinition> {
        let mut reply = Call::new(Interface::PropMaterial, "GetMaterial")
            .arg(name)
            .outs(4)
            .invoke(self.engine)?;
        Ok(MaterialDefinition {
            material_type: MaterialType::from_code(reply.i32(1)?)?,
            info: read_info(&mut reply, 2)?,
        })
    }

    pub fn set_material(&self, name: &str, definition: &MaterialDefinition) -> ApiResult<()> {
        let call = Call::new(Interface::PropMaterial, "SetMaterial")
            .arg(name)
            .arg(definition.material_type.code());
        with_info(call, &definition.info).invoke(self.engine)?;
        Ok(())
    }

    pub fn isotropic(&self, name: &str) -> ApiResult<IsotropicProperties> {
        let mut reply = Call::new(Interface::PropMaterial, "GetMPIsotropic")
            .arg(name)
            .outs(4)
            .arg(TEMPERATURE)
            .invoke(self.engine)?;
        Ok(IsotropicProperties {
            elastic_modulus: reply.f64(1)?,
            poisson_ratio: reply.f64(2)?,
            thermal_coefficient: reply.f64(3)?,
            shear_modulus: reply.f64(4)?,
        })
    }

    /// The shear modulus is derived by the engine; the one in `props` is ignored
    pub fn set_isotropic(&self, name: &str, props: &IsotropicProperties) -> ApiResult<()> {
        Call::new(Interface::PropMaterial, "SetMPIsotropic")
            .arg(name)
            .arg(props.elastic_modulus)
            .arg(props.poisson_ratio)
            .arg(props.thermal_coefficient)
            .arg(TEMPERATURE)
            .invoke(self.engine)?;
        Ok(())
    }

    pub fn weight_and_mass(&self, name: &str) -> ApiResult<WeightAndMass> {
        let mut reply = Call::new(Interface::PropMaterial, "GetWeightAndMass")
            .arg(name)
            .outs(2)
            .arg(TEMPERATURE)
            .invoke(self.engine)?;
        Ok(WeightAndMass {
            weight_per_volume: reply.f64(1)?,
            mass_per_volume: reply.f64(2)?,
        })
    }

    /// Set either density; the engine derives the other one through gravity
    pub fn set_weight_and_mass(&self, name: &str, option: WeightOrMass, value: f64) -> ApiResult<()> {
        Call::new(Interface::PropMaterial, "SetWeightAndMass")
            .arg(name)
            .arg(option.code())
            .arg(value)
            .arg(TEMPERATURE)
            .invoke(self.engine)?;
        Ok(())
    }

    pub fn steel(&self, name: &str) -> ApiResult<SteelProperties> {
        let mut reply = Call::new(Interface::PropMaterial, "GetOSteel")
            .arg(name)
            .outs(9)
            .arg(TEMPERATURE)
            .invoke(self.engine)?;
        Ok(SteelProperties {
            fy: reply.f64(1)?,
            fu: reply.f64(2)?,
            effective_fy: reply.f64(3)?,
            effective_fu: reply.f64(4)?,
            curve_type: SteelCurveType::from_code(reply.i32(5)?)?,
            hysteresis: HysteresisType::from_code(reply.i32(6)?)?,
            strain_at_hardening: reply.f64(7)?,
            strain_at_max_stress: reply.f64(8)?,
            strain_at_rupture: reply.f64(9)?,
        })
    }

    pub fn set_steel(&self, name: &str, props: &SteelProperties) -> ApiResult<()> {
        Call::new(Interface::PropMaterial, "SetOSteel")
            .arg(name)
            .arg(props.fy)
            .arg(props.fu)
            .arg(props.effective_fy)
            .arg(props.effective_fu)
            .arg(props.curve_type.code())
            .arg(props.hysteresis.code())
            .arg(props.strain_at_hardening)
            .arg(props.strain_at_max_stress)
            .arg(props.strain_at_rupture)
            .arg(TEMPERATURE)
            .invoke(self.engine)?;
        Ok(())
    }

    pub fn concrete(&self, name: &str) -> ApiResult<ConcreteProperties> {
        let mut reply = Call::new(Interface::PropMaterial, "GetOConcrete")
            .arg(name)
            .outs(9)
            .arg(TEMPERATURE)
            .invoke(self.engine)?;
        Ok(ConcreteProperties {
            fc: reply.f64(1)?,
            is_lightweight: reply.bool(2)?,
            shear_strength_factor: reply.f64(3)?,
            curve_type: ConcreteCurveType::from_code(reply.i32(4)?)?,
            hysteresis: HysteresisType::from_code(reply.i32(5)?)?,
            strain_at_fc: reply.f64(6)?,
            strain_ultimate: reply.f64(7)?,
            friction_angle: reply.f64(8)?,
            dilatational_angle: reply.f64(9)?,
        })
    }

    pub fn set_concrete(&self, name: &str, props: &ConcreteProperties) -> ApiResult<()> {
        Call::new(Interface::PropMaterial, "SetOConcrete")
            .arg(name)
            .arg(props.fc)
            .arg(props.is_lightweight)
            .arg(props.shear_strength_factor)
            .arg(props.curve_type.code())
            .arg(props.hysteresis.code())
            .arg(props.strain_at_fc)
            .arg(props.strain_ultimate)
            .arg(props.friction_angle)
            .arg(props.dilatational_angle)
            .arg(TEMPERATURE)
            .invoke(self.engine)?;
        Ok(())
    }

    pub fn stress_strain_curve(&self, name: &str) -> ApiResult<StressStrainCurve> {
        let mut reply = Call::new(Interface::PropMaterial, "GetSSCurve")
            .arg(name)
            .outs(4)
            .arg(TEMPERATURE)
            .invoke(self.engine)?;
        let n = reply.i32(1)?;
        let point_ids = reply.ints(2)?;
        let strains = reply.doubles(3)?;
        let stresses = reply.doubles(4)?;
        check_reported_count("point_ids", n, point_ids.len())?;
        StressStrainCurve::from_arrays(&point_ids, &strains, &stresses)
    }

    /// Set a user curve from parallel arrays.
    ///
    /// `point_ids`, `strains` and `stresses` must share one length; the check
    /// happens before the engine is called.
    pub fn set_stress_strain_curve(
        &self,
        name: &str,
        point_ids: &[i32],
        strains: &[f64],
        stresses: &[f64],
    ) -> ApiResult<()> {
        let n = check_parallel(&[
            ("point_ids", point_ids.len()),
            ("strains", strains.len()),
            ("stresses", stresses.len()),
        ])?;
        Call::new(Interface::PropMaterial, "SetSSCurve")
            .arg(name)
            .arg(n as i32)
            .arg(point_ids.to_vec())
            .arg(strains.to_vec())
            .arg(stresses.to_vec())
            .arg(TEMPERATURE)
            .invoke(self.engine)?;
        Ok(())
    }

    pub fn set_curve(&self, name: &str, curve: &StressStrainCurve) -> ApiResult<()> {
        let (ids, strains, stresses) = curve.to_arrays();
        self.set_stress_strain_curve(name, &ids, &strains, &stresses)
    }

    pub fn damping(&self, name: &str) -> ApiResult<MaterialDamping> {
        let mut reply = Call::new(Interface::PropMaterial, "GetDamping")
            .arg(name)
            .outs(5)
            .arg(TEMPERATURE)
            .invoke(self.engine)?;
        Ok(MaterialDamping {
            modal_ratio: reply.f64(1)?,
            viscous_mass_coefficient: reply.f64(2)?,
            viscous_stiffness_coefficient: reply.f64(3)?,
            hysteretic_mass_coefficient: reply.f64(4)?,
            hysteretic_stiffness_coefficient: reply.f64(5)?,
        })
    }

    pub fn set_damping(&self, name: &str, damping: &MaterialDamping) -> ApiResult<()> {
        Call::new(Interface::PropMaterial, "SetDamping")
            .arg(name)
            .arg(damping.modal_ratio)
            .arg(damping.viscous_mass_coefficient)
            .arg(damping.viscous_stiffness_coefficient)
            .arg(damping.hysteretic_mass_coefficient)
            .arg(damping.hysteretic_stiffness_coefficient)
            .arg(TEMPERATURE)
            .invoke(self.engine)?;
        Ok(())
    }
}

impl Definitions for MaterialProperties<'_> {
    const INTERFACE: Interface = Interface::PropMaterial;

    fn engine(&self) -> &dyn Dispatch {
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineVersion, MemoryEngine};
    use crate::errors::ApiError;
    use crate::values::{DefinitionInfo, StressStrainPoint};

    fn engine() -> MemoryEngine {
        MemoryEngine::new(EngineVersion::Sap2000V19)
    }

    #[test]
    fn test_set_material_upserts() {
        let engine = engine();
        let materials = MaterialProperties::new(&engine);
        let mut def = MaterialDefinition {
            material_type: MaterialType::Concrete,
            info: DefinitionInfo { color: 42, notes: "slab".to_string(), guid: "g-1".to_string() },
        };
        materials.set_material("C4", &def).unwrap();
        assert_eq!(materials.material("C4").unwrap(), def);

        def.info.notes = "deck".to_string();
        materials.set_material("C4", &def).unwrap();
        assert_eq!(materials.count().unwrap(), 1);
        assert_eq!(materials.material("C4").unwrap().info.notes, "deck");
    }

    #[test]
    fn test_isotropic_roundtrip_reports_shear_modulus() {
        let engine = engine();
        let materials = MaterialProperties::new(&engine);
        materials.set_material("S1", &MaterialDefinition::new(MaterialType::Steel)).unwrap();
        let props = IsotropicProperties::new(29_000.0, 0.3, 6.5e-6);
        materials.set_isotropic("S1", &props).unwrap();
        assert_eq!(materials.isotropic("S1").unwrap(), props);
    }

    #[test]
    fn test_steel_roundtrip() {
        let engine = engine();
        let materials = MaterialProperties::new(&engine);
        materials.set_material("A992", &MaterialDefinition::new(MaterialType::Steel)).unwrap();
        let steel = SteelProperties {
            fy: 55.0,
            ..SteelProperties::a992()
        };
        materials.set_steel("A992", &steel).unwrap();
        assert_eq!(materials.steel("A992").unwrap(), steel);
        assert!(materials.concrete("A992").unwrap_err().is_call_failure());
    }

    #[test]
    fn test_curve_length_checked_locally() {
        let engine = engine();
        let materials = MaterialProperties::new(&engine);
        let err = materials
            .set_stress_strain_curve("S1", &[0, 1], &[0.0, 0.002], &[0.0])
            .unwrap_err();
        assert_eq!(err, ApiError::length_mismatch("stresses", 2, 1));
        assert_eq!(engine.call_count(), 0);
    }

    #[test]
    fn test_curve_roundtrip() {
        let engine = engine();
        let materials = MaterialProperties::new(&engine);
        materials.set_material("S1", &MaterialDefinition::new(MaterialType::Steel)).unwrap();
        let curve = StressStrainCurve::new(vec![
            StressStrainPoint { point_id: 0, strain: 0.0, stress: 0.0 },
            StressStrainPoint { point_id: 1, strain: 0.0017, stress: 50.0 },
            StressStrainPoint { point_id: 3, strain: 0.1, stress: 65.0 },
        ]);
        materials.set_curve("S1", &curve).unwrap();
        assert_eq!(materials.stress_strain_curve("S1").unwrap(), curve);
    }

    #[test]
    fn test_filtered_name_list() {
        let engine = engine();
        let materials = MaterialProperties::new(&engine);
        materials.add_material(MaterialType::Steel, "United States", "ASTM A992", "Grade 50", "").unwrap();
        materials.add_material(MaterialType::Concrete, "United States", "Customary", "f'c 4000 psi", "4000Psi").unwrap();
        assert_eq!(materials.name_list_of(MaterialType::Concrete).unwrap(), vec!["4000Psi"]);
        assert_eq!(materials.name_list().unwrap().len(), 2);
        assert!(materials.name_list_of(MaterialType::Tendon).unwrap().is_empty());
    }

    #[test]
    fn test_weight_and_mass() {
        let engine = engine();
        let materials = MaterialProperties::new(&engine);
        materials.set_material("C1", &MaterialDefinition::new(MaterialType::Concrete)).unwrap();
        materials.set_weight_and_mass("C1", WeightOrMass::Weight, 8.68e-5).unwrap();
        let wm = materials.weight_and_mass("C1").unwrap();
        assert_eq!(wm.weight_per_volume, 8.68e-5);
        assert!((wm.mass_per_volume - 8.68e-5 / 386.088_6).abs() < 1e-12);
    }
}
