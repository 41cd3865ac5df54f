//! `PropMaterial` entry points.

use super::{change_name, color_or_default, delete, ensure, guid_or_new, name_list, Args, Fail, Outcome};
use crate::engine::model::{MaterialRecord, ModelData};
use crate::enums::{ConcreteCurveType, HysteresisType, MaterialType, SteelCurveType, WeightOrMass};
use crate::units::Units;
use crate::values::materials::shear_modulus;
use crate::values::{
    ConcreteProperties, DefinitionInfo, IsotropicProperties, MaterialDamping, MaterialDefinition, SteelProperties,
    StressStrainCurve,
};

/// Default mechanical values per material type, kip/in/F
struct Defaults {
    elastic_modulus: f64,
    poisson_ratio: f64,
    thermal_coefficient: f64,
    weight_per_volume: f64,
}

fn defaults_for(material_type: MaterialType) -> Defaults {
    match material_type {
        MaterialType::Concrete => Defaults {
            elastic_modulus: 3605.0,
            poisson_ratio: 0.2,
            thermal_coefficient: 5.5e-6,
            weight_per_volume: 8.681e-5,
        },
        MaterialType::Aluminum => Defaults {
            elastic_modulus: 10_000.0,
            poisson_ratio: 0.33,
            thermal_coefficient: 1.3e-5,
            weight_per_volume: 9.765e-5,
        },
        MaterialType::Masonry => Defaults {
            elastic_modulus: 1800.0,
            poisson_ratio: 0.2,
            thermal_coefficient: 4.5e-6,
            weight_per_volume: 6.944e-5,
        },
        MaterialType::ColdFormed => Defaults {
            elastic_modulus: 29_500.0,
            poisson_ratio: 0.3,
            thermal_coefficient: 6.5e-6,
            weight_per_volume: 2.836e-4,
        },
        MaterialType::Tendon => Defaults {
            elastic_modulus: 28_500.0,
            poisson_ratio: 0.3,
            thermal_coefficient: 6.5e-6,
            weight_per_volume: 2.836e-4,
        },
        MaterialType::Steel | MaterialType::Rebar | MaterialType::NoDesign => Defaults {
            elastic_modulus: 29_000.0,
            poisson_ratio: 0.3,
            thermal_coefficient: 6.5e-6,
            weight_per_volume: 2.836e-4,
        },
    }
}

/// Fresh record for a material type, expressed in `units`
fn new_record(material_type: MaterialType, info: DefinitionInfo, units: Units) -> MaterialRecord {
    let d = defaults_for(material_type);
    let base = Units::KipIn;
    let elastic_modulus = base.convert_stress(d.elastic_modulus, units);
    let weight_per_volume = base.convert_weight_density(d.weight_per_volume, units);

    let steel = (material_type == MaterialType::Steel).then(|| {
        let a992 = SteelProperties::a992();
        SteelProperties {
            fy: base.convert_stress(a992.fy, units),
            fu: base.convert_stress(a992.fu, units),
            effective_fy: base.convert_stress(a992.effective_fy, units),
            effective_fu: base.convert_stress(a992.effective_fu, units),
            ..a992
        }
    });
    let concrete = (material_type == MaterialType::Concrete)
        .then(|| ConcreteProperties::normal_weight(base.convert_stress(4.0, units)));

    MaterialRecord {
        definition: MaterialDefinition { material_type, info },
        isotropic: IsotropicProperties::new(
            elastic_modulus,
            d.poisson_ratio,
            base.convert_thermal_coefficient(d.thermal_coefficient, units),
        ),
        weight_per_volume,
        mass_per_volume: weight_per_volume / units.gravity(),
        steel,
        concrete,
        curve: StressStrainCurve::default(),
        damping: MaterialDamping::default(),
    }
}

/// Name for `AddMaterial` when the caller leaves it to the engine
fn generated_name(model: &ModelData, material_type: MaterialType, grade: &str) -> String {
    let stem: String = if grade.trim().is_empty() {
        material_type.label().to_string()
    } else {
        grade.chars().filter(|c| !c.is_whitespace()).collect()
    };
    if !model.materials.contains(&stem) {
        return stem;
    }
    (1..)
        .map(|n| format!("{}-{}", stem, n))
        .find(|candidate| !model.materials.contains(candidate))
        .unwrap_or(stem)
}

fn material_type(code: i32) -> Result<MaterialType, Fail> {
    MaterialType::from_code(code).map_err(|_| Fail)
}

fn record<'m>(model: &'m ModelData, args: &Args) -> Result<&'m MaterialRecord, Fail> {
    model.materials.get(&args.name(0)?).ok_or(Fail)
}

fn record_mut<'m>(model: &'m mut ModelData, args: &Args) -> Result<&'m mut MaterialRecord, Fail> {
    model.materials.get_mut(&args.name(0)?).ok_or(Fail)
}

pub(crate) fn prop_material(model: &mut ModelData, method: &str, args: &mut Args) -> Outcome {
    match method {
        "GetNameList" => {
            let filter = args.opt_i32(2, 0)?;
            name_list(&model.materials, args, |m| {
                filter == 0 || m.definition.material_type.code() == filter
            })
        }
        "ChangeName" => {
            let (from, to) = change_name(&mut model.materials, args)?;
            model.rename_material_references(&from, &to);
            Ok(())
        }
        "Delete" => {
            let name = args.name(0)?;
            let in_use = model.material_in_use(&name);
            delete(&mut model.materials, &name, in_use)
        }
        "AddMaterial" => {
            let kind = material_type(args.i32(1)?)?;
            let grade = args.opt_string(4)?;
            let requested = args.opt_string(5)?;
            let name = if requested.trim().is_empty() || model.materials.contains(&requested) {
                generated_name(model, kind, &grade)
            } else {
                requested
            };
            let info = DefinitionInfo {
                color: color_or_default(-1),
                notes: format!("{} {}", args.opt_string(3)?, grade).trim().to_string(),
                guid: guid_or_new(String::new()),
            };
            let record = new_record(kind, info, model.units);
            model.materials.upsert(name.clone(), record);
            args.set(0, name)
        }
        "SetMaterial" => {
            let name = args.name(0)?;
            let kind = material_type(args.i32(1)?)?;
            let info = DefinitionInfo {
                color: color_or_default(args.opt_i32(2, -1)?),
                notes: args.opt_string(3)?,
                guid: guid_or_new(args.opt_string(4)?),
            };
            let units = model.units;
            match model.materials.get_mut(&name) {
                Some(existing) if existing.definition.material_type == kind => existing.definition.info = info,
                // new name or changed type: start from the type's defaults
                _ => {
                    let record = new_record(kind, info, units);
                    model.materials.upsert(name, record);
                }
            }
            Ok(())
        }
        "GetMaterial" => {
            let m = record(model, args)?.definition.clone();
            args.set(1, m.material_type.code())?;
            args.set(2, m.info.color)?;
            args.set(3, m.info.notes)?;
            args.set(4, m.info.guid)
        }
        "SetMPIsotropic" => {
            let e = args.f64(1)?;
            let u = args.f64(2)?;
            let a = args.f64(3)?;
            ensure(e > 0.0 && (-1.0..0.5).contains(&u))?;
            record_mut(model, args)?.isotropic = IsotropicProperties::new(e, u, a);
            Ok(())
        }
        "GetMPIsotropic" => {
            let iso = record(model, args)?.isotropic;
            args.set(1, iso.elastic_modulus)?;
            args.set(2, iso.poisson_ratio)?;
            args.set(3, iso.thermal_coefficient)?;
            args.set(4, shear_modulus(iso.elastic_modulus, iso.poisson_ratio))
        }
        "SetWeightAndMass" => {
            let option = WeightOrMass::from_code(args.i32(1)?).map_err(|_| Fail)?;
            let value = args.f64(2)?;
            ensure(value >= 0.0)?;
            let g = model.units.gravity();
            let m = record_mut(model, args)?;
            match option {
                WeightOrMass::Weight => {
                    m.weight_per_volume = value;
                    m.mass_per_volume = value / g;
                }
                WeightOrMass::Mass => {
                    m.mass_per_volume = value;
                    m.weight_per_volume = value * g;
                }
            }
            Ok(())
        }
        "GetWeightAndMass" => {
            let m = record(model, args)?;
            let (w, mass) = (m.weight_per_volume, m.mass_per_volume);
            args.set(1, w)?;
            args.set(2, mass)
        }
        "SetOSteel" => {
            let steel = SteelProperties {
                fy: args.f64(1)?,
                fu: args.f64(2)?,
                effective_fy: args.f64(3)?,
                effective_fu: args.f64(4)?,
                curve_type: SteelCurveType::from_code(args.i32(5)?).map_err(|_| Fail)?,
                hysteresis: HysteresisType::from_code(args.i32(6)?).map_err(|_| Fail)?,
                strain_at_hardening: args.f64(7)?,
                strain_at_max_stress: args.f64(8)?,
                strain_at_rupture: args.f64(9)?,
            };
            ensure(steel.fy > 0.0 && steel.fu >= steel.fy)?;
            let m = record_mut(model, args)?;
            ensure(m.definition.material_type == MaterialType::Steel)?;
            m.steel = Some(steel);
            Ok(())
        }
        "GetOSteel" => {
            let steel = record(model, args)?.steel.ok_or(Fail)?;
            args.set(1, steel.fy)?;
            args.set(2, steel.fu)?;
            args.set(3, steel.effective_fy)?;
            args.set(4, steel.effective_fu)?;
            args.set(5, steel.curve_type.code())?;
            args.set(6, steel.hysteresis.code())?;
            args.set(7, steel.strain_at_hardening)?;
            args.set(8, steel.strain_at_max_stress)?;
            args.set(9, steel.strain_at_rupture)
        }
        "SetOConcrete" => {
            let concrete = ConcreteProperties {
                fc: args.f64(1)?,
                is_lightweight: args.bool(2)?,
                shear_strength_factor: args.f64(3)?,
                curve_type: ConcreteCurveType::from_code(args.i32(4)?).map_err(|_| Fail)?,
                hysteresis: HysteresisType::from_code(args.i32(5)?).map_err(|_| Fail)?,
                strain_at_fc: args.f64(6)?,
                strain_ultimate: args.f64(7)?,
                friction_angle: args.f64(8)?,
                dilatational_angle: args.f64(9)?,
            };
            ensure(concrete.fc > 0.0)?;
            let m = record_mut(model, args)?;
            ensure(m.definition.material_type == MaterialType::Concrete)?;
            m.concrete = Some(concrete);
            Ok(())
        }
        "GetOConcrete" => {
            let concrete = record(model, args)?.concrete.ok_or(Fail)?;
            args.set(1, concrete.fc)?;
            args.set(2, concrete.is_lightweight)?;
            args.set(3, concrete.shear_strength_factor)?;
            args.set(4, concrete.curve_type.code())?;
            args.set(5, concrete.hysteresis.code())?;
            args.set(6, concrete.strain_at_fc)?;
            args.set(7, concrete.strain_ultimate)?;
            args.set(8, concrete.friction_angle)?;
            args.set(9, concrete.dilatational_angle)
        }
        "SetSSCurve" => {
            let n = args.i32(1)?;
            let ids = args.ints(2)?;
            let strains = args.doubles(3)?;
            let stresses = args.doubles(4)?;
            ensure(n >= 0 && ids.len() == n as usize)?;
            let curve = StressStrainCurve::from_arrays(&ids, &strains, &stresses).map_err(|_| Fail)?;
            record_mut(model, args)?.curve = curve;
            Ok(())
        }
        "GetSSCurve" => {
            let (ids, strains, stresses) = record(model, args)?.curve.to_arrays();
            args.set(1, ids.len() as i32)?;
            args.set(2, ids)?;
            args.set(3, strains)?;
            args.set(4, stresses)
        }
        "SetDamping" => {
            let damping = MaterialDamping {
                modal_ratio: args.f64(1)?,
                viscous_mass_coefficient: args.f64(2)?,
                viscous_stiffness_coefficient: args.f64(3)?,
                hysteretic_mass_coefficient: args.f64(4)?,
                hysteretic_stiffness_coefficient: args.f64(5)?,
            };
            ensure(damping.modal_ratio >= 0.0)?;
            record_mut(model, args)?.damping = damping;
            Ok(())
        }
        "GetDamping" => {
            let d = record(model, args)?.damping;
            args.set(1, d.modal_ratio)?;
            args.set(2, d.viscous_mass_coefficient)?;
            args.set(3, d.viscous_stiffness_coefficient)?;
            args.set(4, d.hysteretic_mass_coefficient)?;
            args.set(5, d.hysteretic_stiffness_coefficient)
        }
        _ => Err(Fail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Program, Variant};

    fn model() -> ModelData {
        ModelData::new(Program::Sap2000, Units::KipIn)
    }

    fn add(model: &mut ModelData, kind: MaterialType, grade: &str, user_name: &str) -> String {
        let mut slots = [
            Variant::Empty,
            Variant::Int(kind.code()),
            Variant::Str("United States".into()),
            Variant::Str("ASTM".into()),
            Variant::Str(grade.into()),
            Variant::Str(user_name.into()),
        ];
        prop_material(model, "AddMaterial", &mut Args(&mut slots)).unwrap();
        slots[0].as_str().unwrap().to_string()
    }

    #[test]
    fn test_add_material_names() {
        let mut m = model();
        assert_eq!(add(&mut m, MaterialType::Steel, "Grade 50", ""), "Grade50");
        assert_eq!(add(&mut m, MaterialType::Steel, "Grade 50", ""), "Grade50-1");
        assert_eq!(add(&mut m, MaterialType::Concrete, "", "4000Psi"), "4000Psi");
        assert_eq!(add(&mut m, MaterialType::Concrete, "", ""), "Concrete");
        assert_eq!(m.materials.len(), 4);
    }

    #[test]
    fn test_add_material_defaults_follow_units() {
        let mut kip_in = model();
        let name = add(&mut kip_in, MaterialType::Steel, "Grade 50", "");
        let steel = kip_in.materials.get(&name).unwrap();
        assert_eq!(steel.isotropic.elastic_modulus, 29_000.0);
        assert_eq!(steel.steel.unwrap().fy, 50.0);
        assert!(steel.concrete.is_none());

        let mut kn_m = ModelData::new(Program::Sap2000, Units::KnM);
        let name = add(&mut kn_m, MaterialType::Steel, "Grade 50", "");
        let e = kn_m.materials.get(&name).unwrap().isotropic.elastic_modulus;
        // 29000 ksi ≈ 199.95 GPa
        assert!((e - 1.9995e8).abs() / 1.9995e8 < 1e-3);
    }

    #[test]
    fn test_weight_and_mass_stay_consistent() {
        let mut m = model();
        let name = add(&mut m, MaterialType::Concrete, "", "C1");
        let mut set = [Variant::Str(name.clone()), Variant::Int(2), Variant::Double(2.0e-7)];
        prop_material(&mut m, "SetWeightAndMass", &mut Args(&mut set)).unwrap();
        let record = m.materials.get(&name).unwrap();
        assert_eq!(record.mass_per_volume, 2.0e-7);
        assert!((record.weight_per_volume - 2.0e-7 * Units::KipIn.gravity()).abs() < 1e-15);
    }

    #[test]
    fn test_steel_properties_only_on_steel() {
        let mut m = model();
        let name = add(&mut m, MaterialType::Concrete, "", "C1");
        let mut slots: Vec<Variant> = vec![
            Variant::Str(name),
            Variant::Double(50.0),
            Variant::Double(65.0),
            Variant::Double(55.0),
            Variant::Double(71.5),
            Variant::Int(1),
            Variant::Int(1),
            Variant::Double(0.02),
            Variant::Double(0.1),
            Variant::Double(0.2),
        ];
        assert_eq!(prop_material(&mut m, "SetOSteel", &mut Args(&mut slots)), Err(Fail));
    }

    #[test]
    fn test_ss_curve_count_must_match() {
        let mut m = model();
        let name = add(&mut m, MaterialType::Steel, "", "S1");
        let mut slots = [
            Variant::Str(name),
            Variant::Int(3),
            Variant::IntArray(vec![0, 1]),
            Variant::DoubleArray(vec![0.0, 0.002]),
            Variant::DoubleArray(vec![0.0, 50.0]),
        ];
        assert_eq!(prop_material(&mut m, "SetSSCurve", &mut Args(&mut slots)), Err(Fail));
    }
}
