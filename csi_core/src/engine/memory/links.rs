//! `PropLink` entry points.

use super::{change_name, delete, ensure, guid_or_new, name_list, Args, Fail, Outcome};
use crate::engine::model::{LinkBehavior, LinkRecord, ModelData};
use crate::values::{
    Damping, DegreesOfFreedomLocal, Deformations, GapLinkProperties, LinearLinkProperties, LinkWeightAndMass,
    Stiffness,
};

fn dof(args: &Args, index: usize) -> Result<DegreesOfFreedomLocal, Fail> {
    DegreesOfFreedomLocal::from_array(&args.bools(index)?).map_err(|_| Fail)
}

/// Every flag set in `inner` is also set in `outer`
fn subset(inner: &DegreesOfFreedomLocal, outer: &DegreesOfFreedomLocal) -> bool {
    inner
        .to_array()
        .iter()
        .zip(outer.to_array())
        .all(|(i, o)| !*i || o)
}

fn store(model: &mut ModelData, name: String, behavior: LinkBehavior) {
    let weight_and_mass = model
        .links
        .get(&name)
        .map(|l| l.weight_and_mass)
        .unwrap_or_default();
    model.links.upsert(name, LinkRecord { behavior, weight_and_mass });
}

fn link<'m>(model: &'m ModelData, args: &Args) -> Result<&'m LinkRecord, Fail> {
    model.links.get(&args.name(0)?).ok_or(Fail)
}

pub(crate) fn prop_link(model: &mut ModelData, method: &str, args: &mut Args) -> Outcome {
    match method {
        "GetNameList" => {
            let filter = args.opt_i32(2, 0)?;
            name_list(&model.links, args, |l| filter == 0 || l.behavior.link_type().code() == filter)
        }
        "ChangeName" => {
            let (from, to) = change_name(&mut model.links, args)?;
            model.rename_link_references(&from, &to);
            Ok(())
        }
        "Delete" => {
            let name = args.name(0)?;
            let in_use = model.link_in_use(&name);
            delete(&mut model.links, &name, in_use)
        }
        "GetTypeOAPI" => {
            let code = link(model, args)?.behavior.link_type().code();
            args.set(1, code)
        }
        "SetLinear" => {
            let name = args.name(0)?;
            let props = LinearLinkProperties {
                dof: dof(args, 1)?,
                fixed: dof(args, 2)?,
                stiffness: Stiffness::from_array(&args.doubles(3)?).map_err(|_| Fail)?,
                damping: Damping::from_array(&args.doubles(4)?).map_err(|_| Fail)?,
                dj2: args.f64(5)?,
                dj3: args.f64(6)?,
                stiffness_coupled: args.bool(7)?,
                damping_coupled: args.bool(8)?,
                notes: args.opt_string(9)?,
                guid: guid_or_new(args.opt_string(10)?),
            };
            ensure(props.dof.any() && subset(&props.fixed, &props.dof))?;
            store(model, name, LinkBehavior::Linear(props));
            Ok(())
        }
        "GetLinear" => {
            let LinkBehavior::Linear(props) = link(model, args)?.behavior.clone() else {
                return Err(Fail);
            };
            args.set(1, props.dof.to_array())?;
            args.set(2, props.fixed.to_array())?;
            args.set(3, props.stiffness.to_array())?;
            args.set(4, props.damping.to_array())?;
            args.set(5, props.dj2)?;
            args.set(6, props.dj3)?;
            args.set(7, props.stiffness_coupled)?;
            args.set(8, props.damping_coupled)?;
            args.set(9, props.notes)?;
            args.set(10, props.guid)
        }
        "SetGap" => {
            let name = args.name(0)?;
            let props = GapLinkProperties {
                dof: dof(args, 1)?,
                fixed: dof(args, 2)?,
                nonlinear: dof(args, 3)?,
                effective_stiffness: Stiffness::from_array(&args.doubles(4)?).map_err(|_| Fail)?,
                effective_damping: Damping::from_array(&args.doubles(5)?).map_err(|_| Fail)?,
                stiffness: Stiffness::from_array(&args.doubles(6)?).map_err(|_| Fail)?,
                opening: Deformations::from_array(&args.doubles(7)?).map_err(|_| Fail)?,
                dj2: args.f64(8)?,
                dj3: args.f64(9)?,
                notes: args.opt_string(10)?,
                guid: guid_or_new(args.opt_string(11)?),
            };
            ensure(props.dof.any())?;
            ensure(subset(&props.fixed, &props.dof) && subset(&props.nonlinear, &props.dof))?;
            // a degree of freedom is either fixed or nonlinear
            let overlap = props
                .fixed
                .to_array()
                .iter()
                .zip(props.nonlinear.to_array())
                .any(|(f, n)| *f && n);
            ensure(!overlap)?;
            store(model, name, LinkBehavior::Gap(props));
            Ok(())
        }
        "GetGap" => {
            let LinkBehavior::Gap(props) = link(model, args)?.behavior.clone() else {
                return Err(Fail);
            };
            args.set(1, props.dof.to_array())?;
            args.set(2, props.fixed.to_array())?;
            args.set(3, props.nonlinear.to_array())?;
            args.set(4, props.effective_stiffness.to_array())?;
            args.set(5, props.effective_damping.to_array())?;
            args.set(6, props.stiffness.to_array())?;
            args.set(7, props.opening.to_array())?;
            args.set(8, props.dj2)?;
            args.set(9, props.dj3)?;
            args.set(10, props.notes)?;
            args.set(11, props.guid)
        }
        "SetWeightAndMass" => {
            let wm = LinkWeightAndMass {
                weight: args.f64(1)?,
                mass: args.f64(2)?,
                rotational_inertia_1: args.f64(3)?,
                rotational_inertia_2: args.f64(4)?,
                rotational_inertia_3: args.f64(5)?,
            };
            let values = [wm.weight, wm.mass, wm.rotational_inertia_1, wm.rotational_inertia_2, wm.rotational_inertia_3];
            ensure(values.iter().all(|v| *v >= 0.0))?;
            let name = args.name(0)?;
            model.links.get_mut(&name).ok_or(Fail)?.weight_and_mass = wm;
            Ok(())
        }
        "GetWeightAndMass" => {
            let wm = link(model, args)?.weight_and_mass;
            args.set(1, wm.weight)?;
            args.set(2, wm.mass)?;
            args.set(3, wm.rotational_inertia_1)?;
            args.set(4, wm.rotational_inertia_2)?;
            args.set(5, wm.rotational_inertia_3)
        }
        _ => Err(Fail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Program, Variant};
    use crate::units::Units;

    fn linear_args(name: &str, dof: [bool; 6], fixed: [bool; 6]) -> Vec<Variant> {
        vec![
            Variant::Str(name.into()),
            Variant::from(dof),
            Variant::from(fixed),
            Variant::from([100.0; 6]),
            Variant::from([0.0; 6]),
            Variant::Double(0.0),
            Variant::Double(0.0),
            Variant::Bool(false),
            Variant::Bool(false),
            Variant::Str("note".into()),
            Variant::Str(String::new()),
        ]
    }

    #[test]
    fn test_fixed_must_be_active() {
        let mut model = ModelData::new(Program::Sap2000, Units::KipIn);
        let u1 = [true, false, false, false, false, false];
        let u2 = [false, true, false, false, false, false];
        let mut bad = linear_args("L1", u1, u2);
        assert_eq!(prop_link(&mut model, "SetLinear", &mut Args(&mut bad)), Err(Fail));
        let mut good = linear_args("L1", u1, u1);
        assert!(prop_link(&mut model, "SetLinear", &mut Args(&mut good)).is_ok());
    }

    #[test]
    fn test_weight_and_mass_survives_redefinition() {
        let mut model = ModelData::new(Program::Sap2000, Units::KipIn);
        let u1 = [true, false, false, false, false, false];
        let mut set = linear_args("L1", u1, [false; 6]);
        prop_link(&mut model, "SetLinear", &mut Args(&mut set)).unwrap();
        let mut wm = [
            Variant::Str("L1".into()),
            Variant::Double(0.5),
            Variant::Double(0.01),
            Variant::Double(0.0),
            Variant::Double(0.0),
            Variant::Double(0.0),
        ];
        prop_link(&mut model, "SetWeightAndMass", &mut Args(&mut wm)).unwrap();
        prop_link(&mut model, "SetLinear", &mut Args(&mut set)).unwrap();
        assert_eq!(model.links.get("L1").unwrap().weight_and_mass.weight, 0.5);
    }

    #[test]
    fn test_get_gap_on_linear_fails() {
        let mut model = ModelData::new(Program::Sap2000, Units::KipIn);
        let mut set = linear_args("L1", [true; 6], [false; 6]);
        prop_link(&mut model, "SetLinear", &mut Args(&mut set)).unwrap();
        let mut get = vec![Variant::Str("L1".into())];
        get.extend(std::iter::repeat(Variant::Empty).take(11));
        assert_eq!(prop_link(&mut model, "GetGap", &mut Args(&mut get)), Err(Fail));
    }
}
