//! `PropAreaSpring` and `PropPointSpring` entry points.

use super::{change_name, color_or_default, delete, ensure, guid_or_new, name_list, Args, Fail, Outcome};
use crate::engine::model::{ModelData, PointSpringRecord};
use crate::enums::{AreaSpringOption, LinkAxialDirection, PointSpringOption, SpringNonlinearity};
use crate::values::{decode_all, AreaSpringProperties, DefinitionInfo, JointLink, PointSpringProperties, Stiffness};

fn info_at(args: &Args, first: usize) -> Result<DefinitionInfo, Fail> {
    Ok(DefinitionInfo {
        color: color_or_default(args.opt_i32(first, -1)?),
        notes: args.opt_string(first + 1)?,
        guid: guid_or_new(args.opt_string(first + 2)?),
    })
}

fn report_info(args: &mut Args, first: usize, info: DefinitionInfo) -> Outcome {
    args.set(first, info.color)?;
    args.set(first + 1, info.notes)?;
    args.set(first + 2, info.guid)
}

// ============================================================================
// PropAreaSpring
// ============================================================================

pub(crate) fn prop_area_spring(model: &mut ModelData, method: &str, args: &mut Args) -> Outcome {
    match method {
        "GetNameList" => name_list(&model.area_springs, args, |_| true),
        "ChangeName" => change_name(&mut model.area_springs, args).map(|_| ()),
        "Delete" => {
            let name = args.name(0)?;
            delete(&mut model.area_springs, &name, false)
        }
        "SetAreaSpringProp" => {
            let name = args.name(0)?;
            let spring = AreaSpringProperties {
                u1: args.f64(1)?,
                u2: args.f64(2)?,
                u3: args.f64(3)?,
                nonlinearity: SpringNonlinearity::from_code(args.i32(4)?).map_err(|_| Fail)?,
                option: AreaSpringOption::from_code(args.opt_i32(5, 1)?).map_err(|_| Fail)?,
                soil_profile: args.opt_string(6)?,
                end_length_ratio: args.f64(7).unwrap_or(0.0),
                period: args.f64(8).unwrap_or(0.0),
                info: info_at(args, 9)?,
            };
            ensure([spring.u1, spring.u2, spring.u3].iter().all(|k| *k >= 0.0))?;
            if spring.option == AreaSpringOption::SoilProfile {
                ensure(!spring.soil_profile.is_empty())?;
            }
            model.area_springs.upsert(name, spring);
            Ok(())
        }
        "GetAreaSpringProp" => {
            let spring = model.area_springs.get(&args.name(0)?).ok_or(Fail)?.clone();
            args.set(1, spring.u1)?;
            args.set(2, spring.u2)?;
            args.set(3, spring.u3)?;
            args.set(4, spring.nonlinearity.code())?;
            args.set(5, spring.option.code())?;
            args.set(6, spring.soil_profile)?;
            args.set(7, spring.end_length_ratio)?;
            args.set(8, spring.period)?;
            report_info(args, 9, spring.info)
        }
        _ => Err(Fail),
    }
}

// ============================================================================
// PropPointSpring
// ============================================================================

pub(crate) fn prop_point_spring(model: &mut ModelData, method: &str, args: &mut Args) -> Outcome {
    match method {
        "GetNameList" => name_list(&model.point_springs, args, |_| true),
        "ChangeName" => change_name(&mut model.point_springs, args).map(|_| ()),
        "Delete" => {
            let name = args.name(0)?;
            delete(&mut model.point_springs, &name, false)
        }
        "SetPointSpringProp" => {
            let name = args.name(0)?;
            let option = PointSpringOption::from_code(args.i32(1)?).map_err(|_| Fail)?;
            // single joint links go through SetSingleJointLinks
            ensure(option != PointSpringOption::SingleJointLinks)?;
            let stiffness = Stiffness::from_array(&args.doubles(2)?).map_err(|_| Fail)?;
            let coordinate_system = match args.opt_string(3)? {
                csys if csys.is_empty() => "Global".to_string(),
                csys => csys,
            };
            let properties = PointSpringProperties {
                option,
                stiffness,
                coordinate_system,
                soil_profile: args.opt_string(4)?,
                footing: args.opt_string(5)?,
                period: args.f64(6).unwrap_or(0.0),
                info: info_at(args, 7)?,
            };
            if option == PointSpringOption::SoilProfile {
                ensure(!properties.soil_profile.is_empty() && !properties.footing.is_empty())?;
            }
            model.point_springs.upsert(
                name,
                PointSpringRecord {
                    properties,
                    links: Vec::new(),
                },
            );
            Ok(())
        }
        "GetPointSpringProp" => {
            let p = model.point_springs.get(&args.name(0)?).ok_or(Fail)?.properties.clone();
            args.set(1, p.option.code())?;
            args.set(2, p.stiffness.to_array())?;
            args.set(3, p.coordinate_system)?;
            args.set(4, p.soil_profile)?;
            args.set(5, p.footing)?;
            args.set(6, p.period)?;
            report_info(args, 7, p.info)
        }
        "SetSingleJointLinks" => {
            let name = args.name(0)?;
            let n = args.i32(1)?;
            let link_names = args.strings(2)?;
            let directions = args.ints(3)?;
            let angles = args.doubles(4)?;
            ensure(n > 0)?;
            let n = n as usize;
            ensure(link_names.len() == n && directions.len() == n && angles.len() == n)?;
            ensure(link_names.iter().all(|l| model.links.contains(l)))?;
            let directions = decode_all(&directions, LinkAxialDirection::from_code).map_err(|_| Fail)?;

            let links = link_names
                .into_iter()
                .zip(directions)
                .zip(angles)
                .map(|((link, axial_direction), angle)| JointLink { link, axial_direction, angle })
                .collect();
            let properties = PointSpringProperties {
                option: PointSpringOption::SingleJointLinks,
                info: info_at(args, 5)?,
                ..PointSpringProperties::user_defined(Stiffness::default())
            };
            model.point_springs.upsert(name, PointSpringRecord { properties, links });
            Ok(())
        }
        "GetSingleJointLinks" => {
            let record = model.point_springs.get(&args.name(0)?).ok_or(Fail)?.clone();
            ensure(record.properties.option == PointSpringOption::SingleJointLinks)?;
            args.set(1, record.links.len() as i32)?;
            args.set(2, record.links.iter().map(|l| l.link.clone()).collect::<Vec<_>>())?;
            args.set(3, record.links.iter().map(|l| l.axial_direction.code()).collect::<Vec<_>>())?;
            args.set(4, record.links.iter().map(|l| l.angle).collect::<Vec<_>>())?;
            report_info(args, 5, record.properties.info)
        }
        _ => Err(Fail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::model::{LinkBehavior, LinkRecord};
    use crate::engine::{Program, Variant};
    use crate::units::Units;
    use crate::values::{LinearLinkProperties, LinkWeightAndMass};

    fn model_with_link(link: &str) -> ModelData {
        let mut model = ModelData::new(Program::Etabs, Units::KipIn);
        model.links.upsert(
            link,
            LinkRecord {
                behavior: LinkBehavior::Linear(LinearLinkProperties::axial(100.0)),
                weight_and_mass: LinkWeightAndMass::default(),
            },
        );
        model
    }

    fn joint_links(names: Vec<String>, dirs: Vec<i32>, angles: Vec<f64>) -> Vec<Variant> {
        vec![
            Variant::Str("PS1".into()),
            Variant::Int(names.len() as i32),
            Variant::StrArray(names),
            Variant::IntArray(dirs),
            Variant::DoubleArray(angles),
        ]
    }

    #[test]
    fn test_single_joint_links_reference_links() {
        let mut model = model_with_link("L1");
        let mut slots = joint_links(vec!["L1".into()], vec![-3], vec![0.0]);
        prop_point_spring(&mut model, "SetSingleJointLinks", &mut Args(&mut slots)).unwrap();
        let record = model.point_springs.get("PS1").unwrap();
        assert_eq!(record.properties.option, PointSpringOption::SingleJointLinks);
        assert_eq!(record.links[0].axial_direction, LinkAxialDirection::NegativeZ);
        assert!(model.link_in_use("L1"));
    }

    #[test]
    fn test_single_joint_links_unknown_link() {
        let mut model = model_with_link("L1");
        let mut slots = joint_links(vec!["L9".into()], vec![1], vec![0.0]);
        assert_eq!(
            prop_point_spring(&mut model, "SetSingleJointLinks", &mut Args(&mut slots)),
            Err(Fail)
        );
        assert!(model.point_springs.is_empty());
    }

    #[test]
    fn test_single_joint_links_ragged() {
        let mut model = model_with_link("L1");
        let mut slots = joint_links(vec!["L1".into()], vec![1, 2], vec![0.0]);
        assert_eq!(
            prop_point_spring(&mut model, "SetSingleJointLinks", &mut Args(&mut slots)),
            Err(Fail)
        );
    }

    #[test]
    fn test_point_spring_option_three_rejected() {
        let mut model = model_with_link("L1");
        let mut slots = [
            Variant::Str("PS1".into()),
            Variant::Int(3),
            Variant::DoubleArray(vec![0.0; 6]),
        ];
        assert_eq!(
            prop_point_spring(&mut model, "SetPointSpringProp", &mut Args(&mut slots)),
            Err(Fail)
        );
    }

    #[test]
    fn test_area_spring_negative_stiffness() {
        let mut model = model_with_link("L1");
        let mut slots = [
            Variant::Str("AS1".into()),
            Variant::Double(0.0),
            Variant::Double(0.0),
            Variant::Double(-5.0),
            Variant::Int(1),
        ];
        assert_eq!(
            prop_area_spring(&mut model, "SetAreaSpringProp", &mut Args(&mut slots)),
            Err(Fail)
        );
    }
}
