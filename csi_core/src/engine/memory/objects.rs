//! `FrameObj` and `AreaObj` entry points.
//!
//! Object-level setters take a trailing `ItemType`: `Objects` targets the
//! named object, `SelectedObjects` targets the selection (always empty here,
//! so the call succeeds without effect) and `Group` fails because groups are
//! not modeled.

use super::{change_name, ensure, name_list, Args, Fail, Outcome};
use crate::engine::model::{AreaObjectRecord, FrameObjectRecord, ModelData, Table};
use crate::enums::ItemType;
use crate::values::{AreaModifier, DegreesOfFreedomLocal, EndReleases, Fixity, FrameModifier};

/// Section name that asks for the first defined property
const DEFAULT_PROPERTY: &str = "Default";

/// Objects addressed by `name` under `item_type`
fn targets<T>(table: &Table<T>, name: &str, item_type: ItemType) -> Result<Vec<String>, Fail> {
    match item_type {
        ItemType::Objects => {
            ensure(table.contains(name))?;
            Ok(vec![name.to_string()])
        }
        ItemType::SelectedObjects => Ok(Vec::new()),
        ItemType::Group => Err(Fail),
    }
}

fn item_type(args: &Args, index: usize) -> Result<ItemType, Fail> {
    ItemType::from_code(args.opt_i32(index, ItemType::Objects.code())?).map_err(|_| Fail)
}

/// Resolve the property for a new object
fn resolve_property<T>(table: &Table<T>, requested: &str) -> Result<String, Fail> {
    if requested.is_empty() || (requested == DEFAULT_PROPERTY && !table.contains(requested)) {
        return table.names().into_iter().next().ok_or(Fail);
    }
    ensure(table.contains(requested))?;
    Ok(requested.to_string())
}

/// Object name for `AddByCoord`: the user's name when free, else generated
fn object_name(model: &mut ModelData, requested: String) -> String {
    if requested.trim().is_empty() || model.frames.contains(&requested) || model.areas.contains(&requested) {
        model.next_object_name()
    } else {
        requested
    }
}

// ============================================================================
// FrameObj
// ============================================================================

pub(crate) fn frame_obj(model: &mut ModelData, method: &str, args: &mut Args) -> Outcome {
    match method {
        "GetNameList" => name_list(&model.frames, args, |_| true),
        "ChangeName" => {
            let to = args.name(1)?;
            ensure(!model.areas.contains(&to))?;
            change_name(&mut model.frames, args).map(|_| ())
        }
        "Delete" => {
            let name = args.name(0)?;
            for target in targets(&model.frames, &name, item_type(args, 1)?)? {
                model.frames.remove(&target);
            }
            Ok(())
        }
        "AddByCoord" => {
            let point_i = [args.f64(0)?, args.f64(1)?, args.f64(2)?];
            let point_j = [args.f64(3)?, args.f64(4)?, args.f64(5)?];
            ensure(point_i != point_j)?;
            let section = resolve_property(&model.frame_sections, &args.opt_string(7)?)?;
            let name = object_name(model, args.opt_string(8)?);
            model.frames.upsert(
                name.clone(),
                FrameObjectRecord {
                    point_i,
                    point_j,
                    section,
                    modifiers: None,
                    releases: None,
                },
            );
            args.set(6, name)
        }
        "GetSection" => {
            let section = model.frames.get(&args.name(0)?).ok_or(Fail)?.section.clone();
            args.set(1, section)
        }
        "SetSection" => {
            let name = args.name(0)?;
            let section = args.name(1)?;
            ensure(model.frame_sections.contains(&section))?;
            for target in targets(&model.frames, &name, item_type(args, 2)?)? {
                if let Some(frame) = model.frames.get_mut(&target) {
                    frame.section = section.clone();
                }
            }
            Ok(())
        }
        "GetModifiers" => {
            let modifiers = model
                .frames
                .get(&args.name(0)?)
                .ok_or(Fail)?
                .modifiers
                .unwrap_or_default();
            args.set(1, modifiers.to_array())
        }
        "SetModifiers" => {
            let name = args.name(0)?;
            let values = args.doubles(1)?;
            ensure(values.iter().all(|v| v.is_finite() && *v >= 0.0))?;
            let modifiers = FrameModifier::from_array(&values).map_err(|_| Fail)?;
            for target in targets(&model.frames, &name, item_type(args, 2)?)? {
                if let Some(frame) = model.frames.get_mut(&target) {
                    frame.modifiers = Some(modifiers);
                }
            }
            Ok(())
        }
        "DeleteModifiers" => {
            let name = args.name(0)?;
            for target in targets(&model.frames, &name, item_type(args, 1)?)? {
                if let Some(frame) = model.frames.get_mut(&target) {
                    frame.modifiers = None;
                }
            }
            Ok(())
        }
        "GetReleases" => {
            let releases = model
                .frames
                .get(&args.name(0)?)
                .ok_or(Fail)?
                .releases
                .unwrap_or_default();
            args.set(1, releases.end_i.to_array())?;
            args.set(2, releases.end_j.to_array())?;
            args.set(3, releases.start_fixity.to_array())?;
            args.set(4, releases.end_fixity.to_array())
        }
        "SetReleases" => {
            let name = args.name(0)?;
            let releases = EndReleases {
                end_i: DegreesOfFreedomLocal::from_array(&args.bools(1)?).map_err(|_| Fail)?,
                end_j: DegreesOfFreedomLocal::from_array(&args.bools(2)?).map_err(|_| Fail)?,
                start_fixity: Fixity::from_array(&args.doubles(3)?).map_err(|_| Fail)?,
                end_fixity: Fixity::from_array(&args.doubles(4)?).map_err(|_| Fail)?,
            };
            ensure(releases.is_stable())?;
            let mut springs = releases
                .start_fixity
                .to_array()
                .into_iter()
                .chain(releases.end_fixity.to_array());
            ensure(springs.all(|k| k.is_finite() && k >= 0.0))?;

            let record = releases.is_released().then_some(releases);
            for target in targets(&model.frames, &name, item_type(args, 5)?)? {
                if let Some(frame) = model.frames.get_mut(&target) {
                    frame.releases = record;
                }
            }
            Ok(())
        }
        _ => Err(Fail),
    }
}

// ============================================================================
// AreaObj
// ============================================================================

pub(crate) fn area_obj(model: &mut ModelData, method: &str, args: &mut Args) -> Outcome {
    match method {
        "GetNameList" => name_list(&model.areas, args, |_| true),
        "ChangeName" => {
            let to = args.name(1)?;
            ensure(!model.frames.contains(&to))?;
            change_name(&mut model.areas, args).map(|_| ())
        }
        "Delete" => {
            let name = args.name(0)?;
            for target in targets(&model.areas, &name, item_type(args, 1)?)? {
                model.areas.remove(&target);
            }
            Ok(())
        }
        "AddByCoord" => {
            let n = args.i32(0)?;
            let (x, y, z) = (args.doubles(1)?, args.doubles(2)?, args.doubles(3)?);
            ensure(n >= 3)?;
            let n = n as usize;
            ensure(x.len() == n && y.len() == n && z.len() == n)?;
            let points: Vec<[f64; 3]> = (0..n).map(|i| [x[i], y[i], z[i]]).collect();
            let distinct = points
                .iter()
                .enumerate()
                .all(|(i, p)| points[i + 1..].iter().all(|q| q != p));
            ensure(distinct)?;
            let property = resolve_property(&model.area_sections, &args.opt_string(5)?)?;
            let name = object_name(model, args.opt_string(6)?);
            model.areas.upsert(
                name.clone(),
                AreaObjectRecord {
                    points,
                    property,
                    modifiers: None,
                },
            );
            args.set(4, name)
        }
        "GetProperty" => {
            let property = model.areas.get(&args.name(0)?).ok_or(Fail)?.property.clone();
            args.set(1, property)
        }
        "SetProperty" => {
            let name = args.name(0)?;
            let property = args.name(1)?;
            ensure(model.area_sections.contains(&property))?;
            for target in targets(&model.areas, &name, item_type(args, 2)?)? {
                if let Some(area) = model.areas.get_mut(&target) {
                    area.property = property.clone();
                }
            }
            Ok(())
        }
        "GetModifiers" => {
            let modifiers = model
                .areas
                .get(&args.name(0)?)
                .ok_or(Fail)?
                .modifiers
                .unwrap_or_default();
            args.set(1, modifiers.to_array())
        }
        "SetModifiers" => {
            let name = args.name(0)?;
            let values = args.doubles(1)?;
            ensure(values.iter().all(|v| v.is_finite() && *v >= 0.0))?;
            let modifiers = AreaModifier::from_array(&values).map_err(|_| Fail)?;
            for target in targets(&model.areas, &name, item_type(args, 2)?)? {
                if let Some(area) = model.areas.get_mut(&target) {
                    area.modifiers = Some(modifiers);
                }
            }
            Ok(())
        }
        "DeleteModifiers" => {
            let name = args.name(0)?;
            for target in targets(&model.areas, &name, item_type(args, 1)?)? {
                if let Some(area) = model.areas.get_mut(&target) {
                    area.modifiers = None;
                }
            }
            Ok(())
        }
        _ => Err(Fail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::model::{FrameSectionRecord, FrameShape};
    use crate::engine::{Program, Variant};
    use crate::units::Units;

    fn model_with_section(section: &str) -> ModelData {
        let mut model = ModelData::new(Program::Sap2000, Units::KipIn);
        model.frame_sections.upsert(
            section,
            FrameSectionRecord {
                shape: FrameShape::Rectangle { depth: 24.0, width: 12.0 },
                material: "4000Psi".to_string(),
                color: 0,
                notes: String::new(),
                guid: String::new(),
                modifiers: FrameModifier::default(),
            },
        );
        model
    }

    fn add_frame(model: &mut ModelData, prop: &str, user_name: &str) -> Result<String, Fail> {
        let mut slots = vec![
            Variant::Double(0.0),
            Variant::Double(0.0),
            Variant::Double(0.0),
            Variant::Double(0.0),
            Variant::Double(0.0),
            Variant::Double(120.0),
            Variant::Empty,
            Variant::Str(prop.into()),
            Variant::Str(user_name.into()),
        ];
        frame_obj(model, "AddByCoord", &mut Args(&mut slots))?;
        slots[6].as_str().map(str::to_string).ok_or(Fail)
    }

    #[test]
    fn test_add_frame_names() {
        let mut model = model_with_section("R1");
        assert_eq!(add_frame(&mut model, "R1", "C1"), Ok("C1".to_string()));
        assert_eq!(add_frame(&mut model, "R1", ""), Ok("1".to_string()));
        assert_eq!(add_frame(&mut model, "Default", "C1"), Ok("2".to_string()));
        assert_eq!(add_frame(&mut model, "Missing", ""), Err(Fail));
        assert_eq!(model.frames.len(), 3);
        assert!(model.frame_section_in_use("R1"));
    }

    #[test]
    fn test_unstable_releases_rejected() {
        let mut model = model_with_section("R1");
        add_frame(&mut model, "R1", "F1").unwrap();
        let torsion = [false, false, false, true, false, false];
        let mut slots = [
            Variant::Str("F1".into()),
            Variant::from(torsion),
            Variant::from(torsion),
            Variant::from([0.0; 6]),
            Variant::from([0.0; 6]),
        ];
        assert_eq!(frame_obj(&mut model, "SetReleases", &mut Args(&mut slots)), Err(Fail));
        assert!(model.frames.get("F1").unwrap().releases.is_none());
    }

    #[test]
    fn test_group_item_type_fails() {
        let mut model = model_with_section("R1");
        add_frame(&mut model, "R1", "F1").unwrap();
        let mut slots = [Variant::Str("F1".into()), Variant::Int(ItemType::Group.code())];
        assert_eq!(frame_obj(&mut model, "DeleteModifiers", &mut Args(&mut slots)), Err(Fail));
        let mut selected = [Variant::Str("F1".into()), Variant::Int(ItemType::SelectedObjects.code())];
        assert!(frame_obj(&mut model, "Delete", &mut Args(&mut selected)).is_ok());
        assert!(model.frames.contains("F1"));
    }

    #[test]
    fn test_area_add_requires_parallel_coordinates() {
        let mut model = ModelData::new(Program::Sap2000, Units::KipIn);
        let mut slots = [
            Variant::Int(4),
            Variant::DoubleArray(vec![0.0, 10.0, 10.0, 0.0]),
            Variant::DoubleArray(vec![0.0, 0.0, 10.0]),
            Variant::DoubleArray(vec![0.0; 4]),
            Variant::Empty,
        ];
        assert_eq!(area_obj(&mut model, "AddByCoord", &mut Args(&mut slots)), Err(Fail));
    }
}
