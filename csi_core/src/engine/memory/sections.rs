//! `PropFrame`, `PropArea` and `PropCable` entry points.

use super::{change_name, color_or_default, delete, ensure, guid_or_new, name_list, Args, Fail, Outcome};
use crate::engine::model::{AreaSectionRecord, CableSectionRecord, FrameSectionRecord, FrameShape, ModelData};
use crate::enums::ShellType;
use crate::values::sections::NonPrismaticArrays;
use crate::values::{AreaModifier, CableModifier, DefinitionInfo, FrameModifier, ShellProperties};

/// Trailing `color, notes, guid` arguments starting at `first`
fn info_at(args: &Args, first: usize) -> Result<DefinitionInfo, Fail> {
    Ok(DefinitionInfo {
        color: color_or_default(args.opt_i32(first, -1)?),
        notes: args.opt_string(first + 1)?,
        guid: guid_or_new(args.opt_string(first + 2)?),
    })
}

fn set_info_at(args: &mut Args, first: usize, color: i32, notes: &str, guid: &str) -> Outcome {
    args.set(first, color)?;
    args.set(first + 1, notes)?;
    args.set(first + 2, guid)
}

fn positive(values: &[f64]) -> Outcome {
    ensure(values.iter().all(|v| v.is_finite() && *v > 0.0))
}

/// Modifier values are finite and non-negative
fn valid_modifiers(values: &[f64]) -> Outcome {
    ensure(values.iter().all(|v| v.is_finite() && *v >= 0.0))
}

// ============================================================================
// PropFrame
// ============================================================================

/// Create or replace a frame section, keeping modifiers already assigned
fn store_frame_section(model: &mut ModelData, name: String, shape: FrameShape, material: String, info: DefinitionInfo) {
    let modifiers = model
        .frame_sections
        .get(&name)
        .map(|s| s.modifiers)
        .unwrap_or_default();
    model.frame_sections.upsert(
        name,
        FrameSectionRecord {
            shape,
            material,
            color: info.color,
            notes: info.notes,
            guid: info.guid,
            modifiers,
        },
    );
}

fn frame_section<'m>(model: &'m ModelData, args: &Args) -> Result<&'m FrameSectionRecord, Fail> {
    model.frame_sections.get(&args.name(0)?).ok_or(Fail)
}

/// Existing material for a prismatic section
fn existing_material(model: &ModelData, args: &Args, index: usize) -> Result<String, Fail> {
    let material = args.name(index)?;
    ensure(model.materials.contains(&material))?;
    Ok(material)
}

/// Writes `[1] file name, [2] material`, then the dimensions, then the info
fn report_prismatic(args: &mut Args, section: &FrameSectionRecord, dims: &[f64]) -> Outcome {
    args.set(1, "")?;
    args.set(2, section.material.as_str())?;
    for (offset, value) in dims.iter().enumerate() {
        args.set(3 + offset, *value)?;
    }
    set_info_at(args, 3 + dims.len(), section.color, &section.notes, &section.guid)
}

pub(crate) fn prop_frame(model: &mut ModelData, method: &str, args: &mut Args) -> Outcome {
    match method {
        "GetNameList" => {
            let filter = args.opt_i32(2, 0)?;
            name_list(&model.frame_sections, args, |s| {
                filter == 0 || s.shape.section_type().code() == filter
            })
        }
        "ChangeName" => {
            let (from, to) = change_name(&mut model.frame_sections, args)?;
            model.rename_frame_section_references(&from, &to);
            Ok(())
        }
        "Delete" => {
            let name = args.name(0)?;
            let in_use = model.frame_section_in_use(&name);
            delete(&mut model.frame_sections, &name, in_use)
        }
        "GetTypeOAPI" => {
            let code = frame_section(model, args)?.shape.section_type().code();
            args.set(1, code)
        }
        "SetRectangle" => {
            let name = args.name(0)?;
            let material = existing_material(model, args, 1)?;
            let (depth, width) = (args.f64(2)?, args.f64(3)?);
            positive(&[depth, width])?;
            let info = info_at(args, 4)?;
            store_frame_section(model, name, FrameShape::Rectangle { depth, width }, material, info);
            Ok(())
        }
        "GetRectangle" => {
            let section = frame_section(model, args)?.clone();
            let FrameShape::Rectangle { depth, width } = section.shape else {
                return Err(Fail);
            };
            report_prismatic(args, &section, &[depth, width])
        }
        "SetCircle" => {
            let name = args.name(0)?;
            let material = existing_material(model, args, 1)?;
            let diameter = args.f64(2)?;
            positive(&[diameter])?;
            let info = info_at(args, 3)?;
            store_frame_section(model, name, FrameShape::Circle { diameter }, material, info);
            Ok(())
        }
        "GetCircle" => {
            let section = frame_section(model, args)?.clone();
            let FrameShape::Circle { diameter } = section.shape else {
                return Err(Fail);
            };
            report_prismatic(args, &section, &[diameter])
        }
        "SetISection" => {
            let name = args.name(0)?;
            let material = existing_material(model, args, 1)?;
            let dims = [args.f64(2)?, args.f64(3)?, args.f64(4)?, args.f64(5)?, args.f64(6)?, args.f64(7)?];
            positive(&dims)?;
            let [depth, top_flange_width, top_flange_thickness, web_thickness, bottom_flange_width, bottom_flange_thickness] =
                dims;
            ensure(top_flange_thickness + bottom_flange_thickness < depth)?;
            let info = info_at(args, 8)?;
            let shape = FrameShape::ISection {
                depth,
                top_flange_width,
                top_flange_thickness,
                web_thickness,
                bottom_flange_width,
                bottom_flange_thickness,
            };
            store_frame_section(model, name, shape, material, info);
            Ok(())
        }
        "GetISection" => {
            let section = frame_section(model, args)?.clone();
            let FrameShape::ISection {
                depth,
                top_flange_width,
                top_flange_thickness,
                web_thickness,
                bottom_flange_width,
                bottom_flange_thickness,
            } = section.shape
            else {
                return Err(Fail);
            };
            let dims = [
                depth,
                top_flange_width,
                top_flange_thickness,
                web_thickness,
                bottom_flange_width,
                bottom_flange_thickness,
            ];
            report_prismatic(args, &section, &dims)
        }
        "SetPipe" => {
            let name = args.name(0)?;
            let material = existing_material(model, args, 1)?;
            let (outside_diameter, wall_thickness) = (args.f64(2)?, args.f64(3)?);
            positive(&[outside_diameter, wall_thickness])?;
            ensure(2.0 * wall_thickness < outside_diameter)?;
            let info = info_at(args, 4)?;
            let shape = FrameShape::Pipe { outside_diameter, wall_thickness };
            store_frame_section(model, name, shape, material, info);
            Ok(())
        }
        "GetPipe" => {
            let section = frame_section(model, args)?.clone();
            let FrameShape::Pipe { outside_diameter, wall_thickness } = section.shape else {
                return Err(Fail);
            };
            report_prismatic(args, &section, &[outside_diameter, wall_thickness])
        }
        "SetNonPrismatic" => {
            let name = args.name(0)?;
            let n = args.i32(1)?;
            let arrays = NonPrismaticArrays {
                start_sections: args.strings(2)?,
                end_sections: args.strings(3)?,
                lengths: args.doubles(4)?,
                length_types: args.ints(5)?,
                ei33: args.ints(6)?,
                ei22: args.ints(7)?,
            };
            ensure(n > 0 && arrays.start_sections.len() == n as usize)?;
            let segments = arrays.into_segments().map_err(|_| Fail)?;
            for seg in &segments {
                positive(&[seg.length])?;
                for end in [&seg.start_section, &seg.end_section] {
                    ensure(end != &name)?;
                    let prismatic = model
                        .frame_sections
                        .get(end)
                        .map(|s| !matches!(s.shape, FrameShape::NonPrismatic { .. }))
                        .unwrap_or(false);
                    ensure(prismatic)?;
                }
            }
            let info = info_at(args, 8)?;
            store_frame_section(model, name, FrameShape::NonPrismatic { segments }, String::new(), info);
            Ok(())
        }
        "GetNonPrismatic" => {
            let section = frame_section(model, args)?.clone();
            let FrameShape::NonPrismatic { segments } = &section.shape else {
                return Err(Fail);
            };
            let arrays = NonPrismaticArrays::from_segments(segments);
            args.set(1, segments.len() as i32)?;
            args.set(2, arrays.start_sections)?;
            args.set(3, arrays.end_sections)?;
            args.set(4, arrays.lengths)?;
            args.set(5, arrays.length_types)?;
            args.set(6, arrays.ei33)?;
            args.set(7, arrays.ei22)?;
            set_info_at(args, 8, section.color, &section.notes, &section.guid)
        }
        "SetModifiers" => {
            let values = args.doubles(1)?;
            valid_modifiers(&values)?;
            let modifiers = FrameModifier::from_array(&values).map_err(|_| Fail)?;
            let name = args.name(0)?;
            model.frame_sections.get_mut(&name).ok_or(Fail)?.modifiers = modifiers;
            Ok(())
        }
        "GetModifiers" => {
            let modifiers = frame_section(model, args)?.modifiers;
            args.set(1, modifiers.to_array())
        }
        _ => Err(Fail),
    }
}

// ============================================================================
// PropArea
// ============================================================================

fn area_section<'m>(model: &'m ModelData, args: &Args) -> Result<&'m AreaSectionRecord, Fail> {
    model.area_sections.get(&args.name(0)?).ok_or(Fail)
}

pub(crate) fn prop_area(model: &mut ModelData, method: &str, args: &mut Args) -> Outcome {
    match method {
        "GetNameList" => name_list(&model.area_sections, args, |_| true),
        "ChangeName" => {
            let (from, to) = change_name(&mut model.area_sections, args)?;
            model.rename_area_section_references(&from, &to);
            Ok(())
        }
        "Delete" => {
            let name = args.name(0)?;
            let in_use = model.area_section_in_use(&name);
            delete(&mut model.area_sections, &name, in_use)
        }
        "SetShell" => {
            let name = args.name(0)?;
            let shell_type = ShellType::from_code(args.i32(1)?).map_err(|_| Fail)?;
            let material = existing_material(model, args, 2)?;
            let material_angle = args.f64(3)?;
            let (membrane_thickness, bending_thickness) = (args.f64(4)?, args.f64(5)?);
            positive(&[membrane_thickness, bending_thickness])?;
            let shell = ShellProperties {
                shell_type,
                material,
                material_angle,
                membrane_thickness,
                bending_thickness,
                info: info_at(args, 6)?,
            };
            let modifiers = model
                .area_sections
                .get(&name)
                .map(|s| s.modifiers)
                .unwrap_or_default();
            model.area_sections.upsert(name, AreaSectionRecord { shell, modifiers });
            Ok(())
        }
        "GetShell" => {
            let shell = area_section(model, args)?.shell.clone();
            args.set(1, shell.shell_type.code())?;
            args.set(2, shell.material)?;
            args.set(3, shell.material_angle)?;
            args.set(4, shell.membrane_thickness)?;
            args.set(5, shell.bending_thickness)?;
            set_info_at(args, 6, shell.info.color, &shell.info.notes, &shell.info.guid)
        }
        "SetModifiers" => {
            let values = args.doubles(1)?;
            valid_modifiers(&values)?;
            let modifiers = AreaModifier::from_array(&values).map_err(|_| Fail)?;
            let name = args.name(0)?;
            model.area_sections.get_mut(&name).ok_or(Fail)?.modifiers = modifiers;
            Ok(())
        }
        "GetModifiers" => {
            let modifiers = area_section(model, args)?.modifiers;
            args.set(1, modifiers.to_array())
        }
        _ => Err(Fail),
    }
}

// ============================================================================
// PropCable
// ============================================================================

fn cable_section<'m>(model: &'m ModelData, args: &Args) -> Result<&'m CableSectionRecord, Fail> {
    model.cable_sections.get(&args.name(0)?).ok_or(Fail)
}

pub(crate) fn prop_cable(model: &mut ModelData, method: &str, args: &mut Args) -> Outcome {
    match method {
        "GetNameList" => name_list(&model.cable_sections, args, |_| true),
        "ChangeName" => change_name(&mut model.cable_sections, args).map(|_| ()),
        "Delete" => {
            let name = args.name(0)?;
            delete(&mut model.cable_sections, &name, false)
        }
        "SetProp" => {
            let name = args.name(0)?;
            let material = existing_material(model, args, 1)?;
            let area = args.f64(2)?;
            positive(&[area])?;
            let info = info_at(args, 3)?;
            let modifiers = model
                .cable_sections
                .get(&name)
                .map(|s| s.modifiers)
                .unwrap_or_default();
            let record = CableSectionRecord {
                material,
                area,
                color: info.color,
                notes: info.notes,
                guid: info.guid,
                modifiers,
            };
            model.cable_sections.upsert(name, record);
            Ok(())
        }
        "GetProp" => {
            let cable = cable_section(model, args)?.clone();
            args.set(1, cable.material)?;
            args.set(2, cable.area)?;
            set_info_at(args, 3, cable.color, &cable.notes, &cable.guid)
        }
        "SetModifiers" => {
            let values = args.doubles(1)?;
            valid_modifiers(&values)?;
            let modifiers = CableModifier::from_array(&values).map_err(|_| Fail)?;
            let name = args.name(0)?;
            model.cable_sections.get_mut(&name).ok_or(Fail)?.modifiers = modifiers;
            Ok(())
        }
        "GetModifiers" => {
            let modifiers = cable_section(model, args)?.modifiers;
            args.set(1, modifiers.to_array())
        }
        _ => Err(Fail),
    }
}
