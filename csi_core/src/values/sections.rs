//! Frame, area and cable section records.
//!
//! Dimension names follow the engine's local axes: `t3` is the depth
//! (parallel to local 2), `t2` the width (parallel to local 3).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{check_parallel, decode_all, DefinitionInfo};
use crate::enums::{engine_enum, ShellType};
use crate::errors::{ApiError, ApiResult};

/// Solid rectangle (`PropFrame.SetRectangle`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleSection {
    pub material: String,
    /// Depth t3
    pub depth: f64,
    /// Width t2
    pub width: f64,
    pub info: DefinitionInfo,
}

impl RectangleSection {
    pub fn new(material: impl Into<String>, depth: f64, width: f64) -> Self {
        RectangleSection {
            material: material.into(),
            depth,
            width,
            info: DefinitionInfo::default(),
        }
    }
}

/// Solid circle (`PropFrame.SetCircle`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleSection {
    pub material: String,
    pub diameter: f64,
    pub info: DefinitionInfo,
}

/// I / wide flange (`PropFrame.SetISection`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ISection {
    pub material: String,
    /// Overall depth t3
    pub depth: f64,
    /// Top flange width t2
    pub top_flange_width: f64,
    /// Top flange thickness tf
    pub top_flange_thickness: f64,
    /// Web thickness tw
    pub web_thickness: f64,
    /// Bottom flange width t2b
    pub bottom_flange_width: f64,
    /// Bottom flange thickness tfb
    pub bottom_flange_thickness: f64,
    pub info: DefinitionInfo,
}

impl ISection {
    /// Doubly symmetric I-section
    pub fn symmetric(
        material: impl Into<String>,
        depth: f64,
        flange_width: f64,
        flange_thickness: f64,
        web_thickness: f64,
    ) -> Self {
        ISection {
            material: material.into(),
            depth,
            top_flange_width: flange_width,
            top_flange_thickness: flange_thickness,
            web_thickness,
            bottom_flange_width: flange_width,
            bottom_flange_thickness: flange_thickness,
            info: DefinitionInfo::default(),
        }
    }
}

/// Pipe (`PropFrame.SetPipe`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeSection {
    pub material: String,
    pub outside_diameter: f64,
    pub wall_thickness: f64,
    pub info: DefinitionInfo,
}

engine_enum! {
    /// How a nonprismatic segment length is specified
    SegmentLength {
        /// Relative to the other variable-length segments
        Variable = 1 => "Variable",
        Absolute = 2 => "Absolute",
    }
}

engine_enum! {
    /// Variation of EI along a nonprismatic segment
    VariationType {
        Linear = 1 => "Linear",
        Parabolic = 2 => "Parabolic",
        Cubic = 3 => "Cubic",
    }
}

/// One segment of a nonprismatic (variable) frame section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonPrismaticSegment {
    pub start_section: String,
    pub end_section: String,
    pub length: f64,
    pub length_type: SegmentLength,
    pub ei33: VariationType,
    pub ei22: VariationType,
}

/// Nonprismatic section (`PropFrame.SetNonPrismatic`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonPrismaticSection {
    pub segments: Vec<NonPrismaticSegment>,
    pub info: DefinitionInfo,
}

impl NonPrismaticSection {
    pub fn new(segments: Vec<NonPrismaticSegment>) -> Self {
        NonPrismaticSection {
            segments,
            info: DefinitionInfo::default(),
        }
    }
}

/// Parallel arrays of `PropFrame.SetNonPrismatic`, in engine order
pub(crate) struct NonPrismaticArrays {
    pub start_sections: Vec<String>,
    pub end_sections: Vec<String>,
    pub lengths: Vec<f64>,
    pub length_types: Vec<i32>,
    pub ei33: Vec<i32>,
    pub ei22: Vec<i32>,
}

impl NonPrismaticArrays {
    pub fn from_segments(segments: &[NonPrismaticSegment]) -> Self {
        NonPrismaticArrays {
            start_sections: segments.iter().map(|s| s.start_section.clone()).collect(),
            end_sections: segments.iter().map(|s| s.end_section.clone()).collect(),
            lengths: segments.iter().map(|s| s.length).collect(),
            length_types: segments.iter().map(|s| s.length_type.code()).collect(),
            ei33: segments.iter().map(|s| s.ei33.code()).collect(),
            ei22: segments.iter().map(|s| s.ei22.code()).collect(),
        }
    }

    pub fn into_segments(self) -> ApiResult<Vec<NonPrismaticSegment>> {
        check_parallel(&[
            ("start_sections", self.start_sections.len()),
            ("end_sections", self.end_sections.len()),
            ("lengths", self.lengths.len()),
            ("length_types", self.length_types.len()),
            ("ei33", self.ei33.len()),
            ("ei22", self.ei22.len()),
        ])?;
        let length_types = decode_all(&self.length_types, SegmentLength::from_code)?;
        let ei33 = decode_all(&self.ei33, VariationType::from_code)?;
        let ei22 = decode_all(&self.ei22, VariationType::from_code)?;

        Ok(self
            .start_sections
            .into_iter()
            .zip(self.end_sections)
            .zip(self.lengths)
            .zip(length_types)
            .zip(ei33)
            .zip(ei22)
            .map(|(((((start_section, end_section), length), length_type), ei33), ei22)| {
                NonPrismaticSegment {
                    start_section,
                    end_section,
                    length,
                    length_type,
                    ei33,
                    ei22,
                }
            })
            .collect())
    }
}

/// Shell / plate / membrane section (`PropArea.SetShell`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellProperties {
    pub shell_type: ShellType,
    pub material: String,
    /// Material angle, degrees
    pub material_angle: f64,
    pub membrane_thickness: f64,
    pub bending_thickness: f64,
    pub info: DefinitionInfo,
}

impl ShellProperties {
    /// Thin shell with equal membrane and bending thickness
    pub fn thin(material: impl Into<String>, thickness: f64) -> Self {
        ShellProperties {
            shell_type: ShellType::ShellThin,
            material: material.into(),
            material_angle: 0.0,
            membrane_thickness: thickness,
            bending_thickness: thickness,
            info: DefinitionInfo::default(),
        }
    }
}

/// Cable section (`PropCable.SetProp`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableProperties {
    pub material: String,
    pub area: f64,
    pub info: DefinitionInfo,
}

impl CableProperties {
    /// Cable defined by its diameter
    pub fn from_diameter(material: impl Into<String>, diameter: f64) -> ApiResult<Self> {
        if diameter <= 0.0 || !diameter.is_finite() {
            return Err(ApiError::invalid_input("diameter", diameter.to_string(), "must be positive"));
        }
        Ok(CableProperties {
            material: material.into(),
            area: std::f64::consts::PI * diameter * diameter / 4.0,
            info: DefinitionInfo::default(),
        })
    }
}

impl fmt::Display for RectangleSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} ({})", self.depth, self.width, self.material)
    }
}
