//! # Reference Model Data
//!
//! The definition tables behind [`MemoryEngine`](super::MemoryEngine). This is
//! engine-side state: accessors never see it, they only see what comes back
//! through [`Dispatch`](super::Dispatch).
//!
//! ## Structure
//!
//! ```text
//! ModelData
//! ├── meta: ModelMeta (schema version, program, timestamps)
//! ├── units, locked
//! ├── materials / frame_sections / area_sections / cable_sections
//! ├── area_springs / point_springs / links
//! └── frames / areas (objects that reference sections)
//! ```
//!
//! Every table keeps insertion order, which is the order the engine reports
//! names in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Program;
use crate::enums::{FrameSectionType, LinkType, MaterialType};
use crate::units::Units;
use crate::values::{
    AreaModifier, AreaSpringProperties, CableModifier, ConcreteProperties, EndReleases, FrameModifier,
    GapLinkProperties, IsotropicProperties, JointLink, LinearLinkProperties, LinkWeightAndMass,
    MaterialDamping, MaterialDefinition, NonPrismaticSegment, PointSpringProperties, ShellProperties,
    SteelProperties, StressStrainCurve,
};

/// Current schema version for model snapshot files
pub const SCHEMA_VERSION: &str = "0.1.0";

// ============================================================================
// Ordered table
// ============================================================================

/// A name-keyed table that preserves definition order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table { entries: Vec::new() }
    }
}

impl<T> Table<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries.iter_mut().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Insert or replace; returns true when the name was new
    pub fn upsert(&mut self, name: impl Into<String>, value: T) -> bool {
        let name = name.into();
        match self.position(&name) {
            Some(i) => {
                self.entries[i].1 = value;
                false
            }
            None => {
                self.entries.push((name, value));
                true
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<T> {
        self.position(name).map(|i| self.entries.remove(i).1)
    }

    /// Rename in place; fails when `from` is missing or `to` is taken
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if from == to || to.is_empty() || self.contains(to) {
            return false;
        }
        match self.position(from) {
            Some(i) => {
                self.entries[i].0 = to.to_string();
                true
            }
            None => false,
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().map(|(_, v)| v)
    }
}

// ============================================================================
// Records
// ============================================================================

/// A material definition and everything assigned to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub definition: MaterialDefinition,
    pub isotropic: IsotropicProperties,
    pub weight_per_volume: f64,
    pub mass_per_volume: f64,
    pub steel: Option<SteelProperties>,
    pub concrete: Option<ConcreteProperties>,
    pub curve: StressStrainCurve,
    pub damping: MaterialDamping,
}

/// Frame section geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum FrameShape {
    Rectangle {
        depth: f64,
        width: f64,
    },
    Circle {
        diameter: f64,
    },
    ISection {
        depth: f64,
        top_flange_width: f64,
        top_flange_thickness: f64,
        web_thickness: f64,
        bottom_flange_width: f64,
        bottom_flange_thickness: f64,
    },
    Pipe {
        outside_diameter: f64,
        wall_thickness: f64,
    },
    NonPrismatic {
        segments: Vec<NonPrismaticSegment>,
    },
}

impl FrameShape {
    pub fn section_type(&self) -> FrameSectionType {
        match self {
            FrameShape::Rectangle { .. } => FrameSectionType::Rectangular,
            FrameShape::Circle { .. } => FrameSectionType::Circle,
            FrameShape::ISection { .. } => FrameSectionType::I,
            FrameShape::Pipe { .. } => FrameSectionType::Pipe,
            FrameShape::NonPrismatic { .. } => FrameSectionType::Variable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSectionRecord {
    pub shape: FrameShape,
    /// Empty for nonprismatic sections
    pub material: String,
    pub color: i32,
    pub notes: String,
    pub guid: String,
    pub modifiers: FrameModifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSectionRecord {
    pub shell: ShellProperties,
    pub modifiers: AreaModifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableSectionRecord {
    pub material: String,
    pub area: f64,
    pub color: i32,
    pub notes: String,
    pub guid: String,
    pub modifiers: CableModifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSpringRecord {
    pub properties: PointSpringProperties,
    pub links: Vec<JointLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum LinkBehavior {
    Linear(LinearLinkProperties),
    Gap(GapLinkProperties),
}

impl LinkBehavior {
    pub fn link_type(&self) -> LinkType {
        match self {
            LinkBehavior::Linear(_) => LinkType::Linear,
            LinkBehavior::Gap(_) => LinkType::Gap,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub behavior: LinkBehavior,
    pub weight_and_mass: LinkWeightAndMass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameObjectRecord {
    pub point_i: [f64; 3],
    pub point_j: [f64; 3],
    pub section: String,
    pub modifiers: Option<FrameModifier>,
    /// `None` when no degree of freedom is released
    pub releases: Option<EndReleases>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaObjectRecord {
    pub points: Vec<[f64; 3]>,
    pub property: String,
    pub modifiers: Option<AreaModifier>,
}

// ============================================================================
// Model
// ============================================================================

/// Snapshot metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
    pub version: String,
    pub program: Program,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Everything the reference engine knows about one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelData {
    pub meta: ModelMeta,
    pub units: Units,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub materials: Table<MaterialRecord>,
    #[serde(default)]
    pub frame_sections: Table<FrameSectionRecord>,
    #[serde(default)]
    pub area_sections: Table<AreaSectionRecord>,
    #[serde(default)]
    pub cable_sections: Table<CableSectionRecord>,
    #[serde(default)]
    pub area_springs: Table<AreaSpringProperties>,
    #[serde(default)]
    pub point_springs: Table<PointSpringRecord>,
    #[serde(default)]
    pub links: Table<LinkRecord>,
    #[serde(default)]
    pub frames: Table<FrameObjectRecord>,
    #[serde(default)]
    pub areas: Table<AreaObjectRecord>,
    /// Last auto-generated object number
    #[serde(default)]
    pub last_object_id: u64,
}

impl ModelData {
    pub fn new(program: Program, units: Units) -> Self {
        let now = Utc::now();
        ModelData {
            meta: ModelMeta {
                version: SCHEMA_VERSION.to_string(),
                program,
                created: now,
                modified: now,
            },
            units,
            locked: false,
            materials: Table::default(),
            frame_sections: Table::default(),
            area_sections: Table::default(),
            cable_sections: Table::default(),
            area_springs: Table::default(),
            point_springs: Table::default(),
            links: Table::default(),
            frames: Table::default(),
            areas: Table::default(),
            last_object_id: 0,
        }
    }

    /// Mark the model as modified
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Next free object name: "1", "2", ... skipping names already taken
    pub fn next_object_name(&mut self) -> String {
        loop {
            self.last_object_id += 1;
            let candidate = self.last_object_id.to_string();
            if !self.frames.contains(&candidate) && !self.areas.contains(&candidate) {
                return candidate;
            }
        }
    }

    // ------------------------------------------------------------------------
    // Referential integrity
    // ------------------------------------------------------------------------

    pub fn material_in_use(&self, name: &str) -> bool {
        self.frame_sections.iter().any(|(_, s)| s.material == name)
            || self.area_sections.iter().any(|(_, s)| s.shell.material == name)
            || self.cable_sections.iter().any(|(_, s)| s.material == name)
    }

    pub fn frame_section_in_use(&self, name: &str) -> bool {
        self.frames.iter().any(|(_, f)| f.section == name)
            || self.frame_sections.iter().any(|(_, s)| match &s.shape {
                FrameShape::NonPrismatic { segments } => segments
                    .iter()
                    .any(|seg| seg.start_section == name || seg.end_section == name),
                _ => false,
            })
    }

    pub fn area_section_in_use(&self, name: &str) -> bool {
        self.areas.iter().any(|(_, a)| a.property == name)
    }

    pub fn link_in_use(&self, name: &str) -> bool {
        self.point_springs
            .iter()
            .any(|(_, s)| s.links.iter().any(|l| l.link == name))
    }

    pub fn rename_material_references(&mut self, from: &str, to: &str) {
        for section in self.frame_sections.values_mut() {
            if section.material == from {
                section.material = to.to_string();
            }
        }
        for section in self.area_sections.values_mut() {
            if section.shell.material == from {
                section.shell.material = to.to_string();
            }
        }
        for section in self.cable_sections.values_mut() {
            if section.material == from {
                section.material = to.to_string();
            }
        }
    }

    pub fn rename_frame_section_references(&mut self, from: &str, to: &str) {
        for frame in self.frames.values_mut() {
            if frame.section == from {
                frame.section = to.to_string();
            }
        }
        for section in self.frame_sections.values_mut() {
            if let FrameShape::NonPrismatic { segments } = &mut section.shape {
                for seg in segments.iter_mut() {
                    if seg.start_section == from {
                        seg.start_section = to.to_string();
                    }
                    if seg.end_section == from {
                        seg.end_section = to.to_string();
                    }
                }
            }
        }
    }

    pub fn rename_area_section_references(&mut self, from: &str, to: &str) {
        for area in self.areas.values_mut() {
            if area.property == from {
                area.property = to.to_string();
            }
        }
    }

    pub fn rename_link_references(&mut self, from: &str, to: &str) {
        for spring in self.point_springs.values_mut() {
            for link in spring.links.iter_mut() {
                if link.link == from {
                    link.link = to.to_string();
                }
            }
        }
    }

    /// Number of materials of one type
    pub fn material_count_of(&self, material_type: MaterialType) -> usize {
        self.materials
            .iter()
            .filter(|(_, m)| m.definition.material_type == material_type)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_preserves_order() {
        let mut table = Table::default();
        assert!(table.upsert("B", 1));
        assert!(table.upsert("A", 2));
        assert!(!table.upsert("B", 3));
        assert_eq!(table.names(), vec!["B", "A"]);
        assert_eq!(table.get("B"), Some(&3));
    }

    #[test]
    fn test_table_rename() {
        let mut table = Table::default();
        table.upsert("Old", 1);
        table.upsert("Other", 2);
        assert!(!table.rename("Missing", "New"));
        assert!(!table.rename("Old", "Other"));
        assert!(!table.rename("Old", ""));
        assert!(table.rename("Old", "New"));
        assert_eq!(table.names(), vec!["New", "Other"]);
    }

    #[test]
    fn test_next_object_name_skips_taken() {
        let mut model = ModelData::new(Program::Sap2000, Units::KipIn);
        model.frames.upsert(
            "1",
            FrameObjectRecord {
                point_i: [0.0; 3],
                point_j: [1.0, 0.0, 0.0],
                section: "R1".to_string(),
                modifiers: None,
                releases: None,
            },
        );
        assert_eq!(model.next_object_name(), "2");
        assert_eq!(model.next_object_name(), "3");
    }

    #[test]
    fn test_model_serialization_roundtrip() {
        let model = ModelData::new(Program::Etabs, Units::KnM);
        let json = serde_json::to_string(&model).unwrap();
        let back: ModelData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }
}
