//! Engine builds and their capability sets.
//!
//! The native object model differs slightly between programs and releases:
//! SAP2000 has cable properties but no named spring properties, ETABS the
//! reverse, and a handful of methods only appeared in later releases. Rather
//! than compiling the accessors once per build, the version is picked at
//! runtime and every [`Call`](super::Call) is checked against this table
//! before it reaches the engine.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{EntryPoint, Interface};
use crate::errors::ApiError;

/// The program family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Program {
    Sap2000,
    Etabs,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Program::Sap2000 => write!(f, "SAP2000"),
            Program::Etabs => write!(f, "ETABS"),
        }
    }
}

/// A specific engine release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum EngineVersion {
    #[serde(rename = "sap2000-v16")]
    Sap2000V16,
    #[serde(rename = "sap2000-v17")]
    Sap2000V17,
    #[serde(rename = "sap2000-v18")]
    Sap2000V18,
    #[serde(rename = "sap2000-v19")]
    #[default]
    Sap2000V19,
    #[serde(rename = "etabs-2013")]
    Etabs2013,
    #[serde(rename = "etabs-2015")]
    Etabs2015,
    #[serde(rename = "etabs-2016")]
    Etabs2016,
}

/// Methods whose availability differs from the rest of their interface
struct MethodRule {
    interface: Interface,
    methods: &'static [&'static str],
    available: fn(EngineVersion) -> bool,
}

static METHOD_RULES: &[MethodRule] = &[
    MethodRule {
        interface: Interface::PropPointSpring,
        methods: &["SetSingleJointLinks", "GetSingleJointLinks"],
        available: etabs_2015_or_later,
    },
    MethodRule {
        interface: Interface::PropFrame,
        methods: &["SetNonPrismatic", "GetNonPrismatic"],
        available: is_sap2000,
    },
];

fn etabs_2015_or_later(v: EngineVersion) -> bool {
    matches!(v, EngineVersion::Etabs2015 | EngineVersion::Etabs2016)
}

fn is_sap2000(v: EngineVersion) -> bool {
    v.program() == Program::Sap2000
}

/// Interfaces exposed by each program family
static INTERFACES: Lazy<HashMap<Program, Vec<Interface>>> = Lazy::new(|| {
    let common = [
        Interface::SapModel,
        Interface::File,
        Interface::FrameObj,
        Interface::AreaObj,
        Interface::PropMaterial,
        Interface::PropFrame,
        Interface::PropArea,
        Interface::PropLink,
    ];

    let mut sap = common.to_vec();
    sap.push(Interface::PropCable);

    let mut etabs = common.to_vec();
    etabs.push(Interface::PropAreaSpring);
    etabs.push(Interface::PropPointSpring);

    let mut map = HashMap::new();
    map.insert(Program::Sap2000, sap);
    map.insert(Program::Etabs, etabs);
    map
});

impl EngineVersion {
    /// All supported builds, oldest first within each program
    pub const ALL: [EngineVersion; 7] = [
        EngineVersion::Sap2000V16,
        EngineVersion::Sap2000V17,
        EngineVersion::Sap2000V18,
        EngineVersion::Sap2000V19,
        EngineVersion::Etabs2013,
        EngineVersion::Etabs2015,
        EngineVersion::Etabs2016,
    ];

    pub fn program(&self) -> Program {
        match self {
            EngineVersion::Sap2000V16
            | EngineVersion::Sap2000V17
            | EngineVersion::Sap2000V18
            | EngineVersion::Sap2000V19 => Program::Sap2000,
            EngineVersion::Etabs2013 | EngineVersion::Etabs2015 | EngineVersion::Etabs2016 => Program::Etabs,
        }
    }

    /// Version number as reported by `SapModel.GetVersion`
    pub fn number(&self) -> f64 {
        match self {
            EngineVersion::Sap2000V16 => 16.0,
            EngineVersion::Sap2000V17 => 17.0,
            EngineVersion::Sap2000V18 => 18.0,
            EngineVersion::Sap2000V19 => 19.0,
            EngineVersion::Etabs2013 => 13.0,
            EngineVersion::Etabs2015 => 15.0,
            EngineVersion::Etabs2016 => 16.0,
        }
    }

    /// Stable identifier, also accepted by `FromStr`
    pub fn id(&self) -> &'static str {
        match self {
            EngineVersion::Sap2000V16 => "sap2000-v16",
            EngineVersion::Sap2000V17 => "sap2000-v17",
            EngineVersion::Sap2000V18 => "sap2000-v18",
            EngineVersion::Sap2000V19 => "sap2000-v19",
            EngineVersion::Etabs2013 => "etabs-2013",
            EngineVersion::Etabs2015 => "etabs-2015",
            EngineVersion::Etabs2016 => "etabs-2016",
        }
    }

    /// Human-readable label, e.g. "SAP2000 v19"
    pub fn label(&self) -> String {
        match self.program() {
            Program::Sap2000 => format!("SAP2000 v{}", self.number()),
            Program::Etabs => format!("ETABS 20{}", self.number()),
        }
    }

    /// Interfaces this build exposes
    pub fn interfaces(&self) -> &'static [Interface] {
        INTERFACES
            .get(&self.program())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn supports_interface(&self, interface: Interface) -> bool {
        self.interfaces().contains(&interface)
    }

    /// Whether `entry` can be invoked on this build
    pub fn supports(&self, entry: EntryPoint) -> bool {
        if !self.supports_interface(entry.interface) {
            return false;
        }
        METHOD_RULES
            .iter()
            .find(|rule| rule.interface == entry.interface && rule.methods.contains(&entry.method))
            .map(|rule| (rule.available)(*self))
            .unwrap_or(true)
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for EngineVersion {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        EngineVersion::ALL
            .iter()
            .copied()
            .find(|v| v.id() == wanted)
            .ok_or_else(|| ApiError::invalid_input("engine_version", s, "unknown engine version"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_split() {
        assert_eq!(EngineVersion::Sap2000V16.program(), Program::Sap2000);
        assert_eq!(EngineVersion::Etabs2013.program(), Program::Etabs);
    }

    #[test]
    fn test_cable_is_sap_only() {
        let count = EntryPoint::new(Interface::PropCable, "Count");
        assert!(EngineVersion::Sap2000V17.supports(count));
        assert!(!EngineVersion::Etabs2016.supports(count));
    }

    #[test]
    fn test_springs_are_etabs_only() {
        let set = EntryPoint::new(Interface::PropAreaSpring, "SetAreaSpringProp");
        assert!(EngineVersion::Etabs2013.supports(set));
        assert!(!EngineVersion::Sap2000V19.supports(set));
    }

    #[test]
    fn test_single_joint_links_need_etabs_2015() {
        let set = EntryPoint::new(Interface::PropPointSpring, "SetSingleJointLinks");
        assert!(!EngineVersion::Etabs2013.supports(set));
        assert!(EngineVersion::Etabs2015.supports(set));
        assert!(EngineVersion::Etabs2016.supports(set));
    }

    #[test]
    fn test_non_prismatic_is_sap_only() {
        let set = EntryPoint::new(Interface::PropFrame, "SetNonPrismatic");
        let rect = EntryPoint::new(Interface::PropFrame, "SetRectangle");
        assert!(EngineVersion::Sap2000V16.supports(set));
        assert!(!EngineVersion::Etabs2016.supports(set));
        assert!(EngineVersion::Etabs2016.supports(rect));
    }

    #[test]
    fn test_parse_and_label() {
        let v: EngineVersion = "ETABS-2015".parse().unwrap();
        assert_eq!(v, EngineVersion::Etabs2015);
        assert_eq!(v.label(), "ETABS 2015");
        assert_eq!(EngineVersion::Sap2000V18.label(), "SAP2000 v18");
        assert!("sap2000-v12".parse::<EngineVersion>().is_err());
    }

    #[test]
    fn test_serde_uses_ids() {
        let json = serde_json::to_string(&EngineVersion::Sap2000V17).unwrap();
        assert_eq!(json, "\"sap2000-v17\"");
        for v in EngineVersion::ALL {
            let parsed: EngineVersion = serde_json::from_str(&format!("\"{}\"", v.id())).unwrap();
            assert_eq!(parsed, v);
        }
    }
}
