//! # Engine Enumerations
//!
//! Every enumeration the engine takes or returns travels across the boundary
//! as a raw integer. The types here give each code a name; `code()` and
//! `from_code()` are exact inverses, and an integer with no member is reported
//! as [`ApiError::UnknownCode`] rather than silently mapped.
//!
//! ## Example
//!
//! ```rust
//! use csi_core::enums::{MaterialType, SpringNonlinearity};
//!
//! assert_eq!(MaterialType::Concrete.code(), 2);
//! assert_eq!(SpringNonlinearity::from_code(1).unwrap(), SpringNonlinearity::CompressionOnly);
//! assert!(SpringNonlinearity::from_code(7).is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ApiError, ApiResult};

/// Declares an enum backed by engine integer codes.
macro_rules! engine_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:expr => $label:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// All members in code order
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Integer code used by the engine
            pub fn code(&self) -> i32 {
                match self {
                    $( $name::$variant => $code ),+
                }
            }

            /// Member for an engine code
            pub fn from_code(code: i32) -> ApiResult<Self> {
                match code {
                    $( c if c == $code => Ok($name::$variant), )+
                    _ => Err(ApiError::unknown_code(stringify!($name), code)),
                }
            }

            /// Label as shown in the engine's user interface
            pub fn label(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.label())
            }
        }
    };
}

pub(crate) use engine_enum;

engine_enum! {
    /// Which objects a `Set*` on an object accessor applies to
    #[derive(Default)]
    ItemType {
        /// The named object
        #[default]
        Objects = 0 => "Object",
        /// Every object in the named group
        Group = 1 => "Group",
        /// Every selected object; the name is ignored
        SelectedObjects = 2 => "Selected Objects",
    }
}

engine_enum! {
    /// Material type (`eMatType`)
    MaterialType {
        Steel = 1 => "Steel",
        Concrete = 2 => "Concrete",
        NoDesign = 3 => "NoDesign",
        Aluminum = 4 => "Aluminum",
        ColdFormed = 5 => "ColdFormed",
        Rebar = 6 => "Rebar",
        Tendon = 7 => "Tendon",
        Masonry = 8 => "Masonry",
    }
}

engine_enum! {
    /// Frame section shape (`eFramePropType`)
    FrameSectionType {
        I = 1 => "I/Wide Flange",
        Channel = 2 => "Channel",
        Tee = 3 => "Tee",
        Angle = 4 => "Angle",
        DoubleAngle = 5 => "Double Angle",
        Box = 6 => "Box/Tube",
        Pipe = 7 => "Pipe",
        Rectangular = 8 => "Rectangular",
        Circle = 9 => "Circle",
        General = 10 => "General",
        DoubleChannel = 11 => "Double Channel",
        Auto = 12 => "Auto Select List",
        SectionDesigner = 13 => "Section Designer",
        Variable = 14 => "Nonprismatic",
        Joist = 15 => "Joist",
        Bridge = 16 => "Bridge",
    }
}

engine_enum! {
    /// Shell formulation (`ShellType` argument of `PropArea.SetShell`)
    ShellType {
        ShellThin = 1 => "Shell - Thin",
        ShellThick = 2 => "Shell - Thick",
        Membrane = 3 => "Membrane",
        PlateThin = 4 => "Plate - Thin",
        PlateThick = 5 => "Plate - Thick",
        Layered = 6 => "Shell - Layered/Nonlinear",
    }
}

engine_enum! {
    /// Link property type (`eLinkPropType`)
    LinkType {
        Linear = 1 => "Linear",
        Damper = 2 => "Damper",
        Gap = 3 => "Gap",
        Hook = 4 => "Hook",
        PlasticWen = 5 => "Plastic (Wen)",
        RubberIsolator = 6 => "Rubber Isolator",
        FrictionIsolator = 7 => "Friction Isolator",
        MultilinearElastic = 8 => "MultiLinear Elastic",
        MultilinearPlastic = 9 => "MultiLinear Plastic",
        TensionCompressionFrictionIsolator = 10 => "T/C Friction Isolator",
    }
}

engine_enum! {
    /// Nonlinear behavior of an area spring in the local 3 direction
    SpringNonlinearity {
        Linear = 0 => "Linear",
        CompressionOnly = 1 => "Compression Only",
        TensionOnly = 2 => "Tension Only",
    }
}

engine_enum! {
    /// How an area spring stiffness is defined
    AreaSpringOption {
        UserDefined = 1 => "User Defined",
        SoilProfile = 2 => "Based on Soil Profile",
    }
}

engine_enum! {
    /// How a point spring stiffness is defined
    PointSpringOption {
        UserDefined = 1 => "User Defined",
        SoilProfile = 2 => "Based on Soil Profile",
        SingleJointLinks = 3 => "Single Joint Links",
    }
}

engine_enum! {
    /// Global axis a single-joint link is oriented along
    LinkAxialDirection {
        PositiveX = 1 => "+X",
        PositiveY = 2 => "+Y",
        PositiveZ = 3 => "+Z",
        NegativeX = -1 => "-X",
        NegativeY = -2 => "-Y",
        NegativeZ = -3 => "-Z",
    }
}

engine_enum! {
    /// Stress-strain curve definition for steel
    SteelCurveType {
        UserDefined = 0 => "User Defined",
        ParametricSimple = 1 => "Parametric - Simple",
        ParametricPark = 2 => "Parametric - Park",
    }
}

engine_enum! {
    /// Stress-strain curve definition for concrete
    ConcreteCurveType {
        UserDefined = 0 => "User Defined",
        ParametricSimple = 1 => "Parametric - Simple",
        Mander = 2 => "Parametric - Mander",
    }
}

engine_enum! {
    /// Hysteresis model for nonlinear material behavior
    HysteresisType {
        Elastic = 0 => "Elastic",
        Kinematic = 1 => "Kinematic",
        Takeda = 2 => "Takeda",
        Pivot = 3 => "Pivot",
        Concrete = 4 => "Concrete",
        BucklingRestrainedBrace = 5 => "BRB Hardening",
        Degrading = 6 => "Degrading",
        Isotropic = 7 => "Isotropic",
    }
}

engine_enum! {
    /// Whether `SetWeightAndMass` receives a weight or a mass per volume
    WeightOrMass {
        Weight = 1 => "Weight per Unit Volume",
        Mass = 2 => "Mass per Unit Volume",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every member survives code -> member -> code unchanged
    fn assert_codes_roundtrip<T, F, G>(all: &[T], code: F, from_code: G)
    where
        T: Copy + PartialEq + fmt::Debug,
        F: Fn(&T) -> i32,
        G: Fn(i32) -> ApiResult<T>,
    {
        for member in all {
            let raw = code(member);
            let back = from_code(raw).unwrap();
            assert_eq!(back, *member);
            assert_eq!(code(&back), raw);
        }
    }

    #[test]
    fn test_item_type_defaults_to_objects() {
        assert_eq!(ItemType::default(), ItemType::Objects);
        assert_eq!(ItemType::default().code(), 0);
    }

    #[test]
    fn test_all_enums_roundtrip() {
        assert_codes_roundtrip(ItemType::ALL, ItemType::code, ItemType::from_code);
        assert_codes_roundtrip(MaterialType::ALL, MaterialType::code, MaterialType::from_code);
        assert_codes_roundtrip(FrameSectionType::ALL, FrameSectionType::code, FrameSectionType::from_code);
        assert_codes_roundtrip(ShellType::ALL, ShellType::code, ShellType::from_code);
        assert_codes_roundtrip(LinkType::ALL, LinkType::code, LinkType::from_code);
        assert_codes_roundtrip(SpringNonlinearity::ALL, SpringNonlinearity::code, SpringNonlinearity::from_code);
        assert_codes_roundtrip(AreaSpringOption::ALL, AreaSpringOption::code, AreaSpringOption::from_code);
        assert_codes_roundtrip(PointSpringOption::ALL, PointSpringOption::code, PointSpringOption::from_code);
        assert_codes_roundtrip(LinkAxialDirection::ALL, LinkAxialDirection::code, LinkAxialDirection::from_code);
        assert_codes_roundtrip(SteelCurveType::ALL, SteelCurveType::code, SteelCurveType::from_code);
        assert_codes_roundtrip(ConcreteCurveType::ALL, ConcreteCurveType::code, ConcreteCurveType::from_code);
        assert_codes_roundtrip(HysteresisType::ALL, HysteresisType::code, HysteresisType::from_code);
        assert_codes_roundtrip(WeightOrMass::ALL, WeightOrMass::code, WeightOrMass::from_code);
    }

    #[test]
    fn test_nonlinear_option_codes() {
        assert_eq!(SpringNonlinearity::from_code(0).unwrap(), SpringNonlinearity::Linear);
        assert_eq!(SpringNonlinearity::from_code(2).unwrap(), SpringNonlinearity::TensionOnly);
        assert_eq!(SpringNonlinearity::TensionOnly.code(), 2);
    }

    #[test]
    fn test_unknown_code_is_reported() {
        let err = MaterialType::from_code(0).unwrap_err();
        assert_eq!(err, ApiError::unknown_code("MaterialType", 0));
    }

    #[test]
    fn test_negative_axial_codes() {
        assert_eq!(LinkAxialDirection::from_code(-3).unwrap(), LinkAxialDirection::NegativeZ);
        assert!(LinkAxialDirection::from_code(0).is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(FrameSectionType::Rectangular.to_string(), "Rectangular");
        assert_eq!(LinkAxialDirection::NegativeY.to_string(), "-Y");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&ShellType::PlateThick).unwrap();
        assert_eq!(json, "\"PlateThick\"");
        let parsed: ShellType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ShellType::PlateThick);
    }
}
