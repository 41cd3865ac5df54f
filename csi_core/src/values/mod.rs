//! # Value Holders
//!
//! Records that batch related engine parameters into one typed value.
//!
//! Fixed-shape records (modifiers, per-degree-of-freedom tuples) convert to
//! and from the positional arrays the engine expects through `to_array()` and
//! `from_array()`. The conversions are exact inverses: field order is the
//! engine's positional order, and `from_array` rejects a slice of any other
//! length with [`ApiError::InvalidArrayLength`].
//!
//! ## Example
//!
//! ```rust
//! use csi_core::values::Stiffness;
//!
//! let k = Stiffness { u1: 1000.0, u2: 50.0, u3: 50.0, r1: 0.0, r2: 0.0, r3: 0.0 };
//! let flat = k.to_array();
//! assert_eq!(flat, [1000.0, 50.0, 50.0, 0.0, 0.0, 0.0]);
//! assert_eq!(Stiffness::from_array(&flat).unwrap(), k);
//! ```

pub mod links;
pub mod materials;
pub mod modifiers;
pub mod sections;
pub mod springs;

pub use links::{GapLinkProperties, LinearLinkProperties, LinkWeightAndMass};
pub use materials::{
    ConcreteProperties, IsotropicProperties, MaterialDamping, MaterialDefinition, SteelProperties,
    StressStrainCurve, StressStrainPoint, WeightAndMass,
};
pub use modifiers::{AreaModifier, CableModifier, FrameModifier};
pub use sections::{
    CableProperties, CircleSection, ISection, NonPrismaticSection, NonPrismaticSegment, PipeSection,
    RectangleSection, SegmentLength, ShellProperties, VariationType,
};
pub use springs::{AreaSpringProperties, JointLink, PointSpringProperties};

use serde::{Deserialize, Serialize};

use crate::errors::{ApiError, ApiResult};

/// Declares a fixed-shape record with positional array conversions.
macro_rules! array_record {
    (
        $(#[$meta:meta])*
        $name:ident: [$elem:ty; $len:expr] {
            $( $(#[$fmeta:meta])* $field:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: $elem ),+
        }

        impl $name {
            /// Number of positional values
            pub const LEN: usize = $len;

            /// Positional array in engine order
            pub fn to_array(&self) -> [$elem; $len] {
                [ $( self.$field ),+ ]
            }

            /// Rebuild from a positional array in engine order
            pub fn from_array(values: &[$elem]) -> ApiResult<Self> {
                let [ $( $field ),+ ]: [$elem; $len] = values.try_into().map_err(|_| {
                    ApiError::invalid_array_length(stringify!($name), $len, values.len())
                })?;
                Ok($name { $( $field ),+ })
            }
        }
    };
}

pub(crate) use array_record;

// ============================================================================
// Degrees of Freedom
// ============================================================================

array_record! {
    /// Flags per local degree of freedom (U1, U2, U3, R1, R2, R3).
    ///
    /// Used for frame end releases, where `true` means released.
    #[derive(Default)]
    DegreesOfFreedomLocal: [bool; 6] {
        u1, u2, u3, r1, r2, r3,
    }
}

array_record! {
    /// Flags per global degree of freedom (UX, UY, UZ, RX, RY, RZ)
    #[derive(Default)]
    DegreesOfFreedomGlobal: [bool; 6] {
        ux, uy, uz, rx, ry, rz,
    }
}

array_record! {
    /// Partial fixity spring values at a released frame end, per local DOF
    #[derive(Default)]
    Fixity: [f64; 6] {
        u1, u2, u3, r1, r2, r3,
    }
}

array_record! {
    /// Stiffness per local degree of freedom
    #[derive(Default)]
    Stiffness: [f64; 6] {
        u1, u2, u3, r1, r2, r3,
    }
}

array_record! {
    /// Damping coefficient per local degree of freedom
    #[derive(Default)]
    Damping: [f64; 6] {
        u1, u2, u3, r1, r2, r3,
    }
}

array_record! {
    /// Deformation per local degree of freedom (e.g. initial gap openings)
    #[derive(Default)]
    Deformations: [f64; 6] {
        u1, u2, u3, r1, r2, r3,
    }
}

impl DegreesOfFreedomLocal {
    /// All six degrees of freedom set
    pub fn all() -> Self {
        DegreesOfFreedomLocal::from_flags([true; 6])
    }

    pub fn from_flags(flags: [bool; 6]) -> Self {
        let [u1, u2, u3, r1, r2, r3] = flags;
        DegreesOfFreedomLocal { u1, u2, u3, r1, r2, r3 }
    }

    /// Number of degrees of freedom set
    pub fn count(&self) -> usize {
        self.to_array().iter().filter(|f| **f).count()
    }

    pub fn any(&self) -> bool {
        self.count() > 0
    }
}

impl DegreesOfFreedomGlobal {
    pub fn from_flags(flags: [bool; 6]) -> Self {
        let [ux, uy, uz, rx, ry, rz] = flags;
        DegreesOfFreedomGlobal { ux, uy, uz, rx, ry, rz }
    }
}

impl Stiffness {
    /// Same stiffness on all six degrees of freedom
    pub fn uniform(value: f64) -> Self {
        Stiffness { u1: value, u2: value, u3: value, r1: value, r2: value, r3: value }
    }
}

/// End releases and partial fixity springs of one frame object
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EndReleases {
    /// Released degrees of freedom at end I
    pub end_i: DegreesOfFreedomLocal,
    /// Released degrees of freedom at end J
    pub end_j: DegreesOfFreedomLocal,
    pub start_fixity: Fixity,
    pub end_fixity: Fixity,
}

impl EndReleases {
    /// Moment releases (R2, R3) at both ends
    pub fn pinned() -> Self {
        let moments = DegreesOfFreedomLocal { r2: true, r3: true, ..Default::default() };
        EndReleases {
            end_i: moments,
            end_j: moments,
            ..Default::default()
        }
    }

    /// Releasing U1, or R1, at both ends leaves the member unstable
    pub fn is_stable(&self) -> bool {
        !(self.end_i.u1 && self.end_j.u1) && !(self.end_i.r1 && self.end_j.r1)
    }

    pub fn is_released(&self) -> bool {
        self.end_i.any() || self.end_j.any()
    }
}

// ============================================================================
// Definition metadata
// ============================================================================

/// Display color, notes and GUID that trail most property `Set*` calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionInfo {
    /// Display color; -1 lets the engine pick one
    pub color: i32,
    pub notes: String,
    /// Empty lets the engine generate one
    pub guid: String,
}

impl Default for DefinitionInfo {
    fn default() -> Self {
        DefinitionInfo {
            color: -1,
            notes: String::new(),
            guid: String::new(),
        }
    }
}

impl DefinitionInfo {
    pub fn with_notes(notes: impl Into<String>) -> Self {
        DefinitionInfo {
            notes: notes.into(),
            ..Default::default()
        }
    }
}

/// Check that parallel input arrays share one length before a native call.
///
/// `fields` pairs each array's name with its length; the first entry sets the
/// expected length.
pub(crate) fn check_parallel(fields: &[(&str, usize)]) -> ApiResult<usize> {
    let Some(&(_, expected)) = fields.first() else {
        return Ok(0);
    };
    for &(field, actual) in &fields[1..] {
        if actual != expected {
            return Err(ApiError::length_mismatch(field, expected, actual));
        }
    }
    Ok(expected)
}

/// Convert a positional array of engine codes into enum members.
pub(crate) fn decode_all<T>(codes: &[i32], decode: impl Fn(i32) -> ApiResult<T>) -> ApiResult<Vec<T>> {
    codes.iter().map(|c| decode(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dof_roundtrip() {
        let dof = DegreesOfFreedomLocal { u1: true, u2: false, u3: false, r1: false, r2: true, r3: true };
        assert_eq!(dof.to_array(), [true, false, false, false, true, true]);
        assert_eq!(DegreesOfFreedomLocal::from_array(&dof.to_array()).unwrap(), dof);
        assert_eq!(dof.count(), 3);
    }

    #[test]
    fn test_global_dof_order() {
        let dof = DegreesOfFreedomGlobal::from_flags([false, false, true, false, false, false]);
        assert!(dof.uz);
        assert_eq!(DegreesOfFreedomGlobal::from_array(&dof.to_array()).unwrap(), dof);
    }

    #[test]
    fn test_six_value_records_roundtrip() {
        let values = [1.5, -2.0, 0.0, 1e6, 3.25, 7.0];
        assert_eq!(Fixity::from_array(&values).unwrap().to_array(), values);
        assert_eq!(Stiffness::from_array(&values).unwrap().to_array(), values);
        assert_eq!(Damping::from_array(&values).unwrap().to_array(), values);
        assert_eq!(Deformations::from_array(&values).unwrap().to_array(), values);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let err = Stiffness::from_array(&[1.0, 2.0]).unwrap_err();
        assert_eq!(err, ApiError::invalid_array_length("Stiffness", 6, 2));
        assert!(DegreesOfFreedomLocal::from_array(&[true; 7]).is_err());
    }

    #[test]
    fn test_check_parallel() {
        assert_eq!(check_parallel(&[("names", 3), ("dirs", 3), ("angles", 3)]).unwrap(), 3);
        assert_eq!(
            check_parallel(&[("names", 3), ("dirs", 3), ("angles", 2)]).unwrap_err(),
            ApiError::length_mismatch("angles", 3, 2)
        );
        assert_eq!(check_parallel(&[]).unwrap(), 0);
    }

    #[test]
    fn test_end_release_stability() {
        assert!(EndReleases::pinned().is_stable());
        assert!(EndReleases::default().is_stable());
        assert!(!EndReleases::default().is_released());

        let axial = DegreesOfFreedomLocal { u1: true, ..Default::default() };
        let one_end = EndReleases { end_i: axial, ..Default::default() };
        assert!(one_end.is_stable());
        let both_ends = EndReleases { end_j: axial, ..one_end };
        assert!(!both_ends.is_stable());
    }

    #[test]
    fn test_definition_info_defaults() {
        let info = DefinitionInfo::default();
        assert_eq!(info.color, -1);
        assert!(info.guid.is_empty());
        assert_eq!(DefinitionInfo::with_notes("fy=50").notes, "fy=50");
    }
}
