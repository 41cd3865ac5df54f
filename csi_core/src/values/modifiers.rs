//! Stiffness, mass and weight modifiers.
//!
//! A modifier is a unitless factor the engine multiplies a section property
//! by. All factors default to 1.0 (unmodified).

use serde::{Deserialize, Serialize};

use super::array_record;
use crate::errors::{ApiError, ApiResult};

array_record! {
    /// Frame section / frame object modifiers, in engine order
    FrameModifier: [f64; 8] {
        /// Cross-sectional area
        area,
        /// Shear area in the local 2 direction
        shear_2,
        /// Shear area in the local 3 direction
        shear_3,
        /// Torsional constant
        torsion,
        /// Moment of inertia about the local 2 axis
        inertia_22,
        /// Moment of inertia about the local 3 axis
        inertia_33,
        mass,
        weight,
    }
}

array_record! {
    /// Area section / area object modifiers, in engine order
    AreaModifier: [f64; 10] {
        /// Membrane f11
        f11,
        /// Membrane f22
        f22,
        /// Membrane f12
        f12,
        /// Bending m11
        m11,
        /// Bending m22
        m22,
        /// Bending m12
        m12,
        /// Shear v13
        v13,
        /// Shear v23
        v23,
        mass,
        weight,
    }
}

array_record! {
    /// Cable section modifiers, in engine order
    CableModifier: [f64; 3] {
        area,
        mass,
        weight,
    }
}

impl Default for FrameModifier {
    fn default() -> Self {
        FrameModifier::uniform(1.0)
    }
}

impl Default for AreaModifier {
    fn default() -> Self {
        AreaModifier::uniform(1.0)
    }
}

impl Default for CableModifier {
    fn default() -> Self {
        CableModifier { area: 1.0, mass: 1.0, weight: 1.0 }
    }
}

impl FrameModifier {
    pub fn uniform(value: f64) -> Self {
        FrameModifier {
            area: value,
            shear_2: value,
            shear_3: value,
            torsion: value,
            inertia_22: value,
            inertia_33: value,
            mass: value,
            weight: value,
        }
    }

    /// Typical cracked-section modifiers for a concrete beam
    pub fn cracked_beam() -> Self {
        FrameModifier {
            torsion: 0.01,
            inertia_22: 0.35,
            inertia_33: 0.35,
            ..Default::default()
        }
    }

    /// True when every factor is 1.0
    pub fn is_unity(&self) -> bool {
        self.to_array().iter().all(|v| *v == 1.0)
    }
}

impl AreaModifier {
    pub fn uniform(value: f64) -> Self {
        AreaModifier::from_values([value; 10])
    }

    fn from_values(values: [f64; 10]) -> Self {
        let [f11, f22, f12, m11, m22, m12, v13, v23, mass, weight] = values;
        AreaModifier { f11, f22, f12, m11, m22, m12, v13, v23, mass, weight }
    }

    /// Typical cracked-section modifiers for a concrete slab
    pub fn cracked_slab() -> Self {
        AreaModifier {
            m11: 0.25,
            m22: 0.25,
            m12: 0.25,
            ..Default::default()
        }
    }

    pub fn is_unity(&self) -> bool {
        self.to_array().iter().all(|v| *v == 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_modifier_roundtrip() {
        let values = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.001];
        let m = FrameModifier::from_array(&values).unwrap();
        assert_eq!(m.weight, 0.001);
        assert_eq!(m.to_array(), values);
    }

    #[test]
    fn test_area_modifier_order() {
        let values = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];
        let m = AreaModifier::from_array(&values).unwrap();
        assert_eq!(m.f11, 0.1);
        assert_eq!(m.v23, 0.8);
        assert_eq!(m.weight, 1.0);
        assert_eq!(m.to_array(), values);
    }

    #[test]
    fn test_cable_modifier_roundtrip() {
        let m = CableModifier { area: 0.5, mass: 2.0, weight: 0.0 };
        assert_eq!(CableModifier::from_array(&m.to_array()).unwrap(), m);
    }

    #[test]
    fn test_defaults_are_unity() {
        assert!(FrameModifier::default().is_unity());
        assert!(AreaModifier::default().is_unity());
        assert_eq!(CableModifier::default().to_array(), [1.0; 3]);
        assert!(!FrameModifier::cracked_beam().is_unity());
    }

    #[test]
    fn test_nine_values_is_not_a_frame_modifier() {
        let err = FrameModifier::from_array(&[1.0; 9]).unwrap_err();
        assert_eq!(err, ApiError::invalid_array_length("FrameModifier", 8, 9));
    }

    #[test]
    fn test_cracked_slab() {
        let m = AreaModifier::cracked_slab();
        assert_eq!(m.m11, 0.25);
        assert_eq!(m.f11, 1.0);
    }
}
