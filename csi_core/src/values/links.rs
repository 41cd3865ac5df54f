//! Link property records.

use serde::{Deserialize, Serialize};

use super::{Damping, DegreesOfFreedomLocal, Deformations, Stiffness};

/// Linear link (`PropLink.SetLinear`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearLinkProperties {
    /// Active degrees of freedom
    pub dof: DegreesOfFreedomLocal,
    /// Fixed degrees of freedom (must also be active)
    pub fixed: DegreesOfFreedomLocal,
    /// Effective stiffness
    pub stiffness: Stiffness,
    /// Effective damping
    pub damping: Damping,
    /// Distance from end J to the U2 shear spring
    pub dj2: f64,
    /// Distance from end J to the U3 shear spring
    pub dj3: f64,
    pub stiffness_coupled: bool,
    pub damping_coupled: bool,
    pub notes: String,
    pub guid: String,
}

impl LinearLinkProperties {
    /// Uncoupled axial-only link
    pub fn axial(stiffness: f64) -> Self {
        LinearLinkProperties {
            dof: DegreesOfFreedomLocal { u1: true, ..Default::default() },
            fixed: DegreesOfFreedomLocal::default(),
            stiffness: Stiffness { u1: stiffness, ..Default::default() },
            damping: Damping::default(),
            dj2: 0.0,
            dj3: 0.0,
            stiffness_coupled: false,
            damping_coupled: false,
            notes: String::new(),
            guid: String::new(),
        }
    }
}

/// Gap link (`PropLink.SetGap`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapLinkProperties {
    pub dof: DegreesOfFreedomLocal,
    pub fixed: DegreesOfFreedomLocal,
    /// Degrees of freedom with nonlinear behavior
    pub nonlinear: DegreesOfFreedomLocal,
    /// Linear effective stiffness
    pub effective_stiffness: Stiffness,
    /// Linear effective damping
    pub effective_damping: Damping,
    /// Nonlinear stiffness
    pub stiffness: Stiffness,
    /// Initial gap opening
    pub opening: Deformations,
    pub dj2: f64,
    pub dj3: f64,
    pub notes: String,
    pub guid: String,
}

impl GapLinkProperties {
    /// Compression-only gap along U1
    pub fn axial(stiffness: f64, opening: f64) -> Self {
        let u1 = DegreesOfFreedomLocal { u1: true, ..Default::default() };
        GapLinkProperties {
            dof: u1,
            fixed: DegreesOfFreedomLocal::default(),
            nonlinear: u1,
            effective_stiffness: Stiffness::default(),
            effective_damping: Damping::default(),
            stiffness: Stiffness { u1: stiffness, ..Default::default() },
            opening: Deformations { u1: opening, ..Default::default() },
            dj2: 0.0,
            dj3: 0.0,
            notes: String::new(),
            guid: String::new(),
        }
    }
}

/// Link weight, mass and rotational inertia (`PropLink.SetWeightAndMass`)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LinkWeightAndMass {
    pub weight: f64,
    pub mass: f64,
    pub rotational_inertia_1: f64,
    pub rotational_inertia_2: f64,
    pub rotational_inertia_3: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axial_linear_link() {
        let link = LinearLinkProperties::axial(500.0);
        assert_eq!(link.dof.to_array(), [true, false, false, false, false, false]);
        assert_eq!(link.stiffness.u1, 500.0);
        assert_eq!(link.stiffness.u2, 0.0);
    }

    #[test]
    fn test_axial_gap() {
        let gap = GapLinkProperties::axial(1000.0, 0.25);
        assert!(gap.nonlinear.u1);
        assert_eq!(gap.opening.to_array()[0], 0.25);
    }
}
