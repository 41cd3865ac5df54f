//! Area and point spring property records.

use serde::{Deserialize, Serialize};

use super::{DefinitionInfo, Stiffness};
use crate::enums::{AreaSpringOption, LinkAxialDirection, PointSpringOption, SpringNonlinearity};

/// Area spring property (`PropAreaSpring.SetAreaSpringProp`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSpringProperties {
    /// Stiffness per unit area in the local 1 direction
    pub u1: f64,
    /// Stiffness per unit area in the local 2 direction
    pub u2: f64,
    /// Stiffness per unit area in the local 3 direction
    pub u3: f64,
    /// Behavior in the local 3 direction
    pub nonlinearity: SpringNonlinearity,
    pub option: AreaSpringOption,
    /// Soil profile name, used when `option` is `SoilProfile`
    pub soil_profile: String,
    pub end_length_ratio: f64,
    pub period: f64,
    pub info: DefinitionInfo,
}

impl AreaSpringProperties {
    /// User-defined spring with the given stiffnesses
    pub fn user_defined(u1: f64, u2: f64, u3: f64, nonlinearity: SpringNonlinearity) -> Self {
        AreaSpringProperties {
            u1,
            u2,
            u3,
            nonlinearity,
            option: AreaSpringOption::UserDefined,
            soil_profile: String::new(),
            end_length_ratio: 0.0,
            period: 0.0,
            info: DefinitionInfo::default(),
        }
    }
}

/// Point spring property (`PropPointSpring.SetPointSpringProp`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSpringProperties {
    pub option: PointSpringOption,
    /// Stiffness per degree of freedom in `coordinate_system`
    pub stiffness: Stiffness,
    pub coordinate_system: String,
    pub soil_profile: String,
    pub footing: String,
    pub period: f64,
    pub info: DefinitionInfo,
}

impl PointSpringProperties {
    pub fn user_defined(stiffness: Stiffness) -> Self {
        PointSpringProperties {
            option: PointSpringOption::UserDefined,
            stiffness,
            coordinate_system: "Global".to_string(),
            soil_profile: String::new(),
            footing: String::new(),
            period: 0.0,
            info: DefinitionInfo::default(),
        }
    }
}

/// One link of a single-joint-link point spring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointLink {
    /// Link property name
    pub link: String,
    pub axial_direction: LinkAxialDirection,
    /// Rotation about the axial direction, degrees
    pub angle: f64,
}

impl JointLink {
    pub fn new(link: impl Into<String>, axial_direction: LinkAxialDirection, angle: f64) -> Self {
        JointLink {
            link: link.into(),
            axial_direction,
            angle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_defined_area_spring() {
        let spring = AreaSpringProperties::user_defined(0.0, 0.0, 150.0, SpringNonlinearity::CompressionOnly);
        assert_eq!(spring.option, AreaSpringOption::UserDefined);
        assert_eq!(spring.nonlinearity.code(), 1);
    }

    #[test]
    fn test_user_defined_point_spring() {
        let spring = PointSpringProperties::user_defined(Stiffness::uniform(10.0));
        assert_eq!(spring.coordinate_system, "Global");
        assert_eq!(spring.stiffness.to_array(), [10.0; 6]);
    }
}
