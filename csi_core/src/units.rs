//! # Unit Systems
//!
//! The engine works in one "present units" system at a time, chosen from a
//! fixed list (`eUnits`). Values crossing the boundary are always expressed in
//! the present units; nothing in this crate converts them on the way through.
//!
//! [`Units`] names each system and splits it into its force, length and
//! temperature parts, which is enough to convert a value between systems when
//! a caller needs to.
//!
//! ## Example
//!
//! ```rust
//! use csi_core::units::{Units, LengthUnit};
//!
//! let units = Units::KipIn;
//! assert_eq!(units.code(), 3);
//! assert_eq!(units.length(), LengthUnit::Inch);
//!
//! // 50 ksi in kN/m²
//! let fy = units.convert_stress(50.0, Units::KnM);
//! assert!((fy - 344_737.9).abs() < 0.1);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::engine_enum;
use crate::errors::{ApiError, ApiResult};

// ============================================================================
// Unit Components
// ============================================================================

/// Force unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForceUnit {
    Pound,
    Kip,
    Kilonewton,
    KilogramForce,
    Newton,
    Tonne,
}

impl ForceUnit {
    /// Size of one unit in newtons
    pub fn to_newtons(&self) -> f64 {
        match self {
            ForceUnit::Pound => 4.448_221_615_260_5,
            ForceUnit::Kip => 4_448.221_615_260_5,
            ForceUnit::Kilonewton => 1_000.0,
            ForceUnit::KilogramForce => 9.806_65,
            ForceUnit::Newton => 1.0,
            ForceUnit::Tonne => 9_806.65,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ForceUnit::Pound => "lb",
            ForceUnit::Kip => "kip",
            ForceUnit::Kilonewton => "kN",
            ForceUnit::KilogramForce => "kgf",
            ForceUnit::Newton => "N",
            ForceUnit::Tonne => "Ton",
        }
    }
}

/// Length unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LengthUnit {
    Inch,
    Foot,
    Millimeter,
    Centimeter,
    Meter,
}

impl LengthUnit {
    /// Size of one unit in meters
    pub fn to_meters(&self) -> f64 {
        match self {
            LengthUnit::Inch => 0.0254,
            LengthUnit::Foot => 0.3048,
            LengthUnit::Millimeter => 0.001,
            LengthUnit::Centimeter => 0.01,
            LengthUnit::Meter => 1.0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Inch => "in",
            LengthUnit::Foot => "ft",
            LengthUnit::Millimeter => "mm",
            LengthUnit::Centimeter => "cm",
            LengthUnit::Meter => "m",
        }
    }
}

/// Temperature unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureUnit {
    Fahrenheit,
    Celsius,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Fahrenheit => "F",
            TemperatureUnit::Celsius => "C",
        }
    }
}

// ============================================================================
// Present Units
// ============================================================================

engine_enum! {
    /// A present-units system (`eUnits`)
    Units {
        LbIn = 1 => "lb, in, F",
        LbFt = 2 => "lb, ft, F",
        KipIn = 3 => "kip, in, F",
        KipFt = 4 => "kip, ft, F",
        KnMm = 5 => "kN, mm, C",
        KnM = 6 => "kN, m, C",
        KgfMm = 7 => "kgf, mm, C",
        KgfM = 8 => "kgf, m, C",
        NMm = 9 => "N, mm, C",
        NM = 10 => "N, m, C",
        TonMm = 11 => "Ton, mm, C",
        TonM = 12 => "Ton, m, C",
        KnCm = 13 => "kN, cm, C",
        KgfCm = 14 => "kgf, cm, C",
        NCm = 15 => "N, cm, C",
        TonCm = 16 => "Ton, cm, C",
    }
}

impl Default for Units {
    fn default() -> Self {
        Units::KipIn
    }
}

impl Units {
    pub fn force(&self) -> ForceUnit {
        match self {
            Units::LbIn | Units::LbFt => ForceUnit::Pound,
            Units::KipIn | Units::KipFt => ForceUnit::Kip,
            Units::KnMm | Units::KnM | Units::KnCm => ForceUnit::Kilonewton,
            Units::KgfMm | Units::KgfM | Units::KgfCm => ForceUnit::KilogramForce,
            Units::NMm | Units::NM | Units::NCm => ForceUnit::Newton,
            Units::TonMm | Units::TonM | Units::TonCm => ForceUnit::Tonne,
        }
    }

    pub fn length(&self) -> LengthUnit {
        match self {
            Units::LbIn | Units::KipIn => LengthUnit::Inch,
            Units::LbFt | Units::KipFt => LengthUnit::Foot,
            Units::KnMm | Units::KgfMm | Units::NMm | Units::TonMm => LengthUnit::Millimeter,
            Units::KnCm | Units::KgfCm | Units::NCm | Units::TonCm => LengthUnit::Centimeter,
            Units::KnM | Units::KgfM | Units::NM | Units::TonM => LengthUnit::Meter,
        }
    }

    pub fn temperature(&self) -> TemperatureUnit {
        match self {
            Units::LbIn | Units::LbFt | Units::KipIn | Units::KipFt => TemperatureUnit::Fahrenheit,
            _ => TemperatureUnit::Celsius,
        }
    }

    /// Look up a system by its label or identifier ("kip, in, F", "KipIn", "3")
    pub fn parse(s: &str) -> ApiResult<Self> {
        let wanted = s.trim();
        if let Ok(code) = wanted.parse::<i32>() {
            return Units::from_code(code);
        }
        let normalized: String = wanted.chars().filter(|c| !c.is_whitespace()).collect();
        Units::ALL
            .iter()
            .copied()
            .find(|u| {
                let label: String = u.label().chars().filter(|c| !c.is_whitespace()).collect();
                label.eq_ignore_ascii_case(&normalized) || format!("{:?}", u).eq_ignore_ascii_case(&normalized)
            })
            .ok_or_else(|| ApiError::invalid_input("units", s, "unknown unit system"))
    }

    /// Convert a length expressed in these units into `target` units
    pub fn convert_length(&self, value: f64, target: Units) -> f64 {
        value * self.length().to_meters() / target.length().to_meters()
    }

    /// Convert a force expressed in these units into `target` units
    pub fn convert_force(&self, value: f64, target: Units) -> f64 {
        value * self.force().to_newtons() / target.force().to_newtons()
    }

    /// Convert a stress (force / length²) expressed in these units into `target` units
    pub fn convert_stress(&self, value: f64, target: Units) -> f64 {
        let from = self.force().to_newtons() / self.length().to_meters().powi(2);
        let to = target.force().to_newtons() / target.length().to_meters().powi(2);
        value * from / to
    }

    /// Convert a weight density (force / length³) expressed in these units into `target` units
    pub fn convert_weight_density(&self, value: f64, target: Units) -> f64 {
        let from = self.force().to_newtons() / self.length().to_meters().powi(3);
        let to = target.force().to_newtons() / target.length().to_meters().powi(3);
        value * from / to
    }

    /// Standard gravity in these units' length per second squared
    pub fn gravity(&self) -> f64 {
        STANDARD_GRAVITY / self.length().to_meters()
    }

    /// Convert a thermal coefficient (per degree) into `target` units
    pub fn convert_thermal_coefficient(&self, value: f64, target: Units) -> f64 {
        match (self.temperature(), target.temperature()) {
            (TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius) => value * 1.8,
            (TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit) => value / 1.8,
            _ => value,
        }
    }
}

/// m/s²
pub const STANDARD_GRAVITY: f64 = 9.80665;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_codes() {
        assert_eq!(Units::LbIn.code(), 1);
        assert_eq!(Units::NM.code(), 10);
        assert_eq!(Units::TonCm.code(), 16);
        assert_eq!(Units::from_code(6).unwrap(), Units::KnM);
        assert!(Units::from_code(17).is_err());
    }

    #[test]
    fn test_components() {
        assert_eq!(Units::KipFt.force(), ForceUnit::Kip);
        assert_eq!(Units::KipFt.length(), LengthUnit::Foot);
        assert_eq!(Units::KipFt.temperature(), TemperatureUnit::Fahrenheit);
        assert_eq!(Units::KgfCm.temperature(), TemperatureUnit::Celsius);
    }

    #[test]
    fn test_length_conversion() {
        let inches = Units::KipFt.convert_length(12.0, Units::KipIn);
        assert!((inches - 144.0).abs() < 1e-9);
    }

    #[test]
    fn test_force_conversion() {
        let lb = Units::KipIn.convert_force(2.5, Units::LbIn);
        assert!((lb - 2500.0).abs() < 1e-9);
    }

    #[test]
    fn test_stress_conversion() {
        // 1 ksi = 6.894757 MPa = 6.894757 N/mm²
        let mpa = Units::KipIn.convert_stress(1.0, Units::NMm);
        assert!((mpa - 6.894_757).abs() < 1e-6);
    }

    #[test]
    fn test_gravity() {
        assert!((Units::KipIn.gravity() - 386.0886).abs() < 1e-3);
        assert!((Units::KnM.gravity() - 9.80665).abs() < 1e-12);
    }

    #[test]
    fn test_weight_density_conversion() {
        // 150 pcf = 150 / 1728 lb/in³
        let lb_in3 = Units::LbFt.convert_weight_density(150.0, Units::LbIn);
        assert!((lb_in3 - 150.0 / 1728.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Units::parse("kip, in, F").unwrap(), Units::KipIn);
        assert_eq!(Units::parse("kN,m,C").unwrap(), Units::KnM);
        assert_eq!(Units::parse("NMm").unwrap(), Units::NMm);
        assert_eq!(Units::parse("4").unwrap(), Units::KipFt);
        assert!(Units::parse("furlongs").is_err());
    }
}
