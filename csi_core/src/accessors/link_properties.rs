//! # Link Properties
//!
//! Linear and gap link definitions, plus the weight and mass every link
//! carries. A link's degrees of freedom are three flag sets: `dof` (active),
//! `fixed` and, for gaps, `nonlinear`. Fixed and nonlinear flags must be a
//! subset of the active ones, and no degree of freedom may be both.
//! Redefining a link keeps its weight and mass.

use super::{name_list, Definitions};
use crate::engine::{Call, Dispatch, Interface};
use crate::enums::LinkType;
use crate::errors::ApiResult;
use crate::values::{
    Damping, DegreesOfFreedomLocal, Deformations, GapLinkProperties, LinearLinkProperties, LinkWeightAndMass,
    Stiffness,
};

pub struct LinkProperties<'a> {
    engine: &'a dyn Dispatch,
}

impl<'a> LinkProperties<'a> {
    pub fn new(engine: &'a dyn Dispatch) -> Self {
        LinkProperties { engine }
    }

    pub fn name_list_of(&self, link_type: LinkType) -> ApiResult<Vec<String>> {
        name_list(self.engine, Interface::PropLink, Some(link_type.code()))
    }

    pub fn link_type(&self, name: &str) -> ApiResult<LinkType> {
        let mut reply = Call::new(Interface::PropLink, "GetTypeOAPI")
            .arg(name)
            .out()
            .invoke(self.engine)?;
        LinkType::from_code(reply.i32(1)?)
    }

    pub fn linear(&self, name: &str) -> ApiResult<LinearLinkProperties> {
        let mut reply = Call::new(Interface::PropLink, "GetLinear")
            .arg(name)
            .outs(10)
            .invoke(self.engine)?;
        Ok(LinearLinkProperties {
            dof: DegreesOfFreedomLocal::from_array(&reply.bools(1)?)?,
            fixed: DegreesOfFreedomLocal::from_array(&reply.bools(2)?)?,
            stiffness: Stiffness::from_array(&reply.doubles(3)?)?,
            damping: Damping::from_array(&reply.doubles(4)?)?,
            dj2: reply.f64(5)?,
            dj3: reply.f64(6)?,
            stiffness_coupled: reply.bool(7)?,
            damping_coupled: reply.bool(8)?,
            notes: reply.string(9)?,
            guid: reply.string(10)?,
        })
    }

    pub fn set_linear(&self, name: &str, link: &LinearLinkProperties) -> ApiResult<()> {
        Call::new(Interface::PropLink, "SetLinear")
            .arg(name)
            .arg(link.dof.to_array())
            .arg(link.fixed.to_array())
            .arg(link.stiffness.to_array())
            .arg(link.damping.to_array())
            .arg(link.dj2)
            .arg(link.dj3)
            .arg(link.stiffness_coupled)
            .arg(link.damping_coupled)
            .arg(&link.notes)
            .arg(&link.guid)
            .invoke(self.engine)?;
        Ok(())
    }

    pub fn gap(&self, name: &str) -> ApiResult<GapLinkProperties> {
        let mut reply = Call::new(Interface::PropLink, "GetGap")
            .arg(name)
            .outs(11)
            .invoke(self.engine)?;
        Ok(GapLinkProperties {
            dof: DegreesOfFreedomLocal::from_array(&reply.bools(1)?)?,
            fixed: DegreesOfFreedomLocal::from_array(&reply.bools(2)?)?,
            nonlinear: DegreesOfFreedomLocal::from_array(&reply.bools(3)?)?,
            effective_stiffness: Stiffness::from_array(&reply.doubles(4)?)?,
            effective_damping: Damping::from_array(&reply.doubles(5)?)?,
            stiffness: Stiffness::from_array(&reply.doubles(6)?)?,
            opening: Deformations::from_array(&reply.doubles(7)?)?,
            dj2: reply.f64(8)?,
            dj3: reply.f64(9)?,
            notes: reply.string(10)?,
            guid: reply.string(11)?,
        })
    }

    pub fn set_gap(&self, name: &str, gap: &GapLinkProperties) -> ApiResult<()> {
        Call::new(Interface::PropLink, "SetGap")
            .arg(name)
            .arg(gap.dof.to_array())
            .arg(gap.fixed.to_array())
            .arg(gap.nonlinear.to_array())
            .arg(gap.effective_stiffness.to_array())
            .arg(gap.effective_damping.to_array())
            .arg(gap.stiffness.to_array())
            .arg(gap.opening.to_array())
            .arg(gap.dj2)
            .arg(gap.dj3)
            .arg(&gap.notes)
            .arg(&gap.guid)
            .invoke(self.engine)?;
        Ok(())
    }

    pub fn weight_and_mass(&self, name: &str) -> ApiResult<LinkWeightAndMass> {
        let mut reply = Call::new(Interface::PropLink, "GetWeightAndMass")
            .arg(name)
            .outs(5)
            .invoke(self.engine)?;
        Ok(LinkWeightAndMass {
            weight: reply.f64(1)?,
            mass: reply.f64(2)?,
            rotational_inertia_1: reply.f64(3)?,
            rotational_inertia_2: reply.f64(4)?,
            rotational_inertia_3: reply.f64(5)?,
        })
    }

    pub fn set_weight_and_mass(&self, name: &str, values: &LinkWeightAndMass) -> ApiResult<()> {
        Call::new(Interface::PropLink, "SetWeightAndMass")
            .arg(name)
            .arg(values.weight)
            .arg(values.mass)
            .arg(values.rotational_inertia_1)
            .arg(values.rotational_inertia_2)
            .arg(values.rotational_inertia_3)
            .invoke(self.engine)?;
        Ok(())
    }
}

impl Definitions for LinkProperties<'_> {
    const INTERFACE: Interface = Interface::PropLink;

    fn engine(&self) -> &dyn Dispatch {
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineVersion, MemoryEngine};

    #[test]
    fn test_linear_roundtrip() {
        let engine = MemoryEngine::new(EngineVersion::Sap2000V19);
        let links = LinkProperties::new(&engine);
        let mut link = LinearLinkProperties::axial(250.0);
        link.guid = "lin-1".to_string();
        link.notes = "pile head".to_string();
        links.set_linear("L1", &link).unwrap();
        assert_eq!(links.linear("L1").unwrap(), link);
        assert_eq!(links.link_type("L1").unwrap(), LinkType::Linear);
    }

    #[test]
    fn test_gap_roundtrip_and_filter() {
        let engine = MemoryEngine::new(EngineVersion::Etabs2016);
        let links = LinkProperties::new(&engine);
        links.set_linear("L1", &LinearLinkProperties::axial(10.0)).unwrap();
        let mut gap = GapLinkProperties::axial(1000.0, 0.25);
        gap.guid = "gap-1".to_string();
        links.set_gap("G1", &gap).unwrap();
        assert_eq!(links.gap("G1").unwrap(), gap);
        assert_eq!(links.name_list_of(LinkType::Gap).unwrap(), vec!["G1"]);
        assert!(links.gap("L1").unwrap_err().is_call_failure());
    }

    #[test]
    fn test_fixed_and_nonlinear_overlap_rejected() {
        let engine = MemoryEngine::new(EngineVersion::Sap2000V19);
        let links = LinkProperties::new(&engine);
        let mut gap = GapLinkProperties::axial(1000.0, 0.25);
        gap.fixed = gap.nonlinear;
        assert!(links.set_gap("G1", &gap).is_err());
        assert_eq!(links.count().unwrap(), 0);
    }

    #[test]
    fn test_weight_and_mass() {
        let engine = MemoryEngine::new(EngineVersion::Sap2000V19);
        let links = LinkProperties::new(&engine);
        links.set_linear("L1", &LinearLinkProperties::axial(10.0)).unwrap();
        assert_eq!(links.weight_and_mass("L1").unwrap(), LinkWeightAndMass::default());
        let wm = LinkWeightAndMass { weight: 0.2, mass: 0.0005, ..Default::default() };
        links.set_weight_and_mass("L1", &wm).unwrap();
        assert_eq!(links.weight_and_mass("L1").unwrap(), wm);
        assert!(links.set_weight_and_mass("Missing", &wm).is_err());
    }
}
