//! # Point Spring Properties
//!
//! ETABS only. A point spring is either a set of six stiffnesses (user
//! defined or derived from a soil profile) or, from ETABS 2015 on, a list of
//! single-joint links. The link list crosses the boundary as three parallel
//! arrays; [`PointSpring::set_links`] refuses arrays of different lengths
//! before the engine is called.

use super::{check_reported_count, read_info, with_info, Definitions};
use crate::engine::{Call, Dispatch, Interface};
use crate::enums::{LinkAxialDirection, PointSpringOption};
use crate::errors::ApiResult;
use crate::values::{check_parallel, decode_all, DefinitionInfo, JointLink, PointSpringProperties, Stiffness};

pub struct PointSpring<'a> {
    engine: &'a dyn Dispatch,
}

impl<'a> PointSpring<'a> {
    pub fn new(engine: &'a dyn Dispatch) -> Self {
        PointSpring { engine }
    }

    pub fn properties(&self, name: &str) -> ApiResult<PointSpringProperties> {
        let mut reply = Call::new(Interface::PropPointSpring, "GetPointSpringProp")
            .arg(name)
            .outs(9)
            .invoke(self.engine)?;
        Ok(PointSpringProperties {
            option: PointSpringOption::from_code(reply.i32(1)?)?,
            stiffness: Stiffness::from_array(&reply.doubles(2)?)?,
            coordinate_system: reply.string(3)?,
            soil_profile: reply.string(4)?,
            footing: reply.string(5)?,
            period: reply.f64(6)?,
            info: read_info(&mut reply, 7)?,
        })
    }

    pub fn set_properties(&self, name: &str, spring: &PointSpringProperties) -> ApiResult<()> {
        let call = Call::new(Interface::PropPointSpring, "SetPointSpringProp")
            .arg(name)
            .arg(spring.option.code())
            .arg(spring.stiffness.to_array())
            .arg(&spring.coordinate_system)
            .arg(&spring.soil_profile)
            .arg(&spring.footing)
            .arg(spring.period);
        with_info(call, &spring.info).invoke(self.engine)?;
        Ok(())
    }

    /// Single-joint links of a spring, with the spring's display metadata
    pub fn links(&self, name: &str) -> ApiResult<(Vec<JointLink>, DefinitionInfo)> {
        let mut reply = Call::new(Interface::PropPointSpring, "GetSingleJointLinks")
            .arg(name)
            .outs(7)
            .invoke(self.engine)?;
        let n = reply.i32(1)?;
        let names = reply.strings(2)?;
        let directions = reply.ints(3)?;
        let angles = reply.doubles(4)?;
        check_reported_count("link_names", n, names.len())?;
        check_parallel(&[
            ("link_names", names.len()),
            ("link_axial_directions", directions.len()),
            ("link_angles", angles.len()),
        ])?;
        let directions = decode_all(&directions, LinkAxialDirection::from_code)?;
        let links = names
            .into_iter()
            .zip(directions)
            .zip(angles)
            .map(|((link, axial_direction), angle)| JointLink { link, axial_direction, angle })
            .collect();
        Ok((links, read_info(&mut reply, 5)?))
    }

    /// Define a spring as a set of single-joint links.
    ///
    /// `link_names`, `link_axial_directions` and `link_angles` describe one
    /// link per index and must have equal lengths.
    pub fn set_links(
        &self,
        name: &str,
        link_names: &[String],
        link_axial_directions: &[LinkAxialDirection],
        link_angles: &[f64],
        info: &DefinitionInfo,
    ) -> ApiResult<()> {
        let n = check_parallel(&[
            ("link_names", link_names.len()),
            ("link_axial_directions", link_axial_directions.len()),
            ("link_angles", link_angles.len()),
        ])?;
        let call = Call::new(Interface::PropPointSpring, "SetSingleJointLinks")
            .arg(name)
            .arg(n as i32)
            .arg(link_names.to_vec())
            .arg(link_axial_directions.iter().map(|d| d.code()).collect::<Vec<_>>())
            .arg(link_angles.to_vec());
        with_info(call, info).invoke(self.engine)?;
        Ok(())
    }

    /// [`set_links`](Self::set_links) from whole link records
    pub fn set_joint_links(&self, name: &str, links: &[JointLink], info: &DefinitionInfo) -> ApiResult<()> {
        let names: Vec<String> = links.iter().map(|l| l.link.clone()).collect();
        let directions: Vec<LinkAxialDirection> = links.iter().map(|l| l.axial_direction).collect();
        let angles: Vec<f64> = links.iter().map(|l| l.angle).collect();
        self.set_links(name, &names, &directions, &angles, info)
    }
}

impl Definitions for PointSpring<'_> {
    const INTERFACE: Interface = Interface::PropPointSpring;

    fn engine(&self) -> &dyn Dispatch {
        self.engine
    }
}
