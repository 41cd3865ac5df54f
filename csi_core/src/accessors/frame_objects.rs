//! Frame objects: straight members between two points.

use super::Definitions;
use crate::engine::{Call, Dispatch, Interface};
use crate::enums::ItemType;
use crate::errors::ApiResult;

pub struct FrameObjects<'a> {
    engine: &'a dyn Dispatch,
}

impl<'a> FrameObjects<'a> {
    pub fn new(engine: &'a dyn Dispatch) -> Self {
        FrameObjects { engine }
    }

    /// Add a frame from `point_i` to `point_j` and return the name the
    /// engine gave it. An empty `user_name` lets the engine pick one.
    pub fn add_by_coord(&self, point_i: [f64; 3], point_j: [f64; 3], section: &str, user_name: &str) -> ApiResult<String> {
        let [xi, yi, zi] = point_i;
        let [xj, yj, zj] = point_j;
        let mut reply = Call::new(Interface::FrameObj, "AddByCoord")
            .arg(xi)
            .arg(yi)
            .arg(zi)
            .arg(xj)
            .arg(yj)
            .arg(zj)
            .out()
            .arg(section)
            .arg(user_name)
            .invoke(self.engine)?;
        reply.string(6)
    }

    pub fn section(&self, name: &str) -> ApiResult<String> {
        let mut reply = Call::new(Interface::FrameObj, "GetSection")
            .arg(name)
            .out()
            .invoke(self.engine)?;
        reply.string(1)
    }

    pub fn set_section(&self, name: &str, section: &str, item_type: ItemType) -> ApiResult<()> {
        Call::new(Interface::FrameObj, "SetSection")
            .arg(name)
            .arg(section)
            .arg(item_type.code())
            .invoke(self.engine)?;
        Ok(())
    }

    /// Delete by name, group or selection
    pub fn delete_items(&self, name: &str, item_type: ItemType) -> ApiResult<()> {
        Call::new(Interface::FrameObj, "Delete")
            .arg(name)
            .arg(item_type.code())
            .invoke(self.engine)?;
        Ok(())
    }
}

impl Definitions for FrameObjects<'_> {
    const INTERFACE: Interface = Interface::FrameObj;

    fn engine(&self) -> &dyn Dispatch {
        self.engine
    }
}
