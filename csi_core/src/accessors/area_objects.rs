//! Area objects: planar shells bounded by three or more points.

use super::Definitions;
use crate::engine::{Call, Dispatch, Interface};
use crate::enums::ItemType;
use crate::errors::ApiResult;
use crate::values::check_parallel;

pub struct AreaObjects<'a> {
    engine: &'a dyn Dispatch,
}

impl<'a> AreaObjects<'a> {
    pub fn new(engine: &'a dyn Dispatch) -> Self {
        AreaObjects { engine }
    }

    /// Add an area through the points `(x[i], y[i], z[i])`, in order.
    ///
    /// The coordinate arrays must share one length; a mismatch is reported as
    /// [`ApiError::LengthMismatch`](crate::errors::ApiError::LengthMismatch)
    /// without calling the engine.
    pub fn add_by_coord(&self, x: &[f64], y: &[f64], z: &[f64], property: &str, user_name: &str) -> ApiResult<String> {
        let n = check_parallel(&[("x", x.len()), ("y", y.len()), ("z", z.len())])?;
        let mut reply = Call::new(Interface::AreaObj, "AddByCoord")
            .arg(n as i32)
            .arg(x.to_vec())
            .arg(y.to_vec())
            .arg(z.to_vec())
            .out()
            .arg(property)
            .arg(user_name)
            .invoke(self.engine)?;
        reply.string(4)
    }

    pub fn property(&self, name: &str) -> ApiResult<String> {
        let mut reply = Call::new(Interface::AreaObj, "GetProperty")
            .arg(name)
            .out()
            .invoke(self.engine)?;
        reply.string(1)
    }

    pub fn set_property(&self, name: &str, property: &str, item_type: ItemType) -> ApiResult<()> {
        Call::new(Interface::AreaObj, "SetProperty")
            .arg(name)
            .arg(property)
            .arg(item_type.code())
            .invoke(self.engine)?;
        Ok(())
    }

    pub fn delete_items(&self, name: &str, item_type: ItemType) -> ApiResult<()> {
        Call::new(Interface::AreaObj, "Delete")
            .arg(name)
            .arg(item_type.code())
            .invoke(self.engine)?;
        Ok(())
    }
}

impl Definitions for AreaObjects<'_> {
    const INTERFACE: Interface = Interface::AreaObj;

    fn engine(&self) -> &dyn Dispatch {
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineVersion, MemoryEngine};
    use crate::errors::ApiError;

    #[test]
    fn test_ragged_coordinates_never_reach_engine() {
        let engine = MemoryEngine::new(EngineVersion::Sap2000V19);
        let areas = AreaObjects::new(&engine);
        let err = areas
            .add_by_coord(&[0.0, 1.0, 1.0], &[0.0, 0.0], &[0.0, 0.0, 0.0], "Default", "")
            .unwrap_err();
        assert_eq!(err, ApiError::length_mismatch("y", 3, 2));
        assert_eq!(engine.call_count(), 0);
    }

    #[test]
    fn test_add_without_property_fails() {
        let engine = MemoryEngine::new(EngineVersion::Sap2000V19);
        let areas = AreaObjects::new(&engine);
        let err = areas
            .add_by_coord(&[0.0, 1.0, 1.0], &[0.0, 0.0, 1.0], &[0.0; 3], "Default", "")
            .unwrap_err();
        assert!(err.is_call_failure());
        assert_eq!(areas.count().unwrap(), 0);
    }
}
