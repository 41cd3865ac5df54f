//! Cable section properties. SAP2000 only.

use super::{read_info, with_info, Definitions};
use crate::engine::{Call, Dispatch, Interface};
use crate::errors::ApiResult;
use crate::values::{CableModifier, CableProperties};

pub struct CableSection<'a> {
    engine: &'a dyn Dispatch,
}

impl<'a> CableSection<'a> {
    pub fn new(engine: &'a dyn Dispatch) -> Self {
        CableSection { engine }
    }

    pub fn properties(&self, name: &str) -> ApiResult<CableProperties> {
        let mut reply = Call::new(Interface::PropCable, "GetProp")
            .arg(name)
            .outs(5)
            .invoke(self.engine)?;
        Ok(CableProperties {
            material: reply.string(1)?,
            area: reply.f64(2)?,
            info: read_info(&mut reply, 3)?,
        })
    }

    pub fn set_properties(&self, name: &str, cable: &CableProperties) -> ApiResult<()> {
        let call = Call::new(Interface::PropCable, "SetProp")
            .arg(name)
            .arg(&cable.material)
            .arg(cable.area);
        with_info(call, &cable.info).invoke(self.engine)?;
        Ok(())
    }

    pub fn modifiers(&self, name: &str) -> ApiResult<CableModifier> {
        let mut reply = Call::new(Interface::PropCable, "GetModifiers")
            .arg(name)
            .out()
            .invoke(self.engine)?;
        CableModifier::from_array(&reply.doubles(1)?)
    }

    pub fn set_modifiers(&self, name: &str, modifiers: &CableModifier) -> ApiResult<()> {
        Call::new(Interface::PropCable, "SetModifiers")
            .arg(name)
            .arg(modifiers.to_array())
            .invoke(self.engine)?;
        Ok(())
    }
}

impl Definitions for CableSection<'_> {
    const INTERFACE: Interface = Interface::PropCable;

    fn engine(&self) -> &dyn Dispatch {
        self.engine
    }
}
