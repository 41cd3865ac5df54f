//! Stiffness, weight and mass modifiers assigned to area objects.

use crate::engine::{Call, Dispatch, Interface};
use crate::enums::ItemType;
use crate::errors::ApiResult;
use crate::values::AreaModifier;

pub struct AreaModifiers<'a> {
    engine: &'a dyn Dispatch,
}

impl<'a> AreaModifiers<'a> {
    pub fn new(engine: &'a dyn Dispatch) -> Self {
        AreaModifiers { engine }
    }

    pub fn modifiers(&self, name: &str) -> ApiResult<AreaModifier> {
        let mut reply = Call::new(Interface::AreaObj, "GetModifiers")
            .arg(name)
            .out()
            .invoke(self.engine)?;
        AreaModifier::from_array(&reply.doubles(1)?)
    }

    /// Fails when `name` is not an existing area object
    pub fn set_modifiers(&self, name: &str, modifiers: &AreaModifier, item_type: ItemType) -> ApiResult<()> {
        Call::new(Interface::AreaObj, "SetModifiers")
            .arg(name)
            .arg(modifiers.to_array())
            .arg(item_type.code())
            .invoke(self.engine)?;
        Ok(())
    }

    pub fn delete_modifiers(&self, name: &str, item_type: ItemType) -> ApiResult<()> {
        Call::new(Interface::AreaObj, "DeleteModifiers")
            .arg(name)
            .arg(item_type.code())
            .invoke(self.engine)?;
        Ok(())
    }
}
