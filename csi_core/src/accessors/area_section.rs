//! Shell, plate and membrane section properties.

use super::{read_info, with_info, Definitions};
use crate::engine::{Call, Dispatch, Interface};
use crate::enums::ShellType;
use crate::errors::ApiResult;
use crate::values::{AreaModifier, ShellProperties};

pub struct AreaSection<'a> {
    engine: &'a dyn Dispatch,
}

impl<'a> AreaSection<'a> {
    pub fn new(engine: &'a dyn Dispatch) -> Self {
        AreaSection { engine }
    }

    pub fn shell(&self, name: &str) -> ApiResult<ShellProperties> {
        let mut reply = Call::new(Interface::PropArea, "GetShell")
            .arg(name)
            .outs(8)
            .invoke(self.engine)?;
        Ok(ShellProperties {
            shell_type: ShellType::from_code(reply.i32(1)?)?,
            material: reply.string(2)?,
            material_angle: reply.f64(3)?,
            membrane_thickness: reply.f64(4)?,
            bending_thickness: reply.f64(5)?,
            info: read_info(&mut reply, 6)?,
        })
    }

    pub fn set_shell(&self, name: &str, shell: &ShellProperties) -> ApiResult<()> {
        let call = Call::new(Interface::PropArea, "SetShell")
            .arg(name)
            .arg(shell.shell_type.code())
            .arg(&shell.material)
            .arg(shell.material_angle)
            .arg(shell.membrane_thickness)
            .arg(shell.bending_thickness);
        with_info(call, &shell.info).invoke(self.engine)?;
        Ok(())
    }

    pub fn modifiers(&self, name: &str) -> ApiResult<AreaModifier> {
        let mut reply = Call::new(Interface::PropArea, "GetModifiers")
            .arg(name)
            .out()
            .invoke(self.engine)?;
        AreaModifier::from_array(&reply.doubles(1)?)
    }

    pub fn set_modifiers(&self, name: &str, modifiers: &AreaModifier) -> ApiResult<()> {
        Call::new(Interface::PropArea, "SetModifiers")
            .arg(name)
            .arg(modifiers.to_array())
            .invoke(self.engine)?;
        Ok(())
    }
}

impl Definitions for AreaSection<'_> {
    const INTERFACE: Interface = Interface::PropArea;

    fn engine(&self) -> &dyn Dispatch {
        self.engine
    }
}
