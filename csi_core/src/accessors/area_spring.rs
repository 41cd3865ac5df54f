//! Area spring properties. ETABS only.

use super::{read_info, with_info, Definitions};
use crate::engine::{Call, Dispatch, Interface};
use crate::enums::{AreaSpringOption, SpringNonlinearity};
use crate::errors::ApiResult;
use crate::values::AreaSpringProperties;

pub struct AreaSpring<'a> {
    engine: &'a dyn Dispatch,
}

impl<'a> AreaSpring<'a> {
    pub fn new(engine: &'a dyn Dispatch) -> Self {
        AreaSpring { engine }
    }

    pub fn properties(&self, name: &str) -> ApiResult<AreaSpringProperties> {
        let mut reply = Call::new(Interface::PropAreaSpring, "GetAreaSpringProp")
            .arg(name)
            .outs(11)
            .invoke(self.engine)?;
        Ok(AreaSpringProperties {
            u1: reply.f64(1)?,
            u2: reply.f64(2)?,
            u3: reply.f64(3)?,
            nonlinearity: SpringNonlinearity::from_code(reply.i32(4)?)?,
            option: AreaSpringOption::from_code(reply.i32(5)?)?,
            soil_profile: reply.string(6)?,
            end_length_ratio: reply.f64(7)?,
            period: reply.f64(8)?,
            info: read_info(&mut reply, 9)?,
        })
    }

    pub fn set_properties(&self, name: &str, spring: &AreaSpringProperties) -> ApiResult<()> {
        let call = Call::new(Interface::PropAreaSpring, "SetAreaSpringProp")
            .arg(name)
            .arg(spring.u1)
            .arg(spring.u2)
            .arg(spring.u3)
            .arg(spring.nonlinearity.code())
            .arg(spring.option.code())
            .arg(&spring.soil_profile)
            .arg(spring.end_length_ratio)
            .arg(spring.period);
        with_info(call, &spring.info).invoke(self.engine)?;
        Ok(())
    }
}

impl Definitions for AreaSpring<'_> {
    const INTERFACE: Interface = Interface::PropAreaSpring;

    fn engine(&self) -> &dyn Dispatch {
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineVersion, MemoryEngine};

    #[test]
    fn test_compression_only_spring() {
        let engine = MemoryEngine::new(EngineVersion::Etabs2013);
        let springs = AreaSpring::new(&engine);
        let mut spring = AreaSpringProperties::user_defined(0.0, 0.0, 150.0, SpringNonlinearity::CompressionOnly);
        spring.info.color = 3;
        spring.info.guid = "soil".to_string();
        springs.set_properties("Subgrade", &spring).unwrap();
        assert_eq!(springs.properties("Subgrade").unwrap(), spring);
        assert_eq!(springs.count().unwrap(), 1);
    }
}
