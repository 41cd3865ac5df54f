//! Model-level state: units, lock flag, program version.

use crate::engine::{Call, Dispatch, Interface};
use crate::errors::ApiResult;
use crate::units::Units;

pub struct SapModelAccessor<'a> {
    engine: &'a dyn Dispatch,
}

impl<'a> SapModelAccessor<'a> {
    pub fn new(engine: &'a dyn Dispatch) -> Self {
        SapModelAccessor { engine }
    }

    /// Clear the model and start over in `units`
    pub fn initialize_new_model(&self, units: Units) -> ApiResult<()> {
        Call::new(Interface::SapModel, "InitializeNewModel")
            .arg(units.code())
            .invoke(self.engine)?;
        Ok(())
    }

    pub fn present_units(&self) -> ApiResult<Units> {
        let code = Call::new(Interface::SapModel, "GetPresentUnits").invoke_value(self.engine)?;
        Units::from_code(code)
    }

    pub fn set_present_units(&self, units: Units) -> ApiResult<()> {
        Call::new(Interface::SapModel, "SetPresentUnits")
            .arg(units.code())
            .invoke(self.engine)?;
        Ok(())
    }

    /// Program version string and number, e.g. `("19.0.0", 19.0)`
    pub fn version(&self) -> ApiResult<(String, f64)> {
        let mut reply = Call::new(Interface::SapModel, "GetVersion").outs(2).invoke(self.engine)?;
        Ok((reply.string(0)?, reply.f64(1)?))
    }

    pub fn is_locked(&self) -> ApiResult<bool> {
        let flag = Call::new(Interface::SapModel, "GetModelIsLocked").invoke_value(self.engine)?;
        Ok(flag != 0)
    }

    /// While locked, the engine rejects every definition change
    pub fn set_locked(&self, locked: bool) -> ApiResult<()> {
        Call::new(Interface::SapModel, "SetModelIsLocked")
            .arg(locked)
            .invoke(self.engine)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineVersion, MemoryEngine};
    use crate::errors::ApiError;

    #[test]
    fn test_units_roundtrip() {
        let engine = MemoryEngine::new(EngineVersion::Sap2000V19);
        let model = SapModelAccessor::new(&engine);
        assert_eq!(model.present_units().unwrap(), Units::KipIn);
        model.set_present_units(Units::NMm).unwrap();
        assert_eq!(model.present_units().unwrap(), Units::NMm);
    }

    #[test]
    fn test_initialize_new_model() {
        let engine = MemoryEngine::new(EngineVersion::Etabs2016);
        let model = SapModelAccessor::new(&engine);
        model.set_locked(true).unwrap();
        model.initialize_new_model(Units::KnM).unwrap();
        assert!(!model.is_locked().unwrap());
        assert_eq!(model.present_units().unwrap(), Units::KnM);
    }

    #[test]
    fn test_failed_value_calls_are_errors() {
        let engine = MemoryEngine::new(EngineVersion::Sap2000V19);
        let model = SapModelAccessor::new(&engine);

        engine.fail_next(7);
        let err = model.present_units().unwrap_err();
        assert_eq!(err, ApiError::call_failed("SapModel.GetPresentUnits", -7));

        engine.fail_next(1);
        assert!(model.is_locked().unwrap_err().is_call_failure());

        assert_eq!(model.present_units().unwrap(), Units::KipIn);
        assert!(!model.is_locked().unwrap());
    }

    #[test]
    fn test_version() {
        let engine = MemoryEngine::new(EngineVersion::Sap2000V17);
        let (name, number) = SapModelAccessor::new(&engine).version().unwrap();
        assert_eq!(name, "17.0.0");
        assert_eq!(number, 17.0);
    }
}
