//! Stiffness, weight and mass modifiers assigned to frame objects.
//!
//! These act on existing objects only: setting modifiers on a name the
//! engine does not know fails.

use crate::engine::{Call, Dispatch, Interface};
use crate::enums::ItemType;
use crate::errors::ApiResult;
use crate::values::FrameModifier;

pub struct FrameModifiers<'a> {
    engine: &'a dyn Dispatch,
}

impl<'a> FrameModifiers<'a> {
    pub fn new(engine: &'a dyn Dispatch) -> Self {
        FrameModifiers { engine }
    }

    /// Modifiers on one frame; unity when none are assigned
    pub fn modifiers(&self, name: &str) -> ApiResult<FrameModifier> {
        let mut reply = Call::new(Interface::FrameObj, "GetModifiers")
            .arg(name)
            .out()
            .invoke(self.engine)?;
        FrameModifier::from_array(&reply.doubles(1)?)
    }

    pub fn set_modifiers(&self, name: &str, modifiers: &FrameModifier, item_type: ItemType) -> ApiResult<()> {
        Call::new(Interface::FrameObj, "SetModifiers")
            .arg(name)
            .arg(modifiers.to_array())
            .arg(item_type.code())
            .invoke(self.engine)?;
        Ok(())
    }

    pub fn delete_modifiers(&self, name: &str, item_type: ItemType) -> ApiResult<()> {
        Call::new(Interface::FrameObj, "DeleteModifiers")
            .arg(name)
            .arg(item_type.code())
            .invoke(self.engine)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessors::{FrameObjects, FrameSection, MaterialProperties};
    use crate::engine::{EngineVersion, MemoryEngine};
    use crate::enums::MaterialType;
    use crate::values::{MaterialDefinition, RectangleSection};

    fn engine_with_frame() -> MemoryEngine {
        let engine = MemoryEngine::new(EngineVersion::Etabs2016);
        MaterialProperties::new(&engine)
            .set_material("C4000", &MaterialDefinition::new(MaterialType::Concrete))
            .unwrap();
        FrameSection::new(&engine)
            .set_rectangle("B1", &RectangleSection::new("C4000", 20.0, 12.0))
            .unwrap();
        FrameObjects::new(&engine)
            .add_by_coord([0.0; 3], [300.0, 0.0, 0.0], "B1", "B1-1")
            .unwrap();
        engine
    }

    #[test]
    fn test_delete_restores_unity() {
        let engine = engine_with_frame();
        let modifiers = FrameModifiers::new(&engine);
        modifiers
            .set_modifiers("B1-1", &FrameModifier::cracked_beam(), ItemType::Objects)
            .unwrap();
        assert_eq!(modifiers.modifiers("B1-1").unwrap(), FrameModifier::cracked_beam());

        modifiers.delete_modifiers("B1-1", ItemType::Objects).unwrap();
        assert_eq!(modifiers.modifiers("B1-1").unwrap(), FrameModifier::default());
    }

    #[test]
    fn test_delete_on_missing_frame_fails() {
        let engine = engine_with_frame();
        let err = FrameModifiers::new(&engine)
            .delete_modifiers("B9", ItemType::Objects)
            .unwrap_err();
        assert!(err.is_call_failure());
    }

    #[test]
    fn test_negative_modifier_rejected() {
        let engine = engine_with_frame();
        let modifiers = FrameModifiers::new(&engine);
        let bad = FrameModifier { mass: -1.0, ..Default::default() };
        assert!(modifiers.set_modifiers("B1-1", &bad, ItemType::Objects).is_err());
        assert_eq!(modifiers.modifiers("B1-1").unwrap(), FrameModifier::default());
    }
}
