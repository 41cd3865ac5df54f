//! End releases and partial fixity of frame objects.

use crate::engine::{Call, Dispatch, Interface};
use crate::enums::ItemType;
use crate::errors::ApiResult;
use crate::values::{DegreesOfFreedomLocal, EndReleases, Fixity};

pub struct FrameReleases<'a> {
    engine: &'a dyn Dispatch,
}

impl<'a> FrameReleases<'a> {
    pub fn new(engine: &'a dyn Dispatch) -> Self {
        FrameReleases { engine }
    }

    pub fn releases(&self, name: &str) -> ApiResult<EndReleases> {
        let mut reply = Call::new(Interface::FrameObj, "GetReleases")
            .arg(name)
            .outs(4)
            .invoke(self.engine)?;
        Ok(EndReleases {
            end_i: DegreesOfFreedomLocal::from_array(&reply.bools(1)?)?,
            end_j: DegreesOfFreedomLocal::from_array(&reply.bools(2)?)?,
            start_fixity: Fixity::from_array(&reply.doubles(3)?)?,
            end_fixity: Fixity::from_array(&reply.doubles(4)?)?,
        })
    }

    /// Assign releases to an existing frame. The engine rejects releases
    /// that leave the member unstable (see [`EndReleases::is_stable`]).
    pub fn set_releases(&self, name: &str, releases: &EndReleases, item_type: ItemType) -> ApiResult<()> {
        Call::new(Interface::FrameObj, "SetReleases")
            .arg(name)
            .arg(releases.end_i.to_array())
            .arg(releases.end_j.to_array())
            .arg(releases.start_fixity.to_array())
            .arg(releases.end_fixity.to_array())
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
        let engine = MemoryEngine::new(EngineVersion::Sap2000V19);
        MaterialProperties::new(&engine)
            .set_material("C4000", &MaterialDefinition::new(MaterialType::Concrete))
            .unwrap();
        FrameSection::new(&engine)
            .set_rectangle("R1", &RectangleSection::new("C4000", 24.0, 12.0))
            .unwrap();
        FrameObjects::new(&engine)
            .add_by_coord([0.0; 3], [240.0, 0.0, 0.0], "R1", "F1")
            .unwrap();
        engine
    }

    #[test]
    fn test_unreleased_by_default() {
        let engine = engine_with_frame();
        let releases = FrameReleases::new(&engine).releases("F1").unwrap();
        assert_eq!(releases, EndReleases::default());
        assert!(!releases.is_released());
    }

    #[test]
    fn test_pinned_roundtrip() {
        let engine = engine_with_frame();
        let releases = FrameReleases::new(&engine);
        releases.set_releases("F1", &EndReleases::pinned(), ItemType::Objects).unwrap();
        assert_eq!(releases.releases("F1").unwrap(), EndReleases::pinned());

        releases.set_releases("F1", &EndReleases::default(), ItemType::Objects).unwrap();
        assert_eq!(releases.releases("F1").unwrap(), EndReleases::default());
    }

    #[test]
    fn test_partial_fixity_roundtrip() {
        let engine = engine_with_frame();
        let releases = FrameReleases::new(&engine);
        let partial = EndReleases {
            end_i: DegreesOfFreedomLocal { r3: true, ..Default::default() },
            start_fixity: Fixity { r3: 5000.0, ..Default::default() },
            ..Default::default()
        };
        releases.set_releases("F1", &partial, ItemType::Objects).unwrap();
        let back = releases.releases("F1").unwrap();
        assert!(back.end_i.r3);
        assert!(!back.end_j.any());
        assert_eq!(back.start_fixity.r3, 5000.0);
        assert_eq!(back, partial);
    }

    #[test]
    fn test_missing_frame_fails() {
        let engine = engine_with_frame();
        let releases = FrameReleases::new(&engine);
        let err = releases
            .set_releases("F9", &EndReleases::pinned(), ItemType::Objects)
            .unwrap_err();
        assert!(err.is_call_failure());
        assert!(releases.releases("F9").unwrap_err().is_call_failure());
    }

    #[test]
    fn test_unstable_releases_rejected() {
        let engine = engine_with_frame();
        let releases = FrameReleases::new(&engine);
        releases.set_releases("F1", &EndReleases::pinned(), ItemType::Objects).unwrap();

        let axial = DegreesOfFreedomLocal { u1: true, ..Default::default() };
        let unstable = EndReleases {
            end_i: axial,
            end_j: axial,
            ..Default::default()
        };
        assert!(!unstable.is_stable());
        let err = releases.set_releases("F1", &unstable, ItemType::Objects).unwrap_err();
        assert!(err.is_call_failure());
        assert_eq!(releases.releases("F1").unwrap(), EndReleases::pinned());
    }
}
