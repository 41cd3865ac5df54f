//! # Sessions
//!
//! A [`Session`] owns the engine handle for its whole life and hands out
//! accessors that borrow it. It holds no model state of its own.
//!
//! ```rust
//! use csi_core::accessors::Definitions;
//! use csi_core::config::SessionConfig;
//! use csi_core::engine::EngineVersion;
//! use csi_core::session::Session;
//! use csi_core::units::Units;
//!
//! let mut config = SessionConfig::for_version(EngineVersion::Etabs2016);
//! config.units = Units::KnM;
//! let session = Session::in_memory(config).unwrap();
//! assert_eq!(session.sap_model().present_units().unwrap(), Units::KnM);
//! assert_eq!(session.point_springs().count().unwrap(), 0);
//! ```

use crate::accessors::{
    AreaModifiers, AreaObjects, AreaSection, AreaSpring, CableSection, FileAccessor, FrameModifiers, FrameObjects,
    FrameReleases, FrameSection, LinkProperties, MaterialProperties, PointSpring, SapModelAccessor,
};
use crate::config::SessionConfig;
use crate::engine::{Dispatch, EngineVersion, MemoryEngine};
use crate::errors::ApiResult;

pub struct Session {
    engine: Box<dyn Dispatch>,
    config: SessionConfig,
}

impl Session {
    /// Wrap an already connected engine. The engine's own version decides
    /// which calls are available; `config.version` is informational here.
    pub fn new(engine: Box<dyn Dispatch>, config: SessionConfig) -> Self {
        if engine.version() != config.version {
            log::warn!(
                "session configured for {} but engine reports {}",
                config.version,
                engine.version()
            );
        }
        Session { engine, config }
    }

    /// Start a [`MemoryEngine`] for `config.version`, initialize a blank model
    /// in `config.units`, then open `config.model_path` when one is set.
    pub fn in_memory(config: SessionConfig) -> ApiResult<Self> {
        let mut engine = MemoryEngine::with_units(config.version, config.units);
        if config.lock_files {
            engine = engine.with_file_locking(config.user_id.clone());
        }
        let session = Session {
            engine: Box::new(engine),
            config,
        };
        session.sap_model().initialize_new_model(session.config.units)?;
        if let Some(path) = &session.config.model_path {
            session.file().open(path)?;
        }
        log::debug!("in-memory session started for {}", session.config.version);
        Ok(session)
    }

    pub fn engine(&self) -> &dyn Dispatch {
        self.engine.as_ref()
    }

    pub fn version(&self) -> EngineVersion {
        self.engine.version()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn sap_model(&self) -> SapModelAccessor<'_> {
        SapModelAccessor::new(self.engine())
    }

    pub fn file(&self) -> FileAccessor<'_> {
        FileAccessor::new(self.engine())
    }

    pub fn materials(&self) -> MaterialProperties<'_> {
        MaterialProperties::new(self.engine())
    }

    pub fn frame_sections(&self) -> FrameSection<'_> {
        FrameSection::new(self.engine())
    }

    pub fn area_sections(&self) -> AreaSection<'_> {
        AreaSection::new(self.engine())
    }

    pub fn cable_sections(&self) -> CableSection<'_> {
        CableSection::new(self.engine())
    }

    pub fn area_springs(&self) -> AreaSpring<'_> {
        AreaSpring::new(self.engine())
    }

    pub fn point_springs(&self) -> PointSpring<'_> {
        PointSpring::new(self.engine())
    }

    pub fn links(&self) -> LinkProperties<'_> {
        LinkProperties::new(self.engine())
    }

    pub fn frame_objects(&self) -> FrameObjects<'_> {
        FrameObjects::new(self.engine())
    }

    pub fn frame_modifiers(&self) -> FrameModifiers<'_> {
        FrameModifiers::new(self.engine())
    }

    pub fn frame_releases(&self) -> FrameReleases<'_> {
        FrameReleases::new(self.engine())
    }

    pub fn area_objects(&self) -> AreaObjects<'_> {
        AreaObjects::new(self.engine())
    }

    pub fn area_modifiers(&self) -> AreaModifiers<'_> {
        AreaModifiers::new(self.engine())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessors::Definitions;
    use crate::enums::MaterialType;
    use crate::units::Units;

    #[test]
    fn test_in_memory_units() {
        let mut config = SessionConfig::for_version(EngineVersion::Sap2000V18);
        config.units = Units::NMm;
        let session = Session::in_memory(config).unwrap();
        assert_eq!(session.version(), EngineVersion::Sap2000V18);
        assert_eq!(session.sap_model().present_units().unwrap(), Units::NMm);
    }

    #[test]
    fn test_wrapped_engine() {
        let engine = MemoryEngine::new(EngineVersion::Etabs2015);
        let session = Session::new(Box::new(engine), SessionConfig::for_version(EngineVersion::Etabs2015));
        session
            .materials()
            .add_material(MaterialType::Concrete, "United States", "Customary", "f'c 4000 psi", "C4000")
            .unwrap();
        assert_eq!(session.materials().name_list().unwrap(), vec!["C4000"]);
    }

    #[test]
    fn test_missing_model_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SessionConfig::default();
        config.model_path = Some(dir.path().join("absent.csim"));
        let err = Session::in_memory(config).err().unwrap();
        assert!(err.is_call_failure());
    }

    #[test]
    fn test_reopen_saved_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.csim");
        let first = Session::in_memory(SessionConfig::for_version(EngineVersion::Etabs2016)).unwrap();
        first.materials().set_material("C30", &crate::values::MaterialDefinition::new(MaterialType::Concrete)).unwrap();
        first.file().save(&path).unwrap();

        let mut config = SessionConfig::for_version(EngineVersion::Etabs2016);
        config.model_path = Some(path);
        let second = Session::in_memory(config).unwrap();
        assert_eq!(second.materials().name_list().unwrap(), vec!["C30"]);
    }
}
