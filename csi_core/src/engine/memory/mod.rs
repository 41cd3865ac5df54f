//! # Reference Engine
//!
//! [`MemoryEngine`] implements [`Dispatch`] entirely in process. It answers
//! the same entry points, with the same argument layouts and status codes, as
//! the native engine does for the interfaces this crate wraps, so accessors
//! can be exercised without a licensed SAP2000/ETABS installation.
//!
//! Behavior worth knowing:
//!
//! - status `0` on success, `1` on any failure
//! - property `Set*` calls create or replace; object `Set*` calls require the
//!   object to exist
//! - deleting a definition that something else references fails and leaves
//!   the table untouched; renaming updates every reference
//! - while the model is locked, every mutating call fails
//! - values are stored in whatever units they arrive in
//!
//! ## Example
//!
//! ```rust
//! use csi_core::engine::{MemoryEngine, EngineVersion};
//! use csi_core::accessors::{Definitions, MaterialProperties};
//! use csi_core::enums::MaterialType;
//!
//! let engine = MemoryEngine::new(EngineVersion::Sap2000V19);
//! let materials = MaterialProperties::new(&engine);
//! let name = materials.add_material(MaterialType::Steel, "United States", "ASTM A992", "Grade 50", "").unwrap();
//! assert_eq!(materials.count().unwrap(), 1);
//! assert_eq!(materials.name_list().unwrap(), vec![name]);
//! ```

mod links;
mod materials;
mod objects;
mod sections;
mod springs;

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::model::{ModelData, Table};
use super::{Dispatch, EngineVersion, EntryPoint, Interface, Variant};
use crate::file_io::{self, FileLock};
use crate::units::Units;

/// Status returned for every failure
pub(crate) const FAILED: i32 = 1;

/// Failure from an entry point whose return value is the result
pub(crate) const FAILED_VALUE: i32 = -1;

/// Color assigned when a definition is set with color -1
pub(crate) const DEFAULT_COLOR: i32 = 12_632_256;

/// Marker for a failed engine-side operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fail;

pub(crate) type Outcome = Result<(), Fail>;

pub(crate) fn ensure(condition: bool) -> Outcome {
    if condition {
        Ok(())
    } else {
        Err(Fail)
    }
}

// ============================================================================
// Argument access
// ============================================================================

/// Engine-side view of the argument slots of one call.
pub(crate) struct Args<'a>(pub &'a mut [Variant]);

impl Args<'_> {
    fn slot(&self, index: usize) -> Result<&Variant, Fail> {
        self.0.get(index).ok_or(Fail)
    }

    fn is_missing(&self, index: usize) -> bool {
        matches!(self.0.get(index), None | Some(Variant::Empty))
    }

    pub fn string(&self, index: usize) -> Result<String, Fail> {
        self.slot(index)?.as_str().map(str::to_string).ok_or(Fail)
    }

    /// Non-empty name argument
    pub fn name(&self, index: usize) -> Result<String, Fail> {
        let name = self.string(index)?;
        ensure(!name.trim().is_empty())?;
        Ok(name)
    }

    pub fn f64(&self, index: usize) -> Result<f64, Fail> {
        self.slot(index)?.as_f64().ok_or(Fail)
    }

    pub fn i32(&self, index: usize) -> Result<i32, Fail> {
        self.slot(index)?.as_i32().ok_or(Fail)
    }

    pub fn bool(&self, index: usize) -> Result<bool, Fail> {
        self.slot(index)?.as_bool().ok_or(Fail)
    }

    pub fn doubles(&self, index: usize) -> Result<Vec<f64>, Fail> {
        self.slot(index)?.as_doubles().map(<[f64]>::to_vec).ok_or(Fail)
    }

    pub fn bools(&self, index: usize) -> Result<Vec<bool>, Fail> {
        self.slot(index)?.as_bools().map(<[bool]>::to_vec).ok_or(Fail)
    }

    pub fn ints(&self, index: usize) -> Result<Vec<i32>, Fail> {
        self.slot(index)?.as_ints().map(<[i32]>::to_vec).ok_or(Fail)
    }

    pub fn strings(&self, index: usize) -> Result<Vec<String>, Fail> {
        self.slot(index)?.as_strs().map(<[String]>::to_vec).ok_or(Fail)
    }

    /// Optional trailing integer argument
    pub fn opt_i32(&self, index: usize, default: i32) -> Result<i32, Fail> {
        if self.is_missing(index) {
            Ok(default)
        } else {
            self.i32(index)
        }
    }

    /// Optional trailing string argument
    pub fn opt_string(&self, index: usize) -> Result<String, Fail> {
        if self.is_missing(index) {
            Ok(String::new())
        } else {
            self.string(index)
        }
    }

    /// Write an output slot; the caller must have reserved it
    pub fn set(&mut self, index: usize, value: impl Into<Variant>) -> Outcome {
        let slot = self.0.get_mut(index).ok_or(Fail)?;
        *slot = value.into();
        Ok(())
    }
}

// ============================================================================
// Shared table operations
// ============================================================================

/// `GetNameList(ref count, ref names, [filter])`
pub(crate) fn name_list<T>(table: &Table<T>, args: &mut Args, keep: impl Fn(&T) -> bool) -> Outcome {
    let names: Vec<String> = table
        .iter()
        .filter(|(_, v)| keep(v))
        .map(|(n, _)| n.to_string())
        .collect();
    args.set(0, names.len() as i32)?;
    args.set(1, names)
}

/// `ChangeName(name, new_name)`; returns the pair so references can follow
pub(crate) fn change_name<T>(table: &mut Table<T>, args: &Args) -> Result<(String, String), Fail> {
    let from = args.name(0)?;
    let to = args.name(1)?;
    ensure(table.rename(&from, &to))?;
    Ok((from, to))
}

/// `Delete(name)` guarded by a reference check
pub(crate) fn delete<T>(table: &mut Table<T>, name: &str, in_use: bool) -> Outcome {
    ensure(!in_use)?;
    table.remove(name).map(|_| ()).ok_or(Fail)
}

pub(crate) fn guid_or_new(guid: String) -> String {
    if guid.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        guid
    }
}

pub(crate) fn color_or_default(color: i32) -> i32 {
    if color < 0 {
        DEFAULT_COLOR
    } else {
        color
    }
}

fn is_mutating(method: &str) -> bool {
    ["Set", "Add", "Delete", "ChangeName"]
        .iter()
        .any(|prefix| method.starts_with(prefix))
}

fn returns_value(entry: EntryPoint) -> bool {
    matches!(
        (entry.interface, entry.method),
        (_, "Count") | (Interface::SapModel, "GetPresentUnits") | (Interface::SapModel, "GetModelIsLocked")
    )
}

// ============================================================================
// MemoryEngine
// ============================================================================

/// In-process reference implementation of the engine.
pub struct MemoryEngine {
    version: EngineVersion,
    model: RefCell<ModelData>,
    model_path: RefCell<Option<PathBuf>>,
    file_lock: RefCell<Option<FileLock>>,
    user_id: String,
    lock_files: bool,
    calls: Cell<usize>,
    injected_failure: Cell<Option<i32>>,
}

impl MemoryEngine {
    /// Blank model in kip/in units
    pub fn new(version: EngineVersion) -> Self {
        MemoryEngine::with_units(version, Units::default())
    }

    pub fn with_units(version: EngineVersion, units: Units) -> Self {
        MemoryEngine {
            version,
            model: RefCell::new(ModelData::new(version.program(), units)),
            model_path: RefCell::new(None),
            file_lock: RefCell::new(None),
            user_id: "csi_core".to_string(),
            lock_files: false,
            calls: Cell::new(0),
            injected_failure: Cell::new(None),
        }
    }

    /// Hold an exclusive [`FileLock`] on every model file opened or saved
    pub fn with_file_locking(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self.lock_files = true;
        self
    }

    /// Number of entry points invoked so far
    pub fn call_count(&self) -> usize {
        self.calls.get()
    }

    /// Make the next invocation fail with `status` before touching the model.
    /// Entry points that return their result (`Count`, `GetPresentUnits`,
    /// `GetModelIsLocked`) fail with the negated status instead.
    pub fn fail_next(&self, status: i32) {
        self.injected_failure.set(Some(status));
    }

    /// Copy of the current model data
    pub fn snapshot(&self) -> ModelData {
        self.model.borrow().clone()
    }

    /// Path of the file the model was last opened from or saved to
    pub fn model_path(&self) -> Option<PathBuf> {
        self.model_path.borrow().clone()
    }

    fn count(&self, interface: Interface) -> i32 {
        let model = self.model.borrow();
        let n = match interface {
            Interface::FrameObj => model.frames.len(),
            Interface::AreaObj => model.areas.len(),
            Interface::PropMaterial => model.materials.len(),
            Interface::PropFrame => model.frame_sections.len(),
            Interface::PropArea => model.area_sections.len(),
            Interface::PropCable => model.cable_sections.len(),
            Interface::PropAreaSpring => model.area_springs.len(),
            Interface::PropPointSpring => model.point_springs.len(),
            Interface::PropLink => model.links.len(),
            Interface::SapModel | Interface::File => return FAILED_VALUE,
        };
        n as i32
    }

    fn sap_model(&self, method: &str, args: &mut Args) -> Outcome {
        match method {
            "InitializeNewModel" => {
                let code = args.opt_i32(0, Units::default().code())?;
                let units = Units::from_code(code).map_err(|_| Fail)?;
                *self.model.borrow_mut() = ModelData::new(self.version.program(), units);
                self.release_file();
                Ok(())
            }
            "SetPresentUnits" => {
                let units = Units::from_code(args.i32(0)?).map_err(|_| Fail)?;
                self.model.borrow_mut().units = units;
                Ok(())
            }
            "GetVersion" => {
                args.set(0, format!("{}.0.0", self.version.number()))?;
                args.set(1, self.version.number())
            }
            "SetModelIsLocked" => {
                let locked = args.bool(0)?;
                self.model.borrow_mut().locked = locked;
                Ok(())
            }
            _ => Err(Fail),
        }
    }

    fn file(&self, method: &str, args: &mut Args) -> Outcome {
        match method {
            "NewBlank" => {
                let units = self.model.borrow().units;
                *self.model.borrow_mut() = ModelData::new(self.version.program(), units);
                self.release_file();
                Ok(())
            }
            "Save" => {
                let requested = args.opt_string(0)?;
                let path = if requested.is_empty() {
                    self.model_path.borrow().clone().ok_or(Fail)?
                } else {
                    PathBuf::from(requested)
                };
                let lock = self.acquire_lock(&path)?;
                file_io::save_model(&self.model.borrow(), &path).map_err(|e| {
                    log::warn!("saving model to {} failed: {}", path.display(), e);
                    Fail
                })?;
                log::info!("saved model to {}", path.display());
                self.adopt_file(path, lock);
                Ok(())
            }
            "OpenFile" => {
                let path = PathBuf::from(args.name(0)?);
                let model = file_io::load_model(&path).map_err(|e| {
                    log::warn!("opening model {} failed: {}", path.display(), e);
                    Fail
                })?;
                ensure(model.meta.program == self.version.program())?;
                let lock = self.acquire_lock(&path)?;
                *self.model.borrow_mut() = model;
                log::info!("opened model {}", path.display());
                self.adopt_file(path, lock);
                Ok(())
            }
            _ => Err(Fail),
        }
    }

    /// Lock `path` without touching the lock currently held. `None` when
    /// locking is off or `path` is already ours.
    fn acquire_lock(&self, path: &Path) -> Result<Option<FileLock>, Fail> {
        if !self.lock_files {
            return Ok(None);
        }
        let already_held = self
            .file_lock
            .borrow()
            .as_ref()
            .map(|lock| lock.model_path() == path)
            .unwrap_or(false);
        if already_held {
            return Ok(None);
        }
        FileLock::acquire(path, self.user_id.clone()).map(Some).map_err(|e| {
            log::warn!("could not lock {}: {}", path.display(), e);
            Fail
        })
    }

    /// Make `path` the current model file, dropping the previous lock when a
    /// new one replaces it
    fn adopt_file(&self, path: PathBuf, lock: Option<FileLock>) {
        if let Some(lock) = lock {
            *self.file_lock.borrow_mut() = Some(lock);
        }
        *self.model_path.borrow_mut() = Some(path);
    }

    fn release_file(&self) {
        self.file_lock.borrow_mut().take();
        self.model_path.borrow_mut().take();
    }

    fn definitions(&self, entry: EntryPoint, args: &mut Args) -> Outcome {
        let mut model = self.model.borrow_mut();
        if model.locked && is_mutating(entry.method) {
            return Err(Fail);
        }
        let method = entry.method;
        let outcome = match entry.interface {
            Interface::FrameObj => objects::frame_obj(&mut model, method, args),
            Interface::AreaObj => objects::area_obj(&mut model, method, args),
            Interface::PropMaterial => materials::prop_material(&mut model, method, args),
            Interface::PropFrame => sections::prop_frame(&mut model, method, args),
            Interface::PropArea => sections::prop_area(&mut model, method, args),
            Interface::PropCable => sections::prop_cable(&mut model, method, args),
            Interface::PropAreaSpring => springs::prop_area_spring(&mut model, method, args),
            Interface::PropPointSpring => springs::prop_point_spring(&mut model, method, args),
            Interface::PropLink => links::prop_link(&mut model, method, args),
            Interface::SapModel | Interface::File => Err(Fail),
        };
        if outcome.is_ok() && is_mutating(method) {
            model.touch();
        }
        outcome
    }
}

impl Dispatch for MemoryEngine {
    fn version(&self) -> EngineVersion {
        self.version
    }

    fn invoke(&self, entry: EntryPoint, args: &mut [Variant]) -> i32 {
        self.calls.set(self.calls.get() + 1);
        let value_call = returns_value(entry);
        if let Some(status) = self.injected_failure.take() {
            return if value_call { -(status.abs().max(1)) } else { status };
        }
        if !self.version.supports(entry) {
            return if value_call { FAILED_VALUE } else { FAILED };
        }

        match (entry.interface, entry.method) {
            (_, "Count") => return self.count(entry.interface),
            (Interface::SapModel, "GetPresentUnits") => return self.model.borrow().units.code(),
            (Interface::SapModel, "GetModelIsLocked") => return i32::from(self.model.borrow().locked),
            _ => {}
        }

        let mut args = Args(args);
        let outcome = match entry.interface {
            Interface::SapModel => self.sap_model(entry.method, &mut args),
            Interface::File => self.file(entry.method, &mut args),
            _ => self.definitions(entry, &mut args),
        };
        match outcome {
            Ok(()) => 0,
            Err(Fail) => FAILED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoke(engine: &MemoryEngine, interface: Interface, method: &'static str, args: &mut [Variant]) -> i32 {
        engine.invoke(EntryPoint::new(interface, method), args)
    }

    #[test]
    fn test_empty_model_counts() {
        let engine = MemoryEngine::new(EngineVersion::Sap2000V19);
        assert_eq!(invoke(&engine, Interface::PropMaterial, "Count", &mut []), 0);
        assert_eq!(invoke(&engine, Interface::FrameObj, "Count", &mut []), 0);
    }

    #[test]
    fn test_unknown_method_fails() {
        let engine = MemoryEngine::new(EngineVersion::Sap2000V19);
        assert_eq!(invoke(&engine, Interface::PropFrame, "SetTaperedTube", &mut []), FAILED);
    }

    #[test]
    fn test_unsupported_interface_fails() {
        let engine = MemoryEngine::new(EngineVersion::Etabs2016);
        assert_eq!(invoke(&engine, Interface::PropCable, "Count", &mut []), FAILED_VALUE);
    }

    #[test]
    fn test_count_without_table_fails_negative() {
        let engine = MemoryEngine::new(EngineVersion::Sap2000V19);
        assert_eq!(invoke(&engine, Interface::SapModel, "Count", &mut []), FAILED_VALUE);
        assert_eq!(invoke(&engine, Interface::File, "Count", &mut []), FAILED_VALUE);
    }

    #[test]
    fn test_injected_failure_on_value_call() {
        let engine = MemoryEngine::new(EngineVersion::Sap2000V19);
        engine.fail_next(7);
        assert_eq!(invoke(&engine, Interface::SapModel, "GetPresentUnits", &mut []), -7);
        engine.fail_next(1);
        assert_eq!(invoke(&engine, Interface::PropMaterial, "Count", &mut []), -1);
        assert_eq!(invoke(&engine, Interface::PropMaterial, "Count", &mut []), 0);
    }

    #[test]
    fn test_present_units() {
        let engine = MemoryEngine::new(EngineVersion::Sap2000V19);
        assert_eq!(invoke(&engine, Interface::SapModel, "GetPresentUnits", &mut []), Units::KipIn.code());
        let mut args = [Variant::Int(Units::KnM.code())];
        assert_eq!(invoke(&engine, Interface::SapModel, "SetPresentUnits", &mut args), 0);
        assert_eq!(invoke(&engine, Interface::SapModel, "GetPresentUnits", &mut []), 6);
        let mut bad = [Variant::Int(99)];
        assert_eq!(invoke(&engine, Interface::SapModel, "SetPresentUnits", &mut bad), FAILED);
    }

    #[test]
    fn test_injected_failure() {
        let engine = MemoryEngine::new(EngineVersion::Sap2000V19);
        engine.fail_next(7);
        let mut args = [Variant::Str("X".into()), Variant::Str("Y".into())];
        assert_eq!(invoke(&engine, Interface::PropMaterial, "ChangeName", &mut args), 7);
        assert_eq!(engine.call_count(), 1);
    }

    #[test]
    fn test_args_optional_slots() {
        let mut slots = [Variant::Int(3), Variant::Empty];
        let args = Args(&mut slots);
        assert_eq!(args.opt_i32(0, 9), Ok(3));
        assert_eq!(args.opt_i32(1, 9), Ok(9));
        assert_eq!(args.opt_i32(5, 9), Ok(9));
        assert_eq!(args.opt_string(1), Ok(String::new()));
        assert_eq!(args.string(0), Err(Fail));
    }

    #[test]
    fn test_locked_model_rejects_mutation() {
        let engine = MemoryEngine::new(EngineVersion::Sap2000V19);
        let mut lock = [Variant::Bool(true)];
        assert_eq!(invoke(&engine, Interface::SapModel, "SetModelIsLocked", &mut lock), 0);
        assert_eq!(invoke(&engine, Interface::SapModel, "GetModelIsLocked", &mut []), 1);

        let mut args = [
            Variant::Str("C1".into()),
            Variant::Int(2),
            Variant::Int(-1),
            Variant::Str(String::new()),
            Variant::Str(String::new()),
        ];
        assert_eq!(invoke(&engine, Interface::PropMaterial, "SetMaterial", &mut args), FAILED);
        assert_eq!(invoke(&engine, Interface::PropMaterial, "Count", &mut []), 0);
    }

    #[test]
    fn test_open_of_locked_file_keeps_current_lock() {
        let dir = tempfile::tempdir().unwrap();
        let x = dir.path().join("x.csim");
        let y = dir.path().join("y.csim");
        let path_arg = |p: &Path| [Variant::Str(p.display().to_string())];

        let a = MemoryEngine::new(EngineVersion::Sap2000V19).with_file_locking("a");
        let b = MemoryEngine::new(EngineVersion::Sap2000V19).with_file_locking("b");
        assert_eq!(invoke(&a, Interface::File, "Save", &mut path_arg(&x)), 0);
        assert_eq!(invoke(&b, Interface::File, "Save", &mut path_arg(&y)), 0);

        assert_eq!(invoke(&a, Interface::File, "OpenFile", &mut path_arg(&y)), FAILED);
        assert_eq!(FileLock::check(&x).map(|info| info.user_id), Some("a".to_string()));
        assert_eq!(FileLock::check(&y).map(|info| info.user_id), Some("b".to_string()));
        assert_eq!(a.model_path(), Some(x));
    }

    #[test]
    fn test_reopen_moves_lock() {
        let dir = tempfile::tempdir().unwrap();
        let x = dir.path().join("x.csim");
        let y = dir.path().join("y.csim");
        let path_arg = |p: &Path| [Variant::Str(p.display().to_string())];

        let a = MemoryEngine::new(EngineVersion::Etabs2016).with_file_locking("a");
        assert_eq!(invoke(&a, Interface::File, "Save", &mut path_arg(&y)), 0);
        assert_eq!(invoke(&a, Interface::File, "Save", &mut path_arg(&x)), 0);
        assert!(FileLock::check(&y).is_none());
        assert_eq!(invoke(&a, Interface::File, "OpenFile", &mut path_arg(&y)), 0);
        assert!(FileLock::check(&x).is_none());
        assert_eq!(FileLock::check(&y).map(|info| info.user_id), Some("a".to_string()));
        assert_eq!(a.model_path(), Some(y));
    }

    #[test]
    fn test_get_version() {
        let engine = MemoryEngine::new(EngineVersion::Etabs2015);
        let mut args = [Variant::Empty, Variant::Empty];
        assert_eq!(invoke(&engine, Interface::SapModel, "GetVersion", &mut args), 0);
        assert_eq!(args[0], Variant::Str("15.0.0".to_string()));
        assert_eq!(args[1], Variant::Double(15.0));
    }
}
