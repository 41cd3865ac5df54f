//! # Typed Accessors
//!
//! One accessor per capability set of the engine's object model. Each method
//! maps onto exactly one native entry point:
//!
//! 1. value holders are flattened to positional arrays, enums to codes
//! 2. parallel input arrays are length-checked before anything is sent
//! 3. one [`Call`] is invoked, and a non-zero status becomes an error
//! 4. output slots are read back into typed values
//!
//! Accessors borrow the engine and hold nothing else, so they are cheap to
//! create on demand (see [`Session`](crate::session::Session)).
//!
//! ## Shared operations
//!
//! Every definition table supports the same family of operations. They live
//! on the [`Definitions`] trait, which each accessor implements by naming
//! its [`Interface`]:
//!
//! ```rust
//! use csi_core::accessors::{Definitions, LinkProperties};
//! use csi_core::engine::{EngineVersion, MemoryEngine};
//!
//! let engine = MemoryEngine::new(EngineVersion::Sap2000V19);
//! let links = LinkProperties::new(&engine);
//! assert!(links.name_list().unwrap().is_empty());
//! assert_eq!(links.count().unwrap(), 0);
//! assert!(links.change_name("Old", "New").is_err());
//! ```

pub mod area_modifiers;
pub mod area_objects;
pub mod area_section;
pub mod area_spring;
pub mod cable_section;
pub mod file;
pub mod frame_modifiers;
pub mod frame_objects;
pub mod frame_releases;
pub mod frame_section;
pub mod link_properties;
pub mod material_properties;
pub mod point_spring;
pub mod sap_model;

pub use area_modifiers::AreaModifiers;
pub use area_objects::AreaObjects;
pub use area_section::AreaSection;
pub use area_spring::AreaSpring;
pub use cable_section::CableSection;
pub use file::FileAccessor;
pub use frame_modifiers::FrameModifiers;
pub use frame_objects::FrameObjects;
pub use frame_releases::FrameReleases;
pub use frame_section::FrameSection;
pub use link_properties::LinkProperties;
pub use material_properties::MaterialProperties;
pub use point_spring::PointSpring;
pub use sap_model::SapModelAccessor;

use crate::engine::{Call, Dispatch, Interface};
use crate::errors::{ApiError, ApiResult};
use crate::values::DefinitionInfo;

/// The operation family shared by every named definition table.
pub trait Definitions {
    /// Capability set the table lives in
    const INTERFACE: Interface;

    fn engine(&self) -> &dyn Dispatch;

    /// Rename a definition; references to it follow the new name
    fn change_name(&self, name: &str, new_name: &str) -> ApiResult<()> {
        Call::new(Self::INTERFACE, "ChangeName")
            .arg(name)
            .arg(new_name)
            .invoke(self.engine())?;
        Ok(())
    }

    /// Number of definitions in the table
    fn count(&self) -> ApiResult<usize> {
        let call = Call::new(Self::INTERFACE, "Count");
        let entry = call.entry();
        let n = call.invoke_value(self.engine())?;
        usize::try_from(n).map_err(|_| ApiError::call_failed(entry.to_string(), n))
    }

    /// Delete a definition. Fails while something else references it.
    fn delete(&self, name: &str) -> ApiResult<()> {
        Call::new(Self::INTERFACE, "Delete").arg(name).invoke(self.engine())?;
        Ok(())
    }

    /// All names, in definition order
    fn name_list(&self) -> ApiResult<Vec<String>> {
        name_list(self.engine(), Self::INTERFACE, None)
    }
}

/// `GetNameList`, optionally filtered by a subtype code
pub(crate) fn name_list(engine: &dyn Dispatch, interface: Interface, filter: Option<i32>) -> ApiResult<Vec<String>> {
    let mut call = Call::new(interface, "GetNameList").out().out();
    if let Some(code) = filter {
        call = call.arg(code);
    }
    let entry = call.entry();
    let mut reply = call.invoke(engine)?;
    let n = reply.i32(0)?;
    let names = reply.strings(1)?;
    if usize::try_from(n).ok() != Some(names.len()) {
        return Err(ApiError::marshal(
            entry.to_string(),
            1,
            format!("engine reported {} name(s) but returned {}", n, names.len()),
        ));
    }
    Ok(names)
}

/// Read the trailing `color, notes, guid` outputs starting at `first`
pub(crate) fn read_info(reply: &mut crate::engine::Reply, first: usize) -> ApiResult<DefinitionInfo> {
    Ok(DefinitionInfo {
        color: reply.i32(first)?,
        notes: reply.string(first + 1)?,
        guid: reply.string(first + 2)?,
    })
}

/// Append `color, notes, guid` inputs
pub(crate) fn with_info(call: Call, info: &DefinitionInfo) -> Call {
    call.arg(info.color).arg(&info.notes).arg(&info.guid)
}

/// Check an output count against the arrays that came with it
pub(crate) fn check_reported_count(call: &str, reported: i32, actual: usize) -> ApiResult<usize> {
    match usize::try_from(reported) {
        Ok(n) if n == actual => Ok(n),
        _ => Err(ApiError::length_mismatch(call, actual, reported.max(0) as usize)),
    }
}
