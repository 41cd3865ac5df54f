//! # csi_core - Typed Accessors for SAP2000 / ETABS
//!
//! The SAP2000 and ETABS automation API is a large flat surface of native
//! methods that take positional arguments: bare integers for enumerations,
//! parallel arrays for lists of records, and a status code instead of an
//! error. `csi_core` puts a typed layer over it.
//!
//! Each accessor method flattens value holders to arrays, turns enums into
//! codes, invokes exactly one native entry point, checks its status and reads
//! the outputs back into typed values. A failing call is an [`ApiError`],
//! never a half-filled record.
//!
//! ## Quick Start
//!
//! ```rust
//! use csi_core::accessors::Definitions;
//! use csi_core::config::SessionConfig;
//! use csi_core::enums::MaterialType;
//! use csi_core::session::Session;
//! use csi_core::values::{FrameModifier, RectangleSection};
//!
//! let session = Session::in_memory(SessionConfig::default())?;
//! let steel = session.materials().add_material(MaterialType::Steel, "United States", "ASTM A992", "Grade 50", "")?;
//! session.frame_sections().set_rectangle("R1", &RectangleSection::new(steel.as_str(), 12.0, 6.0))?;
//! let frame = session.frame_objects().add_by_coord([0.0; 3], [120.0, 0.0, 0.0], "R1", "F1")?;
//!
//! let cracked = FrameModifier::cracked_beam();
//! session.frame_modifiers().set_modifiers(&frame, &cracked, Default::default())?;
//! assert_eq!(session.frame_modifiers().modifiers(&frame)?, cracked);
//! assert_eq!(session.frame_sections().count()?, 1);
//! # Ok::<(), csi_core::errors::ApiError>(())
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - the native boundary: [`Dispatch`](engine::Dispatch),
//!   call marshalling, version capabilities, the in-process reference engine
//! - [`accessors`] - one typed accessor per capability set
//! - [`values`] - fixed-shape records and their positional arrays
//! - [`enums`] - engine enumerations and their integer codes
//! - [`units`] - present-unit systems and conversions
//! - [`session`] / [`config`] - owning an engine and configuring it
//! - [`file_io`] - model snapshots with atomic saves and locking
//! - [`errors`] - structured error type

pub mod accessors;
pub mod config;
pub mod engine;
pub mod enums;
pub mod errors;
pub mod file_io;
pub mod session;
pub mod units;
pub mod values;

pub use errors::{ApiError, ApiResult};
pub use session::Session;
