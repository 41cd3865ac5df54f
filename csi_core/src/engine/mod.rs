//! # Native Engine Boundary
//!
//! Everything that crosses into the analysis engine goes through the
//! [`Dispatch`] trait: one late-bound call per native entry point, with
//! arguments passed as a mutable slice of [`Variant`] slots. Output parameters
//! are written back into their slots by the engine, the same way a by-ref
//! COM argument is.
//!
//! Accessors never talk to [`Dispatch`] directly. They build a [`Call`],
//! invoke it, and read typed values out of the resulting [`Reply`]. `Call`
//! is where the shared contract lives:
//!
//! 1. check that the selected engine version exposes the entry point
//! 2. invoke exactly once
//! 3. turn a non-zero status into [`ApiError::CallFailed`]
//!
//! ## Example
//!
//! ```rust
//! use csi_core::engine::{Call, Interface, MemoryEngine, EngineVersion};
//!
//! let engine = MemoryEngine::new(EngineVersion::Sap2000V19);
//! let count = Call::new(Interface::PropMaterial, "Count").invoke_value(&engine).unwrap();
//! assert_eq!(count, 0);
//! ```

pub mod memory;
pub mod model;
pub mod version;

pub use memory::MemoryEngine;
pub use version::{EngineVersion, Program};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ApiError, ApiResult};

// ============================================================================
// Interfaces and Entry Points
// ============================================================================

/// A capability set exposed by the engine's object model.
///
/// Each accessor is bound to exactly one interface; engine versions differ in
/// which interfaces (and which methods within them) they expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Interface {
    SapModel,
    File,
    FrameObj,
    AreaObj,
    PropMaterial,
    PropFrame,
    PropArea,
    PropCable,
    PropAreaSpring,
    PropPointSpring,
    PropLink,
}

impl Interface {
    /// All interfaces in object-model order
    pub const ALL: [Interface; 11] = [
        Interface::SapModel,
        Interface::File,
        Interface::FrameObj,
        Interface::AreaObj,
        Interface::PropMaterial,
        Interface::PropFrame,
        Interface::PropArea,
        Interface::PropCable,
        Interface::PropAreaSpring,
        Interface::PropPointSpring,
        Interface::PropLink,
    ];

    /// Name as it appears in the native object model
    pub fn name(&self) -> &'static str {
        match self {
            Interface::SapModel => "SapModel",
            Interface::File => "File",
            Interface::FrameObj => "FrameObj",
            Interface::AreaObj => "AreaObj",
            Interface::PropMaterial => "PropMaterial",
            Interface::PropFrame => "PropFrame",
            Interface::PropArea => "PropArea",
            Interface::PropCable => "PropCable",
            Interface::PropAreaSpring => "PropAreaSpring",
            Interface::PropPointSpring => "PropPointSpring",
            Interface::PropLink => "PropLink",
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One native function: an interface plus a method name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryPoint {
    pub interface: Interface,
    pub method: &'static str,
}

impl EntryPoint {
    pub const fn new(interface: Interface, method: &'static str) -> Self {
        EntryPoint { interface, method }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.interface.name(), self.method)
    }
}

// ============================================================================
// Variant
// ============================================================================

/// A late-bound argument slot.
///
/// Enumerations travel as `Int`, structured records as flat arrays.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    #[default]
    Empty,
    Bool(bool),
    Int(i32),
    Double(f64),
    Str(String),
    BoolArray(Vec<bool>),
    IntArray(Vec<i32>),
    DoubleArray(Vec<f64>),
    StrArray(Vec<String>),
}

impl Variant {
    /// Short type name used in marshalling diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Variant::Empty => "Empty",
            Variant::Bool(_) => "Bool",
            Variant::Int(_) => "Int",
            Variant::Double(_) => "Double",
            Variant::Str(_) => "Str",
            Variant::BoolArray(_) => "BoolArray",
            Variant::IntArray(_) => "IntArray",
            Variant::DoubleArray(_) => "DoubleArray",
            Variant::StrArray(_) => "StrArray",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Variant::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Variant::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Integers widen to doubles, as they do across the COM boundary
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Variant::Double(v) => Some(*v),
            Variant::Int(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bools(&self) -> Option<&[bool]> {
        match self {
            Variant::BoolArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ints(&self) -> Option<&[i32]> {
        match self {
            Variant::IntArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_doubles(&self) -> Option<&[f64]> {
        match self {
            Variant::DoubleArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_strs(&self) -> Option<&[String]> {
        match self {
            Variant::StrArray(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for Variant {
    fn from(v: bool) -> Self {
        Variant::Bool(v)
    }
}

impl From<i32> for Variant {
    fn from(v: i32) -> Self {
        Variant::Int(v)
    }
}

impl From<f64> for Variant {
    fn from(v: f64) -> Self {
        Variant::Double(v)
    }
}

impl From<&str> for Variant {
    fn from(v: &str) -> Self {
        Variant::Str(v.to_string())
    }
}

impl From<String> for Variant {
    fn from(v: String) -> Self {
        Variant::Str(v)
    }
}

impl From<&String> for Variant {
    fn from(v: &String) -> Self {
        Variant::Str(v.clone())
    }
}

impl From<Vec<bool>> for Variant {
    fn from(v: Vec<bool>) -> Self {
        Variant::BoolArray(v)
    }
}

impl From<Vec<i32>> for Variant {
    fn from(v: Vec<i32>) -> Self {
        Variant::IntArray(v)
    }
}

impl From<Vec<f64>> for Variant {
    fn from(v: Vec<f64>) -> Self {
        Variant::DoubleArray(v)
    }
}

impl From<Vec<String>> for Variant {
    fn from(v: Vec<String>) -> Self {
        Variant::StrArray(v)
    }
}

impl<const N: usize> From<[bool; N]> for Variant {
    fn from(v: [bool; N]) -> Self {
        Variant::BoolArray(v.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Variant {
    fn from(v: [f64; N]) -> Self {
        Variant::DoubleArray(v.to_vec())
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// A live session with the native engine.
///
/// Implementations must return `0` from [`Dispatch::invoke`] on success and a
/// non-zero status otherwise, except for `Count`-style entry points whose
/// return value is the result itself. The receiver is `&self` because the
/// native session object is interior-mutable; implementations are expected to
/// be used from a single thread.
pub trait Dispatch {
    /// The engine build this session talks to
    fn version(&self) -> EngineVersion;

    /// Invoke one entry point. Output parameters are written into `args`.
    fn invoke(&self, entry: EntryPoint, args: &mut [Variant]) -> i32;
}

impl<D: Dispatch + ?Sized> Dispatch for Box<D> {
    fn version(&self) -> EngineVersion {
        (**self).version()
    }

    fn invoke(&self, entry: EntryPoint, args: &mut [Variant]) -> i32 {
        (**self).invoke(entry, args)
    }
}

// ============================================================================
// Call / Reply
// ============================================================================

/// Builder for a single native call.
#[derive(Debug, Clone)]
pub struct Call {
    entry: EntryPoint,
    args: Vec<Variant>,
}

impl Call {
    pub fn new(interface: Interface, method: &'static str) -> Self {
        Call {
            entry: EntryPoint::new(interface, method),
            args: Vec::new(),
        }
    }

    /// Append an input argument
    pub fn arg(mut self, value: impl Into<Variant>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Append an empty output slot
    pub fn out(mut self) -> Self {
        self.args.push(Variant::Empty);
        self
    }

    /// Append `n` empty output slots
    pub fn outs(mut self, n: usize) -> Self {
        self.args.extend(std::iter::repeat(Variant::Empty).take(n));
        self
    }

    pub fn entry(&self) -> EntryPoint {
        self.entry
    }

    fn check_supported(&self, engine: &dyn Dispatch) -> ApiResult<()> {
        let version = engine.version();
        if !version.supports(self.entry) {
            return Err(ApiError::unsupported(self.entry.to_string(), version.label()));
        }
        Ok(())
    }

    /// Invoke and check the status code
    pub fn invoke(mut self, engine: &dyn Dispatch) -> ApiResult<Reply> {
        self.check_supported(engine)?;
        log::trace!("invoking {} with {} argument(s)", self.entry, self.args.len());
        let status = engine.invoke(self.entry, &mut self.args);
        if status != 0 {
            log::debug!("{} returned status {}", self.entry, status);
            return Err(ApiError::call_failed(self.entry.to_string(), status));
        }
        Ok(Reply {
            entry: self.entry,
            args: self.args,
        })
    }

    /// Invoke an entry point whose return value is the result (e.g. `Count`).
    /// A negative return value is the failure status.
    pub fn invoke_value(mut self, engine: &dyn Dispatch) -> ApiResult<i32> {
        self.check_supported(engine)?;
        log::trace!("invoking {} for its return value", self.entry);
        let value = engine.invoke(self.entry, &mut self.args);
        if value < 0 {
            log::debug!("{} returned status {}", self.entry, value);
            return Err(ApiError::call_failed(self.entry.to_string(), value));
        }
        Ok(value)
    }
}

/// The argument slots of a successful call, ready to be read back.
#[derive(Debug)]
pub struct Reply {
    entry: EntryPoint,
    args: Vec<Variant>,
}

impl Reply {
    fn take(&mut self, index: usize) -> ApiResult<Variant> {
        match self.args.get_mut(index) {
            Some(slot) => Ok(std::mem::take(slot)),
            None => Err(ApiError::marshal(self.entry.to_string(), index, "no such argument")),
        }
    }

    fn mismatch(&self, index: usize, wanted: &str, got: &Variant) -> ApiError {
        ApiError::marshal(
            self.entry.to_string(),
            index,
            format!("expected {}, got {}", wanted, got.type_name()),
        )
    }

    pub fn bool(&mut self, index: usize) -> ApiResult<bool> {
        let v = self.take(index)?;
        v.as_bool().ok_or_else(|| self.mismatch(index, "Bool", &v))
    }

    pub fn i32(&mut self, index: usize) -> ApiResult<i32> {
        let v = self.take(index)?;
        v.as_i32().ok_or_else(|| self.mismatch(index, "Int", &v))
    }

    pub fn f64(&mut self, index: usize) -> ApiResult<f64> {
        let v = self.take(index)?;
        v.as_f64().ok_or_else(|| self.mismatch(index, "Double", &v))
    }

    pub fn string(&mut self, index: usize) -> ApiResult<String> {
        match self.take(index)? {
            Variant::Str(s) => Ok(s),
            other => Err(self.mismatch(index, "Str", &other)),
        }
    }

    pub fn bools(&mut self, index: usize) -> ApiResult<Vec<bool>> {
        match self.take(index)? {
            Variant::BoolArray(v) => Ok(v),
            other => Err(self.mismatch(index, "BoolArray", &other)),
        }
    }

    pub fn ints(&mut self, index: usize) -> ApiResult<Vec<i32>> {
        match self.take(index)? {
            Variant::IntArray(v) => Ok(v),
            other => Err(self.mismatch(index, "IntArray", &other)),
        }
    }

    pub fn doubles(&mut self, index: usize) -> ApiResult<Vec<f64>> {
        match self.take(index)? {
            Variant::DoubleArray(v) => Ok(v),
            other => Err(self.mismatch(index, "DoubleArray", &other)),
        }
    }

    pub fn strings(&mut self, index: usize) -> ApiResult<Vec<String>> {
        match self.take(index)? {
            Variant::StrArray(v) => Ok(v),
            other => Err(self.mismatch(index, "StrArray", &other)),
        }
    }
}
