//! # Error Types
//!
//! Structured error types for csi_core. Every accessor returns
//! [`ApiResult`]; a failed native call is always reported as
//! [`ApiError::CallFailed`], carrying the entry point that was invoked and the
//! raw status code the engine returned.
//!
//! Local validation (parallel arrays of different lengths, positional arrays
//! of the wrong shape) is reported before any native call is made, through
//! its own variants, so a caller can tell "the engine refused" apart from
//! "the request was malformed".
//!
//! ## Example
//!
//! ```rust
//! use csi_core::errors::{ApiError, ApiResult};
//!
//! fn check_lengths(names: &[String], angles: &[f64]) -> ApiResult<()> {
//!     if names.len() != angles.len() {
//!         return Err(ApiError::length_mismatch("angles", names.len(), angles.len()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_lengths(&["L1".to_string()], &[]).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for csi_core operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Structured error type for accessor operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
    /// The native entry point returned a non-zero status code
    #[error("Native call {entry} failed with status {status}")]
    CallFailed { entry: String, status: i32 },

    /// Parallel input arrays differ in length
    #[error("Length mismatch for '{field}': expected {expected} items, got {actual}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// A positional array does not match the shape of the record it encodes
    #[error("Array for {record} must hold {expected} values, got {actual}")]
    InvalidArrayLength {
        record: String,
        expected: usize,
        actual: usize,
    },

    /// An integer returned by the engine has no matching enum member
    #[error("Unknown {enum_name} code: {code}")]
    UnknownCode { enum_name: String, code: i32 },

    /// The selected engine version does not expose this entry point
    #[error("{entry} is not available in {version}")]
    Unsupported { entry: String, version: String },

    /// An output slot came back with an unexpected type
    #[error("Marshalling error in {entry}, argument {index}: {reason}")]
    Marshal {
        entry: String,
        index: usize,
        reason: String,
    },

    /// An input value is invalid (configuration, empty name, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl ApiError {
    /// Create a CallFailed error
    pub fn call_failed(entry: impl Into<String>, status: i32) -> Self {
        ApiError::CallFailed {
            entry: entry.into(),
            status,
        }
    }

    /// Create a LengthMismatch error
    pub fn length_mismatch(field: impl Into<String>, expected: usize, actual: usize) -> Self {
        ApiError::LengthMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Create an InvalidArrayLength error
    pub fn invalid_array_length(record: impl Into<String>, expected: usize, actual: usize) -> Self {
        ApiError::InvalidArrayLength {
            record: record.into(),
            expected,
            actual,
        }
    }

    /// Create an UnknownCode error
    pub fn unknown_code(enum_name: impl Into<String>, code: i32) -> Self {
        ApiError::UnknownCode {
            enum_name: enum_name.into(),
            code,
        }
    }

    /// Create an Unsupported error
    pub fn unsupported(entry: impl Into<String>, version: impl Into<String>) -> Self {
        ApiError::Unsupported {
            entry: entry.into(),
            version: version.into(),
        }
    }

    /// Create a Marshal error
    pub fn marshal(entry: impl Into<String>, index: usize, reason: impl Into<String>) -> Self {
        ApiError::Marshal {
            entry: entry.into(),
            index,
            reason: reason.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        ApiError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// True when the engine itself refused the call (as opposed to local validation)
    pub fn is_call_failure(&self) -> bool {
        matches!(self, ApiError::CallFailed { .. })
    }

    /// True when the request was rejected before reaching the engine
    pub fn is_validation_failure(&self) -> bool {
        matches!(
            self,
            ApiError::LengthMismatch { .. }
                | ApiError::InvalidArrayLength { .. }
                | ApiError::InvalidInput { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::CallFailed { .. } => "CALL_FAILED",
            ApiError::LengthMismatch { .. } => "LENGTH_MISMATCH",
            ApiError::InvalidArrayLength { .. } => "INVALID_ARRAY_LENGTH",
            ApiError::UnknownCode { .. } => "UNKNOWN_CODE",
            ApiError::Unsupported { .. } => "UNSUPPORTED",
            ApiError::Marshal { .. } => "MARSHAL_ERROR",
            ApiError::InvalidInput { .. } => "INVALID_INPUT",
            ApiError::FileError { .. } => "FILE_ERROR",
            ApiError::FileLocked { .. } => "FILE_LOCKED",
            ApiError::SerializationError { .. } => "SERIALIZATION_ERROR",
            ApiError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::SerializationError {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = ApiError::call_failed("PropMaterial.Delete", 1);
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: ApiError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::call_failed("X.Y", 1).error_code(), "CALL_FAILED");
        assert_eq!(ApiError::length_mismatch("a", 1, 2).error_code(), "LENGTH_MISMATCH");
        assert_eq!(ApiError::unknown_code("ItemType", 9).error_code(), "UNKNOWN_CODE");
    }

    #[test]
    fn test_failure_classification() {
        assert!(ApiError::call_failed("X.Y", 1).is_call_failure());
        assert!(!ApiError::call_failed("X.Y", 1).is_validation_failure());
        assert!(ApiError::length_mismatch("a", 1, 2).is_validation_failure());
        assert!(!ApiError::length_mismatch("a", 1, 2).is_call_failure());
    }

    #[test]
    fn test_display_keeps_status() {
        let error = ApiError::call_failed("PropFrame.ChangeName", 1);
        assert_eq!(error.to_string(), "Native call PropFrame.ChangeName failed with status 1");
    }
}
