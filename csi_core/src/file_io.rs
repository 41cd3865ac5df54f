//! # Model Snapshot Files
//!
//! [`MemoryEngine`](crate::engine::MemoryEngine) persists its model for
//! `File.Save` and restores it for `File.OpenFile` through this module.
//! Snapshots are pretty-printed JSON of [`ModelData`].
//!
//! - saves go through a `.tmp` sibling that is synced and then renamed over
//!   the target, so an interrupted save never leaves a truncated snapshot
//! - loads reject snapshots whose schema major version differs from ours
//! - [`FileLock`] pairs an OS-level exclusive lock with a `.lock` file that
//!   says who holds it, for models kept on shared drives
//!
//! ## Example
//!
//! ```rust,no_run
//! use csi_core::engine::model::ModelData;
//! use csi_core::engine::Program;
//! use csi_core::file_io::{load_model, save_model, FileLock};
//! use csi_core::units::Units;
//! use std::path::Path;
//!
//! let path = Path::new("tower.csim");
//! let lock = FileLock::acquire(path, "engineer@example.com")?;
//! save_model(&ModelData::new(Program::Etabs, Units::KnM), path)?;
//! let model = load_model(path)?;
//! assert_eq!(model.units, Units::KnM);
//! drop(lock);
//! # Ok::<(), csi_core::errors::ApiError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::engine::model::{ModelData, SCHEMA_VERSION};
use crate::errors::{ApiError, ApiResult};

/// Locks older than this are taken over regardless of their owner
const STALE_AFTER_HOURS: i64 = 24;

/// Contents of a `.lock` file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    pub user_id: String,
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// The holder is gone: its process no longer runs on this machine, or the
    /// lock has outlived [`STALE_AFTER_HOURS`].
    pub fn is_stale(&self) -> bool {
        if hostname().as_deref() == Some(self.machine.as_str()) && !process_alive(self.pid) {
            return true;
        }
        (Utc::now() - self.locked_at).num_hours() > STALE_AFTER_HOURS
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME").ok().or_else(|| std::env::var("HOST").ok())
    }
}

fn process_alive(pid: u32) -> bool {
    #[cfg(unix)]
    {
        Path::new(&format!("/proc/{}", pid)).exists()
    }
    #[cfg(windows)]
    {
        std::process::Command::new("tasklist")
            .args(["/FI", &format!("PID eq {}", pid), "/NH"])
            .output()
            .map(|out| String::from_utf8_lossy(&out.stdout).contains(&pid.to_string()))
            .unwrap_or(true)
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = pid;
        true
    }
}

/// Exclusive hold on a model file, released on drop.
pub struct FileLock {
    model_path: PathBuf,
    lock_path: PathBuf,
    _handle: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Lock `path` for `user_id`.
    ///
    /// Fails with [`ApiError::FileLocked`] while another live holder owns the
    /// lock. A stale lock is taken over with a warning.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> ApiResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if let Ok(existing) = read_lock_info(&lock_path) {
            if !existing.is_stale() {
                return Err(ApiError::file_locked(
                    path.display().to_string(),
                    format!("{} ({})", existing.user_id, existing.machine),
                    existing.locked_at.to_rfc3339(),
                ));
            }
            log::warn!(
                "taking over stale lock on {} held by {} since {}",
                path.display(),
                existing.user_id,
                existing.locked_at.to_rfc3339()
            );
        }

        let lock_err = |op: &str, e: std::io::Error| ApiError::file_error(op, lock_path.display().to_string(), e.to_string());
        let mut handle = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| lock_err("create lock", e))?;

        // a holder's metadata stays intact until the OS lock is ours
        handle
            .try_lock_exclusive()
            .map_err(|_| ApiError::file_locked(path.display().to_string(), "another process", "unknown"))?;
        handle.set_len(0).map_err(|e| lock_err("truncate lock", e))?;

        let json = serde_json::to_string_pretty(&info).map_err(|e| ApiError::SerializationError {
            reason: e.to_string(),
        })?;
        handle.write_all(json.as_bytes()).map_err(|e| lock_err("write lock", e))?;
        handle.sync_all().map_err(|e| lock_err("sync lock", e))?;

        log::debug!("locked {} for {}", path.display(), info.user_id);
        Ok(FileLock {
            model_path: path.to_path_buf(),
            lock_path,
            _handle: handle,
            info,
        })
    }

    /// Current live holder of `path`, if any
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_lock_info(&lock_path_for(path)).ok().filter(|info| !info.is_stale())
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `model.csim` -> `model.csim.lock`
fn lock_path_for(model_path: &Path) -> PathBuf {
    sibling(model_path, "lock")
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

fn read_lock_info(lock_path: &Path) -> ApiResult<LockInfo> {
    let contents = read_to_string(lock_path, "read lock")?;
    serde_json::from_str(&contents).map_err(|e| ApiError::SerializationError { reason: e.to_string() })
}

fn read_to_string(path: &Path, operation: &str) -> ApiResult<String> {
    let mut file =
        File::open(path).map_err(|e| ApiError::file_error(operation, path.display().to_string(), e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| ApiError::file_error(operation, path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Write `model` to `path` atomically.
pub fn save_model(model: &ModelData, path: &Path) -> ApiResult<()> {
    let json = serde_json::to_string_pretty(model).map_err(|e| ApiError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = sibling(path, "tmp");
    let tmp_err = |op: &str, e: std::io::Error| ApiError::file_error(op, tmp_path.display().to_string(), e.to_string());
    let mut tmp = File::create(&tmp_path).map_err(|e| tmp_err("create temp file", e))?;
    tmp.write_all(json.as_bytes()).map_err(|e| tmp_err("write temp file", e))?;
    tmp.sync_all().map_err(|e| tmp_err("sync temp file", e))?;
    drop(tmp);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        ApiError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// Read a snapshot written by [`save_model`].
///
/// Fails with [`ApiError::VersionMismatch`] when the snapshot schema is not
/// readable by this build.
pub fn load_model(path: &Path) -> ApiResult<ModelData> {
    let contents = read_to_string(path, "open")?;
    let model: ModelData = serde_json::from_str(&contents).map_err(|e| ApiError::SerializationError {
        reason: format!("invalid model snapshot {}: {}", path.display(), e),
    })?;
    validate_version(&model.meta.version)?;
    Ok(model)
}

/// Load a snapshot along with the live holder of its lock, if any
pub fn load_model_with_lock_check(path: &Path) -> ApiResult<(ModelData, Option<LockInfo>)> {
    let model = load_model(path)?;
    Ok((model, FileLock::check(path)))
}

/// Same major version; while on 0.x, a newer minor is also refused.
fn validate_version(file_version: &str) -> ApiResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file = parse(file_version);
    let ours = parse(SCHEMA_VERSION);
    let mismatch = || ApiError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    match (file.as_slice(), ours.as_slice()) {
        ([file_major, rest @ ..], [our_major, our_rest @ ..]) => {
            if file_major != our_major {
                return Err(mismatch());
            }
            if *our_major == 0 {
                if let (Some(file_minor), Some(our_minor)) = (rest.first(), our_rest.first()) {
                    if file_minor > our_minor {
                        return Err(mismatch());
                    }
                }
            }
            Ok(())
        }
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Program;
    use crate::units::Units;
    use tempfile::tempdir;

    #[test]
    fn test_sibling_paths() {
        let path = Path::new("/models/tower.csim");
        assert_eq!(lock_path_for(path), Path::new("/models/tower.csim.lock"));
        assert_eq!(sibling(path, "tmp"), Path::new("/models/tower.csim.tmp"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roundtrip.csim");
        let mut model = ModelData::new(Program::Sap2000, Units::KnM);
        model.locked = true;
        save_model(&model, &path).unwrap();
        assert!(!sibling(&path, "tmp").exists());
        assert_eq!(load_model(&path).unwrap(), model);
    }

    #[test]
    fn test_load_rejects_future_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("future.csim");
        let mut model = ModelData::new(Program::Etabs, Units::KipIn);
        model.meta.version = "1.0.0".to_string();
        save_model(&model, &path).unwrap();
        let err = load_model(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_load_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.csim");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_model(&path), Err(ApiError::SerializationError { .. })));
        assert!(matches!(
            load_model(&dir.path().join("missing.csim")),
            Err(ApiError::FileError { .. })
        ));
    }

    #[test]
    fn test_lock_acquire_and_release() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locked.csim");
        let lock = FileLock::acquire(&path, "a@example.com").unwrap();
        assert_eq!(lock.model_path(), path.as_path());
        assert!(lock_path_for(&path).exists());
        drop(lock);
        assert!(!lock_path_for(&path).exists());
    }

    #[test]
    fn test_stale_lock_taken_over() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stale.csim");
        let old = LockInfo {
            user_id: "gone@example.com".to_string(),
            machine: "elsewhere".to_string(),
            pid: 1,
            locked_at: Utc::now() - chrono::Duration::hours(STALE_AFTER_HOURS + 1),
        };
        fs::write(lock_path_for(&path), serde_json::to_string(&old).unwrap()).unwrap();
        assert!(FileLock::check(&path).is_none());
        let lock = FileLock::acquire(&path, "b@example.com").unwrap();
        assert_eq!(lock.info.user_id, "b@example.com");
    }

    #[test]
    fn test_failed_acquire_keeps_holder_metadata() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("held.csim");
        let _held = FileLock::acquire(&path, "a@example.com").unwrap();

        // metadata looks stale, but the OS lock is still held
        let old = LockInfo {
            user_id: "a@example.com".to_string(),
            machine: "here".to_string(),
            pid: 1,
            locked_at: Utc::now() - chrono::Duration::hours(STALE_AFTER_HOURS + 1),
        };
        fs::write(lock_path_for(&path), serde_json::to_string(&old).unwrap()).unwrap();

        let err = FileLock::acquire(&path, "b@example.com").err().unwrap();
        assert_eq!(err.error_code(), "FILE_LOCKED");
        let kept = read_lock_info(&lock_path_for(&path)).unwrap();
        assert_eq!(kept.user_id, "a@example.com");
        assert_eq!(kept.machine, "here");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("1.1.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}
