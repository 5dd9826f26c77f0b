//! Loading and saving the rosdep manifest and the failure list.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::ports::{FileSystem, PortError};

/// Errors reading or writing resolver artifacts.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The input manifest does not exist.
    #[error("input manifest {} not found", path.display())]
    Missing {
        /// Expected location.
        path: PathBuf,
    },
    /// Reading or writing a file failed.
    #[error("cannot access {}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying failure.
        source: PortError,
    },
    /// The manifest is not valid YAML, or could not be serialized.
    #[error("invalid manifest {}: {source}", path.display())]
    Yaml {
        /// File involved.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
}

/// Loads the manifest at `path`.
///
/// An empty document, or one whose top level is not a mapping, is treated as
/// an empty manifest with a warning.
///
/// # Errors
///
/// Returns [`ManifestError::Missing`] when the file does not exist, and an
/// I/O or YAML error when it cannot be read or parsed.
pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Mapping, ManifestError> {
    if !fs.exists(path) {
        return Err(ManifestError::Missing { path: path.to_path_buf() });
    }
    let content = fs
        .read_to_string(path)
        .map_err(|source| ManifestError::Io { path: path.to_path_buf(), source })?;
    let document: Value = serde_yaml::from_str(&content)
        .map_err(|source| ManifestError::Yaml { path: path.to_path_buf(), source })?;
    match document {
        Value::Mapping(mapping) if !mapping.is_empty() => Ok(mapping),
        _ => {
            log::warn!("{} is empty or not a mapping; treating it as empty", path.display());
            Ok(Mapping::new())
        }
    }
}

/// Writes `manifest` to `path`, keeping key order.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save(fs: &dyn FileSystem, path: &Path, manifest: &Mapping) -> Result<(), ManifestError> {
    let yaml = serde_yaml::to_string(manifest)
        .map_err(|source| ManifestError::Yaml { path: path.to_path_buf(), source })?;
    fs.write(path, &yaml).map_err(|source| ManifestError::Io { path: path.to_path_buf(), source })
}

/// Writes the failure list, one key per line.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn save_failures(fs: &dyn FileSystem, path: &Path, keys: &[String]) -> Result<(), ManifestError> {
    let content: String = keys.iter().map(|key| format!("{key}\n")).collect();
    fs.write(path, &content).map_err(|source| ManifestError::Io { path: path.to_path_buf(), source })
}
