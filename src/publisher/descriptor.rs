//! Package descriptors and the persisted Package Submission List.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ports::{FileSystem, PortError};

/// The minimal record needed to submit one package as a build job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Short repository name.
    pub repo_name: String,
    /// `owner/name` path on the source host.
    pub full_name: String,
    /// HTTPS clone URL.
    pub clone_url: String,
    /// Package name on the build farm.
    pub package_name: String,
    /// Spec file name inside the repository.
    pub spec_name: String,
}

/// Rules deriving package names and URLs from a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    /// Web base of the source host, e.g. `https://gitee.com`.
    pub web_base: String,
    /// Prepended to the repository name to form the package name.
    pub package_prefix: String,
    /// Appended to the repository name to form the spec file name.
    pub spec_suffix: String,
}

impl Naming {
    /// Builds the descriptor for repository `repo_name` at `full_name`.
    #[must_use]
    pub fn describe(&self, repo_name: &str, full_name: &str) -> PackageDescriptor {
        PackageDescriptor {
            repo_name: repo_name.to_string(),
            full_name: full_name.to_string(),
            clone_url: format!("{}/{full_name}.git", self.web_base.trim_end_matches('/')),
            package_name: format!("{}{repo_name}", self.package_prefix),
            spec_name: format!("{repo_name}{}", self.spec_suffix),
        }
    }
}

impl PackageDescriptor {
    /// Names of the fields that are empty.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("repo_name", &self.repo_name),
            ("full_name", &self.full_name),
            ("clone_url", &self.clone_url),
            ("package_name", &self.package_name),
            ("spec_name", &self.spec_name),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Returns `true` when every field is non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Builds a descriptor from one untrusted list entry. Missing or
    /// non-string fields become empty.
    fn from_entry(entry: &serde_json::Value) -> Self {
        let field = |name: &str| {
            entry.get(name).and_then(serde_json::Value::as_str).unwrap_or_default().to_string()
        };
        Self {
            repo_name: field("repo_name"),
            full_name: field("full_name"),
            clone_url: field("clone_url"),
            package_name: field("package_name"),
            spec_name: field("spec_name"),
        }
    }
}

/// Errors loading or saving the submission list.
#[derive(Debug, Error)]
pub enum ListError {
    /// The list file does not exist.
    #[error("submission list {} not found; run `rosport manifest` first", path.display())]
    Missing {
        /// Expected location.
        path: PathBuf,
    },
    /// Reading or writing the file failed.
    #[error("cannot access {}: {source}", path.display())]
    Io {
        /// List file.
        path: PathBuf,
        /// Underlying failure.
        source: PortError,
    },
    /// The file is not a JSON array.
    #[error("invalid submission list {}: {source}", path.display())]
    Json {
        /// List file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// Writes the complete descriptors as a pretty-printed JSON array and
/// returns how many were written. Incomplete descriptors are dropped.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_list(
    fs: &dyn FileSystem,
    path: &Path,
    descriptors: &[PackageDescriptor],
) -> Result<usize, ListError> {
    let complete: Vec<&PackageDescriptor> = descriptors
        .iter()
        .filter(|d| {
            let missing = d.missing_fields();
            if !missing.is_empty() {
                log::warn!("dropping incomplete descriptor {} (missing {missing:?})", d.full_name);
            }
            missing.is_empty()
        })
        .collect();
    let json = serde_json::to_string_pretty(&complete)
        .map_err(|source| ListError::Json { path: path.to_path_buf(), source })?;
    fs.write(path, &json).map_err(|source| ListError::Io { path: path.to_path_buf(), source })?;
    Ok(complete.len())
}

/// Reads the submission list. Entries are returned as found, complete or
/// not; callers decide what to do with incomplete ones.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable or not a JSON array.
pub fn load_list(fs: &dyn FileSystem, path: &Path) -> Result<Vec<PackageDescriptor>, ListError> {
    if !fs.exists(path) {
        return Err(ListError::Missing { path: path.to_path_buf() });
    }
    let content =
        fs.read_to_string(path).map_err(|source| ListError::Io { path: path.to_path_buf(), source })?;
    let entries: Vec<serde_json::Value> = serde_json::from_str(&content)
        .map_err(|source| ListError::Json { path: path.to_path_buf(), source })?;
    Ok(entries.iter().map(PackageDescriptor::from_entry).collect())
}
