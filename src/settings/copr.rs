//! Build-farm client configuration (`~/.config/copr`).
//!
//! The file is INI-style:
//!
//! ```text
//! [copr-cli]
//! login = abcdef
//! username = porter
//! token = secret
//! copr_url = https://eur.openeuler.openatom.cn
//! ```

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

const SECTION: &str = "copr-cli";

/// Errors raised while reading the build-farm configuration.
#[derive(Debug, Error)]
pub enum CoprConfigError {
    /// The file could not be read.
    #[error("build-farm config {path} is not readable: {source}")]
    Read {
        /// Config file path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// A required key is absent or empty.
    #[error("build-farm config {path} is missing '{key}' in [copr-cli]")]
    MissingKey {
        /// Config file path.
        path: String,
        /// Missing key.
        key: &'static str,
    },
}

/// Credentials for the build-farm API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoprCredentials {
    /// API login.
    pub login: String,
    /// Account that owns the projects.
    pub username: String,
    /// API token.
    pub token: String,
    /// Base URL of the build farm.
    pub copr_url: String,
}

impl CoprCredentials {
    /// Reads credentials from an INI-style config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or a required key is missing.
    pub fn load(path: &Path) -> Result<Self, CoprConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| CoprConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parses the `[copr-cli]` section of a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if a required key is missing. `copr_url` defaults to
    /// the public Fedora instance, like the reference client does.
    pub fn parse(content: &str, origin: &str) -> Result<Self, CoprConfigError> {
        let section = parse_section(content, SECTION);
        let take = |key: &'static str| {
            section.get(key).filter(|v| !v.is_empty()).cloned().ok_or_else(|| {
                CoprConfigError::MissingKey { path: origin.to_string(), key }
            })
        };

        Ok(Self {
            login: take("login")?,
            username: take("username")?,
            token: take("token")?,
            copr_url: section
                .get("copr_url")
                .filter(|v| !v.is_empty())
                .map_or_else(|| "https://copr.fedorainfracloud.org".to_string(), |u| {
                    u.trim_end_matches('/').to_string()
                }),
        })
    }
}

fn parse_section(content: &str, wanted: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();
    let mut in_section = false;

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            in_section = line[1..line.len() - 1].trim() == wanted;
        } else if in_section {
            if let Some((key, value)) = line.split_once('=') {
                values.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
    }

    values
}
