//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the porting pipeline and an
//! external system (package manager, web index, source host, build farm,
//! git, filesystem). Implementations live in `src/adapters/`.
//!
//! Every port reports failure through [`PortError`], so the pipeline can map
//! a failure kind to an action (skip the item or abort the run) at the point
//! of call instead of letting errors cross an item boundary.

pub mod build_farm;
pub mod filesystem;
pub mod git;
pub mod shell;
pub mod source_host;
pub mod web;

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use build_farm::{BuildFarm, FarmProject, ScmSource, SubmittedPackage};
pub use filesystem::FileSystem;
pub use git::GitClient;
pub use shell::{ShellExecutor, ShellOutput};
pub use source_host::{CreatedRepo, NewRepo, RemoteRepo, RepoOwner, RepoScope, SourceHost};
pub use web::WebClient;

/// Boxed future returned by the async ports, keeping the traits dyn-compatible.
pub type PortFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, PortError>> + Send + 'a>>;

/// Failure kinds reported by every port.
///
/// The enum is serializable so that recorded failures replay with the same
/// kind they were recorded with.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PortError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },
    /// The service answered with a non-success HTTP status.
    #[error("service returned HTTP {code}: {body}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body, as returned by the service.
        body: String,
    },
    /// An external process could not run or exited unsuccessfully.
    #[error("process failed (exit code {code:?}): {stderr}")]
    Process {
        /// Exit code, absent when the process was killed by a signal or never spawned.
        code: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },
    /// A response arrived but could not be decoded.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
    },
    /// Local filesystem failure.
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O failure.
        message: String,
    },
    /// The requested remote object does not exist.
    #[error("not found: {what}")]
    NotFound {
        /// What was looked up.
        what: String,
    },
}

impl PortError {
    /// Builds a [`PortError::Transport`] from any displayable error.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport { message: err.to_string() }
    }

    /// Builds a [`PortError::Decode`] from any displayable error.
    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode { message: err.to_string() }
    }
}

impl From<std::io::Error> for PortError {
    fn from(err: std::io::Error) -> Self {
        Self::Io { message: err.to_string() }
    }
}
