//! Pipeline settings.
//!
//! Defaults are built in, an optional YAML file overrides any of them and
//! the environment (including a `.env` file) supplies credentials and
//! account names. Every command receives the resulting [`Settings`]
//! explicitly instead of reading process state.

pub mod copr;

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Once;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use copr::CoprCredentials;

/// Environment variable naming an optional YAML settings file.
pub const CONFIG_ENV: &str = "ROSPORT_CONFIG";
/// Environment variable carrying the source-host access token.
pub const TOKEN_ENV: &str = "GITEE_TOKEN";
/// Environment variable naming the account whose repositories are published.
pub const USERNAME_ENV: &str = "GITEE_USERNAME";
/// Environment variable naming the organization repositories live under.
pub const ORG_ENV: &str = "GITEE_ORG";
/// Environment variable overriding the build-farm configuration file.
pub const COPR_CONFIG_ENV: &str = "COPR_CONFIG";

/// Errors raised while assembling settings or checking preconditions.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Read {
        /// Settings file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The settings file is not valid YAML for [`Settings`].
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        /// Settings file path.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
    /// A required value is missing.
    #[error("{what} is not set; export {env} (or add it to .env)")]
    Missing {
        /// Human-readable name of the value.
        what: &'static str,
        /// Environment variable that provides it.
        env: &'static str,
    },
}

/// All pipeline settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name resolver settings.
    pub resolver: ResolverSettings,
    /// Source fetcher settings.
    pub fetcher: FetcherSettings,
    /// Source-host account and API settings.
    pub host: HostSettings,
    /// Publisher (manifest, submit, publicize) settings.
    pub publisher: PublisherSettings,
    /// Stager settings.
    pub stager: StagerSettings,
}

/// Settings for `rosport resolve`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Source rosdep manifest.
    pub input: PathBuf,
    /// Where the augmented manifest is written.
    pub output: PathBuf,
    /// Where failed keys are written, one per line.
    pub fail_list: PathBuf,
    /// Distribution key written into the manifest.
    pub target_distro: String,
    /// Reference distributions, highest priority first.
    pub fallback_chain: Vec<String>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("base.yaml"),
            output: PathBuf::from("base_openeuler.yaml"),
            fail_list: PathBuf::from("fail_list.txt"),
            target_distro: "openeuler".to_string(),
            fallback_chain: ["rhel", "fedora", "arch", "debian", "ubuntu", "gentoo", "nixos"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Settings for `rosport fetch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherSettings {
    /// Sitemap listing every package page.
    pub sitemap_url: String,
    /// Substring identifying package pages among sitemap URLs.
    pub package_marker: String,
    /// Domain of the upstream source host.
    pub source_host: String,
    /// Organization that `/r/<name>/github-<org>-<suffix>` redirects point at.
    pub redirect_org: String,
    /// Branch cloned first; the default branch is the fallback.
    pub branch: String,
    /// Directory clones are created in.
    pub clone_root: PathBuf,
    /// Number of packages processed concurrently.
    pub max_workers: usize,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            sitemap_url: "https://index.ros.org/sitemap.xml".to_string(),
            package_marker: "/repos/".to_string(),
            source_host: "github.com".to_string(),
            redirect_org: "ros-industrial".to_string(),
            branch: "jazzy".to_string(),
            clone_root: PathBuf::from("."),
            max_workers: 32,
        }
    }
}

/// Source-host account settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    /// REST API base URL, with a trailing slash.
    pub api_base: String,
    /// Web base URL used to build clone URLs.
    pub web_base: String,
    /// Account whose repositories are published.
    pub username: Option<String>,
    /// Organization to operate on instead of the token owner.
    pub org: Option<String>,
    /// Access token; only ever taken from the environment.
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            api_base: "https://gitee.com/api/v5/".to_string(),
            web_base: "https://gitee.com".to_string(),
            username: None,
            org: None,
            token: None,
        }
    }
}

impl HostSettings {
    /// Returns the access token.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when no token was provided.
    pub fn require_token(&self) -> Result<&str, SettingsError> {
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(SettingsError::Missing { what: "source-host access token", env: TOKEN_ENV })
    }

    /// Returns the publishing account name.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when no account name was provided.
    pub fn require_username(&self) -> Result<&str, SettingsError> {
        self.username
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or(SettingsError::Missing { what: "source-host account name", env: USERNAME_ENV })
    }
}

/// Settings for `rosport manifest`, `submit` and `publicize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherSettings {
    /// Branch a repository must carry to be published.
    pub target_branch: String,
    /// Prefix prepended to repository names to form package names.
    pub package_prefix: String,
    /// Suffix appended to repository names to form spec file names.
    pub spec_suffix: String,
    /// Package Submission List file.
    pub list_path: PathBuf,
    /// Repositories requested per listing page.
    pub per_page: u32,
    /// Build-farm client configuration file.
    pub farm_config: PathBuf,
    /// Build-farm project packages are added to.
    pub project: String,
}

impl Default for PublisherSettings {
    fn default() -> Self {
        Self {
            target_branch: "Multi-Version_ros-jazzy_openEuler-24.03-LTS".to_string(),
            package_prefix: "Ros-jazzy-".to_string(),
            spec_suffix: ".spec".to_string(),
            list_path: PathBuf::from("packages_info.json"),
            per_page: 100,
            farm_config: home_dir().join(".config").join("copr"),
            project: "Jazzy_Porting".to_string(),
        }
    }
}

/// Settings for `rosport stage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagerSettings {
    /// Directory of built `.spec` files.
    pub specs_dir: PathBuf,
    /// Directory of `<name>-<version>.tar.gz` source tarballs.
    pub sources_dir: PathBuf,
    /// Directory local working copies are created in.
    pub output_dir: PathBuf,
    /// Prefix stripped from package names to form repository names.
    pub name_prefix: String,
    /// Branch pushed to the new remote repository.
    pub branch: String,
    /// Dependency name prefixes listed in generated READMEs.
    pub dependency_prefixes: Vec<String>,
}

impl Default for StagerSettings {
    fn default() -> Self {
        let home = home_dir();
        Self {
            specs_dir: home.join("SPECS"),
            sources_dir: home.join("SOURCES"),
            output_dir: home.join("gitee_repos"),
            name_prefix: "ros-jazzy-".to_string(),
            branch: "main".to_string(),
            dependency_prefixes: vec!["ros-".to_string(), "ament-".to_string()],
        }
    }
}

impl Settings {
    /// Loads settings from `.env`, the optional YAML file and the process
    /// environment.
    ///
    /// `file` wins over `ROSPORT_CONFIG` when both are given.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file is named but unreadable or invalid.
    pub fn load(file: Option<&Path>) -> Result<Self, SettingsError> {
        if let Some(problem) = dotenv_problem(&dotenvy::dotenv()) {
            log::warn!("{problem}");
        }
        let from_env = env::var_os(CONFIG_ENV).map(PathBuf::from);
        let file = file.map(Path::to_path_buf).or(from_env);
        Self::assemble(file.as_deref(), |key| env::var(key).ok())
    }

    /// Builds settings from an optional file and an environment lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or invalid.
    pub fn assemble<F>(file: Option<&Path>, lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        settings.host.token = lookup(TOKEN_ENV).filter(|v| !v.is_empty());
        if let Some(username) = lookup(USERNAME_ENV).filter(|v| !v.is_empty()) {
            settings.host.username = Some(username);
        }
        if let Some(org) = lookup(ORG_ENV).filter(|v| !v.is_empty()) {
            settings.host.org = Some(org);
        }
        if let Some(path) = lookup(COPR_CONFIG_ENV).filter(|v| !v.is_empty()) {
            settings.publisher.farm_config = PathBuf::from(path);
        }
        Ok(settings)
    }

    fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| SettingsError::Read { path: path.to_path_buf(), source })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content)
            .map_err(|source| SettingsError::Parse { path: path.to_path_buf(), source })
    }
}

/// Describes a `.env` file that exists but could not be loaded. A missing
/// file is the common case and is not reported.
fn dotenv_problem(result: &Result<PathBuf, dotenvy::Error>) -> Option<String> {
    match result {
        Err(e) if !e.not_found() => Some(format!("ignoring .env file: {e}")),
        _ => None,
    }
}

fn home_dir() -> PathBuf {
    home_or_current(dirs::home_dir())
}

/// Without a home directory the home-based defaults are anchored at the
/// absolute working directory, with a warning.
fn home_or_current(home: Option<PathBuf>) -> PathBuf {
    static WARNED: Once = Once::new();
    home.unwrap_or_else(|| {
        let current = env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        WARNED.call_once(|| {
            log::warn!(
                "no home directory found; SPECS, SOURCES, gitee_repos and .config/copr \
                 default to {}",
                current.display()
            );
        });
        current
    })
}
