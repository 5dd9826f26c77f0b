//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context as _;

use crate::adapters::live::build_farm::LiveBuildFarm;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::git::LiveGitClient;
use crate::adapters::live::shell::LiveShellExecutor;
use crate::adapters::live::source_host::LiveSourceHost;
use crate::adapters::live::web::LiveWebClient;
use crate::adapters::recording::{
    RecordingBuildFarm, RecordingGitClient, RecordingShellExecutor, RecordingSourceHost,
    RecordingWebClient,
};
use crate::adapters::replaying::{
    ReplayingBuildFarm, ReplayingGitClient, ReplayingShellExecutor, ReplayingSourceHost,
    ReplayingWebClient,
};
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{
    BuildFarm, CreatedRepo, FarmProject, FileSystem, GitClient, NewRepo, PortError, PortFuture,
    RemoteRepo, RepoScope, ScmSource, ShellExecutor, ShellOutput, SourceHost, SubmittedPackage,
    WebClient,
};
use crate::settings::{CoprCredentials, Settings};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying).
pub struct ServiceContext {
    /// Shell executor for the package-manager oracle.
    pub shell: Box<dyn ShellExecutor>,
    /// Filesystem for the durable artifacts. Always live.
    pub fs: Box<dyn FileSystem>,
    /// Git client for clones and pushes.
    pub git: Box<dyn GitClient>,
    /// Web client for the package index.
    pub web: Box<dyn WebClient>,
    /// Source-host REST client.
    pub host: Box<dyn SourceHost>,
    /// Build-farm client.
    pub farm: Box<dyn BuildFarm>,
    /// Optional cassette recorder; written to disk on drop.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

fn live_host(settings: &Settings) -> anyhow::Result<LiveSourceHost> {
    LiveSourceHost::new(&settings.host.api_base, settings.host.token.clone())
        .with_context(|| format!("invalid source-host API base {}", settings.host.api_base))
}

/// Credentials are optional here; `submit` checks them as a precondition.
fn live_farm(settings: &Settings) -> LiveBuildFarm {
    LiveBuildFarm::new(CoprCredentials::load(&settings.publisher.farm_config).ok())
}

impl ServiceContext {
    /// Creates a live context with real adapters for every port.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured source-host API base is not a URL.
    pub fn live(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self {
            shell: Box::new(LiveShellExecutor),
            fs: Box::new(LiveFileSystem),
            git: Box::new(LiveGitClient),
            web: Box::new(LiveWebClient::new()),
            host: Box::new(live_host(settings)?),
            farm: Box::new(live_farm(settings)),
            recorder: None,
        })
    }

    /// Creates a recording context that writes a cassette file on drop.
    ///
    /// Uses live adapters for actual work; every network and process port is
    /// wrapped so its calls land in the cassette at `path`. This is the
    /// mechanism behind the `ROSPORT_RECORD` env var.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured source-host API base is not a URL.
    pub fn recording(settings: &Settings, path: &Path) -> anyhow::Result<Self> {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, "rosport-session")));
        Ok(Self {
            shell: Box::new(RecordingShellExecutor::new(
                Box::new(LiveShellExecutor),
                Arc::clone(&recorder),
            )),
            fs: Box::new(LiveFileSystem),
            git: Box::new(RecordingGitClient::new(Box::new(LiveGitClient), Arc::clone(&recorder))),
            web: Box::new(RecordingWebClient::new(
                Box::new(LiveWebClient::new()),
                Arc::clone(&recorder),
            )),
            host: Box::new(RecordingSourceHost::new(
                Box::new(live_host(settings)?),
                Arc::clone(&recorder),
            )),
            farm: Box::new(RecordingBuildFarm::new(
                Box::new(live_farm(settings)),
                Arc::clone(&recorder),
            )),
            recorder: Some(recorder),
        })
    }

    /// Creates a replaying context from a cassette file.
    ///
    /// All network and process ports share one replayer, so each
    /// port/method pair is dispatched to the right interaction stream. The
    /// filesystem stays live.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read cassette file {}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse cassette file {}", path.display()))?;
        let replayer = Arc::new(Mutex::new(CassetteReplayer::new(&cassette)));

        Ok(Self {
            shell: Box::new(ReplayingShellExecutor::new(Arc::clone(&replayer))),
            fs: Box::new(LiveFileSystem),
            git: Box::new(ReplayingGitClient::new(Arc::clone(&replayer))),
            web: Box::new(ReplayingWebClient::new(Arc::clone(&replayer))),
            host: Box::new(ReplayingSourceHost::new(Arc::clone(&replayer))),
            farm: Box::new(ReplayingBuildFarm::new(replayer)),
            recorder: None,
        })
    }

    /// Creates a context whose ports all panic when called.
    ///
    /// Tests start from here and replace the ports they exercise.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            shell: Box::new(PanickingShellExecutor),
            fs: Box::new(PanickingFileSystem),
            git: Box::new(PanickingGitClient),
            web: Box::new(PanickingWebClient),
            host: Box::new(PanickingSourceHost),
            farm: Box::new(PanickingBuildFarm),
            recorder: None,
        }
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            let recorder = recorder.lock().unwrap_or_else(PoisonError::into_inner);
            match recorder.finish() {
                Ok(path) => log::info!(
                    "recorded {} interactions to {}",
                    recorder.len(),
                    path.display()
                ),
                Err(e) => log::warn!("failed to write cassette: {e}"),
            }
        }
    }
}

// --- Panicking adapters for unconfigured ports ---

struct PanickingShellExecutor;
impl ShellExecutor for PanickingShellExecutor {
    fn run(&self, program: &str, _args: &[&str]) -> Result<ShellOutput, PortError> {
        panic!("ShellExecutor port not configured; attempted to run {program}");
    }
}

struct PanickingFileSystem;
impl FileSystem for PanickingFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        panic!("FileSystem port not configured; attempted to read {}", path.display());
    }
    fn write(&self, path: &Path, _contents: &str) -> Result<(), PortError> {
        panic!("FileSystem port not configured; attempted to write {}", path.display());
    }
    fn exists(&self, path: &Path) -> bool {
        panic!("FileSystem port not configured; attempted to stat {}", path.display());
    }
    fn list_dir(&self, path: &Path) -> Result<Vec<String>, PortError> {
        panic!("FileSystem port not configured; attempted to list {}", path.display());
    }
    fn copy_into(&self, file: &Path, _dest_dir: &Path) -> Result<(), PortError> {
        panic!("FileSystem port not configured; attempted to copy {}", file.display());
    }
}

struct PanickingGitClient;
impl GitClient for PanickingGitClient {
    fn clone_repo<'a>(
        &'a self,
        url: &'a str,
        _branch: Option<&'a str>,
        _dest: &'a Path,
    ) -> PortFuture<'a, ()> {
        panic!("GitClient port not configured; attempted to clone {url}");
    }
    fn init<'a>(&'a self, dir: &'a Path) -> PortFuture<'a, ()> {
        panic!("GitClient port not configured; attempted to init {}", dir.display());
    }
    fn commit_all<'a>(&'a self, dir: &'a Path, _message: &'a str) -> PortFuture<'a, bool> {
        panic!("GitClient port not configured; attempted to commit in {}", dir.display());
    }
    fn push<'a>(
        &'a self,
        _dir: &'a Path,
        remote_url: &'a str,
        _branch: &'a str,
    ) -> PortFuture<'a, ()> {
        panic!("GitClient port not configured; attempted to push to {remote_url}");
    }
}

struct PanickingWebClient;
impl WebClient for PanickingWebClient {
    fn get_text<'a>(&'a self, url: &'a str) -> PortFuture<'a, String> {
        panic!("WebClient port not configured; attempted to fetch {url}");
    }
}

struct PanickingSourceHost;
impl SourceHost for PanickingSourceHost {
    fn list_repos<'a>(
        &'a self,
        _scope: &'a RepoScope,
        _page: u32,
        _per_page: u32,
    ) -> PortFuture<'a, Vec<RemoteRepo>> {
        panic!("SourceHost port not configured; attempted to list repositories");
    }
    fn branch_exists<'a>(&'a self, full_name: &'a str, _branch: &'a str) -> PortFuture<'a, bool> {
        panic!("SourceHost port not configured; attempted to check {full_name}");
    }
    fn create_repo<'a>(&'a self, request: &'a NewRepo) -> PortFuture<'a, CreatedRepo> {
        panic!("SourceHost port not configured; attempted to create {}", request.name);
    }
    fn set_private<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        _private: bool,
    ) -> PortFuture<'a, ()> {
        panic!("SourceHost port not configured; attempted to patch {owner}/{repo}");
    }
}

struct PanickingBuildFarm;
impl BuildFarm for PanickingBuildFarm {
    fn get_project<'a>(&'a self, owner: &'a str, project: &'a str) -> PortFuture<'a, FarmProject> {
        panic!("BuildFarm port not configured; attempted to get {owner}/{project}");
    }
    fn add_package<'a>(
        &'a self,
        _owner: &'a str,
        _project: &'a str,
        package: &'a str,
        _source: &'a ScmSource,
    ) -> PortFuture<'a, SubmittedPackage> {
        panic!("BuildFarm port not configured; attempted to add {package}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Interaction;
    use chrono::Utc;
    use serde_json::json;

    fn write_cassette(path: &Path, interactions: Vec<Interaction>) {
        let cassette = Cassette { name: "test".into(), recorded_at: Utc::now(), interactions };
        std::fs::write(path, serde_yaml::to_string(&cassette).unwrap()).unwrap();
    }

    #[tokio::test]
    async fn replaying_context_serves_every_port_from_one_cassette() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("full.cassette.yaml");
        write_cassette(
            &path,
            vec![
                Interaction {
                    seq: 0,
                    port: "shell".into(),
                    method: "run".into(),
                    input: json!({"program": "dnf", "args": ["list", "cmake"]}),
                    output: json!({"ok": {"exit_code": 0, "stdout": "cmake", "stderr": ""}}),
                },
                Interaction {
                    seq: 1,
                    port: "source_host".into(),
                    method: "branch_exists".into(),
                    input: json!({"full_name": "porter/urg_c", "branch": "main"}),
                    output: json!({"ok": true}),
                },
            ],
        );

        let ctx = ServiceContext::replaying(&path).unwrap();
        assert!(ctx.shell.run("dnf", &["list", "cmake"]).unwrap().success());
        assert!(ctx.host.branch_exists("porter/urg_c", "main").await.unwrap());
    }

    #[test]
    fn replaying_missing_cassette_is_an_error() {
        let err = ServiceContext::replaying(Path::new("/nonexistent/c.yaml")).err().unwrap();
        assert!(err.to_string().contains("failed to read cassette"));
    }

    #[test]
    fn recording_context_writes_cassette_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("session.yaml");
        {
            let ctx = ServiceContext::recording(&Settings::default(), &path).unwrap();
            ctx.shell.run("echo", &["recorded"]).unwrap();
        }
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("recorded"));
        assert!(content.contains("rosport-session"));
    }

    #[test]
    #[should_panic(expected = "not configured")]
    fn unconfigured_port_panics_with_clear_message() {
        let ctx = ServiceContext::unconfigured();
        let _ = ctx.shell.run("dnf", &["list", "x"]);
    }
}
