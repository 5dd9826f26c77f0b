//! In-memory port implementations shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::context::ServiceContext;
use crate::ports::{
    BuildFarm, CreatedRepo, FarmProject, FileSystem, GitClient, NewRepo, PortError, PortFuture,
    RemoteRepo, RepoOwner, RepoScope, ScmSource, ShellExecutor, ShellOutput, SourceHost,
    SubmittedPackage, WebClient,
};

/// Shared, inspectable call log.
pub type Calls = Arc<Mutex<Vec<String>>>;

pub fn calls(log: &Calls) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// In-memory filesystem for testing stages without touching disk.
#[derive(Clone, Default)]
pub struct MemFs {
    pub files: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl MemFs {
    pub fn with(files: &[(&str, &str)]) -> Self {
        let fs = Self::default();
        for (path, contents) in files {
            fs.files.lock().unwrap().insert(PathBuf::from(path), (*contents).to_string());
        }
        fs
    }

    pub fn get(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }
}

impl FileSystem for MemFs {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| PortError::Io { message: format!("not found: {}", path.display()) })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        self.files.lock().unwrap().insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        // A directory exists when any file lives under it.
        files.contains_key(path) || files.keys().any(|k| k.starts_with(path) && k != path)
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>, PortError> {
        if !self.exists(path) {
            return Err(PortError::Io { message: format!("not a directory: {}", path.display()) });
        }
        let files = self.files.lock().unwrap();
        let mut names: Vec<String> = files
            .keys()
            .filter(|k| k.parent() == Some(path))
            .filter_map(|k| k.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        Ok(names)
    }

    fn copy_into(&self, file: &Path, dest_dir: &Path) -> Result<(), PortError> {
        let contents = self.read_to_string(file)?;
        let name = file.file_name().ok_or_else(|| PortError::Io { message: "no name".into() })?;
        self.write(&dest_dir.join(name), &contents)
    }
}

/// Package manager that knows a fixed set of packages.
#[derive(Clone, Default)]
pub struct FakeDnf {
    pub available: HashSet<String>,
    pub broken: bool,
    pub calls: Calls,
}

impl FakeDnf {
    pub fn with(packages: &[&str]) -> Self {
        Self { available: packages.iter().map(|p| (*p).to_string()).collect(), ..Self::default() }
    }
}

impl ShellExecutor for FakeDnf {
    fn run(&self, program: &str, args: &[&str]) -> Result<ShellOutput, PortError> {
        self.calls.lock().unwrap().push(format!("{program} {}", args.join(" ")));
        if self.broken {
            return Err(PortError::Process { code: None, stderr: "dnf: not found".into() });
        }
        let pkg = args.last().copied().unwrap_or_default();
        if self.available.contains(pkg) {
            Ok(ShellOutput {
                exit_code: 0,
                stdout: format!("Available Packages\n{pkg}.x86_64  1.0-1  everything\n"),
                stderr: String::new(),
            })
        } else {
            Ok(ShellOutput {
                exit_code: 1,
                stdout: String::new(),
                stderr: "Error: No matching Packages to list\n".into(),
            })
        }
    }
}

/// Web client serving canned pages; unknown URLs answer 404.
#[derive(Clone, Default)]
pub struct FakeWeb {
    pub pages: HashMap<String, Result<String, PortError>>,
    pub calls: Calls,
}

impl FakeWeb {
    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    pub fn failing(mut self, url: &str, err: PortError) -> Self {
        self.pages.insert(url.to_string(), Err(err));
        self
    }
}

impl WebClient for FakeWeb {
    fn get_text<'a>(&'a self, url: &'a str) -> PortFuture<'a, String> {
        self.calls.lock().unwrap().push(url.to_string());
        let result = self
            .pages
            .get(url)
            .cloned()
            .unwrap_or(Err(PortError::Status { code: 404, body: String::new() }));
        Box::pin(async move { result })
    }
}

/// Git client that records calls and fails on request.
#[derive(Clone, Default)]
pub struct FakeGit {
    /// URLs whose pinned-branch clone fails.
    pub no_branch: HashSet<String>,
    /// URLs whose clone always fails.
    pub unreachable: HashSet<String>,
    /// Remote URLs whose push fails.
    pub push_rejects: HashSet<String>,
    pub calls: Calls,
}

impl GitClient for FakeGit {
    fn clone_repo<'a>(
        &'a self,
        url: &'a str,
        branch: Option<&'a str>,
        dest: &'a Path,
    ) -> PortFuture<'a, ()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("clone {url} {} {}", branch.unwrap_or("-"), dest.display()));
        let fails = self.unreachable.contains(url)
            || (branch.is_some() && self.no_branch.contains(url));
        Box::pin(async move {
            if fails {
                Err(PortError::Process { code: Some(128), stderr: "fatal: not found".into() })
            } else {
                Ok(())
            }
        })
    }

    fn init<'a>(&'a self, dir: &'a Path) -> PortFuture<'a, ()> {
        self.calls.lock().unwrap().push(format!("init {}", dir.display()));
        Box::pin(async { Ok(()) })
    }

    fn commit_all<'a>(&'a self, dir: &'a Path, _message: &'a str) -> PortFuture<'a, bool> {
        self.calls.lock().unwrap().push(format!("commit {}", dir.display()));
        Box::pin(async { Ok(true) })
    }

    fn push<'a>(
        &'a self,
        dir: &'a Path,
        remote_url: &'a str,
        branch: &'a str,
    ) -> PortFuture<'a, ()> {
        self.calls.lock().unwrap().push(format!("push {} {remote_url} {branch}", dir.display()));
        let rejected = self.push_rejects.contains(remote_url);
        Box::pin(async move {
            if rejected {
                Err(PortError::Process { code: Some(1), stderr: "rejected".into() })
            } else {
                Ok(())
            }
        })
    }
}

/// Builds a listed repository owned by `owner`.
pub fn repo(owner: &str, name: &str, private: bool) -> RemoteRepo {
    RemoteRepo {
        name: Some(name.to_string()),
        full_name: Some(format!("{owner}/{name}")),
        private,
        html_url: Some(format!("https://gitee.com/{owner}/{name}")),
        owner: Some(RepoOwner { login: owner.to_string() }),
    }
}

/// Source host backed by a fixed list of repositories.
#[derive(Clone, Default)]
pub struct FakeHost {
    pub repos: Vec<RemoteRepo>,
    pub list_error: Option<PortError>,
    /// `full_name`s that carry the queried branch.
    pub branches: HashSet<String>,
    /// Repository names the host refuses to create.
    pub create_rejects: HashSet<String>,
    /// `owner/repo` paths whose visibility patch fails.
    pub patch_rejects: HashSet<String>,
    pub calls: Calls,
}

impl SourceHost for FakeHost {
    fn list_repos<'a>(
        &'a self,
        scope: &'a RepoScope,
        page: u32,
        per_page: u32,
    ) -> PortFuture<'a, Vec<RemoteRepo>> {
        self.calls.lock().unwrap().push(format!("list {scope:?} {page}"));
        let result = match &self.list_error {
            Some(err) => Err(err.clone()),
            None => {
                let per_page = per_page as usize;
                let start = (page as usize - 1) * per_page;
                Ok(self.repos.iter().skip(start).take(per_page).cloned().collect())
            }
        };
        Box::pin(async move { result })
    }

    fn branch_exists<'a>(&'a self, full_name: &'a str, branch: &'a str) -> PortFuture<'a, bool> {
        self.calls.lock().unwrap().push(format!("branch {full_name} {branch}"));
        let exists = self.branches.contains(full_name);
        Box::pin(async move { Ok(exists) })
    }

    fn create_repo<'a>(&'a self, request: &'a NewRepo) -> PortFuture<'a, CreatedRepo> {
        self.calls.lock().unwrap().push(format!("create {}", request.name));
        let owner = request.org.clone().unwrap_or_else(|| "porter".to_string());
        let result = if self.create_rejects.contains(&request.name) {
            Err(PortError::Status { code: 422, body: "name already exists".into() })
        } else {
            Ok(CreatedRepo {
                full_name: format!("{owner}/{}", request.name),
                push_url: format!("git@gitee.com:{owner}/{}.git", request.name),
                html_url: format!("https://gitee.com/{owner}/{}", request.name),
            })
        };
        Box::pin(async move { result })
    }

    fn set_private<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        private: bool,
    ) -> PortFuture<'a, ()> {
        let path = format!("{owner}/{repo}");
        self.calls.lock().unwrap().push(format!("patch {path} private={private}"));
        let rejected = self.patch_rejects.contains(&path);
        Box::pin(async move {
            if rejected {
                Err(PortError::Status { code: 403, body: "forbidden".into() })
            } else {
                Ok(())
            }
        })
    }
}

/// Build farm with one project and a set of packages it rejects.
#[derive(Clone, Default)]
pub struct FakeFarm {
    pub projects: HashSet<String>,
    pub rejects: HashSet<String>,
    pub calls: Calls,
}

impl BuildFarm for FakeFarm {
    fn get_project<'a>(&'a self, owner: &'a str, project: &'a str) -> PortFuture<'a, FarmProject> {
        self.calls.lock().unwrap().push(format!("project {owner}/{project}"));
        let result = if self.projects.contains(project) {
            Ok(FarmProject { id: Some(1), name: project.to_string(), ownername: Some(owner.into()) })
        } else {
            Err(PortError::NotFound { what: format!("project {owner}/{project}") })
        };
        Box::pin(async move { result })
    }

    fn add_package<'a>(
        &'a self,
        _owner: &'a str,
        _project: &'a str,
        package: &'a str,
        source: &'a ScmSource,
    ) -> PortFuture<'a, SubmittedPackage> {
        self.calls.lock().unwrap().push(format!("add {package} {}", source.clone_url));
        let result = if self.rejects.contains(package) {
            Err(PortError::Status { code: 500, body: "backend error".into() })
        } else {
            Ok(SubmittedPackage { id: Some(99), name: package.to_string() })
        };
        Box::pin(async move { result })
    }
}

/// A context with every port panicking except those the test installs.
pub fn context() -> ServiceContext {
    ServiceContext::unconfigured()
}
