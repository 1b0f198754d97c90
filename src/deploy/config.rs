use super::DeployError;
use crate::journal::DEFAULT_DATE_FORMAT;
use std::{
    fmt::{self, Display},
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// The default time after which a git command is killed.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Everything needed to deploy a repository. It is created once and never changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployConfig {
    /// The git repository. Either a bare (mirror) repository, or a clone with a working tree.
    pub directory: PathBuf,
    /// The directory to check out to. If empty or missing, the repository is pulled in place.
    pub work_dir: Option<PathBuf>,
    pub branch: String,
    pub remote: String,
    /// Discard local changes with `git reset --hard HEAD` before fetching.
    pub reset: bool,
    /// Update the submodules after the checkout.
    pub sync_submodules: bool,
    pub git_binary_path: String,
    /// The deploy log file, or `None` to disable it.
    pub log_target: Option<PathBuf>,
    /// The timestamp format of the deploy log, in the `time` crate's format description syntax.
    pub date_format: String,
    /// Kill git commands running longer than this.
    pub timeout: Option<Duration>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        DeployConfig {
            directory: PathBuf::new(),
            work_dir: None,
            branch: String::from("master"),
            remote: String::from("origin"),
            reset: false,
            sync_submodules: false,
            git_binary_path: String::from("git"),
            log_target: Some(PathBuf::from("deploy.log")),
            date_format: String::from(DEFAULT_DATE_FORMAT),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

/// How the work directory is updated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeployMode {
    /// The repository has its own working tree, run `git pull` in it.
    Pull,
    /// The repository is separate from the work directory, run `git checkout -f <branch>` into it.
    CheckoutForce,
}

impl Display for DeployMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployMode::Pull => write!(f, "pull"),
            DeployMode::CheckoutForce => write!(f, "checkout"),
        }
    }
}

/// The absolute directories and the mode derived from a configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedDirectories {
    pub git_dir: PathBuf,
    pub work_dir: PathBuf,
    pub mode: DeployMode,
}

fn canonicalize(path: &Path, name: &str) -> Result<PathBuf, DeployError> {
    fs::canonicalize(path).map_err(|err| {
        DeployError::Misconfigured(format!(
            "{name} {} does not exist ({err})",
            path.display()
        ))
    })
}

fn validate_argument(value: &str, name: &str) -> Result<(), DeployError> {
    if value.is_empty() {
        return Err(DeployError::Misconfigured(format!("{name} cannot be empty")));
    }
    if value.starts_with('-') {
        return Err(DeployError::Misconfigured(format!(
            "{name} {value:?} cannot start with a dash"
        )));
    }
    Ok(())
}

impl DeployConfig {
    /// Check the configuration and find the git and the work directory.
    ///
    /// If the work directory is missing, empty or the same as the directory, the
    /// repository is pulled in place and its git directory is `<directory>/.git`.
    /// Otherwise the directory is the git directory, which is checked out to the work directory.
    pub fn resolve(&self) -> Result<ResolvedDirectories, DeployError> {
        validate_argument(&self.branch, "branch")?;
        validate_argument(&self.remote, "remote")?;

        let directory = canonicalize(&self.directory, "directory")?;
        let work_dir = match &self.work_dir {
            Some(work_dir) if !work_dir.as_os_str().is_empty() => {
                Some(canonicalize(work_dir, "work directory")?)
            }
            _ => None,
        };

        Ok(match work_dir {
            Some(work_dir) if work_dir != directory => ResolvedDirectories {
                git_dir: directory,
                work_dir,
                mode: DeployMode::CheckoutForce,
            },
            _ => ResolvedDirectories {
                git_dir: directory.join(".git"),
                work_dir: directory,
                mode: DeployMode::Pull,
            },
        })
    }
}
