use super::DeployError;
use fs2::FileExt;
use log::{debug, info};
use std::{
    env,
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
};

/// An exclusive lock for deploying a repository, released when dropped.
///
/// The lock is a file in the temporary directory named after the git directory, so
/// two processes deploying the same repository wait for each other.
#[derive(Debug)]
pub struct DeployLock {
    file: File,
    path: PathBuf,
}

/// The path of the lock file for the git directory.
pub fn lock_path(git_dir: &Path) -> PathBuf {
    let name: String = git_dir
        .to_string_lossy()
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect();
    env::temp_dir().join(format!("deploy-hook-{name}.lock"))
}

impl DeployLock {
    /// Take the lock for the git directory, waiting if another deployment holds it.
    pub fn acquire(git_dir: &Path) -> Result<Self, DeployError> {
        let path = lock_path(git_dir);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|err| DeployError::LockFailed(path.display().to_string(), err))?;

        if file.try_lock_exclusive().is_err() {
            info!(
                "Another deployment is running on {}, waiting for it to finish.",
                git_dir.display()
            );
            file.lock_exclusive()
                .map_err(|err| DeployError::LockFailed(path.display().to_string(), err))?;
        }
        debug!("Acquired lock {}.", path.display());

        Ok(DeployLock { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DeployLock {
    fn drop(&mut self) {
        if self.file.unlock().is_ok() {
            debug!("Released lock {}.", self.path.display());
        }
    }
}
