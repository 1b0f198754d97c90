use super::LogSink;
use log::debug;
use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

/// A sink appending lines to a file.
///
/// The file is created if it doesn't exist yet. On Unix it is made writable by
/// everyone, so deployments started by different users can share it.
pub struct FileSink {
    path: PathBuf,
    file: File,
}

impl FileSink {
    /// Open the file at the path for appending.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let is_new = !path.exists();

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        if is_new {
            debug!("Created deploy log {}.", path.display());
            #[cfg(unix)]
            {
                use std::{fs, os::unix::fs::PermissionsExt};
                fs::set_permissions(&path, fs::Permissions::from_mode(0o666))?;
            }
        }

        Ok(FileSink { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn append(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.file, "{line}")?;
        self.file.flush()
    }
}
