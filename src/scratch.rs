use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Guard for the transient scratch file the pipeline materializes schema
/// DDL into. Removal runs on Drop, so the file is cleaned up on every exit
/// path including render failures. Removal errors are logged and swallowed;
/// cleanup must never mask the primary result.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, contents: &str) -> io::Result<()> {
        fs::write(&self.path, contents)
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                log::warn!("failed to remove scratch file {}: {}", self.path.display(), e);
            }
        }
    }
}
