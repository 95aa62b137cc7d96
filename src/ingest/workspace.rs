//! Scoped working area for one ingestion
//!
//! Owns the uploaded file and a private temp directory for page images.
//! Everything is removed when the workspace is dropped, whatever path the
//! ingestion took out: success, error, panic, or a cancelled task.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Temp directory name prefix
const WORKDIR_PREFIX: &str = "ingest-";

pub struct IngestionWorkspace {
    upload: PathBuf,
    work_dir: PathBuf,
    dir: Option<TempDir>,
}

impl IngestionWorkspace {
    /// Take ownership of `upload` and create a work directory under `work_root`
    ///
    /// If the directory cannot be created the upload is still deleted.
    /// This touches the file system synchronously; async callers run it on
    /// the blocking pool.
    pub fn open(upload: PathBuf, work_root: &Path) -> std::io::Result<Self> {
        let mut workspace = Self {
            upload,
            work_dir: PathBuf::new(),
            dir: None,
        };

        std::fs::create_dir_all(work_root)?;
        let dir = tempfile::Builder::new()
            .prefix(WORKDIR_PREFIX)
            .tempdir_in(work_root)?;

        workspace.work_dir = dir.path().to_path_buf();
        workspace.dir = Some(dir);
        Ok(workspace)
    }

    /// The uploaded file
    pub fn upload(&self) -> &Path {
        &self.upload
    }

    /// Directory for intermediate page images
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }
}

impl Drop for IngestionWorkspace {
    fn drop(&mut self) {
        remove_file_logged(&self.upload);

        if let Some(dir) = self.dir.take() {
            if let Err(e) = dir.close() {
                tracing::warn!(
                    path = %self.work_dir.display(),
                    error = %e,
                    "Failed to remove ingestion work directory"
                );
            }
        }
    }
}

fn remove_file_logged(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed upload"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Failed to remove upload"
        ),
    }
}
