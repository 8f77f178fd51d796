//! Filesystem storage for DICOM binaries.
//!
//! Rows in `dicom_files` record a path relative to the configured storage
//! root; this type owns the resolution against that root.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct DicomStorage {
    root: PathBuf,
}

impl DicomStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a stored relative path against the storage root.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write a binary under the root, creating parent directories.
    pub async fn save(&self, relative: &str, bytes: &[u8]) -> Result<(), ApiError> {
        let path = self.resolve(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("create DICOM storage directory")?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .context("write DICOM file")?;
        Ok(())
    }

    /// Read a stored binary. Returns `None` when the file is missing.
    pub async fn load(&self, relative: &str) -> Result<Option<Vec<u8>>, ApiError> {
        match tokio::fs::read(self.resolve(relative)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context("read DICOM file").into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
