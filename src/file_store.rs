//! Flat directory of uploaded archives and preview images.
//!
//! Stored names are `<token>_<sanitized original>` (previews get a `preview_`
//! prefix). The token is a fresh UUID, and files are opened with
//! `create_new`, so two uploads can never land on the same path.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Bytes;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FileStoreError {
    #[error("Invalid file name: {0:?}")]
    InvalidName(String),
    #[error("File type not allowed: {0}")]
    DisallowedExtension(String),
    #[error("File store I/O error on {name}: {message}")]
    Io { name: String, message: String },
}

impl FileStoreError {
    fn io(name: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            name: name.into(),
            message: err.to_string(),
        }
    }
}

/// A file received from a client, before it is stored.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Archive,
    Preview,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    allowed_extensions: Arc<HashSet<String>>,
}

impl FileStore {
    /// Opens the store, creating the directory if needed.
    pub async fn open(
        root: impl Into<PathBuf>,
        allowed_extensions: impl IntoIterator<Item = String>,
    ) -> Result<Self, FileStoreError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| FileStoreError::io(root.display().to_string(), e))?;

        let allowed_extensions = allowed_extensions
            .into_iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        Ok(Self {
            root,
            allowed_extensions: Arc::new(allowed_extensions),
        })
    }

    /// Persists an upload under a freshly generated name and returns that name.
    #[instrument(skip(self, upload), fields(original = %upload.file_name))]
    pub async fn save(&self, upload: &Upload, kind: UploadKind) -> Result<String, FileStoreError> {
        let sanitized = sanitize_file_name(&upload.file_name);
        if sanitized.is_empty() {
            return Err(FileStoreError::InvalidName(upload.file_name.clone()));
        }
        self.check_extension(&sanitized)?;

        let token = Uuid::new_v4().simple();
        let stored = match kind {
            UploadKind::Archive => format!("{token}_{sanitized}"),
            UploadKind::Preview => format!("preview_{token}_{sanitized}"),
        };

        let path = self.root.join(&stored);
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| FileStoreError::io(&stored, e))?;
        fill_or_remove(file, &path, &upload.bytes)
            .await
            .map_err(|e| FileStoreError::io(&stored, e))?;

        debug!(stored = %stored, bytes = upload.bytes.len(), "Upload stored");
        Ok(stored)
    }

    /// Reads a stored file. A missing file is `Ok(None)`, not an error.
    pub async fn read(&self, stored: &str) -> Result<Option<Vec<u8>>, FileStoreError> {
        let path = self.resolve(stored)?;
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FileStoreError::io(stored, e)),
        }
    }

    /// Removes a stored file if it is there. Returns whether anything was removed.
    #[instrument(skip(self))]
    pub async fn remove_if_exists(&self, stored: &str) -> Result<bool, FileStoreError> {
        let path = self.resolve(stored)?;
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(FileStoreError::io(stored, e)),
        }
    }

    fn check_extension(&self, name: &str) -> Result<(), FileStoreError> {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        if self.allowed_extensions.contains(&ext) {
            Ok(())
        } else {
            Err(FileStoreError::DisallowedExtension(name.to_string()))
        }
    }

    /// Stored names are flat; anything that would escape the directory is refused.
    fn resolve(&self, stored: &str) -> Result<PathBuf, FileStoreError> {
        if stored.is_empty() || sanitize_file_name(stored) != stored {
            return Err(FileStoreError::InvalidName(stored.to_string()));
        }
        Ok(self.root.join(stored))
    }
}

/// Reduces a client-supplied file name to a safe, flat name.
///
/// Keeps ASCII alphanumerics and `.-_`, turns whitespace into `_`, drops
/// everything else and any leading dots.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

/// Writes `bytes` into a freshly created file. On failure the partial file
/// is removed so no truncated upload is left behind.
async fn fill_or_remove(mut file: fs::File, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let written = match file.write_all(bytes).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };
    if written.is_err() {
        drop(file);
        if let Err(e) = fs::remove_file(path).await {
            warn!(path = %path.display(), error = %e, "Could not remove partial upload");
        }
    }
    written
}
