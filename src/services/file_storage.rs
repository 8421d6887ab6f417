// src/services/file_storage.rs
//! Local filesystem storage for uploaded resumes and photos
//!
//! Files live at `<base>/<category>/<uuid>.<ext>`. The relative part of that
//! path is the stored reference that profiles keep; nothing else indexes the
//! directory.

use serde::Serialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::storage_path::{normalize_base, resolve, resolve_reference};
use super::upload_validation::validate_extension;


#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid file name")]
    MissingFilename,

    #[error("Invalid file type. Allowed types: {}", .allowed.join(", "))]
    UnsupportedType { allowed: &'static [&'static str] },

    #[error("Please select a file to upload")]
    EmptyUpload,

    /// The upload body failed mid-stream. Readers report these as
    /// `InvalidData` so they stay apart from disk failures.
    #[error("Upload could not be read: {0}")]
    UploadRead(io::Error),

    #[error("Invalid path sequence: {0}")]
    InvalidPath(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Storage directory unavailable at {}: {source}", .path.display())]
    StorageUnavailable { path: PathBuf, source: io::Error },

    #[error("I/O failure on {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// The two upload kinds, each with its own subdirectory and allow-list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Resumes,
    Photos,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Resumes, Category::Photos];

    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Resumes => "resumes",
            Category::Photos => "photos",
        }
    }

    pub fn allowed_extensions(self) -> &'static [&'static str] {
        match self {
            Category::Resumes => &["pdf", "doc", "docx"],
            Category::Photos => &["jpg", "jpeg", "png", "gif"],
        }
    }

    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.dir_name() == name)
    }
}

/// Relative reference to a stored file, `<category>/<uuid>.<ext>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFileRef(String);

impl StoredFileRef {
    fn new(category: Category, file_name: &str) -> Self {
        Self(format!("{}/{}", category.dir_name(), file_name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StoredFileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opened stored file, ready to be streamed
#[derive(Debug)]
pub struct StoredFile {
    pub file: File,
    pub size: u64,
}

/// Result of a best-effort delete. Callers are free to ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub ok: bool,
    pub error: Option<String>,
}

impl DeleteOutcome {
    fn succeeded() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    fn failed(error: impl ToString) -> Self {
        Self {
            ok: false,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageListing {
    pub upload_dir: String,
    pub exists: bool,
    pub entries: Vec<ListingEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub children: Vec<String>,
}

#[derive(Debug)]
pub struct FileStorageService {
    base_dir: PathBuf,
}

impl FileStorageService {
    /// Create the service, making sure the base directory exists.
    pub async fn new(upload_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_dir = normalize_base(upload_dir.as_ref())?;

        tokio::fs::create_dir_all(&base_dir).await.map_err(|source| {
            error!(
                error = %source,
                upload_dir = %base_dir.display(),
                "Could not create the upload directory"
            );
            StorageError::StorageUnavailable {
                path: base_dir.clone(),
                source,
            }
        })?;

        info!(upload_dir = %base_dir.display(), "File storage directory ready");

        Ok(Self { base_dir })
    }

    #[cfg(test)]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Validate, name and write an upload. Nothing is written when the
    /// extension is rejected.
    pub async fn store<R>(
        &self,
        reader: &mut R,
        category: Category,
        original_filename: Option<&str>,
    ) -> Result<StoredFileRef, StorageError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let extension = validate_extension(original_filename, category.allowed_extensions())?;
        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = resolve(&self.base_dir, category, &file_name).await?;

        match write_stream(reader, &path).await {
            Ok(0) => {
                remove_partial(&path).await;
                Err(StorageError::EmptyUpload)
            }
            Ok(bytes) => {
                let reference = StoredFileRef::new(category, &file_name);
                info!(
                    reference = %reference,
                    bytes = bytes,
                    "File stored successfully"
                );
                Ok(reference)
            }
            Err(e) => {
                if let StorageError::Io { source, .. } = &e {
                    error!(
                        error = %source,
                        path = %path.display(),
                        original_filename = ?original_filename,
                        "Could not store file"
                    );
                }
                remove_partial(&path).await;
                Err(e)
            }
        }
    }

    /// Open the file behind a stored reference.
    pub async fn load(&self, reference: &str) -> Result<StoredFile, StorageError> {
        let (_, path) = resolve_reference(&self.base_dir, reference)?;
        let not_found = || StorageError::NotFound(reference.to_string());

        let file = File::open(&path).await.map_err(|e| {
            debug!(error = %e, path = %path.display(), "Stored file not readable");
            not_found()
        })?;

        let metadata = file.metadata().await.map_err(|_| not_found())?;
        if !metadata.is_file() {
            return Err(not_found());
        }

        Ok(StoredFile {
            file,
            size: metadata.len(),
        })
    }

    /// Remove the file behind a reference. A missing file counts as deleted.
    /// Failures are logged and reported in the outcome, never returned as
    /// errors.
    pub async fn delete(&self, reference: &str) -> DeleteOutcome {
        let path = match resolve_reference(&self.base_dir, reference) {
            Ok((_, path)) => path,
            Err(e) => {
                warn!(error = %e, reference = %reference, "Refusing to delete file");
                return DeleteOutcome::failed(e);
            }
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "File deleted successfully");
                DeleteOutcome::succeeded()
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "File already absent");
                DeleteOutcome::succeeded()
            }
            Err(e) => {
                error!(error = %e, reference = %reference, "Could not delete file");
                DeleteOutcome::failed(e)
            }
        }
    }

    /// Enumerate the base directory and one level below it.
    pub async fn list_contents(&self) -> StorageListing {
        let mut listing = StorageListing {
            upload_dir: self.base_dir.display().to_string(),
            exists: self.base_dir.is_dir(),
            entries: Vec::new(),
        };

        let Ok(mut entries) = tokio::fs::read_dir(&self.base_dir).await else {
            return listing;
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);

            let children = if is_dir {
                list_names(&entry.path()).await
            } else {
                Vec::new()
            };

            listing.entries.push(ListingEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                is_dir,
                children,
            });
        }

        listing.entries.sort_by(|a, b| a.name.cmp(&b.name));
        listing
    }
}

async fn write_stream<R>(reader: &mut R, path: &Path) -> Result<u64, StorageError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let io_err = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };

    // File::create truncates, so a colliding name is overwritten.
    let mut file = File::create(path).await.map_err(io_err)?;

    let written = tokio::io::copy(reader, &mut file).await.map_err(|e| {
        if e.kind() == io::ErrorKind::InvalidData {
            StorageError::UploadRead(e)
        } else {
            io_err(e)
        }
    })?;

    file.flush().await.map_err(io_err)?;
    Ok(written)
}

async fn remove_partial(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(error = %e, path = %path.display(), "Could not remove partial upload");
        }
    }
}

async fn list_names(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();
    if let Ok(mut entries) = tokio::fs::read_dir(dir).await {
        while let Ok(Some(entry)) = entries.next_entry().await {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    names.sort();
    names
}
