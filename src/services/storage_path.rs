// src/services/storage_path.rs
//! Maps categories, generated names and stored references onto paths under
//! the upload base directory.
//!
//! All checks are lexical and happen before any filesystem call, so a
//! rejected name never causes a directory to be created or a file to be
//! opened.

use std::path::{Component, Path, PathBuf};

use super::file_storage::{Category, StorageError};

/// Turn the configured base directory into an absolute, normalized path.
pub fn normalize_base(base: &Path) -> Result<PathBuf, StorageError> {
    let absolute = if base.is_absolute() {
        base.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|source| StorageError::StorageUnavailable {
                path: base.to_path_buf(),
                source,
            })?
            .join(base)
    };

    Ok(normalize_lexically(&absolute))
}

/// Resolve `base/category/name`, creating the category directory on demand.
pub async fn resolve(base: &Path, category: Category, name: &str) -> Result<PathBuf, StorageError> {
    validate_segment(name)?;

    let dir = base.join(category.dir_name());
    let target = contained(base, &dir.join(name))?;

    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|source| StorageError::StorageUnavailable { path: dir, source })?;

    Ok(target)
}

/// Resolve a `<category>/<name>` reference without touching the filesystem.
pub fn resolve_reference(base: &Path, reference: &str) -> Result<(Category, PathBuf), StorageError> {
    let invalid = || StorageError::InvalidPath(reference.to_string());

    let (dir_name, name) = reference.split_once('/').ok_or_else(invalid)?;
    let category = Category::from_dir_name(dir_name).ok_or_else(invalid)?;
    validate_segment(name).map_err(|_| invalid())?;

    let target = contained(base, &base.join(category.dir_name()).join(name))?;
    Ok((category, target))
}

/// A single file name: no parent segments, separators or NUL bytes.
fn validate_segment(name: &str) -> Result<(), StorageError> {
    let invalid = || StorageError::InvalidPath(name.to_string());

    if name.is_empty()
        || name.contains("..")
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(invalid());
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(invalid()),
    }
}

fn contained(base: &Path, candidate: &Path) -> Result<PathBuf, StorageError> {
    let normalized = normalize_lexically(candidate);
    if normalized.starts_with(base) && normalized != base {
        Ok(normalized)
    } else {
        Err(StorageError::InvalidPath(candidate.display().to_string()))
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
