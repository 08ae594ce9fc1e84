//! Directory-backed storage.
//!
//! Serves a single directory as the file store:
//! - Virtual paths are confined to the root (lexical `..` and symlinks)
//! - An in-process lock registry reports contended paths as locked
//! - Read-only files are not updatable
//! - MIME types are guessed from the file extension

use std::collections::HashSet;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::debug;

use super::View;
use crate::error::{ConfigError, StorageError};

const DIRECTORY_MIME: &str = "httpd/unix-directory";

type LockSet = Arc<Mutex<HashSet<String>>>;

/// A [`View`] over a local directory.
#[derive(Debug, Clone)]
pub struct LocalView {
    root: PathBuf,
    locks: LockSet,
}

/// Exclusive lock on one path, released on drop.
#[derive(Debug)]
pub struct PathLock {
    locks: LockSet,
    key: String,
}

impl Drop for PathLock {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.remove(&self.key);
    }
}

/// A virtual path mapped into the root.
///
/// `key` is the canonical location relative to the root, so every alias of a
/// file (symlinks included) shares one lock.
struct Resolved {
    full: PathBuf,
    key: String,
    display: String,
}

/// Normalize a virtual path lexically into its components.
///
/// Returns `None` if a `..` climbs above the root.
fn normalize_virtual(path: &str) -> Option<Vec<String>> {
    let mut parts = Vec::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    Some(parts)
}

/// Canonicalize the nearest existing ancestor of `path`, then re-append the
/// components that do not exist yet.
async fn canonicalize_existing(path: &Path) -> PathBuf {
    let mut ancestor = path;
    let mut tail: Vec<&OsStr> = Vec::new();
    loop {
        if let Ok(canonical) = fs::canonicalize(ancestor).await {
            return tail
                .into_iter()
                .rev()
                .fold(canonical, |acc, part| acc.join(part));
        }
        match (ancestor.parent(), ancestor.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name);
                ancestor = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}

fn escapes_root() -> StorageError {
    StorageError::Forbidden {
        reason: "Path escapes storage root".to_string(),
        retry: false,
    }
}

impl LocalView {
    /// Serve `root`, which must be an existing directory.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let root = root.as_ref();
        let invalid = || ConfigError::InvalidRoot(root.display().to_string());

        let canonical = fs::canonicalize(root).await.map_err(|_| invalid())?;
        let is_dir = fs::metadata(&canonical)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(invalid());
        }

        Ok(Self {
            root: canonical,
            locks: Arc::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Hold an exclusive lock on `path` until the returned guard is dropped.
    ///
    /// While held, reads and writes of the path fail with
    /// [`StorageError::Locked`].
    pub async fn lock(&self, path: &str) -> Result<PathLock, StorageError> {
        let resolved = self.resolve(path).await?;
        self.acquire(&resolved)
    }

    fn lock_set(&self) -> MutexGuard<'_, HashSet<String>> {
        self.locks.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn acquire(&self, resolved: &Resolved) -> Result<PathLock, StorageError> {
        if !self.lock_set().insert(resolved.key.clone()) {
            return Err(StorageError::Locked {
                path: resolved.display.clone(),
            });
        }
        Ok(PathLock {
            locks: Arc::clone(&self.locks),
            key: resolved.key.clone(),
        })
    }

    fn ensure_unlocked(&self, resolved: &Resolved) -> Result<(), StorageError> {
        if self.lock_set().contains(&resolved.key) {
            return Err(StorageError::Locked {
                path: resolved.display.clone(),
            });
        }
        Ok(())
    }

    async fn resolve(&self, path: &str) -> Result<Resolved, StorageError> {
        let parts = normalize_virtual(path).ok_or_else(escapes_root)?;
        let full = parts.iter().fold(self.root.clone(), |acc, p| acc.join(p));

        // Lexically inside the root, but a symlink may still lead out of it.
        let canonical = canonicalize_existing(&full).await;
        let Ok(relative) = canonical.strip_prefix(&self.root) else {
            return Err(escapes_root());
        };

        Ok(Resolved {
            key: relative.to_string_lossy().into_owned(),
            display: format!("/{}", parts.join("/")),
            full,
        })
    }
}

#[async_trait]
impl View for LocalView {
    async fn size(&self, path: &str) -> Result<u64, StorageError> {
        let resolved = self.resolve(path).await?;
        self.ensure_unlocked(&resolved)?;

        match fs::metadata(&resolved.full).await {
            Ok(meta) if meta.is_file() => Ok(meta.len()),
            Ok(_) => Ok(0),
            // Missing files are reported by the read.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    async fn read(&self, path: &str) -> Result<Option<String>, StorageError> {
        let resolved = self.resolve(path).await?;
        self.ensure_unlocked(&resolved)?;

        let bytes = match fs::read(&resolved.full).await {
            Ok(bytes) => bytes,
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::NotFound | ErrorKind::PermissionDenied | ErrorKind::IsADirectory
                ) =>
            {
                debug!(path = %resolved.display, error = %e, "File not readable");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| StorageError::Hint {
                message: format!("{} is not valid UTF-8", resolved.display),
                hint: "The file is not valid UTF-8 text.".to_string(),
            })
    }

    async fn write(&self, path: &str, contents: &str) -> Result<(), StorageError> {
        let resolved = self.resolve(path).await?;
        let _lock = self.acquire(&resolved)?;

        match fs::write(&resolved.full, contents).await {
            Ok(()) => {
                debug!(path = %resolved.display, bytes = contents.len(), "Wrote file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => Err(StorageError::Forbidden {
                reason: "Permission denied".to_string(),
                retry: false,
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn modified_time(&self, path: &str) -> Result<i64, StorageError> {
        let resolved = self.resolve(path).await?;

        let meta = match fs::metadata(&resolved.full).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound {
                    path: resolved.display,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let modified: DateTime<Utc> = meta.modified()?.into();
        Ok(modified.timestamp())
    }

    async fn is_updatable(&self, path: &str) -> Result<bool, StorageError> {
        let resolved = self.resolve(path).await?;

        match fs::metadata(&resolved.full).await {
            Ok(meta) => Ok(meta.is_file() && !meta.permissions().readonly()),
            // Saving only replaces existing files.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn mime_type(&self, path: &str) -> Result<String, StorageError> {
        let resolved = self.resolve(path).await?;

        if fs::metadata(&resolved.full)
            .await
            .is_ok_and(|meta| meta.is_dir())
        {
            return Ok(DIRECTORY_MIME.to_string());
        }

        Ok(mime_guess::from_path(&resolved.full)
            .first_or_octet_stream()
            .to_string())
    }
}
