//! Load and save handlers for the text editor.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::model::{LoadedFile, OperationResult, Payload, SavedFile};
use crate::config::MAX_LOAD_SIZE;
use crate::error::{EditError, StorageError};
use crate::storage::View;

/// Opens files for editing and saves them back through a [`View`].
pub struct FileEditController {
    view: Arc<dyn View>,
}

impl FileEditController {
    pub fn new(view: Arc<dyn View>) -> Self {
        Self { view }
    }

    /// Load `directory/filename` for editing.
    pub async fn load(&self, directory: &str, filename: &str) -> OperationResult {
        match self.try_load(directory, filename).await {
            Ok(file) => OperationResult::ok(Payload::Loaded(file)),
            Err(err) => reject(err),
        }
    }

    /// Save `contents` to `path` if it is unchanged since `mtime`.
    pub async fn save(&self, path: &str, contents: &str, mtime: Option<i64>) -> OperationResult {
        match self.try_save(path, contents, mtime).await {
            Ok(saved) => OperationResult::ok(Payload::Saved(saved)),
            Err(err) => reject(err),
        }
    }

    async fn try_load(&self, directory: &str, filename: &str) -> Result<LoadedFile, EditError> {
        if filename.is_empty() {
            return Err(EditError::InvalidPath);
        }
        let path = format!("{}/{}", directory.trim_end_matches('/'), filename);

        let size = self.view.size(&path).await?;
        if size > MAX_LOAD_SIZE {
            warn!(path = %path, size, limit = MAX_LOAD_SIZE, "File too big to open");
            return Err(EditError::TooBig {
                size,
                limit: MAX_LOAD_SIZE,
            });
        }

        let Some(filecontents) = self.view.read(&path).await? else {
            warn!(path = %path, "Cannot read file");
            return Err(EditError::Unreadable);
        };

        Ok(LoadedFile {
            filecontents,
            writeable: self.view.is_updatable(&path).await?,
            mime: self.view.mime_type(&path).await?,
            mtime: self.view.modified_time(&path).await?,
        })
    }

    async fn try_save(
        &self,
        path: &str,
        contents: &str,
        mtime: Option<i64>,
    ) -> Result<SavedFile, EditError> {
        if path.is_empty() {
            warn!("No file path supplied");
            return Err(EditError::PathNotSupplied);
        }
        let expected = match mtime {
            Some(mtime) if mtime > 0 => mtime,
            _ => {
                warn!(path, "No file mtime supplied");
                return Err(EditError::MtimeNotSupplied);
            }
        };

        let current = self.view.modified_time(path).await?;
        if current != expected {
            warn!(path, expected, current, "File modified since opening");
            return Err(EditError::ModifiedSinceOpening { expected, current });
        }

        if !self.view.is_updatable(path).await? {
            warn!(path, "User does not have permission to write to file");
            return Err(EditError::InsufficientPermissions);
        }

        self.view.write(path, contents).await?;

        let saved = SavedFile {
            mtime: self.view.modified_time(path).await?,
            size: contents.len() as u64,
        };
        info!(path, size = saved.size, mtime = saved.mtime, "File saved");
        Ok(saved)
    }
}

/// Turn a failure into a 400 response, logging storage faults.
fn reject(err: EditError) -> OperationResult {
    if let EditError::Storage(ref storage) = err {
        match storage {
            StorageError::Hint { .. } | StorageError::Forbidden { .. } | StorageError::Locked { .. } => {
                warn!(error = %storage, "Storage refused request")
            }
            _ => error!(error = %storage, "Storage failure"),
        }
    }
    OperationResult::bad_request(err.user_message())
}
