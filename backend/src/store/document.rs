//! Whole-document JSON persistence.
//!
//! Every mutation rewrites the full document through a staging file followed by a rename,
//! so readers never observe a partially written file.

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::{Mutex, MutexGuard};

use crate::errors::AppError;

/// A JSON document on disk holding a value of type `T`.
pub struct JsonDocument<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    #[cfg(test)]
    save_budget: std::sync::Mutex<Option<usize>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Open a document, creating its parent directory if needed.
    ///
    /// The file itself is not created until the first write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!(
                    "Failed to create data directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
            #[cfg(test)]
            save_budget: std::sync::Mutex::new(None),
            _marker: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current contents without taking the write lock.
    pub async fn read(&self) -> Result<T, AppError> {
        read_document(&self.path).await
    }

    /// Acquire exclusive access for a read-modify-write cycle.
    pub async fn lock(&self) -> DocumentGuard<'_, T> {
        DocumentGuard {
            document: self,
            _guard: self.write_lock.lock().await,
        }
    }

    /// Let `saves` more writes through, then fail every later one.
    #[cfg(test)]
    pub(crate) fn fail_saves_after(&self, saves: usize) {
        *self.save_budget.lock().unwrap() = Some(saves);
    }

    #[cfg(test)]
    fn spend_save_budget(&self) -> Result<(), AppError> {
        match self.save_budget.lock().unwrap().as_mut() {
            Some(0) => Err(AppError::Storage(format!(
                "Write to {} refused",
                self.path.display()
            ))),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

/// Exclusive handle on a document; held across load, mutate and save.
pub struct DocumentGuard<'a, T> {
    document: &'a JsonDocument<T>,
    _guard: MutexGuard<'a, ()>,
}

impl<T> DocumentGuard<'_, T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub async fn load(&self) -> Result<T, AppError> {
        read_document(&self.document.path).await
    }

    pub async fn save(&self, value: &T) -> Result<(), AppError> {
        #[cfg(test)]
        self.document.spend_save_budget()?;

        let path = &self.document.path;
        let bytes = serde_json::to_vec_pretty(value).map_err(|e| {
            AppError::Storage(format!("Failed to serialize {}: {}", path.display(), e))
        })?;

        let staging = staging_path(path);
        tokio::fs::write(&staging, &bytes).await.map_err(|e| {
            AppError::Storage(format!("Failed to write {}: {}", staging.display(), e))
        })?;
        tokio::fs::rename(&staging, path).await.map_err(|e| {
            AppError::Storage(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        tracing::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

/// A missing or blank file reads as the default value; anything else must parse.
async fn read_document<T>(path: &Path) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => {
            return Err(AppError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Sibling path used while writing, e.g. `stories.json.tmp`.
pub(crate) fn staging_path(path: &Path) -> PathBuf {
    match path.file_name() {
        Some(name) => {
            let mut staged = name.to_os_string();
            staged.push(".tmp");
            path.with_file_name(staged)
        }
        None => path.with_extension("tmp"),
    }
}
