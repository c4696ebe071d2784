//! File-backed name registry.
//!
//! The whole registry is one JSON document mapping names to
//! [`NameRecord`]s. Every change rewrites the document through a temporary
//! sibling file that is renamed into place, so a crash never leaves a
//! half-written registry behind. File access runs on tokio's blocking pool.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dlog_types::ContentRef;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{NameError, NameResult};
use crate::names::validate_name;
use crate::traits::NameRegistry;
use crate::types::{claim, repoint, NameRecord, NameTable};

/// A [`NameRegistry`] persisted to a single JSON file.
///
/// Updates from this process are serialized; separate processes sharing the
/// file are not coordinated.
#[derive(Debug)]
pub struct FileRegistry {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileRegistry {
    /// Use the registry document at `path`. The file is created on first
    /// write; its parent directory must exist.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run blocking file work on the blocking pool.
    async fn blocking<T, F>(&self, work: F) -> NameResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> NameResult<T> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || work(&path))
            .await
            .map_err(|e| NameError::Unavailable(format!("registry task failed: {e}")))?
    }

    async fn update<F>(&self, apply: F) -> NameResult<NameRecord>
    where
        F: FnOnce(&mut NameTable) -> NameResult<NameRecord> + Send,
    {
        let _guard = self.lock.lock().await;
        let mut table = self.blocking(load_table).await?;
        let record = apply(&mut table)?;
        self.blocking(move |path| store_table(path, &table)).await?;
        Ok(record)
    }
}

fn load_table(path: &Path) -> NameResult<NameTable> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(NameTable::new()),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_slice(&bytes).map_err(|e| NameError::Serialization(e.to_string()))
}

fn store_table(path: &Path, table: &NameTable) -> NameResult<()> {
    let json =
        serde_json::to_vec_pretty(table).map_err(|e| NameError::Serialization(e.to_string()))?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&json)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl NameRegistry for FileRegistry {
    async fn register(&self, name: &str, target: ContentRef) -> NameResult<NameRecord> {
        let record = self.update(|table| claim(table, name, target)).await?;
        debug!(author = name, target = %target.short_hex(), path = ?self.path, "name registered");
        Ok(record)
    }

    async fn publish(&self, name: &str, target: ContentRef) -> NameResult<NameRecord> {
        let record = self.update(|table| repoint(table, name, target)).await?;
        debug!(author = name, target = %target.short_hex(), path = ?self.path, "name published");
        Ok(record)
    }

    async fn resolve(&self, name: &str) -> NameResult<Option<NameRecord>> {
        validate_name(name)?;
        let _guard = self.lock.lock().await;
        Ok(self.blocking(load_table).await?.get(name).copied())
    }

    async fn names(&self) -> NameResult<Vec<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.blocking(load_table).await?.into_keys().collect())
    }
}
