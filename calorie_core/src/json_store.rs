//! File-backed durable store with file locking.
//!
//! The whole tracker lives in one JSON document. Every mutation rewrites the
//! document atomically so a crash never leaves a half-written file behind.

use crate::store::{DurableStore, ScalarKey, StoreDocument};
use crate::{Entry, EntryKind, Error, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Durable store persisted as a JSON document on disk
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    document: StoreDocument,
}

impl JsonFileStore {
    /// Open the store at `path`
    ///
    /// A missing file yields an empty store. A file that cannot be read or
    /// parsed is logged and treated as empty; it is overwritten on the next
    /// mutation.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = load_document(&path)?;
        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the in-memory document to disk
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    fn save(&self) -> Result<()> {
        let parent = self.path.parent().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "store path missing parent",
            ))
        })?;
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, &self.document)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved tracker document to {:?}", self.path);
        Ok(())
    }

    /// Apply a change to a copy of the document, save it, then adopt it
    ///
    /// If the save fails the in-memory document is left untouched.
    fn commit<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut StoreDocument),
    {
        let previous = std::mem::take(&mut self.document);
        let mut next = previous.clone();
        f(&mut next);
        self.document = next;

        if let Err(e) = self.save() {
            self.document = previous;
            return Err(e);
        }
        Ok(())
    }
}

fn load_document(path: &Path) -> Result<StoreDocument> {
    if !path.exists() {
        tracing::info!("No tracker file at {:?}, starting empty", path);
        return Ok(StoreDocument::default());
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(
                "Unable to open tracker file {:?}: {}. Starting empty.",
                path,
                e
            );
            return Ok(StoreDocument::default());
        }
    };

    if let Err(e) = file.lock_shared() {
        tracing::warn!(
            "Unable to lock tracker file {:?}: {}. Starting empty.",
            path,
            e
        );
        return Ok(StoreDocument::default());
    }

    let mut contents = String::new();
    let mut reader = std::io::BufReader::new(&file);
    if let Err(e) = reader.read_to_string(&mut contents) {
        let _ = file.unlock();
        tracing::warn!(
            "Failed to read tracker file {:?}: {}. Starting empty.",
            path,
            e
        );
        return Ok(StoreDocument::default());
    }

    file.unlock()?;

    if contents.trim().is_empty() {
        return Ok(StoreDocument::default());
    }

    match serde_json::from_str::<StoreDocument>(&contents) {
        Ok(document) => {
            tracing::debug!(
                "Loaded {} meals and {} workouts from {:?}",
                document.meals.len(),
                document.workouts.len(),
                path
            );
            Ok(document)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse tracker file {:?}: {}. Starting empty.",
                path,
                e
            );
            Ok(StoreDocument::default())
        }
    }
}

impl DurableStore for JsonFileStore {
    fn get(&self, key: ScalarKey) -> Option<i64> {
        self.document.scalar(key)
    }

    fn set(&mut self, key: ScalarKey, value: i64) -> Result<()> {
        self.commit(|doc| doc.set_scalar(key, value))?;
        tracing::debug!("Stored {} = {}", key.as_str(), value);
        Ok(())
    }

    fn collection(&self, kind: EntryKind) -> Vec<Entry> {
        self.document.entries(kind).to_vec()
    }

    fn append(&mut self, kind: EntryKind, entry: &Entry, total: i64) -> Result<()> {
        self.commit(|doc| {
            doc.entries_mut(kind).push(entry.clone());
            doc.set_scalar(ScalarKey::TotalCalories, total);
        })?;
        tracing::debug!("Appended {} {} to {}", kind, entry.id, kind.collection_name());
        Ok(())
    }

    fn remove(&mut self, kind: EntryKind, id: Uuid, total: i64) -> Result<()> {
        self.commit(|doc| {
            doc.remove_entry(kind, id);
            doc.set_scalar(ScalarKey::TotalCalories, total);
        })?;
        tracing::debug!("Removed {} {} from {}", kind, id, kind.collection_name());
        Ok(())
    }

    fn clear_all(&mut self) -> Result<()> {
        self.commit(StoreDocument::clear)?;
        tracing::info!("Cleared tracker entries in {:?}", self.path);
        Ok(())
    }
}
