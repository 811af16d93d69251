//! Directory-backed metadata cache.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{CachedMetadata, MetadataCache};
use crate::error::{CatalogError, CatalogResult};

/// Stores each cache entry as `<dir>/<id>.json`.
#[derive(Debug, Clone)]
pub struct FileMetadataCache {
    dir: PathBuf,
}

impl FileMetadataCache {
    /// Creates a cache rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> CatalogResult<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CatalogError::InvalidKey { key: id.to_string() });
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }
}

impl MetadataCache for FileMetadataCache {
    fn find(&self, id: &str) -> CatalogResult<Option<CachedMetadata>> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path).map_err(|e| CatalogError::io_error(&path, e))?;
        let reader = BufReader::new(file);
        let entry: CachedMetadata =
            serde_json::from_reader(reader).map_err(|e| CatalogError::corrupt(id, e.to_string()))?;
        Ok(Some(entry))
    }

    fn save(&self, entry: &CachedMetadata) -> CatalogResult<()> {
        let path = self.path_for(&entry.id)?;
        fs::create_dir_all(&self.dir).map_err(|e| CatalogError::io_error(&self.dir, e))?;

        let file = File::create(&path).map_err(|e| CatalogError::io_error(&path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, entry)
            .map_err(|e| CatalogError::SerializationError(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| CatalogError::io_error(&path, e))?;

        tracing::debug!(key = %entry.id, path = %path.display(), "metadata cache entry written");
        Ok(())
    }
}
