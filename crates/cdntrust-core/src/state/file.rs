// # File Range Store
//
// File-based implementation of RangeStore.
//
// ## Durability
//
// - Atomic overwrite: new document written to a .tmp sibling, then renamed
// - Backup: last good document copied to .backup before each overwrite
// - Corruption detection: JSON validation on load
// - Recovery: an unreadable main document falls back to the backup
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "prefixes": ["13.32.0.0/15", "13.35.0.0/16"],
//   "updated_at": "2026-08-05T12:00:00Z"
// }
// ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::prefix::PrefixSet;
use crate::traits::RangeStore;

/// Range file format version
/// Used for future migration if the format changes
const RANGE_FILE_VERSION: &str = "1.0";

/// Serializable range file format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct RangeFileFormat {
    version: String,
    prefixes: PrefixSet,
    updated_at: chrono::DateTime<chrono::Utc>,
}

/// File-based range store with atomic overwrite and backup recovery
///
/// The file itself is only created by the first `save`; loading a store
/// whose file does not exist yet yields the empty set.
#[derive(Debug, Clone)]
pub struct FileRangeStore {
    path: PathBuf,
}

impl FileRangeStore {
    /// Open a store at `path`, creating parent directories as needed
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::store(format!(
                    "failed to create store directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        Ok(Self { path })
    }

    /// Read and validate one document; `Ok(None)` when the file is absent
    async fn read_document(path: &Path) -> Result<Option<RangeFileFormat>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            Error::store(format!("failed to read {}: {}", path.display(), e))
        })?;

        let document: RangeFileFormat = serde_json::from_str(&content).map_err(|e| {
            Error::store(format!("failed to parse {}: {}", path.display(), e))
        })?;

        if document.version != RANGE_FILE_VERSION {
            tracing::warn!(
                "range file version mismatch: expected {}, got {}. Loading anyway.",
                RANGE_FILE_VERSION,
                document.version
            );
        }

        Ok(Some(document))
    }

    /// Load the stored set with automatic recovery
    ///
    /// Recovery strategy:
    /// 1. Try the main document
    /// 2. On a read or parse failure, try the backup
    /// 3. When both are unusable, start with the empty set
    async fn load_with_recovery(&self) -> Result<PrefixSet> {
        match Self::read_document(&self.path).await {
            Ok(Some(document)) => Ok(document.prefixes),
            Ok(None) => {
                tracing::debug!("range file does not exist: {}", self.path.display());
                Ok(PrefixSet::new())
            }
            Err(error) => {
                tracing::warn!(%error, "range file unreadable, attempting backup recovery");

                let backup_path = Self::backup_path(&self.path);
                match Self::read_document(&backup_path).await {
                    Ok(Some(document)) => {
                        tracing::info!(
                            prefixes = document.prefixes.len(),
                            "recovered range set from backup"
                        );
                        Ok(document.prefixes)
                    }
                    Ok(None) => {
                        tracing::warn!("no backup file found, starting with an empty set");
                        Ok(PrefixSet::new())
                    }
                    Err(backup_error) => {
                        tracing::error!(
                            %backup_error,
                            "backup also unreadable, starting with an empty set"
                        );
                        Ok(PrefixSet::new())
                    }
                }
            }
        }
    }

    /// Get the path of the temporary sibling used for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    /// Get the path of the backup file
    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }
}

#[async_trait]
impl RangeStore for FileRangeStore {
    async fn load(&self) -> Result<PrefixSet> {
        self.load_with_recovery().await
    }

    async fn save(&self, prefixes: &PrefixSet) -> Result<()> {
        let document = RangeFileFormat {
            version: RANGE_FILE_VERSION.to_string(),
            prefixes: prefixes.clone(),
            updated_at: chrono::Utc::now(),
        };

        let json = serde_json::to_string_pretty(&document)
            .map_err(|e| Error::store(format!("failed to serialize range set: {}", e)))?;

        // Write to the temporary sibling first
        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::store(format!(
                    "failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::store(format!(
                    "failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::store(format!(
                    "failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        // Keep a backup of the current document (if one exists)
        if self.path.exists() {
            let backup_path = Self::backup_path(&self.path);
            if let Err(e) = fs::copy(&self.path, &backup_path).await {
                tracing::warn!("failed to create backup: {}", e);
            }
        }

        // Atomic rename (temp -> actual)
        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::store(format!(
                "failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("range set written to {}", self.path.display());
        Ok(())
    }
}
