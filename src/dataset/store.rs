//! Dataset persistence
//!
//! The dataset is checkpointed to a JSON file after every page. Saves go
//! through a temp file in the target directory followed by an atomic
//! rename, so an interrupted save never leaves a truncated checkpoint for
//! the next run to trip over.

use crate::dataset::Dataset;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors that can occur while saving the dataset
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to move checkpoint into place: {0}")]
    Persist(String),
}

/// Storage collaborator for the cumulative dataset
///
/// `load` never fails: a missing or corrupt source yields an empty dataset
/// and the run starts fresh. `save` failures are reported to the caller,
/// which logs them and continues with the in-memory dataset.
pub trait DatasetStore {
    fn load(&self) -> Dataset;

    fn save(&self, dataset: &Dataset) -> Result<(), StoreError>;
}

/// JSON flat-file implementation of [`DatasetStore`]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the checkpoint lives in; also where temp files go so the
    /// final rename stays on one filesystem
    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl DatasetStore for JsonFileStore {
    fn load(&self) -> Dataset {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    "No existing dataset at {}. Starting fresh.",
                    self.path.display()
                );
                return Dataset::new();
            }
            Err(e) => {
                tracing::error!(
                    "Failed to read dataset from {}: {}. Starting fresh.",
                    self.path.display(),
                    e
                );
                return Dataset::new();
            }
        };

        match serde_json::from_str::<Dataset>(&content) {
            Ok(dataset) => {
                tracing::info!(
                    "Loaded {} entries from {}",
                    dataset.len(),
                    self.path.display()
                );
                dataset
            }
            Err(e) => {
                tracing::error!(
                    "Failed to decode dataset from {}: {}. Starting fresh.",
                    self.path.display(),
                    e
                );
                Dataset::new()
            }
        }
    }

    fn save(&self, dataset: &Dataset) -> Result<(), StoreError> {
        let directory = self.directory();
        std::fs::create_dir_all(directory)?;

        let mut file = NamedTempFile::new_in(directory)?;
        serde_json::to_writer_pretty(&mut file, dataset)?;

        file.persist(&self.path)
            .map_err(|e| StoreError::Persist(e.to_string()))?;

        tracing::debug!(
            "Saved {} entries to {}",
            dataset.len(),
            self.path.display()
        );
        Ok(())
    }
}
