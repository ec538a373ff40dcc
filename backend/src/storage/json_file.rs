//! Durable JSON file backend.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use super::traits::DocumentStore;

const DOCUMENT_FILE: &str = "meal_plans.json";

/// Stores the meal-plan document as `meal_plans.json` under a base
/// directory. Writes go through a temp file and rename so a crash mid-write
/// never leaves a half-written document behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create the store, creating the base directory if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        if !base_dir.exists() {
            fs::create_dir_all(base_dir)?;
        }
        Ok(JsonFileStore {
            path: base_dir.join(DOCUMENT_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for JsonFileStore {
    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    fn write(&self, contents: &str) -> Result<()> {
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
