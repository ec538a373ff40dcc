//! In-memory document store for tests and storage-less contexts.

use anyhow::Result;
use std::sync::Mutex;

use super::traits::DocumentStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    contents: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl DocumentStore for MemoryStore {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.contents.lock().unwrap().clone())
    }

    fn write(&self, contents: &str) -> Result<()> {
        *self.contents.lock().unwrap() = Some(contents.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        *self.contents.lock().unwrap() = None;
        Ok(())
    }
}
