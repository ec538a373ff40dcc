//! Storage abstraction the repository is injected with.

use anyhow::Result;

/// A backend holding the single serialized meal-plan document under the
/// crate's fixed collection key. Implementations must be safe to share
/// across threads; the repository layers all policy on top, so backends
/// just move bytes and report failures as errors.
pub trait DocumentStore: Send + Sync {
    /// Read the document. `Ok(None)` when nothing has been stored yet.
    fn read(&self) -> Result<Option<String>>;

    /// Replace the document.
    fn write(&self, contents: &str) -> Result<()>;

    /// Remove the document entirely. Removing an absent document is not an
    /// error.
    fn remove(&self) -> Result<()>;
}
