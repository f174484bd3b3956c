//! In-memory implementation of the `DescriptorSource` port.
//!
//! Provides a simple, thread-safe source for unit testing without touching
//! the filesystem.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::descriptor::ports::source::{DescriptorSource, SourceError, SourceResult};

/// In-memory implementation of [`DescriptorSource`].
///
/// Thread-safe via internal [`RwLock`]. Suitable for unit tests only.
///
/// # Example
///
/// ```
/// use blueprint::descriptor::adapters::memory::InMemoryDescriptorSource;
/// use blueprint::descriptor::ports::source::DescriptorSource;
///
/// let source = InMemoryDescriptorSource::new();
/// source.insert("render.yaml", "name: seedmart-api\n").expect("lock held");
/// assert_eq!(
///     source.read("render.yaml").expect("document present"),
///     "name: seedmart-api\n"
/// );
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryDescriptorSource {
    documents: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryDescriptorSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `text` under `name`, replacing any previous document.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Unavailable`] if the internal lock is poisoned.
    pub fn insert(&self, name: impl Into<String>, text: impl Into<String>) -> SourceResult<()> {
        let mut guard = self
            .documents
            .write()
            .map_err(|e| SourceError::Unavailable(format!("lock poisoned: {e}")))?;
        guard.insert(name.into(), text.into());
        Ok(())
    }

    /// Returns the number of stored documents.
    ///
    /// Returns `0` if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns `true` if no documents are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DescriptorSource for InMemoryDescriptorSource {
    fn read(&self, name: &str) -> SourceResult<String> {
        let guard = self
            .documents
            .read()
            .map_err(|e| SourceError::Unavailable(format!("lock poisoned: {e}")))?;

        guard
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(name.to_owned()))
    }
}
