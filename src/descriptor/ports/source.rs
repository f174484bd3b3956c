//! Source port for raw descriptor text.
//!
//! A source maps a document name, such as `render.yaml`, to its text. The
//! loader service decodes and validates whatever the source returns.

use thiserror::Error;

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Port for reading raw descriptor text.
#[cfg_attr(test, mockall::automock)]
pub trait DescriptorSource: Send + Sync {
    /// Reads the document called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::NotFound`] when no such document exists and
    /// [`SourceError::Unreadable`] when it exists but cannot be read.
    fn read(&self, name: &str) -> SourceResult<String>;
}

/// Errors for source operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// No document has the requested name.
    #[error("descriptor not found: {0}")]
    NotFound(String),

    /// The document exists but could not be read.
    #[error("failed to read descriptor {name}: {reason}")]
    Unreadable {
        /// The requested document.
        name: String,
        /// Description of the failure.
        reason: String,
    },

    /// General storage or adapter failure.
    #[error("descriptor source unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    /// Creates an unreadable-document error.
    #[must_use]
    pub fn unreadable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unreadable {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
