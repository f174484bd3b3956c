//! Filesystem implementation of the `DescriptorSource` port.
//!
//! Reads are confined to one directory through a `cap-std` capability, so a
//! document name such as `../secrets.yaml` cannot escape it.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;
use tracing::debug;

use crate::descriptor::ports::source::{DescriptorSource, SourceError, SourceResult};

/// Reads descriptor files from a single directory.
#[derive(Debug)]
pub struct FileSystemDescriptorSource {
    root: Dir,
}

impl FileSystemDescriptorSource {
    /// Wraps an already opened directory capability.
    #[must_use]
    pub const fn new(root: Dir) -> Self {
        Self { root }
    }

    /// Opens `path` using ambient authority.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::NotFound`] when the directory does not exist
    /// and [`SourceError::Unavailable`] for other I/O failures.
    pub fn open_ambient(path: &Utf8Path) -> SourceResult<Self> {
        Dir::open_ambient_dir(path, ambient_authority())
            .map(Self::new)
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => SourceError::NotFound(path.to_string()),
                _ => SourceError::Unavailable(format!("cannot open {path}: {err}")),
            })
    }
}

impl DescriptorSource for FileSystemDescriptorSource {
    fn read(&self, name: &str) -> SourceResult<String> {
        debug!(document = name, "reading descriptor");
        self.root
            .read_to_string(name)
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => SourceError::NotFound(name.to_owned()),
                _ => SourceError::unreadable(name, err.to_string()),
            })
    }
}
