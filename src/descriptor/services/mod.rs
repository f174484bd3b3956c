//! Application services for descriptor loading.

mod loader;

pub use loader::{DescriptorError, DescriptorLoader, DescriptorResult};
