//! Adapters for the descriptor module.
//!
//! This module provides the text codec and concrete implementations of the
//! [`DescriptorSource`] port. Adapters handle all infrastructure concerns
//! while the domain remains pure.
//!
//! # Available Adapters
//!
//! - [`codec`]: YAML and JSON decoding into wire documents, and canonical
//!   encoding of validated descriptors
//! - [`memory::InMemoryDescriptorSource`]: Thread-safe in-memory source for
//!   unit testing
//! - [`filesystem::FileSystemDescriptorSource`]: Capability-scoped reads from
//!   a single directory
//!
//! [`DescriptorSource`]: crate::descriptor::ports::source::DescriptorSource

pub mod codec;
pub mod filesystem;
pub mod memory;
