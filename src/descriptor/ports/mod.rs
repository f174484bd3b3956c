//! Port definitions for the descriptor subsystem.
//!
//! Ports are abstract trait interfaces that define how the domain interacts
//! with validation policy and with wherever descriptor text is stored.

pub mod source;
pub mod validator;

pub use source::{DescriptorSource, SourceError, SourceResult};
pub use validator::{DescriptorValidator, ValidationConfig, ValidationResult};
