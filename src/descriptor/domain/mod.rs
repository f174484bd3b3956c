//! Descriptor domain types.
//!
//! Typed values are only constructible in valid states; the wire documents
//! in [`document`] are the unvalidated counterpart read from and written to
//! text.

mod blueprint;
mod descriptor;
pub mod document;
mod env_var;
mod error;
mod field_path;
mod kinds;
mod values;

pub use blueprint::{Blueprint, DatabaseDescriptor};
pub use descriptor::{Fingerprint, ServiceDescriptor, ServiceDescriptorBuilder};
pub use document::{
    BlueprintDocument, BranchDocument, DatabaseDocument, DatabaseReferenceDocument,
    EnvVarDocument, ExtraFields, ServiceDocument,
};
pub use env_var::{DatabaseReference, EnvVar, EnvVarKey, EnvVarSource, EnvVars, PORT_VARIABLE};
pub use error::DescriptorDomainError;
pub use field_path::FieldPath;
pub use kinds::{DatabaseProperty, Plan, Region, Runtime, ServiceType};
pub use values::{BranchName, BranchSetting, HealthCheckPath, Port, ResourceName, ShellCommand};
