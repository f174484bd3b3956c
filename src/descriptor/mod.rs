//! Service descriptor parsing, validation and serialization.
//!
//! A service descriptor is the declarative record a hosting platform reads
//! at deploy time: service type, runtime, build and start commands,
//! environment variables, health check path, plan, branches and region.
//! This module turns raw structured text into a typed
//! [`domain::ServiceDescriptor`], rejecting malformed input with a
//! [`error::SchemaViolation`] that names every offending field.
//!
//! # Architecture
//!
//! - **Domain**: Typed values ([`domain::ServiceDescriptor`], [`domain::Plan`],
//!   [`domain::Region`], etc.) and the unvalidated wire documents
//!   ([`domain::ServiceDocument`], [`domain::BlueprintDocument`])
//! - **Ports**: Abstract seams ([`ports::validator::DescriptorValidator`],
//!   [`ports::source::DescriptorSource`])
//! - **Adapters**: YAML/JSON codec, in-memory and filesystem sources
//! - **Validation**: Individual rules and the composite validator
//! - **Services**: [`services::DescriptorLoader`], which ties a source, the
//!   codec and a validator together
//!
//! # Example
//!
//! ```
//! use blueprint::descriptor::adapters::codec::{self, Format};
//! use blueprint::descriptor::domain::Plan;
//! use blueprint::descriptor::ports::validator::DescriptorValidator;
//! use blueprint::descriptor::validation::DefaultDescriptorValidator;
//!
//! let text = "
//! type: web
//! name: seedmart-api
//! runtime: python
//! plan: starter
//! region: oregon
//! ";
//! let document = codec::decode_service(text, Format::Yaml).expect("well-formed yaml");
//! let descriptor = DefaultDescriptorValidator::new()
//!     .validate(&document)
//!     .expect("valid descriptor");
//! assert_eq!(descriptor.plan(), Plan::Starter);
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod validation;

#[cfg(test)]
mod tests;
