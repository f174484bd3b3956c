//! Blueprint: schema validation for hosting-platform service descriptors.
//!
//! This crate parses the declarative configuration a hosting platform reads
//! when deploying a service, validates it against the descriptor schema and
//! re-serializes validated descriptors in a canonical form.
//!
//! # Architecture
//!
//! Blueprint follows hexagonal architecture principles:
//!
//! - **Domain**: Pure descriptor types with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for validation and text sources
//! - **Adapters**: Concrete implementations of ports (codec, filesystem, memory)
//!
//! # Modules
//!
//! - [`descriptor`]: Service descriptor schema, validation and loading

pub mod descriptor;
