//! Descriptor validation implementation.
//!
//! This module provides the default implementation of descriptor validation,
//! including individual validation rules, blueprint-level rules and the
//! composite validator service.

pub mod blueprint;
pub mod rules;
pub mod service;

pub use blueprint::validate_blueprint;
pub use service::DefaultDescriptorValidator;
