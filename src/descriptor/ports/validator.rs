//! Validator port for service descriptors.
//!
//! Defines the abstract interface for turning unvalidated documents into
//! typed descriptors, and the configuration that tunes it.

use crate::descriptor::{
    domain::{Blueprint, BlueprintDocument, ServiceDescriptor, ServiceDocument},
    error::SchemaViolation,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, SchemaViolation>;

/// Port for descriptor validation operations.
///
/// Validation occurs in layers:
/// 1. Required fields (`type`, `name`, `runtime`, `plan`, `region`)
/// 2. Field shapes (enums, ports, keys, paths, commands)
/// 3. Cross-field rules (plan availability, health check applicability,
///    duplicate keys and branches)
///
/// # Implementation Notes
///
/// Implementations should:
/// - Collect all violations before returning (not fail-fast)
/// - Use `SchemaViolation::collect` to combine violations
/// - Be stateless and thread-safe
pub trait DescriptorValidator: Send + Sync {
    /// Validates a service document and builds the descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaViolation`] naming every offending field.
    fn validate(&self, document: &ServiceDocument) -> ValidationResult<ServiceDescriptor>;

    /// Checks only that the required fields are present and in range.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaViolation`] for each missing or out-of-enum required
    /// field.
    fn validate_required(&self, document: &ServiceDocument) -> ValidationResult<()>;

    /// Validates a blueprint holding several services and databases.
    ///
    /// Violations inside a service are reported under `services[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaViolation`] naming every offending field.
    fn validate_blueprint(&self, document: &BlueprintDocument) -> ValidationResult<Blueprint>;
}

/// Configuration for validation rules.
///
/// Allows customization of validation behaviour for different contexts.
///
/// # Examples
///
/// ```
/// use blueprint::descriptor::ports::validator::ValidationConfig;
///
/// let config = ValidationConfig::default();
/// assert!(!config.allow_unknown_fields);
///
/// let lenient = ValidationConfig::lenient();
/// assert!(lenient.allow_unknown_fields);
///
/// let strict = ValidationConfig::strict();
/// assert!(strict.require_commands);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Whether keys the schema does not define are tolerated.
    pub allow_unknown_fields: bool,
    /// Whether runtimes that run commands must declare both of them.
    pub require_commands: bool,
    /// Maximum service or database name length in characters.
    pub max_name_length: usize,
    /// Maximum number of environment variables per service.
    pub max_env_vars: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            allow_unknown_fields: false,
            require_commands: false,
            max_name_length: 100,
            max_env_vars: 200,
        }
    }
}

impl ValidationConfig {
    /// Creates a lenient configuration that tolerates unknown fields.
    ///
    /// Useful for descriptors that carry platform settings this schema does
    /// not model.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            allow_unknown_fields: true,
            ..Default::default()
        }
    }

    /// Creates a strict configuration with reduced limits.
    ///
    /// Names are capped at 63 characters so that they fit a DNS label.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            allow_unknown_fields: false,
            require_commands: true,
            max_name_length: 63,
            max_env_vars: 100,
        }
    }
}
