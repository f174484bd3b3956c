//! Error types for descriptor domain construction.

use super::{Plan, ServiceType};
use thiserror::Error;

/// Errors returned while constructing descriptor domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DescriptorDomainError {
    /// A required text value is empty or whitespace-only.
    #[error("value must not be blank")]
    EmptyValue,

    /// An environment variable key is not a valid identifier.
    #[error("invalid environment variable key '{0}'")]
    InvalidEnvVarKey(String),

    /// A health check path is not an absolute URL path.
    #[error("invalid health check path '{0}', expected an absolute path such as /health")]
    InvalidHealthCheckPath(String),

    /// A port number falls outside 1–65535.
    #[error("port {0} is out of range 1-65535")]
    PortOutOfRange(i64),

    /// A port value is not an integer.
    #[error("invalid port '{0}', expected an integer")]
    InvalidPort(String),

    /// A branch name contains whitespace.
    #[error("invalid branch name '{0}'")]
    InvalidBranchName(String),

    /// Two environment variables share a key.
    #[error("duplicate environment variable key '{0}'")]
    DuplicateEnvVarKey(String),

    /// Two branch settings share a name.
    #[error("duplicate branch '{0}'")]
    DuplicateBranch(String),

    /// A health check path was set on a service type that is never probed.
    #[error("health checks are not supported for {0} services")]
    HealthCheckNotSupported(ServiceType),

    /// The plan is not offered for the service type.
    #[error("plan '{plan}' is not available for {service_type} services")]
    PlanNotAvailable {
        /// The requested plan.
        plan: Plan,
        /// The service type requesting it.
        service_type: ServiceType,
    },

    /// Two resources in a blueprint share a name.
    #[error("duplicate name '{0}'")]
    DuplicateName(String),

    /// An environment variable references a database the blueprint does not
    /// declare.
    #[error("unknown database '{0}'")]
    UnknownDatabase(String),
}
