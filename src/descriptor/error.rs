//! Schema violation types.
//!
//! Uses `thiserror` for ergonomic error handling with typed variants that can
//! be inspected by callers. Every variant except `Multiple` names the field
//! it concerns.

use super::domain::{DescriptorDomainError, FieldPath, Plan, Runtime, ServiceType};
use thiserror::Error;

/// A descriptor does not conform to the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    /// A required field is absent.
    #[error("{field}: required field is missing")]
    MissingField {
        /// The missing field.
        field: FieldPath,
    },

    /// A value lies outside its enumerated set.
    #[error("{field}: invalid value '{value}', expected one of {}", .expected.join(", "))]
    InvalidEnumValue {
        /// The offending field.
        field: FieldPath,
        /// The rejected value.
        value: String,
        /// The accepted values.
        expected: &'static [&'static str],
    },

    /// A text value is empty or whitespace-only.
    #[error("{field}: value must not be blank")]
    EmptyValue {
        /// The offending field.
        field: FieldPath,
    },

    /// A port number falls outside 1–65535.
    #[error("{field}: port {value} is out of range 1-65535")]
    PortOutOfRange {
        /// The offending field.
        field: FieldPath,
        /// The rejected number.
        value: i64,
    },

    /// A port value is not an integer.
    #[error("{field}: invalid port '{value}', expected an integer")]
    InvalidPort {
        /// The offending field.
        field: FieldPath,
        /// The rejected text.
        value: String,
    },

    /// A scalar has the wrong type, such as text where a boolean belongs.
    #[error("{field}: expected {expected}, found '{found}'")]
    InvalidType {
        /// The offending field.
        field: FieldPath,
        /// The expected type.
        expected: &'static str,
        /// The rejected value as written.
        found: String,
    },

    /// An environment variable key is not an identifier.
    #[error("{field}: invalid environment variable key '{key}'")]
    InvalidEnvVarKey {
        /// The offending field.
        field: FieldPath,
        /// The rejected key.
        key: String,
    },

    /// An environment variable key repeats an earlier one.
    #[error("{field}: duplicate environment variable key '{key}'")]
    DuplicateEnvVarKey {
        /// The repeated key's location.
        field: FieldPath,
        /// The repeated key.
        key: String,
    },

    /// An environment variable does not name exactly one value source.
    #[error("{field}: {reason}")]
    InvalidEnvVarSource {
        /// The offending variable.
        field: FieldPath,
        /// Description of the problem.
        reason: String,
    },

    /// A branch name contains whitespace.
    #[error("{field}: invalid branch name '{name}'")]
    InvalidBranchName {
        /// The offending field.
        field: FieldPath,
        /// The rejected name.
        name: String,
    },

    /// A branch repeats an earlier one.
    #[error("{field}: duplicate branch '{name}'")]
    DuplicateBranch {
        /// The repeated branch's location.
        field: FieldPath,
        /// The repeated name.
        name: String,
    },

    /// A health check path is not an absolute URL path.
    #[error("{field}: invalid health check path '{value}'")]
    InvalidHealthCheckPath {
        /// The offending field.
        field: FieldPath,
        /// The rejected path.
        value: String,
    },

    /// A field is set on a service type that ignores it.
    #[error("{field}: not supported for {service_type} services")]
    NotApplicable {
        /// The offending field.
        field: FieldPath,
        /// The service type.
        service_type: ServiceType,
    },

    /// The plan is not offered for the service type.
    #[error("{field}: plan '{plan}' is not available for {service_type} services")]
    PlanNotAvailable {
        /// The plan field.
        field: FieldPath,
        /// The requested plan.
        plan: Plan,
        /// The service type.
        service_type: ServiceType,
    },

    /// A name exceeds the configured length limit.
    #[error("{field}: name has {actual} characters, exceeds limit of {max}")]
    NameTooLong {
        /// The offending field.
        field: FieldPath,
        /// The configured limit.
        max: usize,
        /// The actual length.
        actual: usize,
    },

    /// The descriptor declares more environment variables than allowed.
    #[error("{field}: {actual} environment variables, exceeds limit of {max}")]
    TooManyEnvVars {
        /// The `envVars` field.
        field: FieldPath,
        /// The configured limit.
        max: usize,
        /// The actual count.
        actual: usize,
    },

    /// A command required for the runtime is absent.
    #[error("{field}: required for the {runtime} runtime")]
    MissingCommand {
        /// The missing command field.
        field: FieldPath,
        /// The runtime requiring it.
        runtime: Runtime,
    },

    /// A key the schema does not define.
    #[error("{field}: unknown field")]
    UnknownField {
        /// The unknown key's location.
        field: FieldPath,
    },

    /// A service or database name repeats an earlier one.
    #[error("{field}: duplicate name '{name}'")]
    DuplicateName {
        /// The repeated name's location.
        field: FieldPath,
        /// The repeated name.
        name: String,
    },

    /// A `fromDatabase` reference names an undeclared database.
    #[error("{field}: unknown database '{name}'")]
    UnknownDatabase {
        /// The reference's location.
        field: FieldPath,
        /// The referenced name.
        name: String,
    },

    /// Multiple violations occurred.
    #[error("{} schema violations: {}", .0.len(), format_violations(.0))]
    Multiple(Vec<Self>),
}

fn format_violations(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl SchemaViolation {
    /// Creates a missing-field violation.
    #[must_use]
    pub const fn missing(field: FieldPath) -> Self {
        Self::MissingField { field }
    }

    /// Maps a domain construction error onto the field it was raised for.
    #[must_use]
    pub fn from_domain(field: FieldPath, error: DescriptorDomainError) -> Self {
        match error {
            DescriptorDomainError::EmptyValue => Self::EmptyValue { field },
            DescriptorDomainError::InvalidEnvVarKey(key) => Self::InvalidEnvVarKey { field, key },
            DescriptorDomainError::InvalidHealthCheckPath(value) => {
                Self::InvalidHealthCheckPath { field, value }
            }
            DescriptorDomainError::PortOutOfRange(value) => Self::PortOutOfRange { field, value },
            DescriptorDomainError::InvalidPort(value) => Self::InvalidPort { field, value },
            DescriptorDomainError::InvalidBranchName(name) => {
                Self::InvalidBranchName { field, name }
            }
            DescriptorDomainError::DuplicateEnvVarKey(key) => {
                Self::DuplicateEnvVarKey { field, key }
            }
            DescriptorDomainError::DuplicateBranch(name) => Self::DuplicateBranch { field, name },
            DescriptorDomainError::HealthCheckNotSupported(service_type) => {
                Self::NotApplicable {
                    field,
                    service_type,
                }
            }
            DescriptorDomainError::PlanNotAvailable { plan, service_type } => {
                Self::PlanNotAvailable {
                    field,
                    plan,
                    service_type,
                }
            }
            DescriptorDomainError::DuplicateName(name) => Self::DuplicateName { field, name },
            DescriptorDomainError::UnknownDatabase(name) => Self::UnknownDatabase { field, name },
        }
    }

    /// Turns collected violations into a result.
    ///
    /// Returns `Ok(())` for an empty list, the violation itself for a single
    /// entry and a flattened `Multiple` otherwise.
    ///
    /// # Errors
    ///
    /// Returns the combined violation when `violations` is non-empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use blueprint::descriptor::domain::FieldPath;
    /// use blueprint::descriptor::error::SchemaViolation;
    ///
    /// assert!(SchemaViolation::collect(Vec::new()).is_ok());
    ///
    /// let single = SchemaViolation::collect(vec![SchemaViolation::missing(FieldPath::named("plan"))]);
    /// assert!(matches!(single, Err(SchemaViolation::MissingField { .. })));
    /// ```
    pub fn collect(violations: Vec<Self>) -> Result<(), Self> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Self::combine(violations))
        }
    }

    /// Combines violations into one value, flattening nested `Multiple`s.
    ///
    /// A single violation is returned as-is rather than wrapped. Callers
    /// should pass a non-empty list; an empty one yields an empty
    /// `Multiple`.
    #[must_use]
    pub fn combine(violations: Vec<Self>) -> Self {
        let mut flat = Vec::with_capacity(violations.len());
        for violation in violations {
            match violation {
                Self::Multiple(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            if let Some(only) = flat.pop() {
                return only;
            }
        }
        Self::Multiple(flat)
    }

    /// Returns `true` if this value combines several violations.
    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple(_))
    }

    /// Returns the individual violations.
    ///
    /// A single violation yields a one-element slice.
    #[must_use]
    pub fn violations(&self) -> &[Self] {
        match self {
            Self::Multiple(violations) => violations,
            single => std::slice::from_ref(single),
        }
    }

    /// Returns the field this violation names, or `None` for `Multiple`.
    #[must_use]
    pub const fn field(&self) -> Option<&FieldPath> {
        match self {
            Self::MissingField { field }
            | Self::InvalidEnumValue { field, .. }
            | Self::EmptyValue { field }
            | Self::PortOutOfRange { field, .. }
            | Self::InvalidPort { field, .. }
            | Self::InvalidType { field, .. }
            | Self::InvalidEnvVarKey { field, .. }
            | Self::DuplicateEnvVarKey { field, .. }
            | Self::InvalidEnvVarSource { field, .. }
            | Self::InvalidBranchName { field, .. }
            | Self::DuplicateBranch { field, .. }
            | Self::InvalidHealthCheckPath { field, .. }
            | Self::NotApplicable { field, .. }
            | Self::PlanNotAvailable { field, .. }
            | Self::NameTooLong { field, .. }
            | Self::TooManyEnvVars { field, .. }
            | Self::MissingCommand { field, .. }
            | Self::UnknownField { field }
            | Self::DuplicateName { field, .. }
            | Self::UnknownDatabase { field, .. } => Some(field),
            Self::Multiple(_) => None,
        }
    }

    /// Returns every field named by this violation, in report order.
    #[must_use]
    pub fn fields(&self) -> Vec<&FieldPath> {
        self.violations()
            .iter()
            .filter_map(Self::field)
            .collect()
    }

    /// Returns `true` if any individual violation names `field`.
    #[must_use]
    pub fn names_field(&self, field: &str) -> bool {
        self.fields().iter().any(|path| path.as_str() == field)
    }

    /// Returns this violation with every field nested under `prefix`.
    #[must_use]
    pub fn under(self, prefix: &FieldPath) -> Self {
        match self {
            Self::Multiple(violations) => Self::Multiple(
                violations
                    .into_iter()
                    .map(|violation| violation.under(prefix))
                    .collect(),
            ),
            mut single => {
                if let Some(field) = single.field_mut() {
                    *field = field.under(prefix);
                }
                single
            }
        }
    }

    fn field_mut(&mut self) -> Option<&mut FieldPath> {
        match self {
            Self::MissingField { field }
            | Self::InvalidEnumValue { field, .. }
            | Self::EmptyValue { field }
            | Self::PortOutOfRange { field, .. }
            | Self::InvalidPort { field, .. }
            | Self::InvalidType { field, .. }
            | Self::InvalidEnvVarKey { field, .. }
            | Self::DuplicateEnvVarKey { field, .. }
            | Self::InvalidEnvVarSource { field, .. }
            | Self::InvalidBranchName { field, .. }
            | Self::DuplicateBranch { field, .. }
            | Self::InvalidHealthCheckPath { field, .. }
            | Self::NotApplicable { field, .. }
            | Self::PlanNotAvailable { field, .. }
            | Self::NameTooLong { field, .. }
            | Self::TooManyEnvVars { field, .. }
            | Self::MissingCommand { field, .. }
            | Self::UnknownField { field }
            | Self::DuplicateName { field, .. }
            | Self::UnknownDatabase { field, .. } => Some(field),
            Self::Multiple(_) => None,
        }
    }
}

/// A string does not match any value of an enumerated field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}', expected one of {}", .expected.join(", "))]
pub struct UnknownVariantError {
    kind: &'static str,
    value: String,
    expected: &'static [&'static str],
}

impl UnknownVariantError {
    /// Creates the error.
    #[must_use]
    pub fn new(kind: &'static str, value: &str, expected: &'static [&'static str]) -> Self {
        Self {
            kind,
            value: value.to_owned(),
            expected,
        }
    }

    /// Returns the enum being parsed, e.g. `"plan"`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    /// Returns the rejected value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the accepted values.
    #[must_use]
    pub const fn expected(&self) -> &'static [&'static str] {
        self.expected
    }

    /// Converts this error into a violation on `field`.
    #[must_use]
    pub fn at(self, field: FieldPath) -> SchemaViolation {
        SchemaViolation::InvalidEnumValue {
            field,
            value: self.value,
            expected: self.expected,
        }
    }
}
