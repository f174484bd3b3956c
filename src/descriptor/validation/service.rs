//! Validation service implementation.
//!
//! Provides the default implementation of the `DescriptorValidator` port,
//! combining individual validation rules into a comprehensive validator.

use crate::descriptor::{
    domain::{
        Blueprint, BlueprintDocument, FieldPath, Plan, ResourceName, Region, Runtime,
        ServiceDescriptor, ServiceDocument, ServiceType,
    },
    error::SchemaViolation,
    ports::validator::{DescriptorValidator, ValidationConfig, ValidationResult},
    validation::{blueprint, rules},
};
use tracing::debug;

/// Default implementation of the descriptor validator.
///
/// Applies all validation rules, collecting violations to provide
/// comprehensive feedback rather than failing on the first one.
///
/// # Examples
///
/// ```
/// use blueprint::descriptor::domain::ServiceDocument;
/// use blueprint::descriptor::ports::validator::DescriptorValidator;
/// use blueprint::descriptor::validation::service::DefaultDescriptorValidator;
///
/// let document = ServiceDocument {
///     service_type: Some("web".to_owned()),
///     name: Some("seedmart-api".to_owned()),
///     runtime: Some("python".to_owned()),
///     plan: Some("ultra".to_owned()),
///     region: Some("oregon".to_owned()),
///     ..ServiceDocument::default()
/// };
///
/// let violation = DefaultDescriptorValidator::new()
///     .validate(&document)
///     .expect_err("ultra is not a plan");
/// assert!(violation.names_field("plan"));
/// ```
#[derive(Debug, Clone)]
pub struct DefaultDescriptorValidator {
    config: ValidationConfig,
}

/// Required fields of a descriptor once parsed.
struct RequiredFields {
    service_type: ServiceType,
    name: ResourceName,
    runtime: Runtime,
    plan: Plan,
    region: Region,
}

impl DefaultDescriptorValidator {
    /// Creates a new validator with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ValidationConfig::default(),
        }
    }

    /// Creates a new validator with custom configuration.
    #[must_use]
    pub const fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Returns the current validation configuration.
    #[must_use]
    pub const fn config(&self) -> &ValidationConfig {
        &self.config
    }

    fn required_fields(&self, document: &ServiceDocument) -> ValidationResult<RequiredFields> {
        let service_type = rules::parse_required::<ServiceType>(
            document.service_type.as_deref(),
            FieldPath::named("type"),
        );
        let name = rules::validate_name(
            document.name.as_deref(),
            FieldPath::named("name"),
            &self.config,
        );
        let runtime =
            rules::parse_required::<Runtime>(document.runtime.as_deref(), FieldPath::named("runtime"));
        let plan = rules::parse_required::<Plan>(document.plan.as_deref(), FieldPath::named("plan"));
        let region =
            rules::parse_required::<Region>(document.region.as_deref(), FieldPath::named("region"));

        match (service_type, name, runtime, plan, region) {
            (Ok(service_type), Ok(name), Ok(runtime), Ok(plan), Ok(region)) => Ok(RequiredFields {
                service_type,
                name,
                runtime,
                plan,
                region,
            }),
            (service_type, name, runtime, plan, region) => {
                let violations = [
                    service_type.err(),
                    name.err(),
                    runtime.err(),
                    plan.err(),
                    region.err(),
                ]
                .into_iter()
                .flatten()
                .collect();
                Err(SchemaViolation::combine(violations))
            }
        }
    }
}

impl Default for DefaultDescriptorValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorValidator for DefaultDescriptorValidator {
    fn validate(&self, document: &ServiceDocument) -> ValidationResult<ServiceDescriptor> {
        let required = self.required_fields(document);

        // Cross-field rules run on whichever required fields parsed.
        let service_type = document
            .service_type
            .as_deref()
            .and_then(|value| ServiceType::try_from(value).ok());
        let runtime = document
            .runtime
            .as_deref()
            .and_then(|value| Runtime::try_from(value).ok());
        let plan = document
            .plan
            .as_deref()
            .and_then(|value| Plan::try_from(value).ok());

        let mut violations = Vec::new();
        if !self.config.allow_unknown_fields {
            violations.extend(rules::unknown_fields(&document.extra, &FieldPath::root()));
        }

        let build_command = rules::record(
            &mut violations,
            rules::validate_command(
                document.build_command.as_deref(),
                FieldPath::named("buildCommand"),
            ),
        )
        .flatten();
        let start_command = rules::record(
            &mut violations,
            rules::validate_command(
                document.start_command.as_deref(),
                FieldPath::named("startCommand"),
            ),
        )
        .flatten();
        if let Some(runtime) = runtime {
            violations.extend(rules::required_commands(document, runtime, &self.config));
        }

        let port = rules::record(
            &mut violations,
            rules::validate_port(document.port.as_ref(), FieldPath::named("port")),
        )
        .flatten();
        let auto_deploy = rules::record(
            &mut violations,
            rules::optional_bool(document.auto_deploy.as_ref(), FieldPath::named("autoDeploy")),
        )
        .flatten();
        let previews = rules::record(
            &mut violations,
            rules::optional_bool(
                document.pull_request_previews_enabled.as_ref(),
                FieldPath::named("pullRequestPreviewsEnabled"),
            ),
        )
        .flatten();

        let env_vars = rules::record(
            &mut violations,
            rules::validate_env_vars(
                document.env_vars.as_deref(),
                &FieldPath::named("envVars"),
                &self.config,
            ),
        )
        .unwrap_or_default();

        let health_check_path = rules::record(
            &mut violations,
            rules::validate_health_check_path(
                document.health_check_path.as_deref(),
                FieldPath::named("healthCheckPath"),
                service_type,
            ),
        )
        .flatten();

        if let (Some(service_type), Some(plan)) = (service_type, plan) {
            rules::record(
                &mut violations,
                rules::validate_plan_availability(plan, service_type, FieldPath::named("plan")),
            );
        }

        let branches = rules::record(
            &mut violations,
            rules::validate_branches(
                document.branches.as_deref(),
                &FieldPath::named("branches"),
                &self.config,
            ),
        )
        .unwrap_or_default();

        let required = match required {
            Ok(required) if violations.is_empty() => required,
            Ok(_) => return Err(reject(document, violations)),
            Err(violation) => {
                violations.insert(0, violation);
                return Err(reject(document, violations));
            }
        };

        let mut builder = ServiceDescriptor::builder(
            required.service_type,
            required.name,
            required.runtime,
            required.plan,
            required.region,
        )
        .with_env_vars(env_vars)
        .with_auto_deploy(auto_deploy.unwrap_or(true));
        if let Some(command) = build_command {
            builder = builder.with_build_command(command);
        }
        if let Some(command) = start_command {
            builder = builder.with_start_command(command);
        }
        if let Some(port) = port {
            builder = builder.with_port(port);
        }
        if let Some(path) = health_check_path {
            builder = builder.with_health_check_path(path);
        }
        for branch in branches {
            builder = builder.with_branch(branch);
        }
        if let Some(enabled) = previews {
            builder = builder.with_pull_request_previews(enabled);
        }

        let descriptor = builder
            .build()
            .map_err(|error| SchemaViolation::from_domain(FieldPath::root(), error))?;
        debug!(
            service = descriptor.name().as_str(),
            service_type = %descriptor.service_type(),
            plan = %descriptor.plan(),
            region = %descriptor.region(),
            "service descriptor is valid"
        );
        Ok(descriptor)
    }

    fn validate_required(&self, document: &ServiceDocument) -> ValidationResult<()> {
        self.required_fields(document).map(|_| ())
    }

    fn validate_blueprint(&self, document: &BlueprintDocument) -> ValidationResult<Blueprint> {
        blueprint::validate_blueprint(self, document, &self.config)
    }
}

fn reject(document: &ServiceDocument, violations: Vec<SchemaViolation>) -> SchemaViolation {
    let violation = SchemaViolation::combine(violations);
    debug!(
        service = document.name.as_deref().unwrap_or("<unnamed>"),
        violations = violation.violations().len(),
        "service descriptor rejected"
    );
    violation
}
