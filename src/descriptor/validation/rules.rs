//! Individual validation rule implementations.
//!
//! Each rule is a pure function that checks one aspect of a document and
//! returns either the typed value or a [`SchemaViolation`] naming the field.
//! Rules that inspect sequences collect every violation before returning.

use crate::descriptor::{
    domain::{
        BranchDocument, BranchName, BranchSetting, DatabaseProperty, DatabaseReference,
        DatabaseReferenceDocument, DescriptorDomainError, EnvVar, EnvVarDocument, EnvVarKey, EnvVarSource, ExtraFields,
        FieldPath, HealthCheckPath, PORT_VARIABLE, Plan, Port, ResourceName, Runtime,
        ServiceDocument, ServiceType, ShellCommand,
    },
    error::{SchemaViolation, UnknownVariantError},
    ports::validator::ValidationConfig,
};
use serde_yaml::Value;
use std::collections::HashSet;

/// Keeps the value of a successful rule and records the violation of a
/// failed one.
pub(crate) fn record<T>(
    violations: &mut Vec<SchemaViolation>,
    result: Result<T, SchemaViolation>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(violation) => {
            violations.push(violation);
            None
        }
    }
}

/// Reports every key in `extra` as an unknown field under `at`.
#[must_use]
pub fn unknown_fields(extra: &ExtraFields, at: &FieldPath) -> Vec<SchemaViolation> {
    extra
        .keys()
        .map(|key| SchemaViolation::UnknownField {
            field: at.field(key),
        })
        .collect()
}

/// Parses a required enumerated field.
///
/// # Errors
///
/// Returns `MissingField` when absent and `InvalidEnumValue` when the value
/// is not one of the accepted wire values.
pub fn parse_required<T>(value: Option<&str>, field: FieldPath) -> Result<T, SchemaViolation>
where
    T: for<'a> TryFrom<&'a str, Error = UnknownVariantError>,
{
    let Some(raw) = value else {
        return Err(SchemaViolation::missing(field));
    };
    T::try_from(raw).map_err(|error| error.at(field))
}

/// Parses an optional enumerated field.
///
/// # Errors
///
/// Returns `InvalidEnumValue` when present but not an accepted wire value.
pub fn parse_optional<T>(value: Option<&str>, field: FieldPath) -> Result<Option<T>, SchemaViolation>
where
    T: for<'a> TryFrom<&'a str, Error = UnknownVariantError>,
{
    value
        .map(|raw| T::try_from(raw).map_err(|error| error.at(field)))
        .transpose()
}

/// Validates a required service or database name.
///
/// # Errors
///
/// Returns `MissingField`, `EmptyValue` or `NameTooLong`.
pub fn validate_name(
    value: Option<&str>,
    field: FieldPath,
    config: &ValidationConfig,
) -> Result<ResourceName, SchemaViolation> {
    let Some(raw) = value else {
        return Err(SchemaViolation::missing(field));
    };
    let name =
        ResourceName::new(raw).map_err(|error| SchemaViolation::from_domain(field.clone(), error))?;
    let actual = name.char_count();
    if actual > config.max_name_length {
        return Err(SchemaViolation::NameTooLong {
            field,
            max: config.max_name_length,
            actual,
        });
    }
    Ok(name)
}

/// Validates an optional build or start command.
///
/// # Errors
///
/// Returns `EmptyValue` for a blank command.
pub fn validate_command(
    value: Option<&str>,
    field: FieldPath,
) -> Result<Option<ShellCommand>, SchemaViolation> {
    value
        .map(|raw| ShellCommand::new(raw).map_err(|error| SchemaViolation::from_domain(field, error)))
        .transpose()
}

/// Checks that both commands are declared when the configuration demands
/// them for `runtime`.
#[must_use]
pub fn required_commands(
    document: &ServiceDocument,
    runtime: Runtime,
    config: &ValidationConfig,
) -> Vec<SchemaViolation> {
    if !config.require_commands || !runtime.uses_commands() {
        return Vec::new();
    }
    [
        ("buildCommand", &document.build_command),
        ("startCommand", &document.start_command),
    ]
    .into_iter()
    .filter(|(_, command)| command.is_none())
    .map(|(name, _)| SchemaViolation::MissingCommand {
        field: FieldPath::named(name),
        runtime,
    })
    .collect()
}

/// Validates an optional port number.
///
/// # Errors
///
/// Returns `PortOutOfRange` for integers outside 1–65535, `InvalidPort` for
/// non-integral numbers and `InvalidType` for any other scalar.
pub fn validate_port(value: Option<&Value>, field: FieldPath) -> Result<Option<Port>, SchemaViolation> {
    let Some(raw) = value else {
        return Ok(None);
    };
    match raw {
        Value::Number(number) => {
            let port = number.as_i64().map_or_else(
                || Err(DescriptorDomainError::InvalidPort(number.to_string())),
                Port::new,
            );
            port.map(Some)
                .map_err(|error| SchemaViolation::from_domain(field, error))
        }
        other => Err(invalid_type(other, "an integer port", field)),
    }
}

/// Reads an optional boolean flag.
///
/// # Errors
///
/// Returns `InvalidType` when the value is not `true` or `false`.
pub fn optional_bool(value: Option<&Value>, field: FieldPath) -> Result<Option<bool>, SchemaViolation> {
    match value {
        None => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(*flag)),
        Some(other) => Err(invalid_type(other, "a boolean", field)),
    }
}

fn invalid_type(value: &Value, expected: &'static str, field: FieldPath) -> SchemaViolation {
    let found = match value {
        Value::Null => "null".to_owned(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        Value::Sequence(_) => "a sequence".to_owned(),
        Value::Mapping(_) => "a mapping".to_owned(),
        Value::Tagged(tagged) => tagged.tag.to_string(),
    };
    SchemaViolation::InvalidType {
        field,
        expected,
        found,
    }
}

/// Validates an optional health check path and its applicability.
///
/// # Errors
///
/// Returns `InvalidHealthCheckPath` for a malformed path and
/// `NotApplicable` when `service_type` is never probed.
pub fn validate_health_check_path(
    value: Option<&str>,
    field: FieldPath,
    service_type: Option<ServiceType>,
) -> Result<Option<HealthCheckPath>, SchemaViolation> {
    let Some(raw) = value else {
        return Ok(None);
    };
    if let Some(kind) = service_type {
        if !kind.supports_health_check() {
            return Err(SchemaViolation::NotApplicable {
                field,
                service_type: kind,
            });
        }
    }
    HealthCheckPath::new(raw)
        .map(Some)
        .map_err(|error| SchemaViolation::from_domain(field, error))
}

/// Checks that `plan` is offered for `service_type`.
///
/// # Errors
///
/// Returns `PlanNotAvailable` when it is not.
pub fn validate_plan_availability(
    plan: Plan,
    service_type: ServiceType,
    field: FieldPath,
) -> Result<(), SchemaViolation> {
    if service_type.supports_plan(plan) {
        Ok(())
    } else {
        Err(SchemaViolation::PlanNotAvailable {
            field,
            plan,
            service_type,
        })
    }
}

/// Validates the environment variable list.
///
/// Checks the configured count limit, each variable, key uniqueness and the
/// value of a literal `PORT` variable. Duplicates are reported at the key of
/// the repeated occurrence.
///
/// # Errors
///
/// Returns every violation found, combined.
pub fn validate_env_vars(
    documents: Option<&[EnvVarDocument]>,
    field: &FieldPath,
    config: &ValidationConfig,
) -> Result<Vec<EnvVar>, SchemaViolation> {
    let Some(documents) = documents else {
        return Ok(Vec::new());
    };

    let mut violations = Vec::new();
    if documents.len() > config.max_env_vars {
        violations.push(SchemaViolation::TooManyEnvVars {
            field: field.clone(),
            max: config.max_env_vars,
            actual: documents.len(),
        });
    }

    let mut seen = HashSet::with_capacity(documents.len());
    let mut vars = Vec::with_capacity(documents.len());
    for (index, document) in documents.iter().enumerate() {
        let at = field.index(index);

        if let Some(key) = document.key.as_deref() {
            if !seen.insert(key) {
                violations.push(SchemaViolation::DuplicateEnvVarKey {
                    field: at.field("key"),
                    key: key.to_owned(),
                });
            }
        }

        if let Some(var) = record(&mut violations, validate_env_var(document, &at, config)) {
            vars.push(var);
        }
    }

    SchemaViolation::collect(violations)?;
    Ok(vars)
}

/// Validates one environment variable.
///
/// # Errors
///
/// Returns every violation found for this variable, combined.
pub fn validate_env_var(
    document: &EnvVarDocument,
    at: &FieldPath,
    config: &ValidationConfig,
) -> Result<EnvVar, SchemaViolation> {
    let mut violations = Vec::new();
    if !config.allow_unknown_fields {
        violations.extend(unknown_fields(&document.extra, at));
    }

    let key_field = at.field("key");
    let key = record(
        &mut violations,
        document
            .key
            .as_deref()
            .ok_or_else(|| SchemaViolation::missing(key_field.clone()))
            .and_then(|raw| {
                EnvVarKey::new(raw).map_err(|error| SchemaViolation::from_domain(key_field, error))
            }),
    );

    let source = record(&mut violations, validate_env_var_source(document, at));

    if let (Some(key), Some(EnvVarSource::Value(value))) = (&key, &source) {
        if key.as_str() == PORT_VARIABLE {
            record(
                &mut violations,
                Port::parse(value)
                    .map_err(|error| SchemaViolation::from_domain(at.field("value"), error)),
            );
        }
    }

    SchemaViolation::collect(violations)?;
    match (key, source) {
        (Some(key), Some(source)) => Ok(EnvVar::new(key, source)),
        _ => Err(SchemaViolation::InvalidEnvVarSource {
            field: at.clone(),
            reason: "environment variable is incomplete".to_owned(),
        }),
    }
}

/// Determines the single value source of an environment variable.
///
/// # Errors
///
/// Returns `InvalidType` for non-boolean `generateValue` or `sync` flags,
/// `InvalidEnvVarSource` when zero or several sources are set or the literal
/// value is not a scalar, and the `fromDatabase` violations when the
/// reference is malformed.
pub fn validate_env_var_source(
    document: &EnvVarDocument,
    at: &FieldPath,
) -> Result<EnvVarSource, SchemaViolation> {
    let mut violations = Vec::new();
    let generate = record(
        &mut violations,
        optional_bool(document.generate_value.as_ref(), at.field("generateValue")),
    )
    .flatten();
    let sync = record(
        &mut violations,
        optional_bool(document.sync.as_ref(), at.field("sync")),
    )
    .flatten();
    SchemaViolation::collect(violations)?;

    let declared = [
        document.value.is_some(),
        generate == Some(true),
        sync == Some(false),
        document.from_database.is_some(),
    ]
    .into_iter()
    .filter(|set| *set)
    .count();

    if declared == 0 {
        return Err(SchemaViolation::InvalidEnvVarSource {
            field: at.clone(),
            reason: "expected one of value, generateValue, sync: false or fromDatabase".to_owned(),
        });
    }
    if declared > 1 {
        return Err(SchemaViolation::InvalidEnvVarSource {
            field: at.clone(),
            reason: "more than one value source is set".to_owned(),
        });
    }

    if let Some(value) = &document.value {
        return scalar_text(value, &at.field("value")).map(EnvVarSource::Value);
    }
    if let Some(reference) = &document.from_database {
        return validate_database_reference(reference, &at.field("fromDatabase"))
            .map(EnvVarSource::FromDatabase);
    }
    if generate == Some(true) {
        Ok(EnvVarSource::Generated)
    } else {
        Ok(EnvVarSource::Unsynced)
    }
}

/// Validates a `fromDatabase` reference.
///
/// # Errors
///
/// Returns the missing or malformed `name` and `property` violations.
pub fn validate_database_reference(
    document: &DatabaseReferenceDocument,
    at: &FieldPath,
) -> Result<DatabaseReference, SchemaViolation> {
    let mut violations = Vec::new();
    let name_field = at.field("name");
    let name = record(
        &mut violations,
        document
            .name
            .as_deref()
            .ok_or_else(|| SchemaViolation::missing(name_field.clone()))
            .and_then(|raw| {
                ResourceName::new(raw).map_err(|error| SchemaViolation::from_domain(name_field, error))
            }),
    );
    let property = record(
        &mut violations,
        parse_required::<DatabaseProperty>(document.property.as_deref(), at.field("property")),
    );

    SchemaViolation::collect(violations)?;
    match (name, property) {
        (Some(name), Some(property)) => Ok(DatabaseReference::new(name, property)),
        _ => Err(SchemaViolation::missing(at.clone())),
    }
}

/// Validates the tracked branch list.
///
/// # Errors
///
/// Returns every missing, blank, malformed or repeated branch name,
/// combined.
pub fn validate_branches(
    documents: Option<&[BranchDocument]>,
    field: &FieldPath,
    config: &ValidationConfig,
) -> Result<Vec<BranchSetting>, SchemaViolation> {
    let Some(documents) = documents else {
        return Ok(Vec::new());
    };

    let mut violations = Vec::new();
    let mut seen = HashSet::with_capacity(documents.len());
    let mut branches = Vec::with_capacity(documents.len());
    for (index, document) in documents.iter().enumerate() {
        let at = field.index(index);
        if !config.allow_unknown_fields {
            violations.extend(unknown_fields(&document.extra, &at));
        }

        let name_field = at.field("name");
        let Some(raw) = document.name.as_deref() else {
            violations.push(SchemaViolation::missing(name_field));
            continue;
        };
        if !seen.insert(raw) {
            violations.push(SchemaViolation::DuplicateBranch {
                field: name_field,
                name: raw.to_owned(),
            });
            continue;
        }
        let name = record(
            &mut violations,
            BranchName::new(raw).map_err(|error| SchemaViolation::from_domain(name_field, error)),
        );
        let auto_deploy = record(
            &mut violations,
            optional_bool(document.auto_deploy.as_ref(), at.field("autoDeploy")),
        );
        if let (Some(name), Some(auto_deploy)) = (name, auto_deploy) {
            branches.push(BranchSetting::new(name, auto_deploy.unwrap_or(true)));
        }
    }

    SchemaViolation::collect(violations)?;
    Ok(branches)
}

/// Renders a scalar YAML value as text.
///
/// # Errors
///
/// Returns `InvalidEnvVarSource` for null, sequence, mapping or tagged
/// values.
pub fn scalar_text(value: &Value, field: &FieldPath) -> Result<String, SchemaViolation> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null => Err(SchemaViolation::InvalidEnvVarSource {
            field: field.clone(),
            reason: "value must not be null".to_owned(),
        }),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => {
            Err(SchemaViolation::InvalidEnvVarSource {
                field: field.clone(),
                reason: "value must be a string, number or boolean".to_owned(),
            })
        }
    }
}
