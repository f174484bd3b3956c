//! Blueprint-level validation rules.
//!
//! A blueprint is valid when every service validates on its own, service
//! and database names are unique, and every `fromDatabase` reference names a
//! declared database.

use crate::descriptor::{
    domain::{
        Blueprint, BlueprintDocument, DatabaseDescriptor, DatabaseDocument, FieldPath, Plan,
        Region, ServiceDocument,
    },
    error::SchemaViolation,
    ports::validator::{DescriptorValidator, ValidationConfig, ValidationResult},
    validation::rules,
};
use std::collections::HashSet;
use tracing::debug;

/// Validates a blueprint document using `validator` for each service.
///
/// # Errors
///
/// Returns every violation found, with service and database violations
/// nested under `services[i]` and `databases[i]`.
pub fn validate_blueprint<V>(
    validator: &V,
    document: &BlueprintDocument,
    config: &ValidationConfig,
) -> ValidationResult<Blueprint>
where
    V: DescriptorValidator + ?Sized,
{
    let mut violations = Vec::new();
    if !config.allow_unknown_fields {
        violations.extend(rules::unknown_fields(&document.extra, &FieldPath::root()));
    }

    let services_field = FieldPath::named("services");
    let service_documents = match document.services.as_deref() {
        None => {
            violations.push(SchemaViolation::missing(services_field.clone()));
            &[][..]
        }
        Some([]) => {
            violations.push(SchemaViolation::EmptyValue {
                field: services_field.clone(),
            });
            &[][..]
        }
        Some(services) => services,
    };
    let database_documents = document.databases.as_deref().unwrap_or_default();

    let mut services = Vec::with_capacity(service_documents.len());
    for (index, service) in service_documents.iter().enumerate() {
        match validator.validate(service) {
            Ok(descriptor) => services.push(descriptor),
            Err(violation) => violations.push(violation.under(&services_field.index(index))),
        }
    }
    violations.extend(duplicate_names(
        service_documents.iter().map(|service| service.name.as_deref()),
        &services_field,
    ));

    let databases = validate_databases(database_documents, config, &mut violations);
    violations.extend(dangling_references(
        service_documents,
        database_documents,
        &services_field,
    ));

    if let Err(violation) = SchemaViolation::collect(violations) {
        debug!(
            services = service_documents.len(),
            violations = violation.violations().len(),
            "blueprint rejected"
        );
        return Err(violation);
    }

    let blueprint = Blueprint::new(services, databases)
        .map_err(|error| SchemaViolation::from_domain(FieldPath::root(), error))?;
    debug!(
        services = blueprint.services().len(),
        databases = blueprint.databases().len(),
        "blueprint is valid"
    );
    Ok(blueprint)
}

fn validate_databases(
    documents: &[DatabaseDocument],
    config: &ValidationConfig,
    violations: &mut Vec<SchemaViolation>,
) -> Vec<DatabaseDescriptor> {
    let databases_field = FieldPath::named("databases");
    let mut databases = Vec::with_capacity(documents.len());
    for (index, document) in documents.iter().enumerate() {
        let at = databases_field.index(index);
        if !config.allow_unknown_fields {
            violations.extend(rules::unknown_fields(&document.extra, &at));
        }

        let name = rules::record(
            violations,
            rules::validate_name(document.name.as_deref(), at.field("name"), config),
        );
        let plan = rules::record(
            violations,
            rules::parse_optional::<Plan>(document.plan.as_deref(), at.field("plan")),
        )
        .flatten();
        let region = rules::record(
            violations,
            rules::parse_optional::<Region>(document.region.as_deref(), at.field("region")),
        )
        .flatten();

        let Some(name) = name else {
            continue;
        };
        let mut database = DatabaseDescriptor::new(name);
        if let Some(database_name) = &document.database_name {
            database = database.with_database_name(database_name.clone());
        }
        if let Some(user) = &document.user {
            database = database.with_user(user.clone());
        }
        if let Some(plan) = plan {
            database = database.with_plan(plan);
        }
        if let Some(region) = region {
            database = database.with_region(region);
        }
        databases.push(database);
    }

    violations.extend(duplicate_names(
        documents.iter().map(|database| database.name.as_deref()),
        &databases_field,
    ));
    databases
}

fn duplicate_names<'a>(
    names: impl Iterator<Item = Option<&'a str>>,
    field: &FieldPath,
) -> Vec<SchemaViolation> {
    let mut seen = HashSet::new();
    names
        .enumerate()
        .filter_map(|(index, name)| name.map(|name| (index, name)))
        .filter(|(_, name)| !name.trim().is_empty() && !seen.insert(*name))
        .map(|(index, name)| SchemaViolation::DuplicateName {
            field: field.index(index).field("name"),
            name: name.to_owned(),
        })
        .collect()
}

fn dangling_references(
    services: &[ServiceDocument],
    databases: &[DatabaseDocument],
    services_field: &FieldPath,
) -> Vec<SchemaViolation> {
    let declared: HashSet<&str> = databases
        .iter()
        .filter_map(|database| database.name.as_deref())
        .collect();

    let mut violations = Vec::new();
    for (service_index, service) in services.iter().enumerate() {
        let Some(env_vars) = service.env_vars.as_deref() else {
            continue;
        };
        for (var_index, var) in env_vars.iter().enumerate() {
            let Some(name) = var
                .from_database
                .as_ref()
                .and_then(|reference| reference.name.as_deref())
            else {
                continue;
            };
            if !declared.contains(name) {
                violations.push(SchemaViolation::UnknownDatabase {
                    field: services_field
                        .index(service_index)
                        .field("envVars")
                        .index(var_index)
                        .field("fromDatabase")
                        .field("name"),
                    name: name.to_owned(),
                });
            }
        }
    }
    violations
}
