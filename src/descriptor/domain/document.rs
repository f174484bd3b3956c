//! Unvalidated wire documents.
//!
//! These structs mirror the file layout one-to-one. Every field is optional
//! so that decoding never fails on a missing or mistyped enum value, and
//! non-text scalars (ports, flags, literal values) are kept as raw YAML
//! values so that a wrongly typed scalar is reported next to every other
//! violation. The validator turns a document into a typed descriptor and
//! reports every problem at once. Keys the schema does not define are kept
//! in `extra` so they can be reported as unknown fields.

use super::{
    Blueprint, DatabaseDescriptor, EnvVar, EnvVarSource, ServiceDescriptor,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Keys not defined by the schema, in the order they sort.
pub type ExtraFields = BTreeMap<String, Value>;

/// Wire form of a single service descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDocument {
    /// Service type (`type`).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    /// Service name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Runtime; the legacy key `env` is accepted on input.
    #[serde(alias = "env", skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    /// Build command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,
    /// Start command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_command: Option<String>,
    /// Port the process binds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<Value>,
    /// Environment variables in declaration order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_vars: Option<Vec<EnvVarDocument>>,
    /// Health check path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_path: Option<String>,
    /// Whether pushes deploy automatically.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_deploy: Option<Value>,
    /// Plan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    /// Tracked branches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<BranchDocument>>,
    /// Whether pull requests get preview deployments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request_previews_enabled: Option<Value>,
    /// Region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Keys not defined by the schema.
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Wire form of one environment variable.
///
/// Exactly one of `value`, `generateValue`, `sync: false` or
/// `fromDatabase` is expected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVarDocument {
    /// Variable key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Literal scalar value; an explicit `null` is kept as `Value::Null`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
    /// Asks the platform to generate a secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_value: Option<Value>,
    /// `false` marks a value entered out of band.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync: Option<Value>,
    /// Database attribute to inject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_database: Option<DatabaseReferenceDocument>,
    /// Keys not defined by the schema.
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Wire form of a `fromDatabase` reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseReferenceDocument {
    /// Name of the referenced database.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Attribute to inject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

/// Wire form of a tracked branch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchDocument {
    /// Branch name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Whether pushes to the branch deploy automatically; defaults to true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_deploy: Option<Value>,
    /// Keys not defined by the schema.
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Wire form of a database declared in a blueprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseDocument {
    /// Database resource name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Name of the database inside the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    /// Owner role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Plan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    /// Region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Keys not defined by the schema.
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Wire form of a blueprint file holding several services and databases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlueprintDocument {
    /// Service descriptors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ServiceDocument>>,
    /// Databases services may reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub databases: Option<Vec<DatabaseDocument>>,
    /// Keys not defined by the schema.
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Deserializes a key that is present, keeping `null` distinct from absent.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl From<&EnvVar> for EnvVarDocument {
    fn from(var: &EnvVar) -> Self {
        let mut document = Self {
            key: Some(var.key().as_str().to_owned()),
            ..Self::default()
        };
        match var.source() {
            EnvVarSource::Value(value) => document.value = Some(Value::String(value.clone())),
            EnvVarSource::Generated => document.generate_value = Some(Value::Bool(true)),
            EnvVarSource::Unsynced => document.sync = Some(Value::Bool(false)),
            EnvVarSource::FromDatabase(reference) => {
                document.from_database = Some(DatabaseReferenceDocument {
                    name: Some(reference.name().as_str().to_owned()),
                    property: Some(reference.property().as_str().to_owned()),
                });
            }
        }
        document
    }
}

impl From<&ServiceDescriptor> for ServiceDocument {
    fn from(descriptor: &ServiceDescriptor) -> Self {
        let env_vars = descriptor.env_vars();
        let branches = descriptor.branches();
        Self {
            service_type: Some(descriptor.service_type().as_str().to_owned()),
            name: Some(descriptor.name().as_str().to_owned()),
            runtime: Some(descriptor.runtime().as_str().to_owned()),
            build_command: descriptor
                .build_command()
                .map(|command| command.as_str().to_owned()),
            start_command: descriptor
                .start_command()
                .map(|command| command.as_str().to_owned()),
            port: descriptor.port().map(|port| Value::from(port.get())),
            env_vars: (!env_vars.is_empty())
                .then(|| env_vars.iter().map(EnvVarDocument::from).collect()),
            health_check_path: descriptor
                .health_check_path()
                .map(|path| path.as_str().to_owned()),
            auto_deploy: Some(Value::Bool(descriptor.auto_deploy())),
            plan: Some(descriptor.plan().as_str().to_owned()),
            branches: (!branches.is_empty()).then(|| {
                branches
                    .iter()
                    .map(|branch| BranchDocument {
                        name: Some(branch.name().as_str().to_owned()),
                        auto_deploy: Some(Value::Bool(branch.auto_deploy())),
                        extra: ExtraFields::new(),
                    })
                    .collect()
            }),
            pull_request_previews_enabled: descriptor
                .pull_request_previews_enabled()
                .map(Value::Bool),
            region: Some(descriptor.region().as_str().to_owned()),
            extra: ExtraFields::new(),
        }
    }
}

impl From<&DatabaseDescriptor> for DatabaseDocument {
    fn from(database: &DatabaseDescriptor) -> Self {
        Self {
            name: Some(database.name().as_str().to_owned()),
            database_name: database.database_name().map(ToOwned::to_owned),
            user: database.user().map(ToOwned::to_owned),
            plan: database.plan().map(|plan| plan.as_str().to_owned()),
            region: database.region().map(|region| region.as_str().to_owned()),
            extra: ExtraFields::new(),
        }
    }
}

impl From<&Blueprint> for BlueprintDocument {
    fn from(blueprint: &Blueprint) -> Self {
        let databases = blueprint.databases();
        Self {
            services: Some(
                blueprint
                    .services()
                    .iter()
                    .map(ServiceDocument::from)
                    .collect(),
            ),
            databases: (!databases.is_empty())
                .then(|| databases.iter().map(DatabaseDocument::from).collect()),
            extra: ExtraFields::new(),
        }
    }
}
