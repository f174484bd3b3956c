//! Blueprint aggregate: the services and databases declared in one file.

use super::{
    BlueprintDocument, DescriptorDomainError, EnvVarSource, Fingerprint, Plan, Region,
    ResourceName, ServiceDescriptor,
};
use serde::{Serialize, Serializer};
use std::collections::HashSet;

/// Database declared alongside services so they can reference it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseDescriptor {
    name: ResourceName,
    database_name: Option<String>,
    user: Option<String>,
    plan: Option<Plan>,
    region: Option<Region>,
}

impl DatabaseDescriptor {
    /// Creates a database with only a name.
    #[must_use]
    pub const fn new(name: ResourceName) -> Self {
        Self {
            name,
            database_name: None,
            user: None,
            plan: None,
            region: None,
        }
    }

    /// Sets the database name inside the server.
    #[must_use]
    pub fn with_database_name(mut self, database_name: impl Into<String>) -> Self {
        self.database_name = Some(database_name.into());
        self
    }

    /// Sets the owner role.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the plan.
    #[must_use]
    pub fn with_plan(mut self, plan: Plan) -> Self {
        self.plan = Some(plan);
        self
    }

    /// Sets the region.
    #[must_use]
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Returns the resource name.
    #[must_use]
    pub const fn name(&self) -> &ResourceName {
        &self.name
    }

    /// Returns the database name inside the server, if set.
    #[must_use]
    pub fn database_name(&self) -> Option<&str> {
        self.database_name.as_deref()
    }

    /// Returns the owner role, if set.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Returns the plan, if set.
    #[must_use]
    pub const fn plan(&self) -> Option<Plan> {
        self.plan
    }

    /// Returns the region, if set.
    #[must_use]
    pub const fn region(&self) -> Option<Region> {
        self.region
    }
}

/// Validated blueprint.
///
/// Service names are unique, database names are unique and every
/// `fromDatabase` reference names a declared database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    services: Vec<ServiceDescriptor>,
    databases: Vec<DatabaseDescriptor>,
}

impl Blueprint {
    /// Creates a blueprint.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorDomainError::DuplicateName`] for a repeated
    /// service or database name and
    /// [`DescriptorDomainError::UnknownDatabase`] for a dangling database
    /// reference.
    pub fn new(
        services: Vec<ServiceDescriptor>,
        databases: Vec<DatabaseDescriptor>,
    ) -> Result<Self, DescriptorDomainError> {
        ensure_unique(services.iter().map(|service| service.name()))?;
        ensure_unique(databases.iter().map(DatabaseDescriptor::name))?;

        let declared: HashSet<&str> = databases
            .iter()
            .map(|database| database.name().as_str())
            .collect();
        for service in &services {
            for var in service.env_vars() {
                if let EnvVarSource::FromDatabase(reference) = var.source() {
                    if !declared.contains(reference.name().as_str()) {
                        return Err(DescriptorDomainError::UnknownDatabase(
                            reference.name().as_str().to_owned(),
                        ));
                    }
                }
            }
        }

        Ok(Self {
            services,
            databases,
        })
    }

    /// Returns the services in declaration order.
    #[must_use]
    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    /// Returns the databases in declaration order.
    #[must_use]
    pub fn databases(&self) -> &[DatabaseDescriptor] {
        &self.databases
    }

    /// Returns the service called `name`, if any.
    #[must_use]
    pub fn service(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services
            .iter()
            .find(|service| service.name().as_str() == name)
    }

    /// Returns a SHA-256 digest of the canonical serialization.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if the blueprint cannot be serialized.
    pub fn fingerprint(&self) -> Result<Fingerprint, serde_json::Error> {
        let canonical = serde_json::to_vec(&BlueprintDocument::from(self))?;
        Ok(Fingerprint::of(&canonical))
    }
}

impl Serialize for Blueprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BlueprintDocument::from(self).serialize(serializer)
    }
}

fn ensure_unique<'a>(
    names: impl Iterator<Item = &'a ResourceName>,
) -> Result<(), DescriptorDomainError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(DescriptorDomainError::DuplicateName(name.as_str().to_owned()));
        }
    }
    Ok(())
}
