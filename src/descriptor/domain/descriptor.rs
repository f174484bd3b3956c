//! Service descriptor aggregate.

use super::{
    BranchSetting, DescriptorDomainError, EnvVar, EnvVars, HealthCheckPath, Plan, Port, Region,
    ResourceName, Runtime, ServiceDocument, ServiceType, ShellCommand,
};
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;

/// Validated description of one deployable service.
///
/// A descriptor is immutable: editing a service means building a new
/// descriptor and replacing the old one wholesale. Use
/// [`ServiceDescriptor::fingerprint`] to tell two revisions apart.
///
/// # Examples
///
/// ```
/// use blueprint::descriptor::domain::{
///     EnvVar, HealthCheckPath, Plan, Region, ResourceName, Runtime, ServiceDescriptor,
///     ServiceType,
/// };
///
/// let descriptor = ServiceDescriptor::builder(
///     ServiceType::Web,
///     ResourceName::new("seedmart-api").expect("valid name"),
///     Runtime::Python,
///     Plan::Starter,
///     Region::Oregon,
/// )
/// .with_env_var(EnvVar::literal("FLASK_ENV", "production").expect("valid key"))
/// .with_health_check_path(HealthCheckPath::new("/api/health").expect("valid path"))
/// .build()
/// .expect("valid descriptor");
///
/// assert!(descriptor.auto_deploy());
/// assert_eq!(descriptor.env_vars().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    service_type: ServiceType,
    name: ResourceName,
    runtime: Runtime,
    build_command: Option<ShellCommand>,
    start_command: Option<ShellCommand>,
    port: Option<Port>,
    env_vars: EnvVars,
    health_check_path: Option<HealthCheckPath>,
    auto_deploy: bool,
    plan: Plan,
    branches: Vec<BranchSetting>,
    pull_request_previews_enabled: Option<bool>,
    region: Region,
}

impl ServiceDescriptor {
    /// Starts a builder from the required fields.
    #[must_use]
    pub fn builder(
        service_type: ServiceType,
        name: ResourceName,
        runtime: Runtime,
        plan: Plan,
        region: Region,
    ) -> ServiceDescriptorBuilder {
        ServiceDescriptorBuilder::new(service_type, name, runtime, plan, region)
    }

    /// Returns the service type.
    #[must_use]
    pub const fn service_type(&self) -> ServiceType {
        self.service_type
    }

    /// Returns the service name.
    #[must_use]
    pub const fn name(&self) -> &ResourceName {
        &self.name
    }

    /// Returns the runtime.
    #[must_use]
    pub const fn runtime(&self) -> Runtime {
        self.runtime
    }

    /// Returns the build command, if any.
    #[must_use]
    pub const fn build_command(&self) -> Option<&ShellCommand> {
        self.build_command.as_ref()
    }

    /// Returns the start command, if any.
    #[must_use]
    pub const fn start_command(&self) -> Option<&ShellCommand> {
        self.start_command.as_ref()
    }

    /// Returns the declared port, if any.
    #[must_use]
    pub const fn port(&self) -> Option<Port> {
        self.port
    }

    /// Returns the port the process is expected to bind.
    ///
    /// Prefers the declared `port` and falls back to a literal `PORT`
    /// environment variable.
    #[must_use]
    pub fn effective_port(&self) -> Option<Port> {
        self.port.or_else(|| self.env_vars.port())
    }

    /// Returns the environment variables.
    #[must_use]
    pub const fn env_vars(&self) -> &EnvVars {
        &self.env_vars
    }

    /// Returns the health check path, if any.
    #[must_use]
    pub const fn health_check_path(&self) -> Option<&HealthCheckPath> {
        self.health_check_path.as_ref()
    }

    /// Returns whether pushes deploy automatically.
    #[must_use]
    pub const fn auto_deploy(&self) -> bool {
        self.auto_deploy
    }

    /// Returns the plan.
    #[must_use]
    pub const fn plan(&self) -> Plan {
        self.plan
    }

    /// Returns the tracked branches.
    #[must_use]
    pub fn branches(&self) -> &[BranchSetting] {
        &self.branches
    }

    /// Returns whether pull requests get preview deployments, if set.
    #[must_use]
    pub const fn pull_request_previews_enabled(&self) -> Option<bool> {
        self.pull_request_previews_enabled
    }

    /// Returns the region.
    #[must_use]
    pub const fn region(&self) -> Region {
        self.region
    }

    /// Returns a SHA-256 digest of the canonical serialization.
    ///
    /// Two descriptors have the same fingerprint exactly when they are
    /// equal.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if the descriptor cannot be serialized.
    pub fn fingerprint(&self) -> Result<Fingerprint, serde_json::Error> {
        let canonical = serde_json::to_vec(&ServiceDocument::from(self))?;
        Ok(Fingerprint::of(&canonical))
    }
}

impl Serialize for ServiceDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ServiceDocument::from(self).serialize(serializer)
    }
}

/// Builder for [`ServiceDescriptor`].
#[derive(Debug, Clone)]
pub struct ServiceDescriptorBuilder {
    service_type: ServiceType,
    name: ResourceName,
    runtime: Runtime,
    plan: Plan,
    region: Region,
    build_command: Option<ShellCommand>,
    start_command: Option<ShellCommand>,
    port: Option<Port>,
    env_vars: Vec<EnvVar>,
    health_check_path: Option<HealthCheckPath>,
    auto_deploy: bool,
    branches: Vec<BranchSetting>,
    pull_request_previews_enabled: Option<bool>,
}

impl ServiceDescriptorBuilder {
    /// Creates a builder from the required fields.
    #[must_use]
    pub const fn new(
        service_type: ServiceType,
        name: ResourceName,
        runtime: Runtime,
        plan: Plan,
        region: Region,
    ) -> Self {
        Self {
            service_type,
            name,
            runtime,
            plan,
            region,
            build_command: None,
            start_command: None,
            port: None,
            env_vars: Vec::new(),
            health_check_path: None,
            auto_deploy: true,
            branches: Vec::new(),
            pull_request_previews_enabled: None,
        }
    }

    /// Sets the build command.
    #[must_use]
    pub fn with_build_command(mut self, command: ShellCommand) -> Self {
        self.build_command = Some(command);
        self
    }

    /// Sets the start command.
    #[must_use]
    pub fn with_start_command(mut self, command: ShellCommand) -> Self {
        self.start_command = Some(command);
        self
    }

    /// Sets the port.
    #[must_use]
    pub const fn with_port(mut self, port: Port) -> Self {
        self.port = Some(port);
        self
    }

    /// Appends an environment variable.
    #[must_use]
    pub fn with_env_var(mut self, var: EnvVar) -> Self {
        self.env_vars.push(var);
        self
    }

    /// Appends several environment variables.
    #[must_use]
    pub fn with_env_vars(mut self, vars: impl IntoIterator<Item = EnvVar>) -> Self {
        self.env_vars.extend(vars);
        self
    }

    /// Sets the health check path.
    #[must_use]
    pub fn with_health_check_path(mut self, path: HealthCheckPath) -> Self {
        self.health_check_path = Some(path);
        self
    }

    /// Sets whether pushes deploy automatically.
    #[must_use]
    pub const fn with_auto_deploy(mut self, auto_deploy: bool) -> Self {
        self.auto_deploy = auto_deploy;
        self
    }

    /// Appends a tracked branch.
    #[must_use]
    pub fn with_branch(mut self, branch: BranchSetting) -> Self {
        self.branches.push(branch);
        self
    }

    /// Sets whether pull requests get preview deployments.
    #[must_use]
    pub const fn with_pull_request_previews(mut self, enabled: bool) -> Self {
        self.pull_request_previews_enabled = Some(enabled);
        self
    }

    /// Builds the descriptor, enforcing the cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorDomainError`] when environment variable keys or
    /// branch names repeat, a `PORT` variable is not a port, a health check
    /// is set on a service type that is never probed, or the plan is not
    /// offered for the service type.
    pub fn build(self) -> Result<ServiceDescriptor, DescriptorDomainError> {
        let env_vars = EnvVars::new(self.env_vars)?;

        let mut seen = HashSet::with_capacity(self.branches.len());
        for branch in &self.branches {
            if !seen.insert(branch.name().as_str()) {
                return Err(DescriptorDomainError::DuplicateBranch(
                    branch.name().as_str().to_owned(),
                ));
            }
        }

        if self.health_check_path.is_some() && !self.service_type.supports_health_check() {
            return Err(DescriptorDomainError::HealthCheckNotSupported(
                self.service_type,
            ));
        }

        if !self.service_type.supports_plan(self.plan) {
            return Err(DescriptorDomainError::PlanNotAvailable {
                plan: self.plan,
                service_type: self.service_type,
            });
        }

        Ok(ServiceDescriptor {
            service_type: self.service_type,
            name: self.name,
            runtime: self.runtime,
            build_command: self.build_command,
            start_command: self.start_command,
            port: self.port,
            env_vars,
            health_check_path: self.health_check_path,
            auto_deploy: self.auto_deploy,
            plan: self.plan,
            branches: self.branches,
            pull_request_previews_enabled: self.pull_request_previews_enabled,
            region: self.region,
        })
    }
}

/// Hex-encoded SHA-256 digest identifying a descriptor revision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Computes the fingerprint of canonical bytes.
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(bytes)))
    }

    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
