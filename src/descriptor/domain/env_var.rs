//! Environment variables injected into a service.

use super::{DatabaseProperty, DescriptorDomainError, Port, ResourceName};
use std::collections::HashSet;
use std::fmt;

/// Key of the variable the platform uses to tell a web process which port to
/// bind.
pub const PORT_VARIABLE: &str = "PORT";

/// Environment variable name matching `[A-Za-z_][A-Za-z0-9_]*`.
///
/// # Examples
///
/// ```
/// use blueprint::descriptor::domain::EnvVarKey;
///
/// assert!(EnvVarKey::new("DATABASE_URL").is_ok());
/// assert!(EnvVarKey::new("_PRIVATE").is_ok());
/// assert!(EnvVarKey::new("9LIVES").is_err());
/// assert!(EnvVarKey::new("SECRET-KEY").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnvVarKey(String);

impl EnvVarKey {
    /// Creates a key.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorDomainError::EmptyValue`] for an empty key and
    /// [`DescriptorDomainError::InvalidEnvVarKey`] when the key is not an
    /// identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, DescriptorDomainError> {
        let key = value.into();
        let mut chars = key.chars();
        let Some(first) = chars.next() else {
            return Err(DescriptorDomainError::EmptyValue);
        };
        let valid = (first.is_ascii_alphabetic() || first == '_')
            && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        if !valid {
            return Err(DescriptorDomainError::InvalidEnvVarKey(key));
        }
        Ok(Self(key))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnvVarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to an attribute of a database declared in the same blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatabaseReference {
    name: ResourceName,
    property: DatabaseProperty,
}

impl DatabaseReference {
    /// Creates a database reference.
    #[must_use]
    pub const fn new(name: ResourceName, property: DatabaseProperty) -> Self {
        Self { name, property }
    }

    /// Returns the referenced database name.
    #[must_use]
    pub const fn name(&self) -> &ResourceName {
        &self.name
    }

    /// Returns the injected property.
    #[must_use]
    pub const fn property(&self) -> DatabaseProperty {
        self.property
    }
}

/// Where the value of an environment variable comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnvVarSource {
    /// Literal value written in the descriptor.
    Value(String),
    /// Random secret generated by the platform on first deploy.
    Generated,
    /// Value entered out of band and never synced from the descriptor.
    Unsynced,
    /// Attribute of a database declared in the blueprint.
    FromDatabase(DatabaseReference),
}

impl EnvVarSource {
    /// Returns the literal value, if this source has one.
    #[must_use]
    pub fn literal(&self) -> Option<&str> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// One environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnvVar {
    key: EnvVarKey,
    source: EnvVarSource,
}

impl EnvVar {
    /// Creates an environment variable.
    #[must_use]
    pub const fn new(key: EnvVarKey, source: EnvVarSource) -> Self {
        Self { key, source }
    }

    /// Creates a variable with a literal value.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorDomainError`] when the key is invalid.
    pub fn literal(
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, DescriptorDomainError> {
        Ok(Self::new(
            EnvVarKey::new(key)?,
            EnvVarSource::Value(value.into()),
        ))
    }

    /// Returns the key.
    #[must_use]
    pub const fn key(&self) -> &EnvVarKey {
        &self.key
    }

    /// Returns the value source.
    #[must_use]
    pub const fn source(&self) -> &EnvVarSource {
        &self.source
    }
}

/// Ordered environment variables with unique keys.
///
/// # Examples
///
/// ```
/// use blueprint::descriptor::domain::{EnvVar, EnvVars};
///
/// let vars = EnvVars::new(vec![
///     EnvVar::literal("FLASK_ENV", "production").expect("valid key"),
///     EnvVar::literal("PORT", "5000").expect("valid key"),
/// ])
/// .expect("unique keys");
/// assert_eq!(vars.len(), 2);
/// assert_eq!(vars.port().map(|port| port.get()), Some(5000));
///
/// let duplicated = EnvVars::new(vec![
///     EnvVar::literal("PORT", "5000").expect("valid key"),
///     EnvVar::literal("PORT", "8000").expect("valid key"),
/// ]);
/// assert!(duplicated.is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EnvVars(Vec<EnvVar>);

impl EnvVars {
    /// Creates the collection, preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorDomainError::DuplicateEnvVarKey`] for the first
    /// repeated key, or the port error when a literal `PORT` value is not a
    /// valid port.
    pub fn new(vars: Vec<EnvVar>) -> Result<Self, DescriptorDomainError> {
        let mut seen = HashSet::with_capacity(vars.len());
        for var in &vars {
            if !seen.insert(var.key().as_str()) {
                return Err(DescriptorDomainError::DuplicateEnvVarKey(
                    var.key().as_str().to_owned(),
                ));
            }
            if var.key().as_str() == PORT_VARIABLE {
                if let Some(value) = var.source().literal() {
                    Port::parse(value)?;
                }
            }
        }
        Ok(Self(vars))
    }

    /// Returns the variable with `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&EnvVar> {
        self.0.iter().find(|var| var.key().as_str() == key)
    }

    /// Returns the port from a literal `PORT` variable, if one is set.
    #[must_use]
    pub fn port(&self) -> Option<Port> {
        self.get(PORT_VARIABLE)
            .and_then(|var| var.source().literal())
            .and_then(|value| Port::parse(value).ok())
    }

    /// Returns the variables in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &EnvVar> {
        self.0.iter()
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no variables are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a EnvVars {
    type Item = &'a EnvVar;
    type IntoIter = std::slice::Iter<'a, EnvVar>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
