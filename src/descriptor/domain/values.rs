//! Validated scalar newtypes.

use super::DescriptorDomainError;
use std::fmt;
use std::num::NonZeroU16;

/// Name of a service or database, unique within a blueprint.
///
/// # Examples
///
/// ```
/// use blueprint::descriptor::domain::ResourceName;
///
/// let name = ResourceName::new("seedmart-api").expect("valid name");
/// assert_eq!(name.as_str(), "seedmart-api");
/// assert!(ResourceName::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceName(String);

impl ResourceName {
    /// Creates a name, rejecting blank values.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorDomainError::EmptyValue`] when the value is empty
    /// or whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self, DescriptorDomainError> {
        let name = value.into();
        if name.trim().is_empty() {
            return Err(DescriptorDomainError::EmptyValue);
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the length of the name in characters.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shell command run by the platform, such as a build or start command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShellCommand(String);

impl ShellCommand {
    /// Creates a command, rejecting blank values.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorDomainError::EmptyValue`] when the command is
    /// empty or whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self, DescriptorDomainError> {
        let command = value.into();
        if command.trim().is_empty() {
            return Err(DescriptorDomainError::EmptyValue);
        }
        Ok(Self(command))
    }

    /// Returns the command text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// URL path probed by the platform to decide whether a web service is live.
///
/// # Examples
///
/// ```
/// use blueprint::descriptor::domain::HealthCheckPath;
///
/// assert!(HealthCheckPath::new("/api/health").is_ok());
/// assert!(HealthCheckPath::new("api/health").is_err());
/// assert!(HealthCheckPath::new("/api/ health").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HealthCheckPath(String);

impl HealthCheckPath {
    /// Creates a health check path.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorDomainError::InvalidHealthCheckPath`] unless the
    /// value starts with `/` and contains no whitespace or control
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, DescriptorDomainError> {
        let path = value.into();
        let well_formed = path.starts_with('/')
            && !path
                .chars()
                .any(|ch| ch.is_whitespace() || ch.is_control());
        if !well_formed {
            return Err(DescriptorDomainError::InvalidHealthCheckPath(path));
        }
        Ok(Self(path))
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HealthCheckPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// TCP port in the range 1–65535.
///
/// # Examples
///
/// ```
/// use blueprint::descriptor::domain::Port;
///
/// assert_eq!(Port::new(5000).map(Port::get), Ok(5000));
/// assert!(Port::new(0).is_err());
/// assert!(Port::new(65_536).is_err());
/// assert_eq!(Port::parse("8080").map(Port::get), Ok(8080));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Port(NonZeroU16);

impl Port {
    /// Creates a port from an integer read off the wire.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorDomainError::PortOutOfRange`] when the value is
    /// outside 1–65535.
    pub fn new(value: i64) -> Result<Self, DescriptorDomainError> {
        u16::try_from(value)
            .ok()
            .and_then(NonZeroU16::new)
            .map(Self)
            .ok_or(DescriptorDomainError::PortOutOfRange(value))
    }

    /// Parses a port from text, such as the value of a `PORT` variable.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorDomainError::InvalidPort`] when the text is not an
    /// integer, or [`DescriptorDomainError::PortOutOfRange`] when it is out
    /// of range.
    pub fn parse(value: &str) -> Result<Self, DescriptorDomainError> {
        let number = value
            .trim()
            .parse::<i64>()
            .map_err(|_| DescriptorDomainError::InvalidPort(value.to_owned()))?;
        Self::new(number)
    }

    /// Returns the port number.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0.get()
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a git branch the platform tracks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    /// Creates a branch name.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorDomainError::EmptyValue`] for blank names and
    /// [`DescriptorDomainError::InvalidBranchName`] for names containing
    /// whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, DescriptorDomainError> {
        let name = value.into();
        if name.trim().is_empty() {
            return Err(DescriptorDomainError::EmptyValue);
        }
        if name.chars().any(char::is_whitespace) {
            return Err(DescriptorDomainError::InvalidBranchName(name));
        }
        Ok(Self(name))
    }

    /// Returns the branch name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deploy settings for one tracked branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchSetting {
    name: BranchName,
    auto_deploy: bool,
}

impl BranchSetting {
    /// Creates a branch setting.
    #[must_use]
    pub const fn new(name: BranchName, auto_deploy: bool) -> Self {
        Self { name, auto_deploy }
    }

    /// Returns the branch name.
    #[must_use]
    pub const fn name(&self) -> &BranchName {
        &self.name
    }

    /// Returns whether pushes to this branch deploy automatically.
    #[must_use]
    pub const fn auto_deploy(&self) -> bool {
        self.auto_deploy
    }
}
