//! Locations of values inside a descriptor document.

use std::fmt;

/// Dotted and indexed location of a value, e.g. `envVars[2].key`.
///
/// Paths use the wire names of fields so that operators can match a
/// violation to the line in their file.
///
/// # Examples
///
/// ```
/// use blueprint::descriptor::domain::FieldPath;
///
/// let path = FieldPath::root().field("envVars").index(2).field("key");
/// assert_eq!(path.as_str(), "envVars[2].key");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(String);

impl FieldPath {
    /// Returns the empty path denoting the document itself.
    #[must_use]
    pub const fn root() -> Self {
        Self(String::new())
    }

    /// Returns a path to the named top-level field.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self::root().field(name)
    }

    /// Returns the path to a child field of this path.
    #[must_use]
    pub fn field(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_owned())
        } else {
            Self(format!("{}.{name}", self.0))
        }
    }

    /// Returns the path to an element of the sequence at this path.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Returns this path nested under `prefix`.
    #[must_use]
    pub fn under(&self, prefix: &Self) -> Self {
        match (prefix.0.is_empty(), self.0.is_empty()) {
            (true, _) => self.clone(),
            (false, true) => prefix.clone(),
            (false, false) if self.0.starts_with('[') => Self(format!("{}{}", prefix.0, self.0)),
            (false, false) => Self(format!("{}.{}", prefix.0, self.0)),
        }
    }

    /// Returns `true` if this path denotes the document itself.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<document>")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl PartialEq<str> for FieldPath {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FieldPath {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
