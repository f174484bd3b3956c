//! Text codec for descriptor documents.
//!
//! Decoding produces the unvalidated wire documents; encoding takes the
//! validated domain types so that only schema-conforming text is ever
//! written.

use crate::descriptor::domain::{Blueprint, BlueprintDocument, ServiceDescriptor, ServiceDocument};
use camino::Utf8Path;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use thiserror::Error;

/// Structured text format of a descriptor file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Format {
    /// YAML, the platform's native format.
    #[default]
    Yaml,
    /// JSON.
    Json,
}

impl Format {
    /// Infers the format from a file extension (`.yaml`, `.yml`, `.json`).
    ///
    /// # Examples
    ///
    /// ```
    /// use blueprint::descriptor::adapters::codec::Format;
    /// use camino::Utf8Path;
    ///
    /// assert_eq!(Format::from_path(Utf8Path::new("render.yaml")), Some(Format::Yaml));
    /// assert_eq!(Format::from_path(Utf8Path::new("service.JSON")), Some(Format::Json));
    /// assert_eq!(Format::from_path(Utf8Path::new("README")), None);
    /// ```
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        let extension = path.extension()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while decoding or encoding descriptor text.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The text is not well-formed YAML or does not fit the document shape.
    #[error("malformed yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The text is not well-formed JSON or does not fit the document shape.
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decodes a single service document.
///
/// # Errors
///
/// Returns [`CodecError`] when the text is not well-formed or a field has
/// the wrong shape (for example a list where a string is expected).
pub fn decode_service(text: &str, format: Format) -> Result<ServiceDocument, CodecError> {
    decode(text, format)
}

/// Decodes a blueprint document.
///
/// # Errors
///
/// Returns [`CodecError`] when the text is not well-formed.
pub fn decode_blueprint(text: &str, format: Format) -> Result<BlueprintDocument, CodecError> {
    decode(text, format)
}

/// Encodes a validated service descriptor in canonical form.
///
/// # Errors
///
/// Returns [`CodecError`] if serialization fails.
pub fn encode_service(descriptor: &ServiceDescriptor, format: Format) -> Result<String, CodecError> {
    encode(descriptor, format)
}

/// Encodes a validated blueprint in canonical form.
///
/// # Errors
///
/// Returns [`CodecError`] if serialization fails.
pub fn encode_blueprint(blueprint: &Blueprint, format: Format) -> Result<String, CodecError> {
    encode(blueprint, format)
}

fn decode<T: DeserializeOwned>(text: &str, format: Format) -> Result<T, CodecError> {
    match format {
        Format::Yaml => Ok(serde_yaml::from_str(text)?),
        Format::Json => Ok(serde_json::from_str(text)?),
    }
}

fn encode<T: Serialize>(value: &T, format: Format) -> Result<String, CodecError> {
    match format {
        Format::Yaml => Ok(serde_yaml::to_string(value)?),
        Format::Json => {
            let mut text = serde_json::to_string_pretty(value)?;
            text.push('\n');
            Ok(text)
        }
    }
}
