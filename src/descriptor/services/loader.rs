//! Service layer that reads, decodes and validates descriptors.

use crate::descriptor::{
    adapters::codec::{self, CodecError, Format},
    domain::{Blueprint, ServiceDescriptor},
    error::SchemaViolation,
    ports::{DescriptorSource, DescriptorValidator, SourceError},
    validation::DefaultDescriptorValidator,
};
use camino::Utf8Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Service-level errors for descriptor loading.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The source could not provide the document.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// The text is not well-formed.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// The document does not conform to the schema.
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
}

impl DescriptorError {
    /// Returns the schema violation, if that is what failed.
    #[must_use]
    pub const fn violation(&self) -> Option<&SchemaViolation> {
        match self {
            Self::Schema(violation) => Some(violation),
            Self::Source(_) | Self::Codec(_) => None,
        }
    }
}

/// Result type for descriptor loading operations.
pub type DescriptorResult<T> = Result<T, DescriptorError>;

/// Loads descriptors from a source and validates them.
///
/// The text format is inferred from the document name's extension unless
/// fixed with [`DescriptorLoader::with_format`]; names without a known
/// extension are read as YAML.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use blueprint::descriptor::adapters::memory::InMemoryDescriptorSource;
/// use blueprint::descriptor::domain::Region;
/// use blueprint::descriptor::services::DescriptorLoader;
///
/// let source = InMemoryDescriptorSource::new();
/// source
///     .insert(
///         "render.yaml",
///         "type: web\nname: seedmart-api\nruntime: python\nplan: starter\nregion: oregon\n",
///     )
///     .expect("lock held");
///
/// let loader = DescriptorLoader::new(Arc::new(source));
/// let descriptor = loader.load_service("render.yaml").expect("valid descriptor");
/// assert_eq!(descriptor.region(), Region::Oregon);
/// ```
#[derive(Clone)]
pub struct DescriptorLoader<S, V = DefaultDescriptorValidator>
where
    S: DescriptorSource,
    V: DescriptorValidator,
{
    source: Arc<S>,
    validator: V,
    format: Option<Format>,
}

impl<S> DescriptorLoader<S>
where
    S: DescriptorSource,
{
    /// Creates a loader using the default validator.
    #[must_use]
    pub fn new(source: Arc<S>) -> Self {
        Self::with_validator(source, DefaultDescriptorValidator::new())
    }
}

impl<S, V> DescriptorLoader<S, V>
where
    S: DescriptorSource,
    V: DescriptorValidator,
{
    /// Creates a loader using a custom validator.
    #[must_use]
    pub const fn with_validator(source: Arc<S>, validator: V) -> Self {
        Self {
            source,
            validator,
            format: None,
        }
    }

    /// Reads every document as `format` regardless of its name.
    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Returns the validator in use.
    #[must_use]
    pub const fn validator(&self) -> &V {
        &self.validator
    }

    /// Loads and validates a single service descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError`] when the document cannot be read, is not
    /// well-formed, or violates the schema.
    pub fn load_service(&self, name: &str) -> DescriptorResult<ServiceDescriptor> {
        let text = self.source.read(name)?;
        self.parse_service(&text, self.format_of(name))
            .inspect_err(|err| warn!(document = name, error = %err, "descriptor rejected"))
    }

    /// Loads and validates a blueprint.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError`] when the document cannot be read, is not
    /// well-formed, or violates the schema.
    pub fn load_blueprint(&self, name: &str) -> DescriptorResult<Blueprint> {
        let text = self.source.read(name)?;
        self.parse_blueprint(&text, self.format_of(name))
            .inspect_err(|err| warn!(document = name, error = %err, "blueprint rejected"))
    }

    /// Decodes and validates a service descriptor from text.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::Codec`] for malformed text and
    /// [`DescriptorError::Schema`] for schema violations.
    pub fn parse_service(&self, text: &str, format: Format) -> DescriptorResult<ServiceDescriptor> {
        let document = codec::decode_service(text, format)?;
        let descriptor = self.validator.validate(&document)?;
        debug!(service = descriptor.name().as_str(), %format, "loaded service descriptor");
        Ok(descriptor)
    }

    /// Decodes and validates a blueprint from text.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::Codec`] for malformed text and
    /// [`DescriptorError::Schema`] for schema violations.
    pub fn parse_blueprint(&self, text: &str, format: Format) -> DescriptorResult<Blueprint> {
        let document = codec::decode_blueprint(text, format)?;
        let blueprint = self.validator.validate_blueprint(&document)?;
        debug!(services = blueprint.services().len(), %format, "loaded blueprint");
        Ok(blueprint)
    }

    fn format_of(&self, name: &str) -> Format {
        self.format
            .or_else(|| Format::from_path(Utf8Path::new(name)))
            .unwrap_or_default()
    }
}
