//! Unit tests for the descriptor loader service.

use super::fixtures::SEEDMART_YAML;
use crate::descriptor::{
    adapters::{
        codec::{CodecError, Format},
        memory::InMemoryDescriptorSource,
    },
    domain::Region,
    ports::{
        source::{MockDescriptorSource, SourceError},
        validator::ValidationConfig,
    },
    services::{DescriptorError, DescriptorLoader},
    validation::service::DefaultDescriptorValidator,
};
use mockall::predicate::eq;
use rstest::{fixture, rstest};
use std::sync::Arc;

const BLUEPRINT_YAML: &str = "\
services:
  - type: web
    name: seedmart-api
    runtime: python
    plan: starter
    region: oregon
    envVars:
      - key: DATABASE_URL
        fromDatabase:
          name: seedmart-db
          property: connectionString
databases:
  - name: seedmart-db
    plan: starter
";

#[fixture]
fn memory_source() -> InMemoryDescriptorSource {
    let source = InMemoryDescriptorSource::new();
    source
        .insert("render.yaml", SEEDMART_YAML)
        .expect("insert descriptor");
    source
        .insert("blueprint.yaml", BLUEPRINT_YAML)
        .expect("insert blueprint");
    source
}

// ============================================================================
// In-memory source
// ============================================================================

#[rstest]
fn loads_service_from_memory(memory_source: InMemoryDescriptorSource) {
    let loader = DescriptorLoader::new(Arc::new(memory_source));
    let descriptor = loader.load_service("render.yaml").expect("valid descriptor");
    assert_eq!(descriptor.name().as_str(), "seedmart-api");
    assert_eq!(descriptor.region(), Region::Oregon);
}

#[rstest]
fn loads_blueprint_from_memory(memory_source: InMemoryDescriptorSource) {
    let loader = DescriptorLoader::new(Arc::new(memory_source));
    let blueprint = loader
        .load_blueprint("blueprint.yaml")
        .expect("valid blueprint");
    assert_eq!(blueprint.services().len(), 1);
    assert_eq!(blueprint.databases().len(), 1);
}

#[rstest]
fn missing_document_is_a_source_error(memory_source: InMemoryDescriptorSource) {
    let loader = DescriptorLoader::new(Arc::new(memory_source));
    let err = loader
        .load_service("absent.yaml")
        .expect_err("nothing stored under that name");
    assert!(matches!(
        err,
        DescriptorError::Source(SourceError::NotFound(ref name)) if name == "absent.yaml"
    ));
    assert!(err.violation().is_none());
}

#[rstest]
fn schema_failure_exposes_the_violation() {
    let source = InMemoryDescriptorSource::new();
    source
        .insert("render.yaml", "type: web\nname: api\nruntime: python\nplan: ultra\n")
        .expect("insert descriptor");
    let loader = DescriptorLoader::new(Arc::new(source));

    let err = loader
        .load_service("render.yaml")
        .expect_err("plan and region are wrong");
    let violation = err.violation().expect("schema violation");
    assert!(violation.names_field("plan"));
    assert!(violation.names_field("region"));
}

#[rstest]
fn loader_uses_configured_validator() {
    let source = InMemoryDescriptorSource::new();
    source
        .insert(
            "render.yaml",
            "type: web\nname: api\nruntime: python\nplan: starter\nregion: ohio\nextra: 1\n",
        )
        .expect("insert descriptor");
    let source = Arc::new(source);

    let default = DescriptorLoader::new(Arc::clone(&source));
    assert!(default.load_service("render.yaml").is_err());

    let lenient = DescriptorLoader::with_validator(
        source,
        DefaultDescriptorValidator::with_config(ValidationConfig::lenient()),
    );
    assert!(lenient.validator().config().allow_unknown_fields);
    assert!(lenient.load_service("render.yaml").is_ok());
}

// ============================================================================
// Mocked source
// ============================================================================

#[rstest]
fn format_is_inferred_from_the_name() {
    let mut source = MockDescriptorSource::new();
    source
        .expect_read()
        .with(eq("service.json"))
        .times(1)
        .returning(|_| {
            Ok(r#"{"type":"worker","name":"mailer","runtime":"go","plan":"standard","region":"singapore"}"#
                .to_owned())
        });

    let loader = DescriptorLoader::new(Arc::new(source));
    let descriptor = loader.load_service("service.json").expect("valid descriptor");
    assert_eq!(descriptor.region(), Region::Singapore);
}

#[rstest]
fn format_override_wins_over_the_name() {
    let mut source = MockDescriptorSource::new();
    source
        .expect_read()
        .times(1)
        .returning(|_| Ok("type: web\nname: api\nruntime: node\nplan: free\nregion: ohio\n".to_owned()));

    let loader = DescriptorLoader::new(Arc::new(source)).with_format(Format::Json);
    let err = loader
        .load_service("render.yaml")
        .expect_err("yaml is not json");
    assert!(matches!(err, DescriptorError::Codec(CodecError::Json(_))));
}

#[rstest]
fn unavailable_source_is_propagated() {
    let mut source = MockDescriptorSource::new();
    source
        .expect_read()
        .returning(|_| Err(SourceError::Unavailable("backend offline".to_owned())));

    let loader = DescriptorLoader::new(Arc::new(source));
    assert!(matches!(
        loader.load_blueprint("render.yaml"),
        Err(DescriptorError::Source(SourceError::Unavailable(_)))
    ));
}

#[rstest]
fn parse_service_skips_the_source() {
    let source = MockDescriptorSource::new();
    let loader = DescriptorLoader::new(Arc::new(source));
    let descriptor = loader
        .parse_service(SEEDMART_YAML, Format::Yaml)
        .expect("valid descriptor");
    assert_eq!(descriptor.effective_port().map(|port| port.get()), Some(5000));
}
