//! Behavioural tests for service descriptor validation.

use blueprint::descriptor::{
    adapters::codec::{self, Format},
    domain::{ServiceDescriptor, ServiceDocument},
    error::SchemaViolation,
    ports::validator::{DescriptorValidator, ValidationConfig},
    validation::DefaultDescriptorValidator,
};
use eyre::{Result, ensure, eyre};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_yaml::Value;

const SEEDMART_YAML: &str = "\
type: web
name: seedmart-api
runtime: python
buildCommand: pip install -r requirements.txt
startCommand: gunicorn app:app
healthCheckPath: /api/health
plan: starter
region: oregon
envVars:
  - key: FLASK_ENV
    value: production
  - key: SECRET_KEY
    generateValue: true
  - key: PORT
    value: 5000
";

#[derive(Default)]
struct DescriptorWorld {
    document: Option<ServiceDocument>,
    config: ValidationConfig,
    descriptor: Option<ServiceDescriptor>,
    reparsed: Option<ServiceDescriptor>,
    violation: Option<SchemaViolation>,
}

impl DescriptorWorld {
    fn document_mut(&mut self) -> Result<&mut ServiceDocument> {
        self.document
            .as_mut()
            .ok_or_else(|| eyre!("no descriptor has been given"))
    }

    fn validator(&self) -> DefaultDescriptorValidator {
        DefaultDescriptorValidator::with_config(self.config.clone())
    }
}

#[fixture]
fn world() -> DescriptorWorld {
    DescriptorWorld::default()
}

// ============================================================================
// Given
// ============================================================================

#[given("the seedmart web service descriptor")]
fn seedmart_descriptor(world: &mut DescriptorWorld) -> Result<()> {
    world.document = Some(codec::decode_service(SEEDMART_YAML, Format::Yaml)?);
    Ok(())
}

#[given("the plan is set to ultra")]
fn plan_set_to_ultra(world: &mut DescriptorWorld) -> Result<()> {
    world.document_mut()?.plan = Some("ultra".to_owned());
    Ok(())
}

#[given("the region is removed")]
fn region_removed(world: &mut DescriptorWorld) -> Result<()> {
    world.document_mut()?.region = None;
    Ok(())
}

#[given("the environment variable {key} is declared twice")]
fn env_var_declared_twice(world: &mut DescriptorWorld, key: String) -> Result<()> {
    let env_vars = world
        .document_mut()?
        .env_vars
        .get_or_insert_with(Vec::new);
    let original = env_vars
        .iter()
        .find(|var| var.key.as_deref() == Some(key.as_str()))
        .cloned()
        .ok_or_else(|| eyre!("descriptor does not declare {key}"))?;
    env_vars.push(original);
    Ok(())
}

#[given("the descriptor has an unknown field {field}")]
fn unknown_field(world: &mut DescriptorWorld, field: String) -> Result<()> {
    world
        .document_mut()?
        .extra
        .insert(field, Value::String("green".to_owned()));
    Ok(())
}

#[given("the lenient validation profile")]
fn lenient_profile(world: &mut DescriptorWorld) {
    world.config = ValidationConfig::lenient();
}

// ============================================================================
// When
// ============================================================================

#[when("the descriptor is validated")]
fn descriptor_validated(world: &mut DescriptorWorld) -> Result<()> {
    let document = world
        .document
        .as_ref()
        .ok_or_else(|| eyre!("no descriptor has been given"))?;
    match world.validator().validate(document) {
        Ok(descriptor) => {
            world.descriptor = Some(descriptor);
            world.violation = None;
        }
        Err(violation) => {
            world.descriptor = None;
            world.violation = Some(violation);
        }
    }
    Ok(())
}

#[when("the descriptor is re-encoded as JSON and validated again")]
fn descriptor_reencoded(world: &mut DescriptorWorld) -> Result<()> {
    let descriptor = world
        .descriptor
        .as_ref()
        .ok_or_else(|| eyre!("descriptor was not accepted"))?;
    let text = codec::encode_service(descriptor, Format::Json)?;
    let document = codec::decode_service(&text, Format::Json)?;
    world.reparsed = Some(world.validator().validate(&document)?);
    Ok(())
}

// ============================================================================
// Then
// ============================================================================

#[then("the descriptor is accepted")]
fn descriptor_accepted(world: &DescriptorWorld) -> Result<()> {
    if let Some(violation) = &world.violation {
        return Err(eyre!("unexpected violation: {violation}"));
    }
    ensure!(world.descriptor.is_some(), "descriptor was not validated");
    Ok(())
}

#[then("the effective port is {port:u16}")]
fn effective_port(world: &DescriptorWorld, port: u16) -> Result<()> {
    let descriptor = world
        .descriptor
        .as_ref()
        .ok_or_else(|| eyre!("descriptor was not accepted"))?;
    let actual = descriptor.effective_port().map(|value| value.get());
    ensure!(
        actual == Some(port),
        "expected port {port}, found {actual:?}"
    );
    Ok(())
}

#[then("the descriptor is rejected")]
fn descriptor_rejected(world: &DescriptorWorld) -> Result<()> {
    ensure!(
        world.descriptor.is_none(),
        "descriptor was unexpectedly accepted"
    );
    ensure!(world.violation.is_some(), "no violation was recorded");
    Ok(())
}

#[then("the violation names the field {field}")]
fn violation_names_field(world: &DescriptorWorld, field: String) -> Result<()> {
    let violation = world
        .violation
        .as_ref()
        .ok_or_else(|| eyre!("expected a violation"))?;
    ensure!(
        violation.names_field(&field),
        "violation does not name {field}: {violation}"
    );
    Ok(())
}

#[then("both descriptors are identical")]
fn descriptors_identical(world: &DescriptorWorld) -> Result<()> {
    let original = world
        .descriptor
        .as_ref()
        .ok_or_else(|| eyre!("descriptor was not accepted"))?;
    let reparsed = world
        .reparsed
        .as_ref()
        .ok_or_else(|| eyre!("descriptor was not re-encoded"))?;
    ensure!(original == reparsed, "round trip changed the descriptor");
    ensure!(
        original.fingerprint()? == reparsed.fingerprint()?,
        "round trip changed the fingerprint"
    );
    Ok(())
}

// ============================================================================
// Scenarios
// ============================================================================

#[scenario(
    path = "tests/features/descriptor_validation.feature",
    name = "Seedmart web service passes validation"
)]
fn seedmart_passes(world: DescriptorWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/descriptor_validation.feature",
    name = "Unknown plan is rejected"
)]
fn unknown_plan_rejected(world: DescriptorWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/descriptor_validation.feature",
    name = "Missing region is rejected"
)]
fn missing_region_rejected(world: DescriptorWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/descriptor_validation.feature",
    name = "Duplicate environment variable is rejected"
)]
fn duplicate_env_var_rejected(world: DescriptorWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/descriptor_validation.feature",
    name = "Unknown fields are tolerated by the lenient profile"
)]
fn lenient_profile_tolerates_unknown_fields(world: DescriptorWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/descriptor_validation.feature",
    name = "Validated descriptors survive a JSON round trip"
)]
fn json_round_trip(world: DescriptorWorld) {
    let _ = world;
}
