//! Unit tests for the YAML and JSON codec.

use super::fixtures::{SEEDMART_YAML, default_validator, seedmart_document};
use crate::descriptor::{
    adapters::codec::{self, CodecError, Format},
    domain::{FieldPath, ServiceDocument, ServiceType},
    error::SchemaViolation,
    ports::validator::DescriptorValidator,
    validation::service::DefaultDescriptorValidator,
};
use rstest::rstest;
use serde_yaml::Value;

#[rstest]
fn decodes_deploy_file_fields(default_validator: DefaultDescriptorValidator) {
    let document = codec::decode_service(SEEDMART_YAML, Format::Yaml).expect("well-formed yaml");

    assert_eq!(document.service_type.as_deref(), Some("web"));
    assert_eq!(document.health_check_path.as_deref(), Some("/api/health"));
    assert_eq!(document.port, Some(Value::from(5000)));
    assert!(document.extra.is_empty());

    let descriptor = default_validator
        .validate(&document)
        .expect("valid descriptor");
    assert_eq!(descriptor.env_vars().len(), 3);
}

#[rstest]
fn legacy_env_key_is_read_as_runtime() {
    let text = "type: web\nname: api\nenv: node\nplan: free\nregion: ohio\n";
    let document = codec::decode_service(text, Format::Yaml).expect("well-formed yaml");
    assert_eq!(document.runtime.as_deref(), Some("node"));
}

#[rstest]
fn unknown_keys_are_kept_for_reporting() {
    let text = "type: web\nname: api\nruntime: node\nplan: free\nregion: ohio\ncolour: green\n";
    let document = codec::decode_service(text, Format::Yaml).expect("well-formed yaml");
    assert_eq!(
        document.extra.get("colour"),
        Some(&Value::String("green".to_owned()))
    );
}

#[rstest]
#[case(Format::Yaml, "type: [web\n")]
#[case(Format::Json, "{\"type\": ")]
fn malformed_text_is_a_codec_error(#[case] format: Format, #[case] text: &str) {
    let result = codec::decode_service(text, format);
    match format {
        Format::Yaml => assert!(matches!(result, Err(CodecError::Yaml(_)))),
        Format::Json => assert!(matches!(result, Err(CodecError::Json(_)))),
    }
}

#[rstest]
#[case(Format::Yaml, "type: web\nname: api\nruntime: node\nplan: starter\nport: \"5000\"\nautoDeploy: sometimes\n")]
#[case(Format::Json, r#"{"type":"web","name":"api","runtime":"node","plan":"starter","port":"5000","autoDeploy":"sometimes"}"#)]
fn mistyped_scalars_are_reported_with_other_violations(
    default_validator: DefaultDescriptorValidator,
    #[case] format: Format,
    #[case] text: &str,
) {
    let document = codec::decode_service(text, format).expect("mistyped scalars still decode");

    let violation = default_validator
        .validate(&document)
        .expect_err("port, autoDeploy and region are wrong");
    assert!(violation.names_field("region"));
    assert!(violation.violations().contains(&SchemaViolation::InvalidType {
        field: FieldPath::named("port"),
        expected: "an integer port",
        found: "5000".to_owned(),
    }));
    assert!(violation.violations().contains(&SchemaViolation::InvalidType {
        field: FieldPath::named("autoDeploy"),
        expected: "a boolean",
        found: "sometimes".to_owned(),
    }));
}

#[rstest]
fn mistyped_env_var_flag_names_the_flag(default_validator: DefaultDescriptorValidator) {
    let text = "type: web\nname: api\nruntime: node\nplan: starter\nregion: ohio\n\
                envVars:\n  - key: SECRET_KEY\n    generateValue: \"yes\"\n";
    let document = codec::decode_service(text, Format::Yaml).expect("well-formed yaml");

    let violation = default_validator
        .validate(&document)
        .expect_err("generateValue is text");
    assert!(violation.names_field("envVars[0].generateValue"));
}

#[rstest]
#[case(Format::Yaml, "type: web\nname: api\nruntime: node\nplan: starter\nregion: ohio\nenvVars:\n  - key: FLASK_ENV\n    value: null\n")]
#[case(Format::Json, r#"{"type":"web","name":"api","runtime":"node","plan":"starter","region":"ohio","envVars":[{"key":"FLASK_ENV","value":null}]}"#)]
fn explicit_null_env_value_is_rejected_as_null(
    default_validator: DefaultDescriptorValidator,
    #[case] format: Format,
    #[case] text: &str,
) {
    let document = codec::decode_service(text, format).expect("well-formed document");
    let declared = document
        .env_vars
        .as_deref()
        .and_then(<[_]>::first)
        .and_then(|var| var.value.clone());
    assert_eq!(declared, Some(Value::Null));

    assert_eq!(
        default_validator.validate(&document),
        Err(SchemaViolation::InvalidEnvVarSource {
            field: FieldPath::root().field("envVars").index(0).field("value"),
            reason: "value must not be null".to_owned(),
        })
    );
}

#[rstest]
#[case(Format::Yaml)]
#[case(Format::Json)]
fn valid_descriptor_survives_encoding(
    default_validator: DefaultDescriptorValidator,
    seedmart_document: ServiceDocument,
    #[case] format: Format,
) {
    let descriptor = default_validator
        .validate(&seedmart_document)
        .expect("valid descriptor");

    let text = codec::encode_service(&descriptor, format).expect("encodable");
    let decoded = codec::decode_service(&text, format).expect("re-decodable");
    let reparsed = default_validator
        .validate(&decoded)
        .expect("canonical form is valid");

    assert_eq!(reparsed, descriptor);
    assert_eq!(
        reparsed.fingerprint().expect("serializable"),
        descriptor.fingerprint().expect("serializable")
    );
}

#[rstest]
fn encoding_writes_wire_names(
    default_validator: DefaultDescriptorValidator,
    seedmart_document: ServiceDocument,
) {
    let descriptor = default_validator
        .validate(&seedmart_document)
        .expect("valid descriptor");

    let text = codec::encode_service(&descriptor, Format::Yaml).expect("encodable");
    assert!(text.contains("type: web"));
    assert!(text.contains("healthCheckPath: /api/health"));
    assert!(text.contains("generateValue: true"));
    assert!(text.contains("autoDeploy: true"));
    assert!(!text.contains("branches"));
}

#[rstest]
fn json_output_ends_with_newline(
    default_validator: DefaultDescriptorValidator,
    seedmart_document: ServiceDocument,
) {
    let descriptor = default_validator
        .validate(&seedmart_document)
        .expect("valid descriptor");
    let text = codec::encode_service(&descriptor, Format::Json).expect("encodable");
    assert!(text.ends_with("}\n"));

    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(value.get("type").and_then(serde_json::Value::as_str), Some("web"));
}

#[rstest]
fn service_type_serializes_as_wire_value() {
    let text = serde_json::to_string(&ServiceType::PrivateService).expect("serializable");
    assert_eq!(text, "\"pserv\"");
}

#[rstest]
#[case("render.yaml", Some(Format::Yaml))]
#[case("render.YML", Some(Format::Yaml))]
#[case("service.json", Some(Format::Json))]
#[case("service.toml", None)]
#[case("Procfile", None)]
fn format_follows_extension(#[case] name: &str, #[case] expected: Option<Format>) {
    assert_eq!(Format::from_path(camino::Utf8Path::new(name)), expected);
}
