//! Unit tests for typed descriptor values.

use crate::descriptor::domain::{
    BranchName, BranchSetting, DatabaseProperty, DatabaseReference, DescriptorDomainError, EnvVar,
    EnvVarKey, EnvVarSource, EnvVars, FieldPath, HealthCheckPath, Plan, Port, Region,
    ResourceName, Runtime, ServiceDescriptor, ServiceDescriptorBuilder, ServiceType, ShellCommand,
};
use rstest::{fixture, rstest};

// ============================================================================
// Fixtures
// ============================================================================

#[fixture]
fn seedmart_name() -> ResourceName {
    ResourceName::new("seedmart-api").expect("valid name")
}

fn web_builder(name: ResourceName) -> ServiceDescriptorBuilder {
    ServiceDescriptor::builder(
        ServiceType::Web,
        name,
        Runtime::Python,
        Plan::Starter,
        Region::Oregon,
    )
}

// ============================================================================
// Enumerated fields
// ============================================================================

#[rstest]
#[case("web", ServiceType::Web)]
#[case("worker", ServiceType::Worker)]
#[case("pserv", ServiceType::PrivateService)]
#[case("cron", ServiceType::Cron)]
fn service_type_parses_wire_values(#[case] wire: &str, #[case] expected: ServiceType) {
    assert_eq!(ServiceType::try_from(wire), Ok(expected));
    assert_eq!(expected.as_str(), wire);
}

#[rstest]
#[case("Starter")]
#[case("STARTER")]
#[case("ultra")]
#[case("")]
fn plan_rejects_values_outside_the_enum(#[case] wire: &str) {
    let err = Plan::try_from(wire).expect_err("not an accepted plan");
    assert_eq!(err.kind(), "plan");
    assert_eq!(err.value(), wire);
    assert_eq!(err.expected(), Plan::VALUES);
}

#[rstest]
fn region_lists_every_data_center() {
    assert_eq!(Region::VALUES, ["oregon", "frankfurt", "ohio", "singapore"]);
}

#[rstest]
fn enums_parse_through_from_str() {
    let runtime: Runtime = "python".parse().expect("known runtime");
    assert_eq!(runtime, Runtime::Python);
    assert_eq!(Runtime::Docker.to_string(), "docker");
}

#[rstest]
#[case(ServiceType::Web, true)]
#[case(ServiceType::Worker, false)]
#[case(ServiceType::PrivateService, false)]
#[case(ServiceType::Cron, false)]
fn only_web_services_are_health_checked(#[case] service_type: ServiceType, #[case] expected: bool) {
    assert_eq!(service_type.supports_health_check(), expected);
}

#[rstest]
#[case(ServiceType::Web, Plan::Free, true)]
#[case(ServiceType::Worker, Plan::Free, false)]
#[case(ServiceType::Cron, Plan::Free, false)]
#[case(ServiceType::Worker, Plan::Starter, true)]
#[case(ServiceType::PrivateService, Plan::Plus, true)]
fn free_plan_is_limited_to_web(
    #[case] service_type: ServiceType,
    #[case] plan: Plan,
    #[case] expected: bool,
) {
    assert_eq!(service_type.supports_plan(plan), expected);
}

#[rstest]
fn container_runtimes_do_not_use_commands() {
    assert!(!Runtime::Docker.uses_commands());
    assert!(!Runtime::Image.uses_commands());
    assert!(Runtime::Python.uses_commands());
}

#[rstest]
fn database_property_uses_camel_case_wire_value() {
    assert_eq!(
        DatabaseProperty::try_from("connectionString"),
        Ok(DatabaseProperty::ConnectionString)
    );
    assert!(DatabaseProperty::try_from("connection_string").is_err());
}

// ============================================================================
// Scalar values
// ============================================================================

#[rstest]
#[case("")]
#[case("   ")]
fn resource_name_rejects_blank(#[case] raw: &str) {
    assert_eq!(ResourceName::new(raw), Err(DescriptorDomainError::EmptyValue));
}

#[rstest]
fn resource_name_counts_characters_not_bytes() {
    let name = ResourceName::new("café").expect("valid name");
    assert_eq!(name.char_count(), 4);
}

#[rstest]
fn shell_command_rejects_blank() {
    assert!(ShellCommand::new(" ").is_err());
    assert_eq!(
        ShellCommand::new("gunicorn app:app").map(|command| command.to_string()),
        Ok("gunicorn app:app".to_owned())
    );
}

#[rstest]
#[case("/api/health", true)]
#[case("/", true)]
#[case("api/health", false)]
#[case("/api/ health", false)]
#[case("", false)]
fn health_check_path_must_be_absolute_without_spaces(#[case] raw: &str, #[case] valid: bool) {
    assert_eq!(HealthCheckPath::new(raw).is_ok(), valid);
}

#[rstest]
#[case(1, true)]
#[case(5000, true)]
#[case(65_535, true)]
#[case(0, false)]
#[case(-1, false)]
#[case(65_536, false)]
fn port_accepts_only_the_tcp_range(#[case] value: i64, #[case] valid: bool) {
    assert_eq!(Port::new(value).is_ok(), valid);
}

#[rstest]
fn port_parse_distinguishes_text_from_range_errors() {
    assert_eq!(
        Port::parse("http"),
        Err(DescriptorDomainError::InvalidPort("http".to_owned()))
    );
    assert_eq!(
        Port::parse("70000"),
        Err(DescriptorDomainError::PortOutOfRange(70_000))
    );
    assert_eq!(Port::parse(" 5000 ").map(Port::get), Ok(5000));
}

#[rstest]
fn branch_name_rejects_whitespace() {
    assert_eq!(
        BranchName::new("feature branch"),
        Err(DescriptorDomainError::InvalidBranchName(
            "feature branch".to_owned()
        ))
    );
    assert_eq!(BranchName::new(""), Err(DescriptorDomainError::EmptyValue));
}

// ============================================================================
// Environment variables
// ============================================================================

#[rstest]
#[case("DATABASE_URL", true)]
#[case("_HIDDEN", true)]
#[case("port", true)]
#[case("1PORT", false)]
#[case("SECRET-KEY", false)]
#[case("FLASK ENV", false)]
fn env_var_key_must_be_identifier(#[case] raw: &str, #[case] valid: bool) {
    assert_eq!(EnvVarKey::new(raw).is_ok(), valid);
}

#[rstest]
fn env_var_source_exposes_only_literal_values() {
    let reference = DatabaseReference::new(
        ResourceName::new("seedmart-db").expect("valid name"),
        DatabaseProperty::ConnectionString,
    );
    assert_eq!(
        EnvVarSource::Value("production".to_owned()).literal(),
        Some("production")
    );
    assert_eq!(EnvVarSource::Generated.literal(), None);
    assert_eq!(EnvVarSource::Unsynced.literal(), None);
    assert_eq!(EnvVarSource::FromDatabase(reference).literal(), None);
}

#[rstest]
fn env_vars_preserve_declaration_order() {
    let vars = EnvVars::new(vec![
        EnvVar::literal("FLASK_ENV", "production").expect("valid key"),
        EnvVar::new(
            EnvVarKey::new("SECRET_KEY").expect("valid key"),
            EnvVarSource::Generated,
        ),
    ])
    .expect("unique keys");

    let keys: Vec<&str> = vars.iter().map(|var| var.key().as_str()).collect();
    assert_eq!(keys, ["FLASK_ENV", "SECRET_KEY"]);
    assert!(vars.get("SECRET_KEY").is_some());
    assert!(vars.get("MISSING").is_none());
}

#[rstest]
fn env_vars_reject_duplicate_keys() {
    let result = EnvVars::new(vec![
        EnvVar::literal("FLASK_ENV", "production").expect("valid key"),
        EnvVar::literal("FLASK_ENV", "development").expect("valid key"),
    ]);
    assert_eq!(
        result,
        Err(DescriptorDomainError::DuplicateEnvVarKey(
            "FLASK_ENV".to_owned()
        ))
    );
}

#[rstest]
fn env_vars_reject_invalid_port_literal() {
    let result = EnvVars::new(vec![EnvVar::literal("PORT", "0").expect("valid key")]);
    assert_eq!(result, Err(DescriptorDomainError::PortOutOfRange(0)));
}

// ============================================================================
// Field paths
// ============================================================================

#[rstest]
fn field_path_renders_nested_locations() {
    let path = FieldPath::named("envVars").index(2).field("key");
    assert_eq!(path, "envVars[2].key");
    assert_eq!(path.to_string(), "envVars[2].key");
}

#[rstest]
#[case(FieldPath::named("plan"), "services[1].plan")]
#[case(FieldPath::root().index(0), "services[1][0]")]
#[case(FieldPath::root(), "services[1]")]
fn field_path_nests_under_prefix(#[case] path: FieldPath, #[case] expected: &str) {
    let prefix = FieldPath::named("services").index(1);
    assert_eq!(path.under(&prefix), expected);
}

#[rstest]
fn root_path_displays_as_document() {
    assert!(FieldPath::root().is_root());
    assert_eq!(FieldPath::root().to_string(), "<document>");
}

// ============================================================================
// Service descriptor
// ============================================================================

#[rstest]
fn builder_defaults_auto_deploy_to_true(seedmart_name: ResourceName) {
    let descriptor = web_builder(seedmart_name).build().expect("valid descriptor");
    assert!(descriptor.auto_deploy());
    assert!(descriptor.env_vars().is_empty());
    assert!(descriptor.branches().is_empty());
    assert_eq!(descriptor.pull_request_previews_enabled(), None);
}

#[rstest]
fn effective_port_falls_back_to_port_variable(seedmart_name: ResourceName) {
    let descriptor = web_builder(seedmart_name)
        .with_env_var(EnvVar::literal("PORT", "5000").expect("valid key"))
        .build()
        .expect("valid descriptor");
    assert_eq!(descriptor.port(), None);
    assert_eq!(descriptor.effective_port().map(Port::get), Some(5000));
}

#[rstest]
fn explicit_port_takes_precedence(seedmart_name: ResourceName) {
    let descriptor = web_builder(seedmart_name)
        .with_port(Port::new(8000).expect("valid port"))
        .with_env_var(EnvVar::literal("PORT", "5000").expect("valid key"))
        .build()
        .expect("valid descriptor");
    assert_eq!(descriptor.effective_port().map(Port::get), Some(8000));
}

#[rstest]
fn builder_rejects_health_check_on_worker(seedmart_name: ResourceName) {
    let result = ServiceDescriptor::builder(
        ServiceType::Worker,
        seedmart_name,
        Runtime::Python,
        Plan::Starter,
        Region::Oregon,
    )
    .with_health_check_path(HealthCheckPath::new("/api/health").expect("valid path"))
    .build();
    assert_eq!(
        result,
        Err(DescriptorDomainError::HealthCheckNotSupported(
            ServiceType::Worker
        ))
    );
}

#[rstest]
fn builder_rejects_free_cron_job(seedmart_name: ResourceName) {
    let result = ServiceDescriptor::builder(
        ServiceType::Cron,
        seedmart_name,
        Runtime::Python,
        Plan::Free,
        Region::Ohio,
    )
    .build();
    assert_eq!(
        result,
        Err(DescriptorDomainError::PlanNotAvailable {
            plan: Plan::Free,
            service_type: ServiceType::Cron,
        })
    );
}

#[rstest]
fn builder_rejects_duplicate_branches(seedmart_name: ResourceName) {
    let main = || BranchSetting::new(BranchName::new("main").expect("valid branch"), true);
    let result = web_builder(seedmart_name)
        .with_branch(main())
        .with_branch(main())
        .build();
    assert_eq!(
        result,
        Err(DescriptorDomainError::DuplicateBranch("main".to_owned()))
    );
}

#[rstest]
fn fingerprint_is_stable_and_sensitive_to_changes(seedmart_name: ResourceName) {
    let first = web_builder(seedmart_name.clone())
        .build()
        .expect("valid descriptor");
    let same = web_builder(seedmart_name.clone())
        .build()
        .expect("valid descriptor");
    let moved = ServiceDescriptor::builder(
        ServiceType::Web,
        seedmart_name,
        Runtime::Python,
        Plan::Starter,
        Region::Frankfurt,
    )
    .build()
    .expect("valid descriptor");

    let digest = first.fingerprint().expect("serializable");
    assert_eq!(digest, same.fingerprint().expect("serializable"));
    assert_ne!(digest, moved.fingerprint().expect("serializable"));
    assert_eq!(digest.as_str().len(), 64);
    assert!(digest.as_str().chars().all(|ch| ch.is_ascii_hexdigit()));
}
