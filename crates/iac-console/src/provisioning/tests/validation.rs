use super::common::*;

use crate::provisioning::{
    RequestDefaults, ServiceKind, ServiceParams, ServiceRequest, ValidationError,
};

#[test]
fn every_kind_accepts_its_minimal_form() {
    let defaults = RequestDefaults::default();
    for kind in ServiceKind::ALL {
        let params = ServiceParams::validate(&minimal_request(kind), &defaults)
            .unwrap_or_else(|err| panic!("{kind} rejected its minimal form: {err}"));
        assert_eq!(params.kind(), kind);
        assert!(!params.inputs().is_empty(), "{kind} produced no inputs");
        assert!(!params.details().is_empty(), "{kind} produced no summary");
    }
}

#[test]
fn every_base_required_field_is_enforced() {
    let defaults = RequestDefaults::default();
    for kind in ServiceKind::ALL {
        for required in kind.descriptor().required_fields {
            let fields = minimal_fields(kind)
                .into_iter()
                .filter(|(name, _)| name != required);
            let request = ServiceRequest::new(kind, fields);

            match ServiceParams::validate(&request, &defaults) {
                Err(ValidationError::MissingFields { fields }) => {
                    assert_eq!(fields, vec![*required], "{kind} reported the wrong field")
                }
                other => panic!("expected {kind} to require {required}, got {other:?}"),
            }
        }
    }
}

#[test]
fn whitespace_only_values_count_as_missing() {
    let request = ServiceRequest::new(ServiceKind::Vpc, [("vpc_name", "   ")]);
    let err = ServiceParams::validate(&request, &RequestDefaults::default())
        .expect_err("blank name");
    assert_eq!(err.to_string(), "missing required fields: vpc_name");
}

#[test]
fn double_hyphen_bucket_is_rejected_even_when_otherwise_valid() {
    let err = ServiceParams::validate(&s3_request("my--site"), &RequestDefaults::default())
        .expect_err("double hyphen");
    assert_eq!(
        err,
        ValidationError::ForbiddenSequence {
            field: "bucket_name",
            forbidden: "--"
        }
    );
}

#[test]
fn bucket_name_is_lowercased_before_format_checks() {
    let params = ServiceParams::validate(&s3_request("My-Site"), &RequestDefaults::default())
        .expect("mixed case accepted");
    assert_eq!(params.inputs().get("bucket_name"), Some("my-site"));
}

#[test]
fn short_password_reports_length_rule() {
    let err = ServiceParams::validate(&rds_request("1234567"), &RequestDefaults::default())
        .expect_err("short password");
    assert_eq!(err.to_string(), "password must be at least 8 characters");
    assert_eq!(err.field(), Some("password"));
}

#[test]
fn first_failing_rule_wins() {
    // Both the name and the environment are invalid; the name is checked first.
    let request = ServiceRequest::new(
        ServiceKind::Ec2,
        [
            ("instance_name", "web 01"),
            ("instance_os", "ubuntu"),
            ("instance_size", "t3.micro"),
            ("instance_env", "qa"),
        ],
    );
    let err = ServiceParams::validate(&request, &RequestDefaults::default())
        .expect_err("invalid ec2");
    assert_eq!(err.field(), Some("instance_name"));

    let request = ServiceRequest::new(
        ServiceKind::Ec2,
        [
            ("instance_name", "web-01"),
            ("instance_os", "ubuntu"),
            ("instance_size", "t3.micro"),
            ("instance_env", "qa"),
        ],
    );
    match ServiceParams::validate(&request, &RequestDefaults::default()) {
        Err(ValidationError::MissingPrefix { field, prefix, .. }) => {
            assert_eq!(field, "instance_os");
            assert_eq!(prefix, "ami-");
        }
        other => panic!("expected missing ami prefix, got {other:?}"),
    }
}

#[test]
fn pipeline_environments_differ_from_instance_environments() {
    let mut fields = minimal_fields(ServiceKind::CodeBuild);
    fields.retain(|(name, _)| *name != "environment");
    fields.push(("environment", "preprod"));

    let err = ServiceParams::validate(
        &ServiceRequest::new(ServiceKind::CodeBuild, fields),
        &RequestDefaults::default(),
    )
    .expect_err("preprod not allowed");
    assert_eq!(
        err.to_string(),
        "invalid environment: 'preprod' (expected one of dev, staging, prod)"
    );
}

#[test]
fn toggles_are_encoded_as_string_literals() {
    let params = ServiceParams::validate(&rds_request("long-enough"), &RequestDefaults::default())
        .expect("valid rds");
    let inputs = params.inputs();
    assert_eq!(inputs.get("multi_az"), Some("true"));

    let params = ServiceParams::validate(&s3_request("my-site"), &RequestDefaults::default())
        .expect("valid s3");
    let inputs = params.inputs();
    assert_eq!(inputs.get("block_public_acls"), Some("true"));
    assert_eq!(inputs.get("block_public_policy"), Some("false"));
}

#[test]
fn default_region_comes_from_request_defaults() {
    let request = ServiceRequest::new(
        ServiceKind::S3,
        [("bucket_name", "my-site"), ("bucket_env", "prod")],
    );
    let params = ServiceParams::validate(&request, &RequestDefaults::new("us-east-1"))
        .expect("valid s3");
    assert_eq!(params.inputs().get("bucket_region"), Some("us-east-1"));
    assert_eq!(
        params.details().get("Website URL"),
        Some("https://my-site.s3-website.us-east-1.amazonaws.com")
    );
}

#[test]
fn explicit_off_literals_switch_toggles_off() {
    let mut fields = minimal_fields(ServiceKind::S3);
    fields.extend([
        ("block_public_acls", "false"),
        ("block_public_policy", "OFF"),
        ("ignore_public_acls", "yes"),
        ("restrict_public_buckets", "on"),
    ]);
    let params = ServiceParams::validate(
        &ServiceRequest::new(ServiceKind::S3, fields),
        &RequestDefaults::default(),
    )
    .expect("valid bucket");

    let inputs = params.inputs();
    assert_eq!(inputs.get("block_public_acls"), Some("false"));
    assert_eq!(inputs.get("block_public_policy"), Some("false"));
    assert_eq!(inputs.get("ignore_public_acls"), Some("true"));
    assert_eq!(inputs.get("restrict_public_buckets"), Some("true"));
}
