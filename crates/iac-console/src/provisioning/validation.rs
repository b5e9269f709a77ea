//! Rule primitives shared by every service form.
//!
//! Each rule returns `Ok(())` or the [`ValidationError`] describing the first
//! violation. Service forms chain them with `?`, so the first failing rule in
//! declaration order is the one reported.

use std::sync::OnceLock;

use regex::Regex;

use super::request::ServiceRequest;

/// User-correctable problem with a submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },
    #[error("invalid {field}: '{value}' ({expected})")]
    InvalidFormat {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("invalid {field}: '{value}' must start with '{prefix}'")]
    MissingPrefix {
        field: &'static str,
        value: String,
        prefix: &'static str,
    },
    #[error("invalid {field}: '{value}' (expected one of {})", .allowed.join(", "))]
    NotAllowed {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
    #[error("{field} {}", describe_length(.min, .max))]
    Length {
        field: &'static str,
        min: usize,
        max: Option<usize>,
    },
    #[error("{field} must not contain '{forbidden}'")]
    ForbiddenSequence {
        field: &'static str,
        forbidden: &'static str,
    },
    #[error("{field} must be a JSON array: {reason}")]
    InvalidJsonList { field: &'static str, reason: String },
    #[error("{} required when {condition}", .fields.join(" and "))]
    ConditionallyRequired {
        fields: Vec<&'static str>,
        condition: String,
    },
    /// The body could not be read as a form at all.
    #[error("malformed form submission: {reason}")]
    MalformedForm { reason: String },
}

impl ValidationError {
    /// Field the error points at, when it concerns a single one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::MissingFields { fields }
            | ValidationError::ConditionallyRequired { fields, .. } => fields.first().copied(),
            ValidationError::InvalidFormat { field, .. }
            | ValidationError::MissingPrefix { field, .. }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::Length { field, .. }
            | ValidationError::ForbiddenSequence { field, .. }
            | ValidationError::InvalidJsonList { field, .. } => Some(*field),
            ValidationError::MalformedForm { .. } => None,
        }
    }
}

fn describe_length(min: &usize, max: &Option<usize>) -> String {
    let min = *min;
    match *max {
        Some(max) if min == 0 => format!("must be at most {max} characters"),
        Some(max) => format!("must be between {min} and {max} characters"),
        None => format!("must be at least {min} characters"),
    }
}

pub(crate) const DEPLOYMENT_ENVIRONMENTS: &[&str] = &["dev", "preprod", "prod"];
pub(crate) const PIPELINE_ENVIRONMENTS: &[&str] = &["dev", "staging", "prod"];

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static validation pattern compiles"))
}

/// Letters, digits, hyphen and underscore.
pub(crate) fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    compiled(&PATTERN, r"^[a-zA-Z0-9_-]+$")
}

pub(crate) fn bucket_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    compiled(&PATTERN, r"^[a-z0-9][a-z0-9-]{1,61}[a-z0-9]$")
}

pub(crate) fn db_identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    compiled(&PATTERN, r"^[a-z][a-z0-9-]*$")
}

pub(crate) fn secret_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    compiled(&PATTERN, r"^[a-zA-Z0-9/_+=.@-]+$")
}

/// Every listed field must be non-blank. All missing ones are reported together.
pub fn require(request: &ServiceRequest, fields: &[&'static str]) -> Result<(), ValidationError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .copied()
        .filter(|field| request.is_blank(field))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields { fields: missing })
    }
}

/// Presence check that only applies when `condition` holds.
pub fn require_when(
    request: &ServiceRequest,
    fields: &[&'static str],
    condition: impl Into<String>,
) -> Result<(), ValidationError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .copied()
        .filter(|field| request.is_blank(field))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::ConditionallyRequired {
            fields: missing,
            condition: condition.into(),
        })
    }
}

pub fn matches_pattern(
    field: &'static str,
    value: &str,
    pattern: &Regex,
    expected: &'static str,
) -> Result<(), ValidationError> {
    if pattern.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat {
            field,
            value: value.to_string(),
            expected,
        })
    }
}

pub fn starts_with(
    field: &'static str,
    value: &str,
    prefix: &'static str,
) -> Result<(), ValidationError> {
    if value.starts_with(prefix) {
        Ok(())
    } else {
        Err(ValidationError::MissingPrefix {
            field,
            value: value.to_string(),
            prefix,
        })
    }
}

pub fn one_of(
    field: &'static str,
    value: &str,
    allowed: &'static [&'static str],
) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::NotAllowed {
            field,
            value: value.to_string(),
            allowed,
        })
    }
}

/// Character-count bounds, inclusive on both ends.
pub fn length_between(
    field: &'static str,
    value: &str,
    min: usize,
    max: Option<usize>,
) -> Result<(), ValidationError> {
    let length = value.chars().count();
    let too_long = max.is_some_and(|max| length > max);
    if length < min || too_long {
        Err(ValidationError::Length { field, min, max })
    } else {
        Ok(())
    }
}

pub fn forbid_sequence(
    field: &'static str,
    value: &str,
    forbidden: &'static str,
) -> Result<(), ValidationError> {
    if value.contains(forbidden) {
        Err(ValidationError::ForbiddenSequence { field, forbidden })
    } else {
        Ok(())
    }
}

/// Checks that a free-text field holds a JSON array and returns its length.
pub fn json_list(field: &'static str, value: &str) -> Result<usize, ValidationError> {
    match serde_json::from_str::<serde_json::Value>(value) {
        Ok(serde_json::Value::Array(items)) => Ok(items.len()),
        Ok(other) => Err(ValidationError::InvalidJsonList {
            field,
            reason: format!("found {}", json_kind(&other)),
        }),
        Err(err) => Err(ValidationError::InvalidJsonList {
            field,
            reason: err.to_string(),
        }),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
