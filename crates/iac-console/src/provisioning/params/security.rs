use std::fmt;

use super::ServiceForm;
use crate::provisioning::catalog::ServiceKind;
use crate::provisioning::payload::WorkflowInputs;
use crate::provisioning::presenter::SummaryDetails;
use crate::provisioning::request::{RequestDefaults, ServiceRequest};
use crate::provisioning::validation::{
    length_between, matches_pattern, require_when, secret_name_pattern, ValidationError,
};

const SECRET_NAME_MAX: usize = 512;
const DATABASE_SECRET: &str = "database";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IamParams {
    pub resource_type: String,
    pub resource_name: String,
    pub path: String,
}

impl ServiceForm for IamParams {
    const KIND: ServiceKind = ServiceKind::Iam;

    fn parse(request: &ServiceRequest, _: &RequestDefaults) -> Result<Self, ValidationError> {
        Self::require_base(request)?;
        Ok(Self {
            resource_type: request.text("resource_type").to_string(),
            resource_name: request.text("resource_name").to_string(),
            path: request.text_or("path", "/"),
        })
    }

    fn inputs(&self) -> WorkflowInputs {
        WorkflowInputs::new()
            .text("resource_type", &self.resource_type)
            .text("resource_name", &self.resource_name)
            .text("path", &self.path)
    }

    fn details(&self) -> SummaryDetails {
        SummaryDetails::new()
            .with("Type", &self.resource_type)
            .with("Name", &self.resource_name)
            .with("Path", &self.path)
    }
}

/// Secret material lives in `db_password` and `secret_value`; both are
/// forwarded to the workflow and kept out of summaries and `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretsManagerParams {
    pub secret_name: String,
    pub environment: String,
    pub region: String,
    pub description: String,
    pub secret_type: String,
    pub db_username: String,
    db_password: String,
    pub db_host: String,
    pub db_port: String,
    pub db_name: String,
    secret_value: String,
    pub enable_rotation: bool,
    pub rotation_days: String,
    pub rotation_lambda_arn: String,
    pub kms_key_id: String,
    pub recovery_window: bool,
    pub enable_replication: bool,
    pub replica_regions: String,
}

impl SecretsManagerParams {
    pub fn is_database_secret(&self) -> bool {
        self.secret_type == DATABASE_SECRET
    }
}

impl fmt::Debug for SecretsManagerParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretsManagerParams")
            .field("secret_name", &self.secret_name)
            .field("environment", &self.environment)
            .field("region", &self.region)
            .field("secret_type", &self.secret_type)
            .field("db_username", &self.db_username)
            .field("db_password", &"<redacted>")
            .field("secret_value", &"<redacted>")
            .field("enable_rotation", &self.enable_rotation)
            .field("enable_replication", &self.enable_replication)
            .finish_non_exhaustive()
    }
}

impl ServiceForm for SecretsManagerParams {
    const KIND: ServiceKind = ServiceKind::SecretsManager;

    fn parse(request: &ServiceRequest, defaults: &RequestDefaults) -> Result<Self, ValidationError> {
        Self::require_base(request)?;

        let secret_name = request.text("secret_name");
        matches_pattern(
            "secret_name",
            secret_name,
            secret_name_pattern(),
            "letters, digits and /_+=.@- only",
        )?;
        length_between("secret_name", secret_name, 0, Some(SECRET_NAME_MAX))?;

        let secret_type = request.text("secret_type");
        if secret_type == DATABASE_SECRET {
            require_when(
                request,
                &["db_username", "db_password"],
                "secret_type is database",
            )?;
        } else {
            require_when(
                request,
                &["secret_value"],
                format!("secret_type is {secret_type}"),
            )?;
        }

        Ok(Self {
            secret_name: secret_name.to_string(),
            environment: request.text("environment").to_string(),
            region: request.text_or("region", &defaults.region),
            description: request.text("description").to_string(),
            secret_type: secret_type.to_string(),
            db_username: request.text("db_username").to_string(),
            db_password: request.text("db_password").to_string(),
            db_host: request.text("db_host").to_string(),
            db_port: request.text_or("db_port", "5432"),
            db_name: request.text("db_name").to_string(),
            secret_value: request.text("secret_value").to_string(),
            enable_rotation: request.flag("enable_rotation"),
            rotation_days: request.text_or("rotation_days", "30"),
            rotation_lambda_arn: request.text("rotation_lambda").to_string(),
            kms_key_id: request.text("kms_key_id").to_string(),
            recovery_window: request.flag("recovery_window"),
            enable_replication: request.flag("enable_replication"),
            replica_regions: request.text("replica_regions").to_string(),
        })
    }

    fn inputs(&self) -> WorkflowInputs {
        WorkflowInputs::new()
            .text("secret_name", &self.secret_name)
            .text("environment", &self.environment)
            .text("region", &self.region)
            .text("description", &self.description)
            .text("secret_type", &self.secret_type)
            .text("db_username", &self.db_username)
            .text("db_password", &self.db_password)
            .text("db_host", &self.db_host)
            .text("db_port", &self.db_port)
            .text("db_name", &self.db_name)
            .text("secret_value", &self.secret_value)
            .flag("enable_rotation", self.enable_rotation)
            .text("rotation_days", &self.rotation_days)
            .text("rotation_lambda_arn", &self.rotation_lambda_arn)
            .text("kms_key_id", &self.kms_key_id)
            .flag("recovery_window_enabled", self.recovery_window)
            .flag("enable_replication", self.enable_replication)
            .text("replica_regions", &self.replica_regions)
    }

    fn details(&self) -> SummaryDetails {
        SummaryDetails::new()
            .with("Name", &self.secret_name)
            .with("Type", title_case(&self.secret_type))
            .with("Environment", &self.environment)
            .with_if(
                self.is_database_secret(),
                "Database user",
                &self.db_username,
            )
            .with_if(
                self.enable_rotation,
                "Rotation",
                format!("Every {} days", self.rotation_days),
            )
    }
}

/// `api_key` becomes `Api Key`.
fn title_case(value: &str) -> String {
    value
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
