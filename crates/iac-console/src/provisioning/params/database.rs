use super::ServiceForm;
use crate::provisioning::catalog::ServiceKind;
use crate::provisioning::payload::WorkflowInputs;
use crate::provisioning::presenter::SummaryDetails;
use crate::provisioning::request::{RequestDefaults, ServiceRequest};
use crate::provisioning::validation::{
    db_identifier_pattern, length_between, matches_pattern, ValidationError,
};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 16;
const PASSWORD_MIN: usize = 8;

/// Relational database instance. The master password is forwarded to the
/// workflow but never appears in [`ServiceForm::details`] or `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct RdsParams {
    pub identifier: String,
    pub engine: String,
    pub engine_version: String,
    pub instance_class: String,
    pub allocated_storage: String,
    pub username: String,
    password: String,
    pub db_name: String,
    pub multi_az: bool,
    pub backup_retention: String,
    pub environment: String,
}

impl std::fmt::Debug for RdsParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RdsParams")
            .field("identifier", &self.identifier)
            .field("engine", &self.engine)
            .field("engine_version", &self.engine_version)
            .field("instance_class", &self.instance_class)
            .field("allocated_storage", &self.allocated_storage)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("db_name", &self.db_name)
            .field("multi_az", &self.multi_az)
            .field("backup_retention", &self.backup_retention)
            .field("environment", &self.environment)
            .finish()
    }
}

impl ServiceForm for RdsParams {
    const KIND: ServiceKind = ServiceKind::Rds;

    fn parse(request: &ServiceRequest, _: &RequestDefaults) -> Result<Self, ValidationError> {
        Self::require_base(request)?;

        let identifier = request.text("db_identifier");
        matches_pattern(
            "db_identifier",
            identifier,
            db_identifier_pattern(),
            "lowercase letter first, then lowercase letters, digits or '-'",
        )?;

        let username = request.text("username");
        length_between("username", username, USERNAME_MIN, Some(USERNAME_MAX))?;

        let password = request.text("password");
        length_between("password", password, PASSWORD_MIN, None)?;

        Ok(Self {
            identifier: identifier.to_string(),
            engine: request.text("engine").to_string(),
            engine_version: request.text("engine_version").to_string(),
            instance_class: request.text("instance_class").to_string(),
            allocated_storage: request.text_or("allocated_storage", "20"),
            username: username.to_string(),
            password: password.to_string(),
            db_name: request.text("db_name").to_string(),
            multi_az: request.flag("multi_az"),
            backup_retention: request.text_or("backup_retention", "7"),
            environment: request.text("environment").to_string(),
        })
    }

    fn inputs(&self) -> WorkflowInputs {
        WorkflowInputs::new()
            .text("db_identifier", &self.identifier)
            .text("engine", &self.engine)
            .text("engine_version", &self.engine_version)
            .text("instance_class", &self.instance_class)
            .text("allocated_storage", &self.allocated_storage)
            .text("username", &self.username)
            .text("password", &self.password)
            .text("db_name", &self.db_name)
            .flag("multi_az", self.multi_az)
            .text("backup_retention", &self.backup_retention)
            .text("environment", &self.environment)
    }

    fn details(&self) -> SummaryDetails {
        SummaryDetails::new()
            .with("Identifier", &self.identifier)
            .with("Engine", format!("{} {}", self.engine, self.engine_version))
            .with("Instance class", &self.instance_class)
            .with("Storage", format!("{} GB", self.allocated_storage))
            .with("Multi-AZ", if self.multi_az { "Yes" } else { "No" })
            .with("Environment", &self.environment)
    }
}
