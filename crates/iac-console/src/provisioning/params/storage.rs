use super::ServiceForm;
use crate::provisioning::catalog::ServiceKind;
use crate::provisioning::payload::WorkflowInputs;
use crate::provisioning::presenter::SummaryDetails;
use crate::provisioning::request::{RequestDefaults, ServiceRequest};
use crate::provisioning::validation::{
    bucket_name_pattern, forbid_sequence, matches_pattern, require, ValidationError,
};

/// Static-website bucket settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Params {
    pub bucket_name: String,
    pub environment: String,
    pub region: String,
    pub index_document: String,
    pub error_document: String,
    pub storage_class: String,
    pub versioning: String,
    pub block_public_acls: bool,
    pub block_public_policy: bool,
    pub ignore_public_acls: bool,
    pub restrict_public_buckets: bool,
}

impl S3Params {
    pub fn website_url(&self) -> String {
        format!(
            "https://{}.s3-website.{}.amazonaws.com",
            self.bucket_name, self.region
        )
    }
}

impl ServiceForm for S3Params {
    const KIND: ServiceKind = ServiceKind::S3;

    fn parse(request: &ServiceRequest, defaults: &RequestDefaults) -> Result<Self, ValidationError> {
        require(request, &["bucket_name", "bucket_env"])?;

        // Bucket names are case-insensitive on input and stored lower-case.
        let bucket_name = request.text("bucket_name").to_lowercase();
        matches_pattern(
            "bucket_name",
            &bucket_name,
            bucket_name_pattern(),
            "3-63 lowercase letters, digits or '-', starting and ending alphanumeric",
        )?;
        forbid_sequence("bucket_name", &bucket_name, "--")?;

        Ok(Self {
            bucket_name,
            environment: request.text("bucket_env").to_string(),
            region: request.text_or("bucket_region", &defaults.region),
            index_document: request.text_or("index_document", "index.html"),
            error_document: request.text_or("error_document", "error.html"),
            storage_class: request.text_or("storage_class", "STANDARD"),
            versioning: request.text_or("enable_versioning", "Disabled"),
            block_public_acls: request.flag("block_public_acls"),
            block_public_policy: request.flag("block_public_policy"),
            ignore_public_acls: request.flag("ignore_public_acls"),
            restrict_public_buckets: request.flag("restrict_public_buckets"),
        })
    }

    fn inputs(&self) -> WorkflowInputs {
        WorkflowInputs::new()
            .text("bucket_name", &self.bucket_name)
            .text("bucket_env", &self.environment)
            .text("bucket_region", &self.region)
            .text("index_document", &self.index_document)
            .text("error_document", &self.error_document)
            .text("storage_class", &self.storage_class)
            .text("enable_versioning", &self.versioning)
            .flag("block_public_acls", self.block_public_acls)
            .flag("block_public_policy", self.block_public_policy)
            .flag("ignore_public_acls", self.ignore_public_acls)
            .flag("restrict_public_buckets", self.restrict_public_buckets)
    }

    fn details(&self) -> SummaryDetails {
        SummaryDetails::new()
            .with("Name", &self.bucket_name)
            .with("Region", &self.region)
            .with("Environment", &self.environment)
            .with("Storage class", &self.storage_class)
            .with("Website URL", self.website_url())
    }
}
