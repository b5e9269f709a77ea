//! Pipeline, build and deployment forms.
//!
//! These carry the provider-specific conditional rules: which extra fields a
//! submission needs depends on the source, deploy or artifact type chosen.

use super::ServiceForm;
use crate::provisioning::catalog::ServiceKind;
use crate::provisioning::payload::WorkflowInputs;
use crate::provisioning::presenter::SummaryDetails;
use crate::provisioning::request::{RequestDefaults, ServiceRequest};
use crate::provisioning::validation::{
    identifier_pattern, json_list, matches_pattern, one_of, require_when, ValidationError,
    PIPELINE_ENVIRONMENTS,
};

const IDENTIFIER_HINT: &str = "letters, digits, '-' and '_' only";
const EMPTY_LIST: &str = "[]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePipelineParams {
    pub pipeline_name: String,
    pub environment: String,
    pub region: String,
    pub description: String,
    pub source: PipelineSource,
    pub build: PipelineBuild,
    pub test: PipelineTest,
    pub approval: PipelineApproval,
    pub deploy: PipelineDeploy,
    pub notifications: PipelineNotifications,
    pub tags: String,
    pub owner: String,
    pub cost_center: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSource {
    pub provider: String,
    pub github_connection_arn: String,
    pub repository: String,
    pub branch: String,
    pub codecommit_repository: String,
    pub codecommit_branch: String,
    pub s3_bucket: String,
    pub s3_object_key: String,
}

impl PipelineSource {
    fn parse(request: &ServiceRequest) -> Result<Self, ValidationError> {
        let provider = request.text("source_provider");
        match provider {
            "GitHub" | "GitHubEnterprise" | "Bitbucket" => {
                require_when(request, &["repository"], format!("source_provider is {provider}"))?
            }
            "CodeCommit" => require_when(
                request,
                &["codecommit_repository"],
                "source_provider is CodeCommit",
            )?,
            "S3" => require_when(
                request,
                &["s3_bucket", "s3_object_key"],
                "source_provider is S3",
            )?,
            _ => {}
        }

        Ok(Self {
            provider: provider.to_string(),
            github_connection_arn: request.text("github_connection").to_string(),
            repository: request.text("repository").to_string(),
            branch: request.text_or("branch", "main"),
            codecommit_repository: request.text("codecommit_repository").to_string(),
            codecommit_branch: request.text_or("codecommit_branch", "main"),
            s3_bucket: request.text("s3_bucket").to_string(),
            s3_object_key: request.text("s3_object_key").to_string(),
        })
    }

    /// First non-empty location among repository, CodeCommit repository and bucket.
    pub fn location(&self) -> &str {
        [&self.repository, &self.codecommit_repository, &self.s3_bucket]
            .into_iter()
            .find(|value| !value.is_empty())
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineBuild {
    pub enabled: bool,
    pub project_name: String,
    pub environment: String,
    pub compute_type: String,
    pub buildspec: String,
    pub env_vars: String,
    pub cache: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineTest {
    pub enabled: bool,
    pub project_name: String,
    pub test_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineApproval {
    pub required: bool,
    pub sns_topic_arn: String,
    pub approvers: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineDeploy {
    pub provider: String,
    pub ecs_cluster: String,
    pub ecs_service: String,
    pub ecs_image_definition_file: String,
    pub codedeploy_application: String,
    pub codedeploy_deployment_group: String,
    pub lambda_function_name: String,
    pub s3_bucket: String,
    pub s3_extract: bool,
}

impl PipelineDeploy {
    fn parse(request: &ServiceRequest) -> Result<Self, ValidationError> {
        let provider = request.text("deploy_provider");
        match provider {
            "ECS" | "ECS-BlueGreen" => require_when(
                request,
                &["ecs_cluster", "ecs_service"],
                format!("deploy_provider is {provider}"),
            )?,
            "CodeDeploy" => require_when(
                request,
                &["codedeploy_application", "codedeploy_deployment_group"],
                "deploy_provider is CodeDeploy",
            )?,
            "Lambda" => require_when(
                request,
                &["lambda_function_name"],
                "deploy_provider is Lambda",
            )?,
            "S3" => require_when(request, &["s3_deploy_bucket"], "deploy_provider is S3")?,
            _ => {}
        }

        Ok(Self {
            provider: provider.to_string(),
            ecs_cluster: request.text("ecs_cluster").to_string(),
            ecs_service: request.text("ecs_service").to_string(),
            ecs_image_definition_file: request
                .text_or("ecs_image_definition_file", "imagedefinitions.json"),
            codedeploy_application: request.text("codedeploy_application").to_string(),
            codedeploy_deployment_group: request.text("codedeploy_deployment_group").to_string(),
            lambda_function_name: request.text("lambda_function_name").to_string(),
            s3_bucket: request.text("s3_deploy_bucket").to_string(),
            s3_extract: request.flag("s3_extract"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineNotifications {
    pub enabled: bool,
    pub sns_topic_arn: String,
    pub cloudwatch_alarms: bool,
}

impl ServiceForm for CodePipelineParams {
    const KIND: ServiceKind = ServiceKind::CodePipeline;

    fn parse(request: &ServiceRequest, defaults: &RequestDefaults) -> Result<Self, ValidationError> {
        Self::require_base(request)?;

        let pipeline_name = request.text("pipeline_name");
        matches_pattern("pipeline_name", pipeline_name, identifier_pattern(), IDENTIFIER_HINT)?;

        let environment = request.text("environment");
        one_of("environment", environment, PIPELINE_ENVIRONMENTS)?;

        let source = PipelineSource::parse(request)?;
        let deploy = PipelineDeploy::parse(request)?;

        let env_vars = request.text_or("build_env_vars", EMPTY_LIST);
        json_list("build_env_vars", &env_vars)?;
        let tags = request.text_or("tags", EMPTY_LIST);
        json_list("tags", &tags)?;

        Ok(Self {
            pipeline_name: pipeline_name.to_string(),
            environment: environment.to_string(),
            region: request.text_or("region", &defaults.region),
            description: request.text("description").to_string(),
            source,
            build: PipelineBuild {
                enabled: request.flag("enable_build"),
                project_name: request.text("build_project").to_string(),
                environment: request.text_or("build_env", "ubuntu-standard-7.0"),
                compute_type: request.text_or("build_compute", "small"),
                buildspec: request.text("buildspec").to_string(),
                env_vars,
                cache: request.flag("enable_build_cache"),
            },
            test: PipelineTest {
                enabled: request.flag("enable_test"),
                project_name: request.text("test_project").to_string(),
                test_type: request.text_or("test_type", "integration"),
            },
            approval: PipelineApproval {
                required: request.flag("manual_approval"),
                sns_topic_arn: request.text("approval_sns_topic").to_string(),
                approvers: request.text("approvers").to_string(),
            },
            deploy,
            notifications: PipelineNotifications {
                enabled: request.flag("enable_notifications"),
                sns_topic_arn: request.text("notification_sns_topic").to_string(),
                cloudwatch_alarms: request.flag("enable_cloudwatch_alarms"),
            },
            tags,
            owner: request.text("owner").to_string(),
            cost_center: request.text("cost_center").to_string(),
        })
    }

    fn inputs(&self) -> WorkflowInputs {
        let source = &self.source;
        let build = &self.build;
        let deploy = &self.deploy;
        WorkflowInputs::new()
            .text("pipeline_name", &self.pipeline_name)
            .text("environment", &self.environment)
            .text("region", &self.region)
            .text("description", &self.description)
            .text("source_provider", &source.provider)
            .text("github_connection_arn", &source.github_connection_arn)
            .text("repository", &source.repository)
            .text("branch", &source.branch)
            .text("codecommit_repository_name", &source.codecommit_repository)
            .text("codecommit_branch", &source.codecommit_branch)
            .text("s3_source_bucket", &source.s3_bucket)
            .text("s3_source_object_key", &source.s3_object_key)
            .flag("enable_build", build.enabled)
            .text("build_project_name", &build.project_name)
            .text("build_environment", &build.environment)
            .text("build_compute_type", &build.compute_type)
            .text("buildspec", &build.buildspec)
            .text("build_env_vars", &build.env_vars)
            .flag("enable_build_cache", build.cache)
            .flag("enable_test", self.test.enabled)
            .text("test_project_name", &self.test.project_name)
            .text("test_type", &self.test.test_type)
            .flag("manual_approval", self.approval.required)
            .text("approval_sns_topic_arn", &self.approval.sns_topic_arn)
            .text("approvers", &self.approval.approvers)
            .text("deploy_provider", &deploy.provider)
            .text("ecs_cluster_name", &deploy.ecs_cluster)
            .text("ecs_service_name", &deploy.ecs_service)
            .text("ecs_image_definition_file", &deploy.ecs_image_definition_file)
            .text("codedeploy_application_name", &deploy.codedeploy_application)
            .text(
                "codedeploy_deployment_group_name",
                &deploy.codedeploy_deployment_group,
            )
            .text("lambda_function_name", &deploy.lambda_function_name)
            .text("s3_deploy_bucket", &deploy.s3_bucket)
            .flag("s3_extract_archive", deploy.s3_extract)
            .flag("enable_notifications", self.notifications.enabled)
            .text("notification_sns_topic_arn", &self.notifications.sns_topic_arn)
            .flag("enable_cloudwatch_alarms", self.notifications.cloudwatch_alarms)
            .text("tags", &self.tags)
            .text("owner", &self.owner)
            .text("cost_center", &self.cost_center)
    }

    fn details(&self) -> SummaryDetails {
        SummaryDetails::new()
            .with("Pipeline", &self.pipeline_name)
            .with("Environment", &self.environment)
            .with(
                "Source",
                format!("{} → {}", self.source.provider, self.source.location()),
            )
            .with("Build", if self.build.enabled { "Enabled" } else { "Disabled" })
            .with_if(self.test.enabled, "Tests", capitalize(&self.test.test_type))
            .with_if(self.approval.required, "Approval", "Manual approval required")
            .with("Deployment", &self.deploy.provider)
            .with_if(self.notifications.enabled, "Notifications", "SNS enabled")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBuildParams {
    pub project_name: String,
    pub environment: String,
    pub region: String,
    pub description: String,
    pub source_type: String,
    pub source_location: String,
    pub source_version: String,
    pub environment_type: String,
    /// Resolved image: the custom image when `image` is `CUSTOM`.
    pub image: String,
    pub compute_type: String,
    pub privileged_mode: bool,
    pub buildspec_type: String,
    pub buildspec: String,
    pub buildspec_path: String,
    pub environment_variables: String,
    pub artifacts_type: String,
    pub artifacts_bucket: String,
    pub artifacts_path: String,
    pub enable_cache: bool,
    pub cache_bucket: String,
    pub cache_paths: String,
    pub cloudwatch_logs: bool,
    pub s3_logs: bool,
    pub timeout_minutes: String,
    pub queued_timeout_minutes: String,
}

impl ServiceForm for CodeBuildParams {
    const KIND: ServiceKind = ServiceKind::CodeBuild;

    fn parse(request: &ServiceRequest, defaults: &RequestDefaults) -> Result<Self, ValidationError> {
        Self::require_base(request)?;

        let project_name = request.text("project_name");
        matches_pattern("project_name", project_name, identifier_pattern(), IDENTIFIER_HINT)?;

        let environment = request.text("environment");
        one_of("environment", environment, PIPELINE_ENVIRONMENTS)?;

        let source_type = request.text("source_type");
        if !matches!(source_type, "NO_SOURCE" | "CODEPIPELINE") {
            require_when(
                request,
                &["source_location"],
                format!("source_type is {source_type}"),
            )?;
        }

        let artifacts_type = request.text_or("artifacts_type", "NO_ARTIFACTS");
        if artifacts_type == "S3" {
            require_when(request, &["artifacts_bucket"], "artifacts_type is S3")?;
        }

        let enable_cache = request.flag("enable_cache");
        if enable_cache {
            require_when(request, &["cache_bucket"], "enable_cache is set")?;
        }

        let environment_variables = request.text_or("environment_variables", EMPTY_LIST);
        json_list("environment_variables", &environment_variables)?;

        let image = match request.text("image") {
            "CUSTOM" => request.text("custom_image").to_string(),
            other => other.to_string(),
        };

        Ok(Self {
            project_name: project_name.to_string(),
            environment: environment.to_string(),
            region: request.text_or("region", &defaults.region),
            description: request.text("description").to_string(),
            source_type: source_type.to_string(),
            source_location: request.text("source_location").to_string(),
            source_version: request.text_or("source_version", "main"),
            environment_type: request.text_or("environment_type", "LINUX_CONTAINER"),
            image,
            compute_type: request.text_or("compute_type", "BUILD_GENERAL1_MEDIUM"),
            privileged_mode: request.flag("privileged_mode"),
            buildspec_type: request.text_or("buildspec_type", "file"),
            buildspec: request.text("buildspec").to_string(),
            buildspec_path: request.text_or("buildspec_path", "buildspec.yml"),
            environment_variables,
            artifacts_type,
            artifacts_bucket: request.text("artifacts_bucket").to_string(),
            artifacts_path: request.text("artifacts_path").to_string(),
            enable_cache,
            cache_bucket: request.text("cache_bucket").to_string(),
            cache_paths: request.text("cache_paths").to_string(),
            cloudwatch_logs: request.flag("cloudwatch_logs"),
            s3_logs: request.flag("s3_logs"),
            timeout_minutes: request.text_or("timeout", "60"),
            queued_timeout_minutes: request.text_or("queued_timeout", "480"),
        })
    }

    fn inputs(&self) -> WorkflowInputs {
        WorkflowInputs::new()
            .text("project_name", &self.project_name)
            .text("environment", &self.environment)
            .text("region", &self.region)
            .text("description", &self.description)
            .text("source_type", &self.source_type)
            .text("source_location", &self.source_location)
            .text("source_version", &self.source_version)
            .text("environment_type", &self.environment_type)
            .text("image", &self.image)
            .text("compute_type", &self.compute_type)
            .flag("privileged_mode", self.privileged_mode)
            .text("buildspec_type", &self.buildspec_type)
            .text("buildspec", &self.buildspec)
            .text("buildspec_path", &self.buildspec_path)
            .text("environment_variables", &self.environment_variables)
            .text("artifacts_type", &self.artifacts_type)
            .text("artifacts_bucket", &self.artifacts_bucket)
            .text("artifacts_path", &self.artifacts_path)
            .flag("enable_cache", self.enable_cache)
            .text("cache_bucket", &self.cache_bucket)
            .text("cache_paths", &self.cache_paths)
            .flag("cloudwatch_logs_enabled", self.cloudwatch_logs)
            .flag("s3_logs_enabled", self.s3_logs)
            .text("timeout_minutes", &self.timeout_minutes)
            .text("queued_timeout_minutes", &self.queued_timeout_minutes)
    }

    fn details(&self) -> SummaryDetails {
        let image = self.image.rsplit('/').next().unwrap_or(&self.image);
        let compute = self
            .compute_type
            .strip_prefix("BUILD_GENERAL1_")
            .unwrap_or(&self.compute_type);

        SummaryDetails::new()
            .with("Project", &self.project_name)
            .with("Environment", &self.environment)
            .with("Source", &self.source_type)
            .with("Image", image)
            .with("Compute", compute)
            .with_if(self.privileged_mode, "Privileged mode", "Enabled (Docker)")
            .with_if(self.enable_cache, "S3 cache", "Enabled")
            .with_if(
                self.artifacts_type != "NO_ARTIFACTS",
                "Artifacts",
                &self.artifacts_type,
            )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeDeployParams {
    pub application_name: String,
    pub compute_platform: String,
    pub deployment_group_name: String,
    pub environment: String,
    pub region: String,
    pub deployment_config: String,
    pub ec2_tag_filters: String,
    pub autoscaling_groups: String,
    pub lambda_function_name: String,
    pub lambda_alias: String,
    pub ecs_cluster_name: String,
    pub ecs_service_name: String,
    pub blue_green: bool,
    pub green_fleet_option: String,
    pub terminate_blue_instances: String,
    pub blue_green_timeout: String,
    pub auto_rollback: bool,
    pub rollback_on_failure: bool,
    pub rollback_on_alarm: bool,
    pub use_load_balancer: bool,
    pub load_balancer_type: String,
    pub target_group_name: String,
    pub classic_lb_name: String,
}

impl ServiceForm for CodeDeployParams {
    const KIND: ServiceKind = ServiceKind::CodeDeploy;

    fn parse(request: &ServiceRequest, defaults: &RequestDefaults) -> Result<Self, ValidationError> {
        Self::require_base(request)?;

        let application_name = request.text("application_name");
        matches_pattern(
            "application_name",
            application_name,
            identifier_pattern(),
            IDENTIFIER_HINT,
        )?;

        Ok(Self {
            application_name: application_name.to_string(),
            compute_platform: request.text("compute_platform").to_string(),
            deployment_group_name: request.text("deployment_group_name").to_string(),
            environment: request.text("environment").to_string(),
            region: request.text_or("region", &defaults.region),
            deployment_config: request.text("deployment_config").to_string(),
            ec2_tag_filters: request.text("ec2_tag_filters").to_string(),
            autoscaling_groups: request.text("autoscaling_groups").to_string(),
            lambda_function_name: request.text("lambda_function_name").to_string(),
            lambda_alias: request.text_or("lambda_alias", "live"),
            ecs_cluster_name: request.text("ecs_cluster_name").to_string(),
            ecs_service_name: request.text("ecs_service_name").to_string(),
            blue_green: request.flag("blue_green_deployment"),
            green_fleet_option: request.text("green_fleet_option").to_string(),
            terminate_blue_instances: request.text("terminate_blue_instances").to_string(),
            blue_green_timeout: request.text_or("blue_green_timeout", "60"),
            auto_rollback: request.flag("auto_rollback"),
            rollback_on_failure: request.flag("rollback_on_failure"),
            rollback_on_alarm: request.flag("rollback_on_alarm"),
            use_load_balancer: request.flag("use_load_balancer"),
            load_balancer_type: request.text("load_balancer_type").to_string(),
            target_group_name: request.text("target_group_name").to_string(),
            classic_lb_name: request.text("classic_lb_name").to_string(),
        })
    }

    fn inputs(&self) -> WorkflowInputs {
        WorkflowInputs::new()
            .text("application_name", &self.application_name)
            .text("compute_platform", &self.compute_platform)
            .text("deployment_group_name", &self.deployment_group_name)
            .text("environment", &self.environment)
            .text("region", &self.region)
            .text("deployment_config_name", &self.deployment_config)
            .text("ec2_tag_filters", &self.ec2_tag_filters)
            .text("autoscaling_groups", &self.autoscaling_groups)
            .text("lambda_function_name", &self.lambda_function_name)
            .text("lambda_alias", &self.lambda_alias)
            .text("ecs_cluster_name", &self.ecs_cluster_name)
            .text("ecs_service_name", &self.ecs_service_name)
            .flag("blue_green_enabled", self.blue_green)
            .text("green_fleet_option", &self.green_fleet_option)
            .text("terminate_blue_instances", &self.terminate_blue_instances)
            .text("blue_green_timeout", &self.blue_green_timeout)
            .flag("auto_rollback_enabled", self.auto_rollback)
            .flag("rollback_on_failure", self.rollback_on_failure)
            .flag("rollback_on_alarm", self.rollback_on_alarm)
            .flag("use_load_balancer", self.use_load_balancer)
            .text("load_balancer_type", &self.load_balancer_type)
            .text("target_group_name", &self.target_group_name)
            .text("classic_lb_name", &self.classic_lb_name)
    }

    fn details(&self) -> SummaryDetails {
        let strategy = self
            .deployment_config
            .strip_prefix("CodeDeployDefault.")
            .unwrap_or(&self.deployment_config);

        SummaryDetails::new()
            .with("Application", &self.application_name)
            .with("Platform", &self.compute_platform)
            .with("Deployment group", &self.deployment_group_name)
            .with("Environment", &self.environment)
            .with("Strategy", strategy)
            .with_if(self.blue_green, "Mode", "Blue/Green")
            .with_if(self.auto_rollback, "Rollback", "Automatic")
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
