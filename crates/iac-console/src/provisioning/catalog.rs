use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

use super::dispatch::ConfigurationError;

/// Infrastructure resource types the console can provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceKind {
    Ec2,
    Lambda,
    S3,
    Rds,
    Iam,
    SecretsManager,
    Vpc,
    Elb,
    CloudFront,
    Route53,
    CloudWatch,
    CodePipeline,
    CodeBuild,
    CodeDeploy,
    Ssm,
    Budgets,
    CostExplorer,
    TrustedAdvisor,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 18] = [
        ServiceKind::Ec2,
        ServiceKind::Lambda,
        ServiceKind::S3,
        ServiceKind::Rds,
        ServiceKind::Iam,
        ServiceKind::SecretsManager,
        ServiceKind::Vpc,
        ServiceKind::Elb,
        ServiceKind::CloudFront,
        ServiceKind::Route53,
        ServiceKind::CloudWatch,
        ServiceKind::CodePipeline,
        ServiceKind::CodeBuild,
        ServiceKind::CodeDeploy,
        ServiceKind::Ssm,
        ServiceKind::Budgets,
        ServiceKind::CostExplorer,
        ServiceKind::TrustedAdvisor,
    ];

    pub fn slug(self) -> &'static str {
        self.descriptor().slug
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        let slug = slug.trim();
        CATALOG
            .iter()
            .find(|descriptor| descriptor.slug.eq_ignore_ascii_case(slug))
            .map(|descriptor| descriptor.kind)
    }

    pub fn descriptor(self) -> &'static ServiceDescriptor {
        // CATALOG is declared in the same order as ALL.
        &CATALOG[self as usize]
    }
}

impl Serialize for ServiceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.slug())
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Grouping used by the catalog listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Compute,
    Serverless,
    Storage,
    Database,
    Security,
    Networking,
    LoadBalancing,
    Cdn,
    Dns,
    Monitoring,
    DevOps,
    Management,
    Cost,
}

impl ServiceCategory {
    pub fn label(self) -> &'static str {
        match self {
            ServiceCategory::Compute => "Compute",
            ServiceCategory::Serverless => "Serverless",
            ServiceCategory::Storage => "Storage",
            ServiceCategory::Database => "Database",
            ServiceCategory::Security => "Security",
            ServiceCategory::Networking => "Networking",
            ServiceCategory::LoadBalancing => "Load balancing",
            ServiceCategory::Cdn => "CDN",
            ServiceCategory::Dns => "DNS",
            ServiceCategory::Monitoring => "Monitoring",
            ServiceCategory::DevOps => "DevOps",
            ServiceCategory::Management => "Management",
            ServiceCategory::Cost => "Cost",
        }
    }
}

/// Static, read-only description of one service kind.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceDescriptor {
    #[serde(skip)]
    pub kind: ServiceKind,
    pub slug: &'static str,
    pub display_name: &'static str,
    pub category: ServiceCategory,
    /// Headline shown when a dispatch succeeds.
    pub title: &'static str,
    pub description: &'static str,
    pub workflow_file: &'static str,
    /// Fields that must be non-blank before any other rule runs.
    pub required_fields: &'static [&'static str],
}

pub fn catalog() -> &'static [ServiceDescriptor] {
    &CATALOG
}

static CATALOG: [ServiceDescriptor; 18] = [
    ServiceDescriptor {
        kind: ServiceKind::Ec2,
        slug: "ec2",
        display_name: "EC2",
        category: ServiceCategory::Compute,
        title: "EC2 instance",
        description: "EC2 instances with security groups and default VPC networking.",
        workflow_file: "terraform-ec2.yml",
        required_fields: &["instance_name", "instance_os", "instance_size", "instance_env"],
    },
    ServiceDescriptor {
        kind: ServiceKind::Lambda,
        slug: "lambda",
        display_name: "Lambda",
        category: ServiceCategory::Serverless,
        title: "Lambda function",
        description: "Lambda functions with runtime, handler, memory and timeout settings.",
        workflow_file: "terraform-lambda.yml",
        required_fields: &["function_name", "runtime", "handler", "environment"],
    },
    ServiceDescriptor {
        kind: ServiceKind::S3,
        slug: "s3",
        display_name: "S3",
        category: ServiceCategory::Storage,
        title: "S3 bucket",
        description: "S3 buckets for static website hosting with public access controls and versioning.",
        workflow_file: "terraform-s3.yml",
        required_fields: &["bucket_name", "bucket_env"],
    },
    ServiceDescriptor {
        kind: ServiceKind::Rds,
        slug: "rds",
        display_name: "RDS",
        category: ServiceCategory::Database,
        title: "RDS database",
        description: "Relational databases (MySQL, PostgreSQL, MariaDB) with automated backups.",
        workflow_file: "terraform-rds.yml",
        required_fields: &[
            "db_identifier",
            "engine",
            "engine_version",
            "instance_class",
            "username",
            "password",
            "environment",
        ],
    },
    ServiceDescriptor {
        kind: ServiceKind::Iam,
        slug: "iam",
        display_name: "IAM",
        category: ServiceCategory::Security,
        title: "IAM resource",
        description: "IAM users, groups, roles and policies.",
        workflow_file: "terraform-iam.yml",
        required_fields: &["resource_type", "resource_name"],
    },
    ServiceDescriptor {
        kind: ServiceKind::SecretsManager,
        slug: "secrets-manager",
        display_name: "Secrets Manager",
        category: ServiceCategory::Security,
        title: "Managed secret",
        description: "Secrets with optional rotation, KMS encryption and replication.",
        workflow_file: "terraform-secrets-manager.yml",
        required_fields: &["secret_name", "environment", "secret_type"],
    },
    ServiceDescriptor {
        kind: ServiceKind::Vpc,
        slug: "vpc",
        display_name: "VPC",
        category: ServiceCategory::Networking,
        title: "Virtual Private Cloud",
        description: "Isolated VPCs with public/private subnets, gateways and route tables.",
        workflow_file: "terraform-vpc.yml",
        required_fields: &["vpc_name"],
    },
    ServiceDescriptor {
        kind: ServiceKind::Elb,
        slug: "elb",
        display_name: "ELB",
        category: ServiceCategory::LoadBalancing,
        title: "Elastic Load Balancer",
        description: "Application or network load balancers with a target group.",
        workflow_file: "terraform-elb.yml",
        required_fields: &["lb_name"],
    },
    ServiceDescriptor {
        kind: ServiceKind::CloudFront,
        slug: "cloudfront",
        display_name: "CloudFront",
        category: ServiceCategory::Cdn,
        title: "CloudFront distribution",
        description: "CloudFront distributions in front of an origin domain.",
        workflow_file: "terraform-cloudfront.yml",
        required_fields: &["origin_domain"],
    },
    ServiceDescriptor {
        kind: ServiceKind::Route53,
        slug: "route53",
        display_name: "Route 53",
        category: ServiceCategory::Dns,
        title: "Route 53 zone",
        description: "DNS zones and A/CNAME/MX records.",
        workflow_file: "terraform-route53.yml",
        required_fields: &["zone_name", "record_value"],
    },
    ServiceDescriptor {
        kind: ServiceKind::CloudWatch,
        slug: "cloudwatch",
        display_name: "CloudWatch",
        category: ServiceCategory::Monitoring,
        title: "CloudWatch alarm",
        description: "Metric alarms for AWS resources.",
        workflow_file: "terraform-cloudwatch.yml",
        required_fields: &["alarm_name", "metric_name", "threshold"],
    },
    ServiceDescriptor {
        kind: ServiceKind::CodePipeline,
        slug: "codepipeline",
        display_name: "CodePipeline",
        category: ServiceCategory::DevOps,
        title: "CI/CD pipeline",
        description: "Source, build, test, approval and deploy stages.",
        workflow_file: "terraform-codepipeline.yml",
        required_fields: &["pipeline_name", "environment", "source_provider", "deploy_provider"],
    },
    ServiceDescriptor {
        kind: ServiceKind::CodeBuild,
        slug: "codebuild",
        display_name: "CodeBuild",
        category: ServiceCategory::DevOps,
        title: "Build project",
        description: "Managed build environments with buildspec, cache and artifacts.",
        workflow_file: "terraform-codebuild.yml",
        required_fields: &["project_name", "environment", "source_type"],
    },
    ServiceDescriptor {
        kind: ServiceKind::CodeDeploy,
        slug: "codedeploy",
        display_name: "CodeDeploy",
        category: ServiceCategory::DevOps,
        title: "CodeDeploy application",
        description: "Deployments to EC2, Lambda or ECS with blue/green and rollback.",
        workflow_file: "terraform-codedeploy.yml",
        required_fields: &[
            "application_name",
            "compute_platform",
            "deployment_group_name",
            "environment",
        ],
    },
    ServiceDescriptor {
        kind: ServiceKind::Ssm,
        slug: "ssm",
        display_name: "Systems Manager",
        category: ServiceCategory::Management,
        title: "Parameter Store",
        description: "Parameter Store entries with optional KMS encryption and Session Manager.",
        workflow_file: "terraform-ssm.yml",
        required_fields: &["environment", "namespace"],
    },
    ServiceDescriptor {
        kind: ServiceKind::Budgets,
        slug: "budgets",
        display_name: "Budgets",
        category: ServiceCategory::Cost,
        title: "AWS budget",
        description: "Budgets with e-mail or SNS alert thresholds.",
        workflow_file: "terraform-budgets.yml",
        required_fields: &["budget_name", "budget_amount"],
    },
    ServiceDescriptor {
        kind: ServiceKind::CostExplorer,
        slug: "cost-explorer",
        display_name: "Cost Explorer",
        category: ServiceCategory::Cost,
        title: "Cost Explorer",
        description: "Cost Explorer API access and scheduled cost reports.",
        workflow_file: "terraform-cost-explorer.yml",
        required_fields: &[],
    },
    ServiceDescriptor {
        kind: ServiceKind::TrustedAdvisor,
        slug: "trusted-advisor",
        display_name: "Trusted Advisor",
        category: ServiceCategory::Cost,
        title: "Trusted Advisor",
        description: "Trusted Advisor check notifications for cost, security, performance and limits.",
        workflow_file: "terraform-trusted-advisor.yml",
        required_fields: &[],
    },
];

/// Maps service kinds to the workflow file the dispatch client triggers.
#[derive(Debug, Clone)]
pub struct WorkflowRegistry {
    files: HashMap<ServiceKind, String>,
}

impl WorkflowRegistry {
    /// Registry seeded with every catalog entry.
    pub fn from_catalog() -> Self {
        let files = CATALOG
            .iter()
            .map(|descriptor| (descriptor.kind, descriptor.workflow_file.to_string()))
            .collect();
        Self { files }
    }

    /// Applies `slug=file.yml` overrides from configuration.
    pub fn with_overrides<'a, I>(mut self, overrides: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = &'a (String, String)>,
    {
        for (slug, file) in overrides {
            let kind = ServiceKind::from_slug(slug)
                .ok_or_else(|| ConfigurationError::UnknownService(slug.clone()))?;
            self = self.register(kind, file.as_str());
        }
        Ok(self)
    }

    pub fn register(mut self, kind: ServiceKind, workflow_file: impl Into<String>) -> Self {
        self.files.insert(kind, workflow_file.into());
        self
    }

    pub fn without(mut self, kind: ServiceKind) -> Self {
        self.files.remove(&kind);
        self
    }

    pub fn workflow_file(&self, kind: ServiceKind) -> Result<&str, ConfigurationError> {
        self.files
            .get(&kind)
            .map(String::as_str)
            .ok_or(ConfigurationError::UnregisteredWorkflow(kind))
    }
}

impl Default for WorkflowRegistry {
    fn default() -> Self {
        Self::from_catalog()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_order_matches_kind_discriminants() {
        for kind in ServiceKind::ALL {
            assert_eq!(kind.descriptor().kind, kind);
        }
        assert_eq!(catalog().len(), ServiceKind::ALL.len());
    }

    #[test]
    fn slugs_and_workflow_files_are_unique() {
        let slugs: HashSet<_> = catalog().iter().map(|entry| entry.slug).collect();
        let files: HashSet<_> = catalog().iter().map(|entry| entry.workflow_file).collect();
        assert_eq!(slugs.len(), catalog().len());
        assert_eq!(files.len(), catalog().len());
    }

    #[test]
    fn from_slug_round_trips_every_kind() {
        for kind in ServiceKind::ALL {
            assert_eq!(ServiceKind::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(ServiceKind::from_slug(" Secrets-Manager "), Some(ServiceKind::SecretsManager));
        assert_eq!(ServiceKind::from_slug("dynamodb"), None);
    }

    #[test]
    fn registry_resolves_every_catalog_entry() {
        let registry = WorkflowRegistry::from_catalog();
        for kind in ServiceKind::ALL {
            let file = registry.workflow_file(kind).expect("workflow registered");
            assert!(file.starts_with("terraform-") && file.ends_with(".yml"));
        }
    }

    #[test]
    fn registry_reports_missing_mapping() {
        let registry = WorkflowRegistry::from_catalog().without(ServiceKind::Ssm);
        match registry.workflow_file(ServiceKind::Ssm) {
            Err(ConfigurationError::UnregisteredWorkflow(ServiceKind::Ssm)) => {}
            other => panic!("expected unregistered workflow, got {other:?}"),
        }
    }

    #[test]
    fn register_replaces_an_existing_mapping() {
        let registry = WorkflowRegistry::from_catalog()
            .without(ServiceKind::Budgets)
            .register(ServiceKind::Budgets, "finops-budgets.yml")
            .register(ServiceKind::Vpc, "network-vpc.yml");

        assert_eq!(
            registry.workflow_file(ServiceKind::Budgets).expect("re-registered"),
            "finops-budgets.yml"
        );
        assert_eq!(
            registry.workflow_file(ServiceKind::Vpc).expect("replaced"),
            "network-vpc.yml"
        );
        assert_eq!(
            registry.workflow_file(ServiceKind::Ssm).expect("untouched"),
            "terraform-ssm.yml"
        );
    }

    #[test]
    fn registry_overrides_reject_unknown_slugs() {
        let overrides = vec![
            ("s3".to_string(), "static-site.yml".to_string()),
            ("dynamodb".to_string(), "dynamo.yml".to_string()),
        ];
        match WorkflowRegistry::from_catalog().with_overrides(&overrides) {
            Err(ConfigurationError::UnknownService(slug)) => assert_eq!(slug, "dynamodb"),
            other => panic!("expected unknown service, got {other:?}"),
        }

        let registry = WorkflowRegistry::from_catalog()
            .with_overrides(&overrides[..1])
            .expect("known slug accepted");
        assert_eq!(
            registry.workflow_file(ServiceKind::S3).expect("registered"),
            "static-site.yml"
        );
    }
}
