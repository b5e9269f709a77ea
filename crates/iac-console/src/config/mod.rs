use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "testing" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub github: GitHubConfig,
    pub provisioning: ProvisioningConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(raw) => LogFormat::parse(&raw)?,
            Err(_) => LogFormat::Compact,
        };

        let token = env::var("GITHUB_TOKEN")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let github = GitHubConfig {
            token,
            owner: env_or("GITHUB_REPO_OWNER", "votre-organisation"),
            repository: env_or("GITHUB_REPO_NAME", "sonatel-iac"),
            api_base: env_or("GITHUB_API_URL", DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            web_base: env_or("GITHUB_WEB_URL", DEFAULT_WEB_BASE)
                .trim_end_matches('/')
                .to_string(),
            api_version: env_or("GITHUB_API_VERSION", DEFAULT_API_VERSION),
        };

        let provisioning = ProvisioningConfig::from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            github,
            provisioning,
        })
    }
}

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_WEB_BASE: &str = "https://github.com";
pub const DEFAULT_API_VERSION: &str = "2022-11-28";
pub const DEFAULT_REGION: &str = "eu-west-3";

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Parses `slug=file.yml` pairs separated by commas.
fn parse_workflow_overrides(raw: &str) -> Result<Vec<(String, String)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((slug, file)) if !slug.trim().is_empty() && !file.trim().is_empty() => {
                Ok((slug.trim().to_string(), file.trim().to_string()))
            }
            _ => Err(ConfigError::InvalidWorkflowOverride {
                entry: entry.to_string(),
            }),
        })
        .collect()
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidLogFormat {
                value: other.to_string(),
            }),
        }
    }
}

/// Credentials and coordinates of the repository hosting the Terraform workflows.
#[derive(Clone)]
pub struct GitHubConfig {
    pub token: String,
    pub owner: String,
    pub repository: String,
    pub api_base: String,
    pub web_base: String,
    pub api_version: String,
}

impl GitHubConfig {
    /// `owner/repo` slug used in API paths and operator-facing summaries.
    pub fn repository_slug(&self) -> String {
        format!("{}/{}", self.owner, self.repository)
    }
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &"<redacted>")
            .field("owner", &self.owner)
            .field("repository", &self.repository)
            .field("api_base", &self.api_base)
            .field("web_base", &self.web_base)
            .field("api_version", &self.api_version)
            .finish()
    }
}

/// Defaults and catalog adjustments applied to every submission.
#[derive(Debug, Clone)]
pub struct ProvisioningConfig {
    pub default_region: String,
    pub workflow_overrides: Vec<(String, String)>,
}

impl ProvisioningConfig {
    /// Reads `AWS_REGION` and `GITHUB_WORKFLOW_OVERRIDES`. Needs no credentials,
    /// so offline tooling can validate forms with the same defaults as the server.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let workflow_overrides = match env::var("GITHUB_WORKFLOW_OVERRIDES") {
            Ok(raw) => parse_workflow_overrides(&raw)?,
            Err(_) => Vec::new(),
        };

        Ok(Self {
            default_region: env_or("AWS_REGION", DEFAULT_REGION),
            workflow_overrides,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat { value: String },
    MissingToken,
    InvalidWorkflowOverride { entry: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat { value } => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json' (got '{value}')")
            }
            ConfigError::MissingToken => {
                write!(f, "GITHUB_TOKEN must be set to dispatch workflows")
            }
            ConfigError::InvalidWorkflowOverride { entry } => write!(
                f,
                "GITHUB_WORKFLOW_OVERRIDES entry '{entry}' must look like slug=file.yml"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidLogFormat { .. }
            | ConfigError::MissingToken
            | ConfigError::InvalidWorkflowOverride { .. } => None,
        }
    }
}
