// ABOUTME: Configuration types and parsing for springship.yml.
// ABOUTME: Handles YAML parsing, env var indirection, and per-service deployment inputs.

mod env_value;
mod init;

pub use env_value::EnvValue;
pub use init::init_config;

use crate::deploy::{ServiceConfig, ServicePackage, SpringOptions, TargetResource};
use crate::error::{Error, Result};
use crate::remote::{BuildPollSettings, DEFAULT_MANAGEMENT_URL};
use crate::types::ServiceName;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "springship.yml";
pub const CONFIG_FILENAME_ALT: &str = "springship.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".springship/config.yml";

/// Variable the access token is read from when the config names none.
pub const ACCESS_TOKEN_ENV: &str = "SPRINGSHIP_ACCESS_TOKEN";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub name: String,

    #[serde(default = "default_management_url")]
    pub management_url: String,

    #[serde(default = "default_access_token")]
    pub access_token: EnvValue,

    pub target: TargetConfig,

    #[serde(default)]
    pub build_poll: BuildPollConfig,

    #[serde(deserialize_with = "deserialize_services")]
    pub services: BTreeMap<ServiceName, ServiceEntry>,
}

/// Where services are deployed. Each field may come from the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    pub subscription: EnvValue,
    pub resource_group: EnvValue,
    #[serde(default)]
    pub resource_name: Option<EnvValue>,
    #[serde(default)]
    pub resource_type: Option<EnvValue>,
}

impl TargetConfig {
    /// Resolve into a deployment target.
    ///
    /// The resource name and type resolve to empty strings when their
    /// variables are unset; validation happens at deploy time.
    pub fn resolve(&self) -> Result<TargetResource> {
        let resource_name = self
            .resource_name
            .as_ref()
            .map(EnvValue::resolve_or_empty)
            .unwrap_or_default();
        let resource_type = self
            .resource_type
            .as_ref()
            .map(EnvValue::resolve_or_empty)
            .unwrap_or_default();

        Ok(TargetResource::new(
            self.subscription.resolve()?,
            self.resource_group.resolve()?,
            resource_name,
        )
        .with_resource_type(resource_type))
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BuildPollConfig {
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub interval: Duration,
    #[serde(default = "default_poll_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for BuildPollConfig {
    fn default() -> Self {
        Self {
            interval: default_poll_interval(),
            timeout: default_poll_timeout(),
        }
    }
}

impl From<BuildPollConfig> for BuildPollSettings {
    fn from(value: BuildPollConfig) -> Self {
        BuildPollSettings {
            interval: value.interval,
            timeout: value.timeout,
        }
    }
}

/// One deployable service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceEntry {
    /// Directory holding the built `app.jar`, relative to the project root.
    #[serde(default = "default_package_dir")]
    pub package: PathBuf,
    #[serde(default)]
    pub spring: SpringOptions,
}

fn default_management_url() -> String {
    DEFAULT_MANAGEMENT_URL.to_string()
}

fn default_access_token() -> EnvValue {
    EnvValue::from_env(ACCESS_TOKEN_ENV)
}

fn default_poll_interval() -> Duration {
    BuildPollSettings::default().interval
}

fn default_poll_timeout() -> Duration {
    BuildPollSettings::default().timeout
}

fn default_package_dir() -> PathBuf {
    PathBuf::from("target")
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("Loading config from {}", path.display());
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Look up a configured service by name.
    pub fn service(&self, name: &str) -> Result<(&ServiceName, &ServiceEntry)> {
        self.services
            .iter()
            .find(|(service, _)| service.as_str() == name)
            .ok_or_else(|| Error::UnknownService(name.to_string()))
    }

    /// Services selected by an optional name filter, in name order.
    pub fn select_services(&self, name: Option<&str>) -> Result<Vec<(&ServiceName, &ServiceEntry)>> {
        match name {
            Some(name) => Ok(vec![self.service(name)?]),
            None => Ok(self.services.iter().collect()),
        }
    }

    pub fn access_token(&self) -> Result<String> {
        match self.access_token.resolve() {
            Ok(token) if !token.is_empty() => Ok(token),
            Ok(_) | Err(Error::MissingEnvVar(_)) => Err(Error::MissingAccessToken),
            Err(e) => Err(e),
        }
    }

    pub fn poll_settings(&self) -> BuildPollSettings {
        self.build_poll.into()
    }

    pub fn template() -> Self {
        let mut services = BTreeMap::new();
        services.insert(
            ServiceName::new("api").expect("template service name is valid"),
            ServiceEntry {
                package: default_package_dir(),
                spring: SpringOptions::default(),
            },
        );

        Config {
            name: "my-app".to_string(),
            management_url: default_management_url(),
            access_token: default_access_token(),
            target: TargetConfig {
                subscription: EnvValue::from_env("AZURE_SUBSCRIPTION_ID"),
                resource_group: EnvValue::from_env("AZURE_RESOURCE_GROUP"),
                resource_name: Some(EnvValue::from_env("SPRING_RESOURCE_NAME")),
                resource_type: None,
            },
            build_poll: BuildPollConfig::default(),
            services,
        }
    }
}

impl ServiceEntry {
    pub fn service_config(&self, name: &ServiceName) -> ServiceConfig {
        ServiceConfig::new(name.clone()).with_spring(self.spring.clone())
    }

    /// Package location, resolved against the project root.
    pub fn service_package(&self, project_dir: &Path) -> ServicePackage {
        ServicePackage::new(project_dir.join(&self.package))
    }
}

fn deserialize_services<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<ServiceName, ServiceEntry>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let services = BTreeMap::<ServiceName, ServiceEntry>::deserialize(deserializer)?;
    if services.is_empty() {
        return Err(serde::de::Error::custom("at least one service is required"));
    }
    Ok(services)
}
