// ABOUTME: Deployment context: target resource, Spring options, and built package.
// ABOUTME: Holds the pure validation and default-resolution rules applied before any remote call.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::remote::InstanceRef;
use crate::types::{SPRING_RESOURCE_TYPE, ServiceName};

use super::DeployError;

pub const DEFAULT_DEPLOYMENT_NAME: &str = "default";
pub const DEFAULT_BUILD_SERVICE_NAME: &str = "default";
pub const DEFAULT_BUILDER_NAME: &str = "default";
pub const DEFAULT_AGENT_POOL_NAME: &str = "default";
pub const DEFAULT_JVM_VERSION: &str = "17";

/// Appended to the service name to name its build.
pub const BUILD_NAME_SUFFIX: &str = "-springship-build";

/// File name of the package produced by the build step.
pub const ARTIFACT_FILENAME: &str = "app.jar";

/// Per-service Spring deployment options. Empty fields take defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringOptions {
    #[serde(alias = "deploymentName")]
    pub deployment_name: String,
    #[serde(alias = "buildServiceName")]
    pub build_service_name: String,
    #[serde(alias = "builderName")]
    pub builder_name: String,
    #[serde(alias = "agentPoolName")]
    pub agent_pool_name: String,
    #[serde(alias = "jvmVersion")]
    pub jvm_version: String,
}

impl SpringOptions {
    /// Copy of these options with every empty field replaced by its default.
    pub fn with_defaults(&self) -> SpringOptions {
        fn or_default(value: &str, default: &str) -> String {
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        }

        SpringOptions {
            deployment_name: or_default(&self.deployment_name, DEFAULT_DEPLOYMENT_NAME),
            build_service_name: or_default(&self.build_service_name, DEFAULT_BUILD_SERVICE_NAME),
            builder_name: or_default(&self.builder_name, DEFAULT_BUILDER_NAME),
            agent_pool_name: or_default(&self.agent_pool_name, DEFAULT_AGENT_POOL_NAME),
            jvm_version: or_default(&self.jvm_version, DEFAULT_JVM_VERSION),
        }
    }
}

/// A service as the deployment target sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub name: ServiceName,
    pub spring: SpringOptions,
}

impl ServiceConfig {
    pub fn new(name: ServiceName) -> Self {
        Self {
            name,
            spring: SpringOptions::default(),
        }
    }

    pub fn with_spring(mut self, spring: SpringOptions) -> Self {
        self.spring = spring;
        self
    }

    /// Name of the build created for this service on Enterprise instances.
    pub fn build_name(&self) -> String {
        format!("{}{}", self.name, BUILD_NAME_SUFFIX)
    }
}

/// The service instance a deployment goes to.
///
/// The resource name and type may be empty before provisioning has run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetResource {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub resource_name: String,
    pub resource_type: String,
}

impl TargetResource {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group_name: impl Into<String>,
        resource_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group_name: resource_group_name.into(),
            resource_name: resource_name.into(),
            resource_type: String::new(),
        }
    }

    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = resource_type.into();
        self
    }

    pub fn instance(&self) -> InstanceRef {
        InstanceRef {
            subscription_id: self.subscription_id.clone(),
            resource_group: self.resource_group_name.clone(),
            resource_name: self.resource_name.clone(),
        }
    }
}

/// Check a target before anything remote happens.
pub fn validate_target(target: &TargetResource) -> Result<(), DeployError> {
    if target.resource_group_name.is_empty() {
        return Err(DeployError::MissingResourceGroup);
    }

    if !target.resource_type.is_empty() && target.resource_type != SPRING_RESOURCE_TYPE {
        return Err(DeployError::ResourceTypeMismatch {
            resource: target.resource_name.clone(),
            expected: SPRING_RESOURCE_TYPE.to_string(),
            actual: target.resource_type.clone(),
        });
    }

    Ok(())
}

/// Output of packaging: the directory holding the built artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServicePackage {
    pub package_path: PathBuf,
}

impl ServicePackage {
    pub fn new(package_path: impl Into<PathBuf>) -> Self {
        Self {
            package_path: package_path.into(),
        }
    }

    /// Where the deployable artifact is expected.
    pub fn artifact_path(&self) -> PathBuf {
        self.package_path.join(ARTIFACT_FILENAME)
    }

    pub fn path(&self) -> &Path {
        &self.package_path
    }
}
