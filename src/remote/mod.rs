// ABOUTME: Remote Spring service contract and its HTTP implementation.
// ABOUTME: The orchestrator only depends on the SpringService trait.

mod error;
mod http;
mod types;

pub use error::{RemoteError, RemoteErrorKind};
pub use http::{BuildPollSettings, DEFAULT_MANAGEMENT_URL, HttpSpringService};
pub use types::{
    AppProperties, BuildRequest, BuildResult, ENTERPRISE_TIER, InstanceRef, STANDARD_TIERS,
    SpringDeployment, Tier,
};

use async_trait::async_trait;
use std::path::Path;

use crate::types::{BuildResultId, UploadReference};

/// Operations the deployment orchestrator needs from the remote service.
///
/// Implementations own any retry or polling behavior.
#[async_trait]
pub trait SpringService: Send + Sync {
    /// Look up an app deployment by name.
    async fn get_deployment(
        &self,
        instance: &InstanceRef,
        app: &str,
        deployment: &str,
    ) -> Result<SpringDeployment, RemoteError>;

    /// Transfer a local artifact to service storage.
    async fn upload_artifact(
        &self,
        instance: &InstanceRef,
        app: &str,
        local_path: &Path,
    ) -> Result<UploadReference, RemoteError>;

    /// Resolve the instance's tier.
    async fn get_service_tier(&self, instance: &InstanceRef) -> Result<Tier, RemoteError>;

    /// Submit a build of an uploaded artifact.
    async fn create_build(
        &self,
        instance: &InstanceRef,
        request: &BuildRequest,
    ) -> Result<BuildResultId, RemoteError>;

    /// Wait for a build result to settle successfully.
    async fn get_build_result(
        &self,
        instance: &InstanceRef,
        build_service: &str,
        build_name: &str,
        build_result_id: &BuildResultId,
    ) -> Result<BuildResult, RemoteError>;

    /// Point a deployment at a build result. Returns the deployment result token.
    async fn deploy_build_result(
        &self,
        instance: &InstanceRef,
        app: &str,
        build_result_id: &BuildResultId,
        deployment: &str,
    ) -> Result<String, RemoteError>;

    /// Point a deployment at an uploaded artifact. Returns the deployment result token.
    async fn deploy_artifact(
        &self,
        instance: &InstanceRef,
        app: &str,
        relative_path: &UploadReference,
        deployment: &str,
    ) -> Result<String, RemoteError>;

    /// Fetch app properties, including its public URLs.
    async fn get_app_properties(
        &self,
        instance: &InstanceRef,
        app: &str,
    ) -> Result<AppProperties, RemoteError>;
}
