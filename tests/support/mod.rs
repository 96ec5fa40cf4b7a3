// ABOUTME: Test support utilities.
// ABOUTME: Provides a recording Spring service double and package fixtures.

// Each test binary only uses some of these helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use springship::deploy::{ServiceConfig, ServicePackage, TargetResource};
use springship::remote::{
    AppProperties, BuildRequest, BuildResult, InstanceRef, RemoteError, SpringDeployment,
    SpringService, Tier,
};
use springship::types::{BuildResultId, ServiceName, UploadReference};
use std::path::Path;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("springship=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub const UPLOAD_PATH: &str = "resources/upload-1/app.jar";
pub const BUILD_RESULT: &str = "build-result-1";
pub const ARTIFACT_TOKEN: &str = "tok-1";
pub const BUILD_TOKEN: &str = "tok-build-1";
pub const ENDPOINT: &str = "https://svc1.example";

/// Remote operations, as recorded by [`FakeSpringService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    GetDeployment,
    UploadArtifact,
    GetServiceTier,
    CreateBuild,
    GetBuildResult,
    DeployBuildResult,
    DeployArtifact,
    GetAppProperties,
}

/// Spring service double that records every call.
pub struct FakeSpringService {
    tier: String,
    endpoints: Vec<String>,
    missing_deployment: bool,
    failing: Option<Op>,
    hanging: Option<Op>,
    calls: Mutex<Vec<Op>>,
    build_requests: Mutex<Vec<BuildRequest>>,
}

impl FakeSpringService {
    pub fn new(tier: &str) -> Self {
        Self {
            tier: tier.to_string(),
            endpoints: vec![ENDPOINT.to_string()],
            missing_deployment: false,
            failing: None,
            hanging: None,
            calls: Mutex::new(Vec::new()),
            build_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn standard() -> Self {
        Self::new("Standard")
    }

    pub fn enterprise() -> Self {
        Self::new("Enterprise")
    }

    pub fn with_endpoints(mut self, endpoints: Vec<String>) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Report the configured deployment as missing.
    pub fn without_deployment(mut self) -> Self {
        self.missing_deployment = true;
        self
    }

    /// Fail `op` with a server error.
    pub fn failing(mut self, op: Op) -> Self {
        self.failing = Some(op);
        self
    }

    /// Never complete `op`.
    pub fn hanging(mut self, op: Op) -> Self {
        self.hanging = Some(op);
        self
    }

    pub fn calls(&self) -> Vec<Op> {
        self.calls.lock().clone()
    }

    pub fn called(&self, op: Op) -> bool {
        self.calls.lock().contains(&op)
    }

    pub fn build_requests(&self) -> Vec<BuildRequest> {
        self.build_requests.lock().clone()
    }

    async fn record(&self, op: Op) -> Result<(), RemoteError> {
        self.calls.lock().push(op);

        if self.hanging == Some(op) {
            std::future::pending::<()>().await;
        }

        if self.failing == Some(op) {
            return Err(RemoteError::Status {
                method: "POST".to_string(),
                url: format!("https://mgmt.example/{op:?}"),
                status: 500,
                message: "internal error".to_string(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl SpringService for FakeSpringService {
    async fn get_deployment(
        &self,
        _instance: &InstanceRef,
        app: &str,
        deployment: &str,
    ) -> Result<SpringDeployment, RemoteError> {
        self.record(Op::GetDeployment).await?;
        if self.missing_deployment {
            return Err(RemoteError::NotFound {
                resource: format!("deployment {deployment} of {app}"),
            });
        }
        Ok(SpringDeployment {
            name: deployment.to_string(),
            provisioning_state: Some("Succeeded".to_string()),
        })
    }

    async fn upload_artifact(
        &self,
        _instance: &InstanceRef,
        _app: &str,
        _local_path: &Path,
    ) -> Result<UploadReference, RemoteError> {
        self.record(Op::UploadArtifact).await?;
        Ok(UploadReference::new(UPLOAD_PATH))
    }

    async fn get_service_tier(&self, _instance: &InstanceRef) -> Result<Tier, RemoteError> {
        self.record(Op::GetServiceTier).await?;
        Ok(Tier::from_name(&self.tier))
    }

    async fn create_build(
        &self,
        _instance: &InstanceRef,
        request: &BuildRequest,
    ) -> Result<BuildResultId, RemoteError> {
        self.record(Op::CreateBuild).await?;
        self.build_requests.lock().push(request.clone());
        Ok(BuildResultId::new(BUILD_RESULT))
    }

    async fn get_build_result(
        &self,
        _instance: &InstanceRef,
        _build_service: &str,
        _build_name: &str,
        build_result_id: &BuildResultId,
    ) -> Result<BuildResult, RemoteError> {
        self.record(Op::GetBuildResult).await?;
        Ok(BuildResult {
            name: build_result_id.to_string(),
            provisioning_state: "Succeeded".to_string(),
        })
    }

    async fn deploy_build_result(
        &self,
        _instance: &InstanceRef,
        _app: &str,
        _build_result_id: &BuildResultId,
        _deployment: &str,
    ) -> Result<String, RemoteError> {
        self.record(Op::DeployBuildResult).await?;
        Ok(BUILD_TOKEN.to_string())
    }

    async fn deploy_artifact(
        &self,
        _instance: &InstanceRef,
        _app: &str,
        _relative_path: &UploadReference,
        _deployment: &str,
    ) -> Result<String, RemoteError> {
        self.record(Op::DeployArtifact).await?;
        Ok(ARTIFACT_TOKEN.to_string())
    }

    async fn get_app_properties(
        &self,
        _instance: &InstanceRef,
        _app: &str,
    ) -> Result<AppProperties, RemoteError> {
        self.record(Op::GetAppProperties).await?;
        Ok(AppProperties {
            urls: self.endpoints.clone(),
        })
    }
}

pub fn service(name: &str) -> ServiceConfig {
    ServiceConfig::new(ServiceName::new(name).unwrap())
}

pub fn target() -> TargetResource {
    TargetResource::new("sub-1", "rg-1", "spring-1")
}

/// A package directory holding an `app.jar`.
pub fn package_with_artifact() -> (tempfile::TempDir, ServicePackage) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("app.jar"), b"PK\x03\x04jar").unwrap();
    let package = ServicePackage::new(dir.path());
    (dir, package)
}

/// A package directory with nothing in it.
pub fn empty_package() -> (tempfile::TempDir, ServicePackage) {
    let dir = tempfile::tempdir().unwrap();
    let package = ServicePackage::new(dir.path());
    (dir, package)
}
