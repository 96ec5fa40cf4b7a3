// ABOUTME: Service target for Spring app hosts, driving the deployment pipeline.
// ABOUTME: deploy() returns a running ProgressTask immediately; the body runs on tokio.

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::env::PropertyStore;
use crate::remote::SpringService;
use crate::task::{ProgressEmitter, ProgressTask};

use super::DeployError;
use super::context::{ServiceConfig, ServicePackage, TargetResource};
use super::deployment::DeployPipeline;
use super::record::{DeployPhase, DeploymentRecord, ServiceProgress};
use super::transitions::fetch_endpoints;

/// Task type returned by deployment operations.
pub type DeployTask<T> = ProgressTask<T, ServiceProgress, DeployError>;

/// A host that services can be packaged for and deployed to.
#[async_trait]
pub trait ServiceTarget: Send + Sync {
    /// External tools this target shells out to.
    fn required_external_tools(&self) -> Vec<String>;

    /// Prepare the target for a service before any other operation.
    async fn initialize(&self, service: &ServiceConfig) -> Result<(), DeployError>;

    /// Turn build output into a deployable package.
    fn package(&self, service: &ServiceConfig, package: ServicePackage) -> DeployTask<ServicePackage>;

    /// Deploy a package. The returned task is already running.
    fn deploy(
        &self,
        service: &ServiceConfig,
        package: &ServicePackage,
        target: &TargetResource,
        cancel: CancellationToken,
    ) -> DeployTask<DeploymentRecord>;

    /// Public URLs of a deployed service.
    async fn endpoints(
        &self,
        service: &ServiceConfig,
        target: &TargetResource,
    ) -> Result<Vec<String>, DeployError>;
}

/// Deploys jar packages to Spring app hosts.
///
/// The target resource may carry only a resource group, since the app host
/// can be provisioned later than the deployment is configured.
pub struct SpringAppTarget<R, St: ?Sized> {
    spring: Arc<R>,
    store: Arc<St>,
}

impl<R, St: ?Sized> SpringAppTarget<R, St> {
    pub fn new(spring: Arc<R>, store: Arc<St>) -> Self {
        Self { spring, store }
    }
}

impl<R, St> SpringAppTarget<R, St>
where
    R: SpringService + 'static,
    St: PropertyStore + ?Sized + 'static,
{
    /// Deploy without an external cancellation signal.
    pub fn deploy_package(
        &self,
        service: &ServiceConfig,
        package: &ServicePackage,
        target: &TargetResource,
    ) -> DeployTask<DeploymentRecord> {
        self.deploy(service, package, target, CancellationToken::new())
    }
}

#[async_trait]
impl<R, St> ServiceTarget for SpringAppTarget<R, St>
where
    R: SpringService + 'static,
    St: PropertyStore + ?Sized + 'static,
{
    fn required_external_tools(&self) -> Vec<String> {
        Vec::new()
    }

    async fn initialize(&self, _service: &ServiceConfig) -> Result<(), DeployError> {
        Ok(())
    }

    fn package(&self, _service: &ServiceConfig, package: ServicePackage) -> DeployTask<ServicePackage> {
        // Jars are deployed as built.
        ProgressTask::ready(package)
    }

    fn deploy(
        &self,
        service: &ServiceConfig,
        package: &ServicePackage,
        target: &TargetResource,
        cancel: CancellationToken,
    ) -> DeployTask<DeploymentRecord> {
        let spring = Arc::clone(&self.spring);
        let store = Arc::clone(&self.store);
        let service = service.clone();
        let package = package.clone();
        let target = target.clone();

        ProgressTask::spawn_cancellable(cancel, move |progress| async move {
            run_deploy(spring.as_ref(), store.as_ref(), &progress, &service, &package, &target)
                .await
        })
    }

    async fn endpoints(
        &self,
        service: &ServiceConfig,
        target: &TargetResource,
    ) -> Result<Vec<String>, DeployError> {
        fetch_endpoints(self.spring.as_ref(), &target.instance(), &service.name).await
    }
}

/// The full deployment sequence, run inside the task body.
async fn run_deploy<R, St>(
    spring: &R,
    store: &St,
    progress: &ProgressEmitter<ServiceProgress>,
    service: &ServiceConfig,
    package: &ServicePackage,
    target: &TargetResource,
) -> Result<DeploymentRecord, DeployError>
where
    R: SpringService + ?Sized,
    St: PropertyStore + ?Sized,
{
    tracing::info!(
        "Deploying {} to {}/{}",
        service.name,
        target.resource_group_name,
        target.resource_name
    );

    let pipeline = DeployPipeline::validate(service, package, target)?
        .resolve_defaults()
        .confirm_deployment(spring)
        .await?
        .locate_artifact()
        .await?;

    progress.emit(ServiceProgress::new(DeployPhase::Uploading));
    let pipeline = pipeline
        .upload_artifact(spring)
        .await?
        .resolve_tier(spring)
        .await?
        .deploy(spring, store, progress)
        .await?;

    progress.emit(ServiceProgress::new(DeployPhase::FetchingEndpoints));
    let record = pipeline.fetch_endpoints(spring).await?;

    tracing::info!("Deployed {} ({})", service.name, record.details);
    Ok(record)
}
