// ABOUTME: Generic deployment pipeline struct parameterized by state marker.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::remote::InstanceRef;
use crate::types::ServiceName;

use super::DeployError;
use super::context::{ServiceConfig, ServicePackage, TargetResource, validate_target};
use super::state::{Deployed, TierResolved, Uploaded, Validated};

/// A deployment in progress, parameterized by its current state.
///
/// Transitions consume the pipeline, so a step can only run once the steps
/// before it have produced what it needs.
#[derive(Debug)]
pub struct DeployPipeline<S> {
    pub(crate) service: ServiceName,
    pub(crate) build_name: String,
    pub(crate) target: TargetResource,
    pub(crate) instance: InstanceRef,
    pub(crate) package: ServicePackage,
    pub(crate) state: S,
}

impl DeployPipeline<Validated> {
    /// Start a pipeline. Fails if the target is not deployable.
    pub fn validate(
        service: &ServiceConfig,
        package: &ServicePackage,
        target: &TargetResource,
    ) -> Result<Self, DeployError> {
        validate_target(target)?;

        Ok(DeployPipeline {
            service: service.name.clone(),
            build_name: service.build_name(),
            target: target.clone(),
            instance: target.instance(),
            package: package.clone(),
            state: Validated {
                options: service.spring.clone(),
            },
        })
    }
}

impl<S> DeployPipeline<S> {
    pub fn service_name(&self) -> &ServiceName {
        &self.service
    }

    pub fn target(&self) -> &TargetResource {
        &self.target
    }

    pub fn package(&self) -> &ServicePackage {
        &self.package
    }
}

impl DeployPipeline<Uploaded> {
    pub fn upload_reference(&self) -> &crate::types::UploadReference {
        &self.state.upload
    }
}

impl DeployPipeline<TierResolved> {
    pub fn tier(&self) -> &crate::remote::Tier {
        &self.state.tier
    }
}

impl DeployPipeline<Deployed> {
    pub fn result_token(&self) -> &str {
        &self.state.result_token
    }
}
