// ABOUTME: State transition methods for the deployment pipeline.
// ABOUTME: Each method consumes self and returns the next state on success.

use chrono::Utc;

use crate::env::{BUILD_RESULT_ID, PropertyStore, RELATIVE_PATH};
use crate::remote::{BuildRequest, SpringService, Tier};
use crate::task::ProgressEmitter;
use crate::types::ServiceName;

use super::DeployError;
use super::deployment::DeployPipeline;
use super::error::DeployStep;
use super::record::{DeployPhase, DeploymentRecord, ServiceProgress, ServiceTargetKind};
use super::state::{Confirmed, Deployed, Located, Resolved, TierResolved, Uploaded, Validated};

// =============================================================================
// Internal Helpers
// =============================================================================

impl<S> DeployPipeline<S> {
    /// Internal helper to move to a new state.
    fn transition<T>(self, state: T) -> DeployPipeline<T> {
        DeployPipeline {
            service: self.service,
            build_name: self.build_name,
            target: self.target,
            instance: self.instance,
            package: self.package,
            state,
        }
    }

    fn remote_err(&self, step: DeployStep) -> impl FnOnce(crate::remote::RemoteError) -> DeployError {
        let service = self.service.to_string();
        move |source| DeployError::remote(step, service, source)
    }
}

/// Upsert a service property and flush the store.
///
/// A failed flush fails the deployment even though the remote side already
/// changed; the store is not rolled back.
pub async fn persist_property<St: PropertyStore + ?Sized>(
    store: &St,
    service: &ServiceName,
    key: &str,
    value: &str,
) -> Result<(), DeployError> {
    store.set_service_property(service, key, value);
    store
        .save()
        .await
        .map_err(|source| DeployError::Persistence {
            key: key.to_string(),
            source,
        })?;

    tracing::debug!("Recorded {} for {}", key, service);
    Ok(())
}

/// Fetch the public URLs of an app.
pub async fn fetch_endpoints<R: SpringService + ?Sized>(
    spring: &R,
    instance: &crate::remote::InstanceRef,
    service: &ServiceName,
) -> Result<Vec<String>, DeployError> {
    let properties = spring
        .get_app_properties(instance, service.as_str())
        .await
        .map_err(|source| DeployError::remote(DeployStep::FetchEndpoints, service.as_str(), source))?;
    Ok(properties.urls)
}

// =============================================================================
// Validated -> Resolved -> Confirmed
// =============================================================================

impl DeployPipeline<Validated> {
    /// Fill empty options with their defaults. Pure.
    pub fn resolve_defaults(self) -> DeployPipeline<Resolved> {
        let options = self.state.options.with_defaults();
        self.transition(Resolved { options })
    }
}

impl DeployPipeline<Resolved> {
    /// Check that the configured deployment exists.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::DeploymentLookup`; its kind is `NotFound` when the
    /// service reports the deployment missing.
    pub async fn confirm_deployment<R: SpringService + ?Sized>(
        self,
        spring: &R,
    ) -> Result<DeployPipeline<Confirmed>, DeployError> {
        let deployment = &self.state.options.deployment_name;
        spring
            .get_deployment(&self.instance, self.service.as_str(), deployment)
            .await
            .map_err(|source| DeployError::DeploymentLookup {
                service: self.service.to_string(),
                deployment: deployment.clone(),
                source,
            })?;

        let options = self.state.options.clone();
        Ok(self.transition(Confirmed { options }))
    }
}

// =============================================================================
// Confirmed -> Located -> Uploaded -> TierResolved
// =============================================================================

impl DeployPipeline<Confirmed> {
    /// Check the packaged artifact is on disk.
    ///
    /// # Errors
    ///
    /// `ArtifactMissing` if nothing is at the path, `ArtifactUnreadable` for
    /// any other stat failure.
    pub async fn locate_artifact(self) -> Result<DeployPipeline<Located>, DeployError> {
        let artifact = self.package.artifact_path();

        match tokio::fs::metadata(&artifact).await {
            Ok(_) => {}
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(DeployError::ArtifactMissing {
                    path: artifact,
                    source,
                });
            }
            Err(source) => {
                return Err(DeployError::ArtifactUnreadable {
                    path: artifact,
                    source,
                });
            }
        }

        let options = self.state.options.clone();
        Ok(self.transition(Located { options, artifact }))
    }
}

impl DeployPipeline<Located> {
    pub async fn upload_artifact<R: SpringService + ?Sized>(
        self,
        spring: &R,
    ) -> Result<DeployPipeline<Uploaded>, DeployError> {
        let upload = spring
            .upload_artifact(&self.instance, self.service.as_str(), &self.state.artifact)
            .await
            .map_err(self.remote_err(DeployStep::UploadArtifact))?;

        tracing::debug!("Uploaded {} as {}", self.state.artifact.display(), upload);
        let options = self.state.options.clone();
        Ok(self.transition(Uploaded { options, upload }))
    }
}

impl DeployPipeline<Uploaded> {
    pub async fn resolve_tier<R: SpringService + ?Sized>(
        self,
        spring: &R,
    ) -> Result<DeployPipeline<TierResolved>, DeployError> {
        let tier = spring
            .get_service_tier(&self.instance)
            .await
            .map_err(self.remote_err(DeployStep::ResolveTier))?;

        tracing::info!("Service {} is on tier {}", self.instance.resource_name, tier);
        let Uploaded { options, upload } = self.state.clone();
        Ok(self.transition(TierResolved {
            options,
            upload,
            tier,
        }))
    }
}

// =============================================================================
// TierResolved -> Deployed
// =============================================================================

impl DeployPipeline<TierResolved> {
    /// Deploy along the path the tier requires and record the result.
    ///
    /// Enterprise instances build the upload first and record
    /// `BUILD_RESULT_ID`; every other tier deploys the upload directly and
    /// records `RELATIVE_PATH`.
    pub async fn deploy<R, St>(
        self,
        spring: &R,
        store: &St,
        progress: &ProgressEmitter<ServiceProgress>,
    ) -> Result<DeployPipeline<Deployed>, DeployError>
    where
        R: SpringService + ?Sized,
        St: PropertyStore + ?Sized,
    {
        match self.state.tier {
            Tier::Enterprise => self.deploy_build(spring, store, progress).await,
            Tier::Standard(_) => self.deploy_upload(spring, store, progress).await,
        }
    }

    async fn deploy_build<R, St>(
        self,
        spring: &R,
        store: &St,
        progress: &ProgressEmitter<ServiceProgress>,
    ) -> Result<DeployPipeline<Deployed>, DeployError>
    where
        R: SpringService + ?Sized,
        St: PropertyStore + ?Sized,
    {
        let options = &self.state.options;
        let app = self.service.as_str();

        progress.emit(ServiceProgress::new(DeployPhase::CreatingBuild));
        let request = BuildRequest {
            build_service: options.build_service_name.clone(),
            agent_pool: options.agent_pool_name.clone(),
            builder: options.builder_name.clone(),
            build_name: self.build_name.clone(),
            jvm_version: options.jvm_version.clone(),
            relative_path: self.state.upload.clone(),
        };
        let build_result_id = spring
            .create_build(&self.instance, &request)
            .await
            .map_err(self.remote_err(DeployStep::CreateBuild))?;

        progress.emit(ServiceProgress::new(DeployPhase::FetchingBuildResult));
        spring
            .get_build_result(
                &self.instance,
                &options.build_service_name,
                &self.build_name,
                &build_result_id,
            )
            .await
            .map_err(self.remote_err(DeployStep::FetchBuildResult))?;

        progress.emit(ServiceProgress::new(DeployPhase::DeployingBuildResult));
        let result_token = spring
            .deploy_build_result(
                &self.instance,
                app,
                &build_result_id,
                &options.deployment_name,
            )
            .await
            .map_err(self.remote_err(DeployStep::DeployBuildResult))?;

        // Provisioning re-applies its template later; record the build so it is not lost.
        persist_property(store, &self.service, BUILD_RESULT_ID, build_result_id.as_str()).await?;

        let tier = self.state.tier.clone();
        Ok(self.transition(Deployed { tier, result_token }))
    }

    async fn deploy_upload<R, St>(
        self,
        spring: &R,
        store: &St,
        progress: &ProgressEmitter<ServiceProgress>,
    ) -> Result<DeployPipeline<Deployed>, DeployError>
    where
        R: SpringService + ?Sized,
        St: PropertyStore + ?Sized,
    {
        progress.emit(ServiceProgress::new(DeployPhase::DeployingArtifact));
        let result_token = spring
            .deploy_artifact(
                &self.instance,
                self.service.as_str(),
                &self.state.upload,
                &self.state.options.deployment_name,
            )
            .await
            .map_err(self.remote_err(DeployStep::DeployArtifact))?;

        persist_property(store, &self.service, RELATIVE_PATH, self.state.upload.as_str()).await?;

        let tier = self.state.tier.clone();
        Ok(self.transition(Deployed { tier, result_token }))
    }
}

// =============================================================================
// Deployed -> DeploymentRecord
// =============================================================================

impl DeployPipeline<Deployed> {
    /// Fetch the app's endpoints and produce the final record.
    pub async fn fetch_endpoints<R: SpringService + ?Sized>(
        self,
        spring: &R,
    ) -> Result<DeploymentRecord, DeployError> {
        let endpoints = fetch_endpoints(spring, &self.instance, &self.service).await?;

        Ok(DeploymentRecord {
            target_resource_id: self.instance.resource_id(),
            kind: ServiceTargetKind::SpringApp,
            details: self.state.result_token,
            endpoints,
            package: self.package,
            tier: self.state.tier,
            deployed_at: Utc::now(),
        })
    }
}
