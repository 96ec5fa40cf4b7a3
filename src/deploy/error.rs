// ABOUTME: Error types for deployment operations.
// ABOUTME: Covers validation, missing resources, remote failures, and persistence.

use std::fmt;
use std::path::PathBuf;

use crate::env::StoreError;
use crate::remote::RemoteError;
use crate::task::Interrupted;

/// Remote step of the deployment pipeline that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStep {
    UploadArtifact,
    ResolveTier,
    CreateBuild,
    FetchBuildResult,
    DeployBuildResult,
    DeployArtifact,
    FetchEndpoints,
}

impl fmt::Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeployStep::UploadArtifact => "failed to upload spring artifact",
            DeployStep::ResolveTier => "failed to get tier",
            DeployStep::CreateBuild => "construct build failed",
            DeployStep::FetchBuildResult => "fetch build result failed",
            DeployStep::DeployBuildResult | DeployStep::DeployArtifact => "deploying service",
            DeployStep::FetchEndpoints => "fetching service properties",
        };
        write!(f, "{s}")
    }
}

/// Errors that can occur while deploying a service.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Target resource has no resource group.
    #[error("validating target resource: missing resource group name")]
    MissingResourceGroup,

    /// Target resource is of a different type than this target deploys to.
    #[error(
        "validating target resource: resource '{resource}' has type '{actual}', expected '{expected}'"
    )]
    ResourceTypeMismatch {
        resource: String,
        expected: String,
        actual: String,
    },

    /// The named deployment could not be looked up.
    #[error("get deployment '{deployment}' of Spring app '{service}' failed: {source}")]
    DeploymentLookup {
        service: String,
        deployment: String,
        source: RemoteError,
    },

    /// No package at the expected artifact path.
    #[error("artifact {} does not exist: {source}", path.display())]
    ArtifactMissing {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The artifact path exists but could not be inspected.
    #[error("reading artifact file {}: {source}", path.display())]
    ArtifactUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A remote step failed.
    #[error("{step} ({service}): {source}")]
    Remote {
        step: DeployStep,
        service: String,
        source: RemoteError,
    },

    /// The remote deployment succeeded but its record could not be saved.
    #[error("failed updating environment with {key}: {source}")]
    Persistence { key: String, source: StoreError },

    /// Cancellation was requested before the deployment finished.
    #[error("deployment canceled")]
    Canceled,

    /// The deployment task died without producing an outcome.
    #[error("deployment task aborted: {0}")]
    Aborted(String),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    /// Deployment context is malformed; nothing remote was attempted.
    Validation,
    /// A referenced deployment or artifact does not exist.
    NotFound,
    /// A remote operation failed.
    RemoteCall,
    /// Local I/O other than a missing artifact failed.
    Io,
    /// Deployment happened remotely but the local record is unreliable.
    Persistence,
    /// Canceled by the caller.
    Canceled,
    /// The task aborted unexpectedly.
    Internal,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::MissingResourceGroup | DeployError::ResourceTypeMismatch { .. } => {
                DeployErrorKind::Validation
            }
            DeployError::DeploymentLookup { source, .. } if source.is_not_found() => {
                DeployErrorKind::NotFound
            }
            DeployError::DeploymentLookup { .. } => DeployErrorKind::RemoteCall,
            DeployError::ArtifactMissing { .. } => DeployErrorKind::NotFound,
            DeployError::ArtifactUnreadable { .. } => DeployErrorKind::Io,
            DeployError::Remote { .. } => DeployErrorKind::RemoteCall,
            DeployError::Persistence { .. } => DeployErrorKind::Persistence,
            DeployError::Canceled => DeployErrorKind::Canceled,
            DeployError::Aborted(_) => DeployErrorKind::Internal,
        }
    }

    /// The failing remote step, if a remote step failed.
    pub fn step(&self) -> Option<DeployStep> {
        match self {
            DeployError::Remote { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Create a remote step error.
    pub fn remote(step: DeployStep, service: impl Into<String>, source: RemoteError) -> Self {
        DeployError::Remote {
            step,
            service: service.into(),
            source,
        }
    }
}

impl From<Interrupted> for DeployError {
    fn from(value: Interrupted) -> Self {
        match value {
            Interrupted::Canceled => DeployError::Canceled,
            Interrupted::Panicked(msg) => DeployError::Aborted(msg),
        }
    }
}
