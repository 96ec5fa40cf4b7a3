// ABOUTME: Remote service error types with SNAFU pattern.
// ABOUTME: Distinguishes missing resources from transport and service failures.

use snafu::Snafu;
use std::path::PathBuf;
use std::time::Duration;

/// Error returned by any remote service operation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RemoteError {
    #[snafu(display("{resource} was not found"))]
    NotFound { resource: String },

    #[snafu(display("{method} {url} returned {status}: {message}"))]
    Status {
        method: String,
        url: String,
        status: u16,
        message: String,
    },

    #[snafu(display("failed to create HTTP client: {source}"))]
    BuildClient { source: reqwest::Error },

    #[snafu(display("request to {url} failed: {source}"))]
    Transport { url: String, source: reqwest::Error },

    #[snafu(display("unexpected response from {url}: {source}"))]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[snafu(display("response from {url} is missing {field}"))]
    MissingField { url: String, field: String },

    #[snafu(display("failed to read artifact {}: {source}", path.display()))]
    ReadArtifact {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("build result {build_result_id} finished in state {state}"))]
    BuildFailed {
        build_result_id: String,
        state: String,
    },

    #[snafu(display("timed out after {waited:?} waiting for build result {build_result_id}"))]
    BuildTimeout {
        build_result_id: String,
        waited: Duration,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// The addressed resource does not exist.
    NotFound,
    /// The service answered with a failure status.
    Service,
    /// The request never got a usable answer.
    Transport,
    /// A local artifact could not be read for upload.
    Artifact,
    /// A build did not produce a usable result.
    Build,
}

impl RemoteError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> RemoteErrorKind {
        match self {
            RemoteError::NotFound { .. } => RemoteErrorKind::NotFound,
            RemoteError::Status { status: 404, .. } => RemoteErrorKind::NotFound,
            RemoteError::Status { .. } => RemoteErrorKind::Service,
            RemoteError::BuildClient { .. }
            | RemoteError::Transport { .. }
            | RemoteError::Decode { .. }
            | RemoteError::MissingField { .. } => RemoteErrorKind::Transport,
            RemoteError::ReadArtifact { .. } => RemoteErrorKind::Artifact,
            RemoteError::BuildFailed { .. } | RemoteError::BuildTimeout { .. } => {
                RemoteErrorKind::Build
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == RemoteErrorKind::NotFound
    }
}
