// ABOUTME: Progress events and the final record produced by a deployment.
// ABOUTME: DeploymentRecord is the only success value; no partial record exists.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::remote::Tier;
use crate::types::SpringResourceId;

use super::context::ServicePackage;

/// Phase a deployment reports as progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployPhase {
    Uploading,
    CreatingBuild,
    FetchingBuildResult,
    DeployingBuildResult,
    DeployingArtifact,
    FetchingEndpoints,
}

impl fmt::Display for DeployPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeployPhase::Uploading => "Uploading spring artifact",
            DeployPhase::CreatingBuild => "Creating build for artifact",
            DeployPhase::FetchingBuildResult => "Getting build result",
            DeployPhase::DeployingBuildResult => "Deploying build result",
            DeployPhase::DeployingArtifact => "Deploying spring artifact",
            DeployPhase::FetchingEndpoints => "Fetching endpoints for spring app service",
        };
        write!(f, "{s}")
    }
}

/// A progress notification from a running service operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceProgress {
    pub phase: DeployPhase,
    pub timestamp: DateTime<Utc>,
}

impl ServiceProgress {
    pub fn new(phase: DeployPhase) -> Self {
        Self {
            phase,
            timestamp: Utc::now(),
        }
    }

    pub fn message(&self) -> String {
        self.phase.to_string()
    }
}

/// Kind of host a record was deployed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServiceTargetKind {
    #[serde(rename = "springapp")]
    SpringApp,
}

/// Successful outcome of a deployment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub target_resource_id: SpringResourceId,
    pub kind: ServiceTargetKind,
    /// Build-deploy or artifact-deploy result token.
    pub details: String,
    pub endpoints: Vec<String>,
    pub package: ServicePackage,
    pub tier: Tier,
    pub deployed_at: DateTime<Utc>,
}
