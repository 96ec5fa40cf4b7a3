// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports the Spring app target, pipeline states, context types, and errors.

mod context;
mod deployment;
mod error;
mod record;
mod state;
mod target;
mod transitions;

pub use context::{
    ARTIFACT_FILENAME, BUILD_NAME_SUFFIX, DEFAULT_AGENT_POOL_NAME, DEFAULT_BUILD_SERVICE_NAME,
    DEFAULT_BUILDER_NAME, DEFAULT_DEPLOYMENT_NAME, DEFAULT_JVM_VERSION, ServiceConfig,
    ServicePackage, SpringOptions, TargetResource, validate_target,
};
pub use deployment::DeployPipeline;
pub use error::{DeployError, DeployErrorKind, DeployStep};
pub use record::{DeployPhase, DeploymentRecord, ServiceProgress, ServiceTargetKind};
pub use state::{Confirmed, Deployed, Located, Resolved, TierResolved, Uploaded, Validated};
pub use target::{DeployTask, ServiceTarget, SpringAppTarget};
pub use transitions::{fetch_endpoints, persist_property};
