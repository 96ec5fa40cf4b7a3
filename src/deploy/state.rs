// ABOUTME: Deployment pipeline state types for the type state pattern.
// ABOUTME: Each state carries exactly the data earlier steps have produced.

use std::path::PathBuf;

use crate::remote::Tier;
use crate::types::UploadReference;

use super::context::SpringOptions;

/// Target validated; options still as configured.
/// Available actions: `resolve_defaults()`
#[derive(Debug, Clone)]
pub struct Validated {
    pub(crate) options: SpringOptions,
}

/// Every option has a value.
/// Available actions: `confirm_deployment()`
#[derive(Debug, Clone)]
pub struct Resolved {
    pub(crate) options: SpringOptions,
}

/// The named deployment exists remotely.
/// Available actions: `locate_artifact()`
#[derive(Debug, Clone)]
pub struct Confirmed {
    pub(crate) options: SpringOptions,
}

/// The artifact exists on disk.
/// Available actions: `upload_artifact()`
#[derive(Debug, Clone)]
pub struct Located {
    pub(crate) options: SpringOptions,
    pub(crate) artifact: PathBuf,
}

/// The artifact is in service storage.
/// Available actions: `resolve_tier()`
#[derive(Debug, Clone)]
pub struct Uploaded {
    pub(crate) options: SpringOptions,
    pub(crate) upload: UploadReference,
}

/// The service tier is known.
/// Available actions: `deploy()`
#[derive(Debug, Clone)]
pub struct TierResolved {
    pub(crate) options: SpringOptions,
    pub(crate) upload: UploadReference,
    pub(crate) tier: Tier,
}

/// Deployed remotely and recorded locally.
/// Available actions: `fetch_endpoints()`
#[derive(Debug, Clone)]
pub struct Deployed {
    pub(crate) tier: Tier,
    pub(crate) result_token: String,
}
