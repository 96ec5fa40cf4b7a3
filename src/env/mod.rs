// ABOUTME: Environment property store scoped by service name.
// ABOUTME: Exports the PropertyStore trait plus dotenv-file and in-memory stores.

mod dotenv;
mod memory;

pub use dotenv::{DotEnvStore, environment_file};
pub use memory::MemoryStore;

use async_trait::async_trait;
use std::path::PathBuf;

use crate::types::ServiceName;

/// Property recording the build result deployed to an Enterprise-tier service.
pub const BUILD_RESULT_ID: &str = "BUILD_RESULT_ID";
/// Property recording the uploaded artifact deployed to other tiers.
pub const RELATIVE_PATH: &str = "RELATIVE_PATH";

/// Errors from reading or persisting an environment.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read environment file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write environment file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed line {line} in environment file {path}")]
    Malformed { path: PathBuf, line: usize },

    #[error("invalid environment name '{0}'")]
    InvalidName(String),
}

/// Key/value store whose service properties are namespaced per service.
///
/// `set_service_property` only updates memory; callers must `save` before
/// treating a value as recorded.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    fn get_service_property(&self, service: &ServiceName, key: &str) -> Option<String>;

    fn set_service_property(&self, service: &ServiceName, key: &str, value: &str);

    async fn save(&self) -> Result<(), StoreError>;
}

/// Store key for a service property: `SERVICE_<SERVICE>_<KEY>`.
pub fn service_property_key(service: &ServiceName, key: &str) -> String {
    format!("SERVICE_{}_{}", service.env_key(), key)
}
