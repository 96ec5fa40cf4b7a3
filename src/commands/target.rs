// ABOUTME: Shared helper for building the Spring app target from config.
// ABOUTME: Wires the HTTP client and the environment's property store together.

use springship::config::Config;
use springship::deploy::{SpringAppTarget, TargetResource};
use springship::env::{DotEnvStore, environment_file};
use springship::error::Result;
use springship::remote::HttpSpringService;
use std::path::Path;
use std::sync::Arc;

pub type CliTarget = SpringAppTarget<HttpSpringService, DotEnvStore>;

/// Resolve the target resource and connect a deployment target for it.
pub fn connect_target(
    config: &Config,
    project_dir: &Path,
    environment: &str,
) -> Result<(CliTarget, TargetResource)> {
    let resource = config.target.resolve()?;
    let token = config.access_token()?;

    let spring = HttpSpringService::new(&config.management_url, token, config.poll_settings())?;
    let store = DotEnvStore::load(environment_file(project_dir, environment)?)?;
    tracing::debug!(
        "Using environment '{}' at {}",
        environment,
        store.path().display()
    );

    Ok((
        SpringAppTarget::new(Arc::new(spring), Arc::new(store)),
        resource,
    ))
}
