// ABOUTME: Endpoints command implementation.
// ABOUTME: Prints the public URLs of configured services.

use super::target::connect_target;
use springship::config::Config;
use springship::deploy::ServiceTarget;
use springship::error::Result;
use springship::output::Output;
use std::path::Path;

pub async fn endpoints(
    config: Config,
    project_dir: &Path,
    environment: &str,
    service: Option<&str>,
    output: Output,
) -> Result<()> {
    let services = config.select_services(service)?;
    let (target, resource) = connect_target(&config, project_dir, environment)?;

    for (name, entry) in services {
        let urls = target
            .endpoints(&entry.service_config(name), &resource)
            .await?;
        output.endpoints(name.as_str(), &urls);
    }

    Ok(())
}
