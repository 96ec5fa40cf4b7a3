// ABOUTME: Deploy command implementation.
// ABOUTME: Runs one deployment task per service, rendering progress and honoring Ctrl-C.

use super::target::connect_target;
use springship::config::Config;
use springship::deploy::ServiceTarget;
use springship::diagnostics::Diagnostics;
use springship::error::Result;
use springship::output::Output;
use springship::task::TaskEvent;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Deploy the selected services, one after another.
pub async fn deploy(
    config: Config,
    project_dir: &Path,
    environment: &str,
    service: Option<&str>,
    mut output: Output,
) -> Result<()> {
    let services = config.select_services(service)?;
    let (target, resource) = connect_target(&config, project_dir, environment)?;

    output.start_timer();
    let mut diag = Diagnostics::default();

    output.progress(&format!(
        "Deploying {} service(s) of {} to {}",
        services.len(),
        config.name,
        resource.resource_group_name
    ));

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, canceling deployment");
                cancel.cancel();
            }
        })
    };

    let mut result: Result<()> = Ok(());
    for (name, entry) in services {
        let service = entry.service_config(name);

        if let Err(e) = target.initialize(&service).await {
            result = Err(e.into());
            break;
        }

        let package = match target
            .package(&service, entry.service_package(project_dir))
            .wait()
            .await
        {
            Ok(package) => package,
            Err(e) => {
                result = Err(e.into());
                break;
            }
        };

        let task = target.deploy(&service, &package, &resource, cancel.clone());
        let mut events = task.subscribe();
        while let Some(event) = events.next_event().await {
            if let TaskEvent::Progress(progress) = event {
                output.service_progress(name.as_str(), &progress);
            }
        }

        match task.wait().await {
            Ok(record) => {
                output.deployed(name.as_str(), &record);
                diag.review(name.as_str(), &record);
            }
            Err(e) => {
                tracing::debug!("Deployment of {} failed: {:?}", name, e.kind());
                result = Err(e.into());
                break;
            }
        }
    }

    interrupt.abort();
    result?;

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    output.success("Deployment complete!");
    Ok(())
}
