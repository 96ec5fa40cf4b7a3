// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates springship.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::ServiceName;

use super::{CONFIG_FILENAME, Config, EnvValue, ServiceEntry};

pub fn init_config(
    dir: &Path,
    name: Option<&str>,
    service: Option<&str>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(n) = name {
        config.name = n.to_string();
    }

    if let Some(s) = service {
        let service = ServiceName::new(s).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        let entry = config
            .services
            .values()
            .next()
            .cloned()
            .ok_or_else(|| Error::InvalidConfig("template has no service".to_string()))?;
        config.services.clear();
        config.services.insert(service, entry);
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;
    tracing::debug!("Wrote {}", config_path.display());

    Ok(())
}

fn env_line(value: &EnvValue) -> String {
    match value {
        EnvValue::Literal(s) => s.clone(),
        EnvValue::FromEnv { var, default: None } => format!("{{ env: {var} }}"),
        EnvValue::FromEnv {
            var,
            default: Some(d),
        } => format!("{{ env: {var}, default: {d} }}"),
    }
}

pub(super) fn generate_template_yaml(config: &Config) -> String {
    let target = &config.target;
    let resource_name = target
        .resource_name
        .as_ref()
        .map(|v| format!("  resource_name: {}\n", env_line(v)))
        .unwrap_or_default();

    let mut services = String::new();
    for (name, ServiceEntry { package, .. }) in &config.services {
        services.push_str(&format!(
            "  {name}:\n    package: {}\n    # spring:\n    #   deployment_name: default\n    #   jvm_version: \"17\"\n",
            package.display()
        ));
    }

    format!(
        r#"name: {}
# access_token defaults to {{ env: SPRINGSHIP_ACCESS_TOKEN }}
target:
  subscription: {}
  resource_group: {}
{}build_poll:
  interval: {}s
  timeout: {}s
services:
{}"#,
        config.name,
        env_line(&target.subscription),
        env_line(&target.resource_group),
        resource_name,
        config.build_poll.interval.as_secs(),
        config.build_poll.timeout.as_secs(),
        services
    )
}
