// ABOUTME: Integration tests for configuration parsing and validation.
// ABOUTME: Tests YAML parsing, env var indirection, discovery, and scaffolding.

use springship::config::*;
use springship::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod parsing {
    use super::*;

    #[test]
    fn parse_full_config() {
        let yaml = r#"
name: shop
management_url: https://mgmt.example
access_token: { env: SHOP_TOKEN }

target:
  subscription: sub-1
  resource_group: rg-1
  resource_name: spring-1
  resource_type: Microsoft.AppPlatform/Spring

build_poll:
  interval: 2s
  timeout: 10m

services:
  api:
    package: api/target
    spring:
      deployment_name: green
      jvm_version: "21"
  order-worker:
    spring:
      builderName: java-builder
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.management_url, "https://mgmt.example");
        assert_eq!(config.access_token, EnvValue::from_env("SHOP_TOKEN"));
        assert_eq!(config.build_poll.interval, Duration::from_secs(2));
        assert_eq!(config.build_poll.timeout, Duration::from_secs(600));
        assert_eq!(config.services.len(), 2);

        let (_, api) = config.service("api").unwrap();
        assert_eq!(api.package, PathBuf::from("api/target"));
        assert_eq!(api.spring.deployment_name, "green");
        assert_eq!(api.spring.jvm_version, "21");

        let (_, worker) = config.service("order-worker").unwrap();
        assert_eq!(worker.spring.builder_name, "java-builder");
        assert_eq!(worker.package, PathBuf::from("target"));

        let target = config.target.resolve().unwrap();
        assert_eq!(target.subscription_id, "sub-1");
        assert_eq!(target.resource_group_name, "rg-1");
        assert_eq!(target.resource_name, "spring-1");
        assert_eq!(target.resource_type, "Microsoft.AppPlatform/Spring");
    }

    #[test]
    fn services_are_selected_in_name_order() {
        let yaml = r#"
name: shop
target: { subscription: s, resource_group: rg }
services:
  web: {}
  api: {}
"#;
        let config = Config::from_yaml(yaml).unwrap();
        let all: Vec<_> = config
            .select_services(None)
            .unwrap()
            .into_iter()
            .map(|(name, _)| name.to_string())
            .collect();
        assert_eq!(all, vec!["api", "web"]);

        let one = config.select_services(Some("web")).unwrap();
        assert_eq!(one.len(), 1);
        assert!(matches!(
            config.select_services(Some("db")),
            Err(Error::UnknownService(_))
        ));
    }

    #[test]
    fn missing_target_is_an_error() {
        let yaml = "name: shop\nservices:\n  api: {}\n";
        assert!(matches!(Config::from_yaml(yaml), Err(Error::Yaml(_))));
    }
}

mod environment {
    use super::*;

    const FROM_ENV: &str = r#"
name: shop
target:
  subscription: { env: TEST_SUBSCRIPTION }
  resource_group: { env: TEST_RESOURCE_GROUP, default: rg-default }
  resource_name: { env: TEST_RESOURCE_NAME }
services:
  api: {}
"#;

    #[test]
    fn target_reads_variables() {
        temp_env::with_vars(
            [
                ("TEST_SUBSCRIPTION", Some("sub-env")),
                ("TEST_RESOURCE_GROUP", Some("rg-env")),
                ("TEST_RESOURCE_NAME", Some("spring-env")),
            ],
            || {
                let target = Config::from_yaml(FROM_ENV).unwrap().target.resolve().unwrap();
                assert_eq!(target.subscription_id, "sub-env");
                assert_eq!(target.resource_group_name, "rg-env");
                assert_eq!(target.resource_name, "spring-env");
            },
        );
    }

    #[test]
    fn unprovisioned_resource_name_resolves_empty() {
        temp_env::with_vars(
            [
                ("TEST_SUBSCRIPTION", Some("sub-env")),
                ("TEST_RESOURCE_GROUP", None),
                ("TEST_RESOURCE_NAME", None),
            ],
            || {
                let target = Config::from_yaml(FROM_ENV).unwrap().target.resolve().unwrap();
                assert_eq!(target.resource_group_name, "rg-default");
                assert_eq!(target.resource_name, "");
            },
        );
    }

    #[test]
    fn missing_subscription_is_reported() {
        temp_env::with_var_unset("TEST_SUBSCRIPTION", || {
            let err = Config::from_yaml(FROM_ENV)
                .unwrap()
                .target
                .resolve()
                .unwrap_err();
            assert!(matches!(err, Error::MissingEnvVar(v) if v == "TEST_SUBSCRIPTION"));
        });
    }

    #[test]
    fn access_token_defaults_to_springship_variable() {
        let config = Config::from_yaml(FROM_ENV).unwrap();

        temp_env::with_var(ACCESS_TOKEN_ENV, Some("secret"), || {
            assert_eq!(config.access_token().unwrap(), "secret");
        });
        temp_env::with_var_unset(ACCESS_TOKEN_ENV, || {
            assert!(matches!(config.access_token(), Err(Error::MissingAccessToken)));
        });
        temp_env::with_var(ACCESS_TOKEN_ENV, Some(""), || {
            assert!(matches!(config.access_token(), Err(Error::MissingAccessToken)));
        });
    }
}

mod discovery {
    use super::*;

    fn write(dir: &Path, relative: &str, name: &str) {
        let path = dir.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            path,
            format!("name: {name}\ntarget: {{ subscription: s, resource_group: rg }}\nservices:\n  api: {{}}\n"),
        )
        .unwrap();
    }

    #[test]
    fn prefers_root_file_over_state_dir() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), CONFIG_FILENAME_DIR, "hidden");
        write(dir.path(), CONFIG_FILENAME, "root");

        assert_eq!(Config::discover(dir.path()).unwrap().name, "root");
    }

    #[test]
    fn finds_alternate_names() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), CONFIG_FILENAME_ALT, "alt");
        assert_eq!(Config::discover(dir.path()).unwrap().name, "alt");

        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), CONFIG_FILENAME_DIR, "hidden");
        assert_eq!(Config::discover(dir.path()).unwrap().name, "hidden");
    }

    #[test]
    fn missing_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::discover(dir.path()),
            Err(Error::ConfigNotFound(_))
        ));
    }
}

mod init {
    use super::*;

    #[test]
    fn init_writes_a_loadable_template() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), Some("shop"), Some("orders"), false).unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.name, "shop");
        assert!(config.service("orders").is_ok());
        assert!(config.service("api").is_err());
        assert_eq!(config.build_poll.interval, Duration::from_secs(5));
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), None, None, false).unwrap();

        assert!(matches!(
            init_config(dir.path(), None, None, false),
            Err(Error::AlreadyExists(_))
        ));
        init_config(dir.path(), Some("again"), None, true).unwrap();
        assert_eq!(Config::discover(dir.path()).unwrap().name, "again");
    }

    #[test]
    fn init_rejects_invalid_service_name() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            init_config(dir.path(), None, Some("Not_Valid"), false),
            Err(Error::InvalidConfig(_))
        ));
        assert!(!dir.path().join(CONFIG_FILENAME).exists());
    }
}
