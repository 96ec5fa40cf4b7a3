// ABOUTME: Integration tests for the dotenv-backed property store.
// ABOUTME: Verifies persistence on disk, namespacing per service, and error reporting.

use springship::env::{
    BUILD_RESULT_ID, DotEnvStore, PropertyStore, RELATIVE_PATH, StoreError, environment_file,
};
use springship::types::ServiceName;
use std::fs;
use std::sync::Arc;

fn name(s: &str) -> ServiceName {
    ServiceName::new(s).unwrap()
}

#[test]
fn environment_file_lives_under_state_dir() {
    let root = tempfile::tempdir().unwrap();
    let path = environment_file(root.path(), "prod").unwrap();
    assert_eq!(path, root.path().join(".springship").join("prod").join(".env"));
}

#[test]
fn environment_names_with_separators_are_rejected() {
    let root = tempfile::tempdir().unwrap();
    for bad in ["", "../escape", "a/b", "with space"] {
        assert!(
            matches!(environment_file(root.path(), bad), Err(StoreError::InvalidName(_))),
            "{bad:?} should be rejected"
        );
    }
}

#[test]
fn missing_file_loads_as_empty_store() {
    let root = tempfile::tempdir().unwrap();
    let store = DotEnvStore::load(environment_file(root.path(), "dev").unwrap()).unwrap();
    assert!(store.values().is_empty());
    assert!(!store.path().exists());
}

#[tokio::test]
async fn save_creates_directories_and_round_trips() {
    let root = tempfile::tempdir().unwrap();
    let path = environment_file(root.path(), "dev").unwrap();

    let store = DotEnvStore::load(&path).unwrap();
    store.set_service_property(&name("api"), RELATIVE_PATH, "resources/a b/app.jar");
    store.set_service_property(&name("api"), "NOTE", "line one\nsays \"hi\"");
    store.save().await.unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());

    let reloaded = DotEnvStore::load(&path).unwrap();
    assert_eq!(
        reloaded
            .get_service_property(&name("api"), RELATIVE_PATH)
            .as_deref(),
        Some("resources/a b/app.jar")
    );
    assert_eq!(
        reloaded.get_service_property(&name("api"), "NOTE").as_deref(),
        Some("line one\nsays \"hi\"")
    );
}

#[tokio::test]
async fn services_do_not_share_keys() {
    let root = tempfile::tempdir().unwrap();
    let path = environment_file(root.path(), "dev").unwrap();

    let store = DotEnvStore::load(&path).unwrap();
    store.set_service_property(&name("api"), BUILD_RESULT_ID, "build-a");
    store.set_service_property(&name("order-worker"), BUILD_RESULT_ID, "build-b");
    store.save().await.unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("SERVICE_API_BUILD_RESULT_ID=\"build-a\""));
    assert!(content.contains("SERVICE_ORDER_WORKER_BUILD_RESULT_ID=\"build-b\""));
    assert_eq!(
        store
            .get_service_property(&name("api"), BUILD_RESULT_ID)
            .as_deref(),
        Some("build-a")
    );
}

#[tokio::test]
async fn save_keeps_unrelated_existing_values() {
    let root = tempfile::tempdir().unwrap();
    let path = environment_file(root.path(), "dev").unwrap();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "# provisioned\nAZURE_LOCATION=westeurope\n").unwrap();

    let store = DotEnvStore::load(&path).unwrap();
    store.set_service_property(&name("api"), RELATIVE_PATH, "r/1");
    store.save().await.unwrap();

    let reloaded = DotEnvStore::load(&path).unwrap();
    assert_eq!(reloaded.get("AZURE_LOCATION").as_deref(), Some("westeurope"));
    assert_eq!(reloaded.get("SERVICE_API_RELATIVE_PATH").as_deref(), Some("r/1"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_keep_every_service() {
    let services = ["api", "web", "order-worker", "billing"];

    for round in 0..50 {
        let root = tempfile::tempdir().unwrap();
        let path = environment_file(root.path(), "dev").unwrap();
        let store = Arc::new(DotEnvStore::load(&path).unwrap());

        let handles: Vec<_> = services
            .iter()
            .map(|&svc| {
                let store = Arc::clone(&store);
                let value = format!("resources/{svc}-{round}/app.jar");
                tokio::spawn(async move {
                    store.set_service_property(&name(svc), RELATIVE_PATH, &value);
                    store.save().await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let reloaded = DotEnvStore::load(&path).unwrap();
        for svc in services {
            assert_eq!(
                reloaded
                    .get_service_property(&name(svc), RELATIVE_PATH)
                    .as_deref(),
                Some(format!("resources/{svc}-{round}/app.jar").as_str()),
                "round {round} lost {svc}"
            );
        }
        assert!(!path.with_extension("tmp").exists());
    }
}

#[tokio::test]
async fn unwritable_location_reports_write_error() {
    let root = tempfile::tempdir().unwrap();
    let store = DotEnvStore::load(environment_file(root.path(), "dev").unwrap()).unwrap();

    // A regular file where the environment directory should be.
    fs::write(root.path().join(".springship"), "not a directory").unwrap();
    store.set_service_property(&name("api"), RELATIVE_PATH, "r/1");

    let err = store.save().await.unwrap_err();
    assert!(matches!(err, StoreError::Write { .. }));
}

#[test]
fn malformed_file_is_rejected_on_load() {
    let root = tempfile::tempdir().unwrap();
    let path = root.path().join(".env");
    fs::write(&path, "GOOD=1\nBAD LINE\n").unwrap();

    let err = DotEnvStore::load(&path).unwrap_err();
    assert!(matches!(err, StoreError::Malformed { line: 2, .. }));
}
