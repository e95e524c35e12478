use pushkind_clients::forms::validation::PhonePolicy;
use pushkind_clients::{Command, RunSettings, run};

mod common;

use common::{Calls, FakeClientApi, numbered};

const CREATE: &str = "create sharedKey=CLI77 name=Ana Maria Torres email=ana@example.com \
                      phone=+57-300-123 startDate=2024-01-01 endDate=2024-12-31";

#[tokio::test]
async fn create_follows_configured_phone_policy() {
    let dir = tempfile::tempdir().unwrap();
    let api = FakeClientApi::with_clients(numbered(2));

    let strict = RunSettings {
        page_size: 10,
        export_dir: dir.path(),
        phone_policy: PhonePolicy::strict(),
    };
    let err = run(&api, CREATE.parse().unwrap(), &strict)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("phone"), "{err}");
    assert_eq!(Calls::get(&api.calls.create), 0);

    let lenient = RunSettings {
        phone_policy: PhonePolicy::lenient(),
        ..strict
    };
    run(&api, CREATE.parse().unwrap(), &lenient).await.unwrap();

    let stored = api.stored();
    let created = stored.last().unwrap();
    assert_eq!(created.shared_key.as_str(), "CLI77");
    assert_eq!(created.name, "Ana Maria Torres");
    assert_eq!(created.phone, "+57-300-123");
    assert_eq!(Calls::get(&api.calls.create), 1);
}

#[tokio::test]
async fn export_writes_into_export_dir() {
    let dir = tempfile::tempdir().unwrap();
    let api = FakeClientApi::with_clients(numbered(3));
    let settings = RunSettings {
        page_size: 10,
        export_dir: dir.path(),
        phone_policy: PhonePolicy::strict(),
    };

    run(&api, Command::Export, &settings).await.unwrap();

    let written = std::fs::read_to_string(dir.path().join("clientes.csv")).unwrap();
    assert_eq!(written.lines().count(), 4);
}
