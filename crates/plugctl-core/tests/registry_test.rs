// Registry add/commit flow against a wiremock device.
#![allow(clippy::unwrap_used)]

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use plugctl_core::{Capability, PlugClient, Registry, Store, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

fn rpc_result(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"id": 1, "result": result}))
}

/// Mount device-info and components mocks for a Plug S Gen 3.
async fn mount_plug(server: &MockServer, hw_id: &str) {
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({"method": "Shelly.GetDeviceInfo"})))
        .respond_with(rpc_result(json!({
            "id": hw_id,
            "model": "S3PL-00112EU",
            "gen": 3,
            "app": "PlugSG3",
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({"method": "Shelly.GetComponents"})))
        .respond_with(rpc_result(json!({
            "components": [
                {"key": "switch:0", "status": {"output": false, "apower": 0.0}},
                {"key": "plugs_ui", "status": {}},
            ],
            "total": 2,
        })))
        .mount(server)
        .await;
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn add_device_queries_identity_and_persists() {
    let server = MockServer::start().await;
    mount_plug(&server, "shellyplugsg3-abc123").await;
    let ip = server.address().to_string();

    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("registry.json");
    let client = PlugClient::new(&TransportConfig::default()).unwrap();

    let mut registry = Registry::open(&store_path).unwrap();
    let device = registry
        .add_device(&client, &ip, Some("lampe"))
        .await
        .unwrap();

    assert_eq!(device.hw_id, "shellyplugsg3-abc123");
    assert_eq!(device.alias, "lampe");
    assert_eq!(device.ip, ip);
    assert_eq!(device.capabilities, Capability::full_set());

    registry.commit().unwrap();

    // Reload from disk and verify the round trip.
    let reloaded = Store::load(&store_path).unwrap();
    let stored = reloaded.device("shellyplugsg3-abc123").unwrap();
    assert_eq!(stored.alias, "lampe");
    assert_eq!(stored.model.as_deref(), Some("S3PL-00112EU"));
    assert_eq!(stored.capabilities, Capability::full_set());
}

#[tokio::test]
async fn add_device_defaults_alias_to_hw_id() {
    let server = MockServer::start().await;
    mount_plug(&server, "shellyplugsg3-feed42").await;
    let ip = server.address().to_string();

    let dir = tempfile::tempdir().unwrap();
    let mut registry = Registry::open(dir.path().join("registry.json")).unwrap();
    let client = PlugClient::new(&TransportConfig::default()).unwrap();

    let device = registry.add_device(&client, &ip, None).await.unwrap();
    assert_eq!(device.alias, "shellyplugsg3-feed42");
}

#[tokio::test]
async fn add_device_rejects_taken_alias_without_mutating() {
    let server = MockServer::start().await;
    mount_plug(&server, "shellyplugsg3-other").await;
    let ip = server.address().to_string();

    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("registry.json");

    // Seed a store that already owns the alias.
    let seeded = json!({
        "devices": {
            "shellyplugsg3-abc123": {"ip": "192.168.1.50", "alias": "lampe"}
        },
        "groups": {}
    });
    std::fs::write(&store_path, seeded.to_string()).unwrap();

    let mut registry = Registry::open(&store_path).unwrap();
    let client = PlugClient::new(&TransportConfig::default()).unwrap();

    let err = registry
        .add_device(&client, &ip, Some("lampe"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        plugctl_core::CoreError::DuplicateAlias { alias } if alias == "lampe"
    ));
    assert!(!registry.is_dirty());
    assert_eq!(registry.store().devices.len(), 1);
}

#[tokio::test]
async fn readd_refreshes_ip_and_keeps_alias_check_scoped() {
    let server = MockServer::start().await;
    mount_plug(&server, "shellyplugsg3-abc123").await;
    let ip = server.address().to_string();

    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("registry.json");
    let seeded = json!({
        "devices": {
            "shellyplugsg3-abc123": {"ip": "10.0.0.9", "alias": "lampe"}
        },
        "groups": {}
    });
    std::fs::write(&store_path, seeded.to_string()).unwrap();

    let mut registry = Registry::open(&store_path).unwrap();
    let client = PlugClient::new(&TransportConfig::default()).unwrap();

    // Re-adding under its own alias must not count as a collision.
    let device = registry
        .add_device(&client, &ip, Some("lampe"))
        .await
        .unwrap();
    assert_eq!(device.ip, ip);
    assert_eq!(registry.store().devices.len(), 1);
}

#[tokio::test]
async fn unreachable_device_aborts_add() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = Registry::open(dir.path().join("registry.json")).unwrap();
    let client = PlugClient::new(&TransportConfig::default()).unwrap();

    let err = registry
        .add_device(&client, "127.0.0.1:9", Some("lampe"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        plugctl_core::CoreError::Device(e) if e.is_unreachable()
    ));
    assert!(!registry.is_dirty());
}
