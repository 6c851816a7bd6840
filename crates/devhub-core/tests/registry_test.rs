#![allow(clippy::unwrap_used)]
// Registry flows over real HTTP against a wiremock server.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use devhub_core::{
    ConfigValue, ConsoleConfig, CoreError, DeleteConfirmation, DeviceConfig, DeviceDraft,
    DeviceId, DeviceRegistry, DeviceType,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(token: Option<&str>) -> (MockServer, DeviceRegistry) {
    let server = MockServer::start().await;
    let config = ConsoleConfig {
        url: Url::parse(&format!("{}/api", server.uri())).unwrap(),
        token: token.map(|t| SecretString::from(t.to_owned())),
        ..ConsoleConfig::default()
    };
    let registry = DeviceRegistry::new(config.build_client().unwrap());
    (server, registry)
}

async fn list_calls(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "GET" && r.url.path() == "/api/devices")
        .count()
}

fn kitchen() -> DeviceDraft {
    let mut config = DeviceConfig::new();
    config.insert("target".into(), ConfigValue::from(70_i64));
    DeviceDraft::new("Kitchen", DeviceType::Thermostat).with_config(config)
}

// ── Flows ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_posts_draft_then_reloads() {
    let (server, registry) = setup(Some("tok")).await;
    let record = json!({ "id": 42, "name": "Kitchen", "type": "thermostat", "config": { "target": 70 } });

    Mock::given(method("POST"))
        .and(path("/api/devices"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({ "name": "Kitchen", "type": "thermostat", "config": { "target": 70 } })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&record))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([record])))
        .mount(&server)
        .await;

    let created = registry.create(&kitchen()).await.unwrap();
    assert_eq!(created.id, DeviceId::Numeric(42));

    registry.settled().await;
    assert_eq!(list_calls(&server).await, 1);

    let snap = registry.snapshot();
    assert_eq!(snap.len(), 1);
    assert_eq!(snap[0].name, "Kitchen");
    assert_eq!(snap[0].config["target"], ConfigValue::from(70_i64));
}

#[tokio::test]
async fn test_reload_reflects_server_defaults() {
    let (server, registry) = setup(Some("tok")).await;

    Mock::given(method("POST"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            json!({ "id": 7, "name": "Porch", "type": "light", "config": {} }),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 7, "name": "Porch", "type": "light", "config": { "brightness": 100 } }
        ])))
        .mount(&server)
        .await;

    registry
        .create(&DeviceDraft::new("Porch", DeviceType::Light))
        .await
        .unwrap();
    registry.settled().await;

    let device = registry.device(&DeviceId::Numeric(7)).unwrap();
    assert_eq!(device.config["brightness"], ConfigValue::from(100_i64));
}

#[tokio::test]
async fn test_update_not_found_leaves_list_unchanged() {
    let (server, registry) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 5, "name": "Hall", "type": "light", "config": { "level": 2 } }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/devices/5"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Device not found" })),
        )
        .mount(&server)
        .await;

    registry.load_all().await.unwrap();
    let before = registry.snapshot();

    let err = registry
        .update(&DeviceId::Numeric(5), &DeviceDraft::new("Hall", DeviceType::Light))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Device not found");
    assert_eq!(err.status(), Some(404));
    assert_eq!(registry.snapshot(), before);
    assert_eq!(list_calls(&server).await, 1);
}

#[tokio::test]
async fn test_confirmed_delete_removes_device() {
    let (server, registry) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 3, "name": "Garage", "type": "camera", "config": {} }
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/devices/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Deleted" })))
        .expect(1)
        .mount(&server)
        .await;

    registry.load_all().await.unwrap();

    let mut flow = DeleteConfirmation::new();
    flow.request(DeviceId::Numeric(3)).unwrap();
    flow.confirm(&registry).await.unwrap();
    registry.settled().await;

    assert!(registry.snapshot().is_empty());
}

#[tokio::test]
async fn test_zero_padded_id_is_updated_in_place() {
    let (server, registry) = setup(Some("tok")).await;
    let record = json!({ "id": "007", "name": "Vault", "type": "camera", "config": {} });

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([record])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/devices/007"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&record))
        .expect(1)
        .mount(&server)
        .await;

    let devices = registry.load_all().await.unwrap();
    assert_eq!(devices[0].id, DeviceId::Text("007".into()));

    let updated = registry
        .update(&devices[0].id, &DeviceDraft::new("Vault", DeviceType::Camera))
        .await
        .unwrap();
    assert_eq!(updated.id.to_string(), "007");
}

#[tokio::test]
async fn test_reserved_characters_in_ids_are_escaped() {
    let (server, registry) = setup(Some("tok")).await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    registry.delete(&DeviceId::Text("a#b".into())).await.unwrap();
    registry
        .delete(&DeviceId::Text("../auth/login".into()))
        .await
        .unwrap();
    registry.settled().await;

    let deleted: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "DELETE")
        .map(|r| r.url.path().to_owned())
        .collect();
    assert_eq!(deleted, ["/api/devices/a%23b", "/api/devices/..%2Fauth%2Flogin"]);
}

#[tokio::test]
async fn test_dot_segment_id_is_rejected_before_sending() {
    let (server, registry) = setup(Some("tok")).await;

    let err = registry.delete(&DeviceId::Text("..".into())).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }), "{err:?}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_server_is_api_error() {
    let config = ConsoleConfig {
        url: Url::parse("http://127.0.0.1:1/api").unwrap(),
        ..ConsoleConfig::default()
    };
    let registry = DeviceRegistry::new(config.build_client().unwrap());

    let err = registry.load_all().await.unwrap_err();
    assert!(matches!(err, CoreError::Api { status: None, .. }));
    assert!(registry.snapshot().is_empty());
}
