#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use devhub_api::{ApiClient, DevicePayload, Error, HttpTransport, Method, Session};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(session: Session) -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base = format!("{}/api", server.uri());
    let client =
        ApiClient::with_transport(&base, HttpTransport::with_client(reqwest::Client::new()), session)
            .unwrap();
    (server, client)
}

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

fn kitchen_payload() -> DevicePayload {
    let mut config = serde_json::Map::new();
    config.insert("target".into(), json!(70));
    DevicePayload {
        name: "Kitchen".into(),
        device_type: "thermostat".into(),
        config,
    }
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_returns_token() {
    let (server, client) = setup(Session::new()).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "a@b.c", "password": "pw" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "token": "jwt-1", "user": { "id": 1 } })),
        )
        .mount(&server)
        .await;

    let auth = client.login("a@b.c", &secret("pw")).await.unwrap();
    assert_eq!(auth.token.expose_secret(), "jwt-1");
    assert!(auth.extra.contains_key("user"));
}

#[tokio::test]
async fn test_login_failure_surfaces_server_message() {
    let (server, client) = setup(Session::new()).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let err = client.login("a@b.c", &secret("nope")).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "API error (HTTP 401): Invalid credentials");
}

#[tokio::test]
async fn test_register_sends_name_email_password() {
    let (server, client) = setup(Session::new()).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(
            json!({ "name": "Ada", "email": "ada@example.com", "password": "pw" }),
        ))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "token": "jwt-2" })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = client
        .register("Ada", "ada@example.com", &secret("pw"))
        .await
        .unwrap();
    assert_eq!(auth.token.expose_secret(), "jwt-2");
}

#[tokio::test]
async fn test_auth_endpoints_never_send_bearer() {
    let (server, client) = setup(Session::with_token(secret("stale"))).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "fresh" })))
        .mount(&server)
        .await;

    client.login("a@b.c", &secret("pw")).await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert!(received[0].headers.get("authorization").is_none());
}

// ── Bearer token handling ───────────────────────────────────────────

#[tokio::test]
async fn test_device_calls_carry_bearer_token() {
    let (server, client) = setup(Session::with_token(secret("jwt-1"))).await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .and(header("authorization", "Bearer jwt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.list_devices().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_token_is_read_on_every_call() {
    let session = Session::new();
    let (server, client) = setup(session.clone()).await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    client.list_devices().await.unwrap();
    session.set_token(secret("later"));
    client.list_devices().await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
    assert!(received[0].headers.get("authorization").is_none());
    assert_eq!(
        received[1].headers.get("authorization").unwrap(),
        "Bearer later"
    );
}

// ── Device CRUD ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices_preserves_config_order() {
    let (server, client) = setup(Session::new()).await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[{"id":5,"name":"Porch","type":"light","config":{"zeta":1,"alpha":"on"}}]"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].id, json!(5));
    assert_eq!(devices[0].device_type, "light");
    let keys: Vec<&String> = devices[0].config.keys().collect();
    assert_eq!(keys, ["zeta", "alpha"]);
}

#[tokio::test]
async fn test_unexpected_shape_keeps_raw_body() {
    let (server, client) = setup(Session::new()).await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "devices": [] })))
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, r#"{"devices":[]}"#),
        other => panic!("expected Deserialization, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_device() {
    let (server, client) = setup(Session::new()).await;

    Mock::given(method("GET"))
        .and(path("/api/devices/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({ "id": "abc", "name": "Door", "type": "camera", "config": {} }),
        ))
        .mount(&server)
        .await;

    let device = client.get_device("abc").await.unwrap();
    assert_eq!(device.name, "Door");
}

#[tokio::test]
async fn test_create_device_posts_full_payload() {
    let (server, client) = setup(Session::new()).await;

    Mock::given(method("POST"))
        .and(path("/api/devices"))
        .and(body_json(
            json!({ "name": "Kitchen", "type": "thermostat", "config": { "target": 70 } }),
        ))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 1, "name": "Kitchen", "type": "thermostat", "config": { "target": 70 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client.create_device(&kitchen_payload()).await.unwrap();
    assert_eq!(created.id, json!(1));
}

#[tokio::test]
async fn test_update_device_puts_to_id() {
    let (server, client) = setup(Session::new()).await;

    Mock::given(method("PUT"))
        .and(path("/api/devices/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "name": "Kitchen", "type": "thermostat", "config": { "target": 72 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client.update_device("5", &kitchen_payload()).await.unwrap();
    assert_eq!(updated.config["target"], json!(72));
}

#[tokio::test]
async fn test_update_missing_device_reports_message() {
    let (server, client) = setup(Session::new()).await;

    Mock::given(method("PUT"))
        .and(path("/api/devices/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Device not found" })))
        .mount(&server)
        .await;

    let err = client.update_device("99", &kitchen_payload()).await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 404, ref message } if message == "Device not found"));
}

#[tokio::test]
async fn test_delete_device_accepts_empty_ack() {
    let (server, client) = setup(Session::new()).await;

    Mock::given(method("DELETE"))
        .and(path("/api/devices/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_device("3").await.unwrap();
}

#[tokio::test]
async fn test_device_ids_are_single_escaped_segments() {
    let (server, client) = setup(Session::new()).await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    for id in ["a#b", "../auth/login", "x?y=1", "50%"] {
        client.delete_device(id).await.unwrap();
    }

    let paths: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_owned())
        .collect();
    assert_eq!(
        paths,
        [
            "/api/devices/a%23b",
            "/api/devices/..%2Fauth%2Flogin",
            "/api/devices/x%3Fy=1",
            "/api/devices/50%25",
        ]
    );
}

#[tokio::test]
async fn test_dot_segment_ids_are_rejected() {
    let (server, client) = setup(Session::new()).await;

    for id in ["", ".", ".."] {
        let err = client.get_device(id).await.unwrap_err();
        assert!(matches!(err, Error::InvalidId(ref got) if got == id), "{err:?}");
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_generic_request_returns_payload() {
    let (server, client) = setup(Session::new()).await;

    Mock::given(method("DELETE"))
        .and(path("/api/devices/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Device deleted" })))
        .mount(&server)
        .await;

    let ack = client.request(Method::DELETE, "/devices/3", None).await.unwrap();
    assert_eq!(ack["message"], "Device deleted");
}

// ── Error normalization ─────────────────────────────────────────────

#[tokio::test]
async fn test_non_json_error_uses_fallback_message() {
    let (server, client) = setup(Session::new()).await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 500, ref message } if message == "API error"));
}

#[tokio::test]
async fn test_network_failure_is_transport_error() {
    // Port 1 is privileged and unused; the connection is refused.
    let client = ApiClient::with_transport(
        "http://127.0.0.1:1/api",
        HttpTransport::with_client(reqwest::Client::new()),
        Session::new(),
    )
    .unwrap();

    let err = client.list_devices().await.unwrap_err();
    assert!(err.is_network(), "expected network error, got {err:?}");
    assert_eq!(err.status(), None);
}
