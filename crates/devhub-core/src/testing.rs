// In-memory registry server used by unit tests.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use devhub_api::{ApiClient, Error, HttpRequest, HttpResponse, Session, StatusCode, Transport};
use serde_json::{Value, json};

#[derive(Clone, Default)]
pub(crate) struct FakeServer {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    devices: Vec<Value>,
    next_id: i64,
    list_calls: usize,
    failure: Option<(u16, String)>,
    list_failure: Option<(u16, String)>,
    authorization: Vec<Option<String>>,
}

impl FakeServer {
    pub(crate) fn with_devices(devices: Vec<Value>) -> Self {
        let next_id = devices
            .iter()
            .filter_map(|d| d["id"].as_i64())
            .max()
            .unwrap_or(0);
        let server = Self::default();
        {
            let mut state = server.state.lock().unwrap();
            state.devices = devices;
            state.next_id = next_id;
        }
        server
    }

    pub(crate) fn client(&self) -> ApiClient<Self> {
        ApiClient::with_transport("http://registry.test/api", self.clone(), Session::new()).unwrap()
    }

    /// Make every following request fail.
    pub(crate) fn fail_with(&self, status: u16, message: &str) {
        self.state.lock().unwrap().failure = Some((status, message.to_owned()));
    }

    /// Make only `GET /devices` fail.
    pub(crate) fn fail_lists_with(&self, status: u16, message: &str) {
        self.state.lock().unwrap().list_failure = Some((status, message.to_owned()));
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    /// `Authorization` header of every request received so far.
    pub(crate) fn authorization(&self) -> Vec<Option<String>> {
        self.state.lock().unwrap().authorization.clone()
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let mut state = self.state.lock().unwrap();
        state.authorization.push(
            request
                .headers
                .get("authorization")
                .map(|v| v.to_str().unwrap().to_owned()),
        );
        if let Some((status, message)) = &state.failure {
            return error(*status, message);
        }

        let path = request.url.path().trim_start_matches("/api/").to_owned();
        let segments: Vec<&str> = path.split('/').collect();
        let body = request.body.clone().unwrap_or(Value::Null);

        match (request.method.as_str(), segments.as_slice()) {
            ("POST", ["auth", "login" | "register"]) => ok(&json!({"token": "fake-token"})),
            ("GET", ["devices"]) => {
                state.list_calls += 1;
                if let Some((status, message)) = &state.list_failure {
                    return error(*status, message);
                }
                ok(&Value::Array(state.devices.clone()))
            }
            ("POST", ["devices"]) => {
                state.next_id += 1;
                let record = to_record(json!(state.next_id), &body);
                state.devices.push(record.clone());
                ok(&record)
            }
            ("GET", ["devices", id]) => match find(&state.devices, id) {
                Some(idx) => ok(&state.devices[idx]),
                None => error(404, "Device not found"),
            },
            ("PUT", ["devices", id]) => match find(&state.devices, id) {
                Some(idx) => {
                    let record = to_record(state.devices[idx]["id"].clone(), &body);
                    state.devices[idx] = record.clone();
                    ok(&record)
                }
                None => error(404, "Device not found"),
            },
            ("DELETE", ["devices", id]) => match find(&state.devices, id) {
                Some(idx) => {
                    state.devices.remove(idx);
                    HttpResponse {
                        status: StatusCode::NO_CONTENT,
                        body: String::new(),
                    }
                }
                None => error(404, "Device not found"),
            },
            _ => error(404, "Route not found"),
        }
    }
}

impl Transport for FakeServer {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        tokio::task::yield_now().await;
        Ok(self.handle(&request))
    }
}

fn to_record(id: Value, body: &Value) -> Value {
    json!({
        "id": id,
        "name": body["name"],
        "type": body["type"],
        "config": body["config"],
    })
}

fn find(devices: &[Value], id: &str) -> Option<usize> {
    devices.iter().position(|d| match &d["id"] {
        Value::String(s) => s == id,
        other => other.to_string() == id,
    })
}

fn ok(body: &Value) -> HttpResponse {
    HttpResponse {
        status: StatusCode::OK,
        body: body.to_string(),
    }
}

fn error(status: u16, message: &str) -> HttpResponse {
    HttpResponse {
        status: StatusCode::from_u16(status).unwrap(),
        body: json!({ "message": message }).to_string(),
    }
}
