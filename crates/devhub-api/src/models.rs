// Wire types for the registry REST API.
//
// These mirror the JSON exactly as the server sends it. Config values and
// ids stay as raw JSON here; `devhub-core` converts them into domain types.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A device record as returned by `GET /devices` and friends.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceResponse {
    /// Server-assigned identifier: number or string depending on the backend.
    pub id: Value,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub device_type: String,
    /// Key order is preserved as received.
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// Body of `POST /devices` and `PUT /devices/{id}`. Always the full payload.
#[derive(Debug, Clone, Serialize)]
pub struct DevicePayload {
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub config: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Response of `/auth/login` and `/auth/register`.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: SecretString,
    /// Whatever else the server includes (user profile, expiry, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
