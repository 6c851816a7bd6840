// Authenticated request client for the registry REST API.
//
// Base path: <server>/ (default http://localhost:4000/api/)
// Auth: `Authorization: Bearer <token>` read from the `Session` per call.

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{AuthResponse, DevicePayload, DeviceResponse, LoginRequest, RegisterRequest};
use crate::session::Session;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Transport, TransportConfig};

/// Where the registry lives unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000/api";

/// Used when an error response carries no usable `message`.
const FALLBACK_ERROR_MESSAGE: &str = "API error";

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the device registry.
///
/// Every device call carries the session's bearer token when one is set;
/// without a token the request goes out unauthenticated and the server
/// decides. No retries: any failure is returned to the caller as-is.
pub struct ApiClient<T: Transport = HttpTransport> {
    transport: T,
    base_url: Url,
    session: Session,
}

impl ApiClient<HttpTransport> {
    /// Build a reqwest-backed client.
    pub fn new(base_url: &str, session: Session, config: &TransportConfig) -> Result<Self, Error> {
        Self::with_transport(base_url, HttpTransport::new(config)?, session)
    }
}

impl<T: Transport> ApiClient<T> {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build on top of any [`Transport`] (tests use in-memory ones).
    pub fn with_transport(base_url: &str, transport: T, session: Session) -> Result<Self, Error> {
        Ok(Self {
            transport,
            base_url: Self::normalize_base_url(base_url)?,
            session,
        })
    }

    /// Ensure the base path ends with `/` so relative joins append to it.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL + header builders ────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// `devices/{id}`, with the id pushed as a single percent-encoded
    /// path segment.
    fn device_url(&self, id: &str) -> Result<Url, Error> {
        if matches!(id, "" | "." | "..") {
            return Err(Error::InvalidId(id.to_owned()));
        }
        let mut url = self.url("devices")?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id);
        Ok(url)
    }

    fn headers(&self, authenticated: bool) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if authenticated {
            if let Some(token) = self.session.token() {
                headers.insert(AUTHORIZATION, bearer(&token)?);
            }
        }
        Ok(headers)
    }

    // ── Request pipeline ─────────────────────────────────────────────

    /// Issue an authenticated request and return the parsed payload.
    ///
    /// A successful response with an empty body yields `Value::Null`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, Error> {
        let resp = self.dispatch(method, self.url(path)?, body, true).await?;
        handle_response(resp)
    }

    async fn dispatch(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
        authenticated: bool,
    ) -> Result<HttpResponse, Error> {
        debug!("{method} {url}");

        let request = HttpRequest {
            method,
            url,
            headers: self.headers(authenticated)?,
            body,
        };
        self.transport.send(request).await
    }

    async fn send_json<R: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
        authenticated: bool,
    ) -> Result<R, Error> {
        let resp = self.dispatch(method, url, body, authenticated).await?;
        decode(&handle_response(resp)?)
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Auth ─────────────────────────────────────────────────────────

    /// `POST /auth/register`. Never sends the bearer token.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, Error> {
        let body = to_body(&RegisterRequest {
            name,
            email,
            password: password.expose_secret(),
        })?;
        self.send_json(Method::POST, self.url("auth/register")?, Some(body), false)
            .await
    }

    /// `POST /auth/login`. Never sends the bearer token.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<AuthResponse, Error> {
        let body = to_body(&LoginRequest {
            email,
            password: password.expose_secret(),
        })?;
        self.send_json(Method::POST, self.url("auth/login")?, Some(body), false)
            .await
    }

    // ── Devices ──────────────────────────────────────────────────────

    pub async fn list_devices(&self) -> Result<Vec<DeviceResponse>, Error> {
        self.send_json(Method::GET, self.url("devices")?, None, true)
            .await
    }

    pub async fn get_device(&self, id: &str) -> Result<DeviceResponse, Error> {
        self.send_json(Method::GET, self.device_url(id)?, None, true)
            .await
    }

    pub async fn create_device(&self, payload: &DevicePayload) -> Result<DeviceResponse, Error> {
        self.send_json(Method::POST, self.url("devices")?, Some(to_body(payload)?), true)
            .await
    }

    pub async fn update_device(
        &self,
        id: &str,
        payload: &DevicePayload,
    ) -> Result<DeviceResponse, Error> {
        self.send_json(
            Method::PUT,
            self.device_url(id)?,
            Some(to_body(payload)?),
            true,
        )
        .await
    }

    /// `DELETE /devices/{id}`. The acknowledgement body is not inspected.
    pub async fn delete_device(&self, id: &str) -> Result<(), Error> {
        let resp = self
            .dispatch(Method::DELETE, self.device_url(id)?, None, true)
            .await?;
        if resp.status.is_success() {
            Ok(())
        } else {
            Err(parse_error(&resp))
        }
    }
}

// ── Response handling ────────────────────────────────────────────────

fn handle_response(resp: HttpResponse) -> Result<Value, Error> {
    if !resp.status.is_success() {
        return Err(parse_error(&resp));
    }
    if resp.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&resp.body).map_err(|e| {
        let preview = preview(&resp.body);
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: resp.body,
        }
    })
}

fn parse_error(resp: &HttpResponse) -> Error {
    let message = serde_json::from_str::<ErrorResponse>(&resp.body)
        .ok()
        .and_then(|err| err.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_owned());

    debug!(status = resp.status.as_u16(), %message, "request failed");
    Error::Api {
        status: resp.status.as_u16(),
        message,
    }
}

fn decode<R: DeserializeOwned>(value: &Value) -> Result<R, Error> {
    serde::Deserialize::deserialize(value).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: value.to_string(),
    })
}

fn to_body<B: Serialize>(body: &B) -> Result<Value, Error> {
    serde_json::to_value(body).map_err(|e| Error::Deserialization {
        message: format!("failed to encode request body: {e}"),
        body: String::new(),
    })
}

fn bearer(token: &SecretString) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        .map_err(|e| Error::InvalidToken(e.to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
