// devhub-api: Async Rust client for the devhub device registry REST API

pub mod client;
pub mod error;
pub mod models;
pub mod session;
pub mod transport;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::Error;
pub use models::{AuthResponse, DevicePayload, DeviceResponse, LoginRequest, RegisterRequest};
pub use session::Session;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, TlsMode, Transport, TransportConfig};

pub use reqwest::{Method, StatusCode};
