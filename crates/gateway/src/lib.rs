//! Authenticated request gateway for the Return Signals API.
//!
//! Every call goes through [`Gateway::request`], which attaches the session
//! credential, renews an expired session at most once per burst of 401s and
//! turns non-2xx answers into [`ApiError`](signals_core::ApiError) values.

pub mod config;
pub mod events;
pub mod gateway;
pub mod refresh;
pub mod transport;

use async_trait::async_trait;
use signals_core::TransportError;

pub use config::{GatewayConfig, SkipList};
pub use events::{SessionEvents, Subscription};
pub use gateway::{Body, Gateway, RequestOptions};
pub use reqwest::Method;
pub use transport::ReqwestTransport;

/// Fully resolved outbound call, ready for the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// Raw answer from the server. The body is parsed by the gateway, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over the HTTP stack.
///
/// Implementations attach the ambient session credential (cookies) to every
/// call. Network-level failures surface as `Err`; any HTTP status is `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
