//! HTTP transport backed by reqwest.

use crate::config::GatewayConfig;
use crate::{HttpRequest, HttpResponse, Transport};
use async_trait::async_trait;
use reqwest::cookie::Jar;
use signals_core::error::{SignalsError, SignalsResult};
use signals_core::TransportError;
use std::sync::Arc;

/// Sends requests with a shared cookie jar, so the session cookie set by
/// login/refresh rides along on every later call.
///
/// ```ignore
/// let transport = ReqwestTransport::new(&GatewayConfig::from_env()?)?;
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    cookies: Arc<Jar>,
}

impl ReqwestTransport {
    pub fn new(config: &GatewayConfig) -> SignalsResult<Self> {
        let cookies = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| SignalsError::Config(format!("Failed to build HTTP client: {e}")))?;

        tracing::debug!(base_url = %config.base_url, "http transport ready");

        Ok(Self { client, cookies })
    }

    /// The jar holding the session cookie.
    pub fn cookie_jar(&self) -> &Arc<Jar> {
        &self.cookies
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Other(e.to_string())
    }
}
