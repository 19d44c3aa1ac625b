//! The authenticated request gateway.

use crate::config::GatewayConfig;
use crate::events::{SessionEvents, Subscription};
use crate::refresh::SessionRefresher;
use crate::transport::ReqwestTransport;
use crate::{HttpRequest, HttpResponse, Method, Transport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use signals_core::error::SignalsResult;
use signals_core::{ApiError, ErrorDetail};
use std::sync::Arc;

const CONTENT_TYPE: &str = "Content-Type";
const JSON: &str = "application/json";

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Serialized to JSON by the gateway.
    Json(Value),
    /// Sent as-is.
    Text(String),
}

/// Method, extra headers and body of one call.
///
/// `Content-Type: application/json` is always sent unless a header of the
/// same name is given here.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<Body>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, value: Value) -> Self {
        self.body = Some(Body::Json(value));
        self
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Body::Text(body.into()));
        self
    }
}

/// Performs API calls with the session credential attached, renewing an
/// expired session transparently.
///
/// Cheap to clone; clones share the transport, the refresh guard and the
/// session-expired subscribers.
///
/// ```ignore
/// let gateway = Gateway::new(GatewayConfig::from_env()?)?;
/// let _sub = gateway.on_session_expired(|| eprintln!("please log in again"));
/// let orgs: Vec<Organization> = gateway.get("/organizations").await?;
/// ```
#[derive(Clone)]
pub struct Gateway {
    config: Arc<GatewayConfig>,
    transport: Arc<dyn Transport>,
    refresher: Arc<SessionRefresher>,
    events: Arc<SessionEvents>,
}

impl Gateway {
    /// Gateway over a fresh [`ReqwestTransport`].
    pub fn new(config: GatewayConfig) -> SignalsResult<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: GatewayConfig, transport: Arc<dyn Transport>) -> Self {
        let events = SessionEvents::new();
        let refresh_request = HttpRequest {
            method: Method::POST,
            url: config.refresh_url(),
            headers: vec![(CONTENT_TYPE.to_string(), JSON.to_string())],
            body: None,
        };
        let refresher = SessionRefresher::new(
            Arc::clone(&transport),
            refresh_request,
            config.refresh_timeout,
            Arc::clone(&events),
        );

        Self {
            config: Arc::new(config),
            transport,
            refresher: Arc::new(refresher),
            events,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Registers a callback fired once per refused session refresh.
    pub fn on_session_expired<F>(&self, handler: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.events.subscribe(handler)
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresher.is_refreshing()
    }

    /// Issues one logical call to `path` (server-relative, may carry a query).
    ///
    /// A 401 outside the skip list triggers one shared session refresh and a
    /// single retry. The retry's outcome is final.
    pub async fn request<T>(&self, path: &str, options: RequestOptions) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let request = self.prepare(path, options)?;
        let response = self.send(path, request.clone()).await?;

        let response = if response.status == 401 && !self.config.skip_list.is_skipped(path) {
            tracing::debug!(path, "401, attempting session refresh");
            if !self.refresher.refresh().await {
                return Err(ApiError::session_expired());
            }
            self.send(path, request).await?
        } else {
            response
        };

        decode(response)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(path, RequestOptions::new(Method::GET)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(path, with_json(Method::POST, body)?).await
    }

    pub async fn put<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(path, with_json(Method::PUT, body)?).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(path, with_json(Method::PATCH, body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(path, RequestOptions::new(Method::DELETE)).await
    }

    fn prepare(&self, path: &str, options: RequestOptions) -> Result<HttpRequest, ApiError> {
        let mut headers = Vec::with_capacity(options.headers.len() + 1);
        if !options
            .headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE))
        {
            headers.push((CONTENT_TYPE.to_string(), JSON.to_string()));
        }
        headers.extend(options.headers);

        let body = match options.body {
            Some(Body::Json(value)) => Some(serde_json::to_string(&value).map_err(ApiError::Encode)?),
            Some(Body::Text(text)) => Some(text),
            None => None,
        };

        Ok(HttpRequest {
            method: options.method,
            url: self.config.url_for(path),
            headers,
            body,
        })
    }

    async fn send(&self, path: &str, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method.clone();
        let response = self.transport.send(request).await.map_err(|e| {
            tracing::debug!(%method, path, error = %e, "transport failure");
            ApiError::Transport(e)
        })?;
        tracing::debug!(%method, path, status = response.status, "response");
        Ok(response)
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.config.base_url.as_str())
            .field("refresher", &self.refresher)
            .field("events", &self.events)
            .finish()
    }
}

fn with_json<B: Serialize + ?Sized>(
    method: Method,
    body: Option<&B>,
) -> Result<RequestOptions, ApiError> {
    let options = RequestOptions::new(method);
    match body {
        Some(body) => Ok(options.json(serde_json::to_value(body).map_err(ApiError::Encode)?)),
        None => Ok(options),
    }
}

/// Maps a final response to the caller's type.
///
/// 204 and an empty 2xx body decode from `null`. An unparseable body counts as `{}`.
fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    let empty = response.body.iter().all(u8::is_ascii_whitespace);
    if response.status == 204 || (response.is_success() && empty) {
        return serde_json::from_value(Value::Null).map_err(ApiError::Decode);
    }

    let body: Value = serde_json::from_slice(&response.body)
        .unwrap_or_else(|_| Value::Object(Map::new()));

    if !response.is_success() {
        return Err(ApiError::status_error(
            response.status,
            ErrorDetail::from_body(response.status, &body),
        ));
    }

    serde_json::from_value(body).map_err(ApiError::Decode)
}
