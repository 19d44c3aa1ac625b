//! Gateway configuration.

use signals_core::error::{SignalsError, SignalsResult};
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";

/// Routes whose 401s mean "bad credentials", never "expired session".
pub const DEFAULT_SKIP_PATHS: [&str; 4] = [
    "/auth/login",
    "/auth/register",
    "/auth/refresh",
    "/auth/logout",
];

const ENV_API_URL: &str = "SIGNALS_API_URL";
const ENV_TIMEOUT_SECS: &str = "SIGNALS_TIMEOUT_SECS";

/// Path prefixes exempt from the refresh protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipList {
    prefixes: Vec<String>,
}

impl SkipList {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_skipped(&self, path: &str) -> bool {
        self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new(DEFAULT_SKIP_PATHS)
    }
}

/// Configuration for a [`Gateway`](crate::Gateway).
///
/// ```ignore
/// let config = GatewayConfig::new("https://api.returnsignals.com")?
///     .with_refresh_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: Url,
    pub refresh_path: String,
    pub skip_list: SkipList,
    /// Per-request timeout applied by the HTTP client.
    pub timeout: Duration,
    /// Upper bound on a refresh call. `None` leaves it to `timeout`.
    pub refresh_timeout: Option<Duration>,
    pub user_agent: String,
}

impl GatewayConfig {
    pub fn new(base_url: &str) -> SignalsResult<Self> {
        let base_url = parse_base_url(base_url)?;
        Ok(Self {
            base_url,
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            skip_list: SkipList::default(),
            timeout: Duration::from_secs(30),
            refresh_timeout: None,
            user_agent: format!("return-signals-rust/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Reads `SIGNALS_API_URL` and `SIGNALS_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> SignalsResult<Self> {
        let base_url = std::env::var(ENV_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let mut config = Self::new(&base_url)?;

        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                SignalsError::Config(format!("{ENV_TIMEOUT_SECS} must be an integer, got {raw:?}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = Some(timeout);
        self
    }

    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    pub fn with_skip_list(mut self, skip_list: SkipList) -> Self {
        self.skip_list = skip_list;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Absolute URL for a server-relative route.
    ///
    /// Plain concatenation: a base of `https://host/v1` keeps its `/v1`.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    pub fn refresh_url(&self) -> String {
        self.url_for(&self.refresh_path)
    }
}

fn parse_base_url(raw: &str) -> SignalsResult<Url> {
    if raw.trim().is_empty() {
        return Err(SignalsError::Config("API URL must not be empty".into()));
    }

    let url = Url::parse(raw)
        .map_err(|e| SignalsError::Config(format!("Invalid API URL {raw:?}: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(SignalsError::Config(format!(
            "API URL must be http(s), got scheme {other:?}"
        ))),
    }
}
