//! Centralized error types for the Return Signals workspace.

use serde_json::{Map, Value};
use thiserror::Error;

/// Machine-readable code the API sends when a login needs email verification.
pub const EMAIL_VERIFICATION_REQUIRED: &str = "email_verification_required";

/// Fallback shown to users when an error carries nothing displayable.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Detail used when a failed session refresh ends the request.
pub const SESSION_EXPIRED: &str = "Session expired";

/// Top-level error enum. Variants map to subsystems.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SignalsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type SignalsResult<T> = Result<T, SignalsError>;

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Failure below the HTTP layer: nothing came back from the server.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Other(String),
}

// ---------------------------------------------------------------------------
// HTTP errors
// ---------------------------------------------------------------------------

/// Error payload carried by a non-2xx response.
///
/// Decided once at the HTTP boundary so call sites never re-inspect raw JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
    Message(String),
    Structured(StructuredDetail),
}

/// Object-shaped error detail, e.g.
/// `{"code": "email_verification_required", "pending_authentication_token": "..."}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredDetail {
    pub code: Option<String>,
    pub message: Option<String>,
    /// Every other field of the object, untouched.
    pub extra: Map<String, Value>,
}

impl StructuredDetail {
    pub fn from_object(mut object: Map<String, Value>) -> Self {
        let code = take_string(&mut object, "code");
        let message = take_string(&mut object, "message");
        Self {
            code,
            message,
            extra: object,
        }
    }

    /// String-valued auxiliary field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.extra.get(name).and_then(Value::as_str)
    }
}

fn take_string(object: &mut Map<String, Value>, key: &str) -> Option<String> {
    match object.remove(key) {
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            // Not a string: leave it for consumers that know better.
            object.insert(key.to_string(), other);
            None
        }
        None => None,
    }
}

impl ErrorDetail {
    /// Extracts the detail from a (possibly empty) parsed error body.
    ///
    /// Accepts `{"detail": "..."}`, `{"detail": {...}}` and a bare object
    /// carrying a `code`. Anything else becomes the generic status message.
    pub fn from_body(status: u16, body: &Value) -> Self {
        match body.get("detail") {
            Some(Value::String(s)) if !s.is_empty() => return Self::Message(s.clone()),
            Some(Value::Object(obj)) => {
                return Self::Structured(StructuredDetail::from_object(obj.clone()))
            }
            _ => {}
        }

        if let Some(obj) = body.as_object() {
            if obj.get("code").is_some_and(Value::is_string) {
                return Self::Structured(StructuredDetail::from_object(obj.clone()));
            }
        }

        Self::status_fallback(status)
    }

    pub fn status_fallback(status: u16) -> Self {
        Self::Message(format!("Request failed with status {status}"))
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Structured(s) => s.code.as_deref(),
            Self::Message(_) => None,
        }
    }

    pub fn as_structured(&self) -> Option<&StructuredDetail> {
        match self {
            Self::Structured(s) => Some(s),
            Self::Message(_) => None,
        }
    }

    /// Human-readable text: the string as-is, or the structured `message`.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Message(s) => Some(s),
            Self::Structured(s) => s.message.as_deref(),
        }
    }
}

impl std::fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Message(s) => f.write_str(s),
            Self::Structured(s) => match (&s.message, &s.code) {
                (Some(message), _) => f.write_str(message),
                (None, Some(code)) => f.write_str(code),
                (None, None) => f.write_str("structured error"),
            },
        }
    }
}

/// Failure of a single logical API call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: ErrorDetail },

    /// No HTTP response at all.
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    pub fn status_error(status: u16, detail: ErrorDetail) -> Self {
        Self::Status { status, detail }
    }

    /// The fixed failure returned once a session refresh has been refused.
    pub fn session_expired() -> Self {
        Self::Status {
            status: 401,
            detail: ErrorDetail::Message(SESSION_EXPIRED.to_string()),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn detail(&self) -> Option<&ErrorDetail> {
        match self {
            Self::Status { detail, .. } => Some(detail),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// 403 with the `email_verification_required` code.
    pub fn is_email_verification_required(&self) -> bool {
        match self {
            Self::Status { status: 403, detail } => {
                detail.code() == Some(EMAIL_VERIFICATION_REQUIRED)
            }
            _ => false,
        }
    }

    /// Token needed to continue a login that stopped at email verification.
    pub fn pending_authentication_token(&self) -> Option<&str> {
        self.detail()?
            .as_structured()?
            .field("pending_authentication_token")
    }

    pub fn display_message(&self) -> &str {
        self.detail()
            .and_then(ErrorDetail::message)
            .unwrap_or(GENERIC_ERROR_MESSAGE)
    }
}
