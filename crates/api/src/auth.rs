//! `/auth/*` routes.
//!
//! Login, registration, refresh and logout are on the gateway's skip list:
//! a 401 from them is a real answer, not an expired session.

use serde_json::json;
use signals_core::types::{
    EmailVerificationRequest, EmailVerificationResponse, LoginRequest, LoginResponse,
    MessageResponse, RegisterRequest, RegisterResponse, User,
};
use signals_core::ApiError;
use signals_gateway::Gateway;

pub struct AuthApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> AuthApi<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Sets the HttpOnly session cookie on success.
    ///
    /// A 403 with `email_verification_required` carries the token needed by
    /// [`AuthApi::verify_email`]; see [`ApiError::pending_authentication_token`].
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.gateway.post("/auth/login", Some(credentials)).await
    }

    pub async fn logout(&self) -> Result<MessageResponse, ApiError> {
        self.gateway.post::<_, ()>("/auth/logout", None).await
    }

    /// Current user; 401 when signed out and the session cannot be renewed.
    pub async fn me(&self) -> Result<User, ApiError> {
        self.gateway.get("/auth/me").await
    }

    pub async fn register(&self, data: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.gateway.post("/auth/register", Some(data)).await
    }

    /// Completes registration or login with the 6-digit emailed code.
    pub async fn verify_email(
        &self,
        data: &EmailVerificationRequest,
    ) -> Result<EmailVerificationResponse, ApiError> {
        self.gateway.post("/auth/verify-email", Some(data)).await
    }

    /// Explicit session renewal. The gateway does this on its own after a 401.
    pub async fn refresh(&self) -> Result<MessageResponse, ApiError> {
        self.gateway.post::<_, ()>("/auth/refresh", None).await
    }

    /// Always succeeds for well-formed input, whether or not the email exists.
    pub async fn request_password_reset(&self, email: &str) -> Result<MessageResponse, ApiError> {
        self.gateway
            .post("/auth/password-reset/request", Some(&json!({ "email": email })))
            .await
    }

    pub async fn confirm_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ApiError> {
        self.gateway
            .post(
                "/auth/password-reset/confirm",
                Some(&json!({ "token": token, "new_password": new_password })),
            )
            .await
    }
}
