//! Signed-in user state.
//!
//! Caches the current [`User`] and drops it as soon as the gateway reports
//! that the session could not be renewed.

use crate::ReturnSignals;
use signals_core::types::{
    EmailVerificationRequest, EmailVerificationResponse, LoginRequest, RegisterRequest,
    RegisterResponse, User,
};
use signals_core::ApiError;
use signals_gateway::Subscription;
use std::sync::{Arc, PoisonError, RwLock};

type SharedUser = Arc<RwLock<Option<User>>>;

/// Auth state shared by everything built on one [`ReturnSignals`] client.
///
/// ```ignore
/// let session = Session::new(client.clone());
/// if session.restore().await.is_none() {
///     session.login("ops@shop.co", "hunter22").await?;
/// }
/// ```
pub struct Session {
    client: ReturnSignals,
    user: SharedUser,
    subscription: Option<Subscription>,
}

impl Session {
    pub fn new(client: ReturnSignals) -> Self {
        let user: SharedUser = Arc::new(RwLock::new(None));
        let cleared = Arc::clone(&user);
        let subscription = client.gateway().on_session_expired(move || {
            tracing::info!("session expired, clearing signed-in user");
            *cleared.write().unwrap_or_else(PoisonError::into_inner) = None;
        });

        Self {
            client,
            user,
            subscription: Some(subscription),
        }
    }

    pub fn client(&self) -> &ReturnSignals {
        &self.client
    }

    pub fn user(&self) -> Option<User> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Picks up an existing session cookie. Any failure means signed out.
    pub async fn restore(&self) -> Option<User> {
        match self.client.auth().me().await {
            Ok(user) => {
                self.set_user(Some(user.clone()));
                Some(user)
            }
            Err(e) => {
                if !e.is_unauthorized() {
                    tracing::warn!(error = %e, "session check failed");
                }
                self.set_user(None);
                None
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let credentials = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.client.auth().login(&credentials).await?;
        tracing::info!(user_id = %response.user.user_id, "signed in");
        self.set_user(Some(response.user.clone()));
        Ok(response.user)
    }

    /// Local state is cleared even when the server call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.client.auth().logout().await;
        self.set_user(None);
        result.map(|_| ())
    }

    /// Signs in right away when the server needs no email verification.
    pub async fn register(&self, data: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let response = self.client.auth().register(data).await?;
        if !response.email_verification_required {
            if let Some(user) = &response.user {
                self.set_user(Some(user.clone()));
            }
        }
        Ok(response)
    }

    pub async fn verify_email(
        &self,
        code: &str,
        pending_authentication_token: &str,
    ) -> Result<EmailVerificationResponse, ApiError> {
        let request = EmailVerificationRequest {
            code: code.to_string(),
            pending_authentication_token: pending_authentication_token.to_string(),
        };
        let response = self.client.auth().verify_email(&request).await?;
        if let Some(user) = &response.user {
            self.set_user(Some(user.clone()));
        }
        Ok(response)
    }

    fn set_user(&self, user: Option<User>) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = user;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
