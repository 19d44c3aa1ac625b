//! Typed client for the Return Signals API.
//!
//! Each resource module is a thin mapping from a call to a route; the
//! credential handling and session renewal live in [`signals_gateway`].

pub mod analytics;
pub mod auth;
pub mod conversations;
pub mod invitations;
pub mod members;
pub mod organizations;
pub mod query;
pub mod session;
pub mod settings;

use signals_core::error::SignalsResult;
use signals_gateway::{Gateway, GatewayConfig};

pub use analytics::AnalyticsApi;
pub use auth::AuthApi;
pub use conversations::{ConversationListParams, ConversationsApi};
pub use invitations::InvitationsApi;
pub use members::MembersApi;
pub use organizations::OrganizationsApi;
pub use session::Session;
pub use settings::SettingsApi;

/// Entry point. Cheap to clone; clones share one gateway.
///
/// ```ignore
/// let client = ReturnSignals::from_env()?;
/// let orgs = client.organizations().list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReturnSignals {
    gateway: Gateway,
}

impl ReturnSignals {
    pub fn new(config: GatewayConfig) -> SignalsResult<Self> {
        Ok(Self::from_gateway(Gateway::new(config)?))
    }

    pub fn from_env() -> SignalsResult<Self> {
        Self::new(GatewayConfig::from_env()?)
    }

    pub fn from_gateway(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(&self.gateway)
    }

    pub fn organizations(&self) -> OrganizationsApi<'_> {
        OrganizationsApi::new(&self.gateway)
    }

    pub fn conversations(&self) -> ConversationsApi<'_> {
        ConversationsApi::new(&self.gateway)
    }

    pub fn members(&self) -> MembersApi<'_> {
        MembersApi::new(&self.gateway)
    }

    pub fn invitations(&self) -> InvitationsApi<'_> {
        InvitationsApi::new(&self.gateway)
    }

    pub fn analytics(&self) -> AnalyticsApi<'_> {
        AnalyticsApi::new(&self.gateway)
    }

    pub fn settings(&self) -> SettingsApi<'_> {
        SettingsApi::new(&self.gateway)
    }
}
