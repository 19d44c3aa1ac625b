//! Organization settings: AI behaviour and store integrations.

use signals_core::analytics::{AiSettings, AiSettingsUpdate, Integrations, IntegrationsUpdate};
use signals_core::ApiError;
use signals_gateway::Gateway;

pub struct SettingsApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> SettingsApi<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Viewer and above.
    pub async fn ai(&self, org_id: &str) -> Result<AiSettings, ApiError> {
        self.gateway
            .get(&format!("/organizations/{org_id}/settings/ai"))
            .await
    }

    /// Manager and above.
    pub async fn update_ai(
        &self,
        org_id: &str,
        data: &AiSettingsUpdate,
    ) -> Result<AiSettings, ApiError> {
        self.gateway
            .put(&format!("/organizations/{org_id}/settings/ai"), Some(data))
            .await
    }

    /// Admin and above.
    pub async fn integrations(&self, org_id: &str) -> Result<Integrations, ApiError> {
        self.gateway
            .get(&format!("/organizations/{org_id}/settings/integrations"))
            .await
    }

    pub async fn update_integrations(
        &self,
        org_id: &str,
        data: &IntegrationsUpdate,
    ) -> Result<Integrations, ApiError> {
        self.gateway
            .put(
                &format!("/organizations/{org_id}/settings/integrations"),
                Some(data),
            )
            .await
    }
}
