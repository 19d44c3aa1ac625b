//! `/organizations` routes.

use signals_core::types::{Organization, OrganizationUpdate};
use signals_core::ApiError;
use signals_gateway::Gateway;

pub struct OrganizationsApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> OrganizationsApi<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Organizations the current user belongs to.
    pub async fn list(&self) -> Result<Vec<Organization>, ApiError> {
        self.gateway.get("/organizations").await
    }

    pub async fn get(&self, org_id: &str) -> Result<Organization, ApiError> {
        self.gateway.get(&format!("/organizations/{org_id}")).await
    }

    /// Admin and above.
    pub async fn update(
        &self,
        org_id: &str,
        data: &OrganizationUpdate,
    ) -> Result<Organization, ApiError> {
        self.gateway
            .put(&format!("/organizations/{org_id}"), Some(data))
            .await
    }
}
