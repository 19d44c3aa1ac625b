//! Pending invitations for an organization.

use signals_core::types::{Invitation, InvitationList, InvitationRequest};
use signals_core::ApiError;
use signals_gateway::Gateway;

pub struct InvitationsApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> InvitationsApi<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, org_id: &str) -> Result<InvitationList, ApiError> {
        self.gateway
            .get(&format!("/organizations/{org_id}/invitations"))
            .await
    }

    /// Without a role the server invites as viewer.
    pub async fn create(
        &self,
        org_id: &str,
        data: &InvitationRequest,
    ) -> Result<Invitation, ApiError> {
        self.gateway
            .post(&format!("/organizations/{org_id}/invitations"), Some(data))
            .await
    }
}
