//! Organization membership routes.

use signals_core::types::{Member, MemberList, MessageResponse, OrgRole, RoleUpdate};
use signals_core::ApiError;
use signals_gateway::Gateway;

pub struct MembersApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> MembersApi<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, org_id: &str) -> Result<MemberList, ApiError> {
        self.gateway
            .get(&format!("/organizations/{org_id}/members"))
            .await
    }

    pub async fn change_role(
        &self,
        org_id: &str,
        user_id: &str,
        role: OrgRole,
    ) -> Result<Member, ApiError> {
        self.gateway
            .patch(
                &format!("/organizations/{org_id}/members/{user_id}/role"),
                Some(&RoleUpdate { role }),
            )
            .await
    }

    pub async fn remove(&self, org_id: &str, user_id: &str) -> Result<MessageResponse, ApiError> {
        self.gateway
            .delete(&format!("/organizations/{org_id}/members/{user_id}"))
            .await
    }
}
