//! Conversation routes under `/organizations/{org}/conversations`.

use crate::query::Query;
use signals_core::types::{
    ConversationDetail, ConversationList, ConversationStatus, CreateConversationRequest,
    CreateConversationResponse, SendMessageRequest, SendMessageResponse,
};
use signals_core::ApiError;
use signals_gateway::Gateway;

/// Unset fields are omitted from the query; `Some(0)` is sent as `0`.
#[derive(Debug, Clone, Default)]
pub struct ConversationListParams {
    pub status: Option<ConversationStatus>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ConversationListParams {
    fn query(&self) -> Query {
        Query::new()
            .opt_str("status", self.status.as_ref().map(ConversationStatus::as_str))
            .opt("limit", self.limit)
            .opt("offset", self.offset)
    }
}

pub struct ConversationsApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> ConversationsApi<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(
        &self,
        org_id: &str,
        params: &ConversationListParams,
    ) -> Result<ConversationList, ApiError> {
        let path = params
            .query()
            .apply(&format!("/organizations/{org_id}/conversations"));
        self.gateway.get(&path).await
    }

    /// Conversation with its full message thread.
    pub async fn get(
        &self,
        org_id: &str,
        conversation_id: &str,
    ) -> Result<ConversationDetail, ApiError> {
        self.gateway
            .get(&format!(
                "/organizations/{org_id}/conversations/{conversation_id}"
            ))
            .await
    }

    /// Proactive outreach: opens a thread and optionally sends the first SMS.
    pub async fn create(
        &self,
        org_id: &str,
        data: &CreateConversationRequest,
    ) -> Result<CreateConversationResponse, ApiError> {
        self.gateway
            .post(&format!("/organizations/{org_id}/conversations"), Some(data))
            .await
    }

    pub async fn send_message(
        &self,
        org_id: &str,
        conversation_id: &str,
        content: &str,
    ) -> Result<SendMessageResponse, ApiError> {
        let body = SendMessageRequest {
            content: content.to_string(),
        };
        self.gateway
            .post(
                &format!("/organizations/{org_id}/conversations/{conversation_id}/messages"),
                Some(&body),
            )
            .await
    }
}
