//! Analytics dashboard routes.

use crate::query::Query;
use serde_json::json;
use signals_core::analytics::{
    AnalyticsOverview, ComplaintSearch, DateRange, InterventionFilter, InterventionList,
    OutcomeType, ProductDetail, TopProducts, TrendingIssues,
};
use signals_core::types::ConversationStatus;
use signals_core::ApiError;
use signals_gateway::Gateway;

fn range_query(range: &DateRange) -> Query {
    Query::new()
        .opt_str("from_date", range.from_date.as_deref())
        .opt_str("to_date", range.to_date.as_deref())
}

pub struct AnalyticsApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> AnalyticsApi<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    fn base(org_id: &str, section: &str) -> String {
        format!("/organizations/{org_id}/analytics/{section}")
    }

    pub async fn overview(
        &self,
        org_id: &str,
        range: &DateRange,
    ) -> Result<AnalyticsOverview, ApiError> {
        let path = range_query(range).apply(&Self::base(org_id, "overview"));
        self.gateway.get(&path).await
    }

    pub async fn interventions(
        &self,
        org_id: &str,
        filter: &InterventionFilter,
    ) -> Result<InterventionList, ApiError> {
        let query = Query::new()
            .opt_str("status", filter.status.as_ref().map(ConversationStatus::as_str))
            .opt_str("outcome_type", filter.outcome_type.as_ref().map(OutcomeType::as_str))
            .opt_str("from_date", filter.range.from_date.as_deref())
            .opt_str("to_date", filter.range.to_date.as_deref())
            .opt("limit", filter.limit)
            .opt("offset", filter.offset);
        let path = query.apply(&Self::base(org_id, "interventions"));
        self.gateway.get(&path).await
    }

    /// Products with the most return-related conversations.
    pub async fn products(&self, org_id: &str, range: &DateRange) -> Result<TopProducts, ApiError> {
        let path = range_query(range).apply(&Self::base(org_id, "products"));
        self.gateway.get(&path).await
    }

    pub async fn product_detail(
        &self,
        org_id: &str,
        product_id: &str,
    ) -> Result<ProductDetail, ApiError> {
        self.gateway
            .get(&Self::base(org_id, &format!("products/{product_id}")))
            .await
    }

    pub async fn trending_issues(
        &self,
        org_id: &str,
        range: &DateRange,
    ) -> Result<TrendingIssues, ApiError> {
        let path = range_query(range).apply(&Self::base(org_id, "trending-issues"));
        self.gateway.get(&path).await
    }

    /// Free-text question answered over the organization's complaints.
    /// Rate limited server-side; see `rate_limit_remaining`.
    pub async fn complaint_search(
        &self,
        org_id: &str,
        query: &str,
    ) -> Result<ComplaintSearch, ApiError> {
        self.gateway
            .post(
                &Self::base(org_id, "complaint-search"),
                Some(&json!({ "query": query })),
            )
            .await
    }
}
