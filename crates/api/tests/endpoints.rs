//! Route, method and payload mapping of the typed API, against wiremock.

use serde_json::{json, Value};
use signals_api::{ConversationListParams, ReturnSignals, Session};
use signals_core::analytics::{DateRange, InterventionFilter, OutcomeType};
use signals_core::types::{ConversationStatus, OrgRole, RegisterRequest};
use signals_gateway::GatewayConfig;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ReturnSignals {
    ReturnSignals::new(GatewayConfig::new(&server.uri()).unwrap()).unwrap()
}

fn user_json() -> Value {
    json!({
        "user_id": "u-1",
        "email": "ops@shop.co",
        "first_name": "Dana",
        "last_name": null,
        "is_superadmin": false,
        "memberships": [
            {"organization_id": "org-1", "organization_name": "Shop", "role": "admin"}
        ],
        "created_at": "2025-03-01T12:00:00Z"
    })
}

fn message_json(content: &str) -> Value {
    json!({
        "message_id": "m-1",
        "direction": "outbound",
        "speaker": "human_agent",
        "content": content,
        "status": "sent",
        "sent_by_user_id": "u-1",
        "media_urls": [],
        "created_at": "2025-03-01T12:00:00Z"
    })
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

#[tokio::test]
async fn conversation_list_sends_only_set_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizations/org-1/conversations"))
        .and(query_param("status", "escalated"))
        .and(query_param("limit", "20"))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversations": [{
                "conversation_id": "c-1",
                "customer_phone": "+1555***1234",
                "customer_name": null,
                "status": "escalated",
                "last_message_preview": "It runs small",
                "last_message_at": "2025-03-01T12:00:00Z",
                "unread_count": 2,
                "created_at": "2025-03-01T11:00:00Z"
            }],
            "total": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = ConversationListParams {
        status: Some(ConversationStatus::Escalated),
        limit: Some(20),
        offset: None,
    };
    let list = client(&server)
        .conversations()
        .list("org-1", &params)
        .await
        .unwrap();

    assert_eq!(list.total, 1);
    assert_eq!(list.conversations[0].unread_count, 2);
}

#[tokio::test]
async fn conversation_list_sends_explicit_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizations/org-1/conversations"))
        .and(query_param("limit", "0"))
        .and(query_param("offset", "0"))
        .and(query_param_is_missing("status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"conversations": [], "total": 7})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let params = ConversationListParams {
        status: None,
        limit: Some(0),
        offset: Some(0),
    };
    let list = client(&server)
        .conversations()
        .list("org-1", &params)
        .await
        .unwrap();

    assert!(list.conversations.is_empty());
    assert_eq!(list.total, 7);
}

#[tokio::test]
async fn send_message_posts_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/organizations/org-1/conversations/c-1/messages"))
        .and(body_json(json!({"content": "We'll send a replacement"})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"message": message_json("We'll send a replacement")})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sent = client(&server)
        .conversations()
        .send_message("org-1", "c-1", "We'll send a replacement")
        .await
        .unwrap();

    assert_eq!(sent.message.content, "We'll send a replacement");
    assert!(sent.message.media_urls.is_empty());
}

#[tokio::test]
async fn change_role_is_a_patch() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/organizations/org-1/members/u-2/role"))
        .and(body_json(json!({"role": "manager"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_id": "u-2",
            "email": "sam@shop.co",
            "first_name": null,
            "last_name": null,
            "role": "manager",
            "joined_at": "2025-02-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let member = client(&server)
        .members()
        .change_role("org-1", "u-2", OrgRole::Manager)
        .await
        .unwrap();
    assert_eq!(member.role, OrgRole::Manager);
}

#[tokio::test]
async fn forbidden_role_change_surfaces_detail() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/organizations/org-1/members/u-9"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"detail": "Cannot remove the owner"})),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .members()
        .remove("org-1", "u-9")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(err.display_message(), "Cannot remove the owner");
    assert!(!err.is_email_verification_required());
}

#[tokio::test]
async fn intervention_filter_maps_to_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizations/org-1/analytics/interventions"))
        .and(query_param("outcome_type", "exchanged"))
        .and(query_param("from_date", "2025-01-01"))
        .and(query_param("offset", "40"))
        .and(query_param_is_missing("status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "interventions": [],
            "pagination": {"total": 40, "limit": 20, "offset": 40, "has_more": false},
            "period_start": "2025-01-01",
            "period_end": "2025-01-31"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = InterventionFilter {
        outcome_type: Some(OutcomeType::Exchanged),
        range: DateRange {
            from_date: Some("2025-01-01".into()),
            to_date: None,
        },
        offset: Some(40),
        ..Default::default()
    };
    let page = client(&server)
        .analytics()
        .interventions("org-1", &filter)
        .await
        .unwrap();

    assert!(!page.pagination.has_more);
    assert!(page.interventions.is_empty());
}

#[tokio::test]
async fn complaint_search_posts_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/organizations/org-1/analytics/complaint-search"))
        .and(body_json(json!({"query": "why are boots returned?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "Mostly sizing. See [Trail Boot](/products/p-1).",
            "products_mentioned": [{"product_id": "p-1", "title": "Trail Boot", "url": "/products/p-1"}],
            "conversations_mentioned": [],
            "query_tokens": 812,
            "rate_limit_remaining": 9
        })))
        .expect(1)
        .mount(&server)
        .await;

    let answer = client(&server)
        .analytics()
        .complaint_search("org-1", "why are boots returned?")
        .await
        .unwrap();

    assert_eq!(answer.products_mentioned[0].product_id, "p-1");
    assert_eq!(answer.rate_limit_remaining, 9);
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_needing_verification_exposes_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "detail": {
                "code": "email_verification_required",
                "pending_authentication_token": "pat-42",
                "message": "Verify your email"
            }
        })))
        .mount(&server)
        .await;

    let session = Session::new(client(&server));
    let err = session.login("ops@shop.co", "hunter22").await.unwrap_err();

    assert!(err.is_email_verification_required());
    assert_eq!(err.pending_authentication_token(), Some("pat-42"));
    assert_eq!(err.display_message(), "Verify your email");
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn expired_session_clears_cached_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": user_json()})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/organizations"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expired"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new(client(&server));
    let user = session.login("ops@shop.co", "hunter22").await.unwrap();
    assert_eq!(user.role_in("org-1"), Some(OrgRole::Admin));
    assert!(session.is_authenticated());

    let err = session
        .client()
        .organizations()
        .list()
        .await
        .unwrap_err();

    assert_eq!(err.display_message(), "Session expired");
    assert!(session.user().is_none());
}

#[tokio::test]
async fn logout_clears_user_even_when_server_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = Session::new(client(&server));
    assert_eq!(session.restore().await.unwrap().email, "ops@shop.co");

    let err = session.logout().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn register_with_verification_stays_signed_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Check your inbox",
            "email_verification_required": true,
            "pending_authentication_token": "pat-7",
            "user": user_json()
        })))
        .mount(&server)
        .await;

    let session = Session::new(client(&server));
    let response = session
        .register(&RegisterRequest {
            email: "ops@shop.co".into(),
            password: "hunter22".into(),
            first_name: "Dana".into(),
            last_name: "Lee".into(),
        })
        .await
        .unwrap();

    assert!(response.email_verification_required);
    assert_eq!(response.pending_authentication_token.as_deref(), Some("pat-7"));
    assert!(!session.is_authenticated());
}
