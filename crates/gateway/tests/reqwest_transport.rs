//! HTTP-level tests: real reqwest transport against a wiremock server.

use serde_json::{json, Value};
use signals_core::TransportError;
use signals_gateway::{Gateway, GatewayConfig, HttpRequest, Method, ReqwestTransport, Transport};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway_for(server: &MockServer) -> Gateway {
    Gateway::new(GatewayConfig::new(&server.uri()).unwrap()).unwrap()
}

#[tokio::test]
async fn session_cookie_is_sent_after_login() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "ops@shop.co", "password": "hunter22"})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=s1; Path=/; HttpOnly")
                .set_body_json(json!({"user": {"user_id": "u1"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/organizations"))
        .and(header("cookie", "session=s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let _: Value = gateway
        .post("/auth/login", Some(&json!({"email": "ops@shop.co", "password": "hunter22"})))
        .await
        .unwrap();
    let orgs: Vec<Value> = gateway.get("/organizations").await.unwrap();
    assert!(orgs.is_empty());
}

#[tokio::test]
async fn expired_cookie_is_renewed_and_request_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("cookie", "session=fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user_id": "u1"})))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expired"})))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=fresh; Path=/")
                .set_body_json(json!({"message": "ok"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let me: Value = gateway.get("/auth/me").await.unwrap();
    assert_eq!(me["user_id"], "u1");
}

#[tokio::test]
async fn refused_refresh_fires_session_expired() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organizations/o1/members"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let expired = Arc::new(AtomicUsize::new(0));
    let hits = Arc::clone(&expired);
    let _sub = gateway.on_session_expired(move || {
        hits.fetch_add(1, Ordering::SeqCst);
    });

    let err = gateway
        .get::<Value>("/organizations/o1/members")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.display_message(), "Session expired");
    assert_eq!(expired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn connection_refused_maps_to_transport_error() {
    // Reserve a free port, then release it so nothing is listening.
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let transport = ReqwestTransport::new(&GatewayConfig::new(&uri).unwrap()).unwrap();
    let err = transport
        .send(HttpRequest {
            method: Method::GET,
            url: format!("{uri}/health"),
            headers: Vec::new(),
            body: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Connect(_)), "got {err:?}");
}
