use async_trait::async_trait;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use signals_core::TransportError;
use signals_gateway::{Gateway, GatewayConfig, HttpRequest, HttpResponse, Transport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// In-memory API whose session expires on demand.
#[derive(Default)]
struct ExpiringSession {
    valid: AtomicBool,
}

#[async_trait]
impl Transport for ExpiringSession {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if request.url.ends_with("/auth/refresh") {
            tokio::task::yield_now().await;
            self.valid.store(true, Ordering::SeqCst);
            return Ok(HttpResponse::new(200, Vec::new()));
        }
        if self.valid.load(Ordering::SeqCst) {
            Ok(HttpResponse::new(200, br#"{"ok":true}"#.to_vec()))
        } else {
            Ok(HttpResponse::new(401, Vec::new()))
        }
    }
}

// ---------------------------------------------------------------------------
// Benchmark: burst of expired requests
// ---------------------------------------------------------------------------

fn bench_expired_burst(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let api = Arc::new(ExpiringSession::default());
    let gateway = Gateway::with_transport(
        GatewayConfig::new("http://bench.local").unwrap(),
        api.clone(),
    );

    let (api, gateway) = (&api, &gateway);

    let mut group = c.benchmark_group("expired_burst");
    for count in [1usize, 16, 128] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.to_async(&rt).iter(move || {
                api.valid.store(false, Ordering::SeqCst);
                let calls: Vec<_> = (0..count)
                    .map(|_| gateway.get::<serde_json::Value>("/organizations"))
                    .collect();
                async move {
                    for result in futures::future::join_all(calls).await {
                        result.unwrap();
                    }
                }
            });
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: authenticated fast path
// ---------------------------------------------------------------------------

fn bench_valid_session(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let api = Arc::new(ExpiringSession::default());
    api.valid.store(true, Ordering::SeqCst);
    let gateway = Gateway::with_transport(
        GatewayConfig::new("http://bench.local").unwrap(),
        api.clone(),
    );

    let gateway = &gateway;

    c.bench_function("valid_session_get", |b| {
        b.to_async(&rt).iter(move || async move {
            gateway
                .get::<serde_json::Value>("/organizations")
                .await
                .unwrap()
        });
    });
}

criterion_group!(benches, bench_expired_burst, bench_valid_session);
criterion_main!(benches);
